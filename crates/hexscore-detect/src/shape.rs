//! Geometric validation of candidate contours against the hexagonal board
//! shape, independent of which color pieces sit on it.

use hexscore_core::{approx_polygon, is_convex, Contour};

use crate::params::DetectorParams;

/// Derived measurements of one contour. Produced only for contours that
/// pass validation; consumed by best-candidate selection, then discarded.
#[derive(Clone, Copy, Debug)]
pub struct ShapeScore {
    pub area: f64,
    pub aspect_ratio: f64,
    pub compactness: f64,
    pub circularity: f64,
    pub is_convex: bool,
    pub vertex_count: usize,
}

/// Why a contour was rejected. Checks run in this order; the first failing
/// check wins and later measurements are not computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeReject {
    /// Area outside the accepted fraction of the detection-frame area.
    /// This runs before any geometric work.
    AreaOutOfRange { area: f64 },
    /// Simplified polygon has too few or too many vertices for a hexagon
    /// viewed at a modest tilt.
    VertexCount { vertices: usize },
    NotConvex,
    /// Bounding box too elongated.
    AspectRatio { ratio: f64 },
    /// Contour fills too little of its bounding rectangle.
    Compactness { value: f64 },
    /// Boundary too irregular.
    Circularity { value: f64 },
}

/// Validate one contour against the board geometry. Pure: no side effects,
/// all temporaries are dropped on return.
pub fn validate_board_shape(
    contour: &Contour,
    frame_area: f64,
    params: &DetectorParams,
) -> Result<ShapeScore, ShapeReject> {
    let area = contour.area();
    if area < params.min_area_frac * frame_area || area > params.max_area_frac * frame_area {
        return Err(ShapeReject::AreaOutOfRange { area });
    }

    let perimeter = contour.perimeter();
    let poly = approx_polygon(&contour.points, params.approx_epsilon_rel * perimeter);
    let vertex_count = poly.len();
    if vertex_count < params.min_vertices || vertex_count > params.max_vertices {
        return Err(ShapeReject::VertexCount {
            vertices: vertex_count,
        });
    }

    let convex = is_convex(&poly);
    if !convex {
        return Err(ShapeReject::NotConvex);
    }

    let rect = contour.bounding_rect();
    let aspect_ratio = rect.aspect_ratio();
    if aspect_ratio > params.max_aspect_ratio {
        return Err(ShapeReject::AspectRatio {
            ratio: aspect_ratio,
        });
    }

    let rect_area = rect.area() as f64;
    let compactness = if rect_area > 0.0 { area / rect_area } else { 0.0 };
    if compactness < params.min_compactness {
        return Err(ShapeReject::Compactness { value: compactness });
    }

    let circularity = if perimeter > 0.0 {
        4.0 * std::f64::consts::PI * area / (perimeter * perimeter)
    } else {
        0.0
    };
    if circularity < params.min_circularity {
        return Err(ShapeReject::Circularity { value: circularity });
    }

    Ok(ShapeScore {
        area,
        aspect_ratio,
        compactness,
        circularity,
        is_convex: convex,
        vertex_count,
    })
}
