//! Command-line front end: score still photos or replay a directory of
//! frames through a scan session.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use hexscore::analyze;
use hexscore::color::{PlayerColor, PlayerProfile, ScoreResult, ScorerParams};
use hexscore::core::RgbFrame;
use hexscore::detect::{
    BoardDetector, CaptureError, DetectorParams, FrameSource, ProgressUpdate, ScanObserver,
    ScanSession, SessionError, StabilityParams,
};

#[derive(Parser)]
#[command(name = "hexscore", about = "Score hexagonal board games from photos")]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one detection pass over an image and report the candidate.
    Detect {
        image: PathBuf,
        /// Optional grayscale reference template.
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Score a still image as a frozen frame.
    Score {
        image: PathBuf,
        #[command(flatten)]
        players: PlayerArgs,
        /// Optional grayscale reference template.
        #[arg(long)]
        template: Option<PathBuf>,
        /// Score the full frame instead of the detected board region.
        #[arg(long)]
        full_frame: bool,
        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Replay a directory of frames (sorted by name) through a scan
    /// session.
    Scan {
        frames_dir: PathBuf,
        #[command(flatten)]
        players: PlayerArgs,
        /// Optional grayscale reference template.
        #[arg(long)]
        template: Option<PathBuf>,
        /// Simulated milliseconds between ticks.
        #[arg(long, default_value_t = 150)]
        period_ms: u64,
        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PlayerArgs {
    /// Player as `name=color` (colors: magenta, yellow, blue, green).
    /// Repeat for each player.
    #[arg(long = "player", value_parser = parse_player, required = true)]
    players: Vec<PlayerProfile>,
}

fn parse_player(s: &str) -> Result<PlayerProfile, String> {
    let (name, color) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=color, got '{s}'"))?;
    let color: PlayerColor = color.parse()?;
    Ok(PlayerProfile::new(name.trim(), color))
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = hexscore::core::init_with_level(level);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Detect { image, template } => {
            let img = image::ImageReader::open(&image)?.decode()?.to_rgb8();
            let tpl = template
                .as_deref()
                .map(analyze::load_reference_template)
                .transpose()?
                .flatten();
            match analyze::detect_board(&img, &DetectorParams::default(), tpl)? {
                Some(c) => {
                    println!(
                        "board candidate: rect={:?} area={:.0} vertices={} template={:.2}",
                        c.bounding, c.shape.area, c.shape.vertex_count, c.template_score
                    );
                }
                None => println!("no board candidate found"),
            }
        }
        Command::Score {
            image,
            players,
            template,
            full_frame,
            json,
        } => {
            let img = image::ImageReader::open(&image)?.decode()?.to_rgb8();
            let tpl = template
                .as_deref()
                .map(analyze::load_reference_template)
                .transpose()?
                .flatten();
            let report = if full_frame {
                analyze::score_image(&img, None, &players.players)
            } else {
                analyze::detect_and_score(&img, &DetectorParams::default(), tpl, &players.players)?
            };
            for (player, err) in &report.failures {
                eprintln!("warning: scoring failed for {player}: {err}");
            }
            print_result(&report.result, json)?;
        }
        Command::Scan {
            frames_dir,
            players,
            template,
            period_ms,
            json,
        } => {
            let tpl = template
                .as_deref()
                .map(analyze::load_reference_template)
                .transpose()?
                .flatten();
            let result = replay_scan(&frames_dir, tpl, players.players, period_ms)?;
            match result {
                Some(result) => print_result(&result, json)?,
                None => println!("scan ended without a lock"),
            }
        }
    }
    Ok(())
}

fn print_result(result: &ScoreResult, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    for (rank, entry) in result.ranked().iter().enumerate() {
        println!(
            "{}. {} ({}): {}",
            rank + 1,
            entry.name,
            entry.color.display_name(),
            entry.pieces
        );
    }
    if result.is_empty_board() {
        println!("no pieces found - is the board in frame?");
    }
    Ok(())
}

/// Frame source over image files in a directory, sorted by file name.
struct DirFrameSource {
    files: Vec<PathBuf>,
    next: usize,
}

impl DirFrameSource {
    fn new(dir: &Path) -> std::io::Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(Self { files, next: 0 })
    }
}

impl FrameSource for DirFrameSource {
    fn next_frame(&mut self) -> Result<RgbFrame, CaptureError> {
        let Some(path) = self.files.get(self.next) else {
            return Err(CaptureError::EndOfStream);
        };
        self.next += 1;
        let img = image::ImageReader::open(path)
            .map_err(|e| CaptureError::Denied(e.to_string()))?
            .decode()
            .map_err(|e| CaptureError::Denied(e.to_string()))?
            .to_rgb8();
        Ok(analyze::frame_from_image(&img))
    }
}

#[derive(Default)]
struct ConsoleObserver {
    result: Option<ScoreResult>,
}

impl ScanObserver for ConsoleObserver {
    fn on_progress(&mut self, update: ProgressUpdate) {
        if update.locked {
            eprintln!("board locked");
        } else if update.progress_percent > 0 {
            eprintln!("locking... {}%", update.progress_percent);
        }
    }
    fn on_result(&mut self, result: &ScoreResult) {
        self.result = Some(result.clone());
    }
    fn on_error(&mut self, error: &SessionError) {
        eprintln!("warning: {error}");
    }
}

fn replay_scan(
    dir: &Path,
    template: Option<hexscore::core::GrayImage>,
    players: Vec<PlayerProfile>,
    period_ms: u64,
) -> Result<Option<ScoreResult>, Box<dyn std::error::Error>> {
    let mut source = DirFrameSource::new(dir)?;
    let mut session = ScanSession::new(
        BoardDetector::new(DetectorParams::default(), template),
        StabilityParams::default(),
        ScorerParams::default(),
        players,
    );
    let mut observer = ConsoleObserver::default();

    session.start();
    let t0 = Instant::now();
    let mut tick = 0u64;
    // The frame directory stands in for the camera; simulated time stands
    // in for the scan timer.
    // Runs until a result is delivered or the source runs dry; either way
    // the session deactivates itself.
    while session.is_active() {
        let now = t0 + Duration::from_millis(tick * period_ms);
        session.tick(&mut source, now, &mut observer);
        tick += 1;
    }
    Ok(observer.result)
}
