//! Stderr logging for the scan pipeline.
//!
//! One global logger with uptime-relative timestamps and the emitting
//! module, so per-tick traces from the detect and color crates line up in
//! a single stream. The optional `tracing` feature swaps in a
//! `tracing-subscriber` pipeline for structured output instead.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct PipelineLog {
    started: Instant,
}

fn format_line(elapsed_ms: u128, level: Level, target: &str, msg: &str) -> String {
    format!(
        "{:>4}.{:03}s {:<5} {}: {}",
        elapsed_ms / 1000,
        elapsed_ms % 1000,
        level,
        target,
        msg
    )
}

impl Log for PipelineLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_millis(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<PipelineLog> = OnceLock::new();

/// Install the pipeline logger at the given verbosity. Uptime is measured
/// from the first call; a second call fails with the error from
/// `log::set_logger` and leaves the installed logger untouched.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let logger = LOGGER.get_or_init(|| PipelineLog {
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let base = tracing_subscriber::registry().with(filter);
    if json {
        let _ = base
            .with(fmt::layer().json().flatten_event(true))
            .try_init();
    } else {
        let _ = base
            .with(fmt::layer().compact().with_timer(fmt::time::uptime()))
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_carries_uptime_level_and_target() {
        let line = format_line(
            73_421,
            Level::Info,
            "hexscore_detect::session",
            "board locked",
        );
        assert_eq!(line, "  73.421s INFO  hexscore_detect::session: board locked");
    }

    #[test]
    fn sub_second_uptime_is_zero_padded() {
        let line = format_line(42, Level::Warn, "hexscore", "slow tick");
        assert_eq!(line, "   0.042s WARN  hexscore: slow tick");
    }
}
