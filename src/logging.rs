//! Line-oriented backend for the `log` facade.
//!
//! Each record becomes `"<ts_ms> [LEVEL] [target] message"`. The TUI owns the
//! terminal, so in that mode records go to a file or nowhere.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, Log, Metadata, Record};

use crate::bus::current_timestamp_ms;

/// Where log lines are written
#[derive(Debug)]
pub enum LogSink {
    File(File),
    Stderr,
    Off,
}

impl LogSink {
    /// File when a path is given, stderr when headless, otherwise nothing.
    pub fn open(path: Option<&Path>, headless: bool) -> Result<Self> {
        match path {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open log file {}", path.display()))?;
                Ok(Self::File(file))
            }
            None if headless => Ok(Self::Stderr),
            None => Ok(Self::Off),
        }
    }
}

pub struct LineLogger {
    level: LevelFilter,
    sink: Mutex<LogSink>,
}

impl LineLogger {
    pub fn new(level: LevelFilter, sink: LogSink) -> Self {
        Self {
            level,
            sink: Mutex::new(sink),
        }
    }
}

pub fn format_line(ts_ms: u64, record: &Record) -> String {
    format!(
        "{} [{}] [{}] {}",
        ts_ms,
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *sink {
            LogSink::File(file) => {
                let _ = writeln!(file, "{}", format_line(current_timestamp_ms(), record));
            }
            LogSink::Stderr => eprintln!("{}", format_line(current_timestamp_ms(), record)),
            LogSink::Off => {}
        }
    }

    fn flush(&self) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let LogSink::File(file) = &mut *sink {
            let _ = file.flush();
        }
    }
}

/// Accepts `off`, `error`, `warn`, `info`, `debug`, `trace` (any case).
pub fn parse_level(s: &str) -> Result<LevelFilter> {
    s.trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("invalid log level {:?}", s))
}

/// Install the global logger. Fails if one is already set.
pub fn init(level: LevelFilter, sink: LogSink) -> Result<()> {
    let logger: &'static LineLogger = Box::leak(Box::new(LineLogger::new(level, sink)));
    log::set_logger(logger).map_err(|_| anyhow!("logger already initialized"))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_format_line() {
        let line = format_line(
            1234,
            &Record::builder()
                .level(Level::Warn)
                .target("tui_maze_http")
                .args(format_args!("port {} busy", 8080))
                .build(),
        );
        assert_eq!(line, "1234 [WARN] [tui_maze_http] port 8080 busy");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn test_level_filtering() {
        let logger = LineLogger::new(LevelFilter::Info, LogSink::Off);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn test_sink_selection() {
        assert!(matches!(LogSink::open(None, true).unwrap(), LogSink::Stderr));
        assert!(matches!(LogSink::open(None, false).unwrap(), LogSink::Off));
    }
}
