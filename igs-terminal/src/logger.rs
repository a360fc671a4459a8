/// In-memory log sink feeding the on-screen log panel
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Messages kept for the panel
const CAPACITY: usize = 64;

static LOGGER: PanelLogger = PanelLogger {
    lines: Mutex::new(VecDeque::new()),
};

/// Ring buffer of formatted `LEVEL|target|message` lines
pub struct PanelLogger {
    lines: Mutex<VecDeque<String>>,
}

impl PanelLogger {
    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == CAPACITY {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Up to `count` most recent lines, oldest first
    pub fn recent(&self, count: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(count)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Log for PanelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = record.target().rsplit("::").next().unwrap_or("");
        self.push(format!("{}|{}|{}", level_tag(record.level()), target, record.args()));
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Install the panel logger as the global `log` sink
pub fn init(level: LevelFilter) -> Result<&'static PanelLogger, SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(&LOGGER)
}

/// The global panel logger, whether or not it was installed
pub fn panel() -> &'static PanelLogger {
    &LOGGER
}
