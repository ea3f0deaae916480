// Mon Oct 19 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Installs the stderr logger. `RUST_LOG` takes precedence when set.
pub fn init_logger(level: LevelFilter) {
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::Builder::from_default_env().try_init().ok();
        return;
    }

    let logger = Box::new(ColoredLogger::new(level));
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

pub fn level_from_str(s: &str) -> LevelFilter {
    match s.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}

/// `-v` count on top of the configured level.
pub fn level_from_verbosity(base: LevelFilter, verbosity: u8) -> LevelFilter {
    let levels = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let current = levels.iter().position(|&l| l == base).unwrap_or(2);
    levels[(current + verbosity as usize).min(levels.len() - 1)]
}

struct ColoredLogger {
    level: LevelFilter,
}

impl ColoredLogger {
    fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn format_level(&self, level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let target = format!("[{}]", record.target());
            eprintln!("{} {} {}", self.format_level(record.level()), target.dimmed(), record.args());
        }
    }

    fn flush(&self) {}
}

pub struct ScopedTimer {
    name: String,
    start: std::time::Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        log::debug!("[TIMER] {} took {:.2}ms", self.name, elapsed.as_secs_f64() * 1000.0);
    }
}

pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name)
}
