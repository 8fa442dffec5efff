// Mon Oct 19 2026 - Alex

use crate::search::ProgressMonitor;
use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the colored stderr logger. Later calls are ignored.
    pub fn init_logger(level: LevelFilter) {
        let logger = Box::new(ColoredLogger::new(level));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    /// Installs `env_logger` at `level`, letting `RUST_LOG` refine it.
    pub fn init_env_logger(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_env("RUST_LOG")
            .format_timestamp(None)
            .try_init();
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    pub fn level_from_verbosity(verbosity: usize) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
    use_color: AtomicBool,
}

impl ColoredLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            level,
            use_color: AtomicBool::new(colored::control::SHOULD_COLORIZE.should_colorize()),
        }
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
            let level_str = if self.use_color.load(Ordering::Relaxed) {
                self.format_level(record.level()).to_string()
            } else {
                format!("{:5}", record.level())
            };

            let target = if !record.target().is_empty() {
                format!("[{}]", record.target())
            } else {
                String::new()
            };

            eprintln!("{} {} {}", level_str, target.dimmed(), record.args());
        }
    }

    fn flush(&self) {}
}

pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("[TIMER] {} took {:.2}ms", self.name, self.elapsed_ms());
    }
}

/// Progress monitor that reports through `log` every 10%.
pub struct ProgressLogger {
    name: Mutex<String>,
    total: AtomicUsize,
    current: AtomicUsize,
    last_percent: AtomicUsize,
}

impl ProgressLogger {
    pub fn new(name: &str) -> Self {
        Self {
            name: Mutex::new(name.to_string()),
            total: AtomicUsize::new(0),
            current: AtomicUsize::new(0),
            last_percent: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    pub fn last_percent(&self) -> usize {
        self.last_percent.load(Ordering::Relaxed)
    }

    fn maybe_log(&self, current: usize) {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            return;
        }

        let percent = (current * 100 / total) / 10 * 10;
        let last = self.last_percent.fetch_max(percent, Ordering::Relaxed);
        if percent > last {
            log::info!("[{}] Progress: {}% ({}/{})", self.name.lock(), percent, current, total);
        }
    }
}

impl ProgressMonitor for ProgressLogger {
    fn begin(&self, task: &str, total: usize) {
        *self.name.lock() = task.to_string();
        self.total.store(total, Ordering::Relaxed);
        self.current.store(0, Ordering::Relaxed);
        self.last_percent.store(0, Ordering::Relaxed);
        log::info!("[{}] Starting (0/{})", task, total);
    }

    fn worked(&self, units: usize) {
        let current = self.current.fetch_add(units, Ordering::Relaxed) + units;
        self.maybe_log(current);
    }

    fn done(&self) {
        log::info!(
            "[{}] Completed ({}/{})",
            self.name.lock(),
            self.current(),
            self.total.load(Ordering::Relaxed)
        );
    }
}
