//! Debug log backend for the protein explorer.
//!
//! All `log::*!` output goes to `protein_explorer_debug.log` in the system temp
//! directory (`/tmp` on most Unix systems), never to stdout, so diagnostics
//! don't interleave with the interactive shell.
//!
//! Level precedence: `--log-level` flag, then the `DEBUG_LEVEL` environment
//! variable, then the `log_level` config setting:
//! - 0: Off
//! - 1: Errors only
//! - 2: Info level (tab lifecycle, searches)
//! - 3: Debug level (switches, captures, HTTP requests)
//! - 4: Trace level

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use protein_explorer_config::LogLevel;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Name of the debug log file inside the temp directory
pub const LOG_FILE_NAME: &str = "protein_explorer_debug.log";

/// Where the active log level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    Cli,
    Env,
    /// Nothing pinned the level; the config setting applies
    Config,
}

struct DebugLogger {
    file: Mutex<Option<File>>,
}

impl DebugLogger {
    fn open() -> Self {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path());

        let logger = DebugLogger {
            // Silently fail if the log file can't be opened
            file: Mutex::new(file.ok()),
        };
        logger.write_raw(&format!(
            "{}\nprotein-explorer debug session started at {}\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&self, msg: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.write_raw(&format_line(
                &get_timestamp(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn get_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

fn format_line(timestamp: &str, level: log::Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", timestamp, level, target, msg)
}

/// Parse a `DEBUG_LEVEL` value (0-4).
pub fn level_from_debug_env(value: &str) -> Option<LevelFilter> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .map(|n| LogLevel::from_debug_level(n).to_level_filter())
}

/// Pick the startup level from the CLI flag and the `DEBUG_LEVEL` value.
pub fn resolve_level(
    cli_level: Option<LevelFilter>,
    env_value: Option<&str>,
) -> (LevelFilter, LevelSource) {
    if let Some(level) = cli_level {
        return (level, LevelSource::Cli);
    }
    if let Some(level) = env_value.and_then(level_from_debug_env) {
        return (level, LevelSource::Env);
    }
    (LogLevel::default().to_level_filter(), LevelSource::Config)
}

/// Install the file logger as the `log` backend.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) -> LevelSource {
    let env_value = std::env::var("DEBUG_LEVEL").ok();
    let (level, source) = resolve_level(cli_level, env_value.as_deref());

    let logger = LOGGER.get_or_init(DebugLogger::open);
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
        LEVEL_PINNED.store(source != LevelSource::Config, Ordering::Relaxed);
    }
    source
}

/// Apply the configured level unless the CLI or environment pinned one.
pub fn apply_config_level(level: LogLevel) {
    if LEVEL_PINNED.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(level.to_level_filter());
    log::debug!("Log level set from config: {}", level);
}
