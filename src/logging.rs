//! Logging setup
//!
//! Everything logs through the `log` macros. `init` routes warnings and errors
//! to stderr and the full debug stream to `snapgrid.log`, written next to the
//! executable (or the working directory when that is not writable).

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

/// Log file name
pub const LOG_FILE: &str = "snapgrid.log";

/// Get the log file path (same directory as executable)
pub fn log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE)
}

fn open_log_file() -> Option<(PathBuf, File)> {
    let candidates = [log_path(), PathBuf::from(LOG_FILE)];
    candidates.into_iter().find_map(|path| {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true) // start fresh each run
            .open(&path)
            .ok()
            .map(|file| (path, file))
    })
}

/// Initialize the global logger. Safe to call more than once; later calls are ignored.
///
/// `verbose` lowers the terminal threshold from Warn to Debug.
pub fn init(verbose: bool) {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("snapgrid")
        .set_time_format_rfc3339()
        .build();

    let term_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let mut file_path = None;
    if let Some((path, file)) = open_log_file() {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
        file_path = Some(path);
    }

    if CombinedLogger::init(loggers).is_ok() {
        match file_path {
            Some(path) => log::info!("logging to {}", path.display()),
            None => log::warn!("log file unavailable; logging to stderr only"),
        }
    }
}
