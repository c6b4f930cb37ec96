//! Process-level setup shared by binaries: logging.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

/// Map `-v` count to a level: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_for(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Initialize logging to `log_file`, or to the console when `None`.
///
/// Console logging respects `RUST_LOG` when set.
pub fn init_logger(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let level = level_for(verbosity);

    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;

        env_logger::Builder::new()
            .filter_level(level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .filter_module("eframe", log::LevelFilter::Info)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init()?;

        info!("Logging to file: {} (level: {:?})", path.display(), level);
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level.as_str().to_lowercase()),
        )
        .filter_module("egui", log::LevelFilter::Info)
        .filter_module("eframe", log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init()?;
    }
    Ok(())
}
