use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Reactive frame-stepping image viewer
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Images to load on startup (PNG, JPEG, TIFF, TGA, HDR, EXR) - optional, can also drag-and-drop
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Enable logging to file (default: sprocket.log in the data directory)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Decode worker threads (overrides settings)
    #[arg(long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Initial window width (overrides settings)
    #[arg(long = "width", value_name = "PX")]
    pub width: Option<f32>,

    /// Initial window height (overrides settings)
    #[arg(long = "height", value_name = "PX")]
    pub height: Option<f32>,
}
