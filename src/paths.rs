//! Where settings and log files live.
//!
//! Lookup order for both config and data files:
//! 1. `--config-dir` on the command line
//! 2. `SPROCKET_CONFIG_DIR` environment variable
//! 3. The working directory, if it already holds a sprocket file
//! 4. The platform directory from `dirs-next`
//!    (`~/.config/sprocket`, `~/.local/share/sprocket`, `%APPDATA%\sprocket`, ...)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "sprocket";
pub const SETTINGS_FILE: &str = "sprocket.json";
pub const LOG_FILE: &str = "sprocket.log";
pub const ENV_CONFIG_DIR: &str = "SPROCKET_CONFIG_DIR";

/// Override for the default application directories.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// CLI argument wins over the environment variable.
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var(ENV_CONFIG_DIR).ok().map(PathBuf::from));
        Self { config_dir }
    }
}

#[derive(Clone, Copy)]
enum DirKind {
    Config,
    Data,
}

pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    base_dir(DirKind::Config, config).join(name)
}

pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    base_dir(DirKind::Data, config).join(name)
}

/// Create the config and data directories if missing.
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    for kind in [DirKind::Config, DirKind::Data] {
        let dir = base_dir(kind, config);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
    }
    Ok(())
}

fn has_local_files(dir: &Path) -> bool {
    [SETTINGS_FILE, LOG_FILE].iter().any(|f| dir.join(f).exists())
}

fn base_dir(kind: DirKind, config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(cwd) = std::env::current_dir() {
        if has_local_files(&cwd) {
            return cwd;
        }
    }

    let platform = match kind {
        DirKind::Config => dirs_next::config_dir(),
        DirKind::Data => dirs_next::data_dir(),
    };
    platform
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}
