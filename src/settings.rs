//! Persistent application settings (JSON).

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::core::effect::Fonts;

/// Application settings
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Settings {
    // Window
    pub window_width: f32,
    pub window_height: f32,

    // Frame loop
    pub frame_delay_ms: u64, // Repaint delay between frames (default 16ms)

    // Decoding
    pub workers: usize, // 0 = auto (75% of cores)

    // Fonts
    pub legible_font_size: f32,
    pub mono_font_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 960.0,
            window_height: 640.0,
            frame_delay_ms: 16,
            workers: 0,
            legible_font_size: 16.0,
            mono_font_size: 14.0,
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Decode threads to spawn, resolving 0 to a share of the CPU cores.
    pub fn worker_threads(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            (num_cpus::get() * 3 / 4).max(1)
        }
    }

    pub fn fonts(&self) -> Fonts {
        Fonts::with_sizes(self.legible_font_size, self.mono_font_size)
    }
}
