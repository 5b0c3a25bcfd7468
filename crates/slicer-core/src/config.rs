//! Slicer configuration.
//!
//! Provides the initial field values, display sizes and export naming order.
//! Configuration can be loaded from and saved to a TOML file.

use crate::export::ExportOrder;
use serde::{Deserialize, Serialize};
use slicer_common::{SlicerError, SlicerResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "sprite-slicer.toml";

/// Application directory under the platform config directory.
const APP_DIR: &str = "sprite-slicer";

/// Slicer configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    // === Field Defaults ===
    /// Initial frame width in pixels
    pub frame_width: u32,
    /// Initial frame height in pixels
    pub frame_height: u32,
    /// Initial preview frames per second
    pub fps: u32,

    // === Display ===
    /// Side of the square on-screen canvas in pixels
    pub display_size: u32,
    /// Side of the square preview box in pixels
    pub preview_size: u32,

    // === Export ===
    /// Order frames are numbered in on export
    pub export_order: ExportOrder,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            frame_width: 32,
            frame_height: 32,
            fps: 4,

            display_size: 720,
            preview_size: 560,

            export_order: ExportOrder::Cyclic,
        }
    }
}

impl SlicerConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut config) => {
                    config.validate();
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> SlicerResult<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> SlicerResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| SlicerError::Config(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// Falls back to the working directory when the platform has no config
    /// directory.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join(APP_DIR).join(CONFIG_FILE),
        )
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.frame_width = self.frame_width.max(1);
        self.frame_height = self.frame_height.max(1);
        self.fps = self.fps.clamp(1, 120);

        self.display_size = self.display_size.clamp(16, 8192);
        self.preview_size = self.preview_size.clamp(16, 8192);
    }
}
