use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geometry::DeviceClass;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub breakpoints: BreakpointConfig,
    #[serde(default)]
    pub frames: FrameConfig,
    #[serde(default)]
    pub panels: PanelConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Viewport width thresholds partitioning desktop / tablet / phone variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakpointConfig {
    /// Widths at or below this use the mobile (phone + tablet) variants
    #[serde(default = "default_mobile_max_width")]
    pub mobile_max_width: f64,
    /// Widths strictly below this are phones
    #[serde(default = "default_phone_max_width")]
    pub phone_max_width: f64,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: default_mobile_max_width(),
            phone_max_width: default_phone_max_width(),
        }
    }
}

impl BreakpointConfig {
    /// Classify a viewport width
    pub fn classify(&self, width: f64) -> DeviceClass {
        if width < self.phone_max_width {
            DeviceClass::Phone
        } else if width <= self.mobile_max_width {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Interval between frame callbacks in milliseconds
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Breathing room kept below an opened panel when scrolling it into view
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin: f64,
    /// Delay before measuring an opened panel, lets its expand transition settle
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            scroll_margin: default_scroll_margin(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Widths at or below this play media in the shared fullscreen overlay
    #[serde(default = "default_mobile_max_width")]
    pub overlay_breakpoint: f64,
    /// Opacity of a paused inline video (or its poster)
    #[serde(default = "default_dimmed_opacity")]
    pub dimmed_opacity: f64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            overlay_breakpoint: default_mobile_max_width(),
            dimmed_opacity: default_dimmed_opacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mobile_max_width() -> f64 {
    1024.0
}

fn default_phone_max_width() -> f64 {
    600.0
}

fn default_frame_interval() -> u64 {
    16 // ~60fps
}

fn default_scroll_margin() -> f64 {
    80.0
}

fn default_settle_delay() -> u64 {
    450
}

fn default_dimmed_opacity() -> f64 {
    0.5
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollreel/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollreel")
            .join("config.toml")
    }
}
