use pagetoc_core::TrackerSettings;
use serde::Deserialize;
use std::time::Duration;

const MIN_FOLD_LEVEL: u8 = 2;
const MAX_FOLD_LEVEL: u8 = 6;
const MAX_SUSPEND_MS: u64 = 5_000;

/// High-level app configuration; the TOML file groups it into tables.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_down_threshold_px")]
    pub down_threshold_px: f64,
    #[serde(default = "crate::config::defaults::default_up_threshold_px")]
    pub up_threshold_px: f64,
    #[serde(default = "crate::config::defaults::default_suspend_ms")]
    pub suspend_ms: u64,
    #[serde(default = "crate::config::defaults::default_fold_level")]
    pub fold_level: u8,
    #[serde(default = "crate::config::defaults::default_threshold_overlay")]
    pub threshold_overlay: bool,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            down_threshold_px: crate::config::defaults::default_down_threshold_px(),
            up_threshold_px: crate::config::defaults::default_up_threshold_px(),
            suspend_ms: crate::config::defaults::default_suspend_ms(),
            fold_level: crate::config::defaults::default_fold_level(),
            threshold_overlay: crate::config::defaults::default_threshold_overlay(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Replace out-of-range values with defaults or clamp them.
    pub(crate) fn sanitized(mut self) -> Self {
        let defaults = AppConfig::default();
        if !self.down_threshold_px.is_finite() || self.down_threshold_px < 0.0 {
            self.down_threshold_px = defaults.down_threshold_px;
        }
        if !self.up_threshold_px.is_finite() || self.up_threshold_px < 0.0 {
            self.up_threshold_px = defaults.up_threshold_px;
        }
        self.suspend_ms = self.suspend_ms.min(MAX_SUSPEND_MS);
        self.fold_level = self.fold_level.clamp(MIN_FOLD_LEVEL, MAX_FOLD_LEVEL);
        self
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            down_threshold_px: self.down_threshold_px,
            up_threshold_px: self.up_threshold_px,
            suspend_for: Duration::from_millis(self.suspend_ms),
            fold_level: self.fold_level,
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
