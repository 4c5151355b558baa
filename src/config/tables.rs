use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    tracking: TrackingConfig,
    #[serde(default)]
    outline: OutlineConfig,
    #[serde(default)]
    debug: DebugConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            down_threshold_px: tables.tracking.down_threshold_px,
            up_threshold_px: tables.tracking.up_threshold_px,
            suspend_ms: tables.tracking.suspend_ms,
            fold_level: tables.outline.fold_level,
            threshold_overlay: tables.debug.threshold_overlay,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            tracking: TrackingConfig {
                down_threshold_px: config.down_threshold_px,
                up_threshold_px: config.up_threshold_px,
                suspend_ms: config.suspend_ms,
            },
            outline: OutlineConfig {
                fold_level: config.fold_level,
            },
            debug: DebugConfig {
                threshold_overlay: config.threshold_overlay,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TrackingConfig {
    #[serde(default = "defaults::default_down_threshold_px")]
    down_threshold_px: f64,
    #[serde(default = "defaults::default_up_threshold_px")]
    up_threshold_px: f64,
    #[serde(default = "defaults::default_suspend_ms")]
    suspend_ms: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            down_threshold_px: defaults::default_down_threshold_px(),
            up_threshold_px: defaults::default_up_threshold_px(),
            suspend_ms: defaults::default_suspend_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct OutlineConfig {
    #[serde(default = "defaults::default_fold_level")]
    fold_level: u8,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        OutlineConfig {
            fold_level: defaults::default_fold_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct DebugConfig {
    #[serde(default = "defaults::default_threshold_overlay")]
    threshold_overlay: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig {
            threshold_overlay: defaults::default_threshold_overlay(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
