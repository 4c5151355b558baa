use pagetoc_core::{
    DEFAULT_DOWN_THRESHOLD_PX, DEFAULT_FOLD_LEVEL, DEFAULT_SUSPEND_WINDOW,
    DEFAULT_UP_THRESHOLD_PX,
};

pub(crate) fn default_down_threshold_px() -> f64 {
    DEFAULT_DOWN_THRESHOLD_PX
}

pub(crate) fn default_up_threshold_px() -> f64 {
    DEFAULT_UP_THRESHOLD_PX
}

pub(crate) fn default_suspend_ms() -> u64 {
    DEFAULT_SUSPEND_WINDOW.as_millis() as u64
}

pub(crate) fn default_fold_level() -> u8 {
    DEFAULT_FOLD_LEVEL
}

pub(crate) fn default_threshold_overlay() -> bool {
    false
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
