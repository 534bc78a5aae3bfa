//! Shared constants for the widget configuration

/// Zoom level written into a freshly initialized configuration
pub const DEFAULT_ZOOM_LEVEL: u32 = 20;

/// Warning shown when the selected map configuration has no backing device
pub const DEVICE_NOT_FOUND_WARNING: &str =
    "Could not load device configuration based on selected map configuration!";
