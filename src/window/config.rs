use serde::{Deserialize, Serialize};

// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Standard decorated window at the configured size.
    Windowed,
    /// Exclusive hardware fullscreen at the video mode closest to the
    /// configured size.
    Fullscreen,
    /// Borderless window covering the monitor at its native resolution.
    #[default]
    Borderless,
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window section of `conf.json`.
///
/// `width`/`height` are physical pixels.  They size the window in
/// `Windowed` mode and pick the video mode in `Fullscreen` mode; `Borderless`
/// ignores them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub mode: WindowMode,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    /// Borderless fullscreen, with 1280 × 720 as the windowed fallback size.
    fn default() -> Self {
        Self {
            mode: WindowMode::Borderless,
            width: 1280,
            height: 720,
        }
    }
}
