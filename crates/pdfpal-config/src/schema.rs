//! Settings schema.
//!
//! All structs use `serde(default)` so partial configs work correctly;
//! missing fields are filled with defaults.

use serde::{Deserialize, Serialize};

/// Root settings for the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendConfig,
    pub display: DisplayConfig,
}

/// Where the PDF Pal API lives and how patiently we talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    /// Timeout for non-streaming requests, in seconds. The chat stream has
    /// no timeout; transport closure ends it.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".into(),
            request_timeout_secs: 120,
        }
    }
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub dark_mode: bool,
    /// Font size in points (valid range: 8-32).
    pub font_size: u32,
    pub avatar: Avatar,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            font_size: 14,
            avatar: Avatar::Robot,
        }
    }
}

/// Assistant avatar choice: a fixed set of variants mapped through a fixed
/// glyph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Avatar {
    #[default]
    Robot,
    Owl,
    Cat,
    Sparkles,
}

impl Avatar {
    pub fn glyph(&self) -> &'static str {
        match self {
            Avatar::Robot => "🤖",
            Avatar::Owl => "🦉",
            Avatar::Cat => "🐱",
            Avatar::Sparkles => "✨",
        }
    }
}
