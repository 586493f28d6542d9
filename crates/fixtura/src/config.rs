//! Test bed configuration.

use crate::result::{FixturaError, FixturaResult};
use serde::{Deserialize, Serialize};

/// Environment variable selecting the detection mode (`manual` or `automatic`)
pub const DETECTION_ENV: &str = "FIXTURA_DETECTION";
/// Environment variable overriding the viewport (`WIDTHxHEIGHT`)
pub const VIEWPORT_ENV: &str = "FIXTURA_VIEWPORT";

/// How change-detection passes are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Every mutator runs a detection pass before returning
    #[default]
    Manual,
    /// Passes are scheduled by the fixture and run when it is awaited stable
    Automatic,
}

impl DetectionMode {
    /// Parse a mode name, case-insensitively
    pub fn parse(value: &str) -> FixturaResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "automatic" | "auto" => Ok(Self::Automatic),
            other => Err(FixturaError::Config {
                message: format!("unknown detection mode '{other}'"),
            }),
        }
    }

    /// Whether the fixture schedules detection itself
    #[must_use]
    pub const fn is_automatic(self) -> bool {
        matches!(self, Self::Automatic)
    }
}

/// Configuration shared by every fixture a test bed creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestBedConfig {
    /// Change-detection mode
    pub detection: DetectionMode,
    /// Width of the layout root
    pub viewport_width: u32,
    /// Height of the layout root
    pub viewport_height: u32,
    /// Layout height of one line of text
    pub line_height: f64,
    /// Record an interaction log on every fixture
    pub tracing: bool,
}

impl Default for TestBedConfig {
    fn default() -> Self {
        Self {
            detection: DetectionMode::Manual,
            viewport_width: 1024,
            viewport_height: 768,
            line_height: 16.0,
            tracing: false,
        }
    }
}

impl TestBedConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `FIXTURA_DETECTION` and `FIXTURA_VIEWPORT`
    pub fn from_env() -> FixturaResult<Self> {
        Self::new().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values read through `lookup`
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> FixturaResult<Self> {
        if let Some(mode) = lookup(DETECTION_ENV) {
            self.detection = DetectionMode::parse(&mode)?;
        }
        if let Some(viewport) = lookup(VIEWPORT_ENV) {
            let (width, height) = parse_viewport(&viewport)?;
            self.viewport_width = width;
            self.viewport_height = height;
        }
        Ok(self)
    }

    /// Set detection mode
    #[must_use]
    pub const fn with_detection(mut self, detection: DetectionMode) -> Self {
        self.detection = detection;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set line height
    #[must_use]
    pub const fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Enable the interaction log
    #[must_use]
    pub const fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }
}

fn parse_viewport(value: &str) -> FixturaResult<(u32, u32)> {
    let invalid = || FixturaError::Config {
        message: format!("viewport must be WIDTHxHEIGHT, got '{value}'"),
    };
    let (width, height) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}
