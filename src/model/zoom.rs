//! Named zoom densities for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zoom density: a named pixels-per-year multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    /// Zoomed out; the full 3000 BCE..present span is about 4000 px wide.
    #[default]
    Century,
    /// Zoomed in, ten times denser.
    Decade,
}

/// Error for an unrecognised zoom name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown zoom level '{0}' (expected 'century' or 'decade')")]
pub struct InvalidZoomLevel(pub String);

impl ZoomLevel {
    /// All levels, most zoomed-out first.
    pub const ALL: [ZoomLevel; 2] = [ZoomLevel::Century, ZoomLevel::Decade];

    /// Pixels per calendar year at this level.
    pub fn pixels_per_year(self) -> f64 {
        match self {
            ZoomLevel::Century => 0.8,
            ZoomLevel::Decade => 8.0,
        }
    }

    /// Switch between the two levels.
    pub fn toggle(self) -> Self {
        match self {
            ZoomLevel::Century => ZoomLevel::Decade,
            ZoomLevel::Decade => ZoomLevel::Century,
        }
    }

    /// Lowercase name used in config and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ZoomLevel::Century => "century",
            ZoomLevel::Decade => "decade",
        }
    }
}

impl FromStr for ZoomLevel {
    type Err = InvalidZoomLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "century" => Ok(ZoomLevel::Century),
            "decade" => Ok(ZoomLevel::Decade),
            _ => Err(InvalidZoomLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
