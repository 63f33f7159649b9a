//! Core types for grid processing.

use serde::{Deserialize, Serialize};

/// Scattered-data interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Piecewise-linear on a Delaunay triangulation; NaN outside the hull.
    #[default]
    Linear,
    /// Value of the closest observation.
    Nearest,
}

impl InterpolationMethod {
    /// Parse from string (case-insensitive). Unknown names are rejected
    /// rather than mapped to a default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }

    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Nearest => "nearest",
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
