//! Global layout settings understood by the layout engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Direction in which ranks are laid out.
///
/// The names match the Graphviz `rankdir` values and external configuration
/// strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Orientation {
    /// Left to right (default)
    #[default]
    LR,
    /// Top to bottom
    TB,
    /// Right to left
    RL,
    /// Bottom to top
    BT,
}

impl Orientation {
    pub fn to_dot_value(self) -> &'static str {
        match self {
            Self::LR => "LR",
            Self::TB => "TB",
            Self::RL => "RL",
            Self::BT => "BT",
        }
    }
}

impl FromStr for Orientation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LR),
            "TB" => Ok(Self::TB),
            "RL" => Ok(Self::RL),
            "BT" => Ok(Self::BT),
            _ => Err(ValueError::Orientation(s.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_dot_value())
    }
}

/// Edge routing mode, mapped to the Graphviz `splines` graph attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Splines {
    /// Axis-aligned segments (default)
    #[default]
    Ortho,
    Spline,
    Polyline,
    Line,
    Curved,
}

impl Splines {
    pub fn to_dot_value(self) -> &'static str {
        match self {
            Self::Ortho => "ortho",
            Self::Spline => "spline",
            Self::Polyline => "polyline",
            Self::Line => "line",
            Self::Curved => "curved",
        }
    }
}

impl FromStr for Splines {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ortho" => Ok(Self::Ortho),
            "spline" => Ok(Self::Spline),
            "polyline" => Ok(Self::Polyline),
            "line" => Ok(Self::Line),
            "curved" => Ok(Self::Curved),
            _ => Err(ValueError::Splines(s.to_string())),
        }
    }
}

impl fmt::Display for Splines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_dot_value())
    }
}
