//! Edge styling.
//!
//! Exported types:
//! - [`LineStyle`]: line pattern of an edge (solid, dashed, dotted, bold)
//! - [`EdgeStyle`]: complete style descriptor carried by every edge
//!
//! # Quick Start
//!
//! ```
//! use rampart_core::color::Color;
//! use rampart_core::style::{EdgeStyle, LineStyle};
//!
//! // Plain black solid edge
//! let plain = EdgeStyle::default();
//!
//! // Labeled dashed edge
//! let oidc = EdgeStyle::new(Color::new("purple").unwrap())
//!     .with_line(LineStyle::Dashed)
//!     .with_label("OIDC Auth");
//!
//! assert_ne!(plain, oidc);
//! assert_eq!(oidc.label(), Some("OIDC Auth"));
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{color::Color, error::ValueError};

/// Line pattern of an edge.
///
/// Each variant maps to the Graphviz `style` edge attribute of the same name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Continuous line (default)
    #[default]
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Continuous line drawn with a heavier stroke
    Bold,
}

impl LineStyle {
    /// Returns the Graphviz `style` attribute value.
    pub fn to_dot_value(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
        }
    }
}

impl FromStr for LineStyle {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "bold" => Ok(Self::Bold),
            _ => Err(ValueError::LineStyle(s.to_string())),
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_dot_value())
    }
}

/// Style descriptor of one edge: color, line pattern and optional label.
///
/// Provides both mutable (`set_*`) and immutable (`with_*`) APIs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct EdgeStyle {
    color: Color,
    line: LineStyle,
    label: Option<String>,
}

impl EdgeStyle {
    /// Creates a solid, unlabeled style in the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            line: LineStyle::Solid,
            label: None,
        }
    }

    /// Creates a dashed, unlabeled style in the given color.
    pub fn dashed(color: Color) -> Self {
        Self::new(color).with_line(LineStyle::Dashed)
    }

    /// Creates a dotted, unlabeled style in the given color.
    pub fn dotted(color: Color) -> Self {
        Self::new(color).with_line(LineStyle::Dotted)
    }

    /// Creates a bold, unlabeled style in the given color.
    pub fn bold(color: Color) -> Self {
        Self::new(color).with_line(LineStyle::Bold)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_line(&mut self, line: LineStyle) {
        self.line = line;
    }

    /// Sets the label. Empty labels are stored as no label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.label = (!label.is_empty()).then_some(label);
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.set_line(line);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(label);
        self
    }
}
