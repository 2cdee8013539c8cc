//! Color handling for diagram elements.
//!
//! [`Color`] wraps the `DynamicColor` type from the color crate, so any CSS
//! color string (`"firebrick"`, `"#ff8000"`, `"rgb(0 0 255)"`) is accepted and
//! validated when an edge or a diagram background is declared, long before the
//! layout engine sees it.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

use crate::error::ValueError;

/// A validated CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rampart_core::color::Color;
    ///
    /// let purple = Color::new("purple").unwrap();
    /// assert_eq!(purple.to_hex(), "#800080ff");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, ValueError> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| ValueError::Color {
                value: color_str.to_string(),
                reason: err.to_string(),
            })
    }

    /// Returns the color as an `#rrggbbaa` string.
    ///
    /// Graphviz accepts this form for every color attribute, which keeps the
    /// emitted document independent of the engine's own color-name tables.
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            rgba.r, rgba.g, rgba.b, rgba.a
        )
    }

    /// Returns a copy of this color with the given alpha component.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}
