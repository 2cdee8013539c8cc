//! Configuration types for Rampart diagram rendering.
//!
//! This module provides configuration structures that set the defaults every
//! diagram starts from. All types implement [`serde::Deserialize`] for loading
//! from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Orientation, spacing and edge routing.
//! - [`StyleConfig`] - Background color and title font size.
//! - [`RenderConfig`] - Layout engine timeout.
//!
//! # Example
//!
//! ```
//! # use rampart::config::AppConfig;
//! let config = AppConfig::default();
//! let options = config.diagram_options().unwrap();
//! assert_eq!(options.node_spacing(), 0.8);
//! ```

use std::time::Duration;

use serde::Deserialize;

use rampart_core::{
    color::Color,
    layout::{Orientation, Splines},
};

use crate::{error::RampartError, options::DiagramOptions, render::DEFAULT_TIMEOUT};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig, render: RenderConfig) -> Self {
        Self {
            layout,
            style,
            render,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Builds the [`DiagramOptions`] new sessions start from.
    ///
    /// # Errors
    ///
    /// Returns [`RampartError::Config`] if the configured background color
    /// cannot be parsed.
    pub fn diagram_options(&self) -> Result<DiagramOptions, RampartError> {
        let mut options = DiagramOptions::default()
            .with_orientation(self.layout.orientation)
            .with_splines(self.layout.splines);

        if let Some(spacing) = self.layout.node_spacing {
            options = options.with_node_spacing(spacing);
        }
        if let Some(spacing) = self.layout.rank_spacing {
            options = options.with_rank_spacing(spacing);
        }
        if let Some(background) = self.style.background_color()? {
            options = options.with_background(background);
        }
        if let Some(font_size) = self.style.font_size {
            options = options.with_font_size(font_size);
        }

        Ok(options)
    }
}

/// Layout defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(default)]
    orientation: Orientation,

    #[serde(default)]
    splines: Splines,

    /// Space between nodes of one rank, in inches.
    #[serde(default)]
    node_spacing: Option<f64>,

    /// Space between ranks, in inches.
    #[serde(default)]
    rank_spacing: Option<f64>,
}

impl LayoutConfig {
    pub fn new(orientation: Orientation, splines: Splines) -> Self {
        Self {
            orientation,
            splines,
            node_spacing: None,
            rank_spacing: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn splines(&self) -> Splines {
        self.splines
    }
}

/// Visual styling defaults. Unset fields fall back to [`DiagramOptions`]
/// defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Background color, as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Title font size in points.
    #[serde(default)]
    font_size: Option<f64>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, RampartError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| RampartError::Config(format!("invalid background color: {err}")))
    }
}

/// Render defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Seconds to wait for the layout engine.
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl RenderConfig {
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        let options = config.diagram_options().unwrap();

        assert_eq!(options, DiagramOptions::default());
        assert_eq!(config.render().timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_toml() {
        let config: AppConfig = toml::from_str(
            r##"
            [layout]
            orientation = "TB"
            splines = "polyline"
            rank_spacing = 2.5

            [style]
            background_color = "#f0f0f0"
            font_size = 20

            [render]
            timeout_secs = 5
            "##,
        )
        .unwrap();

        let options = config.diagram_options().unwrap();
        assert_eq!(options.orientation(), Orientation::TB);
        assert_eq!(options.splines(), Splines::Polyline);
        assert_eq!(options.rank_spacing(), 2.5);
        assert_eq!(options.node_spacing(), 0.8);
        assert_eq!(options.font_size(), 20.0);
        assert_eq!(options.background(), Color::new("#f0f0f0").unwrap());
        assert_eq!(config.render().timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_background() {
        let config: AppConfig =
            toml::from_str("[style]\nbackground_color = \"chartreuse-ish\"").unwrap();
        assert!(matches!(
            config.diagram_options(),
            Err(RampartError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[layout]\ndirection = \"LR\"");
        assert!(result.is_err());
    }
}
