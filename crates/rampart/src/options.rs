//! Global rendering options of one diagram.

use rampart_core::{
    color::Color,
    layout::{Orientation, Splines},
};

/// Graph-wide settings carried from session to layout engine.
///
/// # Examples
///
/// ```
/// use rampart::options::DiagramOptions;
/// use rampart::layout::Orientation;
///
/// let options = DiagramOptions::default()
///     .with_orientation(Orientation::TB)
///     .with_rank_spacing(2.0);
/// assert_eq!(options.orientation(), Orientation::TB);
/// assert!(!options.show());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramOptions {
    orientation: Orientation,
    node_spacing: f64,
    rank_spacing: f64,
    background: Color,
    font_size: f64,
    splines: Splines,
    show: bool,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::LR,
            node_spacing: 0.8,
            rank_spacing: 1.2,
            background: Color::new("white").expect("'white' is a valid CSS color"),
            font_size: 16.0,
            splines: Splines::Ortho,
            show: false,
        }
    }
}

impl DiagramOptions {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Minimum space between nodes of the same rank, in inches.
    pub fn node_spacing(&self) -> f64 {
        self.node_spacing
    }

    /// Minimum space between ranks, in inches.
    pub fn rank_spacing(&self) -> f64 {
        self.rank_spacing
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Font size of the diagram title, in points.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn splines(&self) -> Splines {
        self.splines
    }

    /// Whether the artifact is opened in a viewer after rendering.
    pub fn show(&self) -> bool {
        self.show
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_node_spacing(mut self, spacing: f64) -> Self {
        self.node_spacing = spacing;
        self
    }

    pub fn with_rank_spacing(mut self, spacing: f64) -> Self {
        self.rank_spacing = spacing;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_splines(mut self, splines: Splines) -> Self {
        self.splines = splines;
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}
