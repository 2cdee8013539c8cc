//! Errors raised while interpreting textual attribute values.

use thiserror::Error;

/// A textual attribute value that does not name a known variant.
///
/// Raised by the `FromStr` implementations of the core types, for example when
/// a manifest names an unknown color, line style or node kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid color `{value}`: {reason}")]
    Color { value: String, reason: String },

    #[error("invalid line style `{0}`, valid values: solid, dashed, dotted, bold")]
    LineStyle(String),

    #[error(
        "invalid node kind `{0}`, valid values: network, security-control, compute, integration, external-saas, custom-icon"
    )]
    NodeKind(String),

    #[error("invalid orientation `{0}`, valid values: LR, TB, RL, BT")]
    Orientation(String),

    #[error("invalid spline routing `{0}`, valid values: ortho, spline, polyline, line, curved")]
    Splines(String),
}
