//! The closed catalog of node kinds.
//!
//! A node's kind decides how it is drawn. The catalog is intentionally closed:
//! anything that does not fit one of the built-in tiers is declared as
//! [`NodeKind::CustomIcon`] together with an asset reference.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Visual and semantic category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// DNS, CDN, load balancers and other traffic plumbing.
    Network,
    /// Firewalls, DDoS protection, scanners and posture management.
    SecurityControl,
    /// Clusters, functions and other workloads.
    Compute,
    /// Event buses and glue services.
    Integration,
    /// Third-party hosted services (source control, SIEM, chat).
    #[serde(rename = "external-saas")]
    ExternalSaas,
    /// A node drawn from an image asset.
    CustomIcon,
}

/// How a node kind is presented by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPresentation {
    /// Graphviz shape name.
    pub shape: &'static str,
    /// Fill color as a CSS color string, `None` for unfilled nodes.
    pub fill: Option<&'static str>,
}

impl NodeKind {
    /// Every kind, in catalog order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Network,
        NodeKind::SecurityControl,
        NodeKind::Compute,
        NodeKind::Integration,
        NodeKind::ExternalSaas,
        NodeKind::CustomIcon,
    ];

    /// Returns `true` when nodes of this kind must carry an asset reference.
    pub fn requires_asset(self) -> bool {
        matches!(self, NodeKind::CustomIcon)
    }

    /// Returns the shape and fill used for nodes of this kind.
    pub fn presentation(self) -> KindPresentation {
        match self {
            NodeKind::Network => KindPresentation {
                shape: "box",
                fill: Some("#dbe9f6"),
            },
            NodeKind::SecurityControl => KindPresentation {
                shape: "hexagon",
                fill: Some("#f8d7d3"),
            },
            NodeKind::Compute => KindPresentation {
                shape: "box3d",
                fill: Some("#fde6c4"),
            },
            NodeKind::Integration => KindPresentation {
                shape: "cds",
                fill: Some("#f4dcef"),
            },
            NodeKind::ExternalSaas => KindPresentation {
                shape: "component",
                fill: Some("#e0e0e0"),
            },
            NodeKind::CustomIcon => KindPresentation {
                shape: "none",
                fill: None,
            },
        }
    }
}

impl From<NodeKind> for &'static str {
    fn from(val: NodeKind) -> Self {
        match val {
            NodeKind::Network => "network",
            NodeKind::SecurityControl => "security-control",
            NodeKind::Compute => "compute",
            NodeKind::Integration => "integration",
            NodeKind::ExternalSaas => "external-saas",
            NodeKind::CustomIcon => "custom-icon",
        }
    }
}

impl FromStr for NodeKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "network" => Ok(Self::Network),
            "security-control" => Ok(Self::SecurityControl),
            "compute" => Ok(Self::Compute),
            "integration" => Ok(Self::Integration),
            "external-saas" => Ok(Self::ExternalSaas),
            "custom-icon" => Ok(Self::CustomIcon),
            _ => Err(ValueError::NodeKind(s.to_string())),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_str_agree() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.to_string().parse::<NodeKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_from_str_is_lenient_about_case_and_underscores() {
        assert_eq!(
            "Security_Control".parse::<NodeKind>(),
            Ok(NodeKind::SecurityControl)
        );
        assert!("database".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_only_custom_icon_requires_asset() {
        let requiring: Vec<_> = NodeKind::ALL
            .into_iter()
            .filter(|kind| kind.requires_asset())
            .collect();
        assert_eq!(requiring, vec![NodeKind::CustomIcon]);
    }

    #[test]
    fn test_custom_icon_is_unfilled() {
        let presentation = NodeKind::CustomIcon.presentation();
        assert_eq!(presentation.shape, "none");
        assert!(presentation.fill.is_none());
    }
}
