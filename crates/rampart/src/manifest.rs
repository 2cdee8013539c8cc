//! Diagram manifests.
//!
//! A manifest is a TOML document describing one diagram. Loading it replays
//! the document through the [`Session`] API in document order, so a manifest
//! fails with exactly the construction error the equivalent code would raise.
//!
//! ```toml
//! title = "EKS Integrated Security Architecture"
//!
//! [options]
//! orientation = "LR"
//!
//! [[members]]
//! region = "Edge Security"
//! members = [
//!     { key = "route53", label = "Global DNS", kind = "network" },
//!     { key = "waf", label = "L7 Firewall", kind = "security-control" },
//! ]
//! edges = [{ from = "route53", to = "waf" }]
//!
//! [[members]]
//! key = "auth0"
//! label = "Auth0"
//! kind = "custom-icon"
//! asset = "icons/auth0.png"
//!
//! [[edges]]
//! from = "auth0"
//! to = "waf"
//! color = "purple"
//! style = "dashed"
//! label = "OIDC Auth"
//! ```
//!
//! Regions may carry their own `edges`; they are connected after the region's
//! members and before the region closes. Top-level `edges` are connected last.

use std::{fmt, ops::Range, path::Path};

use log::{debug, info};
use serde::Deserialize;

use rampart_core::{
    color::Color,
    error::ValueError,
    kind::NodeKind,
    layout::{Orientation, Splines},
    style::{EdgeStyle, LineStyle},
};

use crate::{
    asset::FsAssetResolver, error::RampartError, options::DiagramOptions, session::Session,
};

/// A manifest that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestError {
    message: String,
    span: Option<Range<usize>>,
}

impl ManifestError {
    pub fn new(message: impl Into<String>, span: Option<Range<usize>>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte range in the manifest source the error refers to, when known.
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ManifestError {}

impl From<toml::de::Error> for ManifestError {
    fn from(err: toml::de::Error) -> Self {
        Self::new(err.message(), err.span())
    }
}

impl From<ValueError> for ManifestError {
    fn from(err: ValueError) -> Self {
        Self::new(err.to_string(), None)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    title: String,
    #[serde(default)]
    options: OptionsSpec,
    #[serde(default)]
    members: Vec<MemberSpec>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsSpec {
    orientation: Option<Orientation>,
    node_spacing: Option<f64>,
    rank_spacing: Option<f64>,
    background: Option<String>,
    font_size: Option<f64>,
    splines: Option<Splines>,
    show: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MemberSpec {
    Region(RegionSpec),
    Node(NodeSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionSpec {
    region: String,
    #[serde(default)]
    members: Vec<MemberSpec>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeSpec {
    key: String,
    label: Option<String>,
    kind: NodeKind,
    asset: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeSpec {
    from: String,
    to: String,
    color: Option<String>,
    style: Option<LineStyle>,
    label: Option<String>,
}

impl OptionsSpec {
    fn apply(&self, mut options: DiagramOptions) -> Result<DiagramOptions, ManifestError> {
        if let Some(orientation) = self.orientation {
            options = options.with_orientation(orientation);
        }
        if let Some(spacing) = self.node_spacing {
            options = options.with_node_spacing(spacing);
        }
        if let Some(spacing) = self.rank_spacing {
            options = options.with_rank_spacing(spacing);
        }
        if let Some(background) = &self.background {
            options = options.with_background(Color::new(background)?);
        }
        if let Some(font_size) = self.font_size {
            options = options.with_font_size(font_size);
        }
        if let Some(splines) = self.splines {
            options = options.with_splines(splines);
        }
        if let Some(show) = self.show {
            options = options.with_show(show);
        }
        Ok(options)
    }
}

impl EdgeSpec {
    fn style(&self) -> Result<EdgeStyle, ManifestError> {
        let mut style = EdgeStyle::default().with_line(self.style.unwrap_or_default());
        if let Some(color) = &self.color {
            style.set_color(Color::new(color)?);
        }
        if let Some(label) = &self.label {
            style.set_label(label.as_str());
        }
        Ok(style)
    }
}

/// Decodes `source` and replays it into a new, uncompiled [`Session`].
///
/// Manifest options override `defaults`; custom-icon assets resolve relative
/// to `base_dir`.
///
/// # Errors
///
/// [`RampartError::Parse`] when the document is not a valid manifest or names
/// an invalid color; [`RampartError::Build`] for the first construction error.
pub fn load(
    source: &str,
    base_dir: impl AsRef<Path>,
    defaults: DiagramOptions,
) -> Result<Session, RampartError> {
    let parse_error = |err: ManifestError| RampartError::new_parse_error(err, source);

    let manifest: Manifest = toml::from_str(source)
        .map_err(ManifestError::from)
        .map_err(parse_error)?;
    let options = manifest.options.apply(defaults).map_err(parse_error)?;

    info!(title = manifest.title.as_str(), members = manifest.members.len(); "Loading manifest");

    let mut session = Session::begin(manifest.title.as_str(), options)
        .with_assets(FsAssetResolver::new(base_dir.as_ref()));

    replay_members(&mut session, &manifest.members, source)?;
    replay_edges(&mut session, &manifest.edges, source)?;

    debug!(
        nodes = session.node_count(),
        edges = session.edge_count(),
        regions = session.region_count();
        "Manifest replayed"
    );
    Ok(session)
}

fn replay_members(
    session: &mut Session,
    members: &[MemberSpec],
    source: &str,
) -> Result<(), RampartError> {
    for member in members {
        match member {
            MemberSpec::Node(node) => {
                session.declare(
                    &node.key,
                    node.label.as_deref().unwrap_or(&node.key),
                    node.kind,
                    node.asset.as_deref(),
                )?;
            }
            MemberSpec::Region(region) => {
                let handle = session.open_region(&region.region)?;
                replay_members(session, &region.members, source)?;
                replay_edges(session, &region.edges, source)?;
                session.close_region(handle)?;
            }
        }
    }
    Ok(())
}

fn replay_edges(
    session: &mut Session,
    edges: &[EdgeSpec],
    source: &str,
) -> Result<(), RampartError> {
    for edge in edges {
        let style = edge
            .style()
            .map_err(|err| RampartError::new_parse_error(err, source))?;
        session.connect(&edge.from, &edge.to, style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::BuildError;

    const EDGE_SECURITY: &str = r#"
        title = "Edge"

        [options]
        orientation = "TB"
        show = false

        [[members]]
        region = "Edge Security"
        members = [
            { key = "route53", label = "Global DNS", kind = "network" },
            { key = "shield", label = "DDoS Protection", kind = "security-control" },
        ]
        edges = [{ from = "route53", to = "shield" }]

        [[members]]
        key = "lambda"
        kind = "compute"

        [[edges]]
        from = "lambda"
        to = "shield"
        color = "red"
        style = "bold"
        label = "Auto-Block"
    "#;

    #[test]
    fn test_load_replays_in_order() {
        let session = load(EDGE_SECURITY, ".", DiagramOptions::default()).unwrap();
        assert_eq!(session.options().orientation(), Orientation::TB);

        let graph = session.compile().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.region_count(), 1);
        assert_eq!(graph.node("lambda").unwrap().label(), "lambda");

        let edge = &graph.edges_between("lambda", "shield")[0];
        assert_eq!(edge.style().line(), LineStyle::Bold);
        assert_eq!(edge.style().label(), Some("Auto-Block"));
    }

    #[test]
    fn test_syntax_error_has_span() {
        let err = load("title = ", ".", DiagramOptions::default()).unwrap_err();
        match err {
            RampartError::Parse { err, src } => {
                assert!(err.span().is_some());
                assert_eq!(src, "title = ");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let source = r#"
            title = "x"
            [[members]]
            key = "db"
            kind = "database"
        "#;
        assert!(matches!(
            load(source, ".", DiagramOptions::default()),
            Err(RampartError::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_edge_color_is_parse_error() {
        let source = r#"
            title = "x"
            members = [{ key = "a", kind = "network" }]
            edges = [{ from = "a", to = "a", color = "blurple" }]
        "#;
        let err = load(source, ".", DiagramOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            RampartError::Parse { ref err, .. } if err.message().contains("blurple")
        ));
    }

    #[test]
    fn test_build_errors_surface_unchanged() {
        let source = r#"
            title = "x"
            members = [{ key = "alb", kind = "network" }]
            edges = [{ from = "ghost", to = "alb" }]
        "#;
        let err = load(source, ".", DiagramOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            RampartError::Build(BuildError::UnknownNode { ref key }) if key == "ghost"
        ));
    }

    #[test]
    fn test_duplicate_key_across_regions() {
        let source = r#"
            title = "x"
            [[members]]
            region = "A"
            members = [{ key = "svc", kind = "compute" }]
            [[members]]
            region = "B"
            members = [{ key = "svc", kind = "compute" }]
        "#;
        assert!(matches!(
            load(source, ".", DiagramOptions::default()),
            Err(RampartError::Build(BuildError::DuplicateKey { .. }))
        ));
    }

    #[test]
    fn test_assets_resolve_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("icons")).unwrap();
        fs::write(dir.path().join("icons").join("auth0.png"), b"png").unwrap();

        let source = r#"
            title = "x"
            members = [{ key = "auth0", kind = "custom-icon", asset = "icons/auth0.png" }]
        "#;
        let graph = load(source, dir.path(), DiagramOptions::default())
            .unwrap()
            .compile()
            .unwrap();

        let asset = graph.node("auth0").unwrap().asset().unwrap();
        assert_eq!(asset.location(), dir.path().join("icons").join("auth0.png"));
    }
}
