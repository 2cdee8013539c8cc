//! Diagram sessions.
//!
//! A [`Session`] accumulates nodes, regions and edges for exactly one
//! diagram, then is consumed by [`Session::compile`]. Construction is
//! fail-fast: the first error aborts the session, which from then on rejects
//! every mutation with [`BuildError::SessionAborted`] while its accessors keep
//! reporting the state reached before the failure.
//!
//! # Examples
//!
//! ```
//! use rampart::{Session, options::DiagramOptions, kind::NodeKind, style::EdgeStyle};
//!
//! let mut session = Session::begin("Edge", DiagramOptions::default());
//! session.region("Edge Security", |s| {
//!     s.declare("route53", "Global DNS", NodeKind::Network, None)?;
//!     s.declare("shield", "DDoS Protection", NodeKind::SecurityControl, None)?;
//!     s.connect("route53", "shield", EdgeStyle::default())?;
//!     Ok(())
//! })?;
//!
//! let graph = session.compile()?;
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.region_count(), 1);
//! # Ok::<(), rampart::BuildError>(())
//! ```

use std::fmt;

use log::{debug, info, trace, warn};

use rampart_core::{identifier::Id, kind::NodeKind, style::EdgeStyle};

use crate::{
    asset::{AssetRef, AssetResolver, FsAssetResolver},
    error::BuildError,
    options::DiagramOptions,
    resolved::ResolvedGraph,
    structure::{ClusterTree, EdgeHandle, EdgeSet, NodeHandle, NodeRegistry, RegionHandle},
};

/// Construction state of one diagram.
pub struct Session {
    title: String,
    options: DiagramOptions,
    registry: NodeRegistry,
    tree: ClusterTree,
    edges: EdgeSet,
    assets: Box<dyn AssetResolver>,
    aborted: Option<BuildError>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("title", &self.title)
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("tree", &self.tree)
            .field("edges", &self.edges)
            .field("aborted", &self.aborted)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts a session. Custom-icon assets resolve relative to the current
    /// directory until [`Session::with_assets`] installs another resolver.
    pub fn begin(title: impl Into<String>, options: DiagramOptions) -> Self {
        let title = title.into();
        info!(title; "Diagram session started");
        Self {
            title,
            options,
            registry: NodeRegistry::new(),
            tree: ClusterTree::new(),
            edges: EdgeSet::new(),
            assets: Box::new(FsAssetResolver::default()),
            aborted: None,
        }
    }

    /// Replaces the asset resolver used by later [`Session::declare`] calls.
    pub fn with_assets(mut self, resolver: impl AssetResolver + 'static) -> Self {
        self.assets = Box::new(resolver);
        self
    }

    /// Declares a node in the innermost open region (or the root).
    ///
    /// # Errors
    ///
    /// [`BuildError::DuplicateKey`] if the key exists anywhere in the session;
    /// [`BuildError::MissingAsset`] if a custom-icon node has no resolvable
    /// asset.
    pub fn declare(
        &mut self,
        key: &str,
        label: &str,
        kind: NodeKind,
        asset: Option<&str>,
    ) -> Result<NodeHandle, BuildError> {
        self.guarded(|session| {
            let region = session.tree.current();
            let handle = session.registry.declare(
                key,
                label,
                kind,
                asset.map(AssetRef::from),
                region,
                session.assets.as_ref(),
            )?;
            session.tree.attach_node(Id::new(key));
            debug!(key, kind:%, region:? = region.map(RegionHandle::index); "Node declared");
            Ok(handle)
        })
    }

    /// Opens a region nested in the innermost open region.
    pub fn open_region(&mut self, label: &str) -> Result<RegionHandle, BuildError> {
        self.guarded(|session| session.tree.open_region(label))
    }

    /// Closes the innermost open region.
    ///
    /// # Errors
    ///
    /// [`BuildError::ScopeViolation`] if `handle` is not the innermost open
    /// region or is already closed.
    pub fn close_region(&mut self, handle: RegionHandle) -> Result<(), BuildError> {
        self.guarded(|session| session.tree.close_region(handle))
    }

    /// Opens a region, runs `body` inside it and closes it again.
    ///
    /// This is the lexical form of [`Session::open_region`] /
    /// [`Session::close_region`]: the body cannot leave the region open or
    /// close it out of order. If the body fails the region stays open, which
    /// is harmless because the session is already aborted.
    pub fn region<F>(&mut self, label: &str, body: F) -> Result<RegionHandle, BuildError>
    where
        F: FnOnce(&mut Session) -> Result<(), BuildError>,
    {
        let handle = self.open_region(label)?;
        body(self)?;
        self.close_region(handle)?;
        Ok(handle)
    }

    /// Connects two declared nodes.
    ///
    /// # Errors
    ///
    /// [`BuildError::UnknownNode`] if either key has not been declared yet.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        style: EdgeStyle,
    ) -> Result<EdgeHandle, BuildError> {
        self.guarded(|session| session.edges.connect(&session.registry, source, target, style))
    }

    /// Validates the session and produces the resolved graph.
    ///
    /// Performs one validation pass and returns the first problem found: the
    /// error that aborted the session, a region left open, a custom-icon node
    /// without an asset, or an edge with an unknown endpoint.
    pub fn compile(self) -> Result<ResolvedGraph, BuildError> {
        info!(title = self.title; "Compiling diagram");

        if let Some(err) = self.aborted {
            warn!(error:% = err; "Compiling an aborted session");
            return Err(err);
        }

        if let Some(region) = self.tree.first_unclosed() {
            return Err(BuildError::ScopeViolation {
                region: region.path().to_string(),
                reason: "region was opened but never closed".to_string(),
            });
        }

        if let Some(node) = self
            .registry
            .iter()
            .find(|node| node.kind().requires_asset() && node.asset().is_none())
        {
            return Err(BuildError::MissingAsset {
                key: node.key().to_string(),
                asset: None,
                reason: "asset was not resolved".to_string(),
            });
        }

        for edge in self.edges.iter() {
            for endpoint in [edge.source(), edge.target()] {
                if !self.registry.contains(endpoint) {
                    return Err(BuildError::UnknownNode {
                        key: endpoint.to_string(),
                    });
                }
            }
        }

        let layout = self.tree.flatten();
        let graph = ResolvedGraph::new(
            self.title,
            self.options,
            self.registry.into_inner(),
            layout,
            self.edges.into_inner(),
        );

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            regions = graph.region_count();
            "Diagram compiled"
        );
        trace!(graph:?; "Resolved graph");

        Ok(graph)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn region_count(&self) -> usize {
        self.tree.region_count()
    }

    /// Number of regions currently open.
    pub fn open_depth(&self) -> usize {
        self.tree.open_depth()
    }

    /// The error that aborted this session, if any.
    pub fn aborted(&self) -> Option<&BuildError> {
        self.aborted.as_ref()
    }

    /// Runs a mutation unless the session is aborted; aborts it on failure.
    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        if let Some(cause) = &self.aborted {
            return Err(BuildError::SessionAborted {
                cause: Box::new(cause.clone()),
            });
        }

        op(self).inspect_err(|err| {
            warn!(error:% = err; "Diagram session aborted");
            self.aborted = Some(err.clone());
        })
    }
}

#[cfg(test)]
mod tests {
    use rampart_core::color::Color;

    use super::*;
    use crate::asset::AssetCatalog;

    fn session() -> Session {
        Session::begin("test", DiagramOptions::default())
            .with_assets(AssetCatalog::new().with("auth0.png", "/icons/auth0.png"))
    }

    #[test]
    fn test_declare_inside_region() {
        let mut s = session();
        let region = s.open_region("Edge Security").unwrap();
        s.declare("waf", "L7 Firewall", NodeKind::SecurityControl, None)
            .unwrap();
        s.close_region(region).unwrap();
        s.declare("auth0", "Auth0", NodeKind::CustomIcon, Some("auth0.png"))
            .unwrap();

        let graph = s.compile().unwrap();
        assert_eq!(graph.node("waf").unwrap().region(), Some(region));
        assert_eq!(graph.node("auth0").unwrap().region(), None);
    }

    #[test]
    fn test_error_aborts_session() {
        let mut s = session();
        s.declare("alb", "ALB", NodeKind::Network, None).unwrap();

        let err = s
            .connect("ghost", "alb", EdgeStyle::default())
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownNode { .. }));
        assert_eq!(s.aborted(), Some(&err));

        let later = s.declare("eks", "EKS", NodeKind::Compute, None).unwrap_err();
        assert!(matches!(later, BuildError::SessionAborted { .. }));
        assert_eq!(later.root_cause(), &err);
        assert_eq!(s.node_count(), 1);

        assert_eq!(s.compile().unwrap_err(), err);
    }

    #[test]
    fn test_compile_rejects_open_region() {
        let mut s = session();
        s.open_region("VPC").unwrap();
        s.declare("eks", "EKS", NodeKind::Compute, None).unwrap();

        let err = s.compile().unwrap_err();
        assert!(matches!(
            err,
            BuildError::ScopeViolation { ref region, .. } if region == "VPC"
        ));
    }

    #[test]
    fn test_region_closure_closes() {
        let mut s = session();
        s.region("VPC", |s| {
            s.region("Public Subnet", |s| {
                s.declare("alb", "ALB", NodeKind::Network, None)?;
                Ok(())
            })?;
            s.declare("nat", "NAT", NodeKind::Network, None)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(s.open_depth(), 0);
        let graph = s.compile().unwrap();
        assert_eq!(
            graph.region_nodes("VPC::Public Subnet"),
            Some(vec![Id::new("alb")])
        );
        assert_eq!(graph.region_nodes("VPC"), Some(vec![Id::new("nat")]));
    }

    #[test]
    fn test_region_closure_failure_aborts() {
        let mut s = session();
        let err = s
            .region("Governance", |s| {
                s.declare("prowler", "Prowler", NodeKind::CustomIcon, Some("prowler.png"))?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, BuildError::MissingAsset { .. }));
        assert_eq!(s.open_depth(), 1);
        assert!(s.aborted().is_some());
    }

    #[test]
    fn test_compile_keeps_title_and_options() {
        let options = DiagramOptions::default().with_show(true);
        let mut s = Session::begin("EKS", options.clone());
        s.declare("eks", "EKS", NodeKind::Compute, None).unwrap();
        s.connect(
            "eks",
            "eks",
            EdgeStyle::bold(Color::new("red").unwrap()),
        )
        .unwrap();

        let graph = s.compile().unwrap();
        assert_eq!(graph.title(), "EKS");
        assert_eq!(graph.options(), &options);
        assert_eq!(graph.edge_count(), 1);
    }
}
