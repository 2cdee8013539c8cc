//! Node registry.
//!
//! Holds every declared node keyed by its diagram-wide [`Id`]. Keys are unique
//! across the whole session, not per region, so two conceptually distinct
//! nodes that happen to share a key in different regions are rejected rather
//! than merged.

use indexmap::IndexMap;
use log::debug;

use rampart_core::{identifier::Id, kind::NodeKind};

use crate::{
    asset::{AssetRef, AssetResolver, ResolvedAsset},
    error::BuildError,
    structure::cluster::RegionHandle,
};

/// Position of a node in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A declared node. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: Id,
    label: String,
    kind: NodeKind,
    asset: Option<ResolvedAsset>,
    region: Option<RegionHandle>,
}

impl Node {
    pub fn key(&self) -> Id {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The resolved image of a custom-icon node.
    pub fn asset(&self) -> Option<&ResolvedAsset> {
        self.asset.as_ref()
    }

    /// The region the node was declared in, `None` for the root.
    pub fn region(&self) -> Option<RegionHandle> {
        self.region
    }
}

/// Declaration-ordered mapping from node key to [`Node`].
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    nodes: IndexMap<Id, Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node.
    ///
    /// The key is checked first; a custom-icon node then needs an asset that
    /// `resolver` can resolve. Nothing is registered when either check fails.
    ///
    /// # Errors
    ///
    /// - [`BuildError::DuplicateKey`] if `key` is already registered
    /// - [`BuildError::MissingAsset`] if `kind` requires an asset and `asset`
    ///   is absent or unresolvable
    pub fn declare(
        &mut self,
        key: &str,
        label: &str,
        kind: NodeKind,
        asset: Option<AssetRef>,
        region: Option<RegionHandle>,
        resolver: &dyn AssetResolver,
    ) -> Result<NodeHandle, BuildError> {
        let id = Id::new(key);
        if self.nodes.contains_key(&id) {
            return Err(BuildError::DuplicateKey {
                key: key.to_string(),
            });
        }

        let asset = match (kind.requires_asset(), asset) {
            (true, None) => {
                return Err(BuildError::MissingAsset {
                    key: key.to_string(),
                    asset: None,
                    reason: format!("{kind} nodes need an asset reference"),
                });
            }
            (true, Some(asset)) => {
                let resolved = resolver
                    .resolve(&asset)
                    .map_err(|err| BuildError::MissingAsset {
                        key: key.to_string(),
                        asset: Some(asset.to_string()),
                        reason: err.to_string(),
                    })?;
                Some(resolved)
            }
            (false, Some(asset)) => {
                debug!(
                    key,
                    asset = asset.as_str(),
                    kind:%;
                    "Ignoring asset on a built-in node kind"
                );
                None
            }
            (false, None) => None,
        };

        let (index, _) = self.nodes.insert_full(
            id,
            Node {
                key: id,
                label: label.to_string(),
                kind,
                asset,
                region,
            },
        );
        Ok(NodeHandle(index))
    }

    pub fn get(&self, key: Id) -> Option<&Node> {
        self.nodes.get(&key)
    }

    pub fn get_by_handle(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get_index(handle.0).map(|(_, node)| node)
    }

    pub fn contains(&self, key: Id) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates nodes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn into_inner(self) -> IndexMap<Id, Node> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetCatalog;

    fn catalog() -> AssetCatalog {
        AssetCatalog::new().with("auth0.png", "/icons/auth0.png")
    }

    #[test]
    fn test_declare_preserves_order() {
        let mut registry = NodeRegistry::new();
        let resolver = catalog();

        let a = registry
            .declare("route53", "Global DNS", NodeKind::Network, None, None, &resolver)
            .unwrap();
        let b = registry
            .declare("shield", "DDoS Protection", NodeKind::SecurityControl, None, None, &resolver)
            .unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        let keys: Vec<_> = registry.iter().map(|n| n.key()).collect();
        assert_eq!(keys, vec![Id::new("route53"), Id::new("shield")]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = NodeRegistry::new();
        let resolver = catalog();
        registry
            .declare("eks", "EKS Cluster", NodeKind::Compute, None, None, &resolver)
            .unwrap();

        let err = registry
            .declare("eks", "Other", NodeKind::Compute, None, None, &resolver)
            .unwrap_err();

        assert_eq!(
            err,
            BuildError::DuplicateKey {
                key: "eks".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(Id::new("eks")).unwrap().label(), "EKS Cluster");
    }

    #[test]
    fn test_custom_icon_requires_asset() {
        let mut registry = NodeRegistry::new();
        let err = registry
            .declare("auth0", "Auth0", NodeKind::CustomIcon, None, None, &catalog())
            .unwrap_err();

        assert!(matches!(err, BuildError::MissingAsset { asset: None, .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_custom_icon_unresolvable_asset() {
        let mut registry = NodeRegistry::new();
        let err = registry
            .declare(
                "prowler",
                "Prowler",
                NodeKind::CustomIcon,
                Some(AssetRef::new("prowler.png")),
                None,
                &catalog(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::MissingAsset { asset: Some(ref asset), .. } if asset == "prowler.png"
        ));
    }

    #[test]
    fn test_custom_icon_resolves() {
        let mut registry = NodeRegistry::new();
        let handle = registry
            .declare(
                "auth0",
                "Auth0",
                NodeKind::CustomIcon,
                Some(AssetRef::new("auth0.png")),
                None,
                &catalog(),
            )
            .unwrap();

        let node = registry.get_by_handle(handle).unwrap();
        assert_eq!(
            node.asset().unwrap().location(),
            std::path::Path::new("/icons/auth0.png")
        );
    }

    #[test]
    fn test_asset_ignored_for_builtin_kind() {
        let mut registry = NodeRegistry::new();
        registry
            .declare(
                "waf",
                "L7 Firewall",
                NodeKind::SecurityControl,
                Some(AssetRef::new("waf.png")),
                None,
                &catalog(),
            )
            .unwrap();

        assert!(registry.get(Id::new("waf")).unwrap().asset().is_none());
    }
}
