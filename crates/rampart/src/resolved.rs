//! The compiled, validated form of a diagram.
//!
//! A [`ResolvedGraph`] is produced by [`Session::compile`](crate::Session::compile)
//! and is read-only. Region nesting is stored flattened, as depth-first
//! entries with parent links; [`ResolvedGraph::tree`] re-nests it on demand.

use indexmap::IndexMap;

use rampart_core::identifier::Id;

use crate::{
    error::BuildError,
    options::DiagramOptions,
    structure::{ClusterTree, Edge, FlatEntry, Node, RegionHandle},
};

/// A fully validated diagram ready for serialization.
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    title: String,
    options: DiagramOptions,
    nodes: IndexMap<Id, Node>,
    layout: Vec<FlatEntry>,
    edges: Vec<Edge>,
}

impl ResolvedGraph {
    pub(crate) fn new(
        title: String,
        options: DiagramOptions,
        nodes: IndexMap<Id, Node>,
        layout: Vec<FlatEntry>,
        edges: Vec<Edge>,
    ) -> Self {
        Self {
            title,
            options,
            nodes,
            layout,
            edges,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn region_count(&self) -> usize {
        self.layout
            .iter()
            .filter(|entry| matches!(entry, FlatEntry::Region { .. }))
            .count()
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(&Id::new(key))
    }

    /// Position of `key` in declaration order.
    pub fn node_index(&self, key: Id) -> Option<usize> {
        self.nodes.get_index_of(&key)
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges running from `source` to `target`, in declaration order.
    pub fn edges_between(&self, source: &str, target: &str) -> Vec<&Edge> {
        let (source, target) = (Id::new(source), Id::new(target));
        self.edges
            .iter()
            .filter(|edge| edge.connects(source, target))
            .collect()
    }

    /// Depth-first, declaration-ordered members with their parent regions.
    pub fn layout(&self) -> &[FlatEntry] {
        &self.layout
    }

    /// Nodes placed directly in the region at `path`, in declaration order.
    ///
    /// Returns `None` if no region has that path.
    pub fn region_nodes(&self, path: &str) -> Option<Vec<Id>> {
        let tree = self.tree().ok()?;
        let (handle, _) = tree.find(path)?;
        Some(self.nodes_in(handle))
    }

    fn nodes_in(&self, handle: RegionHandle) -> Vec<Id> {
        self.layout
            .iter()
            .filter_map(|entry| match entry {
                FlatEntry::Node { key, parent } if *parent == Some(handle) => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Re-nests the flattened layout into a [`ClusterTree`].
    ///
    /// # Errors
    ///
    /// Fails only if the layout is inconsistent, which compilation rules out.
    pub fn tree(&self) -> Result<ClusterTree, BuildError> {
        ClusterTree::renest(&self.layout)
    }
}
