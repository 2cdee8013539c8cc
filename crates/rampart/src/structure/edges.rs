//! Edge set.
//!
//! Edges are kept in declaration order, which is also their drawing order.
//! Parallel edges between the same ordered pair are distinct entries: an
//! authentication flow and a log stream between the same two services are two
//! lines, never one.

use log::debug;

use rampart_core::{identifier::Id, style::EdgeStyle};

use crate::{error::BuildError, structure::registry::NodeRegistry};

/// Position of an edge in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle(usize);

impl EdgeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed, styled connection between two node keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    style: EdgeStyle,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    /// Returns `true` if this edge runs from `source` to `target`.
    pub fn connects(&self, source: Id, target: Id) -> bool {
        self.source == source && self.target == target
    }
}

/// Ordered list of edges.
#[derive(Debug, Default, Clone)]
pub struct EdgeSet {
    edges: Vec<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge between two registered nodes.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownNode`] naming the first endpoint (source,
    /// then target) that is not in `registry`. The set is unchanged on error.
    pub fn connect(
        &mut self,
        registry: &NodeRegistry,
        source: &str,
        target: &str,
        style: EdgeStyle,
    ) -> Result<EdgeHandle, BuildError> {
        let source_id = Self::endpoint(registry, source)?;
        let target_id = Self::endpoint(registry, target)?;

        let handle = EdgeHandle(self.edges.len());
        self.edges.push(Edge {
            source: source_id,
            target: target_id,
            style,
        });

        debug!(source, target, index = handle.0; "Edge connected");
        Ok(handle)
    }

    fn endpoint(registry: &NodeRegistry, key: &str) -> Result<Id, BuildError> {
        let id = Id::new(key);
        if registry.contains(id) {
            Ok(id)
        } else {
            Err(BuildError::UnknownNode {
                key: key.to_string(),
            })
        }
    }

    pub fn get(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.edges.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub(crate) fn into_inner(self) -> Vec<Edge> {
        self.edges
    }
}
