//! In-memory structures accumulated by a diagram session.
//!
//! # Architecture
//!
//! - [`registry`]: flat, declaration-ordered mapping from node key to node
//! - [`cluster`]: the tree of nested regions and the open-region stack
//! - [`edges`]: the ordered list of styled, directed edges
//!
//! Edges refer to nodes by key only, and regions refer to their members by
//! key or region handle, so none of the three structures owns another.

pub mod cluster;
pub mod edges;
pub mod registry;

pub use cluster::{ClusterTree, FlatEntry, Member, Region, RegionHandle};
pub use edges::{Edge, EdgeHandle, EdgeSet};
pub use registry::{Node, NodeHandle, NodeRegistry};
