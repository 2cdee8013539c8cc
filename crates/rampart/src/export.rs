//! Serialization of resolved graphs into layout-engine input.
//!
//! Only the Graphviz DOT language is produced; see [`dot`].

pub mod dot;
