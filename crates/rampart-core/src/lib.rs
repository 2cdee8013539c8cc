//! Rampart Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Rampart diagram
//! pipeline. It includes:
//!
//! - **Identifiers**: String-interned node keys and region paths ([`identifier::Id`])
//! - **Colors**: CSS color parsing and validation ([`color::Color`])
//! - **Node kinds**: The closed catalog of node categories ([`kind::NodeKind`])
//! - **Styles**: Edge line patterns and style descriptors ([`style`] module)
//! - **Layout**: Global layout settings ([`layout`] module)

pub mod color;
pub mod error;
pub mod identifier;
pub mod kind;
pub mod layout;
pub mod style;
