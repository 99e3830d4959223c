//! Canonical AST - the normalized tree shared by every supported language
//!
//! Canonicalization turns a grammar-specific raw tree into a tree whose nodes
//! carry a stable [`NodeId`], a [`Language`] and a [`NodeRole`]. Everything
//! downstream (registration, resolution, queries) dispatches on the role only,
//! never on the grammar type.

pub mod node;
pub mod classify;
pub mod canonicalize;

pub use node::{CanonicalAst, CanonicalNode, Language, NodeId, NodeRole, Preorder};
pub use classify::classify;
pub use canonicalize::Canonicalizer;
pub use crate::raw::Point;
