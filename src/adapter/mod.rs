//! Raw AST providers
//!
//! A provider turns source text into a [`crate::raw::RawAst`] whose node types
//! carry a language prefix (`java:`, `py:`, `ts:`). The core never sees a
//! parser; anything that yields raw trees (or flat JSON arenas) can feed it.

pub mod framework;
pub mod tree_sitter_provider;

pub use framework::{default_registry, ProviderRegistry, RawAstProvider};
pub use tree_sitter_provider::{Grammar, TreeSitterProvider};
