//! # Semgraph - Language-agnostic semantic graph
//!
//! Builds one semantic model over mixed-language source trees (Java, Python,
//! TypeScript) and detects unresolved identifiers without per-language
//! type-checking infrastructure.
//!
//! Semgraph provides:
//! - Canonicalization of parser output into a role-classified AST with stable ids
//! - Per-file scoped symbol tables and a project-wide namespace table ("Registration")
//! - A phase-typed project graph: built once, then read-only
//! - Reference checking against the registered symbols ("Resolution")
//! - Tree-sitter based raw AST providers and a CLI on top of the core

pub mod raw;
pub mod canonical;
pub mod symbol;
pub mod namespace;
pub mod registration;
pub mod graph;
pub mod resolver;
pub mod diagnostics;
pub mod analysis;
pub mod query;
pub mod adapter;
pub mod discovery;
pub mod config;
pub mod report;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use raw::{RawArena, RawAst, RawNode};
pub use canonical::{CanonicalAst, CanonicalNode, Canonicalizer, Language, NodeId, NodeRole, Point};
pub use symbol::{ScopedSymbolTable, Symbol, SymbolKind};
pub use namespace::NamespaceTable;
pub use graph::{GraphBuilder, ProjectFile, ProjectGraph};
pub use resolver::Resolver;
pub use diagnostics::{AnalysisError, ErrorCode, SkippedFile};
pub use analysis::{Analysis, Analyzer, Phase, PhaseEvent, RawInput};

/// Result type alias for Semgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Semgraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed raw tree in {file}: {reason}")]
    MalformedTree { file: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedTree {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
