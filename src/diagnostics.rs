//! Analysis diagnostics
//!
//! A missing symbol is data, not a fault: resolution reports it as an
//! [`AnalysisError`] naming the exact reference node. Files that could not be
//! analyzed at all are reported separately as [`SkippedFile`]s.

use crate::canonical::NodeId;
use crate::graph::ProjectGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of an analysis error. New codes may be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    /// A reference matches neither an in-file declaration nor an import
    UnresolvedIdentifier,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnresolvedIdentifier => "UNRESOLVED_IDENTIFIER",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One finding of the resolution phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub code: ErrorCode,
    /// Human-readable detail
    pub message: String,
    pub file_path: String,
    /// The offending reference node
    pub node_id: NodeId,
}

impl AnalysisError {
    /// An unresolved reference named `name` at `node_id`
    pub fn unresolved(name: &str, file_path: impl Into<String>, node_id: NodeId) -> Self {
        Self {
            code: ErrorCode::UnresolvedIdentifier,
            message: format!("Unresolved identifier: {}", name),
            file_path: file_path.into(),
            node_id,
        }
    }

    /// Recover the source location of the offending node
    pub fn locate(&self, graph: &ProjectGraph) -> Option<Location> {
        let node = graph.node(&self.file_path, &self.node_id)?;
        Some(Location {
            line: node.start.row + 1,
            column: node.start.column + 1,
            end_line: node.end.row + 1,
            end_column: node.end.column + 1,
        })
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.code, self.message, self.file_path)
    }
}

/// 1-indexed source span of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A file dropped from the run because its raw tree was unusable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file_path: String,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(file_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_path, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::UnresolvedIdentifier).unwrap();
        assert_eq!(json, "\"UNRESOLVED_IDENTIFIER\"");
    }

    #[test]
    fn test_unresolved_message() {
        let id = NodeId::derive("a.ts", "ts:identifier", 0, 3, None);
        let error = AnalysisError::unresolved("baz", "a.ts", id);
        assert_eq!(error.code, ErrorCode::UnresolvedIdentifier);
        assert_eq!(error.message, "Unresolved identifier: baz");
        assert_eq!(error.to_string(), "[UNRESOLVED_IDENTIFIER] Unresolved identifier: baz (a.ts)");
    }
}
