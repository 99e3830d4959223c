//! Resolver - checks every reference against what registration recorded
//!
//! Resolution algorithm, per file:
//! 1. Walk the canonical AST depth-first
//! 2. Skip every non-resolvable role (declarations, namespace paths, unknown)
//! 3. Look the node's text up in the file's declared symbols, then its imports
//! 4. If neither has it -> `UNRESOLVED_IDENTIFIER` on that exact node
//!
//! The walk always descends into children, so an unresolved outer expression
//! never hides errors nested inside it. There is no lookup against built-ins
//! or other files' declarations, and no scoping narrower than the file.

use crate::diagnostics::AnalysisError;
use crate::graph::{ProjectFile, ProjectGraph};
use crate::symbol::Binding;
use serde::Serialize;
use std::fmt;

/// Counters collected while resolving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub files: usize,
    pub references: usize,
    pub resolved_local: usize,
    pub resolved_imported: usize,
    pub unresolved: usize,
}

impl ResolutionStats {
    fn absorb(&mut self, other: &ResolutionStats) {
        self.files += other.files;
        self.references += other.references;
        self.resolved_local += other.resolved_local;
        self.resolved_imported += other.resolved_imported;
        self.unresolved += other.unresolved;
    }
}

impl fmt::Display for ResolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution Stats:")?;
        writeln!(f, "  Files: {}", self.files)?;
        writeln!(f, "  Total References: {}", self.references)?;
        writeln!(f, "  ✅ Declared in file: {}", self.resolved_local)?;
        writeln!(f, "  📦 Imported: {}", self.resolved_imported)?;
        writeln!(f, "  ❌ Unresolved: {}", self.unresolved)
    }
}

/// Output of a resolution pass
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub errors: Vec<AnalysisError>,
    pub stats: ResolutionStats,
}

/// Resolver over a fully registered project graph.
pub struct Resolver<'a> {
    graph: &'a ProjectGraph,
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a ProjectGraph) -> Self {
        Self { graph }
    }

    /// Resolve every file, in path order
    pub fn resolve_all(&self) -> Resolution {
        let mut resolution = Resolution::default();
        for file in self.graph.files() {
            let (errors, stats) = self.resolve_file(file);
            resolution.errors.extend(errors);
            resolution.stats.absorb(&stats);
        }

        tracing::info!(
            "resolved {} references in {} files, {} unresolved",
            resolution.stats.references,
            resolution.stats.files,
            resolution.stats.unresolved
        );
        resolution
    }

    /// Resolve one file. Callers wanting cancellation can drive this per file.
    pub fn resolve_file(&self, file: &ProjectFile) -> (Vec<AnalysisError>, ResolutionStats) {
        let mut errors = Vec::new();
        let mut stats = ResolutionStats {
            files: 1,
            ..ResolutionStats::default()
        };

        for node in file.ast.preorder() {
            if !node.role.is_resolvable() {
                continue;
            }
            stats.references += 1;

            match file.symbols.lookup(&node.text) {
                Some((_, Binding::Local)) => stats.resolved_local += 1,
                Some((_, Binding::Imported)) => stats.resolved_imported += 1,
                None => {
                    stats.unresolved += 1;
                    errors.push(AnalysisError::unresolved(&node.text, &node.file_path, node.id));
                }
            }
        }

        tracing::debug!(
            "{}: {} references, {} unresolved",
            file.file_path,
            stats.references,
            stats.unresolved
        );
        (errors, stats)
    }
}

/// Resolve a whole graph and return only the errors
pub fn resolve(graph: &ProjectGraph) -> Vec<AnalysisError> {
    Resolver::new(graph).resolve_all().errors
}
