//! Analyzer - the whole pipeline for one run
//!
//! raw trees -> validate -> canonicalize -> register (all files) -> resolve
//!
//! A file whose raw tree is structurally invalid is dropped with a
//! [`SkippedFile`] entry; the rest of the run continues without it.

use crate::canonical::{CanonicalAst, Canonicalizer};
use crate::diagnostics::{AnalysisError, SkippedFile};
use crate::graph::{GraphBuilder, ProjectGraph};
use crate::raw::{RawArena, RawAst};
use crate::resolver::{ResolutionStats, Resolver};
use crate::Result;

/// One file's parser output, in either accepted shape
#[derive(Debug, Clone)]
pub enum RawInput {
    Tree(RawAst),
    Flat(RawArena),
}

impl RawInput {
    pub fn file_path(&self) -> &str {
        match self {
            RawInput::Tree(ast) => &ast.file_path,
            RawInput::Flat(arena) => &arena.file_path,
        }
    }

    /// Materialize and validate the raw tree
    pub fn into_tree(self) -> Result<RawAst> {
        match self {
            RawInput::Tree(ast) => {
                ast.validate()?;
                Ok(ast)
            }
            RawInput::Flat(arena) => arena.into_ast(),
        }
    }
}

impl From<RawAst> for RawInput {
    fn from(ast: RawAst) -> Self {
        RawInput::Tree(ast)
    }
}

impl From<RawArena> for RawInput {
    fn from(arena: RawArena) -> Self {
        RawInput::Flat(arena)
    }
}

/// Result of one analysis run
#[derive(Debug)]
pub struct Analysis {
    pub graph: ProjectGraph,
    pub errors: Vec<AnalysisError>,
    pub skipped: Vec<SkippedFile>,
    pub stats: ResolutionStats,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Whole-project phases of a run, after every file is canonicalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Registration,
    Resolution,
}

/// Reported by [`Analyzer::analyze_with`] around each [`Phase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Started { phase: Phase, files: usize },
    Finished { phase: Phase },
}

/// Runs registration then resolution over a set of files.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    canonicalizer: Canonicalizer,
    workers: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            canonicalizer: Canonicalizer::new(),
            workers: 1,
        }
    }

    /// Registration threads; 1 keeps the run single-threaded
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Canonicalize every input, dropping malformed ones
    pub fn canonicalize_all<I>(&self, inputs: I) -> (Vec<CanonicalAst>, Vec<SkippedFile>)
    where
        I: IntoIterator,
        I::Item: Into<RawInput>,
    {
        let mut asts = Vec::new();
        let mut skipped = Vec::new();

        for input in inputs {
            let input = input.into();
            let file_path = input.file_path().to_string();
            match input.into_tree() {
                Ok(raw) => asts.push(self.canonicalizer.canonicalize(raw)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file_path, e);
                    skipped.push(SkippedFile::new(file_path, e.to_string()));
                }
            }
        }

        (asts, skipped)
    }

    /// Analyze a set of files end to end
    pub fn analyze<I>(&self, inputs: I) -> Analysis
    where
        I: IntoIterator,
        I::Item: Into<RawInput>,
    {
        self.analyze_with(inputs, |_| {})
    }

    /// Same as [`Analyzer::analyze`], calling `on_phase` as each phase starts and ends
    pub fn analyze_with<I, F>(&self, inputs: I, mut on_phase: F) -> Analysis
    where
        I: IntoIterator,
        I::Item: Into<RawInput>,
        F: FnMut(PhaseEvent),
    {
        let (asts, skipped) = self.canonicalize_all(inputs);
        tracing::info!("canonicalized {} files ({} skipped)", asts.len(), skipped.len());

        on_phase(PhaseEvent::Started {
            phase: Phase::Registration,
            files: asts.len(),
        });
        let mut builder = GraphBuilder::new().with_workers(self.workers);
        builder.add_files(asts);
        let graph = builder.finish();
        on_phase(PhaseEvent::Finished {
            phase: Phase::Registration,
        });

        on_phase(PhaseEvent::Started {
            phase: Phase::Resolution,
            files: graph.len(),
        });
        let resolution = Resolver::new(&graph).resolve_all();
        on_phase(PhaseEvent::Finished {
            phase: Phase::Resolution,
        });

        Analysis {
            graph,
            errors: resolution.errors,
            skipped,
            stats: resolution.stats,
        }
    }
}
