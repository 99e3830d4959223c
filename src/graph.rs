//! Project Graph - every file's canonical AST and symbol table, plus the
//! shared namespace table
//!
//! The graph is phase-typed. [`GraphBuilder`] only accepts files and runs
//! registration on them; [`GraphBuilder::finish`] consumes it and yields a
//! read-only [`ProjectGraph`]. Resolution takes a `&ProjectGraph`, so it cannot
//! start before every file has been registered.

use crate::canonical::{CanonicalAst, CanonicalNode, Language, NodeId};
use crate::namespace::NamespaceTable;
use crate::registration::{register, Registration};
use crate::symbol::ScopedSymbolTable;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// One analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectFile {
    pub file_path: String,
    pub ast: CanonicalAst,
    pub symbols: ScopedSymbolTable,
}

/// Building handle: insertion only.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    files: HashMap<String, ProjectFile>,
    namespaces: NamespaceTable,
    workers: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }

    /// Number of threads used by [`GraphBuilder::add_files`]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Register one file and add it. A file with the same path is replaced.
    pub fn add_file(&mut self, ast: CanonicalAst) -> &mut Self {
        let registration = register(&ast);
        self.insert(ast, registration);
        self
    }

    /// Register many files, in parallel when more than one worker is configured.
    ///
    /// Files are inserted in input order either way, so for duplicate paths the
    /// last one in `asts` wins.
    pub fn add_files(&mut self, asts: Vec<CanonicalAst>) -> &mut Self {
        if self.workers <= 1 || asts.len() < 2 {
            for ast in asts {
                self.add_file(ast);
            }
            return self;
        }

        for (ast, registration) in register_parallel(asts, self.workers) {
            self.insert(ast, registration);
        }
        self
    }

    fn insert(&mut self, ast: CanonicalAst, registration: Registration) {
        let Registration { symbols, namespaces } = registration;
        self.namespaces.merge(namespaces);

        let file_path = ast.file_path.clone();
        if self.files.contains_key(&file_path) {
            tracing::warn!("duplicate file path {}, keeping the later one", file_path);
        }
        self.files.insert(
            file_path.clone(),
            ProjectFile {
                file_path,
                ast,
                symbols,
            },
        );
    }

    /// Number of files registered so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Close registration and hand out the read-only graph
    pub fn finish(self) -> ProjectGraph {
        tracing::debug!(
            "registration complete: {} files, {} namespace paths",
            self.files.len(),
            self.namespaces.len()
        );
        ProjectGraph {
            files: self.files,
            namespaces: self.namespaces,
        }
    }
}

/// Register files on a pool of scoped worker threads.
///
/// Workers share nothing mutable: each returns its file's partial namespace
/// table, and merging happens on the caller's thread after every worker has
/// joined.
fn register_parallel(asts: Vec<CanonicalAst>, workers: usize) -> Vec<(CanonicalAst, Registration)> {
    let total = asts.len();
    let (job_tx, job_rx) = crossbeam::channel::unbounded::<(usize, CanonicalAst)>();
    let (done_tx, done_rx) = crossbeam::channel::unbounded::<(usize, CanonicalAst, Registration)>();

    for job in asts.into_iter().enumerate() {
        job_tx.send(job).ok();
    }
    drop(job_tx);

    let scope_result = crossbeam::thread::scope(|scope| {
        for _ in 0..workers.min(total) {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move |_| {
                for (index, ast) in job_rx {
                    let registration = register(&ast);
                    if done_tx.send((index, ast, registration)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    if let Err(panic) = scope_result {
        std::panic::resume_unwind(panic);
    }
    drop(done_tx);

    let mut results: Vec<_> = done_rx.into_iter().collect();
    results.sort_by_key(|(index, _, _)| *index);
    results
        .into_iter()
        .map(|(_, ast, registration)| (ast, registration))
        .collect()
}

/// Read-only project graph, produced by [`GraphBuilder::finish`].
#[derive(Debug, Clone, Serialize)]
pub struct ProjectGraph {
    files: HashMap<String, ProjectFile>,
    namespaces: NamespaceTable,
}

impl ProjectGraph {
    /// Get a file by path
    pub fn file(&self, file_path: &str) -> Option<&ProjectFile> {
        self.files.get(file_path)
    }

    /// All files, sorted by path
    pub fn files(&self) -> Vec<&ProjectFile> {
        let mut files: Vec<_> = self.files.values().collect();
        files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        files
    }

    /// Look up any node by file path and id
    pub fn node(&self, file_path: &str, id: &NodeId) -> Option<&CanonicalNode> {
        self.files.get(file_path)?.ast.node(id)
    }

    /// Children of a node, in source order
    pub fn children(&self, file_path: &str, id: &NodeId) -> Vec<&CanonicalNode> {
        let Some(file) = self.files.get(file_path) else {
            return Vec::new();
        };
        file.ast
            .node(id)
            .map(|node| file.ast.children(node).collect())
            .unwrap_or_default()
    }

    /// The project-wide namespace table
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let files = self.files.values();
        GraphStats {
            files: self.files.len(),
            nodes: files.clone().map(|f| f.ast.len()).sum(),
            declared_symbols: files.clone().map(|f| f.symbols.file_symbols.len()).sum(),
            imported_symbols: files.clone().map(|f| f.symbols.imported_symbols.len()).sum(),
            exported_symbols: files.map(|f| f.symbols.exported_symbols.len()).sum(),
            namespace_paths: Language::supported()
                .iter()
                .map(|language| (*language, self.namespaces.count(*language)))
                .collect(),
        }
    }
}

/// Build a graph from canonical ASTs in one call (serial registration)
pub fn build_graph(asts: impl IntoIterator<Item = CanonicalAst>) -> ProjectGraph {
    let mut builder = GraphBuilder::new();
    for ast in asts {
        builder.add_file(ast);
    }
    builder.finish()
}

/// Statistics about a project graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub files: usize,
    pub nodes: usize,
    pub declared_symbols: usize,
    pub imported_symbols: usize,
    pub exported_symbols: usize,
    pub namespace_paths: Vec<(Language, usize)>,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project Graph Statistics:")?;
        writeln!(f, "  Files: {}", self.files)?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(
            f,
            "  Symbols: {} declared, {} imported, {} exported",
            self.declared_symbols, self.imported_symbols, self.exported_symbols
        )?;
        let namespaces: Vec<String> = self
            .namespace_paths
            .iter()
            .map(|(language, count)| format!("{} {}", language, count))
            .collect();
        writeln!(f, "  Namespace paths: {}", namespaces.join(", "))
    }
}
