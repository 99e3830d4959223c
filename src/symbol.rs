//! Symbol types and per-file scoped symbol tables
//!
//! A file's visible names come from two places:
//! - `file_symbols`: declared in the file (classes, functions, variables)
//! - `imported_symbols`: brought in by import statements
//!
//! `exported_symbols` is recorded for future cross-file linkage; resolution
//! does not read it. Visibility is whole-file: there are no nested scopes.

use crate::canonical::NodeId;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// What a symbol denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Class, interface, enum, type alias
    Class,
    /// Function, method, constructor
    Function,
    /// Variable, field, parameter
    Variable,
    /// Not known, e.g. an imported name
    Unknown,
}

impl SymbolKind {
    /// Get the string representation of the symbol kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Unknown => "unknown",
        }
    }

    /// Get all symbol kinds
    pub fn all() -> &'static [SymbolKind] {
        &[
            SymbolKind::Class,
            SymbolKind::Function,
            SymbolKind::Variable,
            SymbolKind::Unknown,
        ]
    }
}

impl FromStr for SymbolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "class" | "type" | "interface" | "enum" | "struct" => Ok(SymbolKind::Class),
            "function" | "method" | "fn" | "def" | "constructor" => Ok(SymbolKind::Function),
            "variable" | "var" | "field" | "const" | "let" | "param" => Ok(SymbolKind::Variable),
            "unknown" => Ok(SymbolKind::Unknown),
            _ => Err(Error::Parse(format!("Unknown symbol kind: {}", s))),
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named entity recorded during registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Symbol name (just the identifier)
    pub name: String,
    pub kind: SymbolKind,
    /// File the symbol was recorded in
    pub file_path: String,
    /// Declaring (or importing) node; a lookup key, not an owning edge
    pub node_id: NodeId,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        file_path: impl Into<String>,
        node_id: NodeId,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            file_path: file_path.into(),
            node_id,
        }
    }
}

/// Where a name was found during lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    Local,
    Imported,
}

/// Per-file symbol table.
///
/// Each map is keyed by name. A later declaration with the same name replaces
/// the earlier one; no redeclaration diagnostic is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedSymbolTable {
    pub file_symbols: HashMap<String, Symbol>,
    pub imported_symbols: HashMap<String, Symbol>,
    pub exported_symbols: HashMap<String, Symbol>,
}

impl ScopedSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an in-file declaration (last write wins)
    pub fn declare(&mut self, symbol: Symbol) {
        self.file_symbols.insert(symbol.name.clone(), symbol);
    }

    /// Record a name brought in by an import (last write wins)
    pub fn import(&mut self, symbol: Symbol) {
        self.imported_symbols.insert(symbol.name.clone(), symbol);
    }

    /// Record a name visible to other files
    pub fn export(&mut self, symbol: Symbol) {
        self.exported_symbols.insert(symbol.name.clone(), symbol);
    }

    /// Look a name up: in-file declarations first, then imports.
    pub fn lookup(&self, name: &str) -> Option<(&Symbol, Binding)> {
        if let Some(symbol) = self.file_symbols.get(name) {
            return Some((symbol, Binding::Local));
        }
        self.imported_symbols
            .get(name)
            .map(|symbol| (symbol, Binding::Imported))
    }

    /// Total number of declared and imported names
    pub fn len(&self) -> usize {
        self.file_symbols.len() + self.imported_symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_symbols.is_empty() && self.imported_symbols.is_empty()
    }
}
