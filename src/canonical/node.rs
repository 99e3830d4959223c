//! Canonical node types
//!
//! All languages are described by the same closed role taxonomy:
//! - Structural roles (namespace paths and declarations) are never resolved
//! - Reference roles are checked against the file's symbol table
//! - `Unknown` absorbs every grammar type nobody classified yet

use crate::raw::Point;
use crate::symbol::SymbolKind;
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Source language of a canonical node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    TypeScript,
    Unknown,
}

impl Language {
    /// Get the string representation of the language
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Unknown => "unknown",
        }
    }

    /// The languages with a classification table
    pub fn supported() -> &'static [Language] {
        &[Language::Java, Language::Python, Language::TypeScript]
    }

    /// Map a raw-type namespace prefix (`java`, `py`, `ts`, ...) to a language
    pub fn from_prefix(prefix: &str) -> Language {
        match prefix {
            "java" => Language::Java,
            "py" | "python" => Language::Python,
            "ts" | "tsx" | "typescript" => Language::TypeScript,
            _ => Language::Unknown,
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match Language::from_prefix(&s.to_lowercase()) {
            Language::Unknown => Err(Error::UnsupportedLanguage(s.to_string())),
            language => Ok(language),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic role of a node, independent of its grammar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeRole {
    /// One component of a dotted package/module path, e.g. `com.acme`
    NamespaceSegment,
    /// A declared or imported package/module path
    ModulePath,
    /// Class, interface, enum
    TypeDeclaration,
    /// Function, method, constructor
    FunctionDeclaration,
    /// Variable, field, parameter
    VariableDeclaration,
    /// `new Foo()`, `List<String>`
    TypeReference,
    /// `save()`
    FunctionCall,
    /// `x`
    VariableReference,
    /// `obj.field`
    FieldReference,
    /// The name an import brings into scope
    ImportTarget,
    Unknown,
}

impl NodeRole {
    /// Get the string representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::NamespaceSegment => "NAMESPACE_SEGMENT",
            NodeRole::ModulePath => "MODULE_PATH",
            NodeRole::TypeDeclaration => "TYPE_DECLARATION",
            NodeRole::FunctionDeclaration => "FUNCTION_DECLARATION",
            NodeRole::VariableDeclaration => "VARIABLE_DECLARATION",
            NodeRole::TypeReference => "TYPE_REFERENCE",
            NodeRole::FunctionCall => "FUNCTION_CALL",
            NodeRole::VariableReference => "VARIABLE_REFERENCE",
            NodeRole::FieldReference => "FIELD_REFERENCE",
            NodeRole::ImportTarget => "IMPORT_TARGET",
            NodeRole::Unknown => "UNKNOWN",
        }
    }

    /// Get all roles
    pub fn all() -> &'static [NodeRole] {
        &[
            NodeRole::NamespaceSegment,
            NodeRole::ModulePath,
            NodeRole::TypeDeclaration,
            NodeRole::FunctionDeclaration,
            NodeRole::VariableDeclaration,
            NodeRole::TypeReference,
            NodeRole::FunctionCall,
            NodeRole::VariableReference,
            NodeRole::FieldReference,
            NodeRole::ImportTarget,
            NodeRole::Unknown,
        ]
    }

    /// Whether resolution checks nodes with this role against the symbol table.
    pub fn is_resolvable(&self) -> bool {
        match self {
            NodeRole::TypeReference
            | NodeRole::FunctionCall
            | NodeRole::VariableReference
            | NodeRole::FieldReference
            | NodeRole::ImportTarget => true,
            NodeRole::NamespaceSegment
            | NodeRole::ModulePath
            | NodeRole::TypeDeclaration
            | NodeRole::FunctionDeclaration
            | NodeRole::VariableDeclaration
            | NodeRole::Unknown => false,
        }
    }

    /// The symbol kind a declaration with this role introduces
    pub fn declared_kind(&self) -> Option<SymbolKind> {
        match self {
            NodeRole::TypeDeclaration => Some(SymbolKind::Class),
            NodeRole::FunctionDeclaration => Some(SymbolKind::Function),
            NodeRole::VariableDeclaration => Some(SymbolKind::Variable),
            NodeRole::NamespaceSegment
            | NodeRole::ModulePath
            | NodeRole::TypeReference
            | NodeRole::FunctionCall
            | NodeRole::VariableReference
            | NodeRole::FieldReference
            | NodeRole::ImportTarget
            | NodeRole::Unknown => None,
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable identity of a canonical node.
///
/// A blake3 digest of (file path, raw type, start byte, end byte, parent id),
/// so re-canonicalizing identical input reproduces identical ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId([u8; 32]);

impl NodeId {
    /// Derive the id of a node from its position in the raw tree.
    pub fn derive(
        file_path: &str,
        kind: &str,
        start_byte: usize,
        end_byte: usize,
        parent: Option<NodeId>,
    ) -> Self {
        let mut hasher = blake3::Hasher::new();
        // Length-prefix the strings so ("ab", "c") and ("a", "bc") differ
        hasher.update(&(file_path.len() as u64).to_le_bytes());
        hasher.update(file_path.as_bytes());
        hasher.update(&(kind.len() as u64).to_le_bytes());
        hasher.update(kind.as_bytes());
        hasher.update(&(start_byte as u64).to_le_bytes());
        hasher.update(&(end_byte as u64).to_le_bytes());
        match parent {
            Some(parent) => {
                hasher.update(&[1]);
                hasher.update(&parent.0);
            }
            None => {
                hasher.update(&[0]);
            }
        }
        NodeId(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full 64-character hex form
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// Abbreviated hex form for display
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        blake3::Hash::from_hex(s)
            .map(|hash| NodeId(*hash.as_bytes()))
            .map_err(|e| Error::Parse(format!("invalid node id `{}`: {}", s, e)))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.short())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single node in the canonical AST.
///
/// Children are ids into the owning [`CanonicalAst`], never direct references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNode {
    pub id: NodeId,
    pub language: Language,
    pub role: NodeRole,
    /// Original grammar type, kept for diagnostics
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub file_path: String,
    pub start: Point,
    pub end: Point,
    pub children: Vec<NodeId>,
}

/// The canonical tree of one file; owns every node of that file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalAst {
    pub file_path: String,
    pub root: NodeId,
    pub nodes: HashMap<NodeId, CanonicalNode>,
}

impl CanonicalAst {
    /// Look up a node by id
    pub fn node(&self, id: &NodeId) -> Option<&CanonicalNode> {
        self.nodes.get(id)
    }

    pub fn root_node(&self) -> Option<&CanonicalNode> {
        self.nodes.get(&self.root)
    }

    /// Children of a node, in source order
    pub fn children<'a>(&'a self, node: &'a CanonicalNode) -> impl Iterator<Item = &'a CanonicalNode> + 'a {
        node.children.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Depth-first, pre-order walk from the root
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            ast: self,
            stack: vec![&self.root],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Pre-order iterator over a [`CanonicalAst`].
///
/// Uses an explicit stack, so deeply nested files cannot overflow the call stack.
pub struct Preorder<'a> {
    ast: &'a CanonicalAst,
    stack: Vec<&'a NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a CanonicalNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.ast.nodes.get(id) {
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}
