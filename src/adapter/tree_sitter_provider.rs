//! Tree-sitter raw AST provider
//!
//! Converts a tree-sitter syntax tree into a [`RawAst`]. Only named children
//! are kept (punctuation and keywords are dropped), and every grammar type is
//! prefixed with the grammar's language namespace so the classifier can tell
//! `java:identifier` from `py:identifier`.

use super::framework::RawAstProvider;
use crate::canonical::Language;
use crate::raw::{Point, RawAst, RawNode};
use crate::{Error, Result};
use tree_sitter::{Node, Parser};

/// Grammars with a tree-sitter provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Java,
    Python,
    TypeScript,
    Tsx,
}

impl Grammar {
    pub fn all() -> &'static [Grammar] {
        &[Grammar::Java, Grammar::Python, Grammar::TypeScript, Grammar::Tsx]
    }

    /// Namespace prefix put in front of every grammar type
    pub fn prefix(&self) -> &'static str {
        match self {
            Grammar::Java => "java",
            Grammar::Python => "py",
            Grammar::TypeScript => "ts",
            Grammar::Tsx => "tsx",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Grammar::Java => "Java",
            Grammar::Python => "Python",
            Grammar::TypeScript => "TypeScript",
            Grammar::Tsx => "TSX",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Grammar::Java => &["java"],
            Grammar::Python => &["py", "pyi"],
            Grammar::TypeScript => &["ts", "mts", "cts"],
            Grammar::Tsx => &["tsx"],
        }
    }

    /// The canonical language this grammar classifies into
    pub fn language(&self) -> Language {
        match self {
            Grammar::Java => Language::Java,
            Grammar::Python => Language::Python,
            Grammar::TypeScript | Grammar::Tsx => Language::TypeScript,
        }
    }

    /// Find the grammar for a file extension
    pub fn from_extension(ext: &str) -> Option<Grammar> {
        Grammar::all()
            .iter()
            .copied()
            .find(|grammar| grammar.extensions().contains(&ext))
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Grammar::Java => tree_sitter_java::LANGUAGE.into(),
            Grammar::Python => tree_sitter_python::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Raw AST provider backed by one tree-sitter grammar
pub struct TreeSitterProvider {
    grammar: Grammar,
}

impl TreeSitterProvider {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Parse source text into a raw tree
    pub fn parse(&self, path: &str, content: &str) -> Result<RawAst> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar.tree_sitter_language())
            .map_err(|e| Error::Adapter(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| Error::Parse(format!("tree-sitter produced no tree for {}", path)))?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!("{} contains syntax errors, continuing best-effort", path);
        }

        let raw_root = convert_tree(root, content.as_bytes(), self.grammar.prefix())?;
        Ok(RawAst::new(path, raw_root))
    }
}

impl RawAstProvider for TreeSitterProvider {
    fn language_name(&self) -> &str {
        self.grammar.name()
    }

    fn file_extensions(&self) -> &[&str] {
        self.grammar.extensions()
    }

    fn parse_file(&self, path: &str, content: &str) -> Result<RawAst> {
        self.parse(path, content)
    }
}

/// A converted node waiting for its named children
struct Frame<'tree> {
    node: RawNode,
    pending: std::vec::IntoIter<Node<'tree>>,
}

impl<'tree> Frame<'tree> {
    fn new(node: Node<'tree>, source: &[u8], prefix: &str) -> Result<Self> {
        let text = node
            .utf8_text(source)
            .map_err(|e| Error::Parse(format!("invalid UTF-8 in `{}` node: {}", node.kind(), e)))?;

        let mut cursor = node.walk();
        let named: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();

        let start = node.start_position();
        let end = node.end_position();

        Ok(Self {
            node: RawNode {
                kind: format!("{}:{}", prefix, node.kind()),
                text: text.to_string(),
                start: Point::new(start.row, start.column),
                end: Point::new(end.row, end.column),
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                children: Vec::with_capacity(named.len()),
            },
            pending: named.into_iter(),
        })
    }
}

/// Convert a whole tree-sitter tree. Long expression chains nest one level per
/// operand, so the walk keeps its own stack instead of recursing.
fn convert_tree(root: Node, source: &[u8], prefix: &str) -> Result<RawNode> {
    let mut stack = vec![Frame::new(root, source, prefix)?];

    while let Some(top) = stack.last_mut() {
        if let Some(child) = top.pending.next() {
            let frame = Frame::new(child, source, prefix)?;
            stack.push(frame);
            continue;
        }
        let Some(done) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.node.children.push(done.node),
            None => return Ok(done.node),
        }
    }
    Err(Error::Adapter("tree-sitter conversion finished without a root".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(grammar: Grammar, path: &str, source: &str) -> RawAst {
        TreeSitterProvider::new(grammar).parse(path, source).unwrap()
    }

    fn kinds(node: &RawNode, out: &mut Vec<String>) {
        out.push(node.kind.clone());
        for child in &node.children {
            kinds(child, out);
        }
    }

    #[test]
    fn test_python_prefix_and_positions() {
        let raw = parse(Grammar::Python, "a.py", "import os\nx = 1\n");
        assert_eq!(raw.root.kind, "py:module");
        assert_eq!(raw.root.children[0].kind, "py:import_statement");
        assert_eq!(raw.root.children[0].text, "import os");

        let mut all = Vec::new();
        kinds(&raw.root, &mut all);
        assert!(all.iter().all(|k| k.starts_with("py:")));
        assert!(all.contains(&"py:assignment".to_string()));

        let second = &raw.root.children[1];
        assert_eq!(second.start.row, 1);
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_typescript_named_children_only() {
        let raw = parse(Grammar::TypeScript, "a.ts", "import { Foo } from './foo';\n");
        let import = &raw.root.children[0];
        assert_eq!(import.kind, "ts:import_statement");

        let mut all = Vec::new();
        kinds(&raw.root, &mut all);
        assert!(all.contains(&"ts:import_specifier".to_string()));
        // Anonymous tokens like `{` or `from` are not named nodes
        assert!(!all.iter().any(|k| k == "ts:{" || k == "ts:from"));
    }

    #[test]
    fn test_java_package() {
        let raw = parse(Grammar::Java, "A.java", "package com.acme.util;\nclass A {}\n");
        assert_eq!(raw.root.kind, "java:program");
        assert_eq!(raw.root.children[0].kind, "java:package_declaration");
        assert_eq!(raw.root.children[0].text, "package com.acme.util;");
    }

    #[test]
    fn test_long_concatenation_converts() {
        let source = format!("x = {}a\n", "a+".repeat(10_000));
        let raw = parse(Grammar::Python, "gen.py", &source);
        assert!(raw.validate().is_ok());

        let mut deepest = 0;
        let mut identifiers = 0;
        let mut stack = vec![(&raw.root, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if node.kind == "py:identifier" {
                identifiers += 1;
            }
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        assert!(deepest > 10_000);
        assert_eq!(identifiers, 10_002);
    }

    #[test]
    fn test_grammar_lookup() {
        assert_eq!(Grammar::from_extension("tsx"), Some(Grammar::Tsx));
        assert_eq!(Grammar::from_extension("pyi"), Some(Grammar::Python));
        assert_eq!(Grammar::from_extension("rs"), None);
        assert_eq!(Grammar::Tsx.language(), Language::TypeScript);
    }
}
