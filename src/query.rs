//! Query engine over a single canonical AST
//!
//! Lets consumers search a file's nodes without re-parsing. Results come back
//! in pre-order (source order).

use crate::canonical::{CanonicalAst, CanonicalNode, Language, NodeId, NodeRole};

/// Read-only query interface over one file's canonical AST
pub struct QueryEngine<'a> {
    ast: &'a CanonicalAst,
}

impl<'a> QueryEngine<'a> {
    pub fn new(ast: &'a CanonicalAst) -> Self {
        Self { ast }
    }

    /// Find all nodes matching a predicate
    pub fn find<P>(&self, mut predicate: P) -> Vec<&'a CanonicalNode>
    where
        P: FnMut(&CanonicalNode) -> bool,
    {
        self.ast.preorder().filter(|node| predicate(*node)).collect()
    }

    pub fn find_by_role(&self, role: NodeRole) -> Vec<&'a CanonicalNode> {
        self.find(|node| node.role == role)
    }

    pub fn find_by_language(&self, language: Language) -> Vec<&'a CanonicalNode> {
        self.find(|node| node.language == language)
    }

    /// Find nodes by their original grammar type (`ts:import_statement`)
    pub fn find_by_kind(&self, kind: &str) -> Vec<&'a CanonicalNode> {
        self.find(|node| node.kind == kind)
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&'a CanonicalNode> {
        self.ast.node(id)
    }

    pub fn children_of(&self, id: &NodeId) -> Vec<&'a CanonicalNode> {
        self.ast
            .node(id)
            .map(|node| self.ast.children(node).collect())
            .unwrap_or_default()
    }

    /// Parent of a node; the tree stores only downward links, so this scans
    pub fn parent_of(&self, id: &NodeId) -> Option<&'a CanonicalNode> {
        self.ast
            .nodes
            .values()
            .find(|node| node.children.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::Canonicalizer;
    use crate::raw::{RawAst, RawNode};

    fn sample_ast() -> CanonicalAst {
        Canonicalizer::new().canonicalize(RawAst::new(
            "app.ts",
            RawNode::new("ts:program", "import * as http from 'http'; setup();", 0..38)
                .child(RawNode::new("ts:import_statement", "import * as http from 'http';", 0..29))
                .child(
                    RawNode::new("ts:expression_statement", "setup();", 30..38)
                        .child(RawNode::new("ts:call_expression", "setup()", 30..37)),
                ),
        ))
    }

    #[test]
    fn test_find_by_role_and_kind() {
        let ast = sample_ast();
        let engine = QueryEngine::new(&ast);

        let imports = engine.find_by_kind("ts:import_statement");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].text, "import * as http from 'http';");

        let calls = engine.find_by_role(NodeRole::FunctionCall);
        assert_eq!(calls.len(), 1);
        assert_eq!(engine.find_by_language(Language::TypeScript).len(), 4);
        assert!(engine.find_by_language(Language::Java).is_empty());
    }

    #[test]
    fn test_parent_and_children() {
        let ast = sample_ast();
        let engine = QueryEngine::new(&ast);

        let call = engine.find_by_role(NodeRole::FunctionCall)[0];
        let parent = engine.parent_of(&call.id).unwrap();
        assert_eq!(parent.kind, "ts:expression_statement");
        assert!(engine.parent_of(&ast.root).is_none());

        let children = engine.children_of(&ast.root);
        assert_eq!(children.len(), 2);
        assert_eq!(engine.find_by_id(&call.id).unwrap().text, "setup()");
    }
}
