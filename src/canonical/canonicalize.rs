//! Raw tree -> canonical tree conversion

use super::classify::classify;
use super::node::{CanonicalAst, CanonicalNode, Language, NodeId, NodeRole};
use crate::raw::{RawAst, RawNode};
use std::collections::HashMap;

/// Classification function used by a [`Canonicalizer`]
pub type Classifier = fn(&str) -> (Language, NodeRole);

/// Converts raw trees into canonical trees.
///
/// Ids are assigned top-down: a node's id is known before its children are
/// visited, because each child's id hashes in its parent's id.
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer {
    classifier: Classifier,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Create a canonicalizer using the built-in classification tables
    pub fn new() -> Self {
        Self { classifier: classify }
    }

    /// Create a canonicalizer with custom classification tables
    pub fn with_classifier(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Canonicalize one file. The raw tree is consumed.
    ///
    /// Callers are expected to have run [`RawAst::validate`]; on a valid tree
    /// ids are unique within the file.
    pub fn canonicalize(&self, raw: RawAst) -> CanonicalAst {
        let RawAst { file_path, root } = raw;
        let root_id = NodeId::derive(&file_path, &root.kind, root.start_byte, root.end_byte, None);

        let mut nodes = HashMap::with_capacity(root.node_count());
        let mut stack: Vec<(RawNode, NodeId)> = vec![(root, root_id)];

        while let Some((mut raw_node, id)) = stack.pop() {
            let kind = std::mem::take(&mut raw_node.kind);
            let text = std::mem::take(&mut raw_node.text);
            let children = std::mem::take(&mut raw_node.children);
            let (start, end) = (raw_node.start, raw_node.end);

            let child_ids: Vec<NodeId> = children
                .iter()
                .map(|child| {
                    NodeId::derive(&file_path, &child.kind, child.start_byte, child.end_byte, Some(id))
                })
                .collect();

            let (language, role) = (self.classifier)(&kind);
            tracing::trace!("{} {} -> {} {}", id.short(), kind, language, role);

            stack.extend(children.into_iter().zip(child_ids.iter().copied()));

            nodes.insert(
                id,
                CanonicalNode {
                    id,
                    language,
                    role,
                    kind,
                    text,
                    file_path: file_path.clone(),
                    start,
                    end,
                    children: child_ids,
                },
            );
        }

        CanonicalAst {
            file_path,
            root: root_id,
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_raw() -> RawAst {
        // function bar() {} bar();
        RawAst::new(
            "src/bar.ts",
            RawNode::new("ts:program", "function bar() {} bar();", 0..24)
                .child(
                    RawNode::new("ts:function_declaration", "function bar() {}", 0..17)
                        .child(RawNode::new("ts:identifier", "bar", 9..12)),
                )
                .child(
                    RawNode::new("ts:expression_statement", "bar();", 18..24)
                        .child(RawNode::new("ts:call_expression", "bar()", 18..23)),
                ),
        )
    }

    #[test]
    fn test_canonicalize_structure() {
        let ast = Canonicalizer::new().canonicalize(sample_raw());

        assert_eq!(ast.len(), 5);
        let root = ast.root_node().unwrap();
        assert_eq!(root.kind, "ts:program");
        assert_eq!(root.language, Language::TypeScript);
        assert_eq!(root.children.len(), 2);

        let roles: Vec<NodeRole> = ast.preorder().map(|n| n.role).collect();
        assert_eq!(
            roles,
            vec![
                NodeRole::Unknown,
                NodeRole::FunctionDeclaration,
                NodeRole::VariableReference,
                NodeRole::Unknown,
                NodeRole::FunctionCall,
            ]
        );
    }

    #[test]
    fn test_canonicalize_is_deterministic() {
        let canonicalizer = Canonicalizer::new();
        let first = canonicalizer.canonicalize(sample_raw());
        let second = canonicalizer.canonicalize(sample_raw());

        let first_ids: HashSet<_> = first.nodes.keys().copied().collect();
        let second_ids: HashSet<_> = second.nodes.keys().copied().collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrelated_edit_keeps_ids() {
        let canonicalizer = Canonicalizer::new();
        let before = canonicalizer.canonicalize(sample_raw());

        // Same tree, but the call statement's text changes (e.g. an argument edit)
        let mut edited = sample_raw();
        edited.root.children[1].text = "bar ();".to_string();
        edited.root.children[1].children[0].text = "bar ()".to_string();
        let after = canonicalizer.canonicalize(edited);

        let decl = &before.root_node().unwrap().children[0];
        assert!(after.node(decl).is_some());
        let ident = &before.node(decl).unwrap().children[0];
        assert_eq!(after.node(ident).unwrap().text, "bar");
    }

    #[test]
    fn test_ids_unique_within_file() {
        let ast = Canonicalizer::new().canonicalize(sample_raw());
        let referenced: Vec<_> = ast.nodes.values().flat_map(|n| n.children.iter()).collect();
        let unique: HashSet<_> = referenced.iter().collect();
        assert_eq!(referenced.len(), unique.len());
        assert_eq!(ast.len(), sample_raw().root.node_count());
    }

    #[test]
    fn test_custom_classifier() {
        fn everything_is_a_call(_: &str) -> (Language, NodeRole) {
            (Language::Python, NodeRole::FunctionCall)
        }
        let ast = Canonicalizer::with_classifier(everything_is_a_call).canonicalize(sample_raw());
        assert!(ast.preorder().all(|n| n.role == NodeRole::FunctionCall));
    }
}
