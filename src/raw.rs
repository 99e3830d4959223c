//! Raw AST - parser output before normalization
//!
//! Raw trees come from an external parser (see [`crate::adapter`]) and use
//! grammar-specific vocabulary. They are transient: the canonicalizer consumes
//! them and they are dropped afterwards.
//!
//! Two shapes are accepted:
//! - [`RawAst`]: an owned tree, children held by value
//! - [`RawArena`]: a flat, index-linked form (e.g. JSON from a parser written in
//!   another language), which must be checked for dangling indices, shared
//!   children and cycles before it becomes a [`RawAst`]

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// A position in a source file (0-indexed row and column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A node of a raw syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    /// Grammar type, optionally language-namespaced (`java:class_declaration`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Literal source text of the node
    pub text: String,
    pub start: Point,
    pub end: Point,
    pub start_byte: usize,
    pub end_byte: usize,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a leaf node spanning `span` bytes.
    ///
    /// Positions default to a single line (row 0, column = byte offset);
    /// use [`RawNode::at`] to set real rows and columns.
    pub fn new(kind: impl Into<String>, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            start: Point::new(0, span.start),
            end: Point::new(0, span.end),
            start_byte: span.start,
            end_byte: span.end,
            children: Vec::new(),
        }
    }

    /// Set the row/column positions
    pub fn at(mut self, start: Point, end: Point) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Append a child
    pub fn child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = RawNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

impl Drop for RawNode {
    // Unlink descendants onto a heap stack so deep chains do not recurse on drop
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// The raw syntax tree of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAst {
    pub file_path: String,
    pub root: RawNode,
}

impl RawAst {
    pub fn new(file_path: impl Into<String>, root: RawNode) -> Self {
        Self {
            file_path: file_path.into(),
            root,
        }
    }

    /// Check the structural contract the canonicalizer relies on.
    ///
    /// Every byte range must be ordered, every child must lie inside its
    /// parent's range, and no two siblings may share the same grammar type and
    /// byte range (they would receive the same node id).
    pub fn validate(&self) -> Result<()> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.start_byte > node.end_byte {
                return Err(Error::malformed(
                    &self.file_path,
                    format!(
                        "node `{}` has inverted byte range {}..{}",
                        node.kind, node.start_byte, node.end_byte
                    ),
                ));
            }

            let mut seen = HashSet::new();
            for child in &node.children {
                if child.start_byte < node.start_byte || child.end_byte > node.end_byte {
                    return Err(Error::malformed(
                        &self.file_path,
                        format!(
                            "child `{}` ({}..{}) lies outside parent `{}` ({}..{})",
                            child.kind,
                            child.start_byte,
                            child.end_byte,
                            node.kind,
                            node.start_byte,
                            node.end_byte
                        ),
                    ));
                }
                if !seen.insert((child.kind.as_str(), child.start_byte, child.end_byte)) {
                    return Err(Error::malformed(
                        &self.file_path,
                        format!(
                            "duplicate sibling `{}` at {}..{} under `{}`",
                            child.kind, child.start_byte, child.end_byte, node.kind
                        ),
                    ));
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

/// One entry of a [`RawArena`]; children are indices into the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArenaNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub start: Point,
    pub end: Point,
    pub start_byte: usize,
    pub end_byte: usize,
    #[serde(default)]
    pub children: Vec<usize>,
}

/// Flat, index-linked raw tree as produced by an out-of-process parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArena {
    pub file_path: String,
    pub root: usize,
    pub nodes: Vec<RawArenaNode>,
}

impl RawArena {
    /// Convert into an owned tree, rejecting anything that is not a strict tree.
    pub fn into_ast(self) -> Result<RawAst> {
        let RawArena { file_path, root, nodes } = self;
        let len = nodes.len();

        if root >= len {
            return Err(Error::malformed(
                &file_path,
                format!("root index {} out of bounds ({} nodes)", root, len),
            ));
        }

        // Each node may have at most one parent and the root none.
        let mut parents: Vec<Option<usize>> = vec![None; len];
        for (index, node) in nodes.iter().enumerate() {
            for &child in &node.children {
                if child >= len {
                    return Err(Error::malformed(
                        &file_path,
                        format!("node {} references dangling child {}", index, child),
                    ));
                }
                if child == root {
                    return Err(Error::malformed(
                        &file_path,
                        format!("cycle: node {} lists the root as a child", index),
                    ));
                }
                if let Some(existing) = parents[child] {
                    return Err(Error::malformed(
                        &file_path,
                        format!(
                            "node {} is shared by parents {} and {}",
                            child, existing, index
                        ),
                    ));
                }
                parents[child] = Some(index);
            }
        }

        // With single parents, whatever the root cannot reach is a cycle or an orphan.
        let mut reachable = vec![false; len];
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            reachable[index] = true;
            stack.extend(nodes[index].children.iter().copied());
        }
        if let Some(index) = reachable.iter().position(|r| !r) {
            return Err(Error::malformed(&file_path, unreachable_reason(index, &parents)));
        }

        let mut slots: Vec<Option<RawArenaNode>> = nodes.into_iter().map(Some).collect();
        let root_node = build_tree(root, &mut slots, &file_path)?;
        let ast = RawAst::new(file_path, root_node);
        ast.validate()?;
        Ok(ast)
    }
}

fn unreachable_reason(index: usize, parents: &[Option<usize>]) -> String {
    let mut visited = HashSet::new();
    let mut current = index;
    while let Some(parent) = parents[current] {
        if !visited.insert(current) {
            return format!("cycle through node {}", current);
        }
        current = parent;
    }
    format!("node {} is not reachable from the root", index)
}

/// Move arena entries into an owned tree, post-order with an explicit stack.
fn build_tree(root: usize, slots: &mut [Option<RawArenaNode>], file_path: &str) -> Result<RawNode> {
    let mut stack = vec![take_slot(root, slots, file_path)?];

    while let Some((_, pending)) = stack.last_mut() {
        if let Some(child) = pending.next() {
            let frame = take_slot(child, slots, file_path)?;
            stack.push(frame);
            continue;
        }
        let Some((done, _)) = stack.pop() else { break };
        match stack.last_mut() {
            Some((parent, _)) => parent.children.push(done),
            None => return Ok(done),
        }
    }
    Err(Error::malformed(file_path, "empty tree"))
}

/// A childless node plus the arena indices of the children it still needs
fn take_slot(
    index: usize,
    slots: &mut [Option<RawArenaNode>],
    file_path: &str,
) -> Result<(RawNode, std::vec::IntoIter<usize>)> {
    let RawArenaNode {
        kind,
        text,
        start,
        end,
        start_byte,
        end_byte,
        children,
    } = slots
        .get_mut(index)
        .and_then(Option::take)
        .ok_or_else(|| Error::malformed(file_path, format!("node {} visited twice", index)))?;

    let node = RawNode {
        kind,
        text,
        start,
        end,
        start_byte,
        end_byte,
        children: Vec::with_capacity(children.len()),
    };
    Ok((node, children.into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_node(kind: &str, span: Range<usize>, children: Vec<usize>) -> RawArenaNode {
        RawArenaNode {
            kind: kind.to_string(),
            text: String::new(),
            start: Point::new(0, span.start),
            end: Point::new(0, span.end),
            start_byte: span.start,
            end_byte: span.end,
            children,
        }
    }

    #[test]
    fn test_arena_into_tree() {
        let arena = RawArena {
            file_path: "a.py".to_string(),
            root: 0,
            nodes: vec![
                arena_node("py:module", 0..10, vec![2, 1]),
                arena_node("py:identifier", 5..10, vec![]),
                arena_node("py:identifier", 0..4, vec![]),
            ],
        };

        let ast = arena.into_ast().unwrap();
        assert_eq!(ast.root.children.len(), 2);
        // Child order follows the arena's child list, not the index order
        assert_eq!(ast.root.children[0].start_byte, 0);
        assert_eq!(ast.root.node_count(), 3);
    }

    #[test]
    fn test_arena_dangling_child() {
        let arena = RawArena {
            file_path: "a.py".to_string(),
            root: 0,
            nodes: vec![arena_node("py:module", 0..10, vec![7])],
        };
        let err = arena.into_ast().unwrap_err();
        assert!(err.to_string().contains("dangling"));
    }

    #[test]
    fn test_arena_cycle() {
        let arena = RawArena {
            file_path: "a.py".to_string(),
            root: 0,
            nodes: vec![
                arena_node("py:module", 0..10, vec![]),
                arena_node("py:block", 0..10, vec![2]),
                arena_node("py:block", 0..10, vec![1]),
            ],
        };
        let err = arena.into_ast().unwrap_err();
        assert!(err.to_string().contains("cycle"));

        let back_to_root = RawArena {
            file_path: "a.py".to_string(),
            root: 0,
            nodes: vec![
                arena_node("py:module", 0..10, vec![1]),
                arena_node("py:block", 0..10, vec![0]),
            ],
        };
        assert!(matches!(back_to_root.into_ast(), Err(Error::MalformedTree { .. })));
    }

    #[test]
    fn test_arena_shared_child() {
        let arena = RawArena {
            file_path: "a.py".to_string(),
            root: 0,
            nodes: vec![
                arena_node("py:module", 0..10, vec![1, 2]),
                arena_node("py:block", 0..5, vec![3]),
                arena_node("py:block", 5..10, vec![3]),
                arena_node("py:identifier", 5..6, vec![]),
            ],
        };
        let err = arena.into_ast().unwrap_err();
        assert!(err.to_string().contains("shared"));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let inverted = RawAst::new("a.ts", RawNode::new("ts:program", "", 5..2));
        assert!(inverted.validate().is_err());

        let outside = RawAst::new(
            "a.ts",
            RawNode::new("ts:program", "x", 0..1).child(RawNode::new("ts:identifier", "y", 3..4)),
        );
        assert!(outside.validate().is_err());

        let twins = RawAst::new(
            "a.ts",
            RawNode::new("ts:program", "xx", 0..2)
                .child(RawNode::new("ts:identifier", "x", 0..1))
                .child(RawNode::new("ts:identifier", "x", 0..1)),
        );
        assert!(twins.validate().is_err());
    }

    /// `depth` nested blocks under a module, ending in one identifier
    fn chain(depth: usize) -> RawArena {
        let mut nodes: Vec<RawArenaNode> = (0..depth)
            .map(|i| arena_node("py:parenthesized_expression", 0..1, vec![i + 1]))
            .collect();
        nodes.push(arena_node("py:identifier", 0..1, vec![]));
        nodes[0].kind = "py:module".to_string();
        RawArena {
            file_path: "deep.py".to_string(),
            root: 0,
            nodes,
        }
    }

    #[test]
    fn test_deep_arena_builds_without_recursion() {
        let ast = chain(100_000).into_ast().unwrap();
        assert_eq!(ast.root.node_count(), 100_001);

        let mut leaf = &ast.root;
        while let Some(child) = leaf.children.first() {
            leaf = child;
        }
        assert_eq!(leaf.kind, "py:identifier");
    }

    #[test]
    fn test_deep_arena_with_bad_leaf_is_rejected() {
        let mut arena = chain(100_000);
        let last = arena.nodes.len() - 1;
        arena.nodes[last].start_byte = 3;
        arena.nodes[last].end_byte = 4;

        let err = arena.into_ast().unwrap_err();
        assert!(err.to_string().contains("outside parent"));
    }

    #[test]
    fn test_deep_owned_tree_drops() {
        let mut node = RawNode::new("py:identifier", "a", 0..1);
        for _ in 0..100_000 {
            node = RawNode::new("py:parenthesized_expression", "a", 0..1).child(node);
        }
        assert_eq!(node.node_count(), 100_001);
        drop(node);
    }

    #[test]
    fn test_arena_deserializes_from_json() {
        let json = r#"{
            "file_path": "Main.java",
            "root": 0,
            "nodes": [
                {"type": "java:program", "text": "class A {}", "start": {"row": 0, "column": 0},
                 "end": {"row": 0, "column": 10}, "start_byte": 0, "end_byte": 10, "children": [1]},
                {"type": "java:identifier", "text": "A", "start": {"row": 0, "column": 6},
                 "end": {"row": 0, "column": 7}, "start_byte": 6, "end_byte": 7}
            ]
        }"#;
        let arena: RawArena = serde_json::from_str(json).unwrap();
        let ast = arena.into_ast().unwrap();
        assert_eq!(ast.root.children[0].text, "A");
    }
}
