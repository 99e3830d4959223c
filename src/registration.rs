//! Registration - symbol extraction from one canonical AST
//!
//! One pre-order walk, dispatching on role only:
//! - `ModulePath` -> namespace table of the node's language
//! - declarations -> `file_symbols` (and `exported_symbols` unless nested in a function)
//! - `ImportTarget` -> `imported_symbols` with unknown kind
//!
//! Registration never resolves anything and never fails. The namespace paths
//! it finds are returned as a partial table for the graph builder to merge.

use crate::canonical::{CanonicalAst, CanonicalNode, NodeId, NodeRole};
use crate::namespace::NamespaceTable;
use crate::symbol::{ScopedSymbolTable, Symbol, SymbolKind};

/// Everything registration learned from one file.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub symbols: ScopedSymbolTable,
    /// Partial namespace table, merged project-wide by the graph builder
    pub namespaces: NamespaceTable,
}

/// Register every declaration, import and namespace path of a file.
pub fn register(ast: &CanonicalAst) -> Registration {
    let mut registration = Registration::default();

    // (node, nested inside a function declaration)
    let mut stack: Vec<(&NodeId, bool)> = vec![(&ast.root, false)];

    while let Some((id, in_function)) = stack.pop() {
        let Some(node) = ast.node(id) else {
            continue;
        };

        match node.role {
            NodeRole::ModulePath => {
                registration.namespaces.insert(node.language, node.text.clone());
            }
            NodeRole::TypeDeclaration => {
                declare(ast, node, SymbolKind::Class, in_function, &mut registration.symbols);
            }
            NodeRole::FunctionDeclaration => {
                declare(ast, node, SymbolKind::Function, in_function, &mut registration.symbols);
            }
            NodeRole::VariableDeclaration => {
                declare(ast, node, SymbolKind::Variable, in_function, &mut registration.symbols);
            }
            NodeRole::ImportTarget => {
                // An import alone does not say what the name denotes
                registration.symbols.import(Symbol::new(
                    node.text.clone(),
                    SymbolKind::Unknown,
                    &node.file_path,
                    node.id,
                ));
            }
            NodeRole::NamespaceSegment
            | NodeRole::TypeReference
            | NodeRole::FunctionCall
            | NodeRole::VariableReference
            | NodeRole::FieldReference
            | NodeRole::Unknown => {}
        }

        let nested = in_function || node.role == NodeRole::FunctionDeclaration;
        stack.extend(node.children.iter().rev().map(|child| (child, nested)));
    }

    tracing::debug!(
        "registered {}: {} declared, {} imported, {} namespace paths",
        ast.file_path,
        registration.symbols.file_symbols.len(),
        registration.symbols.imported_symbols.len(),
        registration.namespaces.len()
    );

    registration
}

fn declare(
    ast: &CanonicalAst,
    node: &CanonicalNode,
    kind: SymbolKind,
    in_function: bool,
    symbols: &mut ScopedSymbolTable,
) {
    let symbol = Symbol::new(primary_identifier(ast, node), kind, &node.file_path, node.id);
    if !in_function {
        symbols.export(symbol.clone());
    }
    symbols.declare(symbol);
}

/// The declared name: the first child that is a bare reference, or the
/// declaration's own text when there is none.
pub fn primary_identifier<'a>(ast: &'a CanonicalAst, node: &'a CanonicalNode) -> &'a str {
    ast.children(node)
        .find(|child| child.role == NodeRole::VariableReference)
        .map_or(node.text.as_str(), |child| child.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Canonicalizer, Language};
    use crate::raw::{RawAst, RawNode};

    fn canonical(file: &str, root: RawNode) -> CanonicalAst {
        Canonicalizer::new().canonicalize(RawAst::new(file, root))
    }

    #[test]
    fn test_register_declarations() {
        // class Box: def open(self): lid = 1
        let ast = canonical(
            "box.py",
            RawNode::new("py:module", "class Box: ...", 0..40).child(
                RawNode::new("py:class_definition", "class Box: ...", 0..40)
                    .child(RawNode::new("py:identifier", "Box", 6..9))
                    .child(
                        RawNode::new("py:function_definition", "def open(self): lid = 1", 11..40)
                            .child(RawNode::new("py:identifier", "open", 15..19))
                            .child(
                                RawNode::new("py:assignment", "lid = 1", 27..34)
                                    .child(RawNode::new("py:identifier", "lid", 27..30)),
                            ),
                    ),
            ),
        );

        let registration = register(&ast);
        let symbols = &registration.symbols;
        assert_eq!(symbols.file_symbols["Box"].kind, SymbolKind::Class);
        assert_eq!(symbols.file_symbols["open"].kind, SymbolKind::Function);
        assert_eq!(symbols.file_symbols["lid"].kind, SymbolKind::Variable);

        // Locals of a function are not exported
        assert!(symbols.exported_symbols.contains_key("Box"));
        assert!(symbols.exported_symbols.contains_key("open"));
        assert!(!symbols.exported_symbols.contains_key("lid"));
        assert!(symbols.imported_symbols.is_empty());
    }

    #[test]
    fn test_declaration_without_identifier_uses_own_text() {
        let ast = canonical(
            "a.ts",
            RawNode::new("ts:program", "class Foo {}", 0..12).child(
                RawNode::new("ts:class_declaration", "class Foo {}", 0..12)
                    .child(RawNode::new("ts:type_identifier", "Foo", 6..9)),
            ),
        );

        let registration = register(&ast);
        assert!(registration.symbols.file_symbols.contains_key("class Foo {}"));
    }

    #[test]
    fn test_register_imports_and_namespaces() {
        let ast = canonical(
            "a.ts",
            RawNode::new("ts:program", "import { Foo } from './foo';", 0..28).child(
                RawNode::new("ts:import_statement", "import { Foo } from './foo';", 0..28).child(
                    RawNode::new("ts:import_clause", "{ Foo }", 7..14)
                        .child(RawNode::new("ts:import_specifier", "Foo", 9..12)),
                ),
            ),
        );

        let registration = register(&ast);
        let imported = &registration.symbols.imported_symbols["Foo"];
        assert_eq!(imported.kind, SymbolKind::Unknown);
        assert!(registration.symbols.file_symbols.is_empty());
        assert!(registration
            .namespaces
            .contains(Language::TypeScript, "import { Foo } from './foo';"));
    }

    #[test]
    fn test_duplicate_module_path_registers_once() {
        let ast = canonical(
            "a.py",
            RawNode::new("py:module", "import os\nimport os", 0..19)
                .child(RawNode::new("py:import_statement", "import os", 0..9))
                .child(RawNode::new("py:import_statement", "import os", 10..19)),
        );

        let registration = register(&ast);
        assert_eq!(registration.namespaces.count(Language::Python), 1);
    }
}
