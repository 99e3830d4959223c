//! Real parser output through the whole pipeline.

use semgraph::adapter::{default_registry, Grammar, TreeSitterProvider};
use semgraph::discovery::discover;
use semgraph::query::QueryEngine;
use semgraph::report::Report;
use semgraph::{Analyzer, Canonicalizer, Language, NodeRole, RawAst};
use std::fs;
use std::path::Path;

fn parse(grammar: Grammar, path: &str, source: &str) -> RawAst {
    TreeSitterProvider::new(grammar).parse(path, source).unwrap()
}

#[test]
fn typescript_roles_from_real_tree() {
    let source = "import { Foo } from './foo';\nfunction bar() { return 1; }\nbar();\n";
    let ast = Canonicalizer::new().canonicalize(parse(Grammar::TypeScript, "app.ts", source));
    let engine = QueryEngine::new(&ast);

    assert!(ast.preorder().all(|node| node.language == Language::TypeScript));

    let imports = engine.find_by_role(NodeRole::ImportTarget);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].text, "Foo");

    let declarations = engine.find_by_role(NodeRole::FunctionDeclaration);
    assert_eq!(declarations.len(), 1);
    assert_eq!(engine.find_by_role(NodeRole::ModulePath).len(), 1);
    assert_eq!(engine.find_by_role(NodeRole::FunctionCall).len(), 1);
}

#[test]
fn java_package_registers_namespace() {
    let source = "package com.acme.util;\n\npublic class Strings {\n  int size;\n}\n";
    let raw = parse(Grammar::Java, "Strings.java", source);
    let analysis = Analyzer::new().analyze(vec![raw]);

    let namespaces = analysis.graph.namespaces();
    assert!(namespaces.contains(Language::Java, "package com.acme.util;"));
    assert_eq!(namespaces.count(Language::Python), 0);

    let file = analysis.graph.file("Strings.java").unwrap();
    assert!(file.symbols.file_symbols.contains_key("Strings"));
    assert!(file.symbols.exported_symbols.contains_key("Strings"));

    // Nothing under the package declaration is ever reported
    let package_nodes: Vec<_> = QueryEngine::new(&file.ast)
        .find(|node| matches!(node.role, NodeRole::ModulePath | NodeRole::NamespaceSegment));
    assert!(!package_nodes.is_empty());
    for node in package_nodes {
        assert!(analysis.errors.iter().all(|e| e.node_id != node.id));
    }
}

#[test]
fn python_declared_names_resolve() {
    let source = "count = 1\ncount\nmissing\n";
    let raw = parse(Grammar::Python, "calc.py", source);
    let analysis = Analyzer::new().analyze(vec![raw]);

    let report = Report::from_analysis(&analysis);
    let flagged: Vec<&str> = report.errors.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(flagged, vec!["missing"]);

    let location = report.errors[0].location.unwrap();
    assert_eq!((location.line, location.column), (3, 1));
}

#[test]
fn python_plain_imports_only_reach_namespaces() {
    let source = "import os\nfrom os import path\nimport numpy as np\n";
    let analysis = Analyzer::new().analyze(vec![parse(Grammar::Python, "imports.py", source)]);

    let file = analysis.graph.file("imports.py").unwrap();
    let imported: Vec<&str> = file.symbols.imported_symbols.keys().map(String::as_str).collect();
    assert_eq!(imported, vec!["numpy as np"]);

    let namespaces: Vec<&str> = analysis.graph.namespaces().paths(Language::Python).collect();
    assert_eq!(namespaces.len(), 3);
    assert!(namespaces.contains(&"from os import path"));
}

#[test]
fn long_concatenation_is_analyzed_and_run_continues() {
    // One binary_operator level per `+`, so the tree is about 10,000 deep
    let deep = format!("x = {}a\n", "a+".repeat(10_000));
    let inputs = vec![
        parse(Grammar::Python, "gen.py", &deep),
        parse(Grammar::Python, "calc.py", "count = 1\nmissing\n"),
    ];
    let analysis = Analyzer::new().analyze(inputs);

    assert!(analysis.skipped.is_empty());
    assert_eq!(analysis.graph.len(), 2);

    let generated: Vec<_> = analysis.errors.iter().filter(|e| e.file_path == "gen.py").collect();
    assert_eq!(generated.len(), 10_001);
    assert!(generated.iter().all(|e| e.message == "Unresolved identifier: a"));

    let report = Report::from_analysis(&analysis);
    assert!(report.errors.iter().any(|e| e.identifier == "missing"));
}

#[test]
fn discovered_project_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("web")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::write(root.join("web/app.ts"), "function go() {}\n").unwrap();
    fs::write(root.join("web/view.tsx"), "let x = 1;\n").unwrap();
    fs::write(root.join("node_modules/pkg/index.ts"), "zzz;\n").unwrap();
    fs::write(root.join("tool.py"), "import os\n").unwrap();

    let files = discover(root, &[], Language::supported());
    assert_eq!(files.len(), 3);

    let registry = default_registry();
    let raws: Vec<RawAst> = files
        .iter()
        .map(|path| {
            let relative = path.strip_prefix(root).unwrap();
            let content = fs::read_to_string(path).unwrap();
            registry.parse_file(relative, &content).unwrap().unwrap()
        })
        .collect();

    let analysis = Analyzer::new().with_workers(2).analyze(raws);
    assert!(analysis.skipped.is_empty());
    assert_eq!(analysis.graph.len(), 3);
    assert!(analysis.graph.file("node_modules/pkg/index.ts").is_none());
    assert!(analysis
        .graph
        .namespaces()
        .contains(Language::Python, "import os"));

    let app = analysis.graph.file(&Path::new("web").join("app.ts").to_string_lossy()).unwrap();
    assert!(app.symbols.file_symbols.contains_key("go"));
}
