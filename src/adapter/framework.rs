//! Core provider framework
//!
//! Defines the trait every raw AST provider implements and the registry that
//! maps files to providers by extension.

use crate::raw::RawAst;
use crate::Result;
use std::path::Path;

/// Trait for raw AST providers
///
/// Each provider is responsible for:
/// 1. Identifying files it can parse
/// 2. Producing a raw tree with language-prefixed grammar types
pub trait RawAstProvider: Send + Sync {
    /// Get the language name (for display)
    fn language_name(&self) -> &str;

    /// Get file extensions this provider handles
    fn file_extensions(&self) -> &[&str];

    /// Check if this provider can handle a file
    fn can_handle(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.file_extensions().contains(&ext)
        } else {
            false
        }
    }

    /// Parse a file into a raw tree
    fn parse_file(&self, path: &str, content: &str) -> Result<RawAst>;
}

/// Registry of raw AST providers
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn RawAstProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider
    pub fn register(&mut self, provider: impl RawAstProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Find a provider for a file
    pub fn find_provider(&self, path: &Path) -> Option<&dyn RawAstProvider> {
        self.providers
            .iter()
            .find(|p| p.can_handle(path))
            .map(|p| p.as_ref())
    }

    /// Get all registered providers
    pub fn providers(&self) -> &[Box<dyn RawAstProvider>] {
        &self.providers
    }

    /// Every extension some provider handles
    pub fn extensions(&self) -> Vec<&str> {
        self.providers
            .iter()
            .flat_map(|p| p.file_extensions().iter().copied())
            .collect()
    }

    /// Parse a file using the appropriate provider
    pub fn parse_file(&self, path: &Path, content: &str) -> Result<Option<RawAst>> {
        if let Some(provider) = self.find_provider(path) {
            let file_path = path.to_string_lossy();
            let raw = provider.parse_file(&file_path, content)?;
            Ok(Some(raw))
        } else {
            Ok(None)
        }
    }
}

/// Create a registry with the tree-sitter providers for Java, Python and TypeScript
pub fn default_registry() -> ProviderRegistry {
    use super::tree_sitter_provider::{Grammar, TreeSitterProvider};

    let mut registry = ProviderRegistry::new();
    for grammar in Grammar::all() {
        registry.register(TreeSitterProvider::new(*grammar));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawNode;

    struct TestProvider;

    impl RawAstProvider for TestProvider {
        fn language_name(&self) -> &str { "test" }
        fn file_extensions(&self) -> &[&str] { &["test"] }
        fn parse_file(&self, path: &str, content: &str) -> Result<RawAst> {
            Ok(RawAst::new(path, RawNode::new("test:file", content, 0..content.len())))
        }
    }

    #[test]
    fn test_registry() {
        let mut registry = ProviderRegistry::new();
        registry.register(TestProvider);

        assert!(registry.find_provider(Path::new("foo.test")).is_some());
        assert!(registry.find_provider(Path::new("foo.other")).is_none());

        let raw = registry.parse_file(Path::new("foo.test"), "abc").unwrap().unwrap();
        assert_eq!(raw.root.text, "abc");
        assert!(registry.parse_file(Path::new("foo.other"), "abc").unwrap().is_none());
    }

    #[test]
    fn test_default_registry_extensions() {
        let registry = default_registry();
        assert!(registry.find_provider(Path::new("src/Main.java")).is_some());
        assert!(registry.find_provider(Path::new("pkg/mod.py")).is_some());
        assert!(registry.find_provider(Path::new("web/app.ts")).is_some());
        assert!(registry.find_provider(Path::new("web/view.tsx")).is_some());
        assert!(registry.find_provider(Path::new("main.go")).is_none());
        assert!(registry.extensions().contains(&"pyi"));
    }
}
