//! Namespace table - project-wide record of package/module paths
//!
//! Registration produces one partial table per file; the graph builder merges
//! them by set union. Tables only ever grow.

use crate::canonical::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-language sets of declared namespace/module paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTable {
    paths: BTreeMap<Language, BTreeSet<String>>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path; returns false if it was already present.
    pub fn insert(&mut self, language: Language, path: impl Into<String>) -> bool {
        self.paths.entry(language).or_default().insert(path.into())
    }

    pub fn contains(&self, language: Language, path: &str) -> bool {
        self.paths
            .get(&language)
            .is_some_and(|set| set.contains(path))
    }

    /// Paths registered for one language, sorted
    pub fn paths(&self, language: Language) -> impl Iterator<Item = &str> {
        self.paths
            .get(&language)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Languages with at least one path
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.paths
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(language, _)| *language)
    }

    /// Set-union another table into this one
    pub fn merge(&mut self, other: NamespaceTable) {
        for (language, set) in other.paths {
            self.paths.entry(language).or_default().extend(set);
        }
    }

    /// Number of paths registered for one language
    pub fn count(&self, language: Language) -> usize {
        self.paths.get(&language).map_or(0, BTreeSet::len)
    }

    /// Total number of paths across languages
    pub fn len(&self) -> usize {
        self.paths.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
