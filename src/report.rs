//! Run reports
//!
//! Flattens an [`Analysis`] into something a person or a tool can read:
//! every error carries its identifier text and 1-based location, so the
//! report stands on its own without the graph.

use crate::analysis::Analysis;
use crate::diagnostics::{ErrorCode, Location, SkippedFile};
use crate::graph::GraphStats;
use crate::namespace::NamespaceTable;
use crate::resolver::ResolutionStats;
use crate::ui::table::{error_table, skipped_table, stats_table};
use crate::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub code: ErrorCode,
    pub message: String,
    /// Text of the offending reference node
    pub identifier: String,
    pub file_path: String,
    pub node_id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub errors: Vec<ReportEntry>,
    pub skipped: Vec<SkippedFile>,
    pub resolution: ResolutionStats,
    pub graph: GraphStats,
    pub namespaces: NamespaceTable,
}

impl Report {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let errors = analysis
            .errors
            .iter()
            .map(|error| {
                let identifier = analysis
                    .graph
                    .node(&error.file_path, &error.node_id)
                    .map(|node| node.text.clone())
                    .unwrap_or_default();
                ReportEntry {
                    code: error.code,
                    message: error.message.clone(),
                    identifier,
                    file_path: error.file_path.clone(),
                    node_id: error.node_id,
                    location: error.locate(&analysis.graph),
                }
            })
            .collect();

        Self {
            errors,
            skipped: analysis.skipped.clone(),
            resolution: analysis.stats.clone(),
            graph: analysis.graph.stats(),
            namespaces: analysis.graph.namespaces().clone(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Plain-text rendering: error table, skipped files, summary
    pub fn render_human(&self) -> String {
        let mut out = String::new();

        if self.errors.is_empty() {
            out.push_str("No unresolved identifiers.\n");
        } else {
            out.push_str(&error_table(&self.errors));
            out.push('\n');
        }

        if !self.skipped.is_empty() {
            out.push_str(&format!("\nSkipped {} file(s):\n", self.skipped.len()));
            out.push_str(&skipped_table(&self.skipped));
            out.push('\n');
        }

        let files = self.graph.files.to_string();
        let nodes = self.graph.nodes.to_string();
        let references = self.resolution.references.to_string();
        let unresolved = self.resolution.unresolved.to_string();
        let namespaces = self.namespaces.len().to_string();
        out.push('\n');
        out.push_str(&stats_table(&[
            ("Files", files.as_str()),
            ("Nodes", nodes.as_str()),
            ("References", references.as_str()),
            ("Unresolved", unresolved.as_str()),
            ("Namespace paths", namespaces.as_str()),
        ]));
        out.push('\n');
        out
    }
}
