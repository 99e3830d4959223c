use crate::canonical::CanonicalNode;
use crate::diagnostics::SkippedFile;
use crate::report::ReportEntry;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct ErrorRow {
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Identifier")]
    pub identifier: String,
}

#[derive(Tabled)]
pub struct SkippedRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

#[derive(Tabled)]
pub struct NodeRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Span")]
    pub span: String,
    #[tabled(rename = "Text")]
    pub text: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

pub fn error_table(entries: &[ReportEntry]) -> String {
    let rows: Vec<ErrorRow> = entries
        .iter()
        .map(|entry| ErrorRow {
            location: match entry.location {
                Some(location) => format!("{}:{}", entry.file_path, location),
                None => entry.file_path.clone(),
            },
            code: entry.code.to_string(),
            identifier: truncate(&entry.identifier, 48),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn skipped_table(skipped: &[SkippedFile]) -> String {
    let rows: Vec<SkippedRow> = skipped
        .iter()
        .map(|file| SkippedRow {
            file: file.file_path.clone(),
            reason: file.reason.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn node_table(nodes: &[&CanonicalNode]) -> String {
    let rows: Vec<NodeRow> = nodes
        .iter()
        .map(|node| NodeRow {
            id: node.id.short(),
            role: node.role.as_str().to_string(),
            kind: node.kind.clone(),
            span: format!(
                "{}:{}-{}:{}",
                node.start.row + 1,
                node.start.column + 1,
                node.end.row + 1,
                node.end.column + 1
            ),
            text: truncate(&node.text, 40),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Single-line, length-capped cell text
fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && line.len() == text.len() {
        return line.to_string();
    }
    let cut: String = line.chars().take(max).collect();
    format!("{}…", cut)
}
