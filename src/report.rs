use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Raw column with no canonical target; dropped from the output.
    UnmappedColumn,
    /// Required canonical field matched by no input column at all.
    MissingColumn,
    /// Required field empty in a specific row.
    MissingRequired,
    /// Date-typed cell that no accepted format parses.
    UnparsableDate,
    /// Number-typed cell that does not parse as a number.
    UnparsableNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// Canonical field name, or the raw header for unmapped columns.
    pub name: String,
    /// Zero-based data row index; `None` for column-level issues.
    pub row: Option<usize>,
}

impl Issue {
    pub fn column(name: &str, kind: IssueKind) -> Self {
        Self {
            kind,
            name: name.to_string(),
            row: None,
        }
    }

    pub fn cell(row: usize, name: &str, kind: IssueKind) -> Self {
        Self {
            kind,
            name: name.to_string(),
            row: Some(row),
        }
    }
}

/// Aggregated validation report for one run. All recoverable issues land
/// here so a whole spreadsheet can be fixed in one pass; nothing aborts on
/// first failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    /// Human-readable summary: unmapped columns, missing required columns,
    /// then per-field counts of row-level issues in first-seen order.
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return "No issues found.".to_string();
        }

        let mut lines = Vec::new();

        let unmapped: Vec<&str> = self
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::UnmappedColumn)
            .map(|i| i.name.as_str())
            .collect();
        if !unmapped.is_empty() {
            lines.push(format!("Unmapped columns (dropped): {}", unmapped.join(", ")));
        }

        for issue in self.issues.iter().filter(|i| i.kind == IssueKind::MissingColumn) {
            lines.push(format!("Required field not found in upload: {}", issue.name));
        }

        let mut order: Vec<(String, IssueKind)> = Vec::new();
        let mut counts: HashMap<(String, IssueKind), usize> = HashMap::new();
        for issue in self.issues.iter().filter(|i| i.row.is_some()) {
            let key = (issue.name.clone(), issue.kind);
            if !counts.contains_key(&key) {
                order.push(key.clone());
            }
            *counts.entry(key).or_insert(0) += 1;
        }
        for key in order {
            lines.push(format!("{}: {} {}", key.0, counts[&key], kind_label(key.1)));
        }

        lines.join("\n")
    }
}

fn kind_label(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::UnmappedColumn => "unmapped columns",
        IssueKind::MissingColumn => "missing columns",
        IssueKind::MissingRequired => "missing required values",
        IssueKind::UnparsableDate => "unparsable dates",
        IssueKind::UnparsableNumber => "unparsable numbers",
    }
}
