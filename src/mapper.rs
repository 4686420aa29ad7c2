use crate::rules::{normalize_header, FieldRules};
use std::collections::HashSet;
use strsim::jaro_winkler;
use tracing::debug;

/// One raw column claimed by a canonical field.
#[derive(Debug, Clone)]
pub struct MappedColumn {
    /// Canonical field name.
    pub field: String,
    /// Raw source header as it appeared in the upload.
    pub source: String,
    /// Column index in the input table.
    pub source_index: usize,
    /// Index of the matching rule in `FieldRules::fields`.
    pub rule_index: usize,
}

/// Result of the shared header-resolution step, computed once per run.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    /// Claimed columns in input-column order, so a record set that already
    /// uses canonical headers keeps its column layout.
    pub mapped: Vec<MappedColumn>,
    /// Raw headers with no canonical target; dropped from the cleaned output.
    pub unmapped: Vec<String>,
}

/// Resolve raw headers against the synonym table. Pure function of
/// (headers, rules): no I/O, no hidden state.
///
/// Each raw column maps to at most one canonical field, and each canonical
/// field captures at most one raw column; when two columns resolve to the
/// same field the leftmost wins and later duplicates are reported unmapped.
pub fn resolve_headers(headers: &[String], rules: &FieldRules) -> HeaderMap {
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut mapped = Vec::new();
    let mut unmapped = Vec::new();

    for (idx, raw) in headers.iter().enumerate() {
        let normalized = normalize_header(raw);
        let target = rules.resolve_alias_rule(&normalized).or_else(|| {
            rules
                .fuzzy_threshold
                .and_then(|threshold| fuzzy_resolve(&normalized, rules, threshold))
        });

        match target {
            Some(rule_index) if !claimed.contains(&rule_index) => {
                let field = &rules.fields[rule_index].name;
                debug!("Mapped column '{}' -> '{}'", raw, field);
                claimed.insert(rule_index);
                mapped.push(MappedColumn {
                    field: field.clone(),
                    source: raw.clone(),
                    source_index: idx,
                    rule_index,
                });
            }
            _ => unmapped.push(raw.clone()),
        }
    }

    HeaderMap { mapped, unmapped }
}

/// Fallback for headers with no exact alias match: best Jaro-Winkler score
/// over all aliases, accepted only above the threshold. Ties keep the
/// earliest-declared field, so resolution stays deterministic.
fn fuzzy_resolve(normalized: &str, rules: &FieldRules, threshold: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (alias, rule_index) in rules.aliases() {
        let score = jaro_winkler(normalized, alias);
        if score >= threshold && best.map_or(true, |(_, b)| score > b) {
            best = Some((rule_index, score));
        }
    }
    best.map(|(rule_index, _)| rule_index)
}
