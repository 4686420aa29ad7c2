//! Validation and cleaning pass: a single stateless sweep over one table.
//! Rows are never dropped; every recoverable problem goes into the report.

use crate::dates;
use crate::mapper;
use crate::report::{Issue, IssueKind, Report};
use crate::rules::{FieldRules, FieldType};
use crate::table::Table;
use std::collections::HashSet;

/// Map, validate and clean a raw record set against the field rules.
///
/// The cleaned output holds exactly the mapped columns, renamed to their
/// canonical fields in input-column order, with the same row count as the
/// input; already-canonical input is passed through with its layout intact.
/// Deterministic: identical inputs yield identical outputs.
pub fn clean(table: &Table, rules: &FieldRules) -> (Table, Report) {
    let header_map = mapper::resolve_headers(&table.headers, rules);
    let mut report = Report::default();

    for raw in &header_map.unmapped {
        report.push(Issue::column(raw, IssueKind::UnmappedColumn));
    }

    let mapped_fields: HashSet<&str> = header_map.mapped.iter().map(|m| m.field.as_str()).collect();
    for field in &rules.fields {
        if field.required && !mapped_fields.contains(field.name.as_str()) {
            report.push(Issue::column(&field.name, IssueKind::MissingColumn));
        }
    }

    let headers: Vec<String> = header_map.mapped.iter().map(|m| m.field.clone()).collect();
    let mut rows = Vec::with_capacity(table.rows.len());

    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut out = Vec::with_capacity(header_map.mapped.len());
        for column in &header_map.mapped {
            let rule = &rules.fields[column.rule_index];
            let value = row.get(column.source_index).cloned().unwrap_or_default();
            let trimmed = value.trim();

            if trimmed.is_empty() {
                if rule.required {
                    report.push(Issue::cell(row_idx, &rule.name, IssueKind::MissingRequired));
                }
                out.push(value);
                continue;
            }

            match rule.field_type {
                FieldType::Date => match dates::normalize_date(trimmed, &rules.date_formats) {
                    Some(normalized) => out.push(normalized),
                    None => {
                        report.push(Issue::cell(row_idx, &rule.name, IssueKind::UnparsableDate));
                        out.push(value);
                    }
                },
                FieldType::Number => match normalize_number(trimmed) {
                    Some(normalized) => out.push(normalized),
                    None => {
                        report.push(Issue::cell(row_idx, &rule.name, IssueKind::UnparsableNumber));
                        out.push(value);
                    }
                },
                FieldType::Text => out.push(value),
            }
        }
        rows.push(out);
    }

    (Table { headers, rows }, report)
}

/// Strip thousands separators and check the remainder parses as a finite
/// number. Commas are only accepted in genuine thousands positions, and
/// `inf`/`NaN` are rejected. The textual form is kept rather than
/// re-rendered through a float.
fn normalize_number(value: &str) -> Option<String> {
    let stripped = strip_thousands_separators(value)?;
    match stripped.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(stripped),
        _ => None,
    }
}

fn strip_thousands_separators(value: &str) -> Option<String> {
    if !value.contains(',') {
        return Some(value.to_string());
    }

    let (sign, rest) = if let Some(r) = value.strip_prefix('-') {
        ("-", r)
    } else if let Some(r) = value.strip_prefix('+') {
        ("+", r)
    } else {
        ("", value)
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };
    if frac_part.map_or(false, |f| f.contains(',')) {
        return None;
    }

    // Leading group of 1-3 digits, every later group exactly 3.
    let groups: Vec<&str> = int_part.split(',').collect();
    let all_digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());
    if groups[0].len() > 3
        || !all_digits(groups[0])
        || groups[1..].iter().any(|g| g.len() != 3 || !all_digits(g))
    {
        return None;
    }

    let mut out = String::with_capacity(value.len());
    out.push_str(sign);
    out.push_str(&groups.concat());
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    Some(out)
}
