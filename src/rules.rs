use crate::dates;
use crate::error::{MigrateError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Target type of a canonical CMMS field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRule {
    /// Canonical field name expected by the target schema.
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Accepted legacy-header synonyms. The canonical name itself is always
    /// an implicit alias.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RulesFile {
    fields: Vec<FieldRule>,
    #[serde(default)]
    date_formats: Vec<String>,
    #[serde(default)]
    fuzzy_threshold: Option<f64>,
}

/// Field rules plus the normalized alias index, built once at load and
/// immutable afterwards. Header resolution stays a pure function of
/// (header, rules).
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub fields: Vec<FieldRule>,
    /// Ordered list of accepted date input formats (chrono strftime).
    pub date_formats: Vec<String>,
    /// Jaro-Winkler threshold for the fuzzy header fallback; `None` disables it.
    pub fuzzy_threshold: Option<f64>,

    // Indexes for header lookup
    alias_index: HashMap<String, usize>,
    alias_order: Vec<(String, usize)>,
}

impl FieldRules {
    pub fn new(
        fields: Vec<FieldRule>,
        date_formats: Vec<String>,
        fuzzy_threshold: Option<f64>,
    ) -> Result<Self> {
        if fields.is_empty() {
            return Err(MigrateError::Config("field rules are empty".to_string()));
        }

        let mut alias_index: HashMap<String, usize> = HashMap::new();
        let mut alias_order: Vec<(String, usize)> = Vec::new();

        for (idx, field) in fields.iter().enumerate() {
            let own = normalize_header(&field.name);
            if own.is_empty() {
                return Err(MigrateError::Config(
                    "field rule with an empty name".to_string(),
                ));
            }

            let mut candidates = vec![own];
            candidates.extend(field.aliases.iter().map(|a| normalize_header(a)));

            for alias in candidates {
                if alias.is_empty() {
                    continue;
                }
                match alias_index.entry(alias.clone()) {
                    Entry::Occupied(entry) => {
                        let prior = *entry.get();
                        if prior != idx {
                            // Earlier-declared field wins; collisions are a
                            // config smell worth surfacing.
                            warn!(
                                "Alias '{}' claimed by both '{}' and '{}'; keeping '{}'",
                                alias, fields[prior].name, field.name, fields[prior].name
                            );
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(idx);
                        alias_order.push((alias, idx));
                    }
                }
            }
        }

        let date_formats = if date_formats.is_empty() {
            dates::DEFAULT_INPUT_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect()
        } else {
            date_formats
        };

        Ok(Self {
            fields,
            date_formats,
            fuzzy_threshold,
            alias_index,
            alias_order,
        })
    }

    /// Load rules from the crate-native JSON format.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MigrateError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let file: RulesFile = serde_json::from_str(&content)
            .map_err(|e| MigrateError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        let rules = Self::new(file.fields, file.date_formats, file.fuzzy_threshold)?;
        info!("Loaded {} field rules from {}", rules.fields.len(), path.display());
        Ok(rules)
    }

    /// Load rules from a delimited rules sheet with columns
    /// `Field Name, Type, Required, Synonyms` (synonyms separated by `;`),
    /// the layout of the legacy rules workbook.
    pub fn from_sheet(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::Reader::from_path(path)
            .map_err(|e| MigrateError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let headers = rdr.headers()?.clone();
        let column = |wanted: &str| headers.iter().position(|h| normalize_header(h) == wanted);

        let name_idx = column("field name").ok_or_else(|| {
            MigrateError::Config(format!(
                "Rules sheet {} has no 'Field Name' column",
                path.display()
            ))
        })?;
        let type_idx = column("type");
        let required_idx = column("required");
        let synonyms_idx = column("synonyms");

        let mut fields = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let name = record.get(name_idx).unwrap_or("").trim().to_string();
            if name.is_empty() {
                continue;
            }
            let field_type = match type_idx.and_then(|i| record.get(i)) {
                Some(raw) => parse_field_type(raw)?,
                None => FieldType::Text,
            };
            let required = required_idx
                .and_then(|i| record.get(i))
                .map(parse_bool)
                .unwrap_or(false);
            let aliases = synonyms_idx
                .and_then(|i| record.get(i))
                .map(|s| {
                    s.split(';')
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            fields.push(FieldRule {
                name,
                field_type,
                required,
                aliases,
            });
        }

        let rules = Self::new(fields, Vec::new(), None)?;
        info!("Loaded {} field rules from {}", rules.fields.len(), path.display());
        Ok(rules)
    }

    /// Exact lookup of a normalized header against the alias index.
    pub fn resolve_alias(&self, normalized: &str) -> Option<&str> {
        self.resolve_alias_rule(normalized)
            .map(|idx| self.fields[idx].name.as_str())
    }

    /// Exact lookup returning the index into `fields`.
    pub fn resolve_alias_rule(&self, normalized: &str) -> Option<usize> {
        self.alias_index.get(normalized).copied()
    }

    /// All (normalized alias, field index) pairs in declaration order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.alias_order
            .iter()
            .map(|(alias, idx)| (alias.as_str(), *idx))
    }
}

/// Normalize a header or alias for lookup: trim, lowercase, collapse
/// internal whitespace.
pub fn normalize_header(s: &str) -> String {
    s.trim().to_lowercase().split_whitespace().join(" ")
}

fn parse_field_type(raw: &str) -> Result<FieldType> {
    match raw.trim().to_lowercase().as_str() {
        "" | "text" | "string" => Ok(FieldType::Text),
        "number" | "numeric" => Ok(FieldType::Number),
        "date" => Ok(FieldType::Date),
        other => Err(MigrateError::Config(format!(
            "Unknown field type '{}'",
            other
        ))),
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "y")
}
