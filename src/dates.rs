use chrono::NaiveDate;

/// Accepted input formats, tried in order; first parse wins.
pub const DEFAULT_INPUT_FORMATS: &[&str] = &[
    "%m/%d/%Y", // MM/DD/YYYY
    "%Y-%m-%d", // ISO
    "%d-%b-%Y", // DD-Mon-YYYY
    "%m-%d-%Y",
    "%Y/%m/%d",
];

/// Canonical output format for all date-typed fields.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Try each accepted format in order and rewrite to the canonical ISO form.
/// Returns `None` when no format parses; the caller keeps the original value.
pub fn normalize_date(value: &str, formats: &[String]) -> Option<String> {
    let trimmed = value.trim();
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.format(OUTPUT_FORMAT).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_formats() -> Vec<String> {
        DEFAULT_INPUT_FORMATS.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_us_date_normalized_to_iso() {
        assert_eq!(
            normalize_date("03/04/2024", &default_formats()),
            Some("2024-03-04".to_string())
        );
    }

    #[test]
    fn test_iso_date_is_identity() {
        assert_eq!(
            normalize_date("2024-03-04", &default_formats()),
            Some("2024-03-04".to_string())
        );
    }

    #[test]
    fn test_day_month_name_format() {
        assert_eq!(
            normalize_date("15-Jan-2023", &default_formats()),
            Some("2023-01-15".to_string())
        );
    }

    #[test]
    fn test_unparsable_date_returns_none() {
        assert_eq!(normalize_date("not-a-date", &default_formats()), None);
        assert_eq!(normalize_date("13/45/2024", &default_formats()), None);
    }

    #[test]
    fn test_format_order_decides_ambiguous_dates() {
        // 03/04/2024 is March 4th because MM/DD/YYYY is tried first.
        let formats = vec!["%d/%m/%Y".to_string(), "%m/%d/%Y".to_string()];
        assert_eq!(
            normalize_date("03/04/2024", &formats),
            Some("2024-04-03".to_string())
        );
    }
}
