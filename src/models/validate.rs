//! Schema-driven submission validation, shared by the HTTP handler and the
//! client-side form. All violations are collected into a field -> message
//! map; a non-empty map blocks the submission.

use std::collections::BTreeMap;

use crate::models::registry::{FieldKind, RecordType};

pub const PDF_MIME: &str = "application/pdf";

/// Validate scalar field values against the type's schema.
pub fn validate_fields(
    record_type: RecordType,
    values: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    for field in record_type.fields() {
        let raw = values.get(field.key).map(String::as_str).unwrap_or("");
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if field.required {
                errors.insert(field.key.to_string(), format!("{} is required", field.label));
            }
            continue;
        }

        match field.kind {
            FieldKind::Text => {}
            FieldKind::Number => match trimmed.parse::<f64>() {
                Ok(n) => {
                    if let Some((lo, hi)) = field.bounds {
                        if n < lo || n > hi {
                            errors.insert(
                                field.key.to_string(),
                                format!("{} must be between {} and {}", field.label, lo, hi),
                            );
                        }
                    }
                }
                Err(_) => {
                    errors.insert(
                        field.key.to_string(),
                        format!("{} must be a number", field.label),
                    );
                }
            },
            FieldKind::Date => {
                if parse_date(trimmed).is_none() {
                    errors.insert(
                        field.key.to_string(),
                        format!("{} must be a valid date", field.label),
                    );
                }
            }
        }
    }

    errors
}

/// Validate the single PDF attachment. `mime` is the declared content type.
pub fn validate_file(mime: Option<&str>) -> Option<String> {
    match mime {
        None => Some("A PDF document is required".to_string()),
        Some(m) if m != PDF_MIME => Some("Document must be a PDF".to_string()),
        Some(_) => None,
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn whitespace_only_required_field_is_rejected() {
        let v = values(&[
            ("award", "   "),
            ("type1", "National"),
            ("type2", "Gold"),
            ("agency", "AICTE"),
            ("date2", "2024-03-15"),
        ]);
        let errors = validate_fields(RecordType::Awards, &v);
        assert_eq!(errors.len(), 1);
        assert!(errors["award"].contains("required"));
    }

    #[test]
    fn optional_field_may_be_empty() {
        let v = values(&[
            ("award", "Best Teacher"),
            ("type1", "National"),
            ("type2", "Gold"),
            ("agency", "AICTE"),
            ("date2", "2024-03-15"),
        ]);
        assert!(validate_fields(RecordType::Awards, &v).is_empty());
    }

    #[test]
    fn author_position_out_of_bounds() {
        let v = values(&[
            ("title", "Paper"),
            ("journal", "IEEE Access"),
            ("authorPosition", "6"),
            ("date", "2024-01-01"),
        ]);
        let errors = validate_fields(RecordType::Journals, &v);
        assert!(errors["authorPosition"].contains("between 1 and 5"));
    }

    #[test]
    fn non_numeric_number_field() {
        let v = values(&[
            ("title", "Paper"),
            ("journal", "IEEE Access"),
            ("authorPosition", "first"),
            ("date", "2024-01-01"),
        ]);
        let errors = validate_fields(RecordType::Journals, &v);
        assert!(errors["authorPosition"].contains("must be a number"));
    }

    #[test]
    fn file_must_be_pdf() {
        assert!(validate_file(None).is_some());
        assert!(validate_file(Some("image/png")).is_some());
        assert!(validate_file(Some(PDF_MIME)).is_none());
    }

    #[test]
    fn rfc3339_dates_are_accepted() {
        assert!(parse_date("2024-03-15T00:00:00.000Z").is_some());
        assert!(parse_date("15/03/2024").is_none());
    }
}
