//! Cell normalization for report tables and the Excel export: both paths
//! display exactly the same text for a given cell.

use serde_json::Value;

/// Normalize one cell value for display.
/// Null and missing values render as a dash, ISO-8601 timestamps as a
/// short locale date, nested structures as compact JSON.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => match chrono::DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.date_naive().format("%-m/%-d/%Y").to_string(),
            Err(_) => s.clone(),
        },
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(v @ (Value::Object(_) | Value::Array(_))) => {
            serde_json::to_string(v).unwrap_or_else(|_| "-".to_string())
        }
    }
}

/// Text for the status column: the status word, with the rejection reason
/// appended in parentheses for rejected records (a dash when absent).
pub fn status_text(row: &Value) -> String {
    let status = row.get("status").and_then(Value::as_str).unwrap_or("-");
    if status == "Rejected" {
        let reason = row
            .get("rejectReason")
            .and_then(Value::as_str)
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("-");
        format!("{status} ({reason})")
    } else {
        status.to_string()
    }
}

/// Resolve the display text for one column of one row.
pub fn cell_text(row: &Value, key: &str) -> String {
    if key == "status" {
        status_text(row)
    } else {
        display_value(row.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_missing_render_as_dash() {
        assert_eq!(display_value(None), "-");
        assert_eq!(display_value(Some(&Value::Null)), "-");
    }

    #[test]
    fn iso_datetime_renders_as_locale_date() {
        let v = json!("2024-03-15T00:00:00.000Z");
        assert_eq!(display_value(Some(&v)), "3/15/2024");
    }

    #[test]
    fn plain_strings_pass_through() {
        let v = json!("IEEE Access");
        assert_eq!(display_value(Some(&v)), "IEEE Access");
    }

    #[test]
    fn objects_render_as_json() {
        let v = json!({"a": 1});
        assert_eq!(display_value(Some(&v)), r#"{"a":1}"#);
    }

    #[test]
    fn rejected_status_carries_reason() {
        let row = json!({"status": "Rejected", "rejectReason": "Missing proof"});
        assert_eq!(status_text(&row), "Rejected (Missing proof)");

        let row = json!({"status": "Rejected", "rejectReason": null});
        assert_eq!(status_text(&row), "Rejected (-)");

        let row = json!({"status": "Accepted"});
        assert_eq!(status_text(&row), "Accepted");
    }
}
