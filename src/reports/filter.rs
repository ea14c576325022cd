//! Client-side refinement filters layered over an already-fetched report
//! dataset. Each criterion is an independent AND predicate, so the result
//! is the same whatever order the criteria were set in, and changing them
//! never refetches.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::record::Status;
use crate::models::validate::parse_date;

#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub status: Option<Status>,
    pub year: Option<String>,
    pub branch: Option<String>,
    /// Case-insensitive substring match on employee name or id.
    pub employee: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ViewFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.year.is_none()
            && self.branch.is_none()
            && self.employee.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    pub fn matches(&self, row: &Value) -> bool {
        if let Some(status) = self.status {
            if row.get("status").and_then(Value::as_str) != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if row.get("academicYear").and_then(Value::as_str) != Some(year.as_str()) {
                return false;
            }
        }
        if let Some(branch) = &self.branch {
            if row.get("department").and_then(Value::as_str) != Some(branch.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.employee {
            let needle = needle.to_lowercase();
            let name = row.get("employee").and_then(Value::as_str).unwrap_or("");
            let emp_id = row.get("empId").and_then(Value::as_str).unwrap_or("");
            if !name.to_lowercase().contains(&needle) && !emp_id.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            // Date bounds only constrain rows that carry a date field.
            if let Some(date) = row_date(row) {
                if let Some(from) = self.date_from {
                    if date < from {
                        return false;
                    }
                }
                if let Some(to) = self.date_to {
                    if date > to {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn apply<'a>(&self, rows: &'a [Value]) -> Vec<&'a Value> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

fn row_date(row: &Value) -> Option<NaiveDate> {
    row.get("date")
        .or_else(|| row.get("date2"))
        .and_then(Value::as_str)
        .and_then(parse_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({"empId": "E1", "employee": "Ana Rao", "department": "CSE",
                   "academicYear": "2023-24", "status": "Accepted", "date": "2024-03-15"}),
            json!({"empId": "E2", "employee": "Ben Das", "department": "ECE",
                   "academicYear": "2023-24", "status": "Pending", "date": "2023-09-01"}),
            json!({"empId": "E3", "employee": "Anand Iyer", "department": "CSE",
                   "academicYear": "2022-23", "status": "Accepted", "date": "2022-11-20"}),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let rows = rows();
        assert_eq!(ViewFilter::default().apply(&rows).len(), 3);
    }

    #[test]
    fn status_then_employee_equals_employee_then_status() {
        let rows = rows();

        let mut a = ViewFilter::default();
        a.status = Some(Status::Accepted);
        a.employee = Some("ana".into());

        let mut b = ViewFilter::default();
        b.employee = Some("ana".into());
        b.status = Some(Status::Accepted);

        let ids =
            |f: &ViewFilter| f.apply(&rows).iter().map(|r| r["empId"].clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a), vec![json!("E1"), json!("E3")]);
    }

    #[test]
    fn employee_matches_id_substring_case_insensitive() {
        let rows = rows();
        let mut f = ViewFilter::default();
        f.employee = Some("e2".into());
        let matched = f.apply(&rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["employee"], "Ben Das");
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let rows = rows();
        let mut f = ViewFilter::default();
        f.date_from = NaiveDate::from_ymd_opt(2023, 9, 1);
        f.date_to = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(f.apply(&rows).len(), 2);
    }

    #[test]
    fn rows_without_a_date_pass_date_bounds() {
        let rows = vec![json!({"empId": "E9", "employee": "No Date", "status": "Pending"})];
        let mut f = ViewFilter::default();
        f.date_from = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(f.apply(&rows).len(), 1);
    }
}
