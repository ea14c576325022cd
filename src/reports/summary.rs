//! The SUMMARY report: a wrapped per-faculty aggregate rather than a flat
//! record list.

use rusqlite::{Connection, params};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// Response shape for `type=SUMMARY`: callers must unwrap `data` before the
/// common table-rendering path.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub data: Vec<Value>,
    pub department: String,
    pub year: String,
    #[serde(rename = "facultyCount")]
    pub faculty_count: usize,
}

/// Aggregate submission counts per faculty member across every record type.
pub fn build(
    conn: &Connection,
    year: Option<&str>,
    department: Option<&str>,
) -> Result<SummaryReport, AppError> {
    let mut stmt = conn.prepare(
        "SELECT emp_id, employee, department, \
                COUNT(*), \
                COALESCE(SUM(status = 'Accepted'), 0), \
                COALESCE(SUM(status = 'Pending'), 0), \
                COALESCE(SUM(status = 'Rejected'), 0) \
         FROM records \
         WHERE (?1 IS NULL OR academic_year = ?1) \
           AND (?2 IS NULL OR department = ?2) \
         GROUP BY emp_id, employee, department \
         ORDER BY employee ASC",
    )?;

    let rows = stmt.query_map(params![year, department], |row| {
        Ok(serde_json::json!({
            "empId": row.get::<_, String>(0)?,
            "employee": row.get::<_, String>(1)?,
            "department": row.get::<_, String>(2)?,
            "total": row.get::<_, i64>(3)?,
            "accepted": row.get::<_, i64>(4)?,
            "pending": row.get::<_, i64>(5)?,
            "rejected": row.get::<_, i64>(6)?,
        }))
    })?;
    let data = rows.collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(SummaryReport {
        faculty_count: data.len(),
        department: department.unwrap_or("ALL").to_string(),
        year: year.unwrap_or("all").to_string(),
        data,
    })
}
