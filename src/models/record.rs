use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::registry::RecordType;
use crate::models::validate::parse_date;

/// Three-state record lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Accepted => "Accepted",
            Status::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Status> {
        match s {
            "Pending" => Some(Status::Pending),
            "Accepted" => Some(Status::Accepted),
            "Rejected" => Some(Status::Rejected),
            _ => None,
        }
    }
}

/// One submitted research record.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: i64,
    pub record_type: String,
    pub emp_id: String,
    pub employee: String,
    pub department: String,
    pub academic_year: String,
    pub fields: Value,
    pub document_path: Option<String>,
    pub status: Status,
    pub reject_reason: Option<String>,
    pub created_at: String,
}

impl Record {
    /// Flatten into the row shape report tables and clients consume.
    pub fn to_row(&self) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("id".into(), Value::from(self.id));
        obj.insert("empId".into(), Value::from(self.emp_id.clone()));
        obj.insert("employee".into(), Value::from(self.employee.clone()));
        obj.insert("department".into(), Value::from(self.department.clone()));
        obj.insert("academicYear".into(), Value::from(self.academic_year.clone()));
        if let Some(fields) = self.fields.as_object() {
            for (k, v) in fields {
                obj.insert(k.clone(), v.clone());
            }
        }
        obj.insert(
            "documentPath".into(),
            self.document_path.clone().map(Value::from).unwrap_or(Value::Null),
        );
        obj.insert("status".into(), Value::from(self.status.as_str()));
        obj.insert(
            "rejectReason".into(),
            self.reject_reason.clone().map(Value::from).unwrap_or(Value::Null),
        );
        obj.insert("createdAt".into(), Value::from(self.created_at.clone()));
        Value::Object(obj)
    }
}

/// Input for a new submission; identity comes from the authenticated user.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub record_type: RecordType,
    pub emp_id: String,
    pub employee: String,
    pub department: String,
    pub fields: Value,
    pub document_path: Option<String>,
}

/// Academic-year label for a date: years run July through June, e.g.
/// 2024-03-15 falls in "2023-24".
pub fn academic_year_for(date: NaiveDate) -> String {
    let start = if date.month() >= 7 { date.year() } else { date.year() - 1 };
    format!("{}-{:02}", start, (start + 1) % 100)
}

fn derive_academic_year(record_type: RecordType, fields: &Value) -> String {
    let date = record_type
        .date_field()
        .and_then(|key| fields.get(key))
        .and_then(Value::as_str)
        .and_then(parse_date)
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    academic_year_for(date)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    let fields_json: String = row.get(6)?;
    let status_str: String = row.get(8)?;
    Ok(Record {
        id: row.get(0)?,
        record_type: row.get(1)?,
        emp_id: row.get(2)?,
        employee: row.get(3)?,
        department: row.get(4)?,
        academic_year: row.get(5)?,
        fields: serde_json::from_str(&fields_json).unwrap_or(Value::Null),
        document_path: row.get(7)?,
        status: Status::from_str(&status_str).unwrap_or(Status::Pending),
        reject_reason: row.get(9)?,
        created_at: row.get(10)?,
    })
}

const SELECT_COLS: &str = "id, record_type, emp_id, employee, department, academic_year, \
                           fields, document_path, status, reject_reason, created_at";

/// Insert a new Pending record. Returns its id.
pub fn create(conn: &Connection, new: &NewRecord) -> Result<i64, AppError> {
    let academic_year = derive_academic_year(new.record_type, &new.fields);
    conn.execute(
        "INSERT INTO records (record_type, emp_id, employee, department, academic_year, \
                              fields, document_path, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'Pending')",
        params![
            new.record_type.name(),
            new.emp_id,
            new.employee,
            new.department,
            academic_year,
            new.fields.to_string(),
            new.document_path,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_id(
    conn: &Connection,
    record_type: RecordType,
    id: i64,
) -> Result<Option<Record>, AppError> {
    let sql = format!("SELECT {SELECT_COLS} FROM records WHERE id = ?1 AND record_type = ?2");
    let record = conn
        .query_row(&sql, params![id, record_type.name()], record_from_row)
        .optional()?;
    Ok(record)
}

/// Pending records of one type, optionally scoped to a department,
/// oldest first (approval queues drain in submission order).
pub fn pending_for(
    conn: &Connection,
    record_type: RecordType,
    department: Option<&str>,
) -> Result<Vec<Record>, AppError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM records \
         WHERE record_type = ?1 AND status = 'Pending' \
           AND (?2 IS NULL OR department = ?2) \
         ORDER BY created_at ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![record_type.name(), department], record_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Records of one type for reporting, filtered by exact academic year
/// and/or department.
pub fn list_for_report(
    conn: &Connection,
    record_type: RecordType,
    year: Option<&str>,
    department: Option<&str>,
) -> Result<Vec<Record>, AppError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM records \
         WHERE record_type = ?1 \
           AND (?2 IS NULL OR academic_year = ?2) \
           AND (?3 IS NULL OR department = ?3) \
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![record_type.name(), year, department], record_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Most recent records across all types, optionally department-scoped.
pub fn recent(
    conn: &Connection,
    department: Option<&str>,
    limit: i64,
) -> Result<Vec<Record>, AppError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM records \
         WHERE (?1 IS NULL OR department = ?1) \
         ORDER BY created_at DESC, id DESC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![department, limit], record_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Resolve a record's one-and-only status transition. A record that has
/// already left Pending is a conflict; the stored row is not touched.
pub fn update_status(
    conn: &Connection,
    record_type: RecordType,
    id: i64,
    status: Status,
    reject_reason: Option<&str>,
) -> Result<Record, AppError> {
    if status == Status::Pending {
        return Err(AppError::BadRequest(
            "Status must be Accepted or Rejected".to_string(),
        ));
    }

    let reason = match status {
        Status::Rejected => reject_reason.map(str::trim).filter(|r| !r.is_empty()),
        _ => None,
    };

    // The status guard in the WHERE clause is the authority: when a
    // concurrent resolution got there first, zero rows match and the
    // loser gets a conflict instead of the winner's outcome.
    let changed = conn.execute(
        "UPDATE records SET status = ?1, reject_reason = ?2 \
         WHERE id = ?3 AND record_type = ?4 AND status = 'Pending'",
        params![status.as_str(), reason, id, record_type.name()],
    )?;
    if changed == 0 {
        let current = find_by_id(conn, record_type, id)?.ok_or(AppError::NotFound)?;
        return Err(AppError::Conflict(format!(
            "Record already {}",
            current.status.as_str()
        )));
    }

    find_by_id(conn, record_type, id)?.ok_or(AppError::NotFound)
}

/// Distinct academic-year labels across all records, newest first.
pub fn academic_years(conn: &Connection) -> Result<Vec<String>, AppError> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT academic_year FROM records ORDER BY academic_year DESC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn academic_year_rolls_over_in_july() {
        let spring = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let autumn = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert_eq!(academic_year_for(spring), "2023-24");
        assert_eq!(academic_year_for(autumn), "2024-25");
    }

    #[test]
    fn row_shape_uses_camel_case_identity_keys() {
        let record = Record {
            id: 7,
            record_type: "AWARDS".into(),
            emp_id: "E42".into(),
            employee: "Ana".into(),
            department: "CSE".into(),
            academic_year: "2023-24".into(),
            fields: serde_json::json!({ "award": "Best Paper" }),
            document_path: None,
            status: Status::Pending,
            reject_reason: None,
            created_at: "2024-03-15 10:00:00".into(),
        };
        let row = record.to_row();
        assert_eq!(row["empId"], "E42");
        assert_eq!(row["award"], "Best Paper");
        assert_eq!(row["status"], "Pending");
        assert!(row["documentPath"].is_null());
    }
}
