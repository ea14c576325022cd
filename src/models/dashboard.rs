use rusqlite::{Connection, params};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::registry::RecordType;

/// Per-type status counts for the dashboard stat cards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeStats {
    pub record_type: String,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

impl TypeStats {
    pub fn total(&self) -> i64 {
        self.pending + self.accepted + self.rejected
    }
}

/// Integer percentage of accepted records; an empty stat is 0%, not NaN.
pub fn approval_rate(accepted: i64, pending: i64, rejected: i64) -> i64 {
    let total = accepted + pending + rejected;
    if total == 0 {
        return 0;
    }
    accepted * 100 / total
}

/// Status counts for every submittable record type, optionally scoped to a
/// department. Types with no records yield an all-zero entry.
pub fn stats_by_type(
    conn: &Connection,
    department: Option<&str>,
) -> Result<Vec<TypeStats>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT \
            COALESCE(SUM(status = 'Pending'), 0), \
            COALESCE(SUM(status = 'Accepted'), 0), \
            COALESCE(SUM(status = 'Rejected'), 0) \
         FROM records \
         WHERE record_type = ?1 AND (?2 IS NULL OR department = ?2)",
    )?;

    let mut stats = Vec::new();
    for t in RecordType::ALL {
        if *t == RecordType::Summary {
            continue;
        }
        let (pending, accepted, rejected) =
            stmt.query_row(params![t.name(), department], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
        stats.push(TypeStats {
            record_type: t.name().to_string(),
            pending,
            accepted,
            rejected,
        });
    }
    Ok(stats)
}
