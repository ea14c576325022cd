//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema applied; the seeding helpers add users and records on top.

use rusqlite::Connection;
use tempfile::TempDir;

use rams::auth::{Role, password};
use rams::db::MIGRATIONS;
use rams::models::record::{self, NewRecord};
use rams::models::registry::RecordType;
use rams::models::user::{self, NewUser};

pub const TEST_PASSWORD: &str = "password123";

/// Setup a temporary database with schema applied.
///
/// Returns (TempDir, Connection); the TempDir must be kept alive for the
/// Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Create a user with `TEST_PASSWORD`; the employee id is derived from the
/// username. Returns the user id.
pub fn seed_user(conn: &Connection, username: &str, role: Role, department: &str) -> i64 {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    user::create(
        conn,
        &NewUser {
            username: username.to_string(),
            password_hash: hash,
            display_name: format!("User {username}"),
            emp_id: format!("EMP-{username}"),
            department: department.to_string(),
            role,
        },
    )
    .expect("Failed to create user")
}

/// Insert a Pending AWARDS record for the given employee. The award date
/// drives the derived academic year.
pub fn seed_award(conn: &Connection, emp_id: &str, department: &str, date: &str) -> i64 {
    record::create(
        conn,
        &NewRecord {
            record_type: RecordType::Awards,
            emp_id: emp_id.to_string(),
            employee: format!("Employee {emp_id}"),
            department: department.to_string(),
            fields: serde_json::json!({
                "award": "Best Paper Award",
                "type1": "National",
                "type2": "Gold",
                "agency": "AICTE",
                "date2": date,
            }),
            document_path: Some("awards_deadbeef.pdf".to_string()),
        },
    )
    .expect("Failed to create record")
}
