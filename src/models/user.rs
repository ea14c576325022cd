use rusqlite::{Connection, OptionalExtension, params};

use crate::auth::Role;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub emp_id: String,
    pub department: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub emp_id: String,
    pub department: String,
    pub role: Role,
}

pub fn create(conn: &Connection, new: &NewUser) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO users (username, password_hash, display_name, emp_id, department, role) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.username,
            new.password_hash,
            new.display_name,
            new.emp_id,
            new.department,
            new.role.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>, AppError> {
    find_where(conn, "username = ?1", username)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, username, password_hash, display_name, emp_id, department, role \
             FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn find_where(conn: &Connection, clause: &str, value: &str) -> Result<Option<User>, AppError> {
    let sql = format!(
        "SELECT id, username, password_hash, display_name, emp_id, department, role \
         FROM users WHERE {clause}"
    );
    let user = conn.query_row(&sql, params![value], user_from_row).optional()?;
    Ok(user)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role_str: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        display_name: row.get(3)?,
        emp_id: row.get(4)?,
        department: row.get(5)?,
        role: Role::from_str(&role_str).unwrap_or(Role::Faculty),
    })
}

pub fn update_password(conn: &Connection, user_id: i64, hash: &str) -> Result<(), AppError> {
    conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![hash, user_id],
    )?;
    Ok(())
}
