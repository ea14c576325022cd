use rand::RngCore;
use rusqlite::{Connection, OptionalExtension, params};

use crate::auth::{AuthUser, Role};
use crate::errors::AppError;

/// Issue a fresh bearer token for a user. 32 random bytes, hex-encoded.
pub fn issue(conn: &Connection, user_id: i64) -> Result<String, AppError> {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    conn.execute(
        "INSERT INTO tokens (token, user_id) VALUES (?1, ?2)",
        params![token, user_id],
    )?;
    Ok(token)
}

/// Resolve a bearer token to its user. Unknown tokens yield None.
pub fn resolve(conn: &Connection, token: &str) -> Result<Option<AuthUser>, AppError> {
    let row = conn
        .query_row(
            "SELECT u.id, u.username, u.display_name, u.emp_id, u.department, u.role \
             FROM tokens t JOIN users u ON t.user_id = u.id \
             WHERE t.token = ?1",
            params![token],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    Ok(row.and_then(|(id, username, display_name, emp_id, department, role)| {
        Role::from_str(&role).map(|role| AuthUser {
            id,
            username,
            display_name,
            emp_id,
            department,
            role,
        })
    }))
}

/// Drop every token belonging to a user (logout-everywhere, password change).
pub fn revoke_all(conn: &Connection, user_id: i64) -> Result<(), AppError> {
    conn.execute("DELETE FROM tokens WHERE user_id = ?1", params![user_id])?;
    Ok(())
}
