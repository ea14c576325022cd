use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::auth::password;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed a default admin account if the users table is empty.
/// Idempotent: a populated database is left untouched.
pub fn seed_admin(pool: &DbPool, admin_password: &str) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .unwrap_or(0);
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping");
        return;
    }

    let hash = password::hash_password(admin_password).expect("Failed to hash default password");
    conn.execute(
        "INSERT INTO users (username, password_hash, display_name, emp_id, department, role) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params!["admin", hash, "Administrator", "ADM001", "ADMIN", "admin"],
    )
    .expect("Failed to seed admin user");
    log::info!("Seeded default admin account");
}
