use actix_web::{HttpResponse, web};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{dashboard, record};

const RECENT_LIMIT: i64 = 5;

/// GET /dashboard/stats — per-type status counts and the overall approval
/// rate for the caller's scope.
pub async fn stats(pool: web::Data<DbPool>, caller: AuthUser) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let stats = dashboard::stats_by_type(&conn, caller.department_scope())?;

    let (accepted, pending, rejected) = stats.iter().fold((0, 0, 0), |(a, p, r), s| {
        (a + s.accepted, p + s.pending, r + s.rejected)
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "stats": stats,
        "totals": {
            "accepted": accepted,
            "pending": pending,
            "rejected": rejected,
        },
        "approvalRate": dashboard::approval_rate(accepted, pending, rejected),
    })))
}

/// GET /dashboard/recent — the latest submissions in the caller's scope.
pub async fn recent(pool: web::Data<DbPool>, caller: AuthUser) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let records = record::recent(&conn, caller.department_scope(), RECENT_LIMIT)?;
    let rows: Vec<Value> = records.iter().map(|r| r.to_row()).collect();
    Ok(HttpResponse::Ok().json(rows))
}
