use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::{AuthUser, password, rate_limit::RateLimiter, token};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub oldpassword: String,
    pub newpassword: String,
    pub newpassword1: String,
}

/// POST /login — verify credentials, issue a bearer token.
/// Failed attempts are rate-limited per client IP.
pub async fn login(
    pool: web::Data<DbPool>,
    limiter: web::Data<RateLimiter>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let ip = req.peer_addr().map(|a| a.ip());
    if let Some(ip) = ip {
        if limiter.is_blocked(ip) {
            return Err(AppError::RateLimited);
        }
    }

    let conn = pool.get()?;
    let found = user::find_by_username(&conn, body.username.trim())?;
    let verified = match &found {
        Some(u) => password::verify_password(&body.password, &u.password_hash).unwrap_or(false),
        None => false,
    };

    if !verified {
        if let Some(ip) = ip {
            limiter.record_failure(ip);
        }
        return Err(AppError::Unauthorized("Invalid username or password".to_string()));
    }
    if let Some(ip) = ip {
        limiter.clear(ip);
    }

    let u = found.expect("verified user must exist");
    let bearer = token::issue(&conn, u.id)?;
    log::info!("User {} logged in", u.username);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": bearer,
        "username": u.username,
        "displayName": u.display_name,
        "empId": u.emp_id,
        "department": u.department,
        "role": u.role.as_str(),
    })))
}

/// PUT /change-password — verify the old password, set the new one,
/// revoke every outstanding token for the account.
pub async fn change_password(
    pool: web::Data<DbPool>,
    caller: AuthUser,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    if body.newpassword != body.newpassword1 {
        return Err(AppError::BadRequest("New passwords do not match".to_string()));
    }
    if let Some(msg) = password::validate_password(&body.newpassword) {
        return Err(AppError::BadRequest(msg));
    }

    let conn = pool.get()?;
    let u = user::find_by_id(&conn, caller.id)?.ok_or(AppError::NotFound)?;
    match password::verify_password(&body.oldpassword, &u.password_hash) {
        Ok(true) => {}
        _ => return Err(AppError::BadRequest("Current password is incorrect".to_string())),
    }

    let hash = password::hash_password(&body.newpassword).map_err(AppError::Hash)?;
    user::update_password(&conn, caller.id, &hash)?;
    token::revoke_all(&conn, caller.id)?;
    log::info!("User {} changed password", u.username);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password changed successfully, please log in again"
    })))
}
