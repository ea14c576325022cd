use std::collections::BTreeMap;
use std::fmt;

use actix_web::{HttpResponse, ResponseError};

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Hash(String),
    /// Field-level validation failures; key is the field name.
    Validation(BTreeMap<String, String>),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    RateLimited,
    Conflict(String),
    NotFound,
    Export(String),
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Validation(fields) => write!(f, "Validation failed ({} fields)", fields.len()),
            AppError::BadRequest(msg) => write!(f, "{msg}"),
            AppError::Unauthorized(msg) => write!(f, "{msg}"),
            AppError::Forbidden(msg) => write!(f, "{msg}"),
            AppError::RateLimited => write!(f, "Too many requests"),
            AppError::Conflict(msg) => write!(f, "{msg}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Export(e) => write!(f, "Export error: {e}"),
            AppError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(fields) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation failed",
                "fields": fields,
            })),
            AppError::BadRequest(msg) => error_body(HttpResponse::BadRequest(), msg),
            AppError::Unauthorized(msg) => error_body(HttpResponse::Unauthorized(), msg),
            AppError::Forbidden(msg) => error_body(HttpResponse::Forbidden(), msg),
            AppError::RateLimited => error_body(HttpResponse::TooManyRequests(), "Too many requests"),
            AppError::Conflict(msg) => error_body(HttpResponse::Conflict(), msg),
            AppError::NotFound => error_body(HttpResponse::NotFound(), "Not found"),
            _ => {
                log::error!("{self}");
                error_body(HttpResponse::InternalServerError(), "Internal server error")
            }
        }
    }
}

fn error_body(mut builder: actix_web::HttpResponseBuilder, msg: &str) -> HttpResponse {
    builder.json(serde_json::json!({ "error": msg }))
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Export(e.to_string())
    }
}
