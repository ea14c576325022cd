use std::collections::BTreeMap;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use rand::RngCore;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::record::{self, NewRecord, Status};
use crate::models::registry::{FieldKind, RecordType};
use crate::models::validate;

fn resolve_type(slug: &str) -> Result<RecordType, AppError> {
    match RecordType::parse(slug) {
        Some(RecordType::Summary) => {
            Err(AppError::BadRequest("SUMMARY is a computed report, not a collection".to_string()))
        }
        Some(t) => Ok(t),
        None => Err(AppError::NotFound),
    }
}

/// A parsed multipart submission: scalar parts plus the PDF attachment.
struct Submission {
    values: BTreeMap<String, String>,
    file_mime: Option<String>,
    file_bytes: Vec<u8>,
}

async fn read_submission(mut payload: Multipart) -> Result<Submission, AppError> {
    let mut values = BTreeMap::new();
    let mut file_mime = None;
    let mut file_bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_string));
        let Some(name) = name else { continue };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload interrupted: {e}")))?;
            bytes.extend_from_slice(&chunk);
        }

        if name == "file" {
            file_mime = field.content_type().map(|m| m.essence_str().to_string());
            file_bytes = bytes;
        } else {
            let text = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest(format!("Field {name} is not valid UTF-8")))?;
            values.insert(name, text);
        }
    }

    Ok(Submission { values, file_mime, file_bytes })
}

/// Coerce validated string values into the stored JSON object, typing
/// numeric fields as numbers.
fn typed_fields(record_type: RecordType, values: &BTreeMap<String, String>) -> Value {
    let mut obj = serde_json::Map::new();
    for field in record_type.fields() {
        let Some(raw) = values.get(field.key) else { continue };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = match field.kind {
            FieldKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(trimmed)),
            _ => Value::from(trimmed),
        };
        obj.insert(field.key.to_string(), value);
    }
    Value::Object(obj)
}

fn store_document(config: &Config, record_type: RecordType, bytes: &[u8]) -> Result<String, AppError> {
    std::fs::create_dir_all(&config.upload_dir)?;
    let mut suffix = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut suffix);
    let name = format!("{}_{}.pdf", record_type.slug(), hex::encode(suffix));
    std::fs::write(std::path::Path::new(&config.upload_dir).join(&name), bytes)?;
    Ok(name)
}

/// POST /{slug} — multipart submission of one record plus its PDF.
/// Validation failures return 400 with a field -> message map and leave
/// nothing behind on disk.
pub async fn create(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    caller: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let record_type = resolve_type(&path)?;
    let submission = read_submission(payload).await?;

    let mut errors = validate::validate_fields(record_type, &submission.values);
    let file_mime = submission.file_mime.as_deref().filter(|_| !submission.file_bytes.is_empty());
    if let Some(msg) = validate::validate_file(file_mime) {
        errors.insert("file".to_string(), msg);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let document_path = store_document(&config, record_type, &submission.file_bytes)?;
    let conn = pool.get()?;
    let id = record::create(
        &conn,
        &NewRecord {
            record_type,
            emp_id: caller.emp_id.clone(),
            employee: caller.display_name.clone(),
            department: caller.department.clone(),
            fields: typed_fields(record_type, &submission.values),
            document_path: Some(document_path),
        },
    )?;
    log::info!("{} submitted {} record #{id}", caller.username, record_type.name());

    let created = record::find_by_id(&conn, record_type, id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created.to_row()))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// GET /{slug}?status=Pending — the approval queue for the caller's scope.
pub async fn list_pending(
    pool: web::Data<DbPool>,
    caller: AuthUser,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    caller.require_incharge()?;
    let record_type = resolve_type(&path)?;

    if let Some(status) = &query.status {
        if status != Status::Pending.as_str() {
            return Err(AppError::BadRequest(
                "Only the Pending queue can be listed here".to_string(),
            ));
        }
    }

    let conn = pool.get()?;
    let records = record::pending_for(&conn, record_type, caller.department_scope())?;
    let rows: Vec<Value> = records.iter().map(|r| r.to_row()).collect();
    Ok(HttpResponse::Ok().json(rows))
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
    pub reason: Option<String>,
}

/// PUT /{slug}/{id}/status — resolve a pending record to Accepted or
/// Rejected. A record may only be resolved once.
pub async fn update_status(
    pool: web::Data<DbPool>,
    caller: AuthUser,
    path: web::Path<(String, i64)>,
    body: web::Json<StatusUpdate>,
) -> Result<HttpResponse, AppError> {
    caller.require_incharge()?;
    let (slug, id) = path.into_inner();
    let record_type = resolve_type(&slug)?;

    let status = Status::from_str(&body.status)
        .ok_or_else(|| AppError::BadRequest("Status must be Accepted or Rejected".to_string()))?;

    let conn = pool.get()?;
    let existing = record::find_by_id(&conn, record_type, id)?.ok_or(AppError::NotFound)?;
    if let Some(dept) = caller.department_scope() {
        if existing.department != dept {
            return Err(AppError::Forbidden(
                "Record belongs to another department".to_string(),
            ));
        }
    }

    let updated = record::update_status(&conn, record_type, id, status, body.reason.as_deref())?;
    log::info!(
        "{} marked {} record #{id} {}",
        caller.username,
        record_type.name(),
        updated.status.as_str()
    );
    Ok(HttpResponse::Ok().json(updated.to_row()))
}

/// GET /{slug}/file/{path} — stream a stored PDF for viewing.
pub async fn document(
    config: web::Data<Config>,
    _caller: AuthUser,
    path: web::Path<(String, String)>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let (slug, name) = path.into_inner();
    resolve_type(&slug)?;

    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::BadRequest("Invalid document path".to_string()));
    }

    let full = std::path::Path::new(&config.upload_dir).join(&name);
    let file = actix_files::NamedFile::open(full).map_err(|_| AppError::NotFound)?;
    Ok(file.into_response(&req))
}
