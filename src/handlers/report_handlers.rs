use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::record;
use crate::models::registry::RecordType;
use crate::reports::{ReportFormat, ReportQuery, excel, summary};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// GET /reports/academic-years — distinct year labels, newest first.
pub async fn academic_years(
    pool: web::Data<DbPool>,
    _caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    Ok(HttpResponse::Ok().json(record::academic_years(&conn)?))
}

#[derive(Deserialize)]
pub struct DataQuery {
    #[serde(rename = "type")]
    pub record_type: String,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub format: Option<String>,
}

/// GET /reports/data?type&year&branch[&format=excel]
///
/// Non-admin callers are always pinned to their own department, whatever
/// `branch` says. The export reflects this server-side query only; any
/// further filters a viewer applies client-side are deliberately not part
/// of the spreadsheet.
pub async fn data(
    pool: web::Data<DbPool>,
    caller: AuthUser,
    params: web::Query<DataQuery>,
) -> Result<HttpResponse, AppError> {
    let record_type = RecordType::parse(&params.record_type)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown report type: {}", params.record_type)))?;

    let branch = match caller.department_scope() {
        Some(own) => Some(own.to_string()),
        None => params.branch.clone(),
    };
    let mut query = ReportQuery::new(record_type)
        .with_year(params.year.clone())
        .with_branch(branch);
    if params.format.as_deref() == Some("excel") {
        query = query.for_export();
    }

    let conn = pool.get()?;
    if record_type == RecordType::Summary {
        let report = summary::build(&conn, query.year.as_deref(), query.branch.as_deref())?;
        return match query.format {
            ReportFormat::View => Ok(HttpResponse::Ok().json(report)),
            ReportFormat::Excel => {
                let bytes = excel::build_workbook(&record_type.columns(), &report.data)?;
                Ok(attachment(bytes, &query.export_filename()))
            }
        };
    }

    let records = record::list_for_report(
        &conn,
        record_type,
        query.year.as_deref(),
        query.branch.as_deref(),
    )?;
    let rows: Vec<Value> = records.iter().map(|r| r.to_row()).collect();

    match query.format {
        ReportFormat::View => Ok(HttpResponse::Ok().json(rows)),
        ReportFormat::Excel => {
            let bytes = excel::build_workbook(&record_type.columns(), &rows)?;
            Ok(attachment(bytes, &query.export_filename()))
        }
    }
}

fn attachment(bytes: Vec<u8>, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}
