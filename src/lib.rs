pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reports;

use actix_web::web;

/// The protected API routes. Fixed paths are registered before the
/// dynamic `/{slug}` record routes so `/reports/...` and friends never
/// fall through to the slug resolver.
pub fn protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/change-password", web::put().to(handlers::auth_handlers::change_password))
        .route("/reports/academic-years", web::get().to(handlers::report_handlers::academic_years))
        .route("/reports/data", web::get().to(handlers::report_handlers::data))
        .route("/dashboard/stats", web::get().to(handlers::dashboard_handlers::stats))
        .route("/dashboard/recent", web::get().to(handlers::dashboard_handlers::recent))
        .route("/{slug}", web::post().to(handlers::record_handlers::create))
        .route("/{slug}", web::get().to(handlers::record_handlers::list_pending))
        .route("/{slug}/{id}/status", web::put().to(handlers::record_handlers::update_status))
        .route("/{slug}/file/{path}", web::get().to(handlers::record_handlers::document));
}
