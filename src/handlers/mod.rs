pub mod auth_handlers;
pub mod dashboard_handlers;
pub mod record_handlers;
pub mod report_handlers;
