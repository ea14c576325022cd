pub mod dashboard;
pub mod record;
pub mod registry;
pub mod user;
pub mod validate;
