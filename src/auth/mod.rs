pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod token;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::errors::AppError;

/// Access roles, in increasing order of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Faculty,
    Incharge,
    Admin,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Role> {
        match s {
            "faculty" => Some(Role::Faculty),
            "incharge" => Some(Role::Incharge),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Faculty => "faculty",
            Role::Incharge => "incharge",
            Role::Admin => "admin",
        }
    }
}

/// The authenticated caller, resolved from the bearer token by the
/// middleware and stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub emp_id: String,
    pub department: String,
    pub role: Role,
}

impl AuthUser {
    /// Department scope for list/report queries: admins see everything.
    pub fn department_scope(&self) -> Option<&str> {
        match self.role {
            Role::Admin => None,
            _ => Some(&self.department),
        }
    }

    pub fn require_incharge(&self) -> Result<(), AppError> {
        match self.role {
            Role::Incharge | Role::Admin => Ok(()),
            Role::Faculty => Err(AppError::Forbidden(
                "Only a department in-charge may change record status".to_string(),
            )),
        }
    }
}

/// Extractor: the middleware-resolved caller from request extensions.
impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string())),
        )
    }
}
