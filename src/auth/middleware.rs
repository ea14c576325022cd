use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::auth::token;
use crate::db::DbPool;

/// Middleware that resolves the `Authorization: Bearer <token>` header to an
/// [`AuthUser`](crate::auth::AuthUser) in request extensions. Requests
/// without a valid token get a 401 JSON body.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let bearer = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let user = match bearer {
        Some(token) => {
            let pool = req
                .app_data::<web::Data<DbPool>>()
                .expect("DbPool missing from app data");
            match pool.get() {
                Ok(conn) => token::resolve(&conn, &token).unwrap_or(None),
                Err(_) => None,
            }
        }
        None => None,
    };

    match user {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await.map(|res| res.map_into_left_body())
        }
        None => {
            let response = HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "Authentication required" }));
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}
