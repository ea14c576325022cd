use serde_json::Value;

use crate::client::retry::RetryPolicy;
use crate::client::session::Session;
use crate::client::transport::{
    ApiRequest, ApiResponse, FormPart, Method, RequestBody, Transport,
};
use crate::client::ClientError;

/// Thin request layer: attaches the bearer token, applies the 429 retry
/// policy, expires the session on any 401, and maps error bodies.
pub struct ApiClient<T: Transport> {
    transport: T,
    session: Session,
    retry: RetryPolicy,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, session: Session) -> Self {
        ApiClient {
            transport,
            session,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<ApiResponse, ClientError> {
        self.execute(Method::Get, path, query, RequestBody::Empty)
    }

    pub fn post_multipart(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(Method::Post, path, Vec::new(), RequestBody::Multipart(parts))
    }

    pub fn put_json(&self, path: &str, body: Value) -> Result<ApiResponse, ClientError> {
        self.execute(Method::Put, path, Vec::new(), RequestBody::Json(body))
    }

    fn execute(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: RequestBody,
    ) -> Result<ApiResponse, ClientError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            query,
            bearer: self.session.token(),
            body,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = self
                .transport
                .send(&request)
                .map_err(|e| ClientError::Network(e.0))?;

            match response.status {
                401 => {
                    self.session.expire();
                    return Err(ClientError::Auth);
                }
                429 => {
                    if attempt < self.retry.max_attempts() {
                        std::thread::sleep(self.retry.delay_before(attempt));
                        continue;
                    }
                    return Err(ClientError::RateLimited);
                }
                _ if response.is_success() => return Ok(response),
                status => {
                    return Err(ClientError::Request {
                        status,
                        message: response.error_message(),
                    });
                }
            }
        }
    }
}
