use std::sync::{Arc, Mutex};

type ExpiryCallback = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    token: Option<String>,
    on_expired: Vec<ExpiryCallback>,
}

/// Explicit session state shared between the API client and the
/// application shell: the bearer token plus "session expired" observers.
/// Replaces the module-level token singleton of old: nothing global,
/// nothing implicit.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            inner: Arc::new(Mutex::new(Inner { token: None, on_expired: Vec::new() })),
        }
    }

    pub fn with_token(token: &str) -> Self {
        let session = Session::new();
        session.set_token(token);
        session
    }

    pub fn set_token(&self, token: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.token = Some(token.to_string());
    }

    pub fn token(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Subscribe to session expiry (e.g. to navigate to the login page).
    pub fn on_expired(&self, callback: impl Fn() + Send + Sync + 'static) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.on_expired.push(Arc::new(callback));
    }

    /// Clear the token and notify observers. Observers fire at most once
    /// per expiry: an already-expired session stays silent. The lock is
    /// released before the callbacks run, so an observer may read or
    /// mutate the session freely.
    pub fn expire(&self) {
        let callbacks = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if inner.token.take().is_none() {
                return;
            }
            inner.on_expired.clone()
        };
        for callback in &callbacks {
            callback();
        }
    }
}
