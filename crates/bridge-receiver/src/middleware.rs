//! Token authentication middleware.
//!
//! Rejects requests before any handler or storage access runs. Accepts the
//! token either as `Authorization: Bearer <token>` or as an `api_key` query
//! parameter (legacy clients).

use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use bridge_auth::AuthContext;
use tower::{Layer, Service};
use tracing::warn;

/// Authentication layer wrapping protected routes.
#[derive(Clone)]
pub struct AuthLayer {
    auth: Arc<AuthContext>,
}

impl AuthLayer {
    pub fn new(auth: Arc<AuthContext>) -> Self {
        Self { auth }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            auth: Arc::clone(&self.auth),
        }
    }
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    auth: Arc<AuthContext>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let auth = Arc::clone(&self.auth);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match extract_token(&req) {
                Some(candidate) if auth.is_valid(&candidate, SystemTime::now()) => {
                    inner.call(req).await
                }
                Some(_) => {
                    warn!(path = %req.uri().path(), "Rejected request with invalid token");
                    Ok(unauthorized_response())
                }
                None => {
                    warn!(path = %req.uri().path(), "Rejected request with no token");
                    Ok(unauthorized_response())
                }
            }
        })
    }
}

/// Pull the candidate token out of the request.
///
/// The Authorization header wins; the `api_key` query parameter is the
/// fallback for clients that cannot set headers.
fn extract_token<B>(req: &Request<B>) -> Option<String> {
    if let Some(auth) = req.headers().get("authorization") {
        if let Ok(auth_str) = auth.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(query) = req.uri().query() {
        for pair in query.split('&') {
            if let Some(key) = pair.strip_prefix("api_key=") {
                return Some(key.to_string());
            }
        }
    }

    None
}

/// Build the 401 response without touching handler state.
fn unauthorized_response() -> Response {
    let body = serde_json::json!({ "error": "Unauthorized" });

    let mut response = Response::new(Body::from(serde_json::to_vec(&body).unwrap_or_default()));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    if let Ok(value) = "application/json".parse() {
        response.headers_mut().insert("Content-Type", value);
    }
    if let Ok(value) = "Bearer".parse() {
        response.headers_mut().insert("WWW-Authenticate", value);
    }

    response
}
