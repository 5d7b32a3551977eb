//! HTTP routes and handlers.
//!
//! The content-type and body checks are done by hand on the raw bytes so the
//! handler controls the 415/400 split exactly; axum's `Json` extractor would
//! collapse both into one rejection.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bridge_auth::AuthContext;
use bridge_crypto::PayloadVerifier;
use bridge_types::{Payload, SIGNATURE_FIELD};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::middleware::AuthLayer;
use crate::ports::ItemStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Token the middleware checks candidates against.
    pub auth: Arc<AuthContext>,
    /// Present only when signature verification is enabled.
    pub verifier: Option<Arc<PayloadVerifier>>,
    /// Where accepted items land.
    pub store: Arc<dyn ItemStore>,
}

/// Assemble the full router: a public index plus token-protected data routes.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/data", get(list_items).post(submit_item))
        .layer(AuthLayer::new(Arc::clone(&state.auth)))
        .with_state(state);

    Router::new().route("/", get(index)).merge(protected)
}

/// Public liveness route.
async fn index() -> Json<Value> {
    Json(json!({
        "status": "Server is running",
        "endpoints": ["/data"],
    }))
}

/// `GET /data` — everything accepted so far.
async fn list_items(State(state): State<AppState>) -> Response {
    match state.store.list() {
        Ok(items) => (
            StatusCode::OK,
            Json(json!({
                "status": "Success",
                "count": items.len(),
                "items": items,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to read item store");
            ApiError::internal().into_response()
        }
    }
}

/// `POST /data` — validate, optionally verify, persist.
async fn submit_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match accept_item(&state, &headers, &body) {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

fn accept_item(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, ApiError> {
    if !is_json_content_type(headers) {
        return Err(ApiError::unsupported_media_type());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::bad_request("Invalid JSON payload"))?;
    let mut payload = Payload::from_serialize(&value)
        .map_err(|_| ApiError::bad_request("Payload must be a JSON object"))?;

    let signature = payload.remove(SIGNATURE_FIELD);

    if let Some(verifier) = &state.verifier {
        let valid = match &signature {
            Some(Value::String(hex)) => verifier.verify_payload(&payload, hex),
            _ => false,
        };
        if !valid {
            warn!("Rejected payload with missing or invalid signature");
            return Err(ApiError::bad_request("Signature invalid"));
        }
    }

    let name = payload
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("Payload must include a string 'name'"))?
        .to_string();
    let value = payload
        .get("value")
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::bad_request("Payload must include a numeric 'value'"))?;

    let item = state.store.append(&name, value).map_err(|e| {
        error!(error = %e, "Failed to persist item");
        ApiError::internal()
    })?;

    info!(id = item.id, name = %item.name, "Stored item");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "Success",
            "message": "Data stored",
            "id": item.id,
            "name": item.name,
            "value": item.value,
        })),
    )
        .into_response())
}

/// `application/json`, with or without parameters such as a charset.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            ct.split(';')
                .next()
                .map(str::trim)
                .is_some_and(|mime| mime.eq_ignore_ascii_case("application/json"))
        })
        .unwrap_or(false)
}
