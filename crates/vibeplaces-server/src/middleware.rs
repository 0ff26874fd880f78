use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::ORIGIN, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use vibeplaces_core::AppConfig;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Browser origins permitted to call the API.
///
/// An origin is allowed if it matches an entry exactly or ends with one of
/// the configured suffixes (hosted preview deployments).
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    exact: Arc<Vec<String>>,
    suffixes: Arc<Vec<String>>,
}

impl OriginPolicy {
    #[must_use]
    pub fn new(exact: Vec<String>, suffixes: Vec<String>) -> Self {
        let trim = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            exact: Arc::new(trim(exact)),
            suffixes: Arc::new(trim(suffixes)),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.allowed_origins.clone(),
            config.allowed_origin_suffixes.clone(),
        )
    }

    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.exact.iter().any(|o| o == origin)
            || self.suffixes.iter().any(|s| origin.ends_with(s.as_str()))
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Rejects cross-origin requests from origins outside the policy.
///
/// Requests without an `Origin` header (curl, server-to-server, same-origin
/// navigation) pass through.
pub async fn enforce_origin(
    State(policy): State<OriginPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let Some(origin) = req.headers().get(ORIGIN) else {
        return next.run(req).await;
    };

    let allowed = origin.to_str().is_ok_and(|o| policy.allows(o));
    if allowed {
        return next.run(req).await;
    }

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(String::new, |id| id.0.clone());
    tracing::warn!(origin = ?origin, "rejected request from disallowed origin");

    ApiError::new(request_id, "forbidden_origin", "origin not allowed").into_response()
}
