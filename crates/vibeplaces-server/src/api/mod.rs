mod places;
mod vibes;

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use vibeplaces_core::{Environment, RandomSource, VibeCatalog};
use vibeplaces_maps::{MapsClient, MapsError};

use crate::middleware::{enforce_origin, request_id, OriginPolicy, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<VibeCatalog>,
    /// `None` when no provider credential is configured.
    pub maps: Option<Arc<MapsClient>>,
    pub random: RandomSource,
    pub environment: Environment,
}

impl AppState {
    /// The provider client, or a `configuration_error` when the credential
    /// is missing.
    pub(super) fn maps_client(&self, request_id: &str) -> Result<&MapsClient, ApiError> {
        self.maps.as_deref().ok_or_else(|| {
            tracing::error!("GOOGLE_MAPS_API_KEY is not configured");
            ApiError::new(
                request_id,
                "configuration_error",
                "Google Maps API key not configured",
            )
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
}

#[derive(Debug, Serialize)]
struct Banner {
    message: &'static str,
    version: &'static str,
    endpoints: BannerEndpoints,
}

#[derive(Debug, Serialize)]
struct BannerEndpoints {
    health: &'static str,
    places: &'static str,
    vibes: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn validation(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, "validation_error", message)
    }

    pub(super) fn not_found(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, "not_found", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "forbidden_origin" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Provider failures surface as 500 with the provider's message attached.
pub(super) fn map_maps_error(request_id: &str, error: &MapsError) -> ApiError {
    tracing::error!(error = %error, "google maps request failed");
    ApiError::new(request_id, "provider_error", error.to_string())
}

fn build_cors(policy: OriginPolicy) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &axum::http::request::Parts| {
                origin.to_str().is_ok_and(|o| policy.allows(o))
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Last-resort handler for panics inside a request. Details stay in the log.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "request handler panicked");

    ApiError::new(String::new(), "internal_error", "internal server error").into_response()
}

pub fn build_app(state: AppState, origins: OriginPolicy) -> Router {
    let api = Router::new()
        .route("/api/health", get(health))
        .route("/api/places/nearby", post(places::nearby))
        .route("/api/places/photo/{reference}", get(places::photo))
        .route("/api/places/details/{place_id}", get(places::details))
        .route("/api/places/geocode", get(places::geocode))
        .route("/api/places/reverse-geocode", get(places::reverse_geocode))
        .route("/api/vibes", get(vibes::list_vibes))
        .route("/api/vibes/{id}", get(vibes::get_vibe));

    Router::new()
        .route("/", get(banner))
        .merge(api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(axum::middleware::from_fn_with_state(
                    origins.clone(),
                    enforce_origin,
                ))
                .layer(build_cors(origins)),
        )
        .with_state(state)
}

async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "Vibe Places API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BannerEndpoints {
            health: "/api/health",
            places: "/api/places",
            vibes: "/api/vibes",
        },
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        timestamp: Utc::now(),
        environment: state.environment.to_string(),
    })
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::not_found(&req_id.0, "route not found")
}
