//! `/api/places/*`: nearby search orchestration plus the single-call
//! detail, geocode, and photo endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use vibeplaces_core::{
    rank_places, BudgetRange, Coordinates, SearchContext, SearchResponse, Weather,
};
use vibeplaces_maps::{normalize_place, NearbyQuery, PlaceDetail};

use crate::middleware::RequestId;

use super::{map_maps_error, ApiError, AppState};

const DEFAULT_RADIUS_M: u32 = 5_000;
const DEFAULT_PHOTO_WIDTH: u32 = 1_000;

/// Nearby-search request body. Accepts both the web client's field names
/// and their longer aliases.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NearbyRequest {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(alias = "vibeId")]
    vibe: Option<String>,
    min_budget: Option<i64>,
    max_budget: Option<i64>,
    /// Restrict to places open now.
    #[serde(alias = "openNowOnly")]
    quick_bite: Option<bool>,
    #[serde(alias = "freeTextQuery")]
    search_query: Option<String>,
    #[serde(alias = "radiusMeters")]
    radius: Option<u32>,
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<NearbyRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        ApiError::validation(&req_id.0, format!("invalid request body: {}", e.body_text()))
    })?;

    let vibe_id = body
        .vibe
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let (Some(latitude), Some(longitude), Some(vibe_id)) = (body.latitude, body.longitude, vibe_id)
    else {
        return Err(ApiError::validation(
            &req_id.0,
            "missing required fields: latitude, longitude, vibe",
        ));
    };

    let maps = state.maps_client(&req_id.0)?;

    let vibe = state.catalog.lookup(vibe_id);
    let filter = vibe.search_filter(body.search_query.as_deref());
    let query = NearbyQuery {
        location: Coordinates::new(latitude, longitude),
        radius_m: body.radius.unwrap_or(DEFAULT_RADIUS_M),
        place_type: filter.place_type,
        keyword: filter.keyword,
        open_now: body.quick_bite.unwrap_or(false),
    };

    let mut results = maps
        .nearby_search(&query)
        .await
        .map_err(|e| map_maps_error(&req_id.0, &e))?;

    if results.is_empty() {
        tracing::warn!(
            vibe = %vibe.id,
            place_type = %query.place_type,
            radius_m = query.radius_m,
            "no results, broadening search once"
        );
        results = maps
            .nearby_search(&query.broadened())
            .await
            .map_err(|e| map_maps_error(&req_id.0, &e))?;
    }

    let mut rng = state.random.rng();
    let weather = Weather::draw(&mut rng);
    let ctx = SearchContext {
        origin: query.location,
        weather,
        hour: chrono::Local::now().hour(),
    };
    let listings = results.into_iter().map(normalize_place).collect();
    let budget = BudgetRange::from_bounds(body.min_budget, body.max_budget);
    let places = rank_places(listings, &ctx, budget, &mut rng);

    tracing::info!(
        vibe = %vibe.id,
        weather = weather.state.as_str(),
        count = places.len(),
        "nearby search served"
    );

    Ok(Json(SearchResponse::new(weather, places)))
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoParams {
    maxwidth: Option<u32>,
}

/// Redirects to the provider's photo endpoint; image bytes are never proxied.
pub(super) async fn photo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(reference): Path<String>,
    params: Result<Query<PhotoParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::validation(&req_id.0, e.body_text()))?;
    let maps = state.maps_client(&req_id.0)?;

    let target = maps
        .photo_url(&reference, params.maxwidth.unwrap_or(DEFAULT_PHOTO_WIDTH))
        .map_err(|e| map_maps_error(&req_id.0, &e))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target.to_string())]).into_response())
}

#[derive(Debug, Serialize)]
pub(super) struct DetailsResponse {
    success: bool,
    place: PlaceDetail,
}

pub(super) async fn details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let maps = state.maps_client(&req_id.0)?;
    let place = maps
        .place_details(&place_id)
        .await
        .map_err(|e| map_maps_error(&req_id.0, &e))?;

    Ok(Json(DetailsResponse {
        success: true,
        place,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeParams {
    city: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeResponse {
    success: bool,
    latitude: f64,
    longitude: f64,
    address: String,
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<GeocodeParams>, QueryRejection>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::validation(&req_id.0, e.body_text()))?;
    let Some(city) = params
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    else {
        return Err(ApiError::validation(&req_id.0, "city is required"));
    };

    let maps = state.maps_client(&req_id.0)?;
    let found = maps
        .geocode(city)
        .await
        .map_err(|e| map_maps_error(&req_id.0, &e))?
        .ok_or_else(|| ApiError::not_found(&req_id.0, format!("city '{city}' not found")))?;

    Ok(Json(GeocodeResponse {
        success: true,
        latitude: found.latitude,
        longitude: found.longitude,
        address: found.formatted_address,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct ReverseGeocodeParams {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReverseGeocodeResponse {
    success: bool,
    city: String,
}

pub(super) async fn reverse_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<ReverseGeocodeParams>, QueryRejection>,
) -> Result<Json<ReverseGeocodeResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::validation(&req_id.0, e.body_text()))?;
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(ApiError::validation(&req_id.0, "lat and lng are required"));
    };

    let maps = state.maps_client(&req_id.0)?;
    let found = maps
        .reverse_geocode(lat, lng)
        .await
        .map_err(|e| map_maps_error(&req_id.0, &e))?
        .ok_or_else(|| ApiError::not_found(&req_id.0, "location not found"))?;

    Ok(Json(ReverseGeocodeResponse {
        success: true,
        city: found.city,
    }))
}
