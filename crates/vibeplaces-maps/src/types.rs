//! Google Maps web-service response types.
//!
//! Every endpoint answers with a JSON object carrying a `status` string
//! (`"OK"`, `"ZERO_RESULTS"`, `"REQUEST_DENIED"`, ...) and an optional
//! `error_message`; the payload sits beside them under `results` or `result`.

use serde::{Deserialize, Serialize};
use vibeplaces_core::Coordinates;

/// Radius used by the broadened retry, in metres.
pub const BROADENED_RADIUS_M: u32 = 10_000;
/// Place type used by the broadened retry.
pub const BROADENED_PLACE_TYPE: &str = "restaurant";

// ---------------------------------------------------------------------------
// Nearby search
// ---------------------------------------------------------------------------

/// Parameters for one nearby-search call.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: Coordinates,
    pub radius_m: u32,
    pub place_type: String,
    pub keyword: String,
    pub open_now: bool,
}

impl NearbyQuery {
    /// The relaxed query used when the original returns nothing: wider radius,
    /// generic restaurant type, no keyword. Location and open-now are kept.
    #[must_use]
    pub fn broadened(&self) -> Self {
        Self {
            location: self.location,
            radius_m: BROADENED_RADIUS_M,
            place_type: BROADENED_PLACE_TYPE.to_string(),
            keyword: String::new(),
            open_now: self.open_now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One nearby-search result as the provider returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    /// 0 (free) to 4 (very expensive).
    #[serde(default)]
    pub price_level: Option<i8>,
    #[serde(default)]
    pub opening_hours: Option<OpenNow>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenNow {
    #[serde(default)]
    pub open_now: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub photo_reference: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub html_attributions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Place details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceDetail>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Extended fields for a single place. Passed through to clients with the
/// provider's field names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<i8>,
    /// Google Maps page for the place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_text: Vec<String>,
    /// Opening periods are forwarded untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_description: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

/// Field mask sent with every details request.
pub const DETAIL_FIELDS: &str =
    "name,rating,formatted_phone_number,opening_hours,website,reviews,photos,price_level,url,vicinity";

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// First forward-geocoding match for a free-text place name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

/// City-level name for a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseGeocodeMatch {
    /// The `locality` component, or the fallback placeholder when the
    /// provider returned a match without one.
    pub city: String,
    pub formatted_address: String,
}
