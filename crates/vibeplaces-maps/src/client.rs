//! HTTP client for the Google Maps web services (Places + Geocoding).
//!
//! Wraps `reqwest` with key management and typed response deserialization.
//! Every endpoint reports failure through a `"status"` field in an otherwise
//! successful HTTP response, so status handling lives here rather than in
//! callers.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::MapsError;
use crate::types::{
    GeocodeMatch, GeocodeResponse, NearbyQuery, NearbySearchResponse, PlaceDetail,
    PlaceDetailsResponse, RawPlace, ReverseGeocodeMatch, DETAIL_FIELDS,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
const DEFAULT_REGION: &str = "India";

/// City name reported when a reverse-geocode match has no `locality` component.
pub const FALLBACK_CITY: &str = "Your Location";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Client for the Google Maps web services.
///
/// Use [`MapsClient::new`] for production or [`MapsClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct MapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    region: String,
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url.as_str())
            .field("region", &self.region)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl MapsClient {
    /// Creates a new client pointed at the production Google Maps API.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, MapsError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MapsError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MapsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vibeplaces/0.1 (nearby-search)")
            .build()?;

        // Exactly one trailing slash, so endpoint paths join beneath the base
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| MapsError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            region: DEFAULT_REGION.to_string(),
        })
    }

    /// Sets the country qualifier appended to forward-geocoding queries.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Runs one nearby search.
    ///
    /// `OK` and `ZERO_RESULTS` are both successes; the latter yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// - [`MapsError::Api`] for any other provider status.
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the body does not match the expected shape.
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<RawPlace>, MapsError> {
        let location = format!("{},{}", query.location.lat, query.location.lng);
        let radius = query.radius_m.to_string();

        let mut params = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", query.place_type.as_str()),
        ];
        if !query.keyword.is_empty() {
            params.push(("keyword", query.keyword.as_str()));
        }
        if query.open_now {
            params.push(("opennow", "true"));
        }

        let url = self.build_url("place/nearbysearch/json", &params)?;
        let response: NearbySearchResponse = self.request_json(&url, "nearbysearch").await?;

        match response.status.as_str() {
            STATUS_OK | STATUS_ZERO_RESULTS => {
                tracing::debug!(
                    place_type = %query.place_type,
                    radius_m = query.radius_m,
                    results = response.results.len(),
                    "nearby search complete"
                );
                Ok(response.results)
            }
            _ => Err(MapsError::Api {
                status: response.status,
                message: response.error_message,
            }),
        }
    }

    /// Fetches the fixed detail field set for one place.
    ///
    /// # Errors
    ///
    /// - [`MapsError::Api`] if the provider status is not `OK`.
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, MapsError> {
        let url = self.build_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let response: PlaceDetailsResponse = self.request_json(&url, "details").await?;

        if response.status != STATUS_OK {
            return Err(MapsError::Api {
                status: response.status,
                message: response.error_message,
            });
        }

        Ok(response.result.unwrap_or_default())
    }

    /// Forward-geocodes a free-text place name, qualified with the configured
    /// region. Returns `None` when the provider has no match.
    ///
    /// # Errors
    ///
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the body does not match the expected shape.
    pub async fn geocode(&self, place: &str) -> Result<Option<GeocodeMatch>, MapsError> {
        let address = format!("{}, {}", place.trim(), self.region);
        let url = self.build_url("geocode/json", &[("address", address.as_str())])?;
        let response: GeocodeResponse = self.request_json(&url, "geocode").await?;

        if response.status != STATUS_OK {
            tracing::debug!(status = %response.status, "geocode returned no match");
            return Ok(None);
        }

        Ok(response.results.into_iter().next().map(|first| GeocodeMatch {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            formatted_address: first.formatted_address,
        }))
    }

    /// Reverse-geocodes a coordinate pair to a city name.
    ///
    /// Returns `None` when the provider status is not `OK` or there are no
    /// results. A match without a `locality` component reports
    /// [`FALLBACK_CITY`].
    ///
    /// # Errors
    ///
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the body does not match the expected shape.
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Option<ReverseGeocodeMatch>, MapsError> {
        let latlng = format!("{lat},{lng}");
        let url = self.build_url("geocode/json", &[("latlng", latlng.as_str())])?;
        let response: GeocodeResponse = self.request_json(&url, "reverse-geocode").await?;

        if response.status != STATUS_OK {
            tracing::debug!(status = %response.status, "reverse geocode returned no match");
            return Ok(None);
        }

        Ok(response.results.into_iter().next().map(|first| {
            let city = first
                .address_components
                .iter()
                .find(|c| c.types.iter().any(|t| t == "locality"))
                .map_or_else(|| FALLBACK_CITY.to_string(), |c| c.long_name.clone());
            ReverseGeocodeMatch {
                city,
                formatted_address: first.formatted_address,
            }
        }))
    }

    /// The provider URL serving the photo bytes for `reference`. No request
    /// is made; callers redirect to it.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::InvalidBaseUrl`] if the photo endpoint cannot be
    /// joined onto the base URL.
    pub fn photo_url(&self, reference: &str, max_width: u32) -> Result<Url, MapsError> {
        let max_width = max_width.to_string();
        self.build_url(
            "place/photo",
            &[
                ("maxwidth", max_width.as_str()),
                ("photo_reference", reference),
            ],
        )
    }

    /// Joins `path` onto the base URL and appends the given parameters plus
    /// the API key via [`Url::query_pairs_mut`], so every value is
    /// percent-encoded.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, MapsError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| MapsError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body.
    ///
    /// `endpoint` labels logs and errors; the URL itself carries the key and
    /// is never logged.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        endpoint: &str,
    ) -> Result<T, MapsError> {
        tracing::debug!(endpoint, path = url.path(), "google maps request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let response = response
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        serde_json::from_str(&body).map_err(|e| MapsError::Deserialize {
            context: endpoint.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
