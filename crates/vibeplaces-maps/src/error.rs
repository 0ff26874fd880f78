use thiserror::Error;

/// Errors returned by the Google Maps web-service client.
#[derive(Debug, Error)]
pub enum MapsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success `status` field.
    #[error("Google Places API error: {}", describe_status(.status, .message.as_deref()))]
    Api {
        status: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

fn describe_status(status: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("{status} ({message})"),
        None => status.to_string(),
    }
}
