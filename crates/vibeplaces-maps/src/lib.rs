pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{MapsClient, FALLBACK_CITY};
pub use error::MapsError;
pub use normalize::normalize_place;
pub use types::{GeocodeMatch, NearbyQuery, PlaceDetail, RawPlace, ReverseGeocodeMatch};
