pub mod app_config;
pub mod config;
pub mod enrich;
pub mod geo;
pub mod saved;
pub mod vibes;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use enrich::{
    apply_budget_filter, enrich_place, rank_places, sort_by_rating, BudgetRange, EnrichedPlace,
    PhotoRef, PlaceListing, RandomSource, SearchContext, SearchResponse, Weather, WeatherState,
};
pub use geo::{distance_meters, Coordinates};
pub use saved::{SavedPlaces, SavedPlacesError};
pub use vibes::{load_vibes, SearchFilter, VibeCatalog, VibeDefinition};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read vibes file {path}: {source}")]
    VibesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vibes file: {0}")]
    VibesFileParse(#[from] serde_yaml::Error),

    #[error("vibe catalog validation failed: {0}")]
    Validation(String),
}
