//! Client-local "saved places" collection.
//!
//! A set of [`EnrichedPlace`] snapshots keyed by place id, persisted as a
//! JSON array. There is no locking: the last writer wins.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enrich::EnrichedPlace;

#[derive(Debug, Error)]
pub enum SavedPlacesError {
    #[error("failed to access saved places file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("saved places file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Saved places in insertion order, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedPlaces {
    places: Vec<EnrichedPlace>,
}

impl SavedPlaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty collection.
    ///
    /// Duplicate ids in the file are collapsed, keeping the first.
    ///
    /// # Errors
    ///
    /// Returns [`SavedPlacesError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SavedPlacesError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(SavedPlacesError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let stored: Vec<EnrichedPlace> =
            serde_json::from_str(&content).map_err(|e| SavedPlacesError::Json {
                path: path.display().to_string(),
                source: e,
            })?;

        let mut saved = Self::new();
        for place in stored {
            saved.save(place);
        }
        Ok(saved)
    }

    /// Write the collection to `path`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`SavedPlacesError::Io`] if the file cannot be written.
    pub fn persist(&self, path: &Path) -> Result<(), SavedPlacesError> {
        let body = serde_json::to_string_pretty(&self.places).map_err(|e| {
            SavedPlacesError::Json {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        std::fs::write(path, body).map_err(|e| SavedPlacesError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Add a place. Returns `false` (and leaves the stored snapshot alone)
    /// if a place with the same id is already saved.
    pub fn save(&mut self, place: EnrichedPlace) -> bool {
        if self.contains(&place.id) {
            return false;
        }
        self.places.push(place);
        true
    }

    /// Remove the place with `id`. Returns whether anything was removed.
    pub fn unsave(&mut self, id: &str) -> bool {
        let before = self.places.len();
        self.places.retain(|p| p.id != id);
        self.places.len() != before
    }

    /// Save if absent, unsave if present. Returns whether the place is now saved.
    pub fn toggle(&mut self, place: EnrichedPlace) -> bool {
        if self.unsave(&place.id) {
            false
        } else {
            self.save(place)
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.places.iter().any(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedPlace> {
        self.places.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{enrich_place, PlaceListing, RandomSource, SearchContext, Weather};
    use crate::geo::Coordinates;

    fn place(id: &str) -> EnrichedPlace {
        let listing = PlaceListing {
            id: id.to_string(),
            name: format!("Place {id}"),
            address: None,
            location: Coordinates::new(19.076, 72.8777),
            rating: Some(4.1),
            review_count: Some(320),
            price_level: Some(2),
            open_now: Some(true),
            photos: Vec::new(),
            types: vec!["restaurant".to_string()],
        };
        let ctx = SearchContext {
            origin: Coordinates::new(19.0, 72.8),
            weather: Weather::classify(24, false),
            hour: 13,
        };
        enrich_place(listing, &ctx, &mut RandomSource::Seeded(1).rng())
    }

    #[test]
    fn save_is_idempotent_per_id() {
        let mut saved = SavedPlaces::new();
        assert!(saved.save(place("a")));
        assert!(!saved.save(place("a")));
        assert_eq!(saved.len(), 1);
    }

    #[test]
    fn unsave_removes_only_matching_id() {
        let mut saved = SavedPlaces::new();
        saved.save(place("a"));
        saved.save(place("b"));
        assert!(saved.unsave("a"));
        assert!(!saved.unsave("a"));
        assert!(!saved.contains("a"));
        assert!(saved.contains("b"));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut saved = SavedPlaces::new();
        assert!(saved.toggle(place("a")));
        assert!(saved.contains("a"));
        assert!(!saved.toggle(place("a")));
        assert!(saved.is_empty());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let saved = SavedPlaces::load(&dir.path().join("saved.json")).expect("load");
        assert!(saved.is_empty());
    }

    #[test]
    fn persist_then_load_keeps_places_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saved.json");

        let mut saved = SavedPlaces::new();
        saved.save(place("b"));
        saved.save(place("a"));
        saved.persist(&path).expect("persist");

        let loaded = SavedPlaces::load(&path).expect("load");
        let ids: Vec<&str> = loaded.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn load_collapses_duplicate_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saved.json");
        let body = serde_json::to_string(&vec![place("a"), place("a")]).unwrap();
        std::fs::write(&path, body).unwrap();

        let loaded = SavedPlaces::load(&path).expect("load");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saved.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SavedPlaces::load(&path).unwrap_err();
        assert!(matches!(err, SavedPlacesError::Json { .. }));
    }
}
