//! The vibe catalog: mood identifiers mapped to provider place types and
//! presentation metadata.
//!
//! The catalog is built once at startup (from the embedded YAML or an
//! operator-supplied file) and shared read-only with request handlers.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUILTIN_VIBES: &str = include_str!("../../../config/vibes.yaml");

/// Place types used when a request names a vibe the catalog does not know.
const FALLBACK_TYPES: [&str; 2] = ["restaurant", "food"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    /// Priority-ordered provider place types. The first is the primary filter.
    pub types: Vec<String>,
    /// Descriptive tags for the UI; not sent to the provider.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The `type` / `keyword` pair sent to the provider's nearby search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub place_type: String,
    pub keyword: String,
}

impl VibeDefinition {
    fn fallback() -> Self {
        Self {
            id: "default".to_string(),
            name: "Anything".to_string(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
            types: FALLBACK_TYPES.iter().map(ToString::to_string).collect(),
            keywords: Vec::new(),
        }
    }

    /// Derive the provider filter for this vibe.
    ///
    /// The keyword is the secondary types joined with `" OR "`, unless the
    /// caller supplied a non-blank free-text query, which replaces it entirely.
    #[must_use]
    pub fn search_filter(&self, free_text: Option<&str>) -> SearchFilter {
        let place_type = self
            .types
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_TYPES[0].to_string());

        let keyword = match free_text.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => query.to_string(),
            None => self.types.iter().skip(1).cloned().collect::<Vec<_>>().join(" OR "),
        };

        SearchFilter {
            place_type,
            keyword,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VibesFile {
    vibes: Vec<VibeDefinition>,
}

/// Immutable vibe catalog shared by the search and listing endpoints.
#[derive(Debug, Clone)]
pub struct VibeCatalog {
    vibes: Vec<VibeDefinition>,
    fallback: VibeDefinition,
}

impl VibeCatalog {
    /// Build a catalog from definitions, validating ids, names, and types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on empty/duplicate ids, empty names,
    /// or a vibe with no place types.
    pub fn new(vibes: Vec<VibeDefinition>) -> Result<Self, ConfigError> {
        validate_vibes(&vibes)?;
        Ok(Self {
            vibes,
            fallback: VibeDefinition::fallback(),
        })
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded YAML is malformed.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_vibes(BUILTIN_VIBES)
    }

    /// Resolve a vibe for searching. Unknown ids resolve to the
    /// `restaurant` / `food` fallback rather than failing.
    #[must_use]
    pub fn lookup(&self, id: &str) -> &VibeDefinition {
        self.get_by_id(id).unwrap_or(&self.fallback)
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&VibeDefinition> {
        self.vibes.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn list_all(&self) -> &[VibeDefinition] {
        &self.vibes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vibes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vibes.is_empty()
    }
}

/// Load the vibe catalog from `path`, or the built-in catalog when `None`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_vibes(path: Option<&Path>) -> Result<VibeCatalog, ConfigError> {
    let Some(path) = path else {
        return VibeCatalog::builtin();
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VibesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_vibes(&content)
}

fn parse_vibes(content: &str) -> Result<VibeCatalog, ConfigError> {
    let file: VibesFile = serde_yaml::from_str(content)?;
    VibeCatalog::new(file.vibes)
}

fn validate_vibes(vibes: &[VibeDefinition]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for vibe in vibes {
        if vibe.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "vibe id must be non-empty".to_string(),
            ));
        }

        if vibe.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "vibe '{}' must have a non-empty name",
                vibe.id
            )));
        }

        if vibe.types.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "vibe '{}' must list at least one place type",
                vibe.id
            )));
        }

        if !seen_ids.insert(vibe.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate vibe id: '{}'",
                vibe.id
            )));
        }
    }

    Ok(())
}
