//! Enrichment pipeline for nearby-search results.
//!
//! Turns provider listings into display-ready [`EnrichedPlace`]s: distance
//! from the caller, hidden-gem detection, price bucket, weather fit, and a
//! set of flavor fields. Flavor fields draw from an injected [`rand::Rng`]
//! so callers (and tests) control the randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

const CANDIDATE_TEMPS: [i32; 5] = [22, 28, 31, 24, 19];
const RAIN_THRESHOLD: f64 = 0.7;

const HIDDEN_GEM_MIN_RATING: f64 = 4.4;
const HIDDEN_GEM_MAX_REVIEWS: u32 = 150;
const SYNTHETIC_REVIEW_CEILING: u32 = 200;

const MAX_AESTHETIC_SCORE: f64 = 10.0;

const PARKING_LEVELS: [&str; 3] = ["Low", "Moderate", "High Stress"];
const LIVE_EVENTS: [Option<&str>; 5] = [
    Some("Live Jazz"),
    Some("Happy Hour: 50% Off"),
    Some("IPL Screening"),
    Some("DJ Night"),
    None,
];
const SECRET_ITEMS: [&str; 4] = [
    "Truffle Sriracha Fries",
    "Ghost Pepper Burger",
    "Lavender Cold Brew",
    "Off-Menu Thali",
];
const CROWD_FORECAST: [(&str, u8); 6] = [
    ("12 PM", 40),
    ("2 PM", 85),
    ("4 PM", 30),
    ("6 PM", 60),
    ("8 PM", 95),
    ("10 PM", 70),
];

/// Where flavor randomness comes from.
///
/// `Seeded` makes every request draw the same sequence, which keeps
/// responses reproducible for demos and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomSource {
    #[default]
    Entropy,
    Seeded(u64),
}

impl RandomSource {
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or(Self::Entropy, Self::Seeded)
    }

    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self {
            Self::Entropy => StdRng::from_os_rng(),
            Self::Seeded(seed) => StdRng::seed_from_u64(*seed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherState {
    Hot,
    Cold,
    Rainy,
    Clear,
}

impl WeatherState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Cold => "Cold",
            Self::Rainy => "Rainy",
            Self::Clear => "Clear",
        }
    }
}

/// Mock weather reading attached to each search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub temp: i32,
    pub state: WeatherState,
}

impl Weather {
    /// Classify a temperature. `rainy` only matters in the mild band.
    #[must_use]
    pub fn classify(temp: i32, rainy: bool) -> Self {
        let state = if temp > 30 {
            WeatherState::Hot
        } else if temp < 20 {
            WeatherState::Cold
        } else if rainy {
            WeatherState::Rainy
        } else {
            WeatherState::Clear
        };
        Self { temp, state }
    }

    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let temp = CANDIDATE_TEMPS[rng.random_range(0..CANDIDATE_TEMPS.len())];
        let rainy = rng.random::<f64>() > RAIN_THRESHOLD;
        Self::classify(temp, rainy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    pub reference: String,
    pub width: u32,
    pub height: u32,
}

/// Provider-neutral nearby-search result, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceListing {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Coordinates,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub price_level: Option<i8>,
    pub open_now: Option<bool>,
    pub photos: Vec<PhotoRef>,
    pub types: Vec<String>,
}

impl PlaceListing {
    fn has_type(&self, place_type: &str) -> bool {
        self.types.iter().any(|t| t == place_type)
    }
}

/// Per-request inputs shared by every place in a result set.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext {
    pub origin: Coordinates,
    pub weather: Weather,
    /// Local hour of day, `0..24`.
    pub hour: u32,
}

impl SearchContext {
    fn is_night(&self) -> bool {
        self.hour > 19 || self.hour < 5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCompatibility {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Productivity {
    pub score: f64,
    pub wifi_speed: String,
    pub outlets: String,
    pub best_window: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Safety {
    pub score: f64,
    pub approach_road: String,
    pub solo_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdLevel {
    pub hour: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parking {
    pub status: String,
    pub nearest_lot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFriendly {
    pub score: u32,
    pub amenities: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambience {
    pub crowd: String,
    pub noise: String,
    pub lighting: String,
    pub comfort: String,
}

/// A listing plus everything the client renders for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPlace {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Coordinates,
    /// Metres from the caller, rounded.
    pub distance: f64,
    pub rating: f64,
    pub review_count: u32,
    /// Provider price tier, `-1` when unknown.
    pub price_level: i8,
    pub is_open: bool,
    pub photos: Vec<PhotoRef>,
    pub types: Vec<String>,
    pub weather_compatibility: WeatherCompatibility,
    pub productivity: Productivity,
    pub safety: Safety,
    pub decibel: u32,
    pub crowd_forecast: Vec<CrowdLevel>,
    pub is_hidden_gem: bool,
    pub parking: Parking,
    pub pulse: Option<String>,
    pub pet_friendly: PetFriendly,
    /// One decimal place, never above 10.
    pub aesthetic_score: String,
    pub secret_menu: String,
    pub ambience: Ambience,
    pub ai_explanation: String,
    pub vibe_match: u32,
}

/// Inclusive budget bounds from the request, in local currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
    pub min: i64,
    pub max: i64,
}

impl BudgetRange {
    /// Both bounds are required; a half-open budget applies no filter.
    #[must_use]
    pub fn from_bounds(min: Option<i64>, max: Option<i64>) -> Option<Self> {
        Some(Self {
            min: min?,
            max: max?,
        })
    }

    /// Highest price tier this budget admits, or `None` for no limit.
    #[must_use]
    pub fn max_price_level(&self) -> Option<i8> {
        match self.max {
            m if m <= 500 => Some(1),
            m if m <= 1500 => Some(2),
            m if m <= 3000 => Some(3),
            _ => None,
        }
    }
}

/// Response body of the nearby search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub weather: Weather,
    pub count: usize,
    pub places: Vec<EnrichedPlace>,
    pub top_recommendation: Option<EnrichedPlace>,
}

impl SearchResponse {
    #[must_use]
    pub fn new(weather: Weather, places: Vec<EnrichedPlace>) -> Self {
        Self {
            success: true,
            weather,
            count: places.len(),
            top_recommendation: places.first().cloned(),
            places,
        }
    }
}

/// Attach distance and display attributes to one listing.
pub fn enrich_place<R: Rng + ?Sized>(
    listing: PlaceListing,
    ctx: &SearchContext,
    rng: &mut R,
) -> EnrichedPlace {
    let distance = ctx.origin.distance_to(&listing.location).round();
    let is_cafe = listing.has_type("cafe");
    let is_night = ctx.is_night();
    let rating = listing.rating.unwrap_or(0.0);

    // Zero reviews is indistinguishable from "not reported" upstream.
    let review_count = match listing.review_count {
        Some(n) if n > 0 => n,
        _ => rng.random_range(0..SYNTHETIC_REVIEW_CEILING),
    };
    let is_hidden_gem = rating >= HIDDEN_GEM_MIN_RATING && review_count < HIDDEN_GEM_MAX_REVIEWS;

    let parking_status = PARKING_LEVELS[rng.random_range(0..PARKING_LEVELS.len())];
    let pulse = LIVE_EVENTS[rng.random_range(0..LIVE_EVENTS.len())];
    let pet_score = rng.random_range(0..5) + (if is_cafe { 5 } else { 3 });
    let secret_menu = SECRET_ITEMS[rng.random_range(0..SECRET_ITEMS.len())];
    let decibel = (if is_cafe { 55 } else { 75 }) + rng.random_range(0..20);
    let vibe_match = rng.random_range(92..=99);

    let gem_bonus = if is_hidden_gem { 1.0 } else { 0.0 };
    let aesthetic = (rating * 2.0 + gem_bonus).min(MAX_AESTHETIC_SCORE);

    let weather_compatibility = match ctx.weather.state {
        WeatherState::Rainy if is_cafe => WeatherCompatibility::High,
        WeatherState::Hot if !is_night => WeatherCompatibility::High,
        _ => WeatherCompatibility::Medium,
    };

    let best_window = if ctx.hour < 12 {
        "10 AM - 12 PM"
    } else {
        "3 PM - 5 PM"
    };

    EnrichedPlace {
        id: listing.id,
        name: listing.name,
        address: listing.address,
        location: listing.location,
        distance,
        rating,
        review_count,
        price_level: listing.price_level.unwrap_or(-1),
        is_open: listing.open_now.unwrap_or(false),
        photos: listing.photos,
        types: listing.types,
        weather_compatibility,
        productivity: Productivity {
            score: if is_cafe { 9.2 } else { 4.5 },
            wifi_speed: if is_cafe { "85 Mbps" } else { "N/A" }.to_string(),
            outlets: if is_cafe { "70% Tables" } else { "None" }.to_string(),
            best_window: best_window.to_string(),
        },
        safety: Safety {
            score: 9.5,
            approach_road: "Well-lit".to_string(),
            solo_rating: 4.8,
        },
        decibel,
        crowd_forecast: CROWD_FORECAST
            .iter()
            .map(|(hour, level)| CrowdLevel {
                hour: (*hour).to_string(),
                level: *level,
            })
            .collect(),
        is_hidden_gem,
        parking: Parking {
            status: parking_status.to_string(),
            nearest_lot: "200m away".to_string(),
        },
        pulse: pulse.map(ToString::to_string),
        pet_friendly: PetFriendly {
            score: pet_score,
            amenities: if is_cafe {
                "Water Bowls"
            } else {
                "Outdoor Seating"
            }
            .to_string(),
        },
        aesthetic_score: format!("{aesthetic:.1}"),
        secret_menu: secret_menu.to_string(),
        ambience: Ambience {
            crowd: "Moderate".to_string(),
            noise: "Loud".to_string(),
            lighting: if is_night { "Dim" } else { "Natural" }.to_string(),
            comfort: "Premium".to_string(),
        },
        ai_explanation: format!(
            "Recommended because it matches your vibe and current {} weather.",
            ctx.weather.state.as_str().to_lowercase()
        ),
        vibe_match,
    }
}

/// Keep places whose price tier fits the budget.
///
/// Unknown tiers (`-1`) always pass. If the filter would leave nothing, the
/// unfiltered list is returned instead.
#[must_use]
pub fn apply_budget_filter(
    places: Vec<EnrichedPlace>,
    budget: Option<BudgetRange>,
) -> Vec<EnrichedPlace> {
    let Some(limit) = budget.as_ref().and_then(BudgetRange::max_price_level) else {
        return places;
    };

    let fits = |p: &EnrichedPlace| p.price_level == -1 || p.price_level <= limit;
    if places.iter().any(fits) {
        places.into_iter().filter(|p| fits(p)).collect()
    } else {
        places
    }
}

/// Stable sort by rating, highest first. Ties keep provider order.
pub fn sort_by_rating(places: &mut [EnrichedPlace]) {
    places.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}

/// Run enrichment, budget filtering, and ranking over a provider result set.
pub fn rank_places<R: Rng + ?Sized>(
    listings: Vec<PlaceListing>,
    ctx: &SearchContext,
    budget: Option<BudgetRange>,
    rng: &mut R,
) -> Vec<EnrichedPlace> {
    let enriched = listings
        .into_iter()
        .map(|listing| enrich_place(listing, ctx, rng))
        .collect();

    let mut places = apply_budget_filter(enriched, budget);
    sort_by_rating(&mut places);
    places
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        RandomSource::Seeded(7).rng()
    }

    fn listing(id: &str, rating: Option<f64>, types: &[&str]) -> PlaceListing {
        PlaceListing {
            id: id.to_string(),
            name: format!("Place {id}"),
            address: Some("MG Road".to_string()),
            location: Coordinates::new(12.9716, 77.5946),
            rating,
            review_count: Some(500),
            price_level: None,
            open_now: Some(true),
            photos: Vec::new(),
            types: types.iter().map(ToString::to_string).collect(),
        }
    }

    fn ctx(state: WeatherState, hour: u32) -> SearchContext {
        SearchContext {
            origin: Coordinates::new(12.9716, 77.5946),
            weather: Weather { temp: 25, state },
            hour,
        }
    }

    fn priced(id: &str, price_level: Option<i8>, rating: f64) -> EnrichedPlace {
        let mut l = listing(id, Some(rating), &["restaurant"]);
        l.price_level = price_level;
        enrich_place(l, &ctx(WeatherState::Clear, 14), &mut rng())
    }

    #[test]
    fn weather_classification_bands() {
        assert_eq!(Weather::classify(31, true).state, WeatherState::Hot);
        assert_eq!(Weather::classify(19, true).state, WeatherState::Cold);
        assert_eq!(Weather::classify(24, true).state, WeatherState::Rainy);
        assert_eq!(Weather::classify(24, false).state, WeatherState::Clear);
        assert_eq!(Weather::classify(30, false).state, WeatherState::Clear);
        assert_eq!(Weather::classify(20, false).state, WeatherState::Clear);
    }

    #[test]
    fn drawn_weather_uses_candidate_temperatures() {
        let mut rng = rng();
        for _ in 0..50 {
            let w = Weather::draw(&mut rng);
            assert!(CANDIDATE_TEMPS.contains(&w.temp));
            assert_eq!(w, Weather::classify(w.temp, w.state == WeatherState::Rainy));
        }
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let a = Weather::draw(&mut RandomSource::Seeded(99).rng());
        let b = Weather::draw(&mut RandomSource::Seeded(99).rng());
        assert_eq!(a, b);
    }

    #[test]
    fn distance_is_rounded_metres() {
        let mut l = listing("a", Some(4.0), &["cafe"]);
        l.location = Coordinates::new(0.0, 1.0);
        let mut c = ctx(WeatherState::Clear, 10);
        c.origin = Coordinates::new(0.0, 0.0);
        let place = enrich_place(l, &c, &mut rng());
        assert!((place.distance - 111_195.0).abs() < 50.0);
        assert!((place.distance - place.distance.round()).abs() < f64::EPSILON);
    }

    #[test]
    fn hidden_gem_needs_high_rating_and_few_reviews() {
        let mut gem = listing("gem", Some(4.5), &["cafe"]);
        gem.review_count = Some(80);
        let place = enrich_place(gem, &ctx(WeatherState::Clear, 10), &mut rng());
        assert!(place.is_hidden_gem);
        assert_eq!(place.aesthetic_score, "10.0");

        let popular = listing("popular", Some(4.8), &["cafe"]);
        let place = enrich_place(popular, &ctx(WeatherState::Clear, 10), &mut rng());
        assert!(!place.is_hidden_gem);
        assert_eq!(place.review_count, 500);

        let mut mediocre = listing("meh", Some(4.3), &["cafe"]);
        mediocre.review_count = Some(10);
        let place = enrich_place(mediocre, &ctx(WeatherState::Clear, 10), &mut rng());
        assert!(!place.is_hidden_gem);
    }

    #[test]
    fn missing_review_count_is_synthesised_within_bounds() {
        let mut l = listing("x", Some(4.0), &["bar"]);
        l.review_count = None;
        let place = enrich_place(l, &ctx(WeatherState::Clear, 10), &mut rng());
        assert!(place.review_count < SYNTHETIC_REVIEW_CEILING);
    }

    #[test]
    fn missing_rating_and_price_use_sentinels() {
        let place = enrich_place(
            listing("x", None, &[]),
            &ctx(WeatherState::Clear, 10),
            &mut rng(),
        );
        assert!(place.rating.abs() < f64::EPSILON);
        assert_eq!(place.price_level, -1);
        assert_eq!(place.aesthetic_score, "0.0");
    }

    #[test]
    fn weather_compatibility_rules() {
        let cafe = || listing("c", Some(4.0), &["cafe"]);
        let bar = || listing("b", Some(4.0), &["bar"]);
        let compat = |l: PlaceListing, state, hour| {
            enrich_place(l, &ctx(state, hour), &mut rng()).weather_compatibility
        };

        assert_eq!(compat(cafe(), WeatherState::Rainy, 22), WeatherCompatibility::High);
        assert_eq!(compat(bar(), WeatherState::Rainy, 12), WeatherCompatibility::Medium);
        assert_eq!(compat(bar(), WeatherState::Hot, 12), WeatherCompatibility::High);
        assert_eq!(compat(bar(), WeatherState::Hot, 21), WeatherCompatibility::Medium);
        assert_eq!(compat(bar(), WeatherState::Hot, 4), WeatherCompatibility::Medium);
        assert_eq!(compat(cafe(), WeatherState::Clear, 12), WeatherCompatibility::Medium);
    }

    #[test]
    fn flavor_fields_stay_in_range() {
        let mut rng = rng();
        for hour in 0..24 {
            for types in [&["cafe"][..], &["night_club"][..]] {
                let place = enrich_place(
                    listing("x", Some(4.9), types),
                    &ctx(WeatherState::Clear, hour),
                    &mut rng,
                );
                let aesthetic: f64 = place.aesthetic_score.parse().expect("numeric score");
                assert!(aesthetic <= MAX_AESTHETIC_SCORE);
                assert!((92..=99).contains(&place.vibe_match));
                assert!(PARKING_LEVELS.contains(&place.parking.status.as_str()));
                assert!(SECRET_ITEMS.contains(&place.secret_menu.as_str()));
                assert_eq!(place.crowd_forecast.len(), CROWD_FORECAST.len());
                if types[0] == "cafe" {
                    assert!((5..10).contains(&place.pet_friendly.score));
                    assert!((55..75).contains(&place.decibel));
                } else {
                    assert!((3..8).contains(&place.pet_friendly.score));
                    assert!((75..95).contains(&place.decibel));
                }
            }
        }
    }

    #[test]
    fn hour_drives_best_window_and_lighting() {
        let morning = enrich_place(
            listing("m", Some(4.0), &["cafe"]),
            &ctx(WeatherState::Clear, 9),
            &mut rng(),
        );
        assert_eq!(morning.productivity.best_window, "10 AM - 12 PM");
        assert_eq!(morning.ambience.lighting, "Natural");

        let night = enrich_place(
            listing("n", Some(4.0), &["cafe"]),
            &ctx(WeatherState::Clear, 22),
            &mut rng(),
        );
        assert_eq!(night.productivity.best_window, "3 PM - 5 PM");
        assert_eq!(night.ambience.lighting, "Dim");
    }

    #[test]
    fn budget_filter_keeps_cheap_and_unknown_tiers() {
        let places = vec![
            priced("p0", Some(0), 4.0),
            priced("p1", Some(1), 4.0),
            priced("p2", Some(2), 4.0),
            priced("p3", Some(3), 4.0),
            priced("unknown", None, 4.0),
        ];
        let budget = BudgetRange::from_bounds(Some(100), Some(500));
        let kept: Vec<i8> = apply_budget_filter(places, budget)
            .iter()
            .map(|p| p.price_level)
            .collect();
        assert_eq!(kept, vec![0, 1, -1]);
    }

    #[test]
    fn budget_filter_tiers() {
        let range = |max| BudgetRange { min: 0, max };
        assert_eq!(range(500).max_price_level(), Some(1));
        assert_eq!(range(1000).max_price_level(), Some(2));
        assert_eq!(range(1500).max_price_level(), Some(2));
        assert_eq!(range(3000).max_price_level(), Some(3));
        assert_eq!(range(10_000).max_price_level(), None);
    }

    #[test]
    fn budget_filter_is_discarded_when_it_empties_results() {
        let places = vec![priced("p3", Some(3), 4.0), priced("p4", Some(4), 3.0)];
        let budget = BudgetRange::from_bounds(Some(0), Some(500));
        let kept = apply_budget_filter(places, budget);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn budget_filter_needs_both_bounds() {
        assert!(BudgetRange::from_bounds(None, Some(500)).is_none());
        assert!(BudgetRange::from_bounds(Some(100), None).is_none());

        let places = vec![priced("p0", Some(0), 4.0), priced("p4", Some(4), 3.0)];
        assert_eq!(apply_budget_filter(places, None).len(), 2);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut places = vec![
            priced("a", Some(1), 3.9),
            priced("b", Some(1), 4.6),
            priced("c", Some(1), 3.9),
            priced("d", Some(1), 4.6),
        ];
        sort_by_rating(&mut places);
        let ids: Vec<&str> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
        assert!(places.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn rank_places_filters_then_sorts() {
        let listings = vec![
            listing("low", Some(3.0), &["cafe"]),
            listing("high", Some(4.7), &["cafe"]),
        ];
        let places = rank_places(listings, &ctx(WeatherState::Clear, 12), None, &mut rng());
        assert_eq!(places[0].id, "high");
        assert_eq!(places[1].id, "low");
    }

    #[test]
    fn response_top_recommendation_is_first_place() {
        let places = vec![priced("a", Some(1), 4.9), priced("b", Some(1), 4.0)];
        let weather = Weather::classify(24, false);
        let response = SearchResponse::new(weather, places);
        assert!(response.success);
        assert_eq!(response.count, 2);
        assert_eq!(
            response.top_recommendation.as_ref().map(|p| p.id.as_str()),
            Some("a")
        );

        let empty = SearchResponse::new(weather, Vec::new());
        assert!(empty.top_recommendation.is_none());
    }

    #[test]
    fn enriched_place_serializes_camel_case() {
        let place = priced("a", Some(2), 4.2);
        let json = serde_json::to_value(&place).expect("serialize");
        assert_eq!(json["priceLevel"], 2);
        assert!(json["isHiddenGem"].is_boolean());
        assert!(json["aestheticScore"].is_string());
        assert!(json["productivity"]["wifiSpeed"].is_string());
        assert_eq!(json["weatherCompatibility"], "Medium");
    }
}
