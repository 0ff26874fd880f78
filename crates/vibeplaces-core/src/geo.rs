//! Great-circle distance on a spherical Earth.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other` in metres.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        distance_meters(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine distance in metres between two points given in degrees.
///
/// `a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)`, `d = 2R · atan2(√a, √(1−a))`.
/// Non-finite input yields `NaN`; nothing is trapped.
#[must_use]
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * PI / 180.0;
    let phi2 = lat2 * PI / 180.0;
    let delta_phi = (lat2 - lat1) * PI / 180.0;
    let delta_lambda = (lon2 - lon1) * PI / 180.0;

    let a = (delta_phi / 2.0).sin() * (delta_phi / 2.0).sin()
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin() * (delta_lambda / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_POINTS: [(f64, f64); 5] = [
        (0.0, 0.0),
        (12.9716, 77.5946),
        (-33.8688, 151.2093),
        (51.5074, -0.1278),
        (89.9, 179.9),
    ];

    #[test]
    fn distance_to_self_is_zero() {
        for (lat, lng) in SAMPLE_POINTS {
            assert!(distance_meters(lat, lng, lat, lng).abs() < 1e-6);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        for (lat1, lng1) in SAMPLE_POINTS {
            for (lat2, lng2) in SAMPLE_POINTS {
                let ab = distance_meters(lat1, lng1, lat2, lng2);
                let ba = distance_meters(lat2, lng2, lat1, lng1);
                assert!((ab - ba).abs() < 1e-6, "asymmetric for {lat1},{lng1} / {lat2},{lng2}");
            }
        }
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance_meters(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn nan_input_propagates() {
        assert!(distance_meters(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn coordinates_distance_matches_free_function() {
        let a = Coordinates::new(12.9716, 77.5946);
        let b = Coordinates::new(13.0827, 80.2707);
        let expected = distance_meters(a.lat, a.lng, b.lat, b.lng);
        assert!((a.distance_to(&b) - expected).abs() < f64::EPSILON);
    }
}
