//! Conversion of provider results into the provider-neutral listing the
//! enrichment pipeline consumes.

use vibeplaces_core::{Coordinates, PhotoRef, PlaceListing};

use crate::types::RawPlace;

/// Converts a nearby-search [`RawPlace`] into a [`PlaceListing`].
#[must_use]
pub fn normalize_place(raw: RawPlace) -> PlaceListing {
    let location = raw.geometry.location;

    PlaceListing {
        id: raw.place_id,
        name: raw.name,
        address: raw.vicinity,
        location: Coordinates::new(location.lat, location.lng),
        rating: raw.rating,
        review_count: raw.user_ratings_total,
        price_level: raw.price_level,
        open_now: raw.opening_hours.and_then(|h| h.open_now),
        photos: raw
            .photos
            .into_iter()
            .map(|p| PhotoRef {
                reference: p.photo_reference,
                width: p.width,
                height: p.height,
            })
            .collect(),
        types: raw.types,
    }
}
