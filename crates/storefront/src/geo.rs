//! Great-circle distance and pickup-location ranking.
//!
//! Downstream sorting depends on every caller computing distance the same
//! way, so this is the only haversine implementation in the workspace.

use silkroots_core::{Coordinates, PickupLocation};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Inputs are decimal degrees.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Annotate candidates with their distance from `user`, sort ascending, and
/// keep the first `limit`.
///
/// With no user point the candidates come back unranked and unfiltered, with
/// no distance attached.
#[must_use]
pub fn rank(
    user: Option<Coordinates>,
    candidates: &[PickupLocation],
    limit: usize,
) -> Vec<PickupLocation> {
    let Some(user) = user else {
        return candidates.to_vec();
    };

    let mut ranked: Vec<PickupLocation> = candidates
        .iter()
        .map(|location| {
            let mut location = location.clone();
            location.distance_km = Some(distance_km(user, location.coordinates()));
            location
        })
        .collect();

    ranked.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
