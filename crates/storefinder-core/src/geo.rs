//! Great-circle distance and distance labels.

use crate::domain::Coordinates;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Total and never negative: any negative intermediate is folded to its
/// absolute value, so swapped or mirrored coordinates still yield a usable
/// distance.
#[must_use]
pub fn great_circle_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).abs().sqrt());

    (EARTH_RADIUS_KM * c).abs()
}

/// Human label for a distance: `"950m"` below one kilometer, `"2.5km"` above.
#[must_use]
pub fn format_distance(meters: u64) -> String {
    if meters < 1000 {
        return format!("{meters}m");
    }
    #[allow(clippy::cast_precision_loss)]
    let km = meters as f64 / 1000.0;
    format!("{km:.1}km")
}
