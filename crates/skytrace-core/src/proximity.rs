use crate::geopoint::{Coord, Geopoint};

/// Mean Earth radius in nautical miles.
const EARTH_RADIUS_NM: f64 = 3440.1;

/// Great-circle (haversine) distance between two coordinates, in nautical
/// miles.
pub fn haversine_nm(a: Coord, b: Coord) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    // h = sin²(dLat/2) + cos(lat1) * cos(lat2) * sin²(dLon/2)
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_NM * c
}

/// Picks the candidate nearest to `reference` out of a duplicate set.
///
/// With no reference, or a single candidate, the first entry in source order
/// wins. Candidates without coordinates are never measured; if none have
/// coordinates the first entry is returned as-is. Ties keep the candidate
/// encountered first (strict `<` scan).
pub fn resolve_candidate<'a>(
    candidates: &'a [Geopoint],
    reference: Option<Coord>,
) -> Option<&'a Geopoint> {
    let first = candidates.first()?;
    if candidates.len() == 1 {
        return Some(first);
    }

    let reference = match reference {
        Some(r) => r,
        None => return Some(first),
    };

    let mut closest: Option<&Geopoint> = None;
    let mut min_dist = f64::INFINITY;

    for cand in candidates {
        let coord = match cand.coord() {
            Some(c) => c,
            None => continue,
        };
        let dist = haversine_nm(reference, coord);
        if dist < min_dist {
            min_dist = dist;
            closest = Some(cand);
        }
    }

    Some(closest.unwrap_or(first))
}
