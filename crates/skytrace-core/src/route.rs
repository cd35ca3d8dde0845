use crate::flight::{FlightSource, RouteElement};
use crate::geopoint::{Category, Coord};
use crate::proximity::resolve_candidate;
use crate::store::{GeopointCache, GeopointStore};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("flight {0} not found")]
    FlightNotFound(String),
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

/// One output record per route element, in filed order. Null coordinates mean
/// the designator could not be matched; that is an expected outcome for
/// procedure codes and unlisted fixes, never an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWaypoint {
    pub designated_point: String,
    #[serde(rename = "type")]
    pub point_type: String,
    pub seq_num: i32,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airway_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_speed: Option<String>,
}

impl ResolvedWaypoint {
    pub fn coord(&self) -> Option<Coord> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coord { lat, lon }),
            _ => None,
        }
    }
}

/// Departure/arrival aerodrome waypoints for a flight, resolved through the
/// airport category of the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitCoords {
    pub departure: Option<ResolvedWaypoint>,
    pub arrival: Option<ResolvedWaypoint>,
}

/// Resolves a filed route into waypoints, element by element.
///
/// Each element's duplicate set is disambiguated against the most recent
/// previously resolved coordinate; only when no element has resolved yet do
/// the departure and then arrival anchors apply. The chain makes an ambiguous
/// point late in the route snap to its geographic neighborhood instead of a
/// fixed anchor, so elements must be folded strictly in sequence order.
pub fn resolve_route(
    elements: &[RouteElement],
    dep_anchor: Option<Coord>,
    arr_anchor: Option<Coord>,
    store: &GeopointStore,
) -> Vec<ResolvedWaypoint> {
    let mut waypoints: Vec<ResolvedWaypoint> = Vec::with_capacity(elements.len());

    for elem in elements {
        let code = elem
            .position
            .as_ref()
            .and_then(|p| p.designated_point.clone())
            .filter(|c| !c.is_empty());

        let code = match code {
            Some(code) => code,
            None => {
                // Procedure marker (SID/STAR): no designator to look up, but
                // the output must stay one-to-one with the input.
                waypoints.push(unresolved_marker(elem));
                continue;
            }
        };

        let category = Category::classify(&code);
        let candidates = store.lookup(&code, category);

        let reference = waypoints
            .iter()
            .rev()
            .find_map(ResolvedWaypoint::coord)
            .or(dep_anchor)
            .or(arr_anchor);

        let resolved = resolve_candidate(candidates, reference);
        if resolved.is_none() {
            debug!("No candidates for designator — code={} category={}", code, category);
        }
        let (lat, lon) = match resolved {
            Some(point) => (point.lat, point.lon),
            None => (None, None),
        };

        waypoints.push(ResolvedWaypoint {
            designated_point: code,
            point_type: category.label().to_string(),
            seq_num: elem.seq_num,
            lat,
            lon,
            airway: elem.airway.clone(),
            airway_type: elem.airway_type.clone(),
            change_level: elem.change_level.clone(),
            change_speed: elem.change_speed.clone(),
        });
    }

    waypoints
}

fn unresolved_marker(elem: &RouteElement) -> ResolvedWaypoint {
    ResolvedWaypoint {
        designated_point: String::new(),
        point_type: elem
            .airway_type
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        seq_num: elem.seq_num,
        lat: None,
        lon: None,
        airway: elem.airway.clone(),
        airway_type: elem.airway_type.clone(),
        change_level: elem.change_level.clone(),
        change_speed: elem.change_speed.clone(),
    }
}

/// Anchor coordinate for an aerodrome code: first airport candidate in
/// provider order, per the no-reference policy.
fn aerodrome_anchor(store: &GeopointStore, code: &str) -> Option<Coord> {
    let candidates = store.lookup(code, Category::Airport);
    resolve_candidate(candidates, None).and_then(|p| p.coord())
}

/// Request-scoped resolver tying a flight source to the geopoint store.
/// Stateless across calls; each pass works off one store snapshot.
pub struct RouteResolver<'a> {
    flights: &'a dyn FlightSource,
    cache: &'a GeopointCache,
}

impl<'a> RouteResolver<'a> {
    pub fn new(flights: &'a dyn FlightSource, cache: &'a GeopointCache) -> Self {
        Self { flights, cache }
    }

    /// End-to-end resolution for one flight id. An unknown id is the only
    /// hard failure; per-element misses degrade to null coordinates.
    pub fn route_for_flight(&self, id: &str) -> Result<Vec<ResolvedWaypoint>, RouteError> {
        let all = self.flights.fetch_flights()?;
        let flight = all
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| RouteError::FlightNotFound(id.to_string()))?;

        let elements = flight.route_elements();
        if elements.is_empty() {
            warn!(
                "No route elements filed — flight={}",
                flight.aircraft_identification
            );
            return Ok(Vec::new());
        }

        let store = self.cache.snapshot();
        let dep_anchor = flight
            .departure_aerodrome()
            .and_then(|code| aerodrome_anchor(&store, code));
        let arr_anchor = flight
            .destination_aerodrome()
            .and_then(|code| aerodrome_anchor(&store, code));

        Ok(resolve_route(elements, dep_anchor, arr_anchor, &store))
    }

    /// Departure and arrival aerodromes of a flight as resolved waypoints.
    /// Sequence numbers -1 and -2 mark them as outside the filed route.
    pub fn transit_coords(&self, id: &str) -> Result<TransitCoords, RouteError> {
        let all = self.flights.fetch_flights()?;
        let flight = all
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| RouteError::FlightNotFound(id.to_string()))?;

        let store = self.cache.snapshot();

        let departure = flight.departure_aerodrome().map(|code| {
            transit_waypoint(&store, code, -1, "DEPARTURE")
        });
        let arrival = flight.destination_aerodrome().map(|code| {
            transit_waypoint(&store, code, -2, "ARRIVAL")
        });

        Ok(TransitCoords { departure, arrival })
    }
}

fn transit_waypoint(
    store: &GeopointStore,
    code: &str,
    seq_num: i32,
    leg: &str,
) -> ResolvedWaypoint {
    let coord = aerodrome_anchor(store, code);
    if coord.is_none() {
        warn!("Aerodrome not found in store — code={}", code);
    }
    ResolvedWaypoint {
        designated_point: code.to_string(),
        point_type: Category::Airport.label().to_string(),
        seq_num,
        lat: coord.map(|c| c.lat),
        lon: coord.map(|c| c.lon),
        airway: None,
        airway_type: Some(leg.to_string()),
        change_level: None,
        change_speed: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::Position;

    fn element(seq: i32, code: Option<&str>, airway_type: Option<&str>) -> RouteElement {
        RouteElement {
            seq_num: seq,
            position: code.map(|c| Position {
                designated_point: Some(c.to_string()),
            }),
            airway: None,
            airway_type: airway_type.map(|s| s.to_string()),
            change_level: None,
            change_speed: None,
        }
    }

    #[test]
    fn test_procedure_marker_emits_null_waypoint_with_airway_type_label() {
        let store = GeopointStore::default();
        let elements = [element(0, None, Some("SID"))];
        let out = resolve_route(&elements, None, None, &store);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].designated_point, "");
        assert_eq!(out[0].point_type, "SID");
        assert_eq!(out[0].lat, None);
        assert_eq!(out[0].lon, None);
    }

    #[test]
    fn test_annotations_are_copied_through_unchanged() {
        let store = GeopointStore::default();
        let mut elem = element(3, Some("ZZZZZ"), Some("NAMED"));
        elem.airway = Some("L642".to_string());
        elem.change_level = Some("F350".to_string());
        elem.change_speed = Some("N0480".to_string());

        let out = resolve_route(&[elem], None, None, &store);
        assert_eq!(out[0].seq_num, 3);
        assert_eq!(out[0].airway.as_deref(), Some("L642"));
        assert_eq!(out[0].airway_type.as_deref(), Some("NAMED"));
        assert_eq!(out[0].change_level.as_deref(), Some("F350"));
        assert_eq!(out[0].change_speed.as_deref(), Some("N0480"));
    }
}
