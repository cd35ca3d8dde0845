use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One flight record as published by the provider's flight manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(rename = "_id")]
    pub id: String,
    pub aircraft_identification: String,
    #[serde(default)]
    pub filed_route: Option<FiledRoute>,
    #[serde(default)]
    pub departure: Option<Departure>,
    #[serde(default)]
    pub arrival: Option<Arrival>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiledRoute {
    #[serde(default)]
    pub route_element: Vec<RouteElement>,
}

/// One leg of a filed route. SID/STAR procedure markers carry no designated
/// point; everything here is owned input, copied unchanged into the output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteElement {
    #[serde(default)]
    pub seq_num: i32,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub airway: Option<String>,
    #[serde(default)]
    pub airway_type: Option<String>,
    #[serde(default)]
    pub change_level: Option<String>,
    #[serde(default)]
    pub change_speed: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub designated_point: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    #[serde(default)]
    pub departure_aerodrome: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    #[serde(default)]
    pub destination_aerodrome: Option<String>,
}

impl Flight {
    pub fn route_elements(&self) -> &[RouteElement] {
        self.filed_route
            .as_ref()
            .map(|r| r.route_element.as_slice())
            .unwrap_or(&[])
    }

    pub fn departure_aerodrome(&self) -> Option<&str> {
        self.departure.as_ref()?.departure_aerodrome.as_deref()
    }

    pub fn destination_aerodrome(&self) -> Option<&str> {
        self.arrival.as_ref()?.destination_aerodrome.as_deref()
    }
}

/// Anything that can produce the current flight list.
pub trait FlightSource {
    fn fetch_flights(&self) -> Result<Vec<Flight>>;
}

/// Case-insensitive partial match on the aircraft identification (callsign).
pub fn filter_by_callsign<'a>(flights: &'a [Flight], query: &str) -> Vec<&'a Flight> {
    let query = query.to_uppercase();
    flights
        .iter()
        .filter(|f| f.aircraft_identification.to_uppercase().contains(&query))
        .collect()
}
