use crate::flight::{Flight, FlightSource};
use crate::geopoint::Category;
use crate::store::GeopointSource;
use log::debug;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SwimError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Blocking client for the upstream SWIM provider. Authenticates with an
/// `apikey` header on every request.
pub struct SwimClient {
    http: reqwest::blocking::Client,
    base_uri: String,
    api_key: String,
}

impl SwimClient {
    pub fn new(base_uri: &str, api_key: &str) -> Result<Self, SwimError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_uri: base_uri.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_uri, path))
            .header("apikey", &self.api_key)
    }

    /// Raw geopoint lines for one category, e.g. `GET /geopoints/list/fixes`.
    pub fn list_geopoints(&self, category: Category) -> Result<Vec<String>, SwimError> {
        let lines: Vec<String> = self
            .get(&format!("/geopoints/list/{}", category.plural()))
            .send()?
            .error_for_status()?
            .json()?;
        debug!(
            "Fetched geopoint list — category={} entries={}",
            category,
            lines.len()
        );
        Ok(lines)
    }

    /// Every flight the provider currently tracks.
    pub fn display_all_flights(&self) -> Result<Vec<Flight>, SwimError> {
        let flights: Vec<Flight> = self
            .get("/flight-manager/displayAll")
            .send()?
            .error_for_status()?
            .json()?;
        debug!("Fetched flight list — count={}", flights.len());
        Ok(flights)
    }
}

impl GeopointSource for SwimClient {
    fn fetch_list(&self, category: Category) -> anyhow::Result<Vec<String>> {
        Ok(self.list_geopoints(category)?)
    }
}

impl FlightSource for SwimClient {
    fn fetch_flights(&self) -> anyhow::Result<Vec<Flight>> {
        Ok(self.display_all_flights()?)
    }
}
