use crate::{response_error, transport_error};
use anyhow::Result;
use reqmap_core::gateways::geocode::{self, GeoCodingGateway};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Forward geocoding with the OpenStreetMap Nominatim search API.
///
/// The public instance allows at most one request per second and
/// requires an identifying user agent.
#[derive(Debug, Clone)]
pub struct Nominatim {
    client: Client,
    search_url: String,
}

impl Nominatim {
    pub fn try_new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        let search_url = format!("{}/search", base_url.trim_end_matches('/'));
        Ok(Self { client, search_url })
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

fn parse_search_response(body: &str) -> Result<Option<(f64, f64)>, geocode::Error> {
    let places: Vec<Place> = serde_json::from_str(body).map_err(response_error)?;
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };
    let lat = place.lat.trim().parse::<f64>().map_err(response_error)?;
    let lng = place.lon.trim().parse::<f64>().map_err(response_error)?;
    if let Some(name) = &place.display_name {
        log::trace!("Nominatim found '{name}'");
    }
    Ok(Some((lat, lng)))
}

impl GeoCodingGateway for Nominatim {
    fn resolve_address_lat_lng(&self, query: &str) -> Result<Option<(f64, f64)>, geocode::Error> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(geocode::Error::Status(status.as_u16()));
        }
        let body = response.text().map_err(transport_error)?;
        parse_search_response(&body)
    }
}
