use crate::{response_error, transport_error};
use anyhow::Result;
use reqmap_core::gateways::geocode::{self, GeoCodingGateway};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const API_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Forward geocoding with the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCage {
    client: Client,
    api_key: String,
}

impl OpenCage {
    pub fn try_new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    results: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

fn parse_response(body: &str) -> Result<Option<(f64, f64)>, geocode::Error> {
    let Response { results } = serde_json::from_str(body).map_err(response_error)?;
    Ok(results
        .into_iter()
        .next()
        .map(|Candidate { geometry }| (geometry.lat, geometry.lng)))
}

impl GeoCodingGateway for OpenCage {
    fn resolve_address_lat_lng(&self, query: &str) -> Result<Option<(f64, f64)>, geocode::Error> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(geocode::Error::Status(status.as_u16()));
        }
        let body = response.text().map_err(transport_error)?;
        parse_response(&body)
    }
}
