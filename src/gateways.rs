use crate::config::{Geocoding, GeocodingGateway};
use anyhow::Result;
use reqmap_core::gateways::geocode::GeoCodingGateway;
use reqmap_gateways::{nominatim::Nominatim, opencage::OpenCage};

pub fn geocoding_gateway(cfg: &Geocoding) -> Result<Box<dyn GeoCodingGateway>> {
    let gw: Box<dyn GeoCodingGateway> = match &cfg.gateway {
        GeocodingGateway::Nominatim {
            base_url,
            user_agent,
        } => Box::new(Nominatim::try_new(base_url, user_agent, cfg.timeout)?),
        GeocodingGateway::OpenCage { api_key } => {
            Box::new(OpenCage::try_new(api_key.clone(), cfg.timeout)?)
        }
    };
    Ok(gw)
}
