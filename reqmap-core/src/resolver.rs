use crate::{
    entities::*,
    gateways::geocode::{self, GeoCodingGateway},
    rate_limit::{RateLimiter, Ticket},
};
use std::time::Duration;

/// The outcome of resolving a single address.
#[derive(Debug)]
pub enum Resolution {
    /// A position inside of the plausibility region.
    Resolved(MapPoint),
    /// The geocoder found a position, but too far away from the center.
    /// Most likely a street with the same name in another city.
    OutOfRegion { pos: MapPoint, distance: Distance },
    /// The geocoder did not find anything.
    NotFound,
    /// The lookup failed for now, e.g. due to a timeout.
    Failed(geocode::Error),
}

impl Resolution {
    /// The cache entry for this outcome, `None` for transient failures.
    pub fn durable_entry(&self) -> Option<GeocodeEntry> {
        match self {
            Self::Resolved(pos) => Some(GeocodeEntry::Resolved(*pos)),
            Self::OutOfRegion { .. } | Self::NotFound => Some(GeocodeEntry::Unresolvable),
            Self::Failed(_) => None,
        }
    }

    pub fn pos(&self) -> Option<MapPoint> {
        match self {
            Self::Resolved(pos) => Some(*pos),
            _ => None,
        }
    }
}

/// Resolves addresses with a geocoding gateway while respecting
/// its rate limit and rejecting implausible positions.
#[derive(Debug)]
pub struct RateLimitedResolver<G> {
    gateway: G,
    limiter: RateLimiter,
    region: PlausibilityRegion,
    max_retries: u32,
}

impl<G> RateLimitedResolver<G>
where
    G: GeoCodingGateway,
{
    pub fn new(gateway: G, min_delay: Duration, region: PlausibilityRegion) -> Self {
        Self {
            gateway,
            limiter: RateLimiter::new(min_delay),
            region,
            max_retries: 0,
        }
    }

    /// Retry transient failures, each retry waits for its own call slot.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn region(&self) -> &PlausibilityRegion {
        &self.region
    }

    pub fn resolve(&self, address: &str) -> Resolution {
        let mut retries = 0;
        loop {
            let ticket = self.limiter.acquire();
            match self.lookup(ticket, address) {
                Ok(Some((lat, lng))) => return self.validate(address, lat, lng),
                Ok(None) => {
                    log::debug!("No geocoding result for '{address}'");
                    return Resolution::NotFound;
                }
                Err(err) if err.is_retryable() && retries < self.max_retries => {
                    retries += 1;
                    log::debug!(
                        "Failed to resolve '{address}' ({err}), retry {retries} of {}",
                        self.max_retries
                    );
                }
                Err(err) => {
                    log::warn!("Failed to resolve '{address}': {err}");
                    return Resolution::Failed(err);
                }
            }
        }
    }

    fn lookup(&self, _ticket: Ticket, address: &str) -> Result<Option<(f64, f64)>, geocode::Error> {
        self.gateway.resolve_address_lat_lng(address)
    }

    fn validate(&self, address: &str, lat: f64, lng: f64) -> Resolution {
        let Some(pos) = MapPoint::try_from_lat_lng_deg(lat, lng) else {
            return Resolution::Failed(geocode::Error::InvalidPosition { lat, lng });
        };
        let distance = self
            .region
            .distance_to(pos)
            .unwrap_or_else(Distance::infinite);
        if distance <= self.region.max_distance {
            log::debug!("Resolved '{address}': {pos}");
            Resolution::Resolved(pos)
        } else {
            log::info!(
                "Rejected position {pos} of '{address}': {distance} away from {}",
                self.region.center
            );
            Resolution::OutOfRegion { pos, distance }
        }
    }
}
