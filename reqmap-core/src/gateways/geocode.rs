use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Geocoding request failed: {0}")]
    Transport(String),
    #[error("Geocoding service responded with HTTP status {0}")]
    Status(u16),
    #[error("Unexpected geocoding response: {0}")]
    Response(String),
    #[error("Geocoding service returned an invalid position ({lat},{lng})")]
    InvalidPosition { lat: f64, lng: f64 },
}

impl Error {
    /// Whether repeating the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::Response(_) | Self::InvalidPosition { .. } => false,
        }
    }
}

pub trait GeoCodingGateway {
    /// Forward geocoding of a free-form address query.
    ///
    /// `Ok(None)` means the service answered but did not find
    /// the address. Every `Err` is considered a transient failure.
    fn resolve_address_lat_lng(&self, query: &str) -> Result<Option<(f64, f64)>, Error>;
}

impl<G> GeoCodingGateway for &G
where
    G: GeoCodingGateway + ?Sized,
{
    fn resolve_address_lat_lng(&self, query: &str) -> Result<Option<(f64, f64)>, Error> {
        (**self).resolve_address_lat_lng(query)
    }
}

impl<G> GeoCodingGateway for Box<G>
where
    G: GeoCodingGateway + ?Sized,
{
    fn resolve_address_lat_lng(&self, query: &str) -> Result<Option<(f64, f64)>, Error> {
        (**self).resolve_address_lat_lng(query)
    }
}
