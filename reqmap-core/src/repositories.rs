// Durable storage of the geocode cache.

use crate::geocache::GeocodeCache;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported storage format: {0}")]
    Format(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait GeocodeCacheRepo {
    /// Loading a cache that has never been persisted
    /// yields an empty cache.
    fn load_geocode_cache(&self) -> Result<GeocodeCache>;

    /// Replaces the persisted cache atomically, i.e. a failure
    /// never corrupts the previously persisted entries.
    fn persist_geocode_cache(&self, cache: &GeocodeCache) -> Result<()>;
}
