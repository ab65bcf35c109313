use crate::entities::RawServiceRequest;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The request source is not available: {0}")]
    Unavailable(String),
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A tabular provider of service requests.
pub trait RequestSource {
    fn load_requests(&self) -> Result<Vec<RawServiceRequest>, Error>;
}
