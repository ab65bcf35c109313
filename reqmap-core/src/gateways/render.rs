use crate::entities::*;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to render the map: {0}")]
    Template(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Everything needed to draw the requests on a map.
#[derive(Debug, Clone)]
pub struct MapView<'a> {
    /// Initial view before fitting the bounds.
    pub center: MapPoint,
    /// Bounds of all requests, `None` if there are none.
    pub bbox: Option<MapBbox>,
    pub requests: &'a [LocatedRequest],
}

pub trait MapRenderer {
    fn render_map(&self, view: &MapView) -> Result<(), Error>;
}
