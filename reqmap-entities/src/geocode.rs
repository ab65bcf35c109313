use crate::geo::MapPoint;

/// A durable geocoding result that is safe to reuse in later runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeEntry {
    /// The address was resolved to a position inside the plausibility region.
    Resolved(MapPoint),
    /// The geocoder answered, but without a usable position
    /// (no match or a match outside of the plausibility region).
    Unresolvable,
}

impl GeocodeEntry {
    pub fn pos(self) -> Option<MapPoint> {
        match self {
            Self::Resolved(pos) => Some(pos),
            Self::Unresolvable => None,
        }
    }
}

/// The outcome of looking up an address key in the geocode cache.
///
/// `Missing` must not be confused with `Unresolvable`: only the
/// former triggers a request to the external geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Resolved(MapPoint),
    Unresolvable,
    Missing,
}

impl From<Option<GeocodeEntry>> for CacheLookup {
    fn from(from: Option<GeocodeEntry>) -> Self {
        match from {
            Some(GeocodeEntry::Resolved(pos)) => Self::Resolved(pos),
            Some(GeocodeEntry::Unresolvable) => Self::Unresolvable,
            None => Self::Missing,
        }
    }
}
