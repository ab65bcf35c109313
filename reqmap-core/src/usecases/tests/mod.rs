//! Test doubles shared by the use case tests.

use crate::{
    entities::*,
    gateways::{
        geocode::{self, GeoCodingGateway},
        render::{self, MapRenderer, MapView},
    },
    geocache::GeocodeCache,
    repositories::{self, GeocodeCacheRepo},
};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io,
};

const CENTER_LAT_DEG: f64 = 55.8437;
const CENTER_LNG_DEG: f64 = 48.5066;
const MAX_DISTANCE_KM: f64 = 10.0;

pub fn center() -> MapPoint {
    MapPoint::from_lat_lng_deg(CENTER_LAT_DEG, CENTER_LNG_DEG)
}

/// A position roughly `km` kilometers north of the center.
pub fn north_of_center(km: f64) -> MapPoint {
    MapPoint::from_lat_lng_deg(CENTER_LAT_DEG + km / 111.2, CENTER_LNG_DEG)
}

pub fn region() -> PlausibilityRegion {
    PlausibilityRegion::new(center(), Distance::from_km(MAX_DISTANCE_KM))
}

type Answer = Result<Option<(f64, f64)>, geocode::Error>;

/// Answers queries from a fixed table, unknown queries have no result.
#[derive(Default)]
pub struct MockGeocoder {
    answers: HashMap<String, Answer>,
    lookups: Cell<usize>,
}

impl MockGeocoder {
    pub fn with_position(mut self, query: &str, pos: MapPoint) -> Self {
        self.answers
            .insert(query.to_owned(), Ok(Some(pos.to_lat_lng_deg())));
        self
    }

    pub fn with_error(mut self, query: &str, err: geocode::Error) -> Self {
        self.answers.insert(query.to_owned(), Err(err));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl GeoCodingGateway for MockGeocoder {
    fn resolve_address_lat_lng(&self, query: &str) -> Answer {
        self.lookups.set(self.lookups.get() + 1);
        self.answers.get(query).cloned().unwrap_or(Ok(None))
    }
}

#[derive(Default)]
pub struct MemCacheRepo {
    persisted: RefCell<Option<GeocodeCache>>,
    persist_calls: Cell<usize>,
}

impl MemCacheRepo {
    pub fn persisted(&self) -> Option<GeocodeCache> {
        self.persisted.borrow().clone()
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.get()
    }
}

impl GeocodeCacheRepo for MemCacheRepo {
    fn load_geocode_cache(&self) -> Result<GeocodeCache, repositories::Error> {
        Ok(self
            .persisted
            .borrow()
            .as_ref()
            .map(|cache| cache.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default())
    }

    fn persist_geocode_cache(&self, cache: &GeocodeCache) -> Result<(), repositories::Error> {
        self.persist_calls.set(self.persist_calls.get() + 1);
        *self.persisted.borrow_mut() = Some(cache.clone());
        Ok(())
    }
}

pub struct FailingCacheRepo;

impl GeocodeCacheRepo for FailingCacheRepo {
    fn load_geocode_cache(&self) -> Result<GeocodeCache, repositories::Error> {
        Ok(GeocodeCache::new())
    }

    fn persist_geocode_cache(&self, _: &GeocodeCache) -> Result<(), repositories::Error> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

#[derive(Default)]
pub struct MockRenderer {
    center: Cell<Option<MapPoint>>,
    rendered: RefCell<Vec<MapPoint>>,
}

impl MockRenderer {
    pub fn center(&self) -> Option<MapPoint> {
        self.center.get()
    }

    pub fn rendered(&self) -> Vec<MapPoint> {
        self.rendered.borrow().clone()
    }
}

impl MapRenderer for MockRenderer {
    fn render_map(&self, view: &MapView) -> Result<(), render::Error> {
        self.center.set(Some(view.center));
        *self.rendered.borrow_mut() = view.requests.iter().map(|req| req.pos).collect();
        Ok(())
    }
}
