pub mod prelude {
    use reqmap_core::{
        entities::*,
        gateways::{
            geocode::{self, GeoCodingGateway},
            render::{self, MapRenderer, MapView},
            source::{self, RequestSource},
        },
        geocache::GeocodeCache,
        repositories::{self, GeocodeCacheRepo},
    };
    use std::{
        cell::{Cell, RefCell},
        collections::HashMap,
    };

    const CENTER_LAT_DEG: f64 = 55.8437;
    const CENTER_LNG_DEG: f64 = 48.5066;

    pub fn center() -> MapPoint {
        MapPoint::from_lat_lng_deg(CENTER_LAT_DEG, CENTER_LNG_DEG)
    }

    pub fn north_of_center(km: f64) -> MapPoint {
        MapPoint::from_lat_lng_deg(CENTER_LAT_DEG + km / 111.2, CENTER_LNG_DEG)
    }

    pub fn region() -> PlausibilityRegion {
        PlausibilityRegion::new(center(), Distance::from_km(10.0))
    }

    pub fn row(
        street: &str,
        house: &str,
        created_at: &str,
        category: &str,
        count: &str,
    ) -> RawServiceRequest {
        let cell = |s: &str| Some(s.to_owned()).filter(|s| !s.is_empty());
        RawServiceRequest {
            street: cell(street),
            house: cell(house),
            category: cell(category),
            created_at: cell(created_at),
            count: cell(count),
        }
    }

    pub struct MemSource {
        rows: Vec<RawServiceRequest>,
        loads: Cell<usize>,
    }

    impl MemSource {
        pub fn new(rows: Vec<RawServiceRequest>) -> Self {
            Self {
                rows,
                loads: Cell::new(0),
            }
        }

        pub fn loads(&self) -> usize {
            self.loads.get()
        }
    }

    impl RequestSource for MemSource {
        fn load_requests(&self) -> Result<Vec<RawServiceRequest>, source::Error> {
            self.loads.set(self.loads.get() + 1);
            Ok(self.rows.clone())
        }
    }

    pub struct UnavailableSource;

    impl RequestSource for UnavailableSource {
        fn load_requests(&self) -> Result<Vec<RawServiceRequest>, source::Error> {
            Err(source::Error::Unavailable("requests.csv".into()))
        }
    }

    #[derive(Default)]
    pub struct MockGeocoder {
        positions: HashMap<String, MapPoint>,
        lookups: Cell<usize>,
    }

    impl MockGeocoder {
        pub fn with_position(mut self, query: &str, pos: MapPoint) -> Self {
            self.positions.insert(query.to_owned(), pos);
            self
        }

        pub fn lookups(&self) -> usize {
            self.lookups.get()
        }
    }

    impl GeoCodingGateway for MockGeocoder {
        fn resolve_address_lat_lng(
            &self,
            query: &str,
        ) -> Result<Option<(f64, f64)>, geocode::Error> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self.positions.get(query).map(|pos| pos.to_lat_lng_deg()))
        }
    }

    #[derive(Default)]
    pub struct MemCacheRepo {
        persisted: RefCell<Option<GeocodeCache>>,
    }

    impl MemCacheRepo {
        pub fn persisted(&self) -> Option<GeocodeCache> {
            self.persisted.borrow().clone()
        }
    }

    impl GeocodeCacheRepo for MemCacheRepo {
        fn load_geocode_cache(&self) -> Result<GeocodeCache, repositories::Error> {
            Ok(self.persisted().unwrap_or_default())
        }

        fn persist_geocode_cache(&self, cache: &GeocodeCache) -> Result<(), repositories::Error> {
            *self.persisted.borrow_mut() = Some(cache.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct CorruptCacheRepo {
        persist_calls: Cell<usize>,
    }

    impl CorruptCacheRepo {
        pub fn persist_calls(&self) -> usize {
            self.persist_calls.get()
        }
    }

    impl GeocodeCacheRepo for CorruptCacheRepo {
        fn load_geocode_cache(&self) -> Result<GeocodeCache, repositories::Error> {
            Err(repositories::Error::Format("expected value at line 1".into()))
        }

        fn persist_geocode_cache(&self, _: &GeocodeCache) -> Result<(), repositories::Error> {
            self.persist_calls.set(self.persist_calls.get() + 1);
            Ok(())
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

    pub struct FailingRenderer;

    impl MapRenderer for FailingRenderer {
        fn render_map(&self, _: &MapView) -> Result<(), render::Error> {
            Err(render::Error::Template("broken".into()))
        }
    }
}
