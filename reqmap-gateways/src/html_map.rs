use askama::Template;
use itertools::Itertools;
use reqmap_core::{
    entities::*,
    gateways::render::{Error, MapRenderer, MapView},
};
use serde::Serialize;
use std::{fs, path::PathBuf};
use time::{format_description::FormatItem, macros::format_description};

const DATE_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day]");

pub const DEFAULT_ZOOM: u8 = 13;

/// Renders a standalone HTML page with a Leaflet map.
///
/// The page shows a heat layer weighted by the request counts
/// and one clustered marker layer per category.
#[derive(Debug, Clone)]
pub struct HtmlMap {
    path: PathBuf,
    title: String,
    zoom: u8,
}

impl HtmlMap {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            title: "Service requests".into(),
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapTemplate<'a> {
    title: &'a str,
    data_json: String,
}

#[derive(Debug, Serialize)]
struct MapData<'a> {
    center: [f64; 2],
    zoom: u8,
    bounds: Option<[[f64; 2]; 2]>,
    categories: Vec<&'a str>,
    markers: Vec<Marker<'a>>,
}

#[derive(Debug, Serialize)]
struct Marker<'a> {
    lat: f64,
    lng: f64,
    street: &'a str,
    house: &'a str,
    category: &'a str,
    count: u64,
    date: String,
}

fn lat_lng(pos: MapPoint) -> [f64; 2] {
    let (lat, lng) = pos.to_lat_lng_deg();
    [lat, lng]
}

fn map_data<'a>(view: &MapView<'a>, zoom: u8) -> Result<MapData<'a>, Error> {
    let markers = view
        .requests
        .iter()
        .map(|req| {
            let [lat, lng] = lat_lng(req.pos);
            let date = req
                .created_at
                .format(DATE_FORMAT)
                .map_err(|err| Error::Template(err.to_string()))?;
            Ok(Marker {
                lat,
                lng,
                street: &req.address.street,
                house: &req.address.house,
                category: &req.category,
                count: req.count,
                date,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let categories = view
        .requests
        .iter()
        .map(|req| req.category.as_str())
        .unique()
        .sorted()
        .collect();
    Ok(MapData {
        center: lat_lng(view.center),
        zoom,
        bounds: view
            .bbox
            .map(|bbox| [lat_lng(bbox.south_west()), lat_lng(bbox.north_east())]),
        categories,
        markers,
    })
}

/// Serialized data that can be embedded into a `<script>` element.
fn script_json<T: Serialize>(data: &T) -> Result<String, Error> {
    let json = serde_json::to_string(data).map_err(|err| Error::Template(err.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}

impl MapRenderer for HtmlMap {
    fn render_map(&self, view: &MapView) -> Result<(), Error> {
        let data = map_data(view, self.zoom)?;
        let html = MapTemplate {
            title: &self.title,
            data_json: script_json(&data)?,
        }
        .render()
        .map_err(|err| Error::Template(err.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, html)?;
        log::info!(
            "Rendered {} requests into {}",
            view.requests.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn located(street: &str, category: &str, lat: f64, lng: f64) -> LocatedRequest {
        LocatedRequest {
            address: Address::new(street, "1"),
            category: category.into(),
            created_at: datetime!(2025-06-01 10:30),
            count: 2,
            pos: MapPoint::from_lat_lng_deg(lat, lng),
        }
    }

    #[test]
    fn render_page_with_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("map.html");
        let requests = vec![
            located("Ленина", "water", 55.84, 48.50),
            located("Мира", "heating", 55.85, 48.51),
        ];
        let view = MapView {
            center: MapPoint::from_lat_lng_deg(55.8437, 48.5066),
            bbox: MapBbox::enclosing(requests.iter().map(|r| r.pos)),
            requests: &requests,
        };
        HtmlMap::new(&path)
            .with_title("Requests & more")
            .render_map(&view)
            .unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<title>Requests &amp; more</title>"));
        assert!(html.contains("\"street\":\"Ленина\""));
        assert!(html.contains("\"categories\":[\"heating\",\"water\"]"));
        assert!(html.contains("\"date\":\"2025-06-01\""));
        assert!(html.contains("leaflet-heat"));
    }

    #[test]
    fn page_with_overview_controls_and_hidden_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let requests = vec![located("Ленина", "water", 55.84, 48.50)];
        let view = MapView {
            center: MapPoint::from_lat_lng_deg(55.8437, 48.5066),
            bbox: MapBbox::enclosing(requests.iter().map(|r| r.pos)),
            requests: &requests,
        };
        HtmlMap::new(&path).render_map(&view).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("leaflet-minimap"));
        assert!(html.contains("toggleDisplay: true"));
        assert!(html.contains("leaflet-fullscreen"));
        assert!(html.contains("L.control.fullscreen("));
        assert!(html.contains("L.control.layers(null, overlays"));
        assert!(!html.contains("cluster.addTo(map)"));
        assert!(!html.contains("...data.markers"));
    }

    #[test]
    fn render_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.html");
        let view = MapView {
            center: MapPoint::from_lat_lng_deg(55.8437, 48.5066),
            bbox: None,
            requests: &[],
        };
        HtmlMap::new(&path).render_map(&view).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("\"bounds\":null"));
        assert!(html.contains("\"markers\":[]"));
    }

    #[test]
    fn embedded_data_cannot_close_the_script_element() {
        let requests = vec![located("</script><b>", "x", 55.84, 48.50)];
        let view = MapView {
            center: MapPoint::from_lat_lng_deg(55.8437, 48.5066),
            bbox: None,
            requests: &requests,
        };
        let json = script_json(&map_data(&view, DEFAULT_ZOOM).unwrap()).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("<\\/script><b>"));
    }
}
