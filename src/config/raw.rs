use duration_str::deserialize_option_duration;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

const DEFAULT_CONFIG_FILE: &str = include_str!("reqmap.default.toml");

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub region: Option<Region>,
    pub geocoding: Option<Geocoding>,
    pub gateway: Option<Gateway>,
    pub cache: Option<Cache>,
    pub source: Option<Source>,
    pub output: Option<Output>,
}

impl Config {
    pub fn embedded_default() -> Self {
        toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Region {
    pub center: Option<String>,
    pub max_distance_km: Option<f64>,
}

impl Default for Region {
    fn default() -> Self {
        Config::embedded_default()
            .region
            .expect("Region configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub min_delay: Option<Duration>,
    pub max_retries: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
    pub address_suffix: Option<String>,
}

impl Default for Geocoding {
    fn default() -> Self {
        Config::embedded_default()
            .geocoding
            .expect("Geocoding configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeocodingGateway {
    Nominatim,
    Opencage,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub nominatim: Option<Nominatim>,
    pub opencage: Option<OpenCage>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Nominatim {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for Nominatim {
    fn default() -> Self {
        Config::embedded_default()
            .gateway
            .and_then(|gw| gw.nominatim)
            .expect("Nominatim configuration")
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenCage {
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cache {
    pub file: Option<PathBuf>,
    pub persist_every: Option<usize>,
}

impl Default for Cache {
    fn default() -> Self {
        Config::embedded_default().cache.expect("Cache configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Source {
    pub file: Option<PathBuf>,
    pub columns: Option<Columns>,
}

impl Default for Source {
    fn default() -> Self {
        Config::embedded_default()
            .source
            .expect("Source configuration")
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Columns {
    pub street: Option<String>,
    pub house: Option<String>,
    pub count: Option<String>,
    pub created_at: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Output {
    pub pattern: Option<String>,
    pub zoom: Option<u8>,
}

impl Default for Output {
    fn default() -> Self {
        Config::embedded_default()
            .output
            .expect("Output configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.region.is_some());
        assert!(cfg.geocoding.is_some());
        assert!(cfg.gateway.is_some());
        assert!(cfg.cache.is_some());
        assert!(cfg.source.is_some());
        assert!(cfg.output.is_some());
    }

    #[test]
    fn default_geocoding_config() {
        let cfg = Geocoding::default();
        assert_eq!(Some(GeocodingGateway::Nominatim), cfg.gateway);
        assert_eq!(Some(Duration::from_secs(1)), cfg.min_delay);
        assert_eq!(Some(Duration::from_secs(10)), cfg.timeout);
        assert_eq!(Some(2), cfg.max_retries);
        assert!(cfg.address_suffix.is_some());
    }

    #[test]
    fn default_source_columns() {
        let columns = Source::default().columns.unwrap();
        assert_eq!(Some("Улица"), columns.street.as_deref());
        assert_eq!(Some("Дом"), columns.house.as_deref());
        assert_eq!(Some("Всего"), columns.count.as_deref());
        assert_eq!(Some("created_at"), columns.created_at.as_deref());
        assert_eq!(Some("category"), columns.category.as_deref());
    }

    #[test]
    fn parse_full_config_example_from_file() {
        let cfg_string = fs::read_to_string("src/config/reqmap.full-example.toml").unwrap();
        let cfg: Config = toml::from_str(&cfg_string).unwrap();
        let geocoding = cfg.geocoding.unwrap();
        assert_eq!(Some(GeocodingGateway::Opencage), geocoding.gateway);
        assert_eq!(Some(Duration::from_millis(1500)), geocoding.min_delay);
    }

    #[test]
    fn omitted_durations_are_none() {
        let cfg: Config = toml::from_str("[geocoding]\ngateway = \"opencage\"\n").unwrap();
        let geocoding = cfg.geocoding.unwrap();
        assert!(geocoding.min_delay.is_none());
        assert!(geocoding.timeout.is_none());
    }
}
