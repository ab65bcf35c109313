use anyhow::{anyhow, Context, Result};
use reqmap_core::entities::{Distance, MapPoint, PlausibilityRegion};
use reqmap_gateways::csv_source::Columns;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use time::{format_description::FormatItem, macros::format_description, Date};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "reqmap.toml";

const ENV_NAME_GEOCACHE_FILE: &str = "REQMAP_GEOCACHE_FILE";
const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";

const DATE_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day]");

#[derive(Debug)]
pub struct Config {
    pub region: PlausibilityRegion,
    pub geocoding: Geocoding,
    pub cache: Cache,
    pub source: Source,
    pub output: Output,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let mut raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)
                .with_context(|| format!("Invalid configuration file {}", file_path.display()))?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    raw::Config::default()
                }
                _ => return Err(err.into()),
            },
        };
        if let Ok(api_key) = env::var(ENV_NAME_OPENCAGE_API_KEY) {
            raw_config
                .gateway
                .get_or_insert_with(Default::default)
                .opencage
                .get_or_insert_with(Default::default)
                .api_key = Some(api_key);
        }
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(file) = env::var(ENV_NAME_GEOCACHE_FILE) {
            cfg.cache.file = file.into();
        }
        Ok(cfg)
    }
}

#[derive(Debug)]
pub struct Geocoding {
    pub gateway: GeocodingGateway,
    pub min_delay: Duration,
    pub max_retries: u32,
    pub timeout: Duration,
    /// Appended to every address query.
    pub address_suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodingGateway {
    Nominatim { base_url: String, user_agent: String },
    OpenCage { api_key: String },
}

#[derive(Debug)]
pub struct Cache {
    pub file: PathBuf,
    /// Persist after this many new entries, 0 means only at the end.
    pub persist_every: usize,
}

#[derive(Debug)]
pub struct Source {
    pub file: PathBuf,
    pub columns: Columns,
}

#[derive(Debug)]
pub struct Output {
    /// File name with the placeholders `{from}` and `{to}`.
    pub pattern: String,
    pub zoom: u8,
}

impl Output {
    pub fn file_name(&self, date_from: Date, date_to: Date) -> Result<PathBuf> {
        let from = date_from.format(DATE_FORMAT)?;
        let to = date_to.format(DATE_FORMAT)?;
        Ok(self
            .pattern
            .replace("{from}", &from)
            .replace("{to}", &to)
            .into())
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            region,
            geocoding,
            gateway,
            cache,
            source,
            output,
        } = from;

        let default_region = raw::Region::default();
        let raw::Region {
            center,
            max_distance_km,
        } = region.unwrap_or_default();
        let center = center
            .or(default_region.center)
            .ok_or_else(|| anyhow!("Missing region center"))?;
        let center: MapPoint = center
            .parse()
            .with_context(|| format!("Invalid region center '{center}'"))?;
        let max_distance_km = max_distance_km
            .or(default_region.max_distance_km)
            .ok_or_else(|| anyhow!("Missing maximum distance"))?;
        if !(max_distance_km.is_finite() && max_distance_km > 0.0) {
            return Err(anyhow!("Invalid maximum distance: {max_distance_km} km"));
        }
        let region = PlausibilityRegion::new(center, Distance::from_km(max_distance_km));

        let default_geocoding = raw::Geocoding::default();
        let raw::Geocoding {
            gateway: gw_name,
            min_delay,
            max_retries,
            timeout,
            address_suffix,
        } = geocoding.unwrap_or_default();
        let gw_name = gw_name
            .or(default_geocoding.gateway)
            .ok_or_else(|| anyhow!("Missing geocoding gateway"))?;
        let toml_name = toml::Value::try_from(gw_name)?;
        let gateway = gateway.unwrap_or_default();
        let geo_gateway = match gw_name {
            raw::GeocodingGateway::Nominatim => {
                let default_nominatim = raw::Nominatim::default();
                let raw::Nominatim {
                    base_url,
                    user_agent,
                } = gateway.nominatim.unwrap_or_default();
                let base_url = base_url
                    .or(default_nominatim.base_url)
                    .ok_or_else(|| anyhow!("Missing {toml_name} base URL"))?;
                let user_agent = user_agent
                    .or(default_nominatim.user_agent)
                    .filter(|agent| !agent.trim().is_empty())
                    .ok_or_else(|| anyhow!("Missing {toml_name} user agent"))?;
                log::info!("Use Nominatim geocoding gateway ({base_url})");
                GeocodingGateway::Nominatim {
                    base_url,
                    user_agent,
                }
            }
            raw::GeocodingGateway::Opencage => {
                let api_key = gateway
                    .opencage
                    .and_then(|gw| gw.api_key)
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| anyhow!("Missing {toml_name} API key"))?;
                log::info!("Use OpenCage geocoding gateway");
                GeocodingGateway::OpenCage { api_key }
            }
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
            min_delay: min_delay
                .or(default_geocoding.min_delay)
                .unwrap_or_default(),
            max_retries: max_retries
                .or(default_geocoding.max_retries)
                .unwrap_or_default(),
            timeout: timeout
                .or(default_geocoding.timeout)
                .ok_or_else(|| anyhow!("Missing geocoding timeout"))?,
            address_suffix: address_suffix
                .or(default_geocoding.address_suffix)
                .unwrap_or_default(),
        };

        let default_cache = raw::Cache::default();
        let raw::Cache {
            file,
            persist_every,
        } = cache.unwrap_or_default();
        let cache = Cache {
            file: file
                .or(default_cache.file)
                .ok_or_else(|| anyhow!("Missing geocode cache file"))?,
            persist_every: persist_every
                .or(default_cache.persist_every)
                .unwrap_or_default(),
        };

        let default_source = raw::Source::default();
        let raw::Source { file, columns } = source.unwrap_or_default();
        let default_columns = default_source.columns.unwrap_or_default();
        let raw::Columns {
            street,
            house,
            count,
            created_at,
            category,
        } = columns.unwrap_or_default();
        let column = |name: Option<String>, default: Option<String>, key: &str| {
            name.or(default)
                .ok_or_else(|| anyhow!("Missing name of the {key} column"))
        };
        let source = Source {
            file: file
                .or(default_source.file)
                .ok_or_else(|| anyhow!("Missing source file"))?,
            columns: Columns {
                street: column(street, default_columns.street, "street")?,
                house: column(house, default_columns.house, "house")?,
                count: column(count, default_columns.count, "count")?,
                created_at: column(created_at, default_columns.created_at, "created-at")?,
                category: column(category, default_columns.category, "category")?,
            },
        };

        let default_output = raw::Output::default();
        let raw::Output { pattern, zoom } = output.unwrap_or_default();
        let output = Output {
            pattern: pattern
                .or(default_output.pattern)
                .ok_or_else(|| anyhow!("Missing output pattern"))?,
            zoom: zoom
                .or(default_output.zoom)
                .ok_or_else(|| anyhow!("Missing output zoom"))?,
        };

        Ok(Self {
            region,
            geocoding,
            cache,
            source,
            output,
        })
    }
}
