//! A geocode cache stored in a single JSON file.

use anyhow::Context as _;
use parking_lot::Mutex;
use reqmap_core::{
    entities::{AddressKey, GeocodeEntry, MapPoint},
    geocache::GeocodeCache,
    repositories::{Error as RepoError, GeocodeCacheRepo},
};
use serde::Deserialize as _;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

mod models;

use self::models::{CacheEntry, CacheFile, FORMAT_VERSION};

type Result<T> = std::result::Result<T, RepoError>;

/// Entries that could not be interpreted are written back unchanged,
/// unless the cache has a usable entry for the same key by then.
#[derive(Debug)]
pub struct JsonGeocodeCache {
    path: PathBuf,
    // single writer
    write_lock: Mutex<()>,
    foreign_entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonGeocodeCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            foreign_entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<CacheFile>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let cache_file = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid geocode cache file {}", self.path.display()))?;
        Ok(Some(cache_file))
    }

    fn write_file(&self, cache_file: &CacheFile) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp_file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp_file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, cache_file)
                .context("Failed to serialize the geocode cache")?;
            writer.flush()?;
        }
        tmp_file.as_file().sync_all()?;
        tmp_file.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl GeocodeCacheRepo for JsonGeocodeCache {
    fn load_geocode_cache(&self) -> Result<GeocodeCache> {
        let Some(CacheFile { version, entries }) = self.read_file()? else {
            log::info!(
                "No geocode cache found at {}, starting with an empty cache",
                self.path.display()
            );
            return Ok(GeocodeCache::new());
        };
        if version > FORMAT_VERSION {
            log::warn!(
                "Geocode cache {} has format version {version} (expected {FORMAT_VERSION})",
                self.path.display()
            );
        }
        let total = entries.len();
        let mut foreign_entries = BTreeMap::new();
        let mut cache = GeocodeCache::new();
        for (key, value) in entries {
            match from_cache_entry(&value) {
                Some(entry) => cache.put(AddressKey::from(key), entry),
                None => {
                    log::warn!("Keeping unsupported geocode cache entry '{key}' as is");
                    foreign_entries.insert(key, value);
                }
            }
        }
        cache.mark_persisted();
        log::info!(
            "Loaded {} of {total} geocode cache entries from {}",
            cache.len(),
            self.path.display()
        );
        *self.foreign_entries.lock() = foreign_entries;
        Ok(cache)
    }

    fn persist_geocode_cache(&self, cache: &GeocodeCache) -> Result<()> {
        let mut entries = self.foreign_entries.lock().clone();
        for (key, entry) in cache {
            let value = serde_json::to_value(to_cache_entry(*entry))
                .context("Failed to serialize a geocode cache entry")?;
            entries.insert(key.to_string(), value);
        }
        let cache_file = CacheFile {
            version: FORMAT_VERSION,
            entries,
        };
        let _guard = self.write_lock.lock();
        self.write_file(&cache_file)
    }
}

fn from_cache_entry(value: &Value) -> Option<GeocodeEntry> {
    match CacheEntry::deserialize(value).ok()? {
        CacheEntry::Resolved { lat, lng } => {
            MapPoint::try_from_lat_lng_deg(lat, lng).map(GeocodeEntry::Resolved)
        }
        CacheEntry::Unresolvable => Some(GeocodeEntry::Unresolvable),
        CacheEntry::Unknown => None,
    }
}

fn to_cache_entry(entry: GeocodeEntry) -> CacheEntry {
    match entry {
        GeocodeEntry::Resolved(pos) => {
            let (lat, lng) = pos.to_lat_lng_deg();
            CacheEntry::Resolved { lat, lng }
        }
        GeocodeEntry::Unresolvable => CacheEntry::Unresolvable,
    }
}
