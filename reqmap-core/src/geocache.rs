use crate::entities::*;
use std::collections::{hash_map, HashMap};

/// In-memory mapping of address keys to durable geocoding results.
///
/// Entries never expire. The cache is loaded at the start of a run,
/// mutated while resolving addresses and persisted afterwards.
#[derive(Debug, Clone, Default)]
pub struct GeocodeCache {
    entries: HashMap<AddressKey, GeocodeEntry>,
    // Entries written since the last call to `mark_persisted()`.
    unpersisted: usize,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &AddressKey) -> CacheLookup {
        self.entries.get(key).copied().into()
    }

    /// Inserts or overwrites an entry.
    pub fn put(&mut self, key: AddressKey, entry: GeocodeEntry) {
        if self.entries.insert(key, entry) != Some(entry) {
            self.unpersisted += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, AddressKey, GeocodeEntry> {
        self.entries.iter()
    }

    pub fn unpersisted_changes(&self) -> usize {
        self.unpersisted
    }

    pub fn mark_persisted(&mut self) {
        self.unpersisted = 0;
    }
}

// Only the entries matter, not their persistence state.
impl PartialEq for GeocodeCache {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(AddressKey, GeocodeEntry)> for GeocodeCache {
    fn from_iter<T: IntoIterator<Item = (AddressKey, GeocodeEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            unpersisted: 0,
        }
    }
}

impl<'a> IntoIterator for &'a GeocodeCache {
    type Item = (&'a AddressKey, &'a GeocodeEntry);
    type IntoIter = hash_map::Iter<'a, AddressKey, GeocodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_distinguishes_missing_from_unresolvable() {
        let mut cache = GeocodeCache::new();
        let key = AddressKey::new("A", "1");
        assert_eq!(CacheLookup::Missing, cache.get(&key));
        cache.put(key.clone(), GeocodeEntry::Unresolvable);
        assert_eq!(CacheLookup::Unresolvable, cache.get(&key));
        let pos = MapPoint::from_lat_lng_deg(55.8, 48.5);
        cache.put(key.clone(), GeocodeEntry::Resolved(pos));
        assert_eq!(CacheLookup::Resolved(pos), cache.get(&key));
        assert_eq!(1, cache.len());
    }

    #[test]
    fn track_unpersisted_changes() {
        let mut cache = GeocodeCache::new();
        let key = AddressKey::new("A", "1");
        cache.put(key.clone(), GeocodeEntry::Unresolvable);
        // unchanged
        cache.put(key, GeocodeEntry::Unresolvable);
        cache.put(AddressKey::new("B", "2"), GeocodeEntry::Unresolvable);
        assert_eq!(2, cache.unpersisted_changes());
        cache.mark_persisted();
        assert_eq!(0, cache.unpersisted_changes());
    }

    #[test]
    fn collected_caches_have_no_unpersisted_changes() {
        let cache: GeocodeCache = vec![(AddressKey::new("A", "1"), GeocodeEntry::Unresolvable)]
            .into_iter()
            .collect();
        assert_eq!(1, cache.len());
        assert_eq!(0, cache.unpersisted_changes());
    }
}
