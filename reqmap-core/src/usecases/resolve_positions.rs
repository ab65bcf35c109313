use super::prelude::*;
use crate::{
    gateways::geocode::GeoCodingGateway,
    geocache::GeocodeCache,
    resolver::{RateLimitedResolver, Resolution},
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Appended to every address, e.g. the city and the country.
    pub locality: String,
    /// Persist the cache after this many new entries (0 = only at the end).
    pub persist_every: usize,
    /// Never persist the cache, e.g. if the persisted cache could not be read.
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub distinct_addresses: usize,
    pub cache_hits: usize,
    pub lookups: usize,
    pub resolved: usize,
    pub out_of_region: usize,
    pub not_found: usize,
    pub transient_failures: usize,
    /// Cached positions that are not inside of the current region.
    pub cached_out_of_region: usize,
    pub persist_failures: usize,
    /// Whether all cache entries have been persisted.
    pub persisted: bool,
}

/// Assigns a position to each request.
///
/// Every distinct address is looked up at most once: cached results
/// are reused and only cache misses are sent to the resolver. Durable
/// results are written into the cache, transient failures are not.
/// Requests that could not be resolved keep `pos == None`.
///
/// A failure to persist the cache is logged and reported, but does
/// not prevent the positions from being assigned.
pub fn resolve_positions<G, R>(
    requests: &mut [ServiceRequest],
    cache: &mut GeocodeCache,
    resolver: &RateLimitedResolver<G>,
    repo: &R,
    options: &ResolveOptions,
) -> ResolveReport
where
    G: GeoCodingGateway,
    R: GeocodeCacheRepo,
{
    let mut report = ResolveReport::default();
    let mut positions: HashMap<AddressKey, Option<MapPoint>> = HashMap::new();
    let region = resolver.region();

    for req in requests.iter() {
        let key = req.address_key();
        if positions.contains_key(&key) {
            continue;
        }
        report.distinct_addresses += 1;
        let pos = match cache.get(&key) {
            CacheLookup::Resolved(pos) => {
                report.cache_hits += 1;
                if region.contains(pos) {
                    Some(pos)
                } else {
                    log::debug!("Ignoring cached position {pos} of '{key}' outside of the region");
                    report.cached_out_of_region += 1;
                    None
                }
            }
            CacheLookup::Unresolvable => {
                report.cache_hits += 1;
                None
            }
            CacheLookup::Missing => {
                let query = req.address.to_query_string(&options.locality);
                report.lookups += 1;
                let resolution = resolver.resolve(&query);
                match resolution {
                    Resolution::Resolved(_) => report.resolved += 1,
                    Resolution::OutOfRegion { .. } => report.out_of_region += 1,
                    Resolution::NotFound => report.not_found += 1,
                    Resolution::Failed(_) => report.transient_failures += 1,
                }
                if let Some(entry) = resolution.durable_entry() {
                    cache.put(key.clone(), entry);
                    if !options.read_only
                        && options.persist_every > 0
                        && cache.unpersisted_changes() >= options.persist_every
                    {
                        persist(cache, repo, &mut report);
                    }
                }
                resolution.pos()
            }
        };
        positions.insert(key, pos);
    }

    for req in requests.iter_mut() {
        req.pos = positions.get(&req.address_key()).copied().flatten();
    }

    if options.read_only {
        log::debug!(
            "Keeping {} new geocode cache entries in memory only",
            cache.unpersisted_changes()
        );
    } else if cache.unpersisted_changes() > 0 {
        persist(cache, repo, &mut report);
    }
    report.persisted = cache.unpersisted_changes() == 0;

    log::info!(
        "Resolved {} distinct addresses: {} from cache, {} looked up",
        report.distinct_addresses,
        report.cache_hits,
        report.lookups
    );
    log::info!(
        "Lookups: {} resolved, {} out of region, {} not found, {} failed",
        report.resolved,
        report.out_of_region,
        report.not_found,
        report.transient_failures
    );
    report
}

fn persist<R: GeocodeCacheRepo>(cache: &mut GeocodeCache, repo: &R, report: &mut ResolveReport) {
    match repo.persist_geocode_cache(cache) {
        Ok(()) => {
            log::debug!("Persisted {} geocode cache entries", cache.len());
            cache.mark_persisted();
        }
        Err(err) => {
            report.persist_failures += 1;
            log::error!("Failed to persist the geocode cache: {err}");
        }
    }
}
