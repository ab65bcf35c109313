use super::*;
use reqmap_core::{
    gateways::{geocode::GeoCodingGateway, render::MapRenderer, source::RequestSource},
    geocache::GeocodeCache,
    resolver::RateLimitedResolver,
    usecases::{FilterCriteria, PrepareReport, RenderReport, ResolveOptions, ResolveReport},
};
use time::Date;

/// Which requests should appear on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRequest {
    pub date_from: Date,
    pub date_to: Date,
    /// Empty means all categories.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub prepare: PrepareReport,
    /// Requests that passed the filter.
    pub selected: usize,
    /// Whether a previously persisted cache could be loaded.
    /// Otherwise nothing has been persisted during this run.
    pub cache_loaded: bool,
    pub resolve: ResolveReport,
    pub render: RenderReport,
}

/// Loads, prepares, filters, resolves and finally renders service requests.
///
/// Only the source and the renderer are essential. Without a usable
/// geocode cache the run starts from scratch.
pub fn generate_map<S, G, R, M>(
    source: &S,
    resolver: &RateLimitedResolver<G>,
    cache_repo: &R,
    renderer: &M,
    request: &MapRequest,
    options: &ResolveOptions,
) -> Result<RunReport>
where
    S: RequestSource,
    G: GeoCodingGateway,
    R: GeocodeCacheRepo,
    M: MapRenderer,
{
    let criteria = FilterCriteria::try_new(
        request.date_from,
        request.date_to,
        &request.categories,
    )?;

    let rows = source.load_requests()?;
    let (requests, prepare) = usecases::prepare_requests(rows);
    let mut requests = usecases::filter_requests(requests, &criteria);
    let selected = requests.len();

    let (mut cache, cache_loaded) = match cache_repo.load_geocode_cache() {
        Ok(cache) => {
            debug!("Loaded {} geocode cache entries", cache.len());
            (cache, true)
        }
        Err(err) => {
            warn!("Unable to read the geocode cache, new results will not be saved: {err}");
            (GeocodeCache::new(), false)
        }
    };
    // An unreadable cache must not be replaced by the entries of a single run.
    let options = ResolveOptions {
        read_only: options.read_only || !cache_loaded,
        ..options.clone()
    };
    let resolve =
        usecases::resolve_positions(&mut requests, &mut cache, resolver, cache_repo, &options);
    let render = usecases::render_map(renderer, resolver.region(), requests)?;

    let report = RunReport {
        prepare,
        selected,
        cache_loaded,
        resolve,
        render,
    };
    info!(
        "Rendered {} of {} selected requests ({} rows read, {} excluded, {} without position)",
        report.render.rendered,
        report.selected,
        report.prepare.total,
        report.prepare.excluded(),
        report.render.unresolved
    );
    Ok(report)
}
