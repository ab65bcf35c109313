use super::prelude::*;
use crate::gateways::render::{MapRenderer, MapView};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: usize,
    /// Requests without a plausible position.
    pub unresolved: usize,
}

/// Hands all requests with a plausible position over to the renderer.
pub fn render_map<M>(
    renderer: &M,
    region: &PlausibilityRegion,
    requests: Vec<ServiceRequest>,
) -> Result<RenderReport>
where
    M: MapRenderer,
{
    let total = requests.len();
    let located: Vec<_> = requests
        .into_iter()
        .filter_map(ServiceRequest::into_located)
        .filter(|req| region.contains(req.pos))
        .collect();
    let report = RenderReport {
        rendered: located.len(),
        unresolved: total - located.len(),
    };
    let view = MapView {
        center: region.center,
        bbox: MapBbox::enclosing(located.iter().map(|req| req.pos)),
        requests: &located,
    };
    renderer.render_map(&view)?;
    Ok(report)
}
