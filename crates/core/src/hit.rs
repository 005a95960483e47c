//! Pointer hit testing against the regions drawn in the last render pass.

use std::collections::HashMap;

use glam::DVec2;

use crate::layout::RenderContext;

/// A trip in one loaded document.
///
/// Handles carry the document generation they were issued for, so a handle
/// kept across a day-type switch resolves to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TripHandle {
    pub generation: u64,
    pub index: usize,
}

/// Circle a vehicle occupied on screen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    pub center: DVec2,
    pub radius: f64,
}

impl HitRegion {
    pub fn contains(&self, point: DVec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// Hit regions per render context, in draw order
#[derive(Clone, Debug, Default)]
pub struct HitRegions {
    by_context: HashMap<RenderContext, Vec<(TripHandle, HitRegion)>>,
}

impl HitRegions {
    /// Forget the previous pass for `context`
    pub fn begin_pass(&mut self, context: RenderContext) {
        self.by_context.entry(context).or_default().clear();
    }

    pub fn record(&mut self, context: RenderContext, trip: TripHandle, region: HitRegion) {
        self.by_context.entry(context).or_default().push((trip, region));
    }

    /// First trip, in draw order, whose region contains `point`
    pub fn resolve(&self, context: RenderContext, point: DVec2) -> Option<TripHandle> {
        self.by_context
            .get(&context)?
            .iter()
            .find(|(_, region)| region.contains(point))
            .map(|(trip, _)| *trip)
    }

    pub fn len(&self, context: RenderContext) -> usize {
        self.by_context.get(&context).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.by_context.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(index: usize) -> TripHandle {
        TripHandle { generation: 1, index }
    }

    fn region(x: f64, y: f64) -> HitRegion {
        HitRegion {
            center: DVec2::new(x, y),
            radius: 22.0,
        }
    }

    #[test]
    fn test_center_always_hits() {
        let mut regions = HitRegions::default();
        regions.record(RenderContext::Main, handle(0), region(100.0, 50.0));

        assert_eq!(
            regions.resolve(RenderContext::Main, DVec2::new(100.0, 50.0)),
            Some(handle(0))
        );
    }

    #[test]
    fn test_boundary() {
        let mut regions = HitRegions::default();
        regions.record(RenderContext::Main, handle(0), region(100.0, 50.0));

        let on_edge = DVec2::new(100.0 + 22.0, 50.0);
        let outside = DVec2::new(100.0 + 22.0 + 1e-6, 50.0);
        let diagonal = DVec2::new(100.0 + 15.0, 50.0 + 16.0); // 15² + 16² = 481 < 484

        assert_eq!(regions.resolve(RenderContext::Main, on_edge), Some(handle(0)));
        assert_eq!(regions.resolve(RenderContext::Main, outside), None);
        assert_eq!(regions.resolve(RenderContext::Main, diagonal), Some(handle(0)));
    }

    #[test]
    fn test_first_in_draw_order_wins() {
        let mut regions = HitRegions::default();
        regions.record(RenderContext::Branch, handle(4), region(100.0, 50.0));
        regions.record(RenderContext::Branch, handle(2), region(110.0, 50.0));

        assert_eq!(
            regions.resolve(RenderContext::Branch, DVec2::new(108.0, 50.0)),
            Some(handle(4))
        );
        assert_eq!(
            regions.resolve(RenderContext::Branch, DVec2::new(125.0, 50.0)),
            Some(handle(2))
        );
    }

    #[test]
    fn test_contexts_are_separate() {
        let mut regions = HitRegions::default();
        regions.record(RenderContext::Main, handle(0), region(100.0, 50.0));

        assert_eq!(regions.resolve(RenderContext::Branch, DVec2::new(100.0, 50.0)), None);
    }

    #[test]
    fn test_new_pass_replaces_regions() {
        let mut regions = HitRegions::default();
        regions.record(RenderContext::Main, handle(0), region(100.0, 50.0));

        regions.begin_pass(RenderContext::Main);
        assert_eq!(regions.len(RenderContext::Main), 0);
        assert_eq!(regions.resolve(RenderContext::Main, DVec2::new(100.0, 50.0)), None);
    }
}
