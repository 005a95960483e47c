//! Lane geometry for the two render contexts.

use tramline_transit::{Axis, AxisKind, RouteFamily};

use crate::config::LayoutConfig;

/// A drawing surface with its own coordinate space and hit regions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RenderContext {
    /// One lane on the main axis
    Main,
    /// Upper lane for outbound and lower lane for inbound branch trips
    Branch,
}

impl RenderContext {
    pub fn routes(self) -> &'static [RouteFamily] {
        match self {
            Self::Main => &[RouteFamily::Main],
            Self::Branch => &[RouteFamily::BranchUp, RouteFamily::BranchDown],
        }
    }

    pub fn axis(self) -> AxisKind {
        match self {
            Self::Main => AxisKind::Main,
            Self::Branch => AxisKind::Branch,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// One horizontal axis line plus the row its vehicles are drawn on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lane {
    pub route: RouteFamily,
    pub x0: f64,
    pub x1: f64,
    pub axis_y: f64,
    pub row_y: f64,
}

impl Lane {
    /// Horizontal position of `axis_index` on `axis`
    pub fn x(&self, axis: &Axis, axis_index: f64) -> f64 {
        self.x0 + (self.x1 - self.x0) * axis.fraction(axis_index)
    }
}

pub fn lanes(context: RenderContext, viewport: Viewport, layout: &LayoutConfig) -> Vec<Lane> {
    let x0 = layout.margin;
    let x1 = viewport.width - layout.margin;
    let mid = (viewport.height * layout.axis_height_ratio).round();

    let lane = |route, axis_y: f64| Lane {
        route,
        x0,
        x1,
        axis_y,
        row_y: axis_y - layout.row_offset,
    };

    match context {
        RenderContext::Main => vec![lane(RouteFamily::Main, mid)],
        RenderContext::Branch => vec![
            lane(RouteFamily::BranchUp, mid - layout.branch_lane_gap),
            lane(RouteFamily::BranchDown, mid + layout.branch_lane_gap),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tramline_transit::StationIdentifier;

    #[test]
    fn test_main_lane() {
        let lanes = lanes(RenderContext::Main, Viewport::new(1000.0, 300.0), &LayoutConfig::default());

        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].route, RouteFamily::Main);
        assert_eq!(lanes[0].x0, 80.0);
        assert_eq!(lanes[0].x1, 920.0);
        assert_eq!(lanes[0].axis_y, 174.0);
        assert_eq!(lanes[0].row_y, 134.0);
    }

    #[test]
    fn test_branch_lanes() {
        let lanes = lanes(RenderContext::Branch, Viewport::new(800.0, 400.0), &LayoutConfig::default());

        assert_eq!(lanes.len(), 2);
        assert_eq!(lanes[0].route, RouteFamily::BranchUp);
        assert_eq!(lanes[0].axis_y, 232.0 - 52.0);
        assert_eq!(lanes[1].route, RouteFamily::BranchDown);
        assert_eq!(lanes[1].axis_y, 232.0 + 52.0);
        assert_eq!(lanes[1].row_y, 232.0 + 52.0 - 40.0);
    }

    #[test]
    fn test_lane_x() {
        let axis = Axis::new(
            AxisKind::Main,
            ["a", "b", "c"].into_iter().map(StationIdentifier::new).collect(),
        )
        .unwrap();
        let lane = lanes(RenderContext::Main, Viewport::new(1000.0, 300.0), &LayoutConfig::default())[0];

        assert_eq!(lane.x(&axis, 0.0), 80.0);
        assert_eq!(lane.x(&axis, 1.0), 500.0);
        assert_eq!(lane.x(&axis, 1.5), 710.0);
        assert_eq!(lane.x(&axis, 2.0), 920.0);
    }

    #[test]
    fn test_context_routes() {
        assert_eq!(RenderContext::Branch.routes().len(), 2);
        assert_eq!(RenderContext::Main.axis(), AxisKind::Main);
        assert_eq!("branch".parse::<RenderContext>().unwrap(), RenderContext::Branch);
    }
}
