//! Frame pipeline: interpolate every trip, stack, hand draw instructions to
//! the sink and record where each vehicle ended up.
//!
//! Every pass recomputes all vehicle states from the current clock.

use std::sync::Arc;

use glam::DVec2;
use strum::IntoEnumIterator;
use tramline_transit::{DayType, RouteFamily, StationIdentifier, locate};

use crate::config::LayoutConfig;
use crate::hit::{HitRegion, TripHandle};
use crate::inspect::format_clock;
use crate::layout::{RenderContext, Viewport, lanes};
use crate::stacking::{MajorStations, StackingResolver};
use crate::state::EngineState;

/// An axis line with station ticks
#[derive(Clone, Debug)]
pub struct AxisInstruction<'a> {
    pub route: RouteFamily,
    pub stations: &'a [StationIdentifier],
    pub x0: f64,
    pub x1: f64,
    pub y: f64,
    pub major: &'a MajorStations,
}

/// One vehicle glyph
#[derive(Clone, Debug, PartialEq)]
pub struct DrawInstruction {
    pub trip: TripHandle,
    pub position: DVec2,
    pub radius: f64,
    pub label: String,
    pub color: Option<Arc<str>>,
    pub stopped: bool,
    /// Station name when stopped
    pub station: Option<StationIdentifier>,
    pub major_station: bool,
}

/// What the sink actually drew, used for hit testing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitGeometry {
    pub center: DVec2,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameStatus {
    pub clock: String,
    pub running: usize,
    pub day_type: DayType,
    pub playing: bool,
    /// Legend, or the last load failure
    pub status: String,
}

/// Pixel output. Implementations own the actual drawing surfaces.
pub trait RenderSink {
    /// `None` when the context has no surface; it is skipped
    fn viewport(&self, context: RenderContext) -> Option<Viewport>;

    fn begin_pass(&mut self, _context: RenderContext, _viewport: Viewport) {}

    fn draw_axis(&mut self, _context: RenderContext, _axis: &AxisInstruction<'_>) {}

    fn draw_vehicle(&mut self, context: RenderContext, vehicle: &DrawInstruction) -> HitGeometry;

    fn show_status(&mut self, _status: &FrameStatus) {}
}

/// Run one full render pass over every context. Returns the number of
/// vehicles drawn.
pub fn render_frame(state: &mut EngineState, layout: &LayoutConfig, sink: &mut dyn RenderSink) -> usize {
    let mut running = 0;

    if let Some(document) = state.document().cloned() {
        let now = state.clock().now();
        let generation = state.generation();

        for context in RenderContext::iter() {
            state.hit_regions.begin_pass(context);
            let Some(viewport) = sink.viewport(context) else {
                continue;
            };
            sink.begin_pass(context, viewport);

            let Some(axis) = document.axis(context.axis()) else {
                continue;
            };

            let mut stacking = StackingResolver::new(&state.major, layout.stack_gap);
            for (lane_index, lane) in lanes(context, viewport, layout).iter().enumerate() {
                sink.draw_axis(
                    context,
                    &AxisInstruction {
                        route: lane.route,
                        stations: axis.stations(),
                        x0: lane.x0,
                        x1: lane.x1,
                        y: lane.axis_y,
                        major: &state.major,
                    },
                );

                for (index, trip) in document.trips_on(lane.route) {
                    let vehicle = locate(trip, now);
                    let Some(axis_index) = vehicle.axis_index() else {
                        continue;
                    };

                    let offset = stacking.offset(lane_index, &vehicle);
                    let station = vehicle.stopped_at().cloned();
                    let instruction = DrawInstruction {
                        trip: TripHandle { generation, index },
                        position: DVec2::new(lane.x(axis, axis_index), lane.row_y - offset),
                        radius: layout.vehicle_radius,
                        label: trip.display_label().to_string(),
                        color: trip.color.clone(),
                        stopped: station.is_some(),
                        major_station: station.as_ref().is_some_and(|s| state.major.contains(s)),
                        station,
                    };

                    let drawn = sink.draw_vehicle(context, &instruction);
                    state.hit_regions.record(
                        context,
                        instruction.trip,
                        HitRegion {
                            center: drawn.center,
                            radius: drawn.radius + layout.hit_padding,
                        },
                    );
                    running += 1;
                }
            }
        }
    }

    state.set_running_count(running);
    sink.show_status(&FrameStatus {
        clock: format_clock(state.now()),
        running,
        day_type: state.day_type(),
        playing: state.clock().is_running(),
        status: state.status().text(),
    });
    running
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::state::Control;
    use crate::state::tests::{WEEKDAY, document, wall};

    /// Records everything it is asked to draw
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub viewport: Option<Viewport>,
        pub vehicles: Vec<(RenderContext, DrawInstruction)>,
        pub axes: Vec<(RenderContext, RouteFamily, f64)>,
        pub statuses: Vec<FrameStatus>,
        pub passes: usize,
    }

    impl RecordingSink {
        pub(crate) fn new() -> Self {
            Self {
                viewport: Some(Viewport::new(1000.0, 300.0)),
                ..Self::default()
            }
        }

        pub(crate) fn labels(&self) -> Vec<&str> {
            self.vehicles.iter().map(|(_, v)| v.label.as_str()).collect()
        }
    }

    impl RenderSink for RecordingSink {
        fn viewport(&self, _context: RenderContext) -> Option<Viewport> {
            self.viewport
        }

        fn begin_pass(&mut self, context: RenderContext, _viewport: Viewport) {
            if context == RenderContext::Main {
                self.passes += 1;
                self.vehicles.clear();
                self.axes.clear();
            }
        }

        fn draw_axis(&mut self, context: RenderContext, axis: &AxisInstruction<'_>) {
            self.axes.push((context, axis.route, axis.y));
        }

        fn draw_vehicle(&mut self, context: RenderContext, vehicle: &DrawInstruction) -> HitGeometry {
            self.vehicles.push((context, vehicle.clone()));
            HitGeometry {
                center: vehicle.position,
                radius: vehicle.radius,
            }
        }

        fn show_status(&mut self, status: &FrameStatus) {
            self.statuses.push(status.clone());
        }
    }

    const STACKED: &str = r#"{
        "meta": {
            "axisStations": { "main": ["伊野", "鏡川橋", "はりまや橋", "菜園場町"], "branch": [] }
        },
        "trips": [
            { "label": "A", "route": "main", "stops": [ { "station": "はりまや橋", "arrSec": 30000, "depSec": 30100, "axisIndex": 2 } ] },
            { "label": "B", "route": "main", "stops": [ { "station": "はりまや橋", "arrSec": 29950, "depSec": 30050, "axisIndex": 2 } ] },
            { "label": "X", "route": "branch_up", "stops": [ { "station": "はりまや橋", "arrSec": 29950, "depSec": 30050, "axisIndex": 1 } ] },
            { "label": "C", "route": "main", "stops": [ { "station": "はりまや橋", "arrSec": 30000, "depSec": 30000, "axisIndex": 2 } ] },
            { "label": "D", "route": "main", "stops": [ { "station": "菜園場町", "arrSec": 29000, "depSec": 31000, "axisIndex": 3 } ] }
        ]
    }"#;

    fn state_with(json: &str) -> EngineState {
        let mut state = EngineState::new(&EngineConfig::default(), &wall()).unwrap();
        let request = state.begin_load();
        state.install(request, document(tramline_transit::DayType::Weekday, json), &wall());
        state
    }

    #[test]
    fn test_renders_active_vehicles() {
        let mut state = state_with(WEEKDAY);
        state.apply(Control::Skip(150.0), &wall()).unwrap(); // 30150
        let mut sink = RecordingSink::new();

        let running = render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        assert_eq!(running, 2);
        assert_eq!(state.running_count(), 2);
        let (context, main) = &sink.vehicles[0];
        assert_eq!(*context, RenderContext::Main);
        assert_eq!(main.label, "1");
        assert!(main.stopped);
        assert_eq!(main.station.as_ref().map(|s| s.as_str()), Some("鏡川橋"));
        assert!(main.major_station);
        assert_eq!(main.position, DVec2::new(500.0, 134.0));

        let (context, branch) = &sink.vehicles[1];
        assert_eq!(*context, RenderContext::Branch);
        assert!(!branch.stopped);
        // 150 of 400 seconds into the leg from index 0 to 2
        assert_eq!(branch.position.x, 80.0 + 840.0 * (0.75 / 2.0));

        let status = sink.statuses.last().unwrap();
        assert_eq!(status.clock, "08:22:30");
        assert_eq!(status.running, 2);
        assert_eq!(status.status, "main:伊野線");
    }

    #[test]
    fn test_branch_draws_two_axes() {
        let mut state = state_with(WEEKDAY);
        let mut sink = RecordingSink::new();
        render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        let branch: Vec<_> = sink
            .axes
            .iter()
            .filter(|(c, _, _)| *c == RenderContext::Branch)
            .map(|(_, route, _)| *route)
            .collect();
        assert_eq!(branch, vec![RouteFamily::BranchUp, RouteFamily::BranchDown]);
    }

    #[test]
    fn test_stacking_at_major_station() {
        let mut state = state_with(STACKED);
        let mut sink = RecordingSink::new();
        render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        // The branch axis is empty, so X is never drawn
        assert_eq!(sink.labels(), vec!["A", "B", "C", "D"]);

        let y: Vec<_> = sink.vehicles.iter().map(|(_, v)| v.position.y).collect();
        assert_eq!(y, vec![134.0, 134.0 - 28.0, 134.0 - 56.0, 134.0]);
    }

    #[test]
    fn test_stacking_resets_every_pass() {
        let mut state = state_with(STACKED);
        let mut sink = RecordingSink::new();

        render_frame(&mut state, &LayoutConfig::default(), &mut sink);
        render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        let y: Vec<_> = sink.vehicles.iter().map(|(_, v)| v.position.y).collect();
        assert_eq!(y, vec![134.0, 106.0, 78.0, 134.0]);
        assert_eq!(sink.passes, 2);
    }

    #[test]
    fn test_hit_regions_follow_render() {
        let mut state = state_with(STACKED);
        let mut sink = RecordingSink::new();
        render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        let (_, b) = &sink.vehicles[1];
        let picked = state.pick(RenderContext::Main, b.position).unwrap();
        assert_eq!(state.trip(picked).unwrap().display_label(), "B");

        // Radius is the drawn radius plus padding
        let just_inside = b.position + DVec2::new(-21.9, 0.0);
        assert_eq!(state.pick(RenderContext::Main, just_inside), Some(picked));
        assert_eq!(state.pick(RenderContext::Main, DVec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_missing_viewport_is_skipped() {
        let mut state = state_with(WEEKDAY);
        let mut sink = RecordingSink {
            viewport: None,
            ..RecordingSink::default()
        };

        assert_eq!(render_frame(&mut state, &LayoutConfig::default(), &mut sink), 0);
        assert!(sink.vehicles.is_empty());
        assert_eq!(sink.statuses.len(), 1);
    }

    #[test]
    fn test_lost_viewport_drops_hit_regions() {
        let mut state = state_with(STACKED);
        let mut sink = RecordingSink::new();
        render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        let (_, a) = &sink.vehicles[0];
        let position = a.position;
        assert!(state.pick(RenderContext::Main, position).is_some());

        sink.viewport = None;
        render_frame(&mut state, &LayoutConfig::default(), &mut sink);

        assert_eq!(state.pick(RenderContext::Main, position), None);
        assert_eq!(state.hit_regions().len(RenderContext::Main), 0);
    }

    #[test]
    fn test_without_document_only_status() {
        let mut state = EngineState::new(&EngineConfig::default(), &wall()).unwrap();
        let mut sink = RecordingSink::new();

        assert_eq!(render_frame(&mut state, &LayoutConfig::default(), &mut sink), 0);
        assert!(sink.axes.is_empty());
        assert_eq!(sink.statuses.len(), 1);
    }
}
