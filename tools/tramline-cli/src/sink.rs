use tracing::debug;
use tramline_core::render::{AxisInstruction, FrameStatus, HitGeometry};
use tramline_core::{DrawInstruction, RenderContext, RenderSink, Viewport};

/// Renders each pass as text lines, keeping only the latest frame
pub struct TextSink {
    viewport: Viewport,
    pending: Vec<String>,
    pub frame: Vec<String>,
    pub status: Option<FrameStatus>,
    pub frames: usize,
}

impl TextSink {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            pending: Vec::new(),
            frame: Vec::new(),
            status: None,
            frames: 0,
        }
    }

    pub fn status_line(&self) -> String {
        match &self.status {
            Some(s) => format!(
                "{} [{}] {} running={} {}",
                s.clock,
                s.day_type.badge(),
                if s.playing { "▶" } else { "⏸" },
                s.running,
                s.status
            ),
            None => String::from("(no frame rendered)"),
        }
    }
}

impl RenderSink for TextSink {
    fn viewport(&self, _context: RenderContext) -> Option<Viewport> {
        Some(self.viewport)
    }

    fn begin_pass(&mut self, context: RenderContext, _viewport: Viewport) {
        if context == RenderContext::Main {
            self.pending.clear();
        }
    }

    fn draw_axis(&mut self, context: RenderContext, axis: &AxisInstruction<'_>) {
        self.pending.push(format!(
            "[{context}] {} axis y={:.0}: {} stations",
            axis.route,
            axis.y,
            axis.stations.len()
        ));
    }

    fn draw_vehicle(&mut self, context: RenderContext, vehicle: &DrawInstruction) -> HitGeometry {
        let place = match &vehicle.station {
            Some(station) if vehicle.major_station => format!("at {station} *"),
            Some(station) => format!("at {station}"),
            None => String::from("running"),
        };
        self.pending.push(format!(
            "[{context}]   {:>6} ({:.1}, {:.1}) {place}",
            vehicle.label, vehicle.position.x, vehicle.position.y
        ));

        HitGeometry {
            center: vehicle.position,
            radius: vehicle.radius,
        }
    }

    fn show_status(&mut self, status: &FrameStatus) {
        self.frames += 1;
        self.frame = std::mem::take(&mut self.pending);
        self.status = Some(status.clone());
        debug!(clock = %status.clock, running = status.running, "frame");
    }
}
