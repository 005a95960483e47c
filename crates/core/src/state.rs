//! Everything the engine knows between events.
//!
//! There is exactly one [`EngineState`] per engine. Time changes go through
//! its [`SimulationClock`]; the schedule is swapped wholesale through
//! [`EngineState::install`].

use std::sync::Arc;

use glam::DVec2;
use tracing::{debug, info, warn};
use tramline_transit::{DayType, DayTypeCalendar, ScheduleDocument, ServiceWindow, Trip};

use crate::clock::{SimulationClock, WallClock};
use crate::config::EngineConfig;
use crate::error::{ConfigurationError, EngineError, LoadFailure};
use crate::hit::{HitRegions, TripHandle};
use crate::inspect::TripDetail;
use crate::layout::RenderContext;
use crate::stacking::MajorStations;

/// User-facing commands; each is a no-op when its preconditions are unmet
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    TogglePlay,
    JumpToNow,
    JumpToServiceStart,
    Skip(f64),
    SetSpeed(f64),
    SwitchDayType(DayType),
}

/// What the caller has to do after a command was applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Render,
    Load(DayType),
}

/// Text shown in the legend / status area
#[derive(Clone, Debug, PartialEq)]
pub enum StatusLine {
    Legend(String),
    LoadFailed(LoadFailure),
}

impl StatusLine {
    pub fn text(&self) -> String {
        match self {
            Self::Legend(text) => text.clone(),
            Self::LoadFailed(failure) => failure.to_string(),
        }
    }
}

pub struct EngineState {
    document: Option<Arc<ScheduleDocument>>,
    generation: u64,
    clock: SimulationClock,
    pub(crate) hit_regions: HitRegions,
    pub(crate) major: MajorStations,
    calendar: DayTypeCalendar,
    day_type: DayType,
    status: StatusLine,
    running_count: usize,

    latest_request: u64,
    installed_request: u64,
}

impl EngineState {
    pub fn new(config: &EngineConfig, wall: &dyn WallClock) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let mut clock = SimulationClock::new(
            ServiceWindow::default(),
            config.base_speed,
            config.speed_multiplier,
        )?;
        clock.set_running(config.start_playing);

        let calendar = config.calendar();
        let day_type = config
            .day_type
            .unwrap_or_else(|| calendar.day_type_on(wall.today()));

        Ok(Self {
            document: None,
            generation: 0,
            clock,
            hit_regions: HitRegions::default(),
            major: MajorStations::new(&config.major_stations, &config.normalizer()),
            calendar,
            day_type,
            status: StatusLine::Legend(String::new()),
            running_count: 0,
            latest_request: 0,
            installed_request: 0,
        })
    }

    pub fn document(&self) -> Option<&Arc<ScheduleDocument>> {
        self.document.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// The day type selected last, whether or not its document has loaded
    pub fn day_type(&self) -> DayType {
        self.day_type
    }

    pub fn calendar(&self) -> &DayTypeCalendar {
        &self.calendar
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn running_count(&self) -> usize {
        self.running_count
    }

    pub(crate) fn set_running_count(&mut self, count: usize) {
        self.running_count = count;
    }

    /// Advance simulated time by `dt_real` wall seconds.
    ///
    /// Returns whether a re-render is due: only while playing with a
    /// document loaded.
    pub fn advance(&mut self, dt_real: f64) -> bool {
        if self.document.is_none() || !self.clock.is_running() {
            return false;
        }
        self.clock.advance(dt_real);
        true
    }

    pub fn apply(&mut self, control: Control, wall: &dyn WallClock) -> Result<Effect, EngineError> {
        debug!(?control, "applying control");
        match control {
            Control::TogglePlay => {
                let running = self.clock.toggle();
                debug!(running, "playback toggled");
                Ok(Effect::None)
            }
            Control::SetSpeed(multiplier) => {
                self.clock.set_speed(multiplier).inspect_err(|err| {
                    warn!(%err, "rejected speed multiplier");
                })?;
                Ok(Effect::None)
            }
            Control::SwitchDayType(day_type) => {
                self.day_type = day_type;
                Ok(Effect::Load(day_type))
            }
            Control::JumpToNow | Control::JumpToServiceStart | Control::Skip(_)
                if self.document.is_none() =>
            {
                Ok(Effect::None)
            }
            Control::JumpToNow => {
                self.clock.jump_to_wall_clock(wall);
                Ok(Effect::Render)
            }
            Control::JumpToServiceStart => {
                self.clock.jump_to_service_start();
                Ok(Effect::Render)
            }
            Control::Skip(delta) => {
                self.clock.skip(delta);
                Ok(Effect::Render)
            }
        }
    }

    /// Reserve an id for a new document load
    pub fn begin_load(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    /// Swap in a freshly loaded document.
    ///
    /// Results from a request older than the one already installed are
    /// dropped. Returns whether the document was installed.
    pub fn install(&mut self, request: u64, document: ScheduleDocument, wall: &dyn WallClock) -> bool {
        if request < self.installed_request {
            debug!(request, installed = self.installed_request, "discarding stale document");
            return false;
        }

        let first = self.document.is_none();
        for excluded in document.excluded() {
            warn!(index = excluded.index, reason = %excluded.reason, "trip excluded from document");
        }
        info!(
            day_type = %document.day_type(),
            trips = document.trips().len(),
            "schedule document installed"
        );

        self.installed_request = request;
        self.generation += 1;
        self.day_type = document.day_type();
        self.status = StatusLine::Legend(document.legend_text());
        self.hit_regions.clear();
        self.running_count = 0;
        self.clock.set_window(document.window());
        self.document = Some(Arc::new(document));

        if first {
            self.clock.jump_to_wall_clock(wall);
        }
        true
    }

    /// Record a failed load; the current document stays in place
    pub fn fail_load(&mut self, request: u64, failure: LoadFailure) {
        if request < self.installed_request {
            debug!(request, "ignoring failure of stale load");
            return;
        }
        warn!(location = %failure.location, reason = %failure.reason, "schedule load failed");
        self.status = StatusLine::LoadFailed(failure);
    }

    /// Resolve a handle issued for the current document
    pub fn trip(&self, handle: TripHandle) -> Option<&Trip> {
        if handle.generation != self.generation {
            return None;
        }
        self.document.as_ref()?.trip(handle.index)
    }

    pub fn handle(&self, index: usize) -> TripHandle {
        TripHandle {
            generation: self.generation,
            index,
        }
    }

    /// Trip under `point` in the last render pass of `context`
    pub fn pick(&self, context: RenderContext, point: DVec2) -> Option<TripHandle> {
        self.hit_regions
            .resolve(context, point)
            .filter(|handle| handle.generation == self.generation)
    }

    pub fn hit_regions(&self) -> &HitRegions {
        &self.hit_regions
    }

    pub fn inspect(&self, handle: TripHandle) -> Option<TripDetail> {
        let trip = self.trip(handle)?;
        Some(TripDetail::new(trip, self.clock.now(), &self.major))
    }
}
