//! The event loop that owns the engine.
//!
//! Frame ticks, heartbeat ticks, user commands, finished loads and pick
//! requests all arrive on one queue and are applied in order by a single
//! [`PlaybackDriver`]. Nothing else ever touches the [`EngineState`].

use std::sync::Arc;
use std::time::Duration;

use glam::DVec2;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};
use tramline_transit::{DayType, DocumentSource, ScheduleDocument, StationNormalizer};

use crate::clock::WallClock;
use crate::config::EngineConfig;
use crate::error::{ConfigurationError, LoadFailure};
use crate::inspect::TripDetail;
use crate::layout::RenderContext;
use crate::loader::load_document;
use crate::render::{RenderSink, render_frame};
use crate::state::{Control, Effect, EngineState};

/// Which timer produced an advance
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AdvanceSource {
    Frame,
    Heartbeat,
}

#[derive(Debug)]
pub enum DriverEvent {
    /// `dt` is in real seconds
    Advance { dt: f64, source: AdvanceSource },
    Control(Control),
    Loaded {
        request: u64,
        result: Result<ScheduleDocument, LoadFailure>,
    },
    Pick {
        context: RenderContext,
        point: DVec2,
        reply: oneshot::Sender<Option<TripDetail>>,
    },
    Shutdown,
}

/// Cloneable sender side of the driver queue.
///
/// Every method returns `false` once the driver is gone.
#[derive(Clone, Debug)]
pub struct DriverHandle {
    tx: mpsc::UnboundedSender<DriverEvent>,
}

impl DriverHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<DriverEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: DriverEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn frame(&self, dt: f64) -> bool {
        self.send(DriverEvent::Advance {
            dt,
            source: AdvanceSource::Frame,
        })
    }

    pub fn heartbeat(&self, dt: f64) -> bool {
        self.send(DriverEvent::Advance {
            dt,
            source: AdvanceSource::Heartbeat,
        })
    }

    pub fn command(&self, control: Control) -> bool {
        self.send(DriverEvent::Control(control))
    }

    /// Timetable of the vehicle under `point`, if any
    pub async fn pick(&self, context: RenderContext, point: DVec2) -> Option<TripDetail> {
        let (reply, rx) = oneshot::channel();
        if !self.send(DriverEvent::Pick { context, point, reply }) {
            return None;
        }
        rx.await.ok().flatten()
    }

    pub fn shutdown(&self) -> bool {
        self.send(DriverEvent::Shutdown)
    }
}

/// Turns absolute frame timestamps into deltas
#[derive(Clone, Copy, Debug, Default)]
pub struct FramePacer {
    last: Option<f64>,
}

impl FramePacer {
    /// Seconds elapsed since the previous tick; zero on the first one
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let dt = match self.last {
            Some(last) => ((timestamp_ms - last) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last = Some(timestamp_ms);
        dt
    }
}

/// Send a frame advance `fps` times a second until the driver goes away
pub fn spawn_frames(handle: DriverHandle, fps: f64) -> JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / fps.max(1.0));
    tokio::spawn(async move {
        let origin = Instant::now();
        let mut pacer = FramePacer::default();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let at = ticker.tick().await;
            let dt = pacer.tick(at.duration_since(origin).as_secs_f64() * 1000.0);
            if !handle.frame(dt) {
                break;
            }
        }
    })
}

/// Send a heartbeat advance of `period` every `period`, independently of
/// frames
pub fn spawn_heartbeat(handle: DriverHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        debug!(?period, "heartbeat started");

        loop {
            ticker.tick().await;
            if !handle.heartbeat(period.as_secs_f64()) {
                break;
            }
        }
        debug!("heartbeat stopped");
    })
}

pub struct PlaybackDriver<S> {
    state: EngineState,
    config: EngineConfig,
    normalizer: Arc<StationNormalizer>,
    sink: S,
    source: Arc<dyn DocumentSource>,
    wall: Arc<dyn WallClock>,
    rx: mpsc::UnboundedReceiver<DriverEvent>,
    /// Weak so the queue closes once every [`DriverHandle`] is gone
    tx: mpsc::WeakUnboundedSender<DriverEvent>,
}

impl<S: RenderSink> PlaybackDriver<S> {
    pub fn new(
        config: EngineConfig,
        sink: S,
        source: Arc<dyn DocumentSource>,
        wall: Arc<dyn WallClock>,
    ) -> Result<(Self, DriverHandle), ConfigurationError> {
        let state = EngineState::new(&config, wall.as_ref())?;
        let (tx, rx) = mpsc::unbounded_channel();
        let weak = tx.downgrade();
        let handle = DriverHandle::new(tx);

        let driver = Self {
            state,
            normalizer: Arc::new(config.normalizer()),
            config,
            sink,
            source,
            wall,
            rx,
            tx: weak,
        };
        Ok((driver, handle))
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Another sender, unless every handle has already been dropped
    pub fn handle(&self) -> Option<DriverHandle> {
        self.tx.upgrade().map(DriverHandle::new)
    }

    /// Start fetching `day_type`'s document in the background. The result
    /// comes back through the queue as [`DriverEvent::Loaded`].
    ///
    /// Nothing is fetched once all handles are gone; the loop is about to
    /// stop anyway.
    pub fn request_load(&mut self, day_type: DayType) -> u64 {
        let request = self.state.begin_load();
        let Some(tx) = self.tx.upgrade() else {
            debug!(request, %day_type, "queue closed, skipping load");
            return request;
        };
        let location = self.config.sources.location(day_type).to_string();
        let source = Arc::clone(&self.source);
        let normalizer = Arc::clone(&self.normalizer);

        debug!(request, %day_type, %location, "requesting schedule document");
        tokio::spawn(async move {
            let result = load_document(source.as_ref(), &location, day_type, &normalizer).await;
            let _ = tx.send(DriverEvent::Loaded { request, result });
        });
        request
    }

    /// Apply one event. Returns `false` on shutdown.
    pub fn dispatch(&mut self, event: DriverEvent) -> bool {
        match event {
            DriverEvent::Advance { dt, source } => {
                trace!(dt, %source, "advance");
                if self.state.advance(dt) {
                    self.render();
                }
            }
            DriverEvent::Control(control) => match self.state.apply(control, self.wall.as_ref()) {
                Ok(Effect::None) => {}
                Ok(Effect::Render) => self.render(),
                Ok(Effect::Load(day_type)) => {
                    self.request_load(day_type);
                }
                Err(err) => warn!(%err, ?control, "control rejected"),
            },
            DriverEvent::Loaded { request, result } => {
                match result {
                    Ok(document) => {
                        if !self.state.install(request, document, self.wall.as_ref()) {
                            return true;
                        }
                    }
                    Err(failure) => self.state.fail_load(request, failure),
                }
                self.render();
            }
            DriverEvent::Pick { context, point, reply } => {
                let detail = self
                    .state
                    .pick(context, point)
                    .and_then(|handle| self.state.inspect(handle));
                let _ = reply.send(detail);
            }
            DriverEvent::Shutdown => {
                debug!("playback driver shutting down");
                return false;
            }
        }
        true
    }

    /// Load the current day type, then process events until
    /// [`DriverEvent::Shutdown`] or until every handle has been dropped
    pub async fn run(mut self) -> Self {
        self.request_load(self.state.day_type());

        while let Some(event) = self.rx.recv().await {
            if !self.dispatch(event) {
                break;
            }
        }
        self
    }

    fn render(&mut self) {
        render_frame(&mut self.state, &self.config.layout, &mut self.sink);
    }
}
