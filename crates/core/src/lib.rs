pub mod clock;
pub mod config;
pub mod error;
pub mod hit;
pub mod inspect;
pub mod layout;
pub mod loader;
pub mod playback;
pub mod render;
pub mod stacking;
pub mod state;

pub use clock::{SimulationClock, SystemWallClock, WallClock};
pub use config::{EngineConfig, LayoutConfig};
pub use error::{ConfigurationError, EngineError, LoadFailure};
pub use hit::TripHandle;
pub use inspect::TripDetail;
pub use layout::{RenderContext, Viewport};
pub use playback::{DriverEvent, DriverHandle, PlaybackDriver};
pub use render::{DrawInstruction, RenderSink};
pub use state::{Control, EngineState};

// Re-export transit from the transit crate
pub use tramline_transit as transit;
