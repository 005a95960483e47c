//! # tramline-transit
//!
//! Timetable model and position interpolation for vehicles running along
//! fixed route axes.
//!
//! ## Features
//!
//! - **Schedule documents**: one immutable bundle per day type, decoded from JSON
//! - **Station normalization**: alias table applied once at load time
//! - **Interpolation**: pure `(trip, second) -> VehicleState`
//! - **Pluggable retrieval**: implement [`DocumentSource`] to fetch documents
//!
//! ## Example
//!
//! ```
//! use tramline_transit::prelude::*;
//!
//! let trip = Trip::new(
//!     TripIdentifier::new("101"),
//!     RouteFamily::Main,
//!     vec![
//!         StopEvent::new(StationIdentifier::new("伊野"), None, Some(100), Some(0.0)),
//!         StopEvent::new(StationIdentifier::new("鏡川橋"), Some(200), None, Some(1.0)),
//!     ],
//! );
//!
//! assert_eq!(locate(&trip, 150.0), VehicleState::Running { axis_index: 0.5 });
//! ```

pub mod document;
pub mod identifiers;
pub mod interpolate;
pub mod models;
pub mod network;
pub mod normalize;

// Re-exports for convenience
pub mod prelude {
    pub use crate::document::{ExcludedTrip, ScheduleDocument};
    pub use crate::identifiers::*;
    pub use crate::interpolate::{locate, VehicleState};
    pub use crate::models::{calendar::*, trip::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::normalize::StationNormalizer;
}

pub use prelude::*;
