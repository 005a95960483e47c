//! Schedule data models and types.

pub mod calendar;
pub mod trip;
pub mod types;

// Re-exports for convenience
pub use calendar::{DayTypeCalendar, WeekdayFlags};
pub use trip::{Axis, Trip};
pub use types::{
    AxisKind, DayType, Result, RouteFamily, ServiceWindow, StopEvent, TransitError,
    DEFAULT_SERVICE_END,
};
