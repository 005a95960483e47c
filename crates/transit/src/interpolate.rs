//! Vehicle position along a route axis at a simulated time.
//!
//! [`locate`] is pure: it can be asked about any second in any order, which
//! is what lets playback jump and rewind freely.

use crate::identifiers::StationIdentifier;
use crate::models::{Trip, types::StopEvent};

/// Where a trip's vehicle is at one instant
#[derive(Clone, Debug, PartialEq)]
pub enum VehicleState {
    /// Before the first stop, after the last, or unusable stop data
    NotActive,
    Stopped {
        station: StationIdentifier,
        axis_index: f64,
    },
    Running {
        axis_index: f64,
    },
}

impl VehicleState {
    pub fn axis_index(&self) -> Option<f64> {
        match self {
            Self::NotActive => None,
            Self::Stopped { axis_index, .. } | Self::Running { axis_index } => Some(*axis_index),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::NotActive)
    }

    pub fn stopped_at(&self) -> Option<&StationIdentifier> {
        match self {
            Self::Stopped { station, .. } => Some(station),
            _ => None,
        }
    }
}

/// Compute the state of `trip` at simulated second `t`.
///
/// Dwell windows are scanned over the whole stop list before any running
/// leg, so a boundary instant shared by a departure and the next arrival
/// resolves as stopped. The first matching stop or leg wins.
pub fn locate(trip: &Trip, t: f64) -> VehicleState {
    if let Some(stop) = trip.stops.iter().find(|stop| stop.dwells_at(t)) {
        return match stop.axis_index {
            Some(axis_index) => VehicleState::Stopped {
                station: stop.station.clone(),
                axis_index,
            },
            None => VehicleState::NotActive,
        };
    }

    trip.stops
        .windows(2)
        .find_map(|leg| running_leg(&leg[0], &leg[1], t))
        .unwrap_or(VehicleState::NotActive)
}

/// `Some` when `t` lies on the leg from `s0` to `s1`; the inner state is
/// `NotActive` if either end has no axis position.
fn running_leg(s0: &StopEvent, s1: &StopEvent, t: f64) -> Option<VehicleState> {
    let t0 = f64::from(s0.departure_time()?);
    let t1 = f64::from(s1.arrival_time()?);
    if !(t0 <= t && t <= t1) {
        return None;
    }

    let (Some(p0), Some(p1)) = (s0.axis_index, s1.axis_index) else {
        return Some(VehicleState::NotActive);
    };

    let r = (t - t0) / (t1 - t0).max(1.0);
    Some(VehicleState::Running {
        axis_index: p0 + (p1 - p0) * r,
    })
}
