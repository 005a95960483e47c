//! Stop-by-stop timetable of a selected trip.

use itertools::Itertools;
use tramline_transit::{Trip, VehicleState, locate};

use crate::stacking::MajorStations;

/// `HH:MM:SS`, flooring fractional seconds
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimetableRow {
    pub station: String,
    /// `arr / dep` when both differ, otherwise whichever is known
    pub time: String,
    pub major: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TripDetail {
    pub title: String,
    pub status: String,
    pub rows: Vec<TimetableRow>,
}

impl TripDetail {
    pub fn new(trip: &Trip, now: f64, major: &MajorStations) -> Self {
        let status = match locate(trip, now) {
            VehicleState::Stopped { station, .. } => format!("停車中：{station}"),
            VehicleState::Running { .. } => "走行中".to_string(),
            VehicleState::NotActive => "情報なし".to_string(),
        };

        let rows = trip
            .stops
            .iter()
            .map(|stop| {
                let mut time = [stop.arrival, stop.departure]
                    .into_iter()
                    .flatten()
                    .dedup()
                    .map(|s| format_clock(f64::from(s)))
                    .join(" / ");
                if time.is_empty() {
                    time = stop.time.map(|s| format_clock(f64::from(s))).unwrap_or_default();
                }

                TimetableRow {
                    station: stop.station.to_string(),
                    time,
                    major: major.contains(&stop.station),
                }
            })
            .collect();

        Self {
            title: trip.title().to_string(),
            status,
            rows,
        }
    }
}
