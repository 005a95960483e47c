//! Vertical slots for vehicles stopped together at busy stations.
//!
//! A fresh [`StackingResolver`] is built for every render pass. Vehicles
//! stopped at a major station take slots in the order they are visited, so
//! earlier trips always get the lower offset.

use std::collections::{HashMap, HashSet};

use tramline_transit::{StationIdentifier, StationNormalizer, VehicleState};

/// High-traffic stations subject to stacking
#[derive(Clone, Debug, Default)]
pub struct MajorStations(HashSet<StationIdentifier>);

impl MajorStations {
    pub fn new(names: impl IntoIterator<Item = impl AsRef<str>>, normalizer: &StationNormalizer) -> Self {
        Self(
            names
                .into_iter()
                .map(|name| normalizer.normalize_str(name.as_ref()))
                .filter(|station| !station.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, station: &StationIdentifier) -> bool {
        self.0.contains(station)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct StackingResolver<'a> {
    major: &'a MajorStations,
    gap: f64,
    counters: HashMap<(usize, StationIdentifier), u32>,
}

impl<'a> StackingResolver<'a> {
    pub fn new(major: &'a MajorStations, gap: f64) -> Self {
        Self {
            major,
            gap,
            counters: HashMap::new(),
        }
    }

    /// Claim the next slot for a vehicle on `lane`.
    ///
    /// Only vehicles stopped at a major station claim slots; everything else
    /// sits in slot 0 without consuming a counter.
    pub fn slot(&mut self, lane: usize, state: &VehicleState) -> u32 {
        let Some(station) = state.stopped_at() else {
            return 0;
        };
        if !self.major.contains(station) {
            return 0;
        }

        let counter = self.counters.entry((lane, station.clone())).or_insert(0);
        let slot = *counter;
        *counter += 1;
        slot
    }

    /// Distance above the lane's base row, `slot × gap`
    pub fn offset(&mut self, lane: usize, state: &VehicleState) -> f64 {
        f64::from(self.slot(lane, state)) * self.gap
    }
}
