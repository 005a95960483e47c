//! Trips and station axes.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::*;

/// Ordered stations of one route family.
///
/// Positions along the axis are real-valued indices in `[0, len - 1]`;
/// index `i` sits exactly on station `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    kind: AxisKind,
    stations: Vec<StationIdentifier>,
}

impl Axis {
    /// Returns `None` for an empty station list.
    pub fn new(kind: AxisKind, stations: Vec<StationIdentifier>) -> Option<Self> {
        if stations.is_empty() {
            None
        } else {
            Some(Self { kind, stations })
        }
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn stations(&self) -> &[StationIdentifier] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Fraction of the axis length covered by `axis_index`, in `[0, 1]` for
    /// in-range indices. A single-station axis maps everything to 0.
    pub fn fraction(&self, axis_index: f64) -> f64 {
        if self.stations.len() < 2 {
            return 0.0;
        }
        axis_index / (self.stations.len() - 1) as f64
    }
}

/// One scheduled vehicle run.
///
/// A trip owns its stops; they are never shared with other trips.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub id: TripIdentifier,
    pub route: RouteFamily,
    pub label: Option<Arc<str>>,
    pub name: Option<Arc<str>>,
    pub number: Option<Arc<str>>,
    pub color: Option<Arc<str>>,
    pub from: StationIdentifier,
    pub to: StationIdentifier,
    pub via: StationIdentifier,
    pub stops: Vec<StopEvent>,
}

impl Trip {
    pub fn new(id: TripIdentifier, route: RouteFamily, stops: Vec<StopEvent>) -> Self {
        Self {
            id,
            route,
            label: None,
            name: None,
            number: None,
            color: None,
            from: StationIdentifier::new(""),
            to: StationIdentifier::new(""),
            via: StationIdentifier::new(""),
            stops,
        }
    }

    pub fn with_label(mut self, label: impl AsRef<str>) -> Self {
        self.label = Some(label.as_ref().into());
        self
    }

    /// Short text drawn inside the vehicle glyph
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.number.as_deref())
            .unwrap_or("")
    }

    /// Heading used when the trip is inspected
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.label.as_deref())
            .or(self.number.as_deref())
            .unwrap_or("列車")
    }
}
