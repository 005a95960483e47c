//! Schedule documents: one day type's complete timetable.
//!
//! A document is built once from JSON, normalized, and then never mutated.
//! Switching day type means building a new document and dropping the old one.

mod wire;

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::{types::*, Axis, Trip};
use crate::normalize::StationNormalizer;

use serde_json::Value;
use wire::{legend_value, seconds, Scalar, WireDocument, WireTrip};

/// A trip record that could not be turned into a [`Trip`]
#[derive(Debug)]
pub struct ExcludedTrip {
    /// Position in the document's trip list
    pub index: usize,
    pub reason: TransitError,
}

#[derive(Debug)]
pub struct ScheduleDocument {
    day_type: DayType,
    window: ServiceWindow,
    main_axis: Option<Axis>,
    branch_axis: Option<Axis>,
    legend: Vec<(String, String)>,
    trips: Vec<Trip>,
    excluded: Vec<ExcludedTrip>,

    // Lookup maps
    trip_map: HashMap<TripIdentifier, usize>,
}

impl ScheduleDocument {
    /// Build a document from already-normalized parts
    pub fn from_data(
        day_type: DayType,
        window: ServiceWindow,
        axes: impl IntoIterator<Item = Axis>,
        legend: Vec<(String, String)>,
        trips: Vec<Trip>,
    ) -> Self {
        let mut main_axis = None;
        let mut branch_axis = None;
        for axis in axes {
            match axis.kind() {
                AxisKind::Main => main_axis = Some(axis),
                AxisKind::Branch => branch_axis = Some(axis),
            }
        }

        let mut trip_map = HashMap::with_capacity(trips.len());
        for (index, trip) in trips.iter().enumerate() {
            trip_map.entry(trip.id.clone()).or_insert(index);
        }

        Self {
            day_type,
            window,
            main_axis,
            branch_axis,
            legend,
            trips,
            excluded: Vec::new(),
            trip_map,
        }
    }

    /// Decode and normalize a published schedule document.
    ///
    /// Fails only when the payload is not the expected JSON shape. Trip
    /// records that are malformed or have an unusable route are excluded
    /// and listed in [`excluded`](Self::excluded) rather than failing the
    /// whole load.
    pub fn from_json(bytes: &[u8], day_type: DayType, normalizer: &StationNormalizer) -> Result<Self> {
        let wire: WireDocument = serde_json::from_slice(bytes)?;

        let window = ServiceWindow::new(
            wire.meta.service_start_sec.unwrap_or(0.0),
            wire.meta.service_end_sec.unwrap_or(DEFAULT_SERVICE_END),
        );
        if !window.start.is_finite() || !window.end.is_finite() {
            return Err(TransitError::InvalidData("service window is not finite".into()));
        }

        let axis = |kind, names: &[String]| {
            Axis::new(kind, names.iter().map(|name| normalizer.normalize_str(name)).collect())
        };
        let axes = [
            axis(AxisKind::Main, &wire.meta.axis_stations.main),
            axis(AxisKind::Branch, &wire.meta.axis_stations.branch),
        ];

        let legend = wire
            .meta
            .route_legend
            .iter()
            .map(|(key, value)| (key.clone(), legend_value(value)))
            .collect();

        let mut trips = Vec::new();
        let mut excluded = Vec::new();
        for (index, record) in wire.into_trips().into_iter().enumerate() {
            match decode_trip(index, record, normalizer) {
                Ok(trip) => trips.push(trip),
                Err(reason) => excluded.push(ExcludedTrip { index, reason }),
            }
        }

        let mut document = Self::from_data(day_type, window, axes.into_iter().flatten(), legend, trips);
        document.excluded = excluded;
        Ok(document)
    }

    pub fn day_type(&self) -> DayType {
        self.day_type
    }

    pub fn window(&self) -> ServiceWindow {
        self.window
    }

    /// `None` when the document has no stations for that axis
    pub fn axis(&self, kind: AxisKind) -> Option<&Axis> {
        match kind {
            AxisKind::Main => self.main_axis.as_ref(),
            AxisKind::Branch => self.branch_axis.as_ref(),
        }
    }

    /// `key:value` pairs joined with ` / `
    pub fn legend_text(&self) -> String {
        self.legend
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, index: usize) -> Option<&Trip> {
        self.trips.get(index)
    }

    pub fn get_trip(&self, id: &TripIdentifier) -> Option<&Trip> {
        self.trip_map.get(id).and_then(|&index| self.trips.get(index))
    }

    /// Trips of one route family, in document order, with their indices
    pub fn trips_on(&self, route: RouteFamily) -> impl Iterator<Item = (usize, &Trip)> {
        self.trips
            .iter()
            .enumerate()
            .filter(move |(_, trip)| trip.route == route)
    }

    pub fn excluded(&self) -> &[ExcludedTrip] {
        &self.excluded
    }
}

fn decode_trip(index: usize, record: Value, normalizer: &StationNormalizer) -> Result<Trip> {
    let record: WireTrip = serde_json::from_value(record)?;
    let route = match record.route.as_deref() {
        Some(route) => RouteFamily::parse(route)?,
        None => return Err(TransitError::InvalidData(format!("trip #{index} has no route"))),
    };

    let number: Option<Arc<str>> = record.no.map(|no| no.into_string().into());
    let id = match record.id {
        Some(id) => TripIdentifier::new(id.into_string()),
        None => TripIdentifier::new(format!("{route}#{index}")),
    };

    let stops = record
        .stops
        .into_iter()
        .map(|stop| StopEvent {
            station: normalizer.normalize(text(stop.station).as_deref()),
            arrival: seconds(stop.arr_sec),
            departure: seconds(stop.dep_sec),
            time: seconds(stop.time_sec),
            axis_index: stop.axis_index.filter(|index| index.is_finite()),
        })
        .collect();

    Ok(Trip {
        id,
        route,
        label: text(record.label).map(Into::into),
        name: text(record.name).map(Into::into),
        number,
        color: record.color.filter(|c| !c.trim().is_empty()).map(Into::into),
        from: normalizer.normalize(text(record.from).as_deref()),
        to: normalizer.normalize(text(record.to).as_deref()),
        via: normalizer.normalize(text(record.via).as_deref()),
        stops,
    })
}

fn text(value: Option<Scalar>) -> Option<String> {
    value.map(Scalar::into_string)
}
