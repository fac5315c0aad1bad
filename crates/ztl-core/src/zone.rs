//! Limited Traffic Zones.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::geojson::{Feature, Geometry, ZoneProperties};
use crate::restriction::Restriction;
use crate::time_of_day::TimeOfDay;
use crate::weekday::Weekday;

/// A (longitude, latitude) pair, persisted as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat(pub f64, pub f64);

impl LonLat {
    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

/// A restricted area of a city with its schedule.
///
/// A zone without restrictions is never active: no rule means unrestricted.
/// Geometry is independent of scheduling, so a zone may have empty
/// `boundaries` while its polygon is still pending and still be queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ZoneRecord")]
pub struct Zone {
    /// Stable identifier, prefixed with the city slug (e.g. `milano-area-c`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display name of the owning city.
    pub city: String,
    /// Closed polygon ring, first point equal to the last.
    #[serde(default)]
    pub boundaries: Vec<LonLat>,
    #[serde(default)]
    restrictions: Vec<Restriction>,
}

/// Persisted form of a zone. Loading rebuilds the zone through
/// [`Zone::add_restriction`].
#[derive(Deserialize)]
struct ZoneRecord {
    id: String,
    name: String,
    city: String,
    #[serde(default)]
    boundaries: Vec<LonLat>,
    #[serde(default)]
    restrictions: Vec<Restriction>,
}

impl From<ZoneRecord> for Zone {
    fn from(record: ZoneRecord) -> Self {
        let mut zone = Zone::new(record.id, record.name, record.city, record.boundaries);
        for restriction in record.restrictions {
            zone.add_restriction(restriction);
        }
        zone
    }
}

impl Zone {
    /// Creates a zone without restrictions.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        boundaries: Vec<LonLat>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            boundaries,
            restrictions: Vec::new(),
        }
    }

    /// Appends a restriction. There is no way to remove one.
    pub fn add_restriction(&mut self, restriction: Restriction) {
        self.restrictions.push(restriction);
    }

    /// Restrictions in insertion order.
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// Returns true if any restriction is active at the instant.
    pub fn is_active_at<T>(&self, instant: &T) -> bool
    where
        T: Datelike + Timelike,
    {
        self.restrictions.iter().any(|r| r.is_active_at(instant))
    }

    /// Returns true if any restriction is active on the given day and time.
    pub fn is_active_on(&self, day: Weekday, time: TimeOfDay) -> bool {
        self.restrictions.iter().any(|r| r.is_active_on(day, time))
    }

    /// Returns the restrictions active at the instant.
    pub fn active_restrictions<T>(&self, instant: &T) -> Vec<&Restriction>
    where
        T: Datelike + Timelike,
    {
        self.restrictions
            .iter()
            .filter(|r| r.is_active_at(instant))
            .collect()
    }

    pub fn has_geometry(&self) -> bool {
        !self.boundaries.is_empty()
    }

    /// Returns true if the boundary ring ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.boundaries.first(), self.boundaries.last()) {
            (Some(first), Some(last)) => self.boundaries.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Projects the zone to a GeoJSON Feature.
    pub fn to_feature(&self) -> Feature {
        Feature {
            properties: ZoneProperties {
                id: self.id.clone(),
                name: self.name.clone(),
                city: self.city.clone(),
            },
            geometry: Geometry::Polygon {
                coordinates: vec![self.boundaries.clone()],
            },
        }
    }
}
