//! Status views of a city at an instant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::zone::Zone;

/// Activity of a single zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub id: String,
    pub name: String,
    pub city: String,
    pub is_active: bool,
}

impl ZoneStatus {
    pub fn of(zone: &Zone, instant: &NaiveDateTime) -> Self {
        Self {
            id: zone.id.clone(),
            name: zone.name.clone(),
            city: zone.city.clone(),
            is_active: zone.is_active_at(instant),
        }
    }
}

/// Activity of every zone of a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityStatus {
    pub name: String,
    pub country: String,
    pub zones: Vec<ZoneStatus>,
}

impl CityStatus {
    pub fn active_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_active).count()
    }
}

/// Status of every zone, in city order.
pub fn city_status(city: &City, instant: &NaiveDateTime) -> CityStatus {
    CityStatus {
        name: city.name.clone(),
        country: city.country.clone(),
        zones: city
            .zones()
            .iter()
            .map(|zone| ZoneStatus::of(zone, instant))
            .collect(),
    }
}

/// Statuses of the zones active at the instant.
pub fn active_zone_statuses(city: &City, instant: &NaiveDateTime) -> Vec<ZoneStatus> {
    city.active_zones(instant)
        .into_iter()
        .map(|zone| ZoneStatus::of(zone, instant))
        .collect()
}
