//! Cities and their collection of zones.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::geojson::{CityProperties, FeatureCollection};
use crate::zone::Zone;

fn default_country() -> String {
    "Italy".to_string()
}

/// A city with its Limited Traffic Zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    zones: Vec<Zone>,
}

impl City {
    /// Creates an Italian city with no zones.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: default_country(),
            zones: Vec::new(),
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Appends a zone.
    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Looks a zone up by id.
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Mutable lookup, used to attach boundaries after import.
    pub fn zone_mut(&mut self, id: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.id == id)
    }

    /// Zones with at least one restriction active at the instant.
    pub fn active_zones<T>(&self, instant: &T) -> Vec<&Zone>
    where
        T: Datelike + Timelike,
    {
        self.zones.iter().filter(|z| z.is_active_at(instant)).collect()
    }

    /// Total number of restrictions across all zones.
    pub fn restriction_count(&self) -> usize {
        self.zones.iter().map(|z| z.restrictions().len()).sum()
    }

    /// Lower-cased name, used as the storage file stem.
    pub fn file_stem(&self) -> String {
        self.name.to_lowercase()
    }

    /// Projects every zone into a GeoJSON FeatureCollection.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            features: self.zones.iter().map(Zone::to_feature).collect(),
            properties: CityProperties {
                name: self.name.clone(),
                country: self.country.clone(),
                zone_count: self.zones.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restriction::Restriction;
    use crate::time_of_day::TimeOfDay;
    use crate::time_window::TimeWindow;
    use crate::weekday::Weekday;
    use crate::zone::LonLat;
    use chrono::{NaiveDate, NaiveDateTime};
    use Weekday::*;

    fn t(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn at(day: Weekday, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 8 + day.index() as u32)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn milano() -> City {
        let mut city = City::new("Milano");

        let mut area_c = Zone::new(
            "milano-area-c",
            "Area C",
            "Milano",
            vec![
                LonLat(9.1859, 45.4654),
                LonLat(9.1897, 45.4675),
                LonLat(9.1923, 45.4662),
                LonLat(9.1859, 45.4654),
            ],
        );
        area_c.add_restriction(Restriction::new(
            Weekday::weekdays(),
            TimeWindow::new(t(7, 30), t(19, 30)),
        ));
        city.add_zone(area_c);

        let mut night = Zone::new("milano-night", "Night ZTL", "Milano", vec![]);
        night.add_restriction(
            Restriction::new(
                [Thursday, Friday, Saturday],
                TimeWindow::new(t(23, 0), t(3, 0)),
            )
            .with_vehicle_types(["Euro 0"]),
        );
        city.add_zone(night);

        city.add_zone(Zone::new("milano-pending", "Pending", "Milano", vec![]));
        city
    }

    // ==================== City Tests ====================

    #[test]
    fn defaults_to_italy() {
        let city = City::new("Torino");
        assert_eq!(city.country, "Italy");
        assert!(city.zones().is_empty());
        assert_eq!(City::new("Nice").with_country("France").country, "France");
    }

    #[test]
    fn lookup_and_counts() {
        let mut city = milano();
        assert_eq!(city.zones().len(), 3);
        assert_eq!(city.restriction_count(), 2);
        assert_eq!(city.zone("milano-area-c").unwrap().name, "Area C");
        assert!(city.zone("milano-area-b").is_none());
        assert!(city.zone_mut("milano-night").is_some());
        assert_eq!(city.file_stem(), "milano");
    }

    #[test]
    fn active_zones_at_instant() {
        let city = milano();

        let ids = |instant: NaiveDateTime| -> Vec<String> {
            city.active_zones(&instant)
                .into_iter()
                .map(|z| z.id.clone())
                .collect()
        };

        assert_eq!(ids(at(Monday, 10, 0)), vec!["milano-area-c"]);
        assert_eq!(ids(at(Sunday, 2, 0)), vec!["milano-night"]);
        assert_eq!(ids(at(Friday, 19, 0)), vec!["milano-area-c"]);
        assert!(ids(at(Sunday, 12, 0)).is_empty());
    }

    #[test]
    fn feature_collection_projection() {
        let value = serde_json::to_value(milano().to_feature_collection()).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["properties"]["name"], "Milano");
        assert_eq!(value["properties"]["country"], "Italy");
        assert_eq!(value["properties"]["zone_count"], 3);
        assert_eq!(value["features"].as_array().unwrap().len(), 3);
        assert_eq!(value["features"][0]["properties"]["id"], "milano-area-c");
        assert_eq!(
            value["features"][2]["geometry"]["coordinates"][0]
                .as_array()
                .unwrap()
                .len(),
            0
        );
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn persisted_form_round_trips_with_same_behavior() {
        let city = milano();
        let json = serde_json::to_string_pretty(&city).unwrap();
        let reloaded: City = serde_json::from_str(&json).unwrap();

        assert_eq!(reloaded, city);
        for day in Weekday::ALL {
            for hour in [0, 2, 3, 7, 12, 19, 20, 23] {
                let instant = at(day, hour, 30);
                assert_eq!(
                    reloaded.active_zones(&instant).len(),
                    city.active_zones(&instant).len(),
                    "{day} {hour}:30"
                );
            }
        }
    }

    #[test]
    fn persisted_field_names() {
        let value = serde_json::to_value(milano()).unwrap();
        let restriction = &value["zones"][0]["restrictions"][0];

        assert_eq!(value["name"], "Milano");
        assert_eq!(value["zones"][0]["boundaries"][0][0], 9.1859);
        assert_eq!(restriction["days"][0], "Monday");
        assert_eq!(restriction["start_time"], "07:30");
        assert_eq!(restriction["end_time"], "19:30");
        assert_eq!(value["zones"][1]["restrictions"][0]["vehicle_types"][0], "Euro 0");
    }

    #[test]
    fn missing_country_defaults_on_load() {
        let city: City = serde_json::from_str(r#"{"name": "Bologna", "zones": []}"#).unwrap();
        assert_eq!(city.country, "Italy");
    }
}
