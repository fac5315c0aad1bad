//! ZTL Core - Restriction model, schedule parsing and activity evaluation.
//!
//! This crate answers one question: is a Limited Traffic Zone (ZTL) of an
//! Italian city restricted at a given instant? It handles:
//!
//! - Day-range expansion ("Monday-Friday", "dal lunedì al venerdì", "Every day")
//! - Time-range parsing ("7:30-19:30", "dalle ore 7,30 alle ore 20", "24 ore su 24")
//! - Restrictions with windows that cross midnight
//! - Zones and cities, with a GeoJSON projection for map rendering
//! - A static registry of the supported cities
//!
//! Everything here is pure and synchronous. Built values are read-only and
//! can be shared between threads.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ztl_core::{DayRangePolicy, Restriction, Zone};
//!
//! let mut zone = Zone::new("milano-area-c", "Area C", "Milano", vec![]);
//! zone.add_restriction(
//!     Restriction::from_text("Monday-Friday", "7:30-19:30", DayRangePolicy::Strict).unwrap(),
//! );
//!
//! let wednesday_noon = NaiveDate::from_ymd_opt(2023, 5, 10)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//! assert!(zone.is_active_at(&wednesday_noon));
//! ```

pub mod city;
pub mod coordinates;
pub mod day_range;
pub mod error;
pub mod geojson;
pub mod overnight;
pub mod query;
pub mod registry;
pub mod restriction;
pub mod schedule_text;
pub mod time_of_day;
pub mod time_window;
pub mod weekday;
pub mod zone;

pub use city::City;
pub use coordinates::{close_ring, parse_coordinates, CoordinateFormat};
pub use day_range::{expand_day_range, parse_day_range, DayRangePolicy};
pub use error::{CoordinateError, Result, ScheduleError};
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use query::{active_zone_statuses, city_status, CityStatus, ZoneStatus};
pub use registry::{find_source, registry, source_keys, CitySource};
pub use restriction::Restriction;
pub use schedule_text::{extract_schedule, restrictions_from_schedule, ScheduleEntry};
pub use time_of_day::TimeOfDay;
pub use time_window::{parse_time_window, try_parse_time_window, TimeWindow};
pub use weekday::Weekday;
pub use zone::{LonLat, Zone};
