//! GeoJSON projection of zones and cities for map rendering.

use serde::Serialize;

use crate::zone::LonLat;

/// Geometry of a zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A polygon; zones use a single outer ring.
    Polygon { coordinates: Vec<Vec<LonLat>> },
}

/// Properties attached to each zone feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneProperties {
    pub id: String,
    pub name: String,
    pub city: String,
}

/// A single zone as a GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: ZoneProperties,
    pub geometry: Geometry,
}

/// Properties attached to a city's feature collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityProperties {
    pub name: String,
    pub country: String,
    pub zone_count: usize,
}

/// All zones of a city as a GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub properties: CityProperties,
}
