//! Boundary coordinate parsing.
//!
//! Open-data portals publish zone polygons in several textual shapes. All of
//! them are read into `[lon, lat]` pairs.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::CoordinateError;
use crate::zone::LonLat;

static BRACKET_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]+),\s*([^\[\]]+)\]").expect("invalid regex pattern"));

/// Textual layout of a coordinate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateFormat {
    /// `lon1,lat1;lon2,lat2;...`
    #[default]
    Semicolon,
    /// `[[lon1,lat1], [lon2,lat2], ...]`
    Brackets,
    /// `lon1 lat1 lon2 lat2 ...`
    Space,
    /// A GeoJSON Feature, FeatureCollection or geometry.
    GeoJson,
}

impl FromStr for CoordinateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semicolon" => Ok(Self::Semicolon),
            "brackets" => Ok(Self::Brackets),
            "space" => Ok(Self::Space),
            "geojson" => Ok(Self::GeoJson),
            other => Err(format!("unknown coordinate format: {other}")),
        }
    }
}

/// Parses a coordinate list in the given format.
pub fn parse_coordinates(
    text: &str,
    format: CoordinateFormat,
) -> Result<Vec<LonLat>, CoordinateError> {
    match format {
        CoordinateFormat::Semicolon => parse_semicolon(text),
        CoordinateFormat::Brackets => parse_brackets(text),
        CoordinateFormat::Space => parse_space(text),
        CoordinateFormat::GeoJson => {
            let value: Value = serde_json::from_str(text)?;
            coordinates_from_geojson(&value)
        }
    }
}

/// Appends the first point when the ring is not already closed.
pub fn close_ring(mut points: Vec<LonLat>) -> Vec<LonLat> {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if points.len() > 1 && first != last {
            points.push(first);
        }
    }
    points
}

/// Extracts coordinates from parsed GeoJSON.
///
/// Features recurse into their geometry and collections concatenate their
/// features. Points, LineStrings and the outer ring of Polygons are read;
/// other types yield nothing.
pub fn coordinates_from_geojson(value: &Value) -> Result<Vec<LonLat>, CoordinateError> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "Feature" => match value.get("geometry") {
            Some(geometry) => coordinates_from_geojson(geometry),
            None => Ok(Vec::new()),
        },
        "FeatureCollection" => {
            let mut points = Vec::new();
            for feature in value.get("features").and_then(Value::as_array).into_iter().flatten() {
                points.extend(coordinates_from_geojson(feature)?);
            }
            Ok(points)
        }
        "Point" => match value.get("coordinates") {
            Some(point) => Ok(vec![point_from_value(point)?]),
            None => Ok(Vec::new()),
        },
        "LineString" => points_from_array(value.get("coordinates")),
        "Polygon" => {
            let outer = value
                .get("coordinates")
                .and_then(Value::as_array)
                .and_then(|rings| rings.first());
            points_from_array(outer)
        }
        other => {
            debug!(kind = other, "Ignoring unsupported GeoJSON type");
            Ok(Vec::new())
        }
    }
}

fn parse_semicolon(text: &str) -> Result<Vec<LonLat>, CoordinateError> {
    text.split(';')
        .filter(|pair| pair.contains(','))
        .map(|pair| {
            let mut parts = pair.split(',');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(lon), Some(lat), None) => Ok(LonLat(number(lon)?, number(lat)?)),
                _ => Err(CoordinateError::MalformedPair(pair.trim().to_string())),
            }
        })
        .collect()
}

fn parse_brackets(text: &str) -> Result<Vec<LonLat>, CoordinateError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            let pairs = value.as_array().into_iter().flatten();
            pairs
                .filter(|pair| pair.as_array().is_some_and(|p| p.len() >= 2))
                .map(point_from_value)
                .collect()
        }
        Err(_) => BRACKET_PAIR
            .captures_iter(text)
            .map(|caps| Ok(LonLat(number(&caps[1])?, number(&caps[2])?)))
            .collect(),
    }
}

fn parse_space(text: &str) -> Result<Vec<LonLat>, CoordinateError> {
    let values: Vec<&str> = text.split_whitespace().collect();
    if values.len() % 2 != 0 {
        debug!(count = values.len(), "Odd number of space-separated values");
        return Ok(Vec::new());
    }
    values
        .chunks(2)
        .map(|pair| Ok(LonLat(number(pair[0])?, number(pair[1])?)))
        .collect()
}

fn points_from_array(value: Option<&Value>) -> Result<Vec<LonLat>, CoordinateError> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(point_from_value)
        .collect()
}

fn point_from_value(value: &Value) -> Result<LonLat, CoordinateError> {
    let malformed = || CoordinateError::MalformedPair(value.to_string());
    let pair = value.as_array().filter(|p| p.len() >= 2).ok_or_else(malformed)?;
    Ok(LonLat(json_number(&pair[0])?, json_number(&pair[1])?))
}

fn json_number(value: &Value) -> Result<f64, CoordinateError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CoordinateError::InvalidNumber(n.to_string())),
        Value::String(s) => number(s),
        other => Err(CoordinateError::InvalidNumber(other.to_string())),
    }
}

fn number(text: &str) -> Result<f64, CoordinateError> {
    text.trim()
        .parse()
        .map_err(|_| CoordinateError::InvalidNumber(text.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Vec<LonLat> {
        vec![
            LonLat(11.3438, 44.4937),
            LonLat(11.3437, 44.4934),
            LonLat(11.3443, 44.4933),
        ]
    }

    // ==================== Text Format Tests ====================

    #[test]
    fn semicolon_format() {
        let points = parse_coordinates(
            "11.3438,44.4937; 11.3437,44.4934;11.3443, 44.4933;",
            CoordinateFormat::Semicolon,
        )
        .unwrap();
        assert_eq!(points, ring());
    }

    #[test]
    fn semicolon_rejects_garbage() {
        assert!(matches!(
            parse_coordinates("11.3,abc", CoordinateFormat::Semicolon),
            Err(CoordinateError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_coordinates("1,2,3", CoordinateFormat::Semicolon),
            Err(CoordinateError::MalformedPair(_))
        ));
    }

    #[test]
    fn bracket_format_as_json() {
        let points = parse_coordinates(
            "[[11.3438, 44.4937], [11.3437, 44.4934], [11.3443, 44.4933]]",
            CoordinateFormat::Brackets,
        )
        .unwrap();
        assert_eq!(points, ring());
    }

    #[test]
    fn bracket_format_falls_back_to_pattern() {
        let points = parse_coordinates(
            "[[11.3438, 44.4937], [11.3437, 44.4934], [11.3443, 44.4933],]",
            CoordinateFormat::Brackets,
        )
        .unwrap();
        assert_eq!(points, ring());
    }

    #[test]
    fn space_format() {
        let points = parse_coordinates(
            "11.3438 44.4937\n11.3437 44.4934 11.3443 44.4933",
            CoordinateFormat::Space,
        )
        .unwrap();
        assert_eq!(points, ring());

        let odd = parse_coordinates("11.3 44.4 11.2", CoordinateFormat::Space).unwrap();
        assert!(odd.is_empty());
    }

    #[test]
    fn format_names() {
        assert_eq!("GeoJSON".parse::<CoordinateFormat>(), Ok(CoordinateFormat::GeoJson));
        assert_eq!("space".parse::<CoordinateFormat>(), Ok(CoordinateFormat::Space));
        assert!("wkt".parse::<CoordinateFormat>().is_err());
    }

    // ==================== GeoJSON Tests ====================

    #[test]
    fn geojson_feature_with_polygon_uses_outer_ring() {
        let text = r#"{
            "type": "Feature",
            "properties": {"name": "ZTL"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[11.3438, 44.4937], [11.3437, 44.4934], [11.3443, 44.4933]],
                    [[0.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
                ]
            }
        }"#;
        let points = parse_coordinates(text, CoordinateFormat::GeoJson).unwrap();
        assert_eq!(points, ring());
    }

    #[test]
    fn geojson_collection_concatenates_features() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [11.3438, 44.4937]}},
                {"type": "Feature", "geometry": {"type": "LineString",
                    "coordinates": [[11.3437, 44.4934], [11.3443, 44.4933]]}},
                {"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": []}}
            ]
        }"#;
        let points = parse_coordinates(text, CoordinateFormat::GeoJson).unwrap();
        assert_eq!(points, ring());
    }

    #[test]
    fn invalid_geojson_is_an_error() {
        assert!(matches!(
            parse_coordinates("{not json", CoordinateFormat::GeoJson),
            Err(CoordinateError::GeoJson(_))
        ));
    }

    // ==================== Ring Tests ====================

    #[test]
    fn close_ring_appends_first_point_once() {
        let closed = close_ring(ring());
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());

        assert_eq!(close_ring(closed.clone()), closed);
        assert!(close_ring(Vec::new()).is_empty());
    }
}
