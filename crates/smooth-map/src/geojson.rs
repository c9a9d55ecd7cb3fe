//! GeoJSON export of contour lines and region bands.
//!
//! Both artifacts serialize to a plain RFC 7946 FeatureCollection. The
//! coordinate values pass through untouched; no CRS member is written.

use geo::MultiPolygon;
use isoline::ContourLine;
use map_common::format_value;
use regions::RegionBand;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: GeoJsonGeometry,

    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry,
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }
}

/// GeoJSON geometry variants used by the exporter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    /// An open or closed contour line.
    LineString {
        /// Array of [x, y] coordinate pairs.
        coordinates: Vec<[f64; 2]>,
    },

    /// A banded region, possibly multi-part and holed.
    MultiPolygon {
        /// Polygons, each an array of linear rings (exterior first), each
        /// ring an array of [x, y] coordinate pairs.
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

/// Export contour lines as LineString features with `level` and `closed`
/// properties.
pub fn contours_to_geojson(lines: &[ContourLine]) -> FeatureCollection {
    let mut fc = FeatureCollection::new();
    for line in lines {
        let coordinates = line.points.iter().map(|&(x, y)| [x, y]).collect();
        fc.features.push(
            Feature::new(GeoJsonGeometry::LineString { coordinates })
                .with_property("level", json_number(line.level))
                .with_property("closed", Value::Bool(line.closed)),
        );
    }
    fc
}

/// Export region bands as MultiPolygon features with `band`, `label` and
/// `value` properties.
pub fn regions_to_geojson(bands: &[RegionBand]) -> FeatureCollection {
    let mut fc = FeatureCollection::new();
    for band in bands {
        fc.features.push(
            Feature::new(GeoJsonGeometry::MultiPolygon {
                coordinates: multi_polygon_coordinates(&band.geometry),
            })
            .with_property("band", Value::from(band.band_index))
            .with_property("label", Value::String(band.band.label.clone()))
            .with_property("value", json_number(band.value)),
        );
    }
    fc
}

fn multi_polygon_coordinates(mp: &MultiPolygon<f64>) -> Vec<Vec<Vec<[f64; 2]>>> {
    mp.iter()
        .map(|poly| {
            let mut rings = Vec::with_capacity(1 + poly.interiors().len());
            rings.push(ring_coordinates(poly.exterior()));
            for interior in poly.interiors() {
                rings.push(ring_coordinates(interior));
            }
            rings
        })
        .collect()
}

fn ring_coordinates(ring: &geo::LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

// JSON has no NaN or infinity; fall back to a string rendering for the
// open-ended band values.
fn json_number(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(format_value(v)))
}
