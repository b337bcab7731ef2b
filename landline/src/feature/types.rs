//! Feature, geometry and collection types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CRS name of the geographic WGS84 coordinate system.
pub const WGS84_CRS_NAME: &str = "EPSG:4326";

/// A coordinate: `[x, y]`, optionally followed by z and/or m.
pub type Position = Vec<f64>;

/// Attribute mapping of a feature.
pub type Properties = serde_json::Map<String, Value>;

/// GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Total number of positions in the geometry.
    pub fn position_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::MultiPoint(points) | Geometry::LineString(points) => points.len(),
            Geometry::MultiLineString(parts) | Geometry::Polygon(parts) => {
                parts.iter().map(Vec::len).sum()
            }
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::len))
                .sum(),
        }
    }
}

/// The `type` member of a feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

/// A single geographic entity with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Self {
            kind: FeatureKind::Feature,
            id: None,
            geometry,
            properties,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Looks up one attribute.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// The `type` member of a named CRS object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrsKind {
    #[default]
    #[serde(rename = "name")]
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

/// Named coordinate reference system (`{"type": "name", ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    #[serde(rename = "type")]
    pub kind: CrsKind,
    pub properties: CrsProperties,
}

impl Crs {
    /// The WGS84 CRS every collection is expressed in.
    pub fn wgs84() -> Self {
        Self {
            kind: CrsKind::Name,
            properties: CrsProperties {
                name: WGS84_CRS_NAME.to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// The `type` member of a feature collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

/// An ordered set of features plus the name it is cached under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub name: String,
    pub crs: Crs,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Creates an empty WGS84 collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: CollectionKind::FeatureCollection,
            name: name.into(),
            crs: Crs::wgs84(),
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_feature() -> Feature {
        let mut properties = Properties::new();
        properties.insert("muni_id".to_string(), json!(35));
        Feature::new(
            Some(Geometry::LineString(vec![
                vec![-71.1, 42.3],
                vec![-71.2, 42.4],
            ])),
            properties,
        )
        .with_id(7)
    }

    #[test]
    fn test_collection_serializes_as_geojson() {
        let collection = FeatureCollection::new("trails-0").with_features(vec![sample_feature()]);
        let value = serde_json::to_value(&collection).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["name"], "trails-0");
        assert_eq!(value["crs"]["type"], "name");
        assert_eq!(value["crs"]["properties"]["name"], "EPSG:4326");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["id"], 7);
        assert_eq!(value["features"][0]["geometry"]["type"], "LineString");
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"][1],
            json!([-71.2, 42.4])
        );
        assert_eq!(value["features"][0]["properties"]["muni_id"], 35);
    }

    #[test]
    fn test_null_geometry_round_trips() {
        let feature = Feature::new(None, Properties::new());
        let text = serde_json::to_string(&feature).unwrap();
        assert!(text.contains("\"geometry\":null"));
        assert!(!text.contains("\"id\""));

        let back: Feature = serde_json::from_str(&text).unwrap();
        assert_eq!(back, feature);
    }

    #[test]
    fn test_rejects_wrong_type_tag() {
        let text = r#"{"type":"Topology","name":"x","crs":{"type":"name","properties":{"name":"EPSG:4326"}},"features":[]}"#;
        assert!(serde_json::from_str::<FeatureCollection>(text).is_err());
    }

    #[test]
    fn test_position_count() {
        let polygon = Geometry::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0]; 4], vec![vec![0.0, 0.0]; 5]],
            vec![vec![vec![1.0, 1.0]; 4]],
        ]);
        assert_eq!(polygon.position_count(), 13);
        assert_eq!(polygon.type_name(), "MultiPolygon");
        assert_eq!(Geometry::Point(vec![1.0, 2.0]).position_count(), 1);
    }

    #[test]
    fn test_new_collection_is_empty_wgs84() {
        let collection = FeatureCollection::new("roads-1");
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
        assert_eq!(collection.crs.name(), WGS84_CRS_NAME);
    }
}
