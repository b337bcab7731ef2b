//! Greenway facility classification.
//!
//! Segments carry two integer attributes: `seg_type` (what kind of
//! facility) and `fac_stat` (existing, designed or envisioned). Together
//! they map to the labels used in the regional greenway plan.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::feature::{Feature, FeatureCollection};

/// Attribute holding the segment type code.
pub const SEG_TYPE_FIELD: &str = "seg_type";

/// Attribute holding the facility status code.
pub const FAC_STAT_FIELD: &str = "fac_stat";

/// Facility status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityStatus {
    Existing = 1,
    Designed = 2,
    Envisioned = 3,
}

impl FacilityStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Existing),
            2 => Some(Self::Designed),
            3 => Some(Self::Envisioned),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Existing => "Existing",
            Self::Designed => "Designed",
            Self::Envisioned => "Envisioned",
        }
    }
}

/// Display name of a segment type code.
pub fn segment_type_name(code: i64) -> Option<&'static str> {
    match code {
        1 | 6 => Some("Shared Use Path"),
        2 => Some("Protected Bike Lane"),
        3 => Some("Bike Lane"),
        4 | 5 => Some("Shared Street"),
        9 => Some("Gap"),
        11 | 12 => Some("Foot Trail"),
        _ => None,
    }
}

/// Label for a segment type and facility status pair.
///
/// Returns `None` for combinations the plan does not name, such as a
/// suburban shared street that is only envisioned.
pub fn classify(seg_type: i64, fac_stat: i64) -> Option<String> {
    let existing = fac_stat == FacilityStatus::Existing as i64;
    let label = match seg_type {
        6 => "Shared Use Path - Unimproved Surface",
        9 => "Gap - Facility Type TBD",
        2 if existing => "Protected Bike Lane and Sidewalk",
        2 => "Protected Bike Lane - Design or Construction",
        3 if existing => "Bike Lane and Sidewalk",
        3 => "Bike Lane - Design or Construction",
        4 if matches!(fac_stat, 1 | 3) => "Shared Street - Urban",
        5 if existing => "Shared Street - Suburban",
        11 | 12 if matches!(fac_stat, 2 | 3) => "Foot Trail - Envisioned",
        4 | 5 | 11 | 12 => return None,
        _ => {
            let segment = segment_type_name(seg_type)?;
            let status = FacilityStatus::from_code(fac_stat)?;
            return Some(format!("{} - {}", segment, status.name()));
        }
    };
    Some(label.to_string())
}

/// Classify a feature from its `seg_type` and `fac_stat` properties.
///
/// Features missing either attribute are unclassified.
pub fn classify_feature(feature: &Feature) -> Option<String> {
    let seg_type = feature.property(SEG_TYPE_FIELD).and_then(as_code)?;
    let fac_stat = feature.property(FAC_STAT_FIELD).and_then(as_code)?;
    classify(seg_type, fac_stat)
}

/// Integer attribute codes sometimes arrive as doubles.
fn as_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Features and vertices counted under one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FacilityTally {
    pub features: usize,
    pub vertices: usize,
}

/// Per-label tally of a feature collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacilitySummary {
    pub name: String,
    pub total: FacilityTally,
    pub facilities: BTreeMap<String, FacilityTally>,
    pub unclassified: FacilityTally,
}

impl FacilitySummary {
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let mut summary = Self {
            name: collection.name.clone(),
            ..Self::default()
        };
        for feature in &collection.features {
            summary.add(feature);
        }
        summary
    }

    fn add(&mut self, feature: &Feature) {
        let vertices = feature
            .geometry
            .as_ref()
            .map_or(0, |geometry| geometry.position_count());
        let tally = match classify_feature(feature) {
            Some(label) => self.facilities.entry(label).or_default(),
            None => &mut self.unclassified,
        };
        tally.features += 1;
        tally.vertices += vertices;
        self.total.features += 1;
        self.total.vertices += vertices;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Geometry, Properties};
    use serde_json::json;

    fn segment(seg_type: Value, fac_stat: Value, vertices: usize) -> Feature {
        let mut properties = Properties::new();
        properties.insert(SEG_TYPE_FIELD.to_string(), seg_type);
        properties.insert(FAC_STAT_FIELD.to_string(), fac_stat);
        let line = (0..vertices).map(|i| vec![i as f64, 0.0]).collect();
        Feature::new(Some(Geometry::LineString(line)), properties)
    }

    #[test]
    fn test_fixed_labels_ignore_status() {
        assert_eq!(
            classify(6, 3).as_deref(),
            Some("Shared Use Path - Unimproved Surface")
        );
        assert_eq!(classify(9, 1).as_deref(), Some("Gap - Facility Type TBD"));
    }

    #[test]
    fn test_bike_lanes_split_on_existing() {
        assert_eq!(
            classify(2, 1).as_deref(),
            Some("Protected Bike Lane and Sidewalk")
        );
        assert_eq!(
            classify(2, 3).as_deref(),
            Some("Protected Bike Lane - Design or Construction")
        );
        assert_eq!(classify(3, 1).as_deref(), Some("Bike Lane and Sidewalk"));
        assert_eq!(
            classify(3, 2).as_deref(),
            Some("Bike Lane - Design or Construction")
        );
    }

    #[test]
    fn test_shared_streets() {
        assert_eq!(classify(4, 1).as_deref(), Some("Shared Street - Urban"));
        assert_eq!(classify(4, 3).as_deref(), Some("Shared Street - Urban"));
        assert_eq!(classify(4, 2), None);
        assert_eq!(classify(5, 1).as_deref(), Some("Shared Street - Suburban"));
        assert_eq!(classify(5, 3), None);
    }

    #[test]
    fn test_foot_trails() {
        assert_eq!(classify(11, 2).as_deref(), Some("Foot Trail - Envisioned"));
        assert_eq!(classify(12, 3).as_deref(), Some("Foot Trail - Envisioned"));
        assert_eq!(classify(12, 1), None);
    }

    #[test]
    fn test_shared_use_path_uses_status_name() {
        assert_eq!(classify(1, 1).as_deref(), Some("Shared Use Path - Existing"));
        assert_eq!(classify(1, 2).as_deref(), Some("Shared Use Path - Designed"));
        assert_eq!(
            classify(1, 3).as_deref(),
            Some("Shared Use Path - Envisioned")
        );
        assert_eq!(classify(1, 7), None);
        assert_eq!(classify(42, 1), None);
    }

    #[test]
    fn test_missing_attribute_is_unclassified() {
        let feature = Feature::new(None, Properties::new());
        assert_eq!(classify_feature(&feature), None);

        let feature = segment(json!(3), Value::Null, 2);
        assert_eq!(classify_feature(&feature), None);
    }

    #[test]
    fn test_double_codes_accepted() {
        let feature = segment(json!(3.0), json!(1.0), 2);
        assert_eq!(
            classify_feature(&feature).as_deref(),
            Some("Bike Lane and Sidewalk")
        );
    }

    #[test]
    fn test_summary_tallies_features_and_vertices() {
        let collection = FeatureCollection::new("greenway_segments_null").with_features(vec![
            segment(json!(3), json!(1), 4),
            segment(json!(3), json!(1), 2),
            segment(json!(9), json!(2), 3),
            segment(json!(5), json!(3), 5),
        ]);

        let summary = FacilitySummary::from_collection(&collection);

        assert_eq!(summary.name, "greenway_segments_null");
        assert_eq!(
            summary.total,
            FacilityTally {
                features: 4,
                vertices: 14
            }
        );
        assert_eq!(
            summary.facilities["Bike Lane and Sidewalk"],
            FacilityTally {
                features: 2,
                vertices: 6
            }
        );
        assert_eq!(summary.facilities["Gap - Facility Type TBD"].features, 1);
        assert_eq!(summary.unclassified.features, 1);
        assert_eq!(summary.unclassified.vertices, 5);
    }
}
