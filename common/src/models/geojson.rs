// common/src/models/geojson.rs
use serde::{Deserialize, Serialize};

/// GeoJSON feature collection of point features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: PointProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointProperties {
    pub speed: f64,
    pub timestamp: String,
    pub trip_id: String,
    pub trip_start: String,
    pub trip_end: String,
    pub privacy_zone: u8,
    pub color: String,
    #[serde(rename = "point-color")]
    pub point_color: String,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature {
    pub fn point(longitude: f64, latitude: f64, properties: PointProperties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: [longitude, latitude],
            },
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_feature_serializes_as_geojson() {
        let mut collection = FeatureCollection::new();
        collection.add_feature(Feature::point(
            13.4,
            52.5,
            PointProperties {
                speed: 42.0,
                timestamp: "2024-05-01T10:00:00Z".to_string(),
                trip_id: "trip-1".to_string(),
                trip_start: "start".to_string(),
                trip_end: "end".to_string(),
                privacy_zone: 1,
                color: "yellow".to_string(),
                point_color: "yellow".to_string(),
            },
        ));

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(value["features"][0]["geometry"]["coordinates"][0], 13.4);
        assert_eq!(value["features"][0]["properties"]["point-color"], "yellow");
        assert_eq!(value["features"][0]["properties"]["privacy_zone"], 1);
    }
}
