// web-server/src/geo.rs
//! Turns zipped telemetry samples into a speed-colored GeoJSON trace.

use common::models::geojson::{Feature, FeatureCollection, PointProperties};
use common::models::telemetry::LocationSample;
use common::TripMapResponse;

use crate::resolution::ResolvedTrip;

/// Upper speed bound (inclusive) and color, ascending
pub const SPEED_GRADIENT: [(f64, &str); 5] = [
    (10.0, "blue"),
    (30.0, "green"),
    (50.0, "yellow"),
    (70.0, "orange"),
    (90.0, "red"),
];

pub const OVER_SPEED_COLOR: &str = "black";

/// Points inside a trip are always marked as privacy-zone points
const PRIVACY_ZONE: u8 = 1;

pub fn color_for_speed(speed: f64) -> &'static str {
    SPEED_GRADIENT
        .iter()
        .find(|(limit, _)| speed <= *limit)
        .map(|(_, color)| *color)
        .unwrap_or(OVER_SPEED_COLOR)
}

/// One point feature per sample, in sample order, plus the parallel color list
pub fn build_trace(samples: &[LocationSample], trip: &ResolvedTrip) -> TripMapResponse {
    let mut geojson = FeatureCollection::new();
    let mut speed_gradient = Vec::with_capacity(samples.len());

    for sample in samples {
        let color = color_for_speed(sample.speed);

        geojson.add_feature(Feature::point(
            sample.longitude,
            sample.latitude,
            PointProperties {
                speed: sample.speed,
                timestamp: sample.timestamp.clone(),
                trip_id: trip.trip_id.clone(),
                trip_start: trip.start.clone(),
                trip_end: trip.end.clone(),
                privacy_zone: PRIVACY_ZONE,
                color: color.to_string(),
                point_color: color.to_string(),
            },
        ));
        speed_gradient.push(color.to_string());
    }

    TripMapResponse {
        geojson,
        speed_gradient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip() -> ResolvedTrip {
        ResolvedTrip {
            trip_id: "trip-1".to_string(),
            token_id: 17,
            start: "2024-02-01T08:00:00Z".to_string(),
            end: "2024-02-01T09:00:00Z".to_string(),
        }
    }

    fn sample(speed: f64, n: usize) -> LocationSample {
        LocationSample {
            latitude: 52.0 + n as f64,
            longitude: 13.0 + n as f64,
            speed,
            timestamp: format!("t{}", n),
        }
    }

    #[test]
    fn test_gradient_boundaries() {
        assert_eq!(color_for_speed(0.0), "blue");
        assert_eq!(color_for_speed(10.0), "blue");
        assert_eq!(color_for_speed(10.01), "green");
        assert_eq!(color_for_speed(30.0), "green");
        assert_eq!(color_for_speed(30.5), "yellow");
        assert_eq!(color_for_speed(50.0), "yellow");
        assert_eq!(color_for_speed(70.0), "orange");
        assert_eq!(color_for_speed(90.0), "red");
        assert_eq!(color_for_speed(90.1), "black");
        assert_eq!(color_for_speed(250.0), "black");
    }

    #[test]
    fn test_trace_preserves_length_and_order() {
        let samples: Vec<_> = [5.0, 95.0, 42.0]
            .iter()
            .enumerate()
            .map(|(n, speed)| sample(*speed, n))
            .collect();

        let response = build_trace(&samples, &trip());

        assert_eq!(response.geojson.features.len(), 3);
        assert_eq!(response.speed_gradient, vec!["blue", "black", "yellow"]);

        for (n, feature) in response.geojson.features.iter().enumerate() {
            assert_eq!(feature.geometry.coordinates, [13.0 + n as f64, 52.0 + n as f64]);
            assert_eq!(feature.properties.timestamp, format!("t{}", n));
            assert_eq!(feature.properties.color, response.speed_gradient[n]);
            assert_eq!(feature.properties.trip_id, "trip-1");
            assert_eq!(feature.properties.trip_end, "2024-02-01T09:00:00Z");
            assert_eq!(feature.properties.privacy_zone, 1);
        }
    }

    #[test]
    fn test_empty_samples_give_empty_trace() {
        let response = build_trace(&[], &trip());
        assert!(response.geojson.features.is_empty());
        assert!(response.speed_gradient.is_empty());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["geojson"]["type"], "FeatureCollection");
        assert_eq!(value["speedGradient"], serde_json::json!([]));
    }
}
