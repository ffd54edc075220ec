//! Route vertices as consumed by the metrics calculator.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One vertex of a cable route. Order within a route is significant: it
/// fixes the traversal direction and which points form a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Unique within a route
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RoutePoint {
    pub fn new(id: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            z,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn position(&self) -> Point {
        Point::new_3d(self.x, self.y, self.z)
    }

    /// Build route points from a drawing-space path.
    ///
    /// Coordinates are multiplied by `metres_per_unit` and every point is
    /// lifted to `height_m`. Ids are fresh UUIDs; labels run `P1..Pn`.
    pub fn from_path(path: &[Point], metres_per_unit: f64, height_m: f64) -> Vec<RoutePoint> {
        path.iter()
            .enumerate()
            .map(|(i, p)| {
                let scaled = p.scaled(metres_per_unit);
                RoutePoint::new(
                    uuid::Uuid::new_v4().to_string(),
                    scaled.x,
                    scaled.y,
                    scaled.z + height_m,
                )
                .with_label(format!("P{}", i + 1))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_path_scales_and_labels() {
        let path = vec![Point::new(0.0, 0.0), Point::new(200.0, 0.0), Point::new(200.0, 100.0)];
        let points = RoutePoint::from_path(&path, 0.01, 2.5);

        assert_eq!(points.len(), 3);
        assert_eq!(points[1].position(), Point::new_3d(2.0, 0.0, 2.5));
        assert_eq!(points[2].label.as_deref(), Some("P3"));

        let ids: HashSet<_> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 3, "ids must be unique within a route");
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"id": "a", "x": 1.0, "y": 2.0}"#;
        let point: RoutePoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.z, 0.0);
        assert!(point.label.is_none());
    }
}
