//! Geometric value types shared by the router, the metrics calculator and
//! clash detection.

use serde::{Deserialize, Serialize};

/// A point in drawing space. `z` is the vertical offset of a route point and
/// is ignored by the 2D grid search.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance including the vertical component.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Euclidean distance in the plan (x/y) only.
    pub fn distance_2d(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn scaled(&self, factor: f64) -> Point {
        Point::new_3d(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Exact planar collinearity test: `dx1*dy2 - dy1*dx2 == 0`.
///
/// Grid-snapped coordinates are exact multiples of the grid size, so no
/// tolerance is applied.
pub fn collinear_2d(a: &Point, b: &Point, c: &Point) -> bool {
    let dx1 = b.x - a.x;
    let dy1 = b.y - a.y;
    let dx2 = c.x - b.x;
    let dy2 = c.y - b.y;
    dx1 * dy2 - dy1 * dx2 == 0.0
}

/// Exact 3D collinearity test (all cross product components zero).
/// Reduces to [`collinear_2d`] when every `z` is equal.
pub fn collinear_3d(a: &Point, b: &Point, c: &Point) -> bool {
    let (ux, uy, uz) = (b.x - a.x, b.y - a.y, b.z - a.z);
    let (vx, vy, vz) = (c.x - b.x, c.y - b.y, c.z - b.z);
    let cx = uy * vz - uz * vy;
    let cy = uz * vx - ux * vz;
    let cz = ux * vy - uy * vx;
    cx == 0.0 && cy == 0.0 && cz == 0.0
}

/// Axis-aligned rectangular obstacle in the search plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment test: points on the rectangle edge are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_includes_height() {
        let a = Point::new_3d(0.0, 0.0, 0.0);
        let b = Point::new_3d(3.0, 4.0, 12.0);
        assert!((a.distance_to(&b) - 13.0).abs() < 1e-9);
        assert!((a.distance_2d(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_2d() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(50.0, 50.0);
        assert!(collinear_2d(&a, &b, &Point::new(100.0, 100.0)));
        assert!(!collinear_2d(&a, &b, &Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_collinear_3d_detects_vertical_turn() {
        let a = Point::new_3d(0.0, 0.0, 0.0);
        let b = Point::new_3d(1.0, 0.0, 0.0);
        let c = Point::new_3d(1.0, 0.0, 2.0);
        assert!(!collinear_3d(&a, &b, &c));
        assert!(collinear_3d(&a, &b, &Point::new_3d(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_obstacle_contains_is_inclusive() {
        let obstacle = Obstacle::new(100.0, 100.0, 50.0, 50.0);
        assert!(obstacle.contains(100.0, 100.0));
        assert!(obstacle.contains(150.0, 150.0));
        assert!(obstacle.contains(125.0, 130.0));
        assert!(!obstacle.contains(99.9, 120.0));
        assert!(!obstacle.contains(125.0, 150.1));
    }

    #[test]
    fn test_point_z_defaults_when_missing() {
        let p: Point = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(p, Point::new(1.0, 2.0));
    }
}
