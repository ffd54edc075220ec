//! Collinear vertex reduction for grid paths.

use crate::geometry::{collinear_2d, Point};

/// Remove interior vertices that lie exactly on the line through their
/// neighbors. The first and last points are always kept and paths of two
/// points or fewer come back unchanged.
///
/// Neighbors are taken from the input sequence, so a straight run of any
/// length collapses to its two end vertices.
pub fn simplify_path(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut simplified = Vec::with_capacity(points.len());
    simplified.push(points[0]);
    for window in points.windows(3) {
        let (prev, current, next) = (&window[0], &window[1], &window[2]);
        if !collinear_2d(prev, current, next) {
            simplified.push(*current);
        }
    }
    simplified.push(points[points.len() - 1]);
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_collinear_middle_removed() {
        let path = pts(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
        assert_eq!(simplify_path(&path), pts(&[(0.0, 0.0), (100.0, 0.0)]));
    }

    #[test]
    fn test_diagonal_run_collapses() {
        let path = pts(&[(0.0, 0.0), (50.0, 50.0), (100.0, 100.0), (150.0, 150.0)]);
        assert_eq!(simplify_path(&path), pts(&[(0.0, 0.0), (150.0, 150.0)]));
    }

    #[test]
    fn test_corner_retained() {
        let path = pts(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
        assert_eq!(simplify_path(&path), path);
    }

    #[test]
    fn test_l_shape_keeps_only_corner() {
        let path = pts(&[
            (0.0, 0.0),
            (50.0, 0.0),
            (100.0, 0.0),
            (100.0, 50.0),
            (100.0, 100.0),
        ]);
        assert_eq!(
            simplify_path(&path),
            pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)])
        );
    }

    #[test]
    fn test_short_paths_unchanged() {
        assert!(simplify_path(&[]).is_empty());
        let one = pts(&[(5.0, 5.0)]);
        assert_eq!(simplify_path(&one), one);
        let two = pts(&[(0.0, 0.0), (50.0, 50.0)]);
        assert_eq!(simplify_path(&two), two);
    }
}
