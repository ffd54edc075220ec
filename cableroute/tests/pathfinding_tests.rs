//! Tests for grid pathfinding and path simplification

use cableroute::pathfinding::DEFAULT_GRID_SIZE;
use cableroute::prelude::*;
use cableroute::{simplify_path, FallbackReason};

fn open_plane() -> GridPathFinder {
    GridPathFinder::new(1000.0, 1000.0, vec![], DEFAULT_GRID_SIZE).expect("valid grid")
}

#[test]
fn test_snap_leaves_grid_points_unchanged() {
    let finder = open_plane();
    for &(x, y) in &[(0.0, 0.0), (50.0, 100.0), (950.0, 1000.0), (-50.0, 250.0)] {
        let p = Point::new(x, y);
        assert_eq!(finder.snap(p), p, "snapping {:?}", p);
    }
}

#[test]
fn test_open_plane_row_scenario() {
    let result = open_plane().find_path(Point::new(0.0, 0.0), Point::new(200.0, 0.0));

    assert!(result.is_found());
    assert_eq!(
        result.path(),
        &[Point::new_3d(0.0, 0.0, 0.0), Point::new_3d(200.0, 0.0, 0.0)]
    );
}

#[test]
fn test_open_plane_column_and_diagonal() {
    let finder = open_plane();

    let column = finder.find_path(Point::new(300.0, 100.0), Point::new(300.0, 700.0));
    assert_eq!(column.path(), &[Point::new(300.0, 100.0), Point::new(300.0, 700.0)]);

    let diagonal = finder.find_path(Point::new(500.0, 500.0), Point::new(200.0, 200.0));
    assert_eq!(diagonal.path(), &[Point::new(500.0, 500.0), Point::new(200.0, 200.0)]);
}

#[test]
fn test_open_plane_endpoints_match_snapped_inputs() {
    let finder = open_plane();
    let start = Point::new(37.0, 412.0);
    let end = Point::new(688.0, 91.0);
    let result = finder.find_path(start, end);

    assert!(result.is_found());
    let path = result.path();
    assert_eq!(path.first().copied(), Some(finder.snap(start)));
    assert_eq!(path.last().copied(), Some(finder.snap(end)));
    assert!(path.iter().all(|p| p.z == 0.0));
}

#[test]
fn test_wall_spanning_plane_returns_original_endpoints() {
    let wall = Obstacle::new(480.0, 0.0, 40.0, 1000.0);
    let finder = GridPathFinder::new(1000.0, 1000.0, vec![wall], DEFAULT_GRID_SIZE).unwrap();
    let start = Point::new(111.0, 222.0);
    let end = Point::new(888.0, 777.0);

    let result = finder.find_path(start, end);

    assert!(!result.is_found());
    assert_eq!(result.fallback_reason(), Some(FallbackReason::Unreachable));
    assert_eq!(result.path(), &[start, end]);
}

#[test]
fn test_path_avoids_every_obstacle() {
    let obstacles = vec![
        Obstacle::new(180.0, 0.0, 40.0, 700.0),
        Obstacle::new(480.0, 300.0, 40.0, 700.0),
        Obstacle::new(680.0, 100.0, 200.0, 80.0),
    ];
    let finder = GridPathFinder::new(1000.0, 1000.0, obstacles.clone(), DEFAULT_GRID_SIZE).unwrap();
    let result = finder.find_path(Point::new(50.0, 50.0), Point::new(900.0, 100.0));

    assert!(result.is_found());
    let path = result.path();

    // Walk every grid step along each simplified segment
    for segment in path.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let steps = ((b.x - a.x).abs().max((b.y - a.y).abs()) / DEFAULT_GRID_SIZE).round() as i64;
        for i in 0..=steps {
            let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            for o in &obstacles {
                assert!(!o.contains(x, y), "({}, {}) lies inside {:?}", x, y, o);
            }
        }
    }
}

#[test]
fn test_search_is_deterministic() {
    let obstacles = vec![Obstacle::new(280.0, 200.0, 40.0, 600.0)];
    let finder = GridPathFinder::new(1000.0, 1000.0, obstacles, DEFAULT_GRID_SIZE).unwrap();
    let first = finder.find_path(Point::new(100.0, 500.0), Point::new(700.0, 450.0));
    for _ in 0..5 {
        assert_eq!(finder.find_path(Point::new(100.0, 500.0), Point::new(700.0, 450.0)), first);
    }
}

#[test]
fn test_simplify_collinear_and_corner_triples() {
    let collinear = vec![Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 200.0)];
    assert_eq!(
        simplify_path(&collinear),
        vec![Point::new(0.0, 0.0), Point::new(100.0, 200.0)]
    );

    let corner = vec![Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 100.0)];
    assert_eq!(simplify_path(&corner), corner);
}

#[test]
fn test_coarser_grid_changes_snapping() {
    let finder = GridPathFinder::new(1000.0, 1000.0, vec![], 100.0).unwrap();
    let result = finder.find_path(Point::new(40.0, 40.0), Point::new(260.0, 40.0));
    assert_eq!(result.path(), &[Point::new(0.0, 0.0), Point::new(300.0, 0.0)]);
}
