//! A* search over a uniform grid with rectangular obstacles.
//!
//! The plane `[0, width] × [0, height]` is quantized into cells of
//! `grid_size`. Search runs over the 8-connected cell graph, paying the
//! true Euclidean length of every step, and the resulting polyline is
//! reduced to its corner vertices.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::simplify::simplify_path;
use crate::core::CableRouteError;
use crate::geometry::{Obstacle, Point};

pub const DEFAULT_GRID_SIZE: f64 = 50.0;

/// Neighbor offsets: orthogonal moves first (N, E, S, W), then diagonals.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Why a search did not produce a connected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The open set was exhausted without reaching the goal cell.
    Unreachable,
    /// The node-expansion budget ran out first.
    BudgetExhausted,
    /// Start or end had a non-finite coordinate.
    InvalidEndpoint,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Unreachable => write!(f, "goal unreachable"),
            FallbackReason::BudgetExhausted => write!(f, "search budget exhausted"),
            FallbackReason::InvalidEndpoint => write!(f, "invalid endpoint"),
        }
    }
}

/// Outcome of a path search.
///
/// A `Fallback` path is the straight segment between the caller's original
/// (unsnapped) endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathResult {
    Found { path: Vec<Point> },
    Fallback { path: Vec<Point>, reason: FallbackReason },
}

impl PathResult {
    pub fn path(&self) -> &[Point] {
        match self {
            PathResult::Found { path } | PathResult::Fallback { path, .. } => path,
        }
    }

    pub fn into_path(self) -> Vec<Point> {
        match self {
            PathResult::Found { path } | PathResult::Fallback { path, .. } => path,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            PathResult::Found { .. } => None,
            PathResult::Fallback { reason, .. } => Some(*reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Cell {
    gx: i64,
    gy: i64,
}

impl Cell {
    /// `None` when the offset leaves the `i64` index range, which happens
    /// for endpoints far outside the plane.
    fn offset(self, dx: i64, dy: i64) -> Option<Cell> {
        Some(Cell {
            gx: self.gx.checked_add(dx)?,
            gy: self.gy.checked_add(dy)?,
        })
    }
}

/// Search record. Nodes live in an arena for the duration of one search;
/// `parent` is an arena index and the arena index doubles as insertion order.
#[derive(Debug, Clone)]
struct GridNode {
    cell: Cell,
    g: f64,
    h: f64,
    f: f64,
    parent: Option<usize>,
}

/// Heap entry. Lowest `f` pops first; equal `f` pops in insertion order.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior in BinaryHeap
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grid pathfinder over a bounded plane with rectangular obstacles.
#[derive(Debug, Clone)]
pub struct GridPathFinder {
    width: f64,
    height: f64,
    obstacles: Vec<Obstacle>,
    grid_size: f64,
    diagonal_penalty: f64,
    max_expansions: Option<usize>,
}

impl GridPathFinder {
    /// Create a finder for the plane `[0, width] × [0, height]`.
    ///
    /// Fails when `grid_size` is not a positive finite number or a bound is
    /// negative or non-finite.
    pub fn new(
        width: f64,
        height: f64,
        obstacles: Vec<Obstacle>,
        grid_size: f64,
    ) -> Result<Self, CableRouteError> {
        if !grid_size.is_finite() || grid_size <= 0.0 {
            return Err(CableRouteError::InvalidGrid(format!(
                "grid size must be a positive number, got {}",
                grid_size
            )));
        }
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(CableRouteError::InvalidGrid(format!(
                "plane bounds must be non-negative, got {} x {}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            obstacles,
            grid_size,
            diagonal_penalty: 1.0,
            max_expansions: None,
        })
    }

    /// Multiplier applied to the cost of diagonal steps. `1.0` charges the
    /// plain Euclidean length; larger values steer routes toward orthogonal
    /// runs. Values below `1.0` are clamped to `1.0` so the heuristic stays
    /// admissible.
    pub fn with_diagonal_penalty(mut self, penalty: f64) -> Self {
        self.diagonal_penalty = if penalty.is_finite() { penalty.max(1.0) } else { 1.0 };
        self
    }

    /// Abandon the search after this many node expansions.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Round `x` and `y` independently to the nearest grid multiple. Halves
    /// round toward positive infinity. `z` is left untouched.
    pub fn snap(&self, point: Point) -> Point {
        let cell = self.cell_of(point);
        let snapped = self.cell_point(cell);
        Point::new_3d(snapped.x, snapped.y, point.z)
    }

    /// Find a path from `start` to `end`.
    ///
    /// Endpoints are snapped to the grid, so the first and last vertices of a
    /// found path may differ from the inputs by up to half a grid step. When
    /// no connected path exists the straight segment `[start, end]` is
    /// returned as a [`PathResult::Fallback`].
    pub fn find_path(&self, start: Point, end: Point) -> PathResult {
        if !is_finite(&start) || !is_finite(&end) {
            tracing::warn!("Path search skipped: non-finite endpoint");
            return fallback(start, end, FallbackReason::InvalidEndpoint);
        }

        let start_cell = self.cell_of(start);
        let goal_cell = self.cell_of(end);
        let goal_point = self.cell_point(goal_cell);

        let mut nodes: Vec<GridNode> = Vec::new();
        let mut open = BinaryHeap::new();
        let mut open_index: HashMap<Cell, usize> = HashMap::new();
        let mut closed: HashSet<Cell> = HashSet::new();

        let h = self.cell_point(start_cell).distance_2d(&goal_point);
        nodes.push(GridNode {
            cell: start_cell,
            g: 0.0,
            h,
            f: h,
            parent: None,
        });
        open_index.insert(start_cell, 0);
        open.push(OpenEntry { f: h, index: 0 });

        let mut expanded = 0usize;

        while let Some(entry) = open.pop() {
            let current = &nodes[entry.index];
            // Superseded by a cheaper relaxation, or already expanded
            if entry.f != current.f || closed.contains(&current.cell) {
                continue;
            }

            let current_cell = current.cell;
            let current_g = current.g;

            if current_cell == goal_cell {
                let path = simplify_path(&self.reconstruct(&nodes, entry.index));
                tracing::debug!(
                    "Path found after {} expansions ({} vertices after simplification)",
                    expanded,
                    path.len()
                );
                return PathResult::Found { path };
            }

            if self.max_expansions.is_some_and(|max| expanded >= max) {
                tracing::warn!(
                    "Path search abandoned after {} expansions, using straight line",
                    expanded
                );
                return fallback(start, end, FallbackReason::BudgetExhausted);
            }

            open_index.remove(&current_cell);
            closed.insert(current_cell);
            expanded += 1;

            let current_point = self.cell_point(current_cell);

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let Some(cell) = current_cell.offset(dx, dy) else {
                    continue;
                };
                if closed.contains(&cell) || !self.is_walkable(cell) {
                    continue;
                }

                let neighbor_point = self.cell_point(cell);
                let mut step = current_point.distance_2d(&neighbor_point);
                if dx != 0 && dy != 0 {
                    step *= self.diagonal_penalty;
                }
                let tentative_g = current_g + step;

                match open_index.get(&cell) {
                    Some(&index) => {
                        let node = &mut nodes[index];
                        if tentative_g < node.g {
                            node.g = tentative_g;
                            node.f = node.g + node.h;
                            node.parent = Some(entry.index);
                            open.push(OpenEntry { f: node.f, index });
                        }
                    }
                    None => {
                        let h = neighbor_point.distance_2d(&goal_point);
                        let index = nodes.len();
                        nodes.push(GridNode {
                            cell,
                            g: tentative_g,
                            h,
                            f: tentative_g + h,
                            parent: Some(entry.index),
                        });
                        open_index.insert(cell, index);
                        open.push(OpenEntry {
                            f: tentative_g + h,
                            index,
                        });
                    }
                }
            }
        }

        tracing::warn!(
            "No path between ({}, {}) and ({}, {}) after {} expansions, using straight line",
            start.x,
            start.y,
            end.x,
            end.y,
            expanded
        );
        fallback(start, end, FallbackReason::Unreachable)
    }

    /// Route through every waypoint in order by chaining [`Self::find_path`]
    /// over consecutive pairs. Legs are joined without repeating the shared
    /// vertex and the joined polyline is simplified again. If any leg falls
    /// back, the whole result is a fallback carrying the first leg's reason.
    pub fn find_route(&self, waypoints: &[Point]) -> PathResult {
        match waypoints {
            [] => return PathResult::Found { path: Vec::new() },
            [only] => {
                let snapped = self.snap(*only);
                return PathResult::Found {
                    path: vec![Point::new(snapped.x, snapped.y)],
                };
            }
            _ => {}
        }

        let mut joined: Vec<Point> = Vec::new();
        let mut failure: Option<FallbackReason> = None;

        for (leg_index, pair) in waypoints.windows(2).enumerate() {
            let leg = self.find_path(pair[0], pair[1]);
            if let Some(reason) = leg.fallback_reason() {
                tracing::debug!("Route leg {} fell back: {}", leg_index + 1, reason);
                failure.get_or_insert(reason);
            }
            let mut points = leg.into_path();
            if joined.last() == points.first() {
                points.remove(0);
            }
            joined.extend(points);
        }

        let path = simplify_path(&joined);
        match failure {
            None => PathResult::Found { path },
            Some(reason) => PathResult::Fallback { path, reason },
        }
    }

    fn cell_of(&self, point: Point) -> Cell {
        Cell {
            gx: (point.x / self.grid_size + 0.5).floor() as i64,
            gy: (point.y / self.grid_size + 0.5).floor() as i64,
        }
    }

    fn cell_point(&self, cell: Cell) -> Point {
        Point::new(cell.gx as f64 * self.grid_size, cell.gy as f64 * self.grid_size)
    }

    fn is_walkable(&self, cell: Cell) -> bool {
        let p = self.cell_point(cell);
        if p.x < 0.0 || p.x > self.width || p.y < 0.0 || p.y > self.height {
            return false;
        }
        !self.obstacles.iter().any(|o| o.contains(p.x, p.y))
    }

    fn reconstruct(&self, nodes: &[GridNode], goal_index: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            path.push(self.cell_point(nodes[index].cell));
            cursor = nodes[index].parent;
        }
        path.reverse();
        path
    }
}

fn is_finite(p: &Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

fn fallback(start: Point, end: Point, reason: FallbackReason) -> PathResult {
    PathResult::Fallback {
        path: vec![start, end],
        reason,
    }
}
