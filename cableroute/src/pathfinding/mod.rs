//! Route Pathfinding Module
//!
//! Grid-based A* search that steers a cable route around rectangular
//! obstacles, plus the collinear simplification applied to every found path.
//!
//! ```rust
//! use cableroute::geometry::{Obstacle, Point};
//! use cableroute::pathfinding::{GridPathFinder, DEFAULT_GRID_SIZE};
//!
//! let finder = GridPathFinder::new(
//!     1000.0,
//!     1000.0,
//!     vec![Obstacle::new(80.0, 0.0, 40.0, 600.0)],
//!     DEFAULT_GRID_SIZE,
//! )
//! .unwrap();
//!
//! let result = finder.find_path(Point::new(0.0, 100.0), Point::new(300.0, 100.0));
//! assert!(result.is_found());
//! ```

pub mod grid;
pub mod simplify;

pub use grid::{FallbackReason, GridPathFinder, PathResult, DEFAULT_GRID_SIZE};
pub use simplify::simplify_path;
