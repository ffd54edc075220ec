//! CableRoute - cable route design and compliance library
//!
//! This library finds obstacle-avoiding cable routes on a grid, derives the
//! engineering quantities of a route (length, bends, supports, cost) and
//! checks them against a battery of BS 7671 style installation rules.
//!
//! # Quick Start
//!
//! ```no_run
//! use cableroute::{CableRouteCore, RouteRequest, RouteSettings};
//! use std::path::Path;
//!
//! let settings = RouteSettings::default();
//! let analysis = CableRouteCore::analyze_file(
//!     Path::new("route.json"),
//!     &settings,
//! ).unwrap();
//!
//! for check in &analysis.checks {
//!     println!("{}: {} ({})", check.regulation, check.message, check.status);
//! }
//! ```
//!
//! # Features
//!
//! - **Pathfinding**: A* over an 8-connected grid with rectangular obstacles
//! - **Route metrics**: length, bends, supports, complexity, cost estimate
//! - **Compliance**: voltage drop, current capacity, bend radius, support
//!   spacing, route length, mechanical protection and reminders
//! - **Clash detection**: bounding-box clashes between disciplines

pub mod clash;
pub mod compliance;
pub mod config;
pub mod core;
pub mod geometry;
pub mod metrics;
pub mod pathfinding;
pub mod route;

// Re-export main types
pub use crate::core::{CableRouteCore, CableRouteError, RouteAnalysis, RouteRequest};
pub use clash::{detect_clashes, BimElement, Clash, ClashSettings, ClashSeverity, Discipline};
pub use compliance::{
    evaluate_compliance, CableParameters, ComplianceCheck, ComplianceEvaluator, ComplianceRule,
    ComplianceStatus, ComplianceSummary, ElectricalParameters,
};
pub use config::RouteSettings;
pub use geometry::{Obstacle, Point};
pub use metrics::{CableSpec, Complexity, RouteMetrics, RouteMetricsCalculator};
pub use pathfinding::{simplify_path, FallbackReason, GridPathFinder, PathResult};
pub use route::RoutePoint;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CableRouteCore, CableRouteError, CableSpec, ComplianceCheck, ComplianceStatus,
        ElectricalParameters, GridPathFinder, Obstacle, PathResult, Point, RouteAnalysis,
        RouteMetrics, RouteRequest, RouteSettings,
    };
}
