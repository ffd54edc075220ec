//! Route analysis pipeline shared by the library API and the CLI.
//!
//! path search → route points → metrics → compliance findings

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clash::{detect_clashes, BimElement, Clash};
use crate::compliance::{
    CableParameters, ComplianceCheck, ComplianceEvaluator, ComplianceSummary, ElectricalParameters,
};
use crate::config::{PathfindingSettings, RouteSettings};
use crate::geometry::{Obstacle, Point};
use crate::metrics::{CableSpec, RouteMetrics, RouteMetricsCalculator};
use crate::pathfinding::{GridPathFinder, PathResult};
use crate::route::RoutePoint;

#[derive(Debug, thiserror::Error)]
pub enum CableRouteError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    #[error("Invalid route request: {0}")]
    InvalidRequest(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single cable run to design: the plane, its obstacles, the endpoints and
/// the circuit being installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub start: Point,
    pub end: Point,
    /// Intermediate points the route must pass through, in order
    #[serde(default)]
    pub waypoints: Vec<Point>,
    pub cable: CableSpec,
    pub electrical: ElectricalParameters,
    /// Height of the cable run above floor level (m)
    #[serde(default)]
    pub installation_height_m: f64,
}

impl RouteRequest {
    pub fn from_file(path: &Path) -> Result<Self, CableRouteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CableRouteError> {
        let request: RouteRequest = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), CableRouteError> {
        if !self.cable.diameter_mm.is_finite() || self.cable.diameter_mm < 0.0 {
            return Err(CableRouteError::InvalidRequest(format!(
                "cable diameter must be a non-negative number, got {}",
                self.cable.diameter_mm
            )));
        }
        if self.cable.cable_type.trim().is_empty() {
            return Err(CableRouteError::InvalidRequest(
                "cable type is required".to_string(),
            ));
        }
        let e = &self.electrical;
        if [e.load_current_a, e.voltage_v, e.cable_rating_a]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(CableRouteError::InvalidRequest(
                "electrical parameters must be non-negative numbers".to_string(),
            ));
        }
        if !self.installation_height_m.is_finite() {
            return Err(CableRouteError::InvalidRequest(
                "installation height must be a number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything computed for one route request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: PathResult,
    pub route_points: Vec<RoutePoint>,
    pub metrics: RouteMetrics,
    pub checks: Vec<ComplianceCheck>,
    pub summary: ComplianceSummary,
    pub generated_at: DateTime<Utc>,
}

impl RouteAnalysis {
    pub fn path_found(&self) -> bool {
        self.path.is_found()
    }

    pub fn has_failures(&self) -> bool {
        self.summary.has_failures()
    }

    pub fn has_warnings_or_failures(&self) -> bool {
        self.summary.has_warnings_or_failures()
    }
}

/// Core analysis API used by the CLI
pub struct CableRouteCore;

impl CableRouteCore {
    /// Path finder configured from the request's plane and the settings
    pub fn path_finder(
        request: &RouteRequest,
        settings: &RouteSettings,
    ) -> Result<GridPathFinder, CableRouteError> {
        Self::grid_path_finder(
            request.width,
            request.height,
            request.obstacles.clone(),
            &settings.pathfinding,
        )
    }

    /// Path finder for a bare plane, applying grid size, diagonal penalty
    /// and expansion budget from `pathfinding`
    pub fn grid_path_finder(
        width: f64,
        height: f64,
        obstacles: Vec<Obstacle>,
        pathfinding: &PathfindingSettings,
    ) -> Result<GridPathFinder, CableRouteError> {
        let mut finder = GridPathFinder::new(width, height, obstacles, pathfinding.grid_size)?
            .with_diagonal_penalty(pathfinding.diagonal_penalty);
        if let Some(max) = pathfinding.max_expansions {
            finder = finder.with_max_expansions(max);
        }
        Ok(finder)
    }

    /// Run the full pipeline for one request
    pub fn analyze(
        request: &RouteRequest,
        settings: &RouteSettings,
    ) -> Result<RouteAnalysis, CableRouteError> {
        request.validate()?;
        let finder = Self::path_finder(request, settings)?;

        tracing::info!(
            "Routing {} across {} x {} with {} obstacles",
            request.name.as_deref().unwrap_or("route"),
            request.width,
            request.height,
            request.obstacles.len()
        );

        let mut waypoints = Vec::with_capacity(request.waypoints.len() + 2);
        waypoints.push(request.start);
        waypoints.extend(request.waypoints.iter().copied());
        waypoints.push(request.end);

        let path = finder.find_route(&waypoints);
        if let Some(reason) = path.fallback_reason() {
            tracing::warn!("Route search fell back to a straight line: {}", reason);
        }

        let route_points = RoutePoint::from_path(
            path.path(),
            settings.units.metres_per_unit,
            request.installation_height_m,
        );

        let calculator = RouteMetricsCalculator::new(settings.metrics.clone());
        let metrics = calculator.compute(&route_points, &request.cable);

        let cable = CableParameters::from_metrics(&metrics);
        let checks = ComplianceEvaluator::with_default_rules().evaluate(
            Some(&metrics),
            &cable,
            &request.electrical,
        );
        let summary = ComplianceSummary::from_checks(&checks);

        tracing::info!(
            "Route analysed: {:.2} m, {} bends, {} fail / {} warning",
            metrics.total_length,
            metrics.bend_count,
            summary.fail,
            summary.warning
        );

        Ok(RouteAnalysis {
            name: request.name.clone(),
            path,
            route_points,
            metrics,
            checks,
            summary,
            generated_at: Utc::now(),
        })
    }

    /// Load a request from a JSON file and analyse it
    pub fn analyze_file(
        path: &Path,
        settings: &RouteSettings,
    ) -> Result<RouteAnalysis, CableRouteError> {
        let request = RouteRequest::from_file(path)?;
        Self::analyze(&request, settings)
    }

    /// Load a JSON array of elements and run clash detection on it
    pub fn check_clashes_file(
        path: &Path,
        settings: &RouteSettings,
    ) -> Result<Vec<Clash>, CableRouteError> {
        let content = std::fs::read_to_string(path)?;
        let elements: Vec<BimElement> = serde_json::from_str(&content)?;
        tracing::info!("Checking {} elements for clashes", elements.len());
        Ok(detect_clashes(&elements, &settings.clash))
    }
}
