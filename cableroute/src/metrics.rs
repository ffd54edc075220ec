//! Route Metrics Calculator
//!
//! Derives the engineering quantities of a route from its ordered points
//! and the cable being pulled:
//! - Total length (3D, metres)
//! - Bend count (direction changes at interior points)
//! - Support count (from the maximum support spacing of the cable)
//! - Complexity class (Low / Medium / High)
//! - Cost estimate (cable with waste allowance, supports, terminations)
//!
//! Metrics are a pure function of their inputs and are recomputed whenever
//! the route changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compliance::bs7671::{is_armoured_cable_type, max_support_spacing_mm};
use crate::config::{ComplexityThresholds, MetricsSettings};
use crate::geometry::collinear_3d;
use crate::route::RoutePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "Low"),
            Complexity::Medium => write!(f, "Medium"),
            Complexity::High => write!(f, "High"),
        }
    }
}

impl Complexity {
    pub fn classify(bend_count: u32, length_m: f64, thresholds: &ComplexityThresholds) -> Self {
        if bend_count > thresholds.high_bends || length_m > thresholds.high_length_m {
            Complexity::High
        } else if bend_count > thresholds.medium_bends || length_m > thresholds.medium_length_m {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

/// Cable being installed along a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSpec {
    pub cable_type: String,
    /// Overall cable diameter (mm)
    pub diameter_mm: f64,
    /// Overrides armour detection from the type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armoured: Option<bool>,
    /// Manually placed support count; estimated from spacing when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports: Option<u32>,
}

impl CableSpec {
    pub fn new(cable_type: impl Into<String>, diameter_mm: f64) -> Self {
        Self {
            cable_type: cable_type.into(),
            diameter_mm,
            armoured: None,
            supports: None,
        }
    }

    pub fn is_armoured(&self) -> bool {
        self.armoured
            .unwrap_or_else(|| is_armoured_cable_type(&self.cable_type))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Length ordered, including the waste allowance (m)
    pub cable_length_m: f64,
    pub unit_price: f64,
    pub cable_cost: f64,
    pub support_cost: f64,
    pub termination_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Metres
    pub total_length: f64,
    pub total_cost: f64,
    pub support_count: u32,
    pub bend_count: u32,
    pub complexity: Complexity,
    pub cable_type: String,
    pub diameter_mm: f64,
    pub is_armoured: bool,
    pub cost_breakdown: CostBreakdown,
}

impl RouteMetrics {
    /// Average distance between supports (mm). Support count is floored at
    /// one.
    pub fn average_support_spacing_mm(&self) -> f64 {
        self.total_length * 1000.0 / f64::from(self.support_count.max(1))
    }
}

/// Computes [`RouteMetrics`] using a price table and complexity thresholds
#[derive(Debug, Clone, Default)]
pub struct RouteMetricsCalculator {
    settings: MetricsSettings,
}

impl RouteMetricsCalculator {
    pub fn new(settings: MetricsSettings) -> Self {
        Self { settings }
    }

    /// Metrics for `points` carrying a cable of `cable_type` and
    /// `diameter_mm`, with supports estimated from spacing.
    pub fn compute_metrics(
        &self,
        points: &[RoutePoint],
        cable_type: &str,
        diameter_mm: f64,
    ) -> RouteMetrics {
        self.compute(points, &CableSpec::new(cable_type, diameter_mm))
    }

    /// Like [`Self::compute_metrics`], using `supports` when supports are
    /// placed by hand.
    pub fn compute_metrics_with_supports(
        &self,
        points: &[RoutePoint],
        cable_type: &str,
        diameter_mm: f64,
        supports: Option<u32>,
    ) -> RouteMetrics {
        let mut cable = CableSpec::new(cable_type, diameter_mm);
        cable.supports = supports;
        self.compute(points, &cable)
    }

    pub fn compute(&self, points: &[RoutePoint], cable: &CableSpec) -> RouteMetrics {
        let is_armoured = cable.is_armoured();

        if points.len() < 2 {
            return RouteMetrics {
                total_length: 0.0,
                total_cost: 0.0,
                support_count: cable.supports.unwrap_or(0),
                bend_count: 0,
                complexity: Complexity::Low,
                cable_type: cable.cable_type.clone(),
                diameter_mm: cable.diameter_mm,
                is_armoured,
                cost_breakdown: CostBreakdown::default(),
            };
        }

        let positions: Vec<_> = points.iter().map(RoutePoint::position).collect();

        let total_length: f64 = positions
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum();

        let bend_count = positions
            .windows(3)
            .filter(|w| !collinear_3d(&w[0], &w[1], &w[2]))
            .count() as u32;

        let support_count = cable
            .supports
            .unwrap_or_else(|| estimate_supports(total_length, is_armoured));

        let complexity = Complexity::classify(bend_count, total_length, &self.settings.complexity);

        let cost_breakdown = self.estimate_cost(total_length, support_count, &cable.cable_type);
        let total_cost =
            cost_breakdown.cable_cost + cost_breakdown.support_cost + cost_breakdown.termination_cost;

        tracing::debug!(
            "Route metrics: {:.2} m, {} bends, {} supports, {} complexity",
            total_length,
            bend_count,
            support_count,
            complexity
        );

        RouteMetrics {
            total_length,
            total_cost,
            support_count,
            bend_count,
            complexity,
            cable_type: cable.cable_type.clone(),
            diameter_mm: cable.diameter_mm,
            is_armoured,
            cost_breakdown,
        }
    }

    fn estimate_cost(&self, length_m: f64, supports: u32, cable_type: &str) -> CostBreakdown {
        let settings = &self.settings;
        let unit_price = settings.unit_price(cable_type);
        let cable_length_m = length_m * (1.0 + settings.waste_factor);
        CostBreakdown {
            cable_length_m,
            unit_price,
            cable_cost: unit_price * cable_length_m,
            support_cost: f64::from(supports) * settings.support_cost,
            termination_cost: f64::from(settings.terminations_per_route) * settings.termination_cost,
        }
    }
}

/// `ceil(length_mm / max_spacing)`; zero length needs no supports.
pub fn estimate_supports(length_m: f64, is_armoured: bool) -> u32 {
    if length_m <= 0.0 || !length_m.is_finite() {
        return 0;
    }
    (length_m * 1000.0 / max_support_spacing_mm(is_armoured)).ceil() as u32
}
