//! Example: using the metrics calculator and compliance evaluator directly
//! (without CableRouteCore), with an extra site-specific rule.
//! Run with: cargo run --example compliance_check [length_m] [load_a]

use std::sync::Arc;

use cableroute::compliance::{CableParameters, ComplianceInput};
use cableroute::{
    ComplianceCheck, ComplianceEvaluator, ComplianceRule, ComplianceStatus, ElectricalParameters,
    RouteMetricsCalculator, RoutePoint,
};

/// Site rule: runs above 30 m need a documented pull plan.
struct PullPlanRule;

impl ComplianceRule for PullPlanRule {
    fn id(&self) -> &str {
        "pull-plan"
    }

    fn regulation(&self) -> &str {
        "Site standard 4.2"
    }

    fn description(&self) -> &str {
        "Pull plan for long runs"
    }

    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        let long = input.metrics.total_length > 30.0;
        ComplianceCheck {
            id: self.id().to_string(),
            regulation: self.regulation().to_string(),
            description: self.description().to_string(),
            status: if long {
                ComplianceStatus::Warning
            } else {
                ComplianceStatus::Pass
            },
            message: format!("Run length {:.1} m", input.metrics.total_length),
            suggestion: long.then(|| "Attach a pull plan to the method statement".to_string()),
        }
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let length_m: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(45.0);
    let load_a: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(32.0);

    let points = vec![
        RoutePoint::new("origin", 0.0, 0.0, 2.5),
        RoutePoint::new("corner", length_m * 0.6, 0.0, 2.5),
        RoutePoint::new("load", length_m * 0.6, length_m * 0.4, 2.5),
    ];

    let metrics = RouteMetricsCalculator::default().compute_metrics(&points, "SWA", 16.0);
    let electrical = ElectricalParameters {
        load_current_a: load_a,
        voltage_v: 230.0,
        cable_rating_a: 40.0,
    };

    let mut evaluator = ComplianceEvaluator::with_default_rules();
    evaluator.add_rule(Arc::new(PullPlanRule));
    let checks = evaluator.evaluate(
        Some(&metrics),
        &CableParameters::from_metrics(&metrics),
        &electrical,
    );

    println!(
        "{:.1} m of {} at {:.0} A: {} checks",
        metrics.total_length,
        metrics.cable_type,
        load_a,
        checks.len()
    );
    for check in &checks {
        println!("  [{}] {}: {}", check.status, check.regulation, check.message);
        if let Some(ref suggestion) = check.suggestion {
            println!("    Suggestion: {}", suggestion);
        }
    }

    let failures = checks
        .iter()
        .filter(|c| c.status == ComplianceStatus::Fail)
        .count();
    if failures > 0 {
        std::process::exit(1);
    }
}
