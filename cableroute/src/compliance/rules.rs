use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::bs7671::{
    max_support_spacing_mm, min_bend_radius_mm, voltage_drop_limit_percent,
    voltage_drop_percent, CURRENT_WARNING_FRACTION, MAX_ROUTE_LENGTH_M,
    SUPPORT_SPACING_WARNING_FRACTION, VOLTAGE_DROP_WARNING_FRACTION,
};
use crate::metrics::{Complexity, RouteMetrics};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Pass,
    Warning,
    Fail,
    Info,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Pass => write!(f, "pass"),
            ComplianceStatus::Warning => write!(f, "warning"),
            ComplianceStatus::Fail => write!(f, "fail"),
            ComplianceStatus::Info => write!(f, "info"),
        }
    }
}

/// One finding per rule per evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub id: String,
    pub regulation: String,
    pub description: String,
    pub status: ComplianceStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableParameters {
    pub diameter_mm: f64,
    pub is_armoured: bool,
}

impl CableParameters {
    pub fn from_metrics(metrics: &RouteMetrics) -> Self {
        Self {
            diameter_mm: metrics.diameter_mm,
            is_armoured: metrics.is_armoured,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalParameters {
    /// Design load current (A)
    pub load_current_a: f64,
    /// Supply voltage (V)
    pub voltage_v: f64,
    /// Installed current rating of the cable (A)
    pub cable_rating_a: f64,
}

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct ComplianceInput<'a> {
    pub metrics: &'a RouteMetrics,
    pub cable: &'a CableParameters,
    pub electrical: &'a ElectricalParameters,
}

pub trait ComplianceRule: Send + Sync {
    fn id(&self) -> &str;
    fn regulation(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck;
}

fn finding(
    rule: &dyn ComplianceRule,
    status: ComplianceStatus,
    message: String,
    suggestion: Option<String>,
) -> ComplianceCheck {
    ComplianceCheck {
        id: rule.id().to_string(),
        regulation: rule.regulation().to_string(),
        description: rule.description().to_string(),
        status,
        message,
        suggestion,
    }
}

/// Ordered battery of rules. Every rule runs on every evaluation and
/// contributes exactly one finding, in registration order.
pub struct ComplianceEvaluator {
    rules: Vec<Arc<dyn ComplianceRule>>,
}

impl ComplianceEvaluator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        let mut evaluator = Self::new();
        evaluator.add_rule(Arc::new(VoltageDropRule));
        evaluator.add_rule(Arc::new(CurrentCapacityRule));
        evaluator.add_rule(Arc::new(BendRadiusRule));
        evaluator.add_rule(Arc::new(SupportSpacingRule));
        evaluator.add_rule(Arc::new(RouteLengthRule));
        evaluator.add_rule(Arc::new(MechanicalProtectionRule));
        evaluator.add_rule(Arc::new(InformationalRule::earth_fault_loop()));
        evaluator.add_rule(Arc::new(InformationalRule::rcd_protection()));
        evaluator.add_rule(Arc::new(InformationalRule::cable_identification()));
        evaluator
    }

    pub fn add_rule(&mut self, rule: Arc<dyn ComplianceRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn ComplianceRule>] {
        &self.rules
    }

    /// Run every rule. Absent metrics produce no findings.
    pub fn evaluate(
        &self,
        metrics: Option<&RouteMetrics>,
        cable: &CableParameters,
        electrical: &ElectricalParameters,
    ) -> Vec<ComplianceCheck> {
        let Some(metrics) = metrics else {
            return Vec::new();
        };
        let input = ComplianceInput {
            metrics,
            cable,
            electrical,
        };
        self.rules.iter().map(|rule| rule.check(&input)).collect()
    }
}

impl Default for ComplianceEvaluator {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Convenience wrapper over the default battery
pub fn evaluate_compliance(
    metrics: Option<&RouteMetrics>,
    cable: &CableParameters,
    electrical: &ElectricalParameters,
) -> Vec<ComplianceCheck> {
    ComplianceEvaluator::with_default_rules().evaluate(metrics, cable, electrical)
}

/// Status counts over a set of findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub pass: usize,
    pub warning: usize,
    pub fail: usize,
    pub info: usize,
}

impl ComplianceSummary {
    pub fn from_checks(checks: &[ComplianceCheck]) -> Self {
        let mut summary = Self::default();
        for check in checks {
            match check.status {
                ComplianceStatus::Pass => summary.pass += 1,
                ComplianceStatus::Warning => summary.warning += 1,
                ComplianceStatus::Fail => summary.fail += 1,
                ComplianceStatus::Info => summary.info += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.fail > 0
    }

    pub fn has_warnings_or_failures(&self) -> bool {
        self.fail > 0 || self.warning > 0
    }

    pub fn total(&self) -> usize {
        self.pass + self.warning + self.fail + self.info
    }
}

// Rule implementations

pub struct VoltageDropRule;

impl ComplianceRule for VoltageDropRule {
    fn id(&self) -> &str {
        "voltage-drop"
    }

    fn regulation(&self) -> &str {
        "BS 7671 Appendix 4"
    }

    fn description(&self) -> &str {
        "Voltage drop between origin and load"
    }

    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        let length_m = input.metrics.total_length;
        let current = input.electrical.load_current_a;
        let voltage = input.electrical.voltage_v;

        let drop = voltage_drop_percent(length_m, current, voltage);
        let limit = voltage_drop_limit_percent(voltage);

        let (status, suggestion) = if drop > limit {
            (
                ComplianceStatus::Fail,
                Some("Increase the conductor size or shorten the route".to_string()),
            )
        } else if drop > VOLTAGE_DROP_WARNING_FRACTION * limit {
            (
                ComplianceStatus::Warning,
                Some("Voltage drop is close to the limit; consider a larger conductor".to_string()),
            )
        } else {
            (ComplianceStatus::Pass, None)
        };

        finding(
            self,
            status,
            format!(
                "Voltage drop {:.2}% over {:.1} m at {:.1} A (limit {:.0}% at {:.0} V)",
                drop, length_m, current, limit, voltage
            ),
            suggestion,
        )
    }
}

pub struct CurrentCapacityRule;

impl ComplianceRule for CurrentCapacityRule {
    fn id(&self) -> &str {
        "current-capacity"
    }

    fn regulation(&self) -> &str {
        "BS 7671 433.1"
    }

    fn description(&self) -> &str {
        "Cable current-carrying capacity against design load"
    }

    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        let load = input.electrical.load_current_a;
        let rating = input.electrical.cable_rating_a;

        let (status, suggestion) = if load > rating {
            (
                ComplianceStatus::Fail,
                Some("Select a cable with a higher current rating".to_string()),
            )
        } else if load > CURRENT_WARNING_FRACTION * rating {
            (
                ComplianceStatus::Warning,
                Some("Load is above 90% of the cable rating; check derating factors".to_string()),
            )
        } else {
            (ComplianceStatus::Pass, None)
        };

        finding(
            self,
            status,
            format!("Design load {:.1} A against cable rating {:.1} A", load, rating),
            suggestion,
        )
    }
}

pub struct BendRadiusRule;

impl ComplianceRule for BendRadiusRule {
    fn id(&self) -> &str {
        "bend-radius"
    }

    fn regulation(&self) -> &str {
        "BS 7671 522.8.3"
    }

    fn description(&self) -> &str {
        "Minimum internal bend radius"
    }

    /// Never fails: bend radius is verified by the installer on site.
    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        let min_radius = min_bend_radius_mm(input.cable.diameter_mm, input.cable.is_armoured);
        let bends = input.metrics.bend_count;

        if bends > 0 && input.metrics.complexity == Complexity::High {
            finding(
                self,
                ComplianceStatus::Warning,
                format!(
                    "{} bends on a high-complexity route; each bend needs at least {:.0} mm radius",
                    bends, min_radius
                ),
                Some("Verify bend radii on site or simplify the route".to_string()),
            )
        } else {
            finding(
                self,
                ComplianceStatus::Pass,
                format!("{} bends; minimum bend radius {:.0} mm", bends, min_radius),
                None,
            )
        }
    }
}

pub struct SupportSpacingRule;

impl ComplianceRule for SupportSpacingRule {
    fn id(&self) -> &str {
        "support-spacing"
    }

    fn regulation(&self) -> &str {
        "BS 7671 522.8.5"
    }

    fn description(&self) -> &str {
        "Maximum spacing between cable supports"
    }

    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        let max_spacing = max_support_spacing_mm(input.cable.is_armoured);
        let length_mm = input.metrics.total_length * 1000.0;
        let supports = input.metrics.support_count;
        let avg_spacing = length_mm / f64::from(supports.max(1));

        let (status, suggestion) = if avg_spacing > max_spacing {
            let needed = (length_mm / max_spacing).ceil();
            (
                ComplianceStatus::Fail,
                Some(format!("Add supports: at least {:.0} are needed", needed)),
            )
        } else if avg_spacing > SUPPORT_SPACING_WARNING_FRACTION * max_spacing {
            (
                ComplianceStatus::Warning,
                Some("Support spacing is close to the maximum".to_string()),
            )
        } else {
            (ComplianceStatus::Pass, None)
        };

        finding(
            self,
            status,
            format!(
                "Average support spacing {:.0} mm with {} supports (max {:.0} mm)",
                avg_spacing, supports, max_spacing
            ),
            suggestion,
        )
    }
}

pub struct RouteLengthRule;

impl ComplianceRule for RouteLengthRule {
    fn id(&self) -> &str {
        "route-length"
    }

    fn regulation(&self) -> &str {
        "BS 7671 Appendix 4"
    }

    fn description(&self) -> &str {
        "Overall route length"
    }

    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        let length_m = input.metrics.total_length;
        if length_m > MAX_ROUTE_LENGTH_M {
            finding(
                self,
                ComplianceStatus::Warning,
                format!("Route length {:.1} m exceeds {:.0} m", length_m, MAX_ROUTE_LENGTH_M),
                Some("Check voltage drop and fault protection for long runs".to_string()),
            )
        } else {
            finding(
                self,
                ComplianceStatus::Pass,
                format!("Route length {:.1} m", length_m),
                None,
            )
        }
    }
}

pub struct MechanicalProtectionRule;

impl ComplianceRule for MechanicalProtectionRule {
    fn id(&self) -> &str {
        "mechanical-protection"
    }

    fn regulation(&self) -> &str {
        "BS 7671 522.6"
    }

    fn description(&self) -> &str {
        "Protection against mechanical damage"
    }

    fn check(&self, input: &ComplianceInput<'_>) -> ComplianceCheck {
        if !input.cable.is_armoured && input.metrics.complexity == Complexity::High {
            finding(
                self,
                ComplianceStatus::Warning,
                "Unarmoured cable on a high-complexity route".to_string(),
                Some("Use SWA cable or run the cable in conduit or trunking".to_string()),
            )
        } else {
            let message = if input.cable.is_armoured {
                "Armoured cable provides mechanical protection"
            } else {
                "Route complexity does not call for additional protection"
            };
            finding(self, ComplianceStatus::Pass, message.to_string(), None)
        }
    }
}

/// Reminder emitted on every evaluation regardless of input
pub struct InformationalRule {
    id: &'static str,
    regulation: &'static str,
    description: &'static str,
    message: &'static str,
    suggestion: &'static str,
}

impl InformationalRule {
    pub const fn earth_fault_loop() -> Self {
        Self {
            id: "earth-fault-loop",
            regulation: "BS 7671 411.4",
            description: "Earth fault loop impedance",
            message: "Measure Zs at the furthest point and compare with the protective device maximum",
            suggestion: "Record Zs on the schedule of test results",
        }
    }

    pub const fn rcd_protection() -> Self {
        Self {
            id: "rcd-protection",
            regulation: "BS 7671 411.3.3",
            description: "Additional protection by RCD",
            message: "Confirm 30 mA RCD protection where required for the circuit",
            suggestion: "Check socket-outlet and concealed-cable requirements",
        }
    }

    pub const fn cable_identification() -> Self {
        Self {
            id: "cable-identification",
            regulation: "BS 7671 514",
            description: "Identification and labelling",
            message: "Label the cable at both ends and at accessible intermediate points",
            suggestion: "Use the circuit reference from the distribution board schedule",
        }
    }
}

impl ComplianceRule for InformationalRule {
    fn id(&self) -> &str {
        self.id
    }

    fn regulation(&self) -> &str {
        self.regulation
    }

    fn description(&self) -> &str {
        self.description
    }

    fn check(&self, _input: &ComplianceInput<'_>) -> ComplianceCheck {
        finding(
            self,
            ComplianceStatus::Info,
            self.message.to_string(),
            Some(self.suggestion.to_string()),
        )
    }
}
