//! BS 7671 Installation Constants
//!
//! Simplified design limits used by the compliance battery and by the
//! metrics calculator's support estimate:
//! - Voltage drop: `(L × I × 0.029) / V × 100`
//! - Support spacing: 400 mm unarmoured, 600 mm armoured (SWA)
//! - Minimum bend radius: 6 × D unarmoured, 12 × D armoured
//!
//! Reference: BS 7671 Requirements for Electrical Installations,
//! Appendix 4 and the On-Site Guide tables. Regulation numbers are used as
//! identifiers only.

/// Voltage drop coefficient applied to length (m) × current (A)
pub const VOLTAGE_DROP_FACTOR: f64 = 0.029;

/// Nominal single-phase supply voltage
pub const NOMINAL_SINGLE_PHASE_V: f64 = 230.0;

/// Voltage drop limit on a 230 V circuit (%)
pub const VOLTAGE_DROP_LIMIT_230V_PERCENT: f64 = 3.0;

/// Voltage drop limit on any other supply voltage (%)
pub const VOLTAGE_DROP_LIMIT_OTHER_PERCENT: f64 = 5.0;

/// Fraction of a limit above which a check is reported as a warning
pub const VOLTAGE_DROP_WARNING_FRACTION: f64 = 0.8;
pub const CURRENT_WARNING_FRACTION: f64 = 0.9;
pub const SUPPORT_SPACING_WARNING_FRACTION: f64 = 0.9;

/// Maximum support spacing (mm)
pub const SUPPORT_SPACING_UNARMOURED_MM: f64 = 400.0;
pub const SUPPORT_SPACING_ARMOURED_MM: f64 = 600.0;

/// Minimum bend radius as a multiple of overall cable diameter
pub const BEND_RADIUS_FACTOR_UNARMOURED: f64 = 6.0;
pub const BEND_RADIUS_FACTOR_ARMOURED: f64 = 12.0;

/// Route length above which a warning is raised (m)
pub const MAX_ROUTE_LENGTH_M: f64 = 100.0;

/// Percentage voltage drop along a run. The voltage is floored at 1 V so a
/// zero or negative supply never divides by zero.
pub fn voltage_drop_percent(length_m: f64, current_a: f64, voltage_v: f64) -> f64 {
    (length_m * current_a * VOLTAGE_DROP_FACTOR) / voltage_v.max(1.0) * 100.0
}

/// 3% on a 230 V supply, 5% otherwise.
pub fn voltage_drop_limit_percent(voltage_v: f64) -> f64 {
    if (voltage_v - NOMINAL_SINGLE_PHASE_V).abs() < f64::EPSILON {
        VOLTAGE_DROP_LIMIT_230V_PERCENT
    } else {
        VOLTAGE_DROP_LIMIT_OTHER_PERCENT
    }
}

pub fn max_support_spacing_mm(is_armoured: bool) -> f64 {
    if is_armoured {
        SUPPORT_SPACING_ARMOURED_MM
    } else {
        SUPPORT_SPACING_UNARMOURED_MM
    }
}

pub fn min_bend_radius_mm(diameter_mm: f64, is_armoured: bool) -> f64 {
    let factor = if is_armoured {
        BEND_RADIUS_FACTOR_ARMOURED
    } else {
        BEND_RADIUS_FACTOR_UNARMOURED
    };
    diameter_mm * factor
}

/// Whether a cable type name denotes steel-wire-armoured cable
/// (`"SWA"`, `"swa-4core"`, `"Armoured XLPE"`, ...).
pub fn is_armoured_cable_type(cable_type: &str) -> bool {
    let lower = cable_type.to_lowercase();
    ["swa", "armour"].iter().any(|pattern| lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_drop_fifty_metres_thirty_two_amps() {
        let drop = voltage_drop_percent(50.0, 32.0, 230.0);
        assert!((drop - 20.173913).abs() < 1e-4, "Drop: {}", drop);
    }

    #[test]
    fn test_voltage_drop_zero_voltage_is_guarded() {
        let drop = voltage_drop_percent(10.0, 1.0, 0.0);
        assert!(drop.is_finite());
        assert!((drop - 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_voltage_drop_limits() {
        assert_eq!(voltage_drop_limit_percent(230.0), 3.0);
        assert_eq!(voltage_drop_limit_percent(400.0), 5.0);
        assert_eq!(voltage_drop_limit_percent(110.0), 5.0);
    }

    #[test]
    fn test_armoured_spacing_and_radius() {
        assert_eq!(max_support_spacing_mm(true), 600.0);
        assert_eq!(max_support_spacing_mm(false), 400.0);
        assert_eq!(min_bend_radius_mm(20.0, true), 240.0);
        assert_eq!(min_bend_radius_mm(20.0, false), 120.0);
    }

    #[test]
    fn test_armoured_cable_type_detection() {
        assert!(is_armoured_cable_type("SWA"));
        assert!(is_armoured_cable_type("swa-4core-16mm"));
        assert!(is_armoured_cable_type("Armoured XLPE"));
        assert!(!is_armoured_cable_type("twin-and-earth"));
        assert!(!is_armoured_cable_type("LSZH singles"));
    }
}
