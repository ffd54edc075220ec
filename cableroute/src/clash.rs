//! Clash Detection
//!
//! Bounding-box intersection between building services elements from
//! different disciplines. A clash records how far the two boxes penetrate
//! each other (the smallest per-axis overlap) and a severity tier derived
//! from that depth. Results are recomputed from scratch on every call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::CableRouteError;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Electrical,
    Mechanical,
    Plumbing,
    Structural,
    Architectural,
    FireProtection,
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Discipline::Electrical => "electrical",
            Discipline::Mechanical => "mechanical",
            Discipline::Plumbing => "plumbing",
            Discipline::Structural => "structural",
            Discipline::Architectural => "architectural",
            Discipline::FireProtection => "fire protection",
        };
        write!(f, "{}", name)
    }
}

/// Axis-aligned box tagged with its discipline. `min` and `max` may be given
/// in either order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimElement {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub discipline: Discipline,
    pub min: Point,
    pub max: Point,
}

impl BimElement {
    pub fn new(id: impl Into<String>, discipline: Discipline, min: Point, max: Point) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            discipline,
            min,
            max,
        }
    }

    fn bounds(&self) -> (Point, Point) {
        (
            Point::new_3d(
                self.min.x.min(self.max.x),
                self.min.y.min(self.max.y),
                self.min.z.min(self.max.z),
            ),
            Point::new_3d(
                self.min.x.max(self.max.x),
                self.min.y.max(self.max.y),
                self.min.z.max(self.max.z),
            ),
        )
    }

    /// Smallest per-axis overlap with `other`; negative when the boxes are
    /// apart on some axis, zero when they only touch.
    pub fn penetration_depth(&self, other: &BimElement) -> f64 {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        let x = a_max.x.min(b_max.x) - a_min.x.max(b_min.x);
        let y = a_max.y.min(b_max.y) - a_min.y.max(b_min.y);
        let z = a_max.z.min(b_max.z) - a_min.z.max(b_min.z);
        x.min(y).min(z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClashSeverity {
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clash {
    /// `"{element_a}:{element_b}"`
    pub id: String,
    pub element_a: String,
    pub element_b: String,
    pub discipline_a: Discipline,
    pub discipline_b: Discipline,
    pub penetration_depth: f64,
    pub severity: ClashSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClashSettings {
    /// Overlaps at or below this depth are ignored
    pub tolerance: f64,
    /// Depth at which a clash becomes Critical
    pub critical_depth: f64,
    /// Depth at which a clash becomes Major
    pub major_depth: f64,
    /// Also report clashes between elements of the same discipline
    pub include_same_discipline: bool,
}

impl Default for ClashSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            critical_depth: 50.0,
            major_depth: 10.0,
            include_same_discipline: false,
        }
    }
}

impl ClashSettings {
    pub fn validate(&self) -> Result<(), CableRouteError> {
        if self.tolerance < 0.0 || self.major_depth < 0.0 || self.critical_depth < 0.0 {
            return Err(CableRouteError::Config(
                "clash depths cannot be negative".to_string(),
            ));
        }
        if self.major_depth > self.critical_depth {
            return Err(CableRouteError::Config(format!(
                "clash.major_depth ({}) exceeds clash.critical_depth ({})",
                self.major_depth, self.critical_depth
            )));
        }
        Ok(())
    }

    pub fn severity_for(&self, depth: f64) -> ClashSeverity {
        if depth >= self.critical_depth {
            ClashSeverity::Critical
        } else if depth >= self.major_depth {
            ClashSeverity::Major
        } else {
            ClashSeverity::Minor
        }
    }
}

/// Pairwise clash detection. Output follows input order: for elements `i < j`
/// the clash `(i, j)` precedes any pair starting later.
pub fn detect_clashes(elements: &[BimElement], settings: &ClashSettings) -> Vec<Clash> {
    let mut clashes = Vec::new();

    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            if a.discipline == b.discipline && !settings.include_same_discipline {
                continue;
            }
            let depth = a.penetration_depth(b);
            if depth <= settings.tolerance {
                continue;
            }
            clashes.push(Clash {
                id: format!("{}:{}", a.id, b.id),
                element_a: a.id.clone(),
                element_b: b.id.clone(),
                discipline_a: a.discipline,
                discipline_b: b.discipline,
                penetration_depth: depth,
                severity: settings.severity_for(depth),
            });
        }
    }

    tracing::debug!(
        "Clash detection: {} elements, {} clashes",
        elements.len(),
        clashes.len()
    );
    clashes
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashSummary {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

impl ClashSummary {
    pub fn from_clashes(clashes: &[Clash]) -> Self {
        let mut summary = Self::default();
        for clash in clashes {
            match clash.severity {
                ClashSeverity::Critical => summary.critical += 1,
                ClashSeverity::Major => summary.major += 1,
                ClashSeverity::Minor => summary.minor += 1,
            }
        }
        summary
    }
}
