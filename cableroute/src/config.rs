//! Route Settings
//!
//! Tunable parameters for the search, the metrics calculator and clash
//! detection. Settings load from JSON; every field is optional and falls
//! back to the defaults below.
//!
//! ```json
//! {
//!   "pathfinding": { "grid_size": 25.0, "diagonal_penalty": 1.4 },
//!   "metrics": { "waste_factor": 0.15, "unit_prices": { "swa": 5.10 } },
//!   "units": { "metres_per_unit": 0.001 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clash::ClashSettings;
use crate::core::CableRouteError;
use crate::pathfinding::DEFAULT_GRID_SIZE;

/// Complete settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    pub pathfinding: PathfindingSettings,
    pub metrics: MetricsSettings,
    pub units: UnitSettings,
    pub clash: ClashSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingSettings {
    /// Quantization step for snapping and search
    pub grid_size: f64,
    /// Cost multiplier for diagonal steps (1.0 = plain Euclidean length)
    pub diagonal_penalty: f64,
    /// Node expansions before the search is abandoned; `null` for no limit
    pub max_expansions: Option<usize>,
}

impl Default for PathfindingSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            diagonal_penalty: 1.0,
            max_expansions: Some(250_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Extra cable ordered on top of the measured length (0.10 = 10%)
    pub waste_factor: f64,
    /// Installed cost per support (fixing, saddle or cleat)
    pub support_cost: f64,
    /// Cost per cable termination
    pub termination_cost: f64,
    pub terminations_per_route: u32,
    /// Price per metre for cable types missing from `unit_prices`
    pub default_unit_price: f64,
    /// Price per metre keyed by lowercase cable type
    pub unit_prices: BTreeMap<String, f64>,
    pub complexity: ComplexityThresholds,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        let unit_prices = [
            ("twin-and-earth", 1.85),
            ("swa", 4.50),
            ("lszh", 2.10),
            ("fp200", 3.20),
            ("cat6", 0.65),
            ("flex", 1.40),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            waste_factor: 0.10,
            support_cost: 2.50,
            termination_cost: 8.00,
            terminations_per_route: 2,
            default_unit_price: 2.00,
            unit_prices,
            complexity: ComplexityThresholds::default(),
        }
    }
}

impl MetricsSettings {
    /// Price per metre for a cable type.
    ///
    /// Exact (case-insensitive) key match first, then the longest key the
    /// type name contains (`"swa-4core"` prices as `"swa"`), then
    /// `default_unit_price`.
    pub fn unit_price(&self, cable_type: &str) -> f64 {
        let lower = cable_type.to_lowercase();
        if let Some(price) = self
            .unit_prices
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
            .map(|(_, v)| *v)
        {
            return price;
        }
        self.unit_prices
            .iter()
            .filter(|(k, _)| !k.is_empty() && lower.contains(&k.to_lowercase()))
            .max_by_key(|(k, _)| k.len())
            .map(|(_, v)| *v)
            .unwrap_or(self.default_unit_price)
    }
}

/// Bend and length thresholds for the Low/Medium/High classification.
/// A route is High when it exceeds either high threshold, Medium when it
/// exceeds either medium threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholds {
    pub high_bends: u32,
    pub high_length_m: f64,
    pub medium_bends: u32,
    pub medium_length_m: f64,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            high_bends: 6,
            high_length_m: 50.0,
            medium_bends: 2,
            medium_length_m: 20.0,
        }
    }
}

impl ComplexityThresholds {
    pub fn validate(&self) -> Result<(), CableRouteError> {
        if !self.medium_length_m.is_finite()
            || !self.high_length_m.is_finite()
            || self.medium_length_m < 0.0
            || self.high_length_m < 0.0
        {
            return Err(CableRouteError::Config(
                "complexity lengths must be non-negative numbers".to_string(),
            ));
        }
        if self.medium_bends > self.high_bends {
            return Err(CableRouteError::Config(format!(
                "metrics.complexity.medium_bends ({}) exceeds high_bends ({})",
                self.medium_bends, self.high_bends
            )));
        }
        if self.medium_length_m > self.high_length_m {
            return Err(CableRouteError::Config(format!(
                "metrics.complexity.medium_length_m ({}) exceeds high_length_m ({})",
                self.medium_length_m, self.high_length_m
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSettings {
    /// Drawing units to metres. The default treats one unit as 1 cm.
    pub metres_per_unit: f64,
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            metres_per_unit: 0.01,
        }
    }
}

impl RouteSettings {
    /// Load settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, CableRouteError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&content)?;
        tracing::info!("Loaded route settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, CableRouteError> {
        let settings: RouteSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CableRouteError> {
        let grid_size = self.pathfinding.grid_size;
        if !grid_size.is_finite() || grid_size <= 0.0 {
            return Err(CableRouteError::Config(format!(
                "pathfinding.grid_size must be positive, got {}",
                grid_size
            )));
        }
        if !self.pathfinding.diagonal_penalty.is_finite() || self.pathfinding.diagonal_penalty < 1.0 {
            return Err(CableRouteError::Config(format!(
                "pathfinding.diagonal_penalty must be at least 1.0, got {}",
                self.pathfinding.diagonal_penalty
            )));
        }
        if !self.units.metres_per_unit.is_finite() || self.units.metres_per_unit <= 0.0 {
            return Err(CableRouteError::Config(format!(
                "units.metres_per_unit must be positive, got {}",
                self.units.metres_per_unit
            )));
        }
        let metrics = &self.metrics;
        if metrics.waste_factor < 0.0 {
            return Err(CableRouteError::Config(
                "metrics.waste_factor cannot be negative".to_string(),
            ));
        }
        if let Some((cable, price)) = metrics.unit_prices.iter().find(|(_, p)| **p < 0.0) {
            return Err(CableRouteError::Config(format!(
                "metrics.unit_prices.{} cannot be negative ({})",
                cable, price
            )));
        }
        if metrics.support_cost < 0.0 || metrics.termination_cost < 0.0 || metrics.default_unit_price < 0.0 {
            return Err(CableRouteError::Config(
                "metrics costs cannot be negative".to_string(),
            ));
        }
        metrics.complexity.validate()?;
        self.clash.validate()
    }
}
