//! Route Compliance Module
//!
//! Applies a fixed, ordered battery of BS 7671 style checks to route metrics
//! and the circuit's electrical parameters. Each rule yields exactly one
//! pass/warning/fail/info finding; the set is regenerated on every
//! evaluation.

pub mod bs7671;
pub mod rules;

pub use bs7671::*;
pub use rules::*;
