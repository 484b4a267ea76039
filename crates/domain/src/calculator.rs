// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Embedded emission computation.
//!
//! The canonical unit throughout the engine is tonnes of CO2e (tCO2e).
//! Weights arrive in kilograms and are converted to tonnes exactly once,
//! here. No intermediate rounding takes place; display rounding (2 decimal
//! places for tCO2e, whole euros for cost) is applied only at presentation
//! boundaries via the helpers at the bottom of this module.

use crate::factors::{EU_CARBON_PRICE_EUR_PER_TCO2E, FactorTable};
use crate::types::CbamCategory;
use serde::{Deserialize, Serialize};

/// Direct, indirect, and total embedded emissions for one good, in tCO2e.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionsBreakdown {
    /// Direct (production-process) emissions, tCO2e.
    pub direct_tco2: f64,
    /// Indirect (electricity-sourced) emissions, tCO2e.
    pub indirect_tco2: f64,
    /// Total embedded emissions, tCO2e. Always `direct + indirect`.
    pub total_tco2: f64,
}

impl EmissionsBreakdown {
    /// Creates a breakdown from direct and indirect components.
    ///
    /// The total is always derived here; it is never settable independently.
    #[must_use]
    pub fn new(direct_tco2: f64, indirect_tco2: f64) -> Self {
        Self {
            direct_tco2,
            indirect_tco2,
            total_tco2: direct_tco2 + indirect_tco2,
        }
    }
}

/// Computes embedded emissions for a good.
///
/// If both measured values are supplied and non-negative they are used
/// verbatim (already in tCO2e). Otherwise both components fall back to the
/// category's default factors applied to the net weight:
/// `net_weight_kg / 1000 × factor`.
///
/// # Arguments
///
/// * `table` - The active emission factor table
/// * `category` - The CBAM category of the good
/// * `net_weight_kg` - Net weight in kilograms
/// * `measured_direct_tco2` - Measured direct emissions, tCO2e, if declared
/// * `measured_indirect_tco2` - Measured indirect emissions, tCO2e, if declared
#[must_use]
pub fn compute_emissions(
    table: &FactorTable,
    category: CbamCategory,
    net_weight_kg: f64,
    measured_direct_tco2: Option<f64>,
    measured_indirect_tco2: Option<f64>,
) -> EmissionsBreakdown {
    match (measured_direct_tco2, measured_indirect_tco2) {
        (Some(direct), Some(indirect)) if direct >= 0.0 && indirect >= 0.0 => {
            EmissionsBreakdown::new(direct, indirect)
        }
        _ => {
            let factor = table.factor(category);
            let tonnes: f64 = net_weight_kg / 1000.0;
            EmissionsBreakdown::new(
                tonnes * factor.direct_tco2_per_tonne,
                tonnes * factor.indirect_tco2_per_tonne,
            )
        }
    }
}

/// Estimates the CBAM cost of a total emission figure, in EUR.
#[must_use]
pub fn estimated_cost_eur(total_tco2: f64) -> f64 {
    total_tco2 * EU_CARBON_PRICE_EUR_PER_TCO2E
}

/// Rounds an emission value for display (2 decimal places).
#[must_use]
pub fn round_tco2_for_display(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds a cost value for display (whole euros).
#[must_use]
pub fn round_eur_for_display(value: f64) -> f64 {
    value.round()
}
