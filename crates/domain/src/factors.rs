// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Emission factor tables.
//!
//! Factors are an explicit, injected lookup rather than a module-level
//! global: callers construct a [`FactorTable`] once at startup and pass it by
//! reference to the classifier, calculator, and validation engine. Tests
//! substitute alternate tables (e.g. updated EU defaults) without touching
//! the rules.

use crate::types::CbamCategory;
use serde::{Deserialize, Serialize};

/// Assumed EU ETS carbon price, EUR per tonne of CO2e.
pub const EU_CARBON_PRICE_EUR_PER_TCO2E: f64 = 80.0;

/// Default emission factors for one CBAM category.
///
/// All emission factors are expressed in tonnes of CO2e per tonne of
/// product; electricity intensity in MWh per tonne of product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Direct (production-process) emissions, tCO2e per tonne.
    pub direct_tco2_per_tonne: f64,
    /// Indirect (electricity-sourced) emissions, tCO2e per tonne.
    pub indirect_tco2_per_tonne: f64,
    /// Electricity intensity, MWh per tonne.
    pub electricity_mwh_per_tonne: f64,
}

impl EmissionFactor {
    /// Creates a new `EmissionFactor`.
    #[must_use]
    pub const fn new(
        direct_tco2_per_tonne: f64,
        indirect_tco2_per_tonne: f64,
        electricity_mwh_per_tonne: f64,
    ) -> Self {
        Self {
            direct_tco2_per_tonne,
            indirect_tco2_per_tonne,
            electricity_mwh_per_tonne,
        }
    }
}

/// Per-category emission factor lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    /// Factors indexed in `CbamCategory::ALL` order.
    factors: [EmissionFactor; 4],
}

impl FactorTable {
    /// Returns the EU transitional-period default factors.
    #[must_use]
    pub const fn eu_defaults() -> Self {
        Self {
            factors: [
                // IronSteel
                EmissionFactor::new(1.9, 0.3, 0.5),
                // Aluminium
                EmissionFactor::new(8.0, 6.5, 14.0),
                // Cement
                EmissionFactor::new(0.65, 0.08, 0.1),
                // Fertilisers
                EmissionFactor::new(2.5, 0.2, 0.3),
            ],
        }
    }

    /// Returns the factor set for a category.
    #[must_use]
    pub const fn factor(&self, category: CbamCategory) -> &EmissionFactor {
        &self.factors[Self::index(category)]
    }

    /// Returns a copy of this table with one category's factors replaced.
    #[must_use]
    pub const fn with_factor(mut self, category: CbamCategory, factor: EmissionFactor) -> Self {
        self.factors[Self::index(category)] = factor;
        self
    }

    const fn index(category: CbamCategory) -> usize {
        match category {
            CbamCategory::IronSteel => 0,
            CbamCategory::Aluminium => 1,
            CbamCategory::Cement => 2,
            CbamCategory::Fertilisers => 3,
        }
    }
}

impl Default for FactorTable {
    fn default() -> Self {
        Self::eu_defaults()
    }
}
