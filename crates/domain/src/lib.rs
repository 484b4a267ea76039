// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod calculator;
mod classifier;
mod error;
mod factors;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calculator::{
    EmissionsBreakdown, compute_emissions, estimated_cost_eur, round_eur_for_display,
    round_tco2_for_display,
};
pub use classifier::classify;
pub use error::DomainError;
pub use factors::{EU_CARBON_PRICE_EUR_PER_TCO2E, EmissionFactor, FactorTable};
pub use types::{CbamCategory, CommodityCode, ReportStatus, ReportingPeriod};
pub use validation::{
    COMMON_CBAM_ORIGINS, HIGH_EMISSIONS_THRESHOLD_TCO2E, ReportDraft, ValidationResult, validate,
};
