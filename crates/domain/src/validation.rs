// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! EU structural and business rule validation for report drafts.
//!
//! Validation is pure and deterministic: problems surface as entries in the
//! result, never as panics or early returns. Rules run in a fixed order so
//! the error list is reproducible. Errors block downstream serialization;
//! warnings never do, but must be surfaced to the operator before export.

use crate::calculator::{compute_emissions, round_tco2_for_display};
use crate::factors::FactorTable;
use crate::types::{CbamCategory, CommodityCode, ReportingPeriod};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Origin countries commonly seen on CBAM declarations.
///
/// A country outside this list is plausible but unusual, so it warns rather
/// than errors.
pub const COMMON_CBAM_ORIGINS: &[&str] = &["IN", "CN", "TR", "RU", "UA", "BY", "EG", "ZA"];

/// Estimated-emission level above which a declaration warrants detailed
/// verification, in tCO2e.
pub const HIGH_EMISSIONS_THRESHOLD_TCO2E: f64 = 10_000.0;

/// Validation input with optional fields explicitly modeled.
///
/// Absence and zero are distinct: `net_weight_kg: Some(0.0)` is a supplied
/// weight of zero (an error), while `None` is a missing weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportDraft {
    /// The tariff classification code, as entered.
    pub commodity_code: Option<String>,
    /// Free-text product description.
    pub product_description: Option<String>,
    /// Net weight in kilograms.
    pub net_weight_kg: Option<f64>,
    /// The declared CBAM category.
    pub category: Option<CbamCategory>,
    /// The reporting period, as entered (expected `YYYY-Qn`).
    pub reporting_period: Option<String>,
    /// ISO-2 country of origin.
    pub country_of_origin: Option<String>,
}

/// Result of validating a report draft.
///
/// Invariant: `valid` holds exactly when `errors` is empty. Warnings never
/// affect validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the draft passed all blocking rules.
    pub valid: bool,
    /// Blocking problems, in rule-evaluation order.
    pub errors: Vec<String>,
    /// Non-blocking observations, in rule-evaluation order.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Builds a result from collected errors and warnings.
    #[must_use]
    pub fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validates a report draft against the EU structural and business rules.
///
/// Pure and deterministic; never panics. Rules are evaluated in a fixed
/// order (required fields, then period, then plausibility cross-checks) so
/// that two calls on the same input produce identical results.
#[must_use]
pub fn validate(table: &FactorTable, draft: &ReportDraft) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Rule 1: commodity code present, numeric, at least 6 digits.
    let code: Option<CommodityCode> = draft
        .commodity_code
        .as_deref()
        .map(CommodityCode::new)
        .filter(|c| !c.value().is_empty());
    match &code {
        None => errors.push(String::from("HS code must be at least 6 digits.")),
        Some(c) => {
            if !c.is_numeric() {
                errors.push(String::from("HS code must contain only digits."));
            } else if c.digit_count() < 6 {
                errors.push(String::from("HS code must be at least 6 digits."));
            }
        }
    }

    // Rule 2: product description present and at least 5 characters.
    let description_ok: bool = draft
        .product_description
        .as_deref()
        .is_some_and(|d| d.trim().chars().count() >= 5);
    if !description_ok {
        errors.push(String::from(
            "Product description must be at least 5 characters.",
        ));
    }

    // Rule 3: net weight present and positive.
    let weight: Option<f64> = draft.net_weight_kg.filter(|w| *w > 0.0);
    if weight.is_none() {
        errors.push(String::from("Net weight must be greater than 0."));
    }

    // Rule 4: category present.
    if draft.category.is_none() {
        errors.push(String::from("CBAM category is required."));
    }

    // Rule 5: reporting period present and well-formed.
    let period_ok: bool = draft
        .reporting_period
        .as_deref()
        .is_some_and(|p| ReportingPeriod::from_str(p).is_ok());
    if !period_ok {
        errors.push(String::from(
            "Reporting period must match YYYY-Qn (e.g. 2024-Q4).",
        ));
    }

    // Rule 6: origin country plausibility.
    if let Some(origin) = draft.country_of_origin.as_deref() {
        let normalized: String = origin.trim().to_uppercase();
        if !normalized.is_empty() && !COMMON_CBAM_ORIGINS.contains(&normalized.as_str()) {
            warnings.push(format!("Uncommon origin country '{normalized}'."));
        }
    }

    // Rule 7: category / chapter cross-check. Codes outside the textbook
    // chapter set may still be legitimate per EU guidance, so this warns.
    if let (Some(category), Some(c)) = (draft.category, &code) {
        let chapter: &str = c.chapter();
        if c.is_numeric() && !chapter.is_empty() && !category.valid_chapters().contains(&chapter) {
            warnings.push(format!(
                "Commodity code chapter {chapter} is not typical for {}.",
                category.display_name()
            ));
        }
    }

    // Rule 8: estimated-emission magnitude check using default factors.
    if let (Some(category), Some(net_weight_kg)) = (draft.category, weight) {
        let estimate = compute_emissions(table, category, net_weight_kg, None, None);
        if estimate.total_tco2 > HIGH_EMISSIONS_THRESHOLD_TCO2E {
            warnings.push(format!(
                "High emissions ({} tCO2e): may require detailed verification.",
                round_tco2_for_display(estimate.total_tco2)
            ));
        }
    }

    ValidationResult::from_parts(errors, warnings)
}
