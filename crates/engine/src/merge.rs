// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Consolidation of per-shipment reports into one quarterly declaration.
//!
//! A merge is defined as same declarant, same quarter, multiple goods.
//! Constituent reports are never mutated here; marking them `Merged` is the
//! caller's presentational step and is reversible.

use crate::error::EngineError;
use crate::number;
use crate::report::Report;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use cbam_domain::ReportingPeriod;

/// A consolidated quarterly declaration derived from N reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedReport {
    /// Database identity.
    pub id: Uuid,
    /// Human-readable merged report number.
    pub report_number: String,
    /// The shared reporting period.
    pub reporting_period: ReportingPeriod,
    /// The shared declarant EORI.
    pub declarant_eori: String,
    /// The declarant name, taken from the first constituent.
    pub declarant_name: String,
    /// Number of goods, one per constituent report.
    pub goods_count: usize,
    /// Sum of constituent net weights, kg.
    pub total_net_mass_kg: f64,
    /// Sum of direct emissions, tCO2e.
    pub total_direct_tco2: f64,
    /// Sum of indirect emissions, tCO2e.
    pub total_indirect_tco2: f64,
    /// Sum of total emissions, tCO2e.
    pub total_tco2: f64,
    /// Sum of estimated CBAM costs, EUR.
    pub total_cost_eur: f64,
    /// Identities of the constituent reports, in merge order.
    pub report_ids: Vec<Uuid>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Merges reports into a consolidated quarterly declaration.
///
/// # Errors
///
/// * `InsufficientReports` for fewer than two reports
/// * `IncompatibleReports` when constituents span more than one reporting
///   period or more than one declarant EORI
pub fn merge_reports(
    reports: &[Report],
    now: OffsetDateTime,
) -> Result<MergedReport, EngineError> {
    let Some(first) = reports.first() else {
        return Err(EngineError::InsufficientReports(0));
    };
    if reports.len() < 2 {
        return Err(EngineError::InsufficientReports(reports.len()));
    }

    for report in &reports[1..] {
        if report.reporting_period != first.reporting_period {
            return Err(EngineError::IncompatibleReports(format!(
                "reporting periods differ ({} vs {})",
                first.reporting_period, report.reporting_period
            )));
        }
        if report.declarant.eori != first.declarant.eori {
            return Err(EngineError::IncompatibleReports(format!(
                "declarants differ ({} vs {})",
                first.declarant.eori, report.declarant.eori
            )));
        }
    }

    let total_net_mass_kg: f64 = reports.iter().map(|r| r.net_weight_kg).sum();
    let total_direct_tco2: f64 = reports.iter().map(|r| r.emissions.direct_tco2).sum();
    let total_indirect_tco2: f64 = reports.iter().map(|r| r.emissions.indirect_tco2).sum();
    let total_tco2: f64 = reports.iter().map(|r| r.emissions.total_tco2).sum();
    let total_cost_eur: f64 = reports.iter().map(|r| r.estimated_cost_eur).sum();

    Ok(MergedReport {
        id: Uuid::new_v4(),
        report_number: number::merged_report_number(now),
        reporting_period: first.reporting_period,
        declarant_eori: first.declarant.eori.clone(),
        declarant_name: first.declarant.name.clone(),
        goods_count: reports.len(),
        total_net_mass_kg,
        total_direct_tco2,
        total_indirect_tco2,
        total_tco2,
        total_cost_eur,
        report_ids: reports.iter().map(|r| r.id).collect(),
        created_at: now,
    })
}
