// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The report record and its lifecycle.

use crate::error::EngineError;
use crate::number;
use cbam_domain::{
    CbamCategory, CommodityCode, EmissionsBreakdown, FactorTable, ReportDraft, ReportStatus,
    ReportingPeriod, ValidationResult, classify, compute_emissions, estimated_cost_eur, validate,
};
use cbam_xml::FactorSource;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Declarant (EU importer) details supplied at report creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeclarantDetails {
    /// EORI identification number.
    pub eori: String,
    /// Legal name.
    pub name: String,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO-2 country code.
    pub country: String,
}

/// Producing installation details supplied at report creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallationDetails {
    /// Operator-assigned identifier. Synthesized when absent.
    pub identifier: Option<String>,
    /// Installation name.
    pub name: String,
    /// ISO-2 country code.
    pub country: String,
    /// Free-text address, when known.
    pub address: Option<String>,
}

/// Input for creating a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    /// Tariff classification code (CN preferred, HS accepted).
    pub commodity_code: String,
    /// Free-text product description.
    pub product_description: String,
    /// Declared category. When absent the classifier decides.
    pub category: Option<CbamCategory>,
    /// Declared quantity in `quantity_unit`.
    pub quantity: f64,
    /// Unit of the declared quantity, e.g. `KGS`.
    pub quantity_unit: String,
    /// Net weight in kilograms.
    pub net_weight_kg: f64,
    /// ISO-2 country of origin.
    pub country_of_origin: String,
    /// The reporting period.
    pub reporting_period: ReportingPeriod,
    /// The declarant.
    pub declarant: DeclarantDetails,
    /// The producing installation.
    pub installation: InstallationDetails,
    /// Measured direct emissions, tCO2e, when the producer declared them.
    pub measured_direct_tco2: Option<f64>,
    /// Measured indirect emissions, tCO2e, when the producer declared them.
    pub measured_indirect_tco2: Option<f64>,
    /// Electricity consumed during production, MWh, when declared.
    pub electricity_mwh: Option<f64>,
}

/// The central report entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Database identity.
    pub id: Uuid,
    /// Human-readable report number.
    pub report_number: String,
    /// Normalized commodity code.
    pub commodity_code: String,
    /// Resolved CBAM category.
    pub category: CbamCategory,
    /// Free-text product description.
    pub product_description: String,
    /// Declared quantity in `quantity_unit`.
    pub quantity: f64,
    /// Unit of the declared quantity.
    pub quantity_unit: String,
    /// Net weight in kilograms.
    pub net_weight_kg: f64,
    /// ISO-2 country of origin.
    pub country_of_origin: String,
    /// The reporting period.
    pub reporting_period: ReportingPeriod,
    /// The declarant.
    pub declarant: DeclarantDetails,
    /// Operator-assigned or synthesized installation identifier.
    pub installation_id: String,
    /// Installation name.
    pub installation_name: String,
    /// ISO-2 country code of the installation.
    pub installation_country: String,
    /// Free-text installation address, when known.
    pub installation_address: Option<String>,
    /// Electricity consumed during production, MWh, when declared.
    pub electricity_mwh: Option<f64>,
    /// Embedded emissions in canonical tCO2e. The total is always derived
    /// from direct plus indirect, never stored independently.
    pub emissions: EmissionsBreakdown,
    /// Whether the figures came from measurements or default factors.
    pub measured_emissions: bool,
    /// Estimated CBAM cost, EUR.
    pub estimated_cost_eur: f64,
    /// Lifecycle status.
    pub status: ReportStatus,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Report {
    /// Creates a report from input, resolving the category and computing
    /// emissions and cost.
    ///
    /// # Errors
    ///
    /// Returns `CategoryUnresolved` if no category was supplied and the
    /// commodity code's chapter is outside CBAM scope.
    pub fn create(
        input: ReportInput,
        table: &FactorTable,
        now: OffsetDateTime,
    ) -> Result<Self, EngineError> {
        let code: CommodityCode = CommodityCode::new(&input.commodity_code);
        let category: CbamCategory = match input.category {
            Some(category) => category,
            None => classify(&code)
                .ok_or_else(|| EngineError::CategoryUnresolved(code.value().to_string()))?,
        };

        let emissions: EmissionsBreakdown = compute_emissions(
            table,
            category,
            input.net_weight_kg,
            input.measured_direct_tco2,
            input.measured_indirect_tco2,
        );
        let measured: bool = matches!(
            (input.measured_direct_tco2, input.measured_indirect_tco2),
            (Some(direct), Some(indirect)) if direct >= 0.0 && indirect >= 0.0
        );

        let installation_id: String = input.installation.identifier.unwrap_or_else(|| {
            let tag: String = Uuid::new_v4().simple().to_string();
            format!("INS-{}", tag[..8].to_uppercase())
        });

        Ok(Self {
            id: Uuid::new_v4(),
            report_number: number::report_number(now),
            commodity_code: code.value().to_string(),
            category,
            product_description: input.product_description,
            quantity: input.quantity,
            quantity_unit: input.quantity_unit,
            net_weight_kg: input.net_weight_kg,
            country_of_origin: input.country_of_origin,
            reporting_period: input.reporting_period,
            declarant: input.declarant,
            installation_id,
            installation_name: input.installation.name,
            installation_country: input.installation.country,
            installation_address: input.installation.address,
            electricity_mwh: input.electricity_mwh,
            emissions,
            measured_emissions: measured,
            estimated_cost_eur: estimated_cost_eur(emissions.total_tco2),
            status: ReportStatus::default(),
            created_at: now,
        })
    }

    /// Returns the draft view of this report for rule validation.
    #[must_use]
    pub fn validation_draft(&self) -> ReportDraft {
        ReportDraft {
            commodity_code: Some(self.commodity_code.clone()),
            product_description: Some(self.product_description.clone()),
            net_weight_kg: Some(self.net_weight_kg),
            category: Some(self.category),
            reporting_period: Some(self.reporting_period.to_string()),
            country_of_origin: Some(self.country_of_origin.clone()),
        }
    }

    /// Provenance marker for the declaration.
    #[must_use]
    pub const fn factor_source(&self) -> FactorSource {
        if self.measured_emissions {
            FactorSource::Actual
        } else {
            FactorSource::Default
        }
    }

    /// Moves the report to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns a domain violation if the transition is not permitted.
    pub fn transition(&mut self, target: ReportStatus) -> Result<(), EngineError> {
        if self.status == target {
            return Ok(());
        }
        if !self.status.can_transition_to(target) {
            return Err(EngineError::DomainViolation(
                cbam_domain::DomainError::InvalidStatusTransition {
                    from: self.status.as_str().to_string(),
                    to: target.as_str().to_string(),
                },
            ));
        }
        self.status = target;
        Ok(())
    }
}

/// Validates a report against the EU rules and advances a clean draft to
/// `Validated`.
///
/// The status change is skipped for reports past the draft stage; validation
/// itself runs regardless and the full result is returned either way.
pub fn validate_report(table: &FactorTable, report: &mut Report) -> ValidationResult {
    let result: ValidationResult = validate(table, &report.validation_draft());
    if result.valid && report.status == ReportStatus::Draft {
        report.status = ReportStatus::Validated;
    }
    result
}
