// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response bodies for the HTTP boundary.
//!
//! These shapes keep string-typed fields (category names, reporting periods)
//! at the edge; the operations layer parses them into domain types and
//! translates failures into [`crate::ApiError`].

use cbam_domain::{EmissionFactor, round_eur_for_display, round_tco2_for_display};
use cbam_engine::{DeclarantDetails, InstallationDetails, MergedReport, Report};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Request to classify a commodity code.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    /// HS/CN commodity code, formatting characters allowed.
    pub commodity_code: String,
}

/// Classification outcome for a commodity code.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    /// The normalized commodity code.
    pub commodity_code: String,
    /// The two-digit HS chapter, when the code has one.
    pub chapter: Option<String>,
    /// Resolved CBAM category name, `null` when out of scope.
    pub category: Option<String>,
    /// Human-readable category name.
    pub display_name: Option<String>,
    /// Default emission factors for the category, `null` when out of scope.
    pub emission_factor: Option<EmissionFactor>,
}

/// Request to compute embedded emissions for a shipment.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeEmissionsRequest {
    /// CBAM category name.
    pub category: String,
    /// Net weight in kilograms.
    pub net_weight_kg: f64,
    /// Measured direct emissions in tCO2e, when available.
    #[serde(default)]
    pub measured_direct_tco2: Option<f64>,
    /// Measured indirect emissions in tCO2e, when available.
    #[serde(default)]
    pub measured_indirect_tco2: Option<f64>,
}

/// Computed emissions and cost for a shipment.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeEmissionsResponse {
    /// The category the computation used.
    pub category: String,
    /// Direct emissions, tCO2e.
    pub direct_tco2: f64,
    /// Indirect emissions, tCO2e.
    pub indirect_tco2: f64,
    /// Total emissions, tCO2e.
    pub total_tco2: f64,
    /// Estimated CBAM cost, EUR.
    pub estimated_cost_eur: f64,
    /// Whether defaults or measured values were applied.
    pub factor_source: String,
}

/// Request to validate draft report data.
///
/// All fields are optional; missing required data surfaces as validation
/// errors in the response, not as a request failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub commodity_code: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub net_weight_kg: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reporting_period: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
}

/// Request to create a quarterly report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    /// HS/CN commodity code.
    pub commodity_code: String,
    /// Free-text product description.
    pub product_description: String,
    /// CBAM category name; derived from the code when omitted.
    #[serde(default)]
    pub category: Option<String>,
    /// Declared quantity, defaults to 1.
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Unit of the declared quantity, defaults to KGS.
    #[serde(default)]
    pub quantity_unit: Option<String>,
    /// Net weight in kilograms.
    pub net_weight_kg: f64,
    /// ISO-2 country of origin.
    pub country_of_origin: String,
    /// Reporting period, `YYYY-Qn`.
    pub reporting_period: String,
    /// The declarant.
    #[serde(default)]
    pub declarant: DeclarantDetails,
    /// The production installation.
    #[serde(default)]
    pub installation: InstallationDetails,
    /// Measured direct emissions in tCO2e, when available.
    #[serde(default)]
    pub measured_direct_tco2: Option<f64>,
    /// Measured indirect emissions in tCO2e, when available.
    #[serde(default)]
    pub measured_indirect_tco2: Option<f64>,
    /// Electricity consumed during production, MWh.
    #[serde(default)]
    pub electricity_mwh: Option<f64>,
}

/// A persisted report, flattened for the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: Uuid,
    pub report_number: String,
    pub commodity_code: String,
    pub category: String,
    pub product_description: String,
    pub quantity: f64,
    pub quantity_unit: String,
    pub net_weight_kg: f64,
    pub country_of_origin: String,
    pub reporting_period: String,
    pub declarant_eori: String,
    pub declarant_name: String,
    pub installation_id: String,
    pub installation_name: String,
    pub installation_country: String,
    pub direct_tco2: f64,
    pub indirect_tco2: f64,
    pub total_tco2: f64,
    pub estimated_cost_eur: f64,
    pub measured_emissions: bool,
    pub status: String,
    pub created_at: String,
}

impl From<&Report> for ReportResponse {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            report_number: report.report_number.clone(),
            commodity_code: report.commodity_code.clone(),
            category: report.category.as_str().to_string(),
            product_description: report.product_description.clone(),
            quantity: report.quantity,
            quantity_unit: report.quantity_unit.clone(),
            net_weight_kg: report.net_weight_kg,
            country_of_origin: report.country_of_origin.clone(),
            reporting_period: report.reporting_period.to_string(),
            declarant_eori: report.declarant.eori.clone(),
            declarant_name: report.declarant.name.clone(),
            installation_id: report.installation_id.clone(),
            installation_name: report.installation_name.clone(),
            installation_country: report.installation_country.clone(),
            direct_tco2: round_tco2_for_display(report.emissions.direct_tco2),
            indirect_tco2: round_tco2_for_display(report.emissions.indirect_tco2),
            total_tco2: round_tco2_for_display(report.emissions.total_tco2),
            estimated_cost_eur: round_eur_for_display(report.estimated_cost_eur),
            measured_emissions: report.measured_emissions,
            status: report.status.as_str().to_string(),
            created_at: report
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| String::new()),
        }
    }
}

/// Response to report creation: the persisted report plus the findings of
/// the rule validation run over it.
///
/// The findings explain why an unclean draft stayed in `draft` without a
/// second `/validate` round trip.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReportResponse {
    /// The persisted report.
    #[serde(flatten)]
    pub report: ReportResponse,
    /// Blocking validation findings.
    pub errors: Vec<String>,
    /// Non-blocking validation findings.
    pub warnings: Vec<String>,
}

/// Outcome of generating a QReport XML document for a report.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateXmlResponse {
    pub report_id: Uuid,
    pub report_number: String,
    /// Whether the document passed both rule and schema checks.
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// First kilobyte of the document.
    pub xml_preview: String,
    pub total_emissions_tco2: f64,
}

/// Request to merge reports into one quarterly submission.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub report_ids: Vec<Uuid>,
}

/// A merged report, flattened for the wire.
#[derive(Debug, Clone, Serialize)]
pub struct MergedReportResponse {
    pub id: Uuid,
    pub report_number: String,
    pub reporting_period: String,
    pub declarant_eori: String,
    pub declarant_name: String,
    pub goods_count: usize,
    pub total_net_mass_kg: f64,
    pub total_direct_tco2: f64,
    pub total_indirect_tco2: f64,
    pub total_tco2: f64,
    pub total_cost_eur: f64,
    pub report_ids: Vec<Uuid>,
    pub created_at: String,
}

impl From<&MergedReport> for MergedReportResponse {
    fn from(merged: &MergedReport) -> Self {
        Self {
            id: merged.id,
            report_number: merged.report_number.clone(),
            reporting_period: merged.reporting_period.to_string(),
            declarant_eori: merged.declarant_eori.clone(),
            declarant_name: merged.declarant_name.clone(),
            goods_count: merged.goods_count,
            total_net_mass_kg: merged.total_net_mass_kg,
            total_direct_tco2: round_tco2_for_display(merged.total_direct_tco2),
            total_indirect_tco2: round_tco2_for_display(merged.total_indirect_tco2),
            total_tco2: round_tco2_for_display(merged.total_tco2),
            total_cost_eur: round_eur_for_display(merged.total_cost_eur),
            report_ids: merged.report_ids.clone(),
            created_at: merged
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| String::new()),
        }
    }
}

/// One category's default factors, named for the wire.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryFactors {
    pub category: String,
    pub display_name: String,
    pub direct_tco2_per_tonne: f64,
    pub indirect_tco2_per_tonne: f64,
    pub electricity_mwh_per_tonne: f64,
}

/// The active factor table and carbon price.
#[derive(Debug, Clone, Serialize)]
pub struct FactorsResponse {
    pub carbon_price_eur_per_tco2e: f64,
    pub factors: Vec<CategoryFactors>,
}

/// An XML document ready to be served as a file download.
#[derive(Debug, Clone)]
pub struct XmlDownload {
    /// Suggested filename, `{report_number}.xml`.
    pub filename: String,
    /// The full document.
    pub xml: String,
}
