// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The operations behind each HTTP endpoint.
//!
//! Handlers parse string-typed request fields into domain types, drive the
//! engine, and hand persistence failures to the error translators. They are
//! transport-agnostic; the server crate wires them to routes.

use crate::error::ApiError;
use crate::request_response::{
    CategoryFactors, ClassifyRequest, ClassifyResponse, ComputeEmissionsRequest,
    ComputeEmissionsResponse, CreateReportRequest, CreateReportResponse, FactorsResponse,
    GenerateXmlResponse, MergeRequest, MergedReportResponse, ReportResponse, ValidateRequest,
    XmlDownload,
};
use cbam_domain::{
    CbamCategory, CommodityCode, EU_CARBON_PRICE_EUR_PER_TCO2E, EmissionFactor, EmissionsBreakdown,
    FactorTable, ReportDraft, ReportStatus, ReportingPeriod, ValidationResult, classify,
    compute_emissions, estimated_cost_eur, round_eur_for_display, round_tco2_for_display, validate,
};
use cbam_engine::{
    MergedReport, Report, ReportInput, generate_artifact, generate_merged_artifact, merge_reports,
    validate_report,
};
use cbam_persistence::{Persistence, PersistenceError};
use cbam_xml::{FactorSource, XmlArtifact};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

const REQUIRED_CATEGORY_ERROR: &str = "CBAM category is required.";

/// Classifies a commodity code into a CBAM category.
#[must_use]
pub fn classify_commodity(table: &FactorTable, request: &ClassifyRequest) -> ClassifyResponse {
    let code: CommodityCode = CommodityCode::new(&request.commodity_code);
    let category: Option<CbamCategory> = classify(&code);
    let chapter: &str = code.chapter();
    debug!(code = %code, ?category, "classified commodity code");
    ClassifyResponse {
        commodity_code: code.value().to_string(),
        chapter: (chapter.len() == 2).then(|| chapter.to_string()),
        category: category.map(|c| c.as_str().to_string()),
        display_name: category.map(|c| c.display_name().to_string()),
        emission_factor: category.map(|c| *table.factor(c)),
    }
}

/// Computes embedded emissions and the estimated CBAM cost.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown category name.
pub fn compute(
    table: &FactorTable,
    request: &ComputeEmissionsRequest,
) -> Result<ComputeEmissionsResponse, ApiError> {
    let category: CbamCategory = CbamCategory::from_str(&request.category)?;
    let emissions: EmissionsBreakdown = compute_emissions(
        table,
        category,
        request.net_weight_kg,
        request.measured_direct_tco2,
        request.measured_indirect_tco2,
    );
    let measured: bool = matches!(
        (request.measured_direct_tco2, request.measured_indirect_tco2),
        (Some(direct), Some(indirect)) if direct >= 0.0 && indirect >= 0.0
    );
    let source: FactorSource = if measured {
        FactorSource::Actual
    } else {
        FactorSource::Default
    };
    Ok(ComputeEmissionsResponse {
        category: category.as_str().to_string(),
        direct_tco2: round_tco2_for_display(emissions.direct_tco2),
        indirect_tco2: round_tco2_for_display(emissions.indirect_tco2),
        total_tco2: round_tco2_for_display(emissions.total_tco2),
        estimated_cost_eur: round_eur_for_display(estimated_cost_eur(emissions.total_tco2)),
        factor_source: source.as_str().to_string(),
    })
}

/// Validates draft report data against the EU rules.
///
/// An unparseable category name is reported in place of the missing-category
/// error rather than failing the request; validation output is data.
#[must_use]
pub fn validate_draft(table: &FactorTable, request: &ValidateRequest) -> ValidationResult {
    let (category, category_error): (Option<CbamCategory>, Option<String>) =
        match request.category.as_deref() {
            Some(raw) => match CbamCategory::from_str(raw) {
                Ok(parsed) => (Some(parsed), None),
                Err(err) => (None, Some(err.to_string())),
            },
            None => (None, None),
        };

    let draft = ReportDraft {
        commodity_code: request.commodity_code.clone(),
        product_description: request.product_description.clone(),
        net_weight_kg: request.net_weight_kg,
        category,
        reporting_period: request.reporting_period.clone(),
        country_of_origin: request.country_of_origin.clone(),
    };
    let mut result: ValidationResult = validate(table, &draft);
    if let Some(message) = category_error {
        for error in &mut result.errors {
            if error == REQUIRED_CATEGORY_ERROR {
                *error = message;
                break;
            }
        }
    }
    result
}

/// Creates a report, runs rule validation over it, and persists it.
///
/// A clean draft lands as `Validated`; an unclean one stays `Draft` and can
/// be corrected and re-validated later. The validation findings travel in
/// the response so the caller sees why a draft stayed unclean.
///
/// # Errors
///
/// Returns `InvalidInput` for unparseable fields and for codes outside CBAM
/// scope when no category was supplied.
pub fn create_report(
    store: &mut Persistence,
    table: &FactorTable,
    request: CreateReportRequest,
    now: OffsetDateTime,
) -> Result<CreateReportResponse, ApiError> {
    let mut report: Report = build_report(table, request, now)?;
    let rules: ValidationResult = validate_report(table, &mut report);
    store.insert_report(&report)?;
    info!(report_id = %report.id, report_number = %report.report_number, "created report");
    Ok(CreateReportResponse {
        report: ReportResponse::from(&report),
        errors: rules.errors,
        warnings: rules.warnings,
    })
}

/// Lists all reports, newest first.
///
/// # Errors
///
/// Returns `Internal` on storage failures.
pub fn list_reports(store: &Persistence) -> Result<Vec<ReportResponse>, ApiError> {
    let reports: Vec<Report> = store.list_reports()?;
    Ok(reports.iter().map(ReportResponse::from).collect())
}

/// Fetches a single report.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the id is unknown.
pub fn get_report(store: &Persistence, id: Uuid) -> Result<ReportResponse, ApiError> {
    let report: Report = store
        .fetch_report(id)?
        .ok_or(PersistenceError::ReportNotFound(id))?;
    Ok(ReportResponse::from(&report))
}

/// Deletes a report, cascading to any merged reports that reference it.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the id is unknown.
pub fn delete_report(store: &mut Persistence, id: Uuid) -> Result<(), ApiError> {
    if store.delete_report(id)? {
        info!(report_id = %id, "deleted report");
        Ok(())
    } else {
        Err(PersistenceError::ReportNotFound(id).into())
    }
}

/// Creates a report and serializes it to QReport XML in one step.
///
/// The report is persisted regardless of validity; `is_valid` reflects both
/// the EU rule check and the schema-equivalence check, and a fully valid
/// report is finalized immediately.
///
/// # Errors
///
/// Returns `InvalidInput` for unparseable fields, `Internal` on storage or
/// serialization failures.
pub fn generate_xml(
    store: &mut Persistence,
    table: &FactorTable,
    request: CreateReportRequest,
    now: OffsetDateTime,
) -> Result<GenerateXmlResponse, ApiError> {
    let mut report: Report = build_report(table, request, now)?;
    let rules: ValidationResult = validate_report(table, &mut report);
    let artifact: XmlArtifact = generate_artifact(&report, now)?;

    let mut errors: Vec<String> = rules.errors;
    errors.extend(artifact.validation_errors.iter().cloned());
    let mut warnings: Vec<String> = rules.warnings;
    warnings.extend(artifact.validation_warnings.iter().cloned());
    let is_valid: bool = rules.valid && artifact.is_valid;

    if is_valid {
        report.transition(ReportStatus::Finalized)?;
    }
    store.insert_report(&report)?;
    info!(
        report_id = %report.id,
        report_number = %report.report_number,
        is_valid,
        "generated QReport XML"
    );

    Ok(GenerateXmlResponse {
        report_id: report.id,
        report_number: report.report_number,
        is_valid,
        errors,
        warnings,
        xml_preview: artifact.preview(),
        total_emissions_tco2: round_tco2_for_display(report.emissions.total_tco2),
    })
}

/// Serializes a stored report to QReport XML for download.
///
/// Downloading a validated report finalizes it.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the id is unknown, `Internal` on
/// serialization failures.
pub fn download_xml(
    store: &mut Persistence,
    id: Uuid,
    now: OffsetDateTime,
) -> Result<XmlDownload, ApiError> {
    let report: Report = store
        .fetch_report(id)?
        .ok_or(PersistenceError::ReportNotFound(id))?;
    let artifact: XmlArtifact = generate_artifact(&report, now)?;
    if report.status == ReportStatus::Validated {
        store.update_status(id, ReportStatus::Finalized)?;
    }
    Ok(XmlDownload {
        filename: artifact.filename(),
        xml: artifact.xml,
    })
}

/// Merges reports of one declarant and period into a single submission.
///
/// Constituents eligible for the merged status are marked `Merged`; the
/// originals stay stored, so a merge can be discarded later.
///
/// # Errors
///
/// Returns `MergeRejected` for fewer than two ids or incompatible reports,
/// `ResourceNotFound` when an id is unknown.
pub fn merge(
    store: &mut Persistence,
    request: &MergeRequest,
    now: OffsetDateTime,
) -> Result<MergedReportResponse, ApiError> {
    let reports: Vec<Report> = store.fetch_reports_snapshot(&request.report_ids)?;
    let merged: MergedReport = merge_reports(&reports, now)?;
    store.insert_merged(&merged)?;
    for report in &reports {
        if report.status.can_transition_to(ReportStatus::Merged) {
            store.update_status(report.id, ReportStatus::Merged)?;
        }
    }
    info!(
        merged_id = %merged.id,
        report_number = %merged.report_number,
        goods_count = merged.goods_count,
        "merged reports"
    );
    Ok(MergedReportResponse::from(&merged))
}

/// Lists all merged reports, newest first.
///
/// # Errors
///
/// Returns `Internal` on storage failures.
pub fn list_merged(store: &Persistence) -> Result<Vec<MergedReportResponse>, ApiError> {
    let merged: Vec<MergedReport> = store.list_merged()?;
    Ok(merged.iter().map(MergedReportResponse::from).collect())
}

/// Fetches a single merged report.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the id is unknown.
pub fn get_merged(store: &Persistence, id: Uuid) -> Result<MergedReportResponse, ApiError> {
    let merged: MergedReport = store
        .fetch_merged(id)?
        .ok_or(PersistenceError::MergedReportNotFound(id))?;
    Ok(MergedReportResponse::from(&merged))
}

/// Serializes a merged report to QReport XML for download.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the id is unknown, `Internal` if a
/// constituent has vanished or serialization fails.
pub fn download_merged_xml(
    store: &mut Persistence,
    id: Uuid,
    now: OffsetDateTime,
) -> Result<XmlDownload, ApiError> {
    let merged: MergedReport = store
        .fetch_merged(id)?
        .ok_or(PersistenceError::MergedReportNotFound(id))?;
    let constituents: Vec<Report> = store.fetch_reports_snapshot(&merged.report_ids)?;
    let artifact: XmlArtifact = generate_merged_artifact(&merged, &constituents, now)?;
    Ok(XmlDownload {
        filename: artifact.filename(),
        xml: artifact.xml,
    })
}

/// Discards a merged report, reverting its constituents to `Finalized`.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the id is unknown.
pub fn discard_merged(store: &mut Persistence, id: Uuid) -> Result<(), ApiError> {
    if store.discard_merged(id)? {
        info!(merged_id = %id, "discarded merged report");
        Ok(())
    } else {
        Err(PersistenceError::MergedReportNotFound(id).into())
    }
}

/// Reports the active factor table and carbon price.
#[must_use]
pub fn factors(table: &FactorTable) -> FactorsResponse {
    let factors: Vec<CategoryFactors> = CbamCategory::ALL
        .iter()
        .map(|&category| {
            let factor: &EmissionFactor = table.factor(category);
            CategoryFactors {
                category: category.as_str().to_string(),
                display_name: category.display_name().to_string(),
                direct_tco2_per_tonne: factor.direct_tco2_per_tonne,
                indirect_tco2_per_tonne: factor.indirect_tco2_per_tonne,
                electricity_mwh_per_tonne: factor.electricity_mwh_per_tonne,
            }
        })
        .collect();
    FactorsResponse {
        carbon_price_eur_per_tco2e: EU_CARBON_PRICE_EUR_PER_TCO2E,
        factors,
    }
}

fn build_report(
    table: &FactorTable,
    request: CreateReportRequest,
    now: OffsetDateTime,
) -> Result<Report, ApiError> {
    let reporting_period: ReportingPeriod = ReportingPeriod::from_str(&request.reporting_period)?;
    let category: Option<CbamCategory> = request
        .category
        .as_deref()
        .map(CbamCategory::from_str)
        .transpose()?;
    let input = ReportInput {
        commodity_code: request.commodity_code,
        product_description: request.product_description,
        category,
        quantity: request.quantity.unwrap_or(1.0),
        quantity_unit: request.quantity_unit.unwrap_or_else(|| String::from("KGS")),
        net_weight_kg: request.net_weight_kg,
        country_of_origin: request.country_of_origin,
        reporting_period,
        declarant: request.declarant,
        installation: request.installation,
        measured_direct_tco2: request.measured_direct_tco2,
        measured_indirect_tco2: request.measured_indirect_tco2,
        electricity_mwh: request.electricity_mwh,
    };
    Ok(Report::create(input, table, now)?)
}
