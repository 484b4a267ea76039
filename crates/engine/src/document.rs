// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping from report records to QReport documents.
//!
//! The timestamp is an explicit argument so document generation stays a pure
//! function of its inputs; handlers pass the current time once.

use crate::error::EngineError;
use crate::merge::MergedReport;
use crate::report::Report;
use cbam_xml::{
    AggregatedTotals, DeclarantBlock, GoodBlock, InstallationBlock, QReport, ReportKind,
    XmlArtifact,
};
use time::OffsetDateTime;

fn declarant_block(report: &Report) -> DeclarantBlock {
    DeclarantBlock {
        eori: report.declarant.eori.clone(),
        name: report.declarant.name.clone(),
        street: report.declarant.street.clone(),
        city: report.declarant.city.clone(),
        postal_code: report.declarant.postal_code.clone(),
        country: report.declarant.country.clone(),
    }
}

fn good_block(report: &Report) -> GoodBlock {
    GoodBlock {
        commodity_code: report.commodity_code.clone(),
        description: report.product_description.clone(),
        category: report.category,
        net_mass_kg: report.net_weight_kg,
        country_of_origin: report.country_of_origin.clone(),
        installation: InstallationBlock {
            identifier: report.installation_id.clone(),
            name: report.installation_name.clone(),
            country: report.installation_country.clone(),
            address: report.installation_address.clone(),
        },
        emissions: report.emissions,
        electricity_mwh: report.electricity_mwh,
        factor_source: report.factor_source(),
    }
}

/// Builds the single-good declaration document for a report.
#[must_use]
pub fn declaration(report: &Report, sending_date_time: OffsetDateTime) -> QReport {
    QReport {
        message_identifier: report.report_number.clone(),
        sending_date_time,
        kind: ReportKind::Quarterly,
        declarant: declarant_block(report),
        period: report.reporting_period,
        goods: vec![good_block(report)],
        totals: None,
    }
}

/// Builds the consolidated declaration document for a merged report.
///
/// The declarant block is taken from the first constituent; the merge
/// preconditions guarantee all constituents share it.
#[must_use]
pub fn merged_declaration(
    merged: &MergedReport,
    constituents: &[Report],
    sending_date_time: OffsetDateTime,
) -> QReport {
    QReport {
        message_identifier: merged.report_number.clone(),
        sending_date_time,
        kind: ReportKind::MergedQuarterly,
        declarant: constituents.first().map(declarant_block).unwrap_or_default(),
        period: merged.reporting_period,
        goods: constituents.iter().map(good_block).collect(),
        totals: Some(AggregatedTotals {
            total_net_mass_kg: merged.total_net_mass_kg,
            total_direct_tco2: merged.total_direct_tco2,
            total_indirect_tco2: merged.total_indirect_tco2,
            total_tco2: merged.total_tco2,
            estimated_cost_eur: merged.total_cost_eur,
        }),
    }
}

/// Generates the XML artifact for a report.
///
/// # Errors
///
/// Returns an error only if the document cannot be written at all; schema
/// findings travel inside the artifact.
pub fn generate_artifact(
    report: &Report,
    sending_date_time: OffsetDateTime,
) -> Result<XmlArtifact, EngineError> {
    Ok(XmlArtifact::generate(&declaration(report, sending_date_time))?)
}

/// Generates the XML artifact for a merged report.
///
/// # Errors
///
/// Returns an error only if the document cannot be written at all.
pub fn generate_merged_artifact(
    merged: &MergedReport,
    constituents: &[Report],
    sending_date_time: OffsetDateTime,
) -> Result<XmlArtifact, EngineError> {
    Ok(XmlArtifact::generate(&merged_declaration(
        merged,
        constituents,
        sending_date_time,
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_reports;
    use crate::report::{DeclarantDetails, InstallationDetails, ReportInput};
    use cbam_domain::{CbamCategory, FactorTable, ReportingPeriod};
    use time::macros::datetime;

    fn build_report(code: &str, category: CbamCategory, weight_kg: f64) -> Report {
        let input = ReportInput {
            commodity_code: String::from(code),
            product_description: String::from("Sample product for declarations"),
            category: Some(category),
            quantity: 1.0,
            quantity_unit: String::from("KGS"),
            net_weight_kg: weight_kg,
            country_of_origin: String::from("IN"),
            reporting_period: ReportingPeriod::new(2024, 4).unwrap(),
            declarant: DeclarantDetails {
                eori: String::from("DE123456789012345"),
                name: String::from("German Steel Imports GmbH"),
                street: String::from("Industriestrasse 42"),
                city: String::from("Duesseldorf"),
                postal_code: String::from("40210"),
                country: String::from("DE"),
            },
            installation: InstallationDetails {
                identifier: Some(String::from("IN-JSR-001")),
                name: String::from("Jamshedpur Works"),
                country: String::from("IN"),
                address: None,
            },
            measured_direct_tco2: None,
            measured_indirect_tco2: None,
            electricity_mwh: None,
        };
        Report::create(
            input,
            &FactorTable::eu_defaults(),
            datetime!(2024-01-15 10:30:00 UTC),
        )
        .unwrap()
    }

    #[test]
    fn single_declaration_mirrors_the_report() {
        let report = build_report("73181500", CbamCategory::IronSteel, 5000.0);
        let document = declaration(&report, datetime!(2024-01-16 09:00:00 UTC));

        assert_eq!(document.message_identifier, report.report_number);
        assert_eq!(document.goods.len(), 1);
        assert_eq!(document.goods[0].commodity_code, "73181500");
        assert!(document.totals.is_none());
        assert_eq!(document.kind, ReportKind::Quarterly);
    }

    #[test]
    fn artifact_for_a_complete_report_is_valid() {
        let report = build_report("73181500", CbamCategory::IronSteel, 5000.0);
        let artifact = generate_artifact(&report, datetime!(2024-01-16 09:00:00 UTC)).unwrap();

        assert!(artifact.is_valid, "errors: {:?}", artifact.validation_errors);
        assert_eq!(artifact.report_number, report.report_number);
        assert!(artifact.xml.contains("<CommodityCode>73181500</CommodityCode>"));
    }

    #[test]
    fn artifact_flags_an_implausible_eori_without_failing() {
        let mut report = build_report("73181500", CbamCategory::IronSteel, 5000.0);
        report.declarant.eori = String::from("BAD");
        let artifact = generate_artifact(&report, datetime!(2024-01-16 09:00:00 UTC)).unwrap();

        assert!(!artifact.is_valid);
        assert!(!artifact.xml.is_empty());
    }

    #[test]
    fn merged_declaration_carries_all_goods_and_totals() {
        let steel = build_report("73181500", CbamCategory::IronSteel, 5000.0);
        let cement = build_report("25232900", CbamCategory::Cement, 3000.0);
        let merged = merge_reports(
            &[steel.clone(), cement.clone()],
            datetime!(2024-01-20 08:00:00 UTC),
        )
        .unwrap();

        let document = merged_declaration(
            &merged,
            &[steel, cement],
            datetime!(2024-01-20 08:00:00 UTC),
        );
        assert_eq!(document.kind, ReportKind::MergedQuarterly);
        assert_eq!(document.goods.len(), 2);
        let totals = document.totals.unwrap();
        assert!((totals.total_net_mass_kg - 8000.0).abs() < f64::EPSILON);

        let artifact = XmlArtifact::generate(&document).unwrap();
        assert!(artifact.is_valid, "errors: {:?}", artifact.validation_errors);
        assert!(artifact.xml.contains("<GoodsCount>2</GoodsCount>"));
    }
}
