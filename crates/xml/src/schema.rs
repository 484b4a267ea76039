// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema-equivalence checks for generated declarations.
//!
//! A last-line guard that runs on every generated document, independently of
//! the report-level validation pass: required elements present, numeric
//! fields well-formed and non-negative, EORI plausible. The serializer must
//! be safe to call on a report that never went through report validation, so
//! nothing here assumes a clean input.

use crate::qreport::QReport;

/// Findings from a schema-equivalence check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaFindings {
    /// Problems that make the document non-submittable.
    pub errors: Vec<String>,
    /// Irregularities worth surfacing that do not block submission.
    pub warnings: Vec<String>,
}

impl SchemaFindings {
    /// Returns whether the document passed with zero errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks whether a string is a plausible EORI number.
///
/// Plausible means 10 to 17 characters, a 2-letter alphabetic country
/// prefix, and an alphanumeric remainder. This is a format check, not a
/// registry lookup.
#[must_use]
pub fn is_plausible_eori(value: &str) -> bool {
    let length: usize = value.chars().count();
    if !(10..=17).contains(&length) {
        return false;
    }
    let prefix_ok: bool = value
        .chars()
        .take(2)
        .all(|c| c.is_ascii_alphabetic());
    let rest_ok: bool = value.chars().skip(2).all(|c| c.is_ascii_alphanumeric());
    prefix_ok && rest_ok
}

/// Runs the schema-equivalence check over a document.
#[must_use]
pub fn check(report: &QReport) -> SchemaFindings {
    let mut findings: SchemaFindings = SchemaFindings::default();

    if report.message_identifier.trim().is_empty() {
        findings
            .errors
            .push(String::from("Message identifier is empty."));
    }

    if report.declarant.eori.trim().is_empty() {
        findings
            .errors
            .push(String::from("Declarant EORI number is missing."));
    } else if !is_plausible_eori(report.declarant.eori.trim()) {
        findings.errors.push(format!(
            "Declarant EORI number '{}' is not plausible.",
            report.declarant.eori.trim()
        ));
    }

    if report.declarant.name.trim().is_empty() {
        findings
            .errors
            .push(String::from("Declarant name is missing."));
    }

    if report.declarant.country.trim().is_empty() {
        findings
            .warnings
            .push(String::from("Declarant address has no country code."));
    }

    if report.goods.is_empty() {
        findings
            .errors
            .push(String::from("Declaration contains no goods."));
    }

    for (index, good) in report.goods.iter().enumerate() {
        let position: usize = index + 1;

        if good.commodity_code.trim().is_empty() {
            findings
                .errors
                .push(format!("Good {position}: commodity code is missing."));
        }
        if good.description.trim().is_empty() {
            findings
                .errors
                .push(format!("Good {position}: description is missing."));
        }
        if !good.net_mass_kg.is_finite() || good.net_mass_kg <= 0.0 {
            findings
                .errors
                .push(format!("Good {position}: net mass must be a positive number."));
        }
        if good.country_of_origin.trim().is_empty() {
            findings
                .errors
                .push(format!("Good {position}: country of origin is missing."));
        }
        for (label, value) in [
            ("direct emissions", good.emissions.direct_tco2),
            ("indirect emissions", good.emissions.indirect_tco2),
            ("total emissions", good.emissions.total_tco2),
        ] {
            if !value.is_finite() || value < 0.0 {
                findings.errors.push(format!(
                    "Good {position}: {label} must be a non-negative number."
                ));
            }
        }
        if good.installation.name.trim().is_empty() {
            findings
                .warnings
                .push(format!("Good {position}: installation name is missing."));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qreport::{DeclarantBlock, GoodBlock, InstallationBlock, ReportKind};
    use cbam_domain::{CbamCategory, EmissionsBreakdown, ReportingPeriod};
    use time::macros::datetime;

    fn clean_report() -> QReport {
        QReport {
            message_identifier: String::from("CBAM-20240115103000-A1B2"),
            sending_date_time: datetime!(2024-01-15 10:30:00 UTC),
            kind: ReportKind::Quarterly,
            declarant: DeclarantBlock {
                eori: String::from("DE123456789012345"),
                name: String::from("German Steel Imports GmbH"),
                street: String::from("Industriestrasse 42"),
                city: String::from("Duesseldorf"),
                postal_code: String::from("40210"),
                country: String::from("DE"),
            },
            period: ReportingPeriod::new(2024, 4).unwrap(),
            goods: vec![GoodBlock {
                commodity_code: String::from("73181500"),
                description: String::from("Threaded steel fasteners"),
                category: CbamCategory::IronSteel,
                net_mass_kg: 5000.0,
                country_of_origin: String::from("IN"),
                installation: InstallationBlock {
                    identifier: String::from("IN-JSR-001"),
                    name: String::from("Jamshedpur Works"),
                    country: String::from("IN"),
                    address: None,
                },
                emissions: EmissionsBreakdown::new(9.5, 1.5),
                electricity_mwh: None,
                factor_source: crate::qreport::FactorSource::Default,
            }],
            totals: None,
        }
    }

    #[test]
    fn plausible_eori_formats_pass() {
        assert!(is_plausible_eori("DE123456789012345"));
        assert!(is_plausible_eori("IN12345678"));
        assert!(is_plausible_eori("FR1234ABCD9012"));
    }

    #[test]
    fn implausible_eori_formats_fail() {
        // Too short, too long, digit prefix, punctuation.
        assert!(!is_plausible_eori("DE1234567"));
        assert!(!is_plausible_eori("DE1234567890123456"));
        assert!(!is_plausible_eori("12DE34567890"));
        assert!(!is_plausible_eori("DE12345-78901"));
        assert!(!is_plausible_eori(""));
    }

    #[test]
    fn clean_document_has_no_findings() {
        let findings = check(&clean_report());
        assert!(findings.is_valid());
        assert!(findings.errors.is_empty());
        assert!(findings.warnings.is_empty());
    }

    #[test]
    fn bad_eori_is_an_error() {
        let mut report = clean_report();
        report.declarant.eori = String::from("12345");
        let findings = check(&report);
        assert!(!findings.is_valid());
        assert!(findings.errors[0].contains("not plausible"));
    }

    #[test]
    fn missing_goods_is_an_error() {
        let mut report = clean_report();
        report.goods.clear();
        let findings = check(&report);
        assert_eq!(
            findings.errors,
            vec![String::from("Declaration contains no goods.")]
        );
    }

    #[test]
    fn negative_emissions_are_an_error() {
        let mut report = clean_report();
        report.goods[0].emissions = EmissionsBreakdown::new(-1.0, 1.0);
        let findings = check(&report);
        assert!(!findings.is_valid());
        assert!(
            findings
                .errors
                .iter()
                .any(|e| e.contains("direct emissions"))
        );
        // The derived total is 0.0 and passes; only the component fails.
        assert!(!findings.errors.iter().any(|e| e.contains("total emissions")));
    }

    #[test]
    fn missing_installation_name_is_only_a_warning() {
        let mut report = clean_report();
        report.goods[0].installation.name = String::new();
        let findings = check(&report);
        assert!(findings.is_valid());
        assert_eq!(
            findings.warnings,
            vec![String::from("Good 1: installation name is missing.")]
        );
    }

    #[test]
    fn findings_name_the_offending_good() {
        let mut report = clean_report();
        let mut second = report.goods[0].clone();
        second.commodity_code = String::new();
        report.goods.push(second);
        let findings = check(&report);
        assert_eq!(
            findings.errors,
            vec![String::from("Good 2: commodity code is missing.")]
        );
    }
}
