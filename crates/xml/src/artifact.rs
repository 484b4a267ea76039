// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Generated declaration artifacts.

use crate::error::XmlError;
use crate::qreport::QReport;
use crate::schema::{self, SchemaFindings};

/// Maximum number of bytes shown in a preview before truncation.
pub const PREVIEW_LIMIT_BYTES: usize = 1000;

/// Marker appended to a truncated preview. An XML comment, so a truncated
/// preview still renders sensibly in XML-aware viewers.
pub const TRUNCATION_MARKER: &str = "\n<!-- preview truncated -->";

/// A generated XML declaration plus its schema-equivalence verdict.
///
/// Pure function of the source document at generation time. Never mutated;
/// callers regenerate instead. The artifact is produced even when the check
/// fails so the caller can inspect what was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlArtifact {
    /// The report number of the source document.
    pub report_number: String,
    /// The complete XML text.
    pub xml: String,
    /// Whether the schema-equivalence check passed.
    pub is_valid: bool,
    /// Blocking schema findings.
    pub validation_errors: Vec<String>,
    /// Non-blocking schema findings.
    pub validation_warnings: Vec<String>,
}

impl XmlArtifact {
    /// Renders a document and runs the schema-equivalence check over it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the document cannot be written at all.
    /// Schema findings land in the artifact, not in the error channel.
    pub fn generate(report: &QReport) -> Result<Self, XmlError> {
        let xml: String = report.to_xml()?;
        let findings: SchemaFindings = schema::check(report);
        Ok(Self {
            report_number: report.message_identifier.clone(),
            xml,
            is_valid: findings.is_valid(),
            validation_errors: findings.errors,
            validation_warnings: findings.warnings,
        })
    }

    /// Returns the human-readable preview.
    ///
    /// Byte-identical to [`Self::xml`] up to the preview limit; longer
    /// documents are cut at a character boundary and the truncation marker is
    /// appended.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.xml.len() <= PREVIEW_LIMIT_BYTES {
            return self.xml.clone();
        }
        let mut cut: usize = PREVIEW_LIMIT_BYTES;
        while !self.xml.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut preview: String = String::from(&self.xml[..cut]);
        preview.push_str(TRUNCATION_MARKER);
        preview
    }

    /// Returns the filename for a download of this artifact.
    #[must_use]
    pub fn filename(&self) -> String {
        format!("{}.xml", self.report_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qreport::{
        DeclarantBlock, FactorSource, GoodBlock, InstallationBlock, ReportKind,
    };
    use cbam_domain::{CbamCategory, EmissionsBreakdown, ReportingPeriod};
    use time::macros::datetime;

    fn report(goods: Vec<GoodBlock>) -> QReport {
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
            goods,
            totals: None,
        }
    }

    fn good() -> GoodBlock {
        GoodBlock {
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
            factor_source: FactorSource::Default,
        }
    }

    #[test]
    fn valid_document_yields_a_valid_artifact() {
        let artifact = XmlArtifact::generate(&report(vec![good()])).unwrap();
        assert!(artifact.is_valid);
        assert!(artifact.validation_errors.is_empty());
        assert_eq!(artifact.filename(), "CBAM-20240115103000-A1B2.xml");
    }

    #[test]
    fn invalid_document_still_yields_an_artifact() {
        let artifact = XmlArtifact::generate(&report(Vec::new())).unwrap();
        assert!(!artifact.is_valid);
        assert!(!artifact.xml.is_empty());
        assert_eq!(
            artifact.validation_errors,
            vec![String::from("Declaration contains no goods.")]
        );
    }

    #[test]
    fn short_previews_are_byte_identical_to_the_document() {
        let artifact = XmlArtifact::generate(&report(Vec::new())).unwrap();
        assert!(artifact.xml.len() <= PREVIEW_LIMIT_BYTES);
        assert_eq!(artifact.preview(), artifact.xml);
    }

    #[test]
    fn long_previews_truncate_with_an_explicit_marker() {
        let artifact = XmlArtifact::generate(&report(vec![good(), good(), good()])).unwrap();
        assert!(artifact.xml.len() > PREVIEW_LIMIT_BYTES);

        let preview = artifact.preview();
        assert!(preview.ends_with(TRUNCATION_MARKER));
        let body = preview.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert!(artifact.xml.starts_with(body));
        assert_eq!(body.len(), PREVIEW_LIMIT_BYTES);
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let mut wide = good();
        wide.description = "Stäbe und Träger ".repeat(100);
        let artifact = XmlArtifact::generate(&report(vec![wide])).unwrap();
        let preview = artifact.preview();
        let body = preview.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert!(body.len() <= PREVIEW_LIMIT_BYTES);
        assert!(artifact.xml.starts_with(body));
    }
}
