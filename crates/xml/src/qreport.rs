// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The EU CBAM quarterly-declaration (QReport) document model.
//!
//! The document is a pure view of report data at generation time: the caller
//! assembles a [`QReport`] and renders it with [`QReport::to_xml`]. Emission
//! values are carried in the engine's canonical tCO2e and converted to the
//! registry's kg CO2e wire unit (UnitCode `KGM`) here, at the serialization
//! boundary, and nowhere else.

use crate::error::XmlError;
use crate::writer::XmlWriter;
use cbam_domain::{CbamCategory, EmissionsBreakdown, ReportingPeriod};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Registry namespace for quarterly declarations.
pub const CBAM_NAMESPACE: &str = "urn:ec.europa.eu:taxud:cbam:services:v1";
/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// QReport schema version.
pub const SCHEMA_VERSION: &str = "23.00";

/// Report type marker written into merged declaration headers.
pub const MERGED_REPORT_TYPE: &str = "MERGED_QUARTERLY";

/// How the emission figures in a good were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactorSource {
    /// EU default factors applied to net weight.
    #[default]
    Default,
    /// Measured values supplied by the producer.
    Actual,
}

impl FactorSource {
    /// Returns the registry wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Actual => "ACTUAL",
        }
    }
}

/// Declarant (EU importer) identity and address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarantBlock {
    /// EORI identification number.
    pub eori: String,
    /// Legal name.
    pub name: String,
    /// Street line of the registered address.
    pub street: String,
    /// City of the registered address.
    pub city: String,
    /// Postal code of the registered address.
    pub postal_code: String,
    /// ISO-2 country code of the registered address.
    pub country: String,
}

/// Producing installation identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstallationBlock {
    /// Operator-assigned installation identifier.
    pub identifier: String,
    /// Installation name.
    pub name: String,
    /// ISO-2 country code of the installation.
    pub country: String,
    /// Free-text installation address, when known.
    pub address: Option<String>,
}

/// One imported good in the declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GoodBlock {
    /// Commodity code as declared (CN preferred, HS accepted).
    pub commodity_code: String,
    /// Free-text product description.
    pub description: String,
    /// CBAM category of the good.
    pub category: CbamCategory,
    /// Net mass in kilograms.
    pub net_mass_kg: f64,
    /// ISO-2 country of origin.
    pub country_of_origin: String,
    /// The producing installation.
    pub installation: InstallationBlock,
    /// Embedded emissions in canonical tCO2e.
    pub emissions: EmissionsBreakdown,
    /// Electricity consumed during production, MWh, when declared.
    pub electricity_mwh: Option<f64>,
    /// Provenance of the emission figures.
    pub factor_source: FactorSource,
}

/// Aggregate totals for a merged declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedTotals {
    /// Sum of constituent net masses, kg.
    pub total_net_mass_kg: f64,
    /// Sum of direct emissions, tCO2e.
    pub total_direct_tco2: f64,
    /// Sum of indirect emissions, tCO2e.
    pub total_indirect_tco2: f64,
    /// Sum of total emissions, tCO2e.
    pub total_tco2: f64,
    /// Sum of estimated CBAM costs, EUR.
    pub estimated_cost_eur: f64,
}

/// Whether this is a per-shipment or a merged quarterly declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    /// A single-good quarterly declaration.
    #[default]
    Quarterly,
    /// A consolidated declaration carrying one good per constituent report.
    MergedQuarterly,
}

/// A complete QReport document.
///
/// Rendering is deterministic: the timestamp is part of the document, not
/// read from a clock during serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct QReport {
    /// Report number, written as the message identifier.
    pub message_identifier: String,
    /// Document timestamp, written in RFC 3339 form.
    pub sending_date_time: OffsetDateTime,
    /// Single or merged declaration.
    pub kind: ReportKind,
    /// The declarant block.
    pub declarant: DeclarantBlock,
    /// The reporting period.
    pub period: ReportingPeriod,
    /// The goods, one block per report.
    pub goods: Vec<GoodBlock>,
    /// Aggregate totals, present on merged declarations.
    pub totals: Option<AggregatedTotals>,
}

impl QReport {
    /// Renders the document to indented XML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written or encoded. Schema
    /// findings are not surfaced here; see the artifact layer.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        let mut w: XmlWriter = XmlWriter::new()?;

        w.start_element_with_attrs(
            "QReport",
            &[
                ("xmlns", CBAM_NAMESPACE),
                ("xmlns:xsi", XSI_NAMESPACE),
                ("version", SCHEMA_VERSION),
            ],
        )?;

        self.write_header(&mut w)?;
        self.write_declarant(&mut w)?;
        self.write_period(&mut w)?;
        self.write_goods(&mut w)?;
        if let Some(totals) = &self.totals {
            Self::write_totals(&mut w, totals)?;
        }

        w.end_element("QReport")?;
        w.into_string()
    }

    fn write_header(&self, w: &mut XmlWriter) -> Result<(), XmlError> {
        w.start_element("Header")?;
        w.text_element("MessageIdentifier", &self.message_identifier)?;
        w.text_element("SendingDateTime", &self.sending_date_time.format(&Rfc3339)?)?;
        if self.kind == ReportKind::MergedQuarterly {
            w.text_element("ReportType", MERGED_REPORT_TYPE)?;
            w.text_element("GoodsCount", &self.goods.len().to_string())?;
        }
        w.end_element("Header")
    }

    fn write_declarant(&self, w: &mut XmlWriter) -> Result<(), XmlError> {
        w.start_element("Declarant")?;
        w.text_element("IdentificationNumber", &self.declarant.eori)?;
        w.text_element("Name", &self.declarant.name)?;
        w.start_element("Address")?;
        w.text_element("StreetName", &self.declarant.street)?;
        w.text_element("CityName", &self.declarant.city)?;
        w.text_element("PostCode", &self.declarant.postal_code)?;
        w.text_element("CountryCode", &self.declarant.country)?;
        w.end_element("Address")?;
        w.end_element("Declarant")
    }

    fn write_period(&self, w: &mut XmlWriter) -> Result<(), XmlError> {
        w.start_element("ReportingPeriod")?;
        w.text_element("Year", &self.period.year().to_string())?;
        w.text_element("Quarter", &self.period.quarter().to_string())?;
        w.end_element("ReportingPeriod")
    }

    fn write_goods(&self, w: &mut XmlWriter) -> Result<(), XmlError> {
        w.start_element("GoodsImported")?;
        for (index, good) in self.goods.iter().enumerate() {
            if self.kind == ReportKind::MergedQuarterly {
                let sequence: String = (index + 1).to_string();
                w.start_element_with_attrs("Good", &[("sequenceNumber", &sequence)])?;
            } else {
                w.start_element("Good")?;
            }
            Self::write_good(w, good)?;
            w.end_element("Good")?;
        }
        w.end_element("GoodsImported")
    }

    fn write_good(w: &mut XmlWriter, good: &GoodBlock) -> Result<(), XmlError> {
        w.text_element("CommodityCode", &good.commodity_code)?;
        w.text_element("CommodityCodeDescription", &good.description)?;
        w.text_element("CBAMGoodCategory", &wire_category(good.category))?;

        w.start_element("NetMass")?;
        w.text_element("Value", &format_number(good.net_mass_kg))?;
        w.text_element("UnitCode", "KGM")?;
        w.end_element("NetMass")?;

        w.text_element("CountryOfOrigin", &good.country_of_origin)?;

        w.start_element("Installation")?;
        w.text_element("InstallationIdentifier", &good.installation.identifier)?;
        w.text_element("Name", &good.installation.name)?;
        w.start_element("Location")?;
        w.text_element("CountryCode", &good.installation.country)?;
        if let Some(address) = &good.installation.address {
            w.text_element("Address", address)?;
        }
        w.end_element("Location")?;
        w.end_element("Installation")?;

        w.start_element("EmbeddedEmissions")?;
        write_emission_value(w, "DirectEmissions", good.emissions.direct_tco2)?;
        write_emission_value(w, "IndirectEmissions", good.emissions.indirect_tco2)?;
        write_emission_value(w, "TotalEmissions", good.emissions.total_tco2)?;

        // Specific embedded emissions, tCO2e per tonne of product.
        let tonnes: f64 = good.net_mass_kg / 1000.0;
        let specific: f64 = if tonnes > 0.0 {
            round_to(good.emissions.total_tco2 / tonnes, 4)
        } else {
            0.0
        };
        w.start_element("SpecificEmbeddedEmissions")?;
        w.text_element("Value", &format_number(specific))?;
        w.text_element("UnitCode", "TNE")?;
        w.end_element("SpecificEmbeddedEmissions")?;

        if let Some(mwh) = good.electricity_mwh {
            w.start_element("ElectricityConsumption")?;
            w.text_element("Value", &format_number(mwh))?;
            w.text_element("UnitCode", "MWH")?;
            w.end_element("ElectricityConsumption")?;
        }

        w.text_element("EmissionFactorSource", good.factor_source.as_str())?;
        w.end_element("EmbeddedEmissions")
    }

    fn write_totals(w: &mut XmlWriter, totals: &AggregatedTotals) -> Result<(), XmlError> {
        w.start_element("AggregatedTotals")?;
        w.text_element("TotalNetMassKg", &format_number(totals.total_net_mass_kg))?;
        w.text_element(
            "TotalDirectEmissionsKg",
            &format_number(tco2_to_wire_kg(totals.total_direct_tco2)),
        )?;
        w.text_element(
            "TotalIndirectEmissionsKg",
            &format_number(tco2_to_wire_kg(totals.total_indirect_tco2)),
        )?;
        w.text_element(
            "TotalEmissionsKg",
            &format_number(tco2_to_wire_kg(totals.total_tco2)),
        )?;
        w.text_element(
            "EstimatedCBAMCostEUR",
            &format_number(round_to(totals.estimated_cost_eur, 2)),
        )?;
        w.end_element("AggregatedTotals")
    }
}

/// Converts a category to the registry wire form, e.g. `IRON STEEL`.
#[must_use]
pub fn wire_category(category: CbamCategory) -> String {
    category.as_str().to_uppercase().replace('_', " ")
}

/// Converts canonical tCO2e to the wire unit (kg CO2e), rounded to 2 dp.
#[must_use]
pub fn tco2_to_wire_kg(tco2: f64) -> f64 {
    round_to(tco2 * 1000.0, 2)
}

fn write_emission_value(w: &mut XmlWriter, name: &str, tco2: f64) -> Result<(), XmlError> {
    w.start_element(name)?;
    w.text_element("Value", &format_number(tco2_to_wire_kg(tco2)))?;
    w.text_element("UnitCode", "KGM")?;
    w.end_element(name)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale: f64 = f64::from(10_u32.pow(decimals));
    (value * scale).round() / scale
}

fn format_number(value: f64) -> String {
    // f64 Display is the shortest round-trip form: 11000 not 11000.0.
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_good() -> GoodBlock {
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

    fn sample_report() -> QReport {
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
            goods: vec![sample_good()],
            totals: None,
        }
    }

    #[test]
    fn single_report_carries_the_registry_envelope() {
        let xml = sample_report().to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns=\"urn:ec.europa.eu:taxud:cbam:services:v1\""));
        assert!(xml.contains("version=\"23.00\""));
        assert!(xml.contains("<MessageIdentifier>CBAM-20240115103000-A1B2</MessageIdentifier>"));
        assert!(xml.contains("<SendingDateTime>2024-01-15T10:30:00Z</SendingDateTime>"));
        assert!(xml.contains("<IdentificationNumber>DE123456789012345</IdentificationNumber>"));
        assert!(xml.contains("<Year>2024</Year>"));
        assert!(xml.contains("<Quarter>4</Quarter>"));
    }

    #[test]
    fn single_report_has_no_merged_header_fields() {
        let xml = sample_report().to_xml().unwrap();
        assert!(!xml.contains("<ReportType>"));
        assert!(!xml.contains("<GoodsCount>"));
        assert!(!xml.contains("sequenceNumber"));
        assert!(!xml.contains("<AggregatedTotals>"));
    }

    fn without_whitespace(xml: &str) -> String {
        xml.split_whitespace().collect()
    }

    #[test]
    fn emissions_are_written_in_kg_with_kgm_unit() {
        let xml = sample_report().to_xml().unwrap();
        let flat = without_whitespace(&xml);

        // 9.5 / 1.5 / 11.0 tCO2e on the wire as kg CO2e.
        assert!(flat.contains("<DirectEmissions><Value>9500</Value>"));
        assert!(flat.contains("<IndirectEmissions><Value>1500</Value>"));
        assert!(flat.contains("<TotalEmissions><Value>11000</Value>"));
        assert_eq!(xml.matches("<UnitCode>KGM</UnitCode>").count(), 4);
    }

    #[test]
    fn specific_emissions_are_per_tonne_of_product() {
        let xml = sample_report().to_xml().unwrap();
        // 11 tCO2e over 5 tonnes of product.
        assert!(without_whitespace(&xml).contains("<SpecificEmbeddedEmissions><Value>2.2</Value>"));
        assert!(xml.contains("<UnitCode>TNE</UnitCode>"));
    }

    #[test]
    fn zero_mass_does_not_divide() {
        let mut report = sample_report();
        report.goods[0].net_mass_kg = 0.0;
        let xml = report.to_xml().unwrap();
        assert!(without_whitespace(&xml).contains("<SpecificEmbeddedEmissions><Value>0</Value>"));
    }

    #[test]
    fn category_uses_the_registry_wire_form() {
        assert_eq!(wire_category(CbamCategory::IronSteel), "IRON STEEL");
        assert_eq!(wire_category(CbamCategory::Aluminium), "ALUMINIUM");
        let xml = sample_report().to_xml().unwrap();
        assert!(xml.contains("<CBAMGoodCategory>IRON STEEL</CBAMGoodCategory>"));
    }

    #[test]
    fn description_is_escaped() {
        let mut report = sample_report();
        report.goods[0].description = String::from("Rods & bars <6mm>");
        let xml = report.to_xml().unwrap();
        assert!(xml.contains("Rods &amp; bars &lt;6mm&gt;"));
    }

    #[test]
    fn merged_report_carries_header_counts_sequence_numbers_and_totals() {
        let mut second = sample_good();
        second.commodity_code = String::from("76061200");
        second.category = CbamCategory::Aluminium;
        second.emissions = EmissionsBreakdown::new(40.0, 32.5);

        let mut report = sample_report();
        report.kind = ReportKind::MergedQuarterly;
        report.message_identifier = String::from("CBAM-MERGED-20240115103000");
        report.goods.push(second);
        report.totals = Some(AggregatedTotals {
            total_net_mass_kg: 10_000.0,
            total_direct_tco2: 49.5,
            total_indirect_tco2: 34.0,
            total_tco2: 83.5,
            estimated_cost_eur: 6680.0,
        });

        let xml = report.to_xml().unwrap();
        assert!(xml.contains("<ReportType>MERGED_QUARTERLY</ReportType>"));
        assert!(xml.contains("<GoodsCount>2</GoodsCount>"));
        assert!(xml.contains("<Good sequenceNumber=\"1\">"));
        assert!(xml.contains("<Good sequenceNumber=\"2\">"));
        assert!(xml.contains("<TotalNetMassKg>10000</TotalNetMassKg>"));
        assert!(xml.contains("<TotalEmissionsKg>83500</TotalEmissionsKg>"));
        assert!(xml.contains("<EstimatedCBAMCostEUR>6680</EstimatedCBAMCostEUR>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let report = sample_report();
        assert_eq!(report.to_xml().unwrap(), report.to_xml().unwrap());
    }

    #[test]
    fn electricity_consumption_appears_when_declared() {
        let mut report = sample_report();
        report.goods[0].electricity_mwh = Some(2.5);
        let xml = report.to_xml().unwrap();
        assert!(xml.contains("<ElectricityConsumption>"));
        assert!(xml.contains("<UnitCode>MWH</UnitCode>"));
    }
}
