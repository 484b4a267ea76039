// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Raw row shapes and their conversion back into domain records.
//!
//! Row mappers inside `rusqlite` closures only move primitives; all parsing
//! that can fail happens afterwards, in `TryFrom`, so decode problems surface
//! as `CorruptRecord` instead of being swallowed by the driver.

use crate::error::PersistenceError;
use cbam_domain::{CbamCategory, EmissionsBreakdown, ReportStatus, ReportingPeriod};
use cbam_engine::{DeclarantDetails, MergedReport, Report};
use rusqlite::Row;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Column order shared by every `reports` SELECT.
pub const REPORT_COLUMNS: &str = "id, report_number, commodity_code, category, \
     product_description, quantity, quantity_unit, net_weight_kg, country_of_origin, \
     reporting_period, declarant_eori, declarant_name, declarant_street, declarant_city, \
     declarant_postal_code, declarant_country, installation_id, installation_name, \
     installation_country, installation_address, electricity_mwh, direct_tco2, \
     indirect_tco2, measured_emissions, estimated_cost_eur, status, created_at";

/// Column order shared by every `merged_reports` SELECT.
pub const MERGED_COLUMNS: &str = "id, report_number, reporting_period, declarant_eori, \
     declarant_name, goods_count, total_net_mass_kg, total_direct_tco2, \
     total_indirect_tco2, total_tco2, total_cost_eur, report_ids, created_at";

/// A `reports` row as stored.
pub struct ReportRow {
    id: String,
    report_number: String,
    commodity_code: String,
    category: String,
    product_description: String,
    quantity: f64,
    quantity_unit: String,
    net_weight_kg: f64,
    country_of_origin: String,
    reporting_period: String,
    declarant_eori: String,
    declarant_name: String,
    declarant_street: String,
    declarant_city: String,
    declarant_postal_code: String,
    declarant_country: String,
    installation_id: String,
    installation_name: String,
    installation_country: String,
    installation_address: Option<String>,
    electricity_mwh: Option<f64>,
    direct_tco2: f64,
    indirect_tco2: f64,
    measured_emissions: bool,
    estimated_cost_eur: f64,
    status: String,
    created_at: String,
}

impl ReportRow {
    /// Maps a row in [`REPORT_COLUMNS`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if a column has the wrong type.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            report_number: row.get(1)?,
            commodity_code: row.get(2)?,
            category: row.get(3)?,
            product_description: row.get(4)?,
            quantity: row.get(5)?,
            quantity_unit: row.get(6)?,
            net_weight_kg: row.get(7)?,
            country_of_origin: row.get(8)?,
            reporting_period: row.get(9)?,
            declarant_eori: row.get(10)?,
            declarant_name: row.get(11)?,
            declarant_street: row.get(12)?,
            declarant_city: row.get(13)?,
            declarant_postal_code: row.get(14)?,
            declarant_country: row.get(15)?,
            installation_id: row.get(16)?,
            installation_name: row.get(17)?,
            installation_country: row.get(18)?,
            installation_address: row.get(19)?,
            electricity_mwh: row.get(20)?,
            direct_tco2: row.get(21)?,
            indirect_tco2: row.get(22)?,
            measured_emissions: row.get(23)?,
            estimated_cost_eur: row.get(24)?,
            status: row.get(25)?,
            created_at: row.get(26)?,
        })
    }
}

impl TryFrom<ReportRow> for Report {
    type Error = PersistenceError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            report_number: row.report_number,
            commodity_code: row.commodity_code,
            category: CbamCategory::from_str(&row.category)
                .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?,
            product_description: row.product_description,
            quantity: row.quantity,
            quantity_unit: row.quantity_unit,
            net_weight_kg: row.net_weight_kg,
            country_of_origin: row.country_of_origin,
            reporting_period: ReportingPeriod::from_str(&row.reporting_period)
                .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?,
            declarant: DeclarantDetails {
                eori: row.declarant_eori,
                name: row.declarant_name,
                street: row.declarant_street,
                city: row.declarant_city,
                postal_code: row.declarant_postal_code,
                country: row.declarant_country,
            },
            installation_id: row.installation_id,
            installation_name: row.installation_name,
            installation_country: row.installation_country,
            installation_address: row.installation_address,
            electricity_mwh: row.electricity_mwh,
            // The stored components are authoritative; the total is derived.
            emissions: EmissionsBreakdown::new(row.direct_tco2, row.indirect_tco2),
            measured_emissions: row.measured_emissions,
            estimated_cost_eur: row.estimated_cost_eur,
            status: ReportStatus::from_str(&row.status)
                .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// A `merged_reports` row as stored.
pub struct MergedRow {
    id: String,
    report_number: String,
    reporting_period: String,
    declarant_eori: String,
    declarant_name: String,
    goods_count: i64,
    total_net_mass_kg: f64,
    total_direct_tco2: f64,
    total_indirect_tco2: f64,
    total_tco2: f64,
    total_cost_eur: f64,
    report_ids: String,
    created_at: String,
}

impl MergedRow {
    /// Maps a row in [`MERGED_COLUMNS`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if a column has the wrong type.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            report_number: row.get(1)?,
            reporting_period: row.get(2)?,
            declarant_eori: row.get(3)?,
            declarant_name: row.get(4)?,
            goods_count: row.get(5)?,
            total_net_mass_kg: row.get(6)?,
            total_direct_tco2: row.get(7)?,
            total_indirect_tco2: row.get(8)?,
            total_tco2: row.get(9)?,
            total_cost_eur: row.get(10)?,
            report_ids: row.get(11)?,
            created_at: row.get(12)?,
        })
    }
}

impl TryFrom<MergedRow> for MergedReport {
    type Error = PersistenceError;

    fn try_from(row: MergedRow) -> Result<Self, Self::Error> {
        let ids: Vec<String> = serde_json::from_str(&row.report_ids)?;
        let report_ids: Vec<Uuid> = ids
            .iter()
            .map(|id| parse_uuid(id))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            id: parse_uuid(&row.id)?,
            report_number: row.report_number,
            reporting_period: ReportingPeriod::from_str(&row.reporting_period)
                .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?,
            declarant_eori: row.declarant_eori,
            declarant_name: row.declarant_name,
            goods_count: usize::try_from(row.goods_count)
                .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?,
            total_net_mass_kg: row.total_net_mass_kg,
            total_direct_tco2: row.total_direct_tco2,
            total_indirect_tco2: row.total_indirect_tco2,
            total_tco2: row.total_tco2,
            total_cost_eur: row.total_cost_eur,
            report_ids,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, PersistenceError> {
    Uuid::parse_str(value).map_err(|e| PersistenceError::CorruptRecord(e.to_string()))
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))
}
