// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use rusqlite::Connection;
use tracing::debug;

/// Creates the tables if they do not exist.
///
/// Emission totals are deliberately not stored: the total is always derived
/// from direct plus indirect on load, so the two can never drift apart.
pub fn initialize(conn: &Connection) -> Result<(), PersistenceError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reports (
            id TEXT PRIMARY KEY,
            report_number TEXT NOT NULL,
            commodity_code TEXT NOT NULL,
            category TEXT NOT NULL,
            product_description TEXT NOT NULL,
            quantity REAL NOT NULL,
            quantity_unit TEXT NOT NULL,
            net_weight_kg REAL NOT NULL,
            country_of_origin TEXT NOT NULL,
            reporting_period TEXT NOT NULL,
            declarant_eori TEXT NOT NULL,
            declarant_name TEXT NOT NULL,
            declarant_street TEXT NOT NULL,
            declarant_city TEXT NOT NULL,
            declarant_postal_code TEXT NOT NULL,
            declarant_country TEXT NOT NULL,
            installation_id TEXT NOT NULL,
            installation_name TEXT NOT NULL,
            installation_country TEXT NOT NULL,
            installation_address TEXT,
            electricity_mwh REAL,
            direct_tco2 REAL NOT NULL,
            indirect_tco2 REAL NOT NULL,
            measured_emissions INTEGER NOT NULL,
            estimated_cost_eur REAL NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS merged_reports (
            id TEXT PRIMARY KEY,
            report_number TEXT NOT NULL,
            reporting_period TEXT NOT NULL,
            declarant_eori TEXT NOT NULL,
            declarant_name TEXT NOT NULL,
            goods_count INTEGER NOT NULL,
            total_net_mass_kg REAL NOT NULL,
            total_direct_tco2 REAL NOT NULL,
            total_indirect_tco2 REAL NOT NULL,
            total_tco2 REAL NOT NULL,
            total_cost_eur REAL NOT NULL,
            report_ids TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reports_period
            ON reports (reporting_period);
        CREATE INDEX IF NOT EXISTS idx_reports_created_at
            ON reports (created_at);
        ",
    )?;
    debug!("Database schema initialized");
    Ok(())
}
