// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The SQLite-backed report store.

use crate::error::PersistenceError;
use crate::rows::{MERGED_COLUMNS, MergedRow, REPORT_COLUMNS, ReportRow};
use crate::schema;
use cbam_domain::ReportStatus;
use cbam_engine::{MergedReport, Report};
use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, params, params_from_iter};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use uuid::Uuid;

/// The report store. One connection; callers serialize access.
pub struct Persistence {
    conn: Connection,
}

impl Persistence {
    /// Opens an in-memory database, for tests and ephemeral runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (creating if necessary) a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file(path: &Path) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)?;
        schema::initialize(&conn)?;
        info!(path = %path.display(), "Opened report database");
        Ok(Self { conn })
    }

    /// Inserts a report.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_report(&mut self, report: &Report) -> Result<(), PersistenceError> {
        insert_report_tx(&self.conn, report)?;
        debug!(report_id = %report.id, report_number = %report.report_number, "Inserted report");
        Ok(())
    }

    /// Rewrites a report record in place.
    ///
    /// # Errors
    ///
    /// Returns `ReportNotFound` if the report does not exist.
    pub fn update_report(&mut self, report: &Report) -> Result<(), PersistenceError> {
        let changed: usize = self.conn.execute(
            "UPDATE reports SET
                report_number = ?2, commodity_code = ?3, category = ?4,
                product_description = ?5, quantity = ?6, quantity_unit = ?7,
                net_weight_kg = ?8, country_of_origin = ?9, reporting_period = ?10,
                declarant_eori = ?11, declarant_name = ?12, declarant_street = ?13,
                declarant_city = ?14, declarant_postal_code = ?15, declarant_country = ?16,
                installation_id = ?17, installation_name = ?18, installation_country = ?19,
                installation_address = ?20, electricity_mwh = ?21, direct_tco2 = ?22,
                indirect_tco2 = ?23, measured_emissions = ?24, estimated_cost_eur = ?25,
                status = ?26, created_at = ?27
             WHERE id = ?1",
            params_from_iter(report_params(report)?),
        )?;
        if changed == 0 {
            return Err(PersistenceError::ReportNotFound(report.id));
        }
        Ok(())
    }

    /// Updates only a report's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `ReportNotFound` if the report does not exist.
    pub fn update_status(
        &mut self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<(), PersistenceError> {
        let changed: usize = self.conn.execute(
            "UPDATE reports SET status = ?2 WHERE id = ?1",
            params![id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(PersistenceError::ReportNotFound(id));
        }
        Ok(())
    }

    /// Fetches one report.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the record is corrupt.
    pub fn fetch_report(&self, id: Uuid) -> Result<Option<Report>, PersistenceError> {
        let sql: String = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1");
        let row: Option<ReportRow> = self
            .conn
            .query_row(&sql, params![id.to_string()], |row| {
                ReportRow::from_row(row)
            })
            .optional()?;
        row.map(Report::try_from).transpose()
    }

    /// Lists all reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_reports(&self) -> Result<Vec<Report>, PersistenceError> {
        let sql: String =
            format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| ReportRow::from_row(row))?;
        let mut reports: Vec<Report> = Vec::new();
        for row in rows {
            reports.push(Report::try_from(row?)?);
        }
        Ok(reports)
    }

    /// Fetches a set of reports in one read snapshot, in the order requested.
    ///
    /// Used by the merge path: running inside a single transaction means a
    /// concurrent delete fails the whole fetch instead of producing a
    /// partial constituent set.
    ///
    /// # Errors
    ///
    /// Returns `ReportNotFound` naming the first missing id.
    pub fn fetch_reports_snapshot(
        &mut self,
        ids: &[Uuid],
    ) -> Result<Vec<Report>, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let sql: String = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1");
        let mut reports: Vec<Report> = Vec::with_capacity(ids.len());
        for id in ids {
            let row: Option<ReportRow> = tx
                .query_row(&sql, params![id.to_string()], |row| {
                    ReportRow::from_row(row)
                })
                .optional()?;
            let row: ReportRow = row.ok_or(PersistenceError::ReportNotFound(*id))?;
            reports.push(Report::try_from(row)?);
        }
        tx.commit()?;
        Ok(reports)
    }

    /// Deletes a report.
    ///
    /// Merged reports that reference it are derived artifacts and are
    /// deleted in the same transaction; constituents of those merges that
    /// are no longer referenced anywhere drop back from `Merged` to
    /// `Finalized`.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails.
    ///
    /// # Returns
    ///
    /// `true` if the report existed.
    pub fn delete_report(&mut self, id: Uuid) -> Result<bool, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let deleted: usize =
            tx.execute("DELETE FROM reports WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Ok(false);
        }

        let referencing: Vec<MergedReport> = merged_referencing_tx(&tx, id)?;
        for merged in &referencing {
            tx.execute(
                "DELETE FROM merged_reports WHERE id = ?1",
                params![merged.id.to_string()],
            )?;
            debug!(merged_id = %merged.id, report_id = %id, "Deleted merged report derived from deleted constituent");
        }
        unmark_orphaned_constituents_tx(&tx, &referencing)?;

        tx.commit()?;
        info!(report_id = %id, cascaded = referencing.len(), "Deleted report");
        Ok(true)
    }

    /// Inserts a merged report.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_merged(&mut self, merged: &MergedReport) -> Result<(), PersistenceError> {
        let ids: Vec<String> = merged.report_ids.iter().map(Uuid::to_string).collect();
        self.conn.execute(
            "INSERT INTO merged_reports (
                id, report_number, reporting_period, declarant_eori, declarant_name,
                goods_count, total_net_mass_kg, total_direct_tco2, total_indirect_tco2,
                total_tco2, total_cost_eur, report_ids, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                merged.id.to_string(),
                merged.report_number,
                merged.reporting_period.to_string(),
                merged.declarant_eori,
                merged.declarant_name,
                i64::try_from(merged.goods_count).unwrap_or(i64::MAX),
                merged.total_net_mass_kg,
                merged.total_direct_tco2,
                merged.total_indirect_tco2,
                merged.total_tco2,
                merged.total_cost_eur,
                serde_json::to_string(&ids)?,
                merged.created_at.format(&Rfc3339)?,
            ],
        )?;
        debug!(merged_id = %merged.id, goods = merged.goods_count, "Inserted merged report");
        Ok(())
    }

    /// Fetches one merged report.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the record is corrupt.
    pub fn fetch_merged(&self, id: Uuid) -> Result<Option<MergedReport>, PersistenceError> {
        let sql: String = format!("SELECT {MERGED_COLUMNS} FROM merged_reports WHERE id = ?1");
        let row: Option<MergedRow> = self
            .conn
            .query_row(&sql, params![id.to_string()], |row| {
                MergedRow::from_row(row)
            })
            .optional()?;
        row.map(MergedReport::try_from).transpose()
    }

    /// Lists all merged reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a record is corrupt.
    pub fn list_merged(&self) -> Result<Vec<MergedReport>, PersistenceError> {
        let sql: String =
            format!("SELECT {MERGED_COLUMNS} FROM merged_reports ORDER BY created_at DESC, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| MergedRow::from_row(row))?;
        let mut merged: Vec<MergedReport> = Vec::new();
        for row in rows {
            merged.push(MergedReport::try_from(row?)?);
        }
        Ok(merged)
    }

    /// Discards a merged report and reverses the presentational `Merged`
    /// mark on constituents that no other merge still references.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails.
    ///
    /// # Returns
    ///
    /// `true` if the merged report existed.
    pub fn discard_merged(&mut self, id: Uuid) -> Result<bool, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let sql: String = format!("SELECT {MERGED_COLUMNS} FROM merged_reports WHERE id = ?1");
        let row: Option<MergedRow> = tx
            .query_row(&sql, params![id.to_string()], |row| {
                MergedRow::from_row(row)
            })
            .optional()?;
        let Some(row) = row else {
            return Ok(false);
        };
        let merged: MergedReport = MergedReport::try_from(row)?;

        tx.execute(
            "DELETE FROM merged_reports WHERE id = ?1",
            params![id.to_string()],
        )?;
        unmark_orphaned_constituents_tx(&tx, &[merged])?;
        tx.commit()?;
        info!(merged_id = %id, "Discarded merged report");
        Ok(true)
    }
}

fn insert_report_tx(conn: &Connection, report: &Report) -> Result<(), PersistenceError> {
    conn.execute(
        "INSERT INTO reports (
            id, report_number, commodity_code, category, product_description,
            quantity, quantity_unit, net_weight_kg, country_of_origin, reporting_period,
            declarant_eori, declarant_name, declarant_street, declarant_city,
            declarant_postal_code, declarant_country, installation_id, installation_name,
            installation_country, installation_address, electricity_mwh, direct_tco2,
            indirect_tco2, measured_emissions, estimated_cost_eur, status, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                   ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)",
        params_from_iter(report_params(report)?),
    )?;
    Ok(())
}

/// Positional parameters for the report INSERT/UPDATE statements, in column
/// order (`?1` = id through `?27` = `created_at`).
fn report_params(report: &Report) -> Result<Vec<Box<dyn ToSql>>, PersistenceError> {
    Ok(vec![
        Box::new(report.id.to_string()),
        Box::new(report.report_number.clone()),
        Box::new(report.commodity_code.clone()),
        Box::new(report.category.as_str()),
        Box::new(report.product_description.clone()),
        Box::new(report.quantity),
        Box::new(report.quantity_unit.clone()),
        Box::new(report.net_weight_kg),
        Box::new(report.country_of_origin.clone()),
        Box::new(report.reporting_period.to_string()),
        Box::new(report.declarant.eori.clone()),
        Box::new(report.declarant.name.clone()),
        Box::new(report.declarant.street.clone()),
        Box::new(report.declarant.city.clone()),
        Box::new(report.declarant.postal_code.clone()),
        Box::new(report.declarant.country.clone()),
        Box::new(report.installation_id.clone()),
        Box::new(report.installation_name.clone()),
        Box::new(report.installation_country.clone()),
        Box::new(report.installation_address.clone()),
        Box::new(report.electricity_mwh),
        Box::new(report.emissions.direct_tco2),
        Box::new(report.emissions.indirect_tco2),
        Box::new(report.measured_emissions),
        Box::new(report.estimated_cost_eur),
        Box::new(report.status.as_str()),
        Box::new(report.created_at.format(&Rfc3339)?),
    ])
}

fn merged_referencing_tx(
    tx: &Transaction<'_>,
    report_id: Uuid,
) -> Result<Vec<MergedReport>, PersistenceError> {
    let sql: String = format!("SELECT {MERGED_COLUMNS} FROM merged_reports");
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt.query_map([], |row| MergedRow::from_row(row))?;
    let mut referencing: Vec<MergedReport> = Vec::new();
    for row in rows {
        let merged: MergedReport = MergedReport::try_from(row?)?;
        if merged.report_ids.contains(&report_id) {
            referencing.push(merged);
        }
    }
    Ok(referencing)
}

/// Reverts `Merged` to `Finalized` for constituents of the given (deleted)
/// merges that no surviving merge still references.
fn unmark_orphaned_constituents_tx(
    tx: &Transaction<'_>,
    deleted: &[MergedReport],
) -> Result<(), PersistenceError> {
    let sql: String = format!("SELECT {MERGED_COLUMNS} FROM merged_reports");
    let still_referenced: Vec<Uuid> = {
        let mut stmt = tx.prepare(&sql)?;
        let rows = stmt.query_map([], |row| MergedRow::from_row(row))?;
        let mut ids: Vec<Uuid> = Vec::new();
        for row in rows {
            ids.extend(MergedReport::try_from(row?)?.report_ids);
        }
        ids
    };

    for merged in deleted {
        for constituent in &merged.report_ids {
            if still_referenced.contains(constituent) {
                continue;
            }
            tx.execute(
                "UPDATE reports SET status = ?2 WHERE id = ?1 AND status = ?3",
                params![
                    constituent.to_string(),
                    ReportStatus::Finalized.as_str(),
                    ReportStatus::Merged.as_str()
                ],
            )?;
        }
    }
    Ok(())
}
