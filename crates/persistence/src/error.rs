// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The requested report was not found.
    #[error("Report {0} not found")]
    ReportNotFound(Uuid),
    /// The requested merged report was not found.
    #[error("Merged report {0} not found")]
    MergedReportNotFound(Uuid),
    /// A stored record could not be decoded back into its domain type.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A timestamp could not be formatted for storage.
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] time::error::Format),
}
