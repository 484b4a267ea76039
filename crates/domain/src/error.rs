// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The category identifier is not one of the covered CBAM categories.
    UnknownCategory(String),
    /// The reporting period string does not match `YYYY-Qn`.
    InvalidReportingPeriod(String),
    /// The status string is not a known report status.
    InvalidStatus(String),
    /// A report status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(name) => {
                write!(
                    f,
                    "Unknown CBAM category '{name}'. Must be one of: iron_steel, aluminium, cement, fertilisers"
                )
            }
            Self::InvalidReportingPeriod(value) => {
                write!(
                    f,
                    "Invalid reporting period '{value}'. Use YYYY-Qn (e.g. 2024-Q4)"
                )
            }
            Self::InvalidStatus(value) => write!(f, "Invalid report status '{value}'"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Report status cannot transition from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
