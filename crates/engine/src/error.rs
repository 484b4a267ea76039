// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cbam_domain::DomainError;
use cbam_xml::XmlError;

/// Errors that can occur while operating on reports.
#[derive(Debug)]
pub enum EngineError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// No category was supplied and the commodity code is outside CBAM scope.
    CategoryUnresolved(String),
    /// A referenced report does not exist.
    ReportNotFound(String),
    /// A merge was requested with fewer than two reports.
    InsufficientReports(usize),
    /// The reports selected for a merge do not belong together.
    IncompatibleReports(String),
    /// The XML document could not be produced.
    Serialization(XmlError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::CategoryUnresolved(code) => {
                write!(
                    f,
                    "Commodity code '{code}' is not covered by CBAM and no category was supplied"
                )
            }
            Self::ReportNotFound(id) => write!(f, "Report {id} not found"),
            Self::InsufficientReports(count) => {
                write!(f, "At least 2 reports are required for a merge, got {count}")
            }
            Self::IncompatibleReports(reason) => {
                write!(f, "Reports cannot be merged: {reason}")
            }
            Self::Serialization(err) => write!(f, "Declaration could not be generated: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<XmlError> for EngineError {
    fn from(err: XmlError) -> Self {
        Self::Serialization(err)
    }
}
