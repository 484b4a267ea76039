// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cbam_domain::DomainError;
use cbam_engine::EngineError;
use cbam_persistence::PersistenceError;
use std::error::Error;
use std::fmt;

/// Errors surfaced by the API operations layer.
///
/// Validation findings are not errors; they travel in response bodies. This
/// type covers the operational failures a caller must branch on.
#[derive(Debug)]
pub enum ApiError {
    /// A request field failed to parse or was out of range.
    InvalidInput {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },
    /// A domain rule rejected the operation.
    DomainRuleViolation {
        /// The rule that fired.
        rule: String,
        /// What the rule rejected.
        message: String,
    },
    /// The requested resource does not exist.
    ResourceNotFound {
        /// What kind of resource was requested.
        resource_type: String,
        /// Which one was missing.
        message: String,
    },
    /// The requested merge cannot be performed.
    MergeRejected {
        /// Why the merge was refused.
        message: String,
    },
    /// An unexpected internal failure.
    Internal {
        /// Diagnostic detail.
        message: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule '{rule}' violated: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::MergeRejected { message } => write!(f, "Merge rejected: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl Error for ApiError {}

/// Translates a domain error into the API error vocabulary.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    match err {
        DomainError::UnknownCategory(_) => ApiError::InvalidInput {
            field: String::from("category"),
            message: err.to_string(),
        },
        DomainError::InvalidReportingPeriod(_) => ApiError::InvalidInput {
            field: String::from("reporting_period"),
            message: err.to_string(),
        },
        DomainError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_lifecycle"),
            message: err.to_string(),
        },
    }
}

/// Translates an engine error into the API error vocabulary.
#[must_use]
pub fn translate_engine_error(err: &EngineError) -> ApiError {
    match err {
        EngineError::DomainViolation(domain) => translate_domain_error(domain),
        EngineError::CategoryUnresolved(_) => ApiError::InvalidInput {
            field: String::from("commodity_code"),
            message: err.to_string(),
        },
        EngineError::ReportNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: err.to_string(),
        },
        EngineError::InsufficientReports(_) | EngineError::IncompatibleReports(_) => {
            ApiError::MergeRejected {
                message: err.to_string(),
            }
        }
        EngineError::Serialization(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into the API error vocabulary.
#[must_use]
pub fn translate_persistence_error(err: &PersistenceError) -> ApiError {
    match err {
        PersistenceError::ReportNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: err.to_string(),
        },
        PersistenceError::MergedReportNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Merged report"),
            message: err.to_string(),
        },
        PersistenceError::Database(_)
        | PersistenceError::CorruptRecord(_)
        | PersistenceError::Serialization(_)
        | PersistenceError::Timestamp(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(&err)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        translate_engine_error(&err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(&err)
    }
}
