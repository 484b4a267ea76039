// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a tariff classification code (HS/CN).
///
/// Codes are normalized on construction: spaces and dots are stripped so that
/// `"7318 15.00"` and `"73181500"` compare equal. Construction never fails;
/// length and digit constraints are surfaced by the Validation Engine, not
/// here, because a malformed code is a data-quality problem rather than a
/// programming error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommodityCode {
    /// The normalized code value.
    value: String,
}

impl CommodityCode {
    /// Creates a new `CommodityCode`, stripping spaces and dots.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.replace([' ', '.'], ""),
        }
    }

    /// Returns the normalized code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the 2-digit chapter prefix, or an empty string for codes
    /// shorter than two characters.
    #[must_use]
    pub fn chapter(&self) -> &str {
        self.value.get(..2).unwrap_or("")
    }

    /// Returns the number of ASCII digits in the normalized code.
    #[must_use]
    pub fn digit_count(&self) -> usize {
        self.value.chars().filter(char::is_ascii_digit).count()
    }

    /// Returns whether the code consists solely of ASCII digits.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !self.value.is_empty() && self.value.chars().all(|c| c.is_ascii_digit())
    }
}

impl std::fmt::Display for CommodityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// CBAM product categories covered by this engine.
///
/// The variant order is authoritative: it is the fixed priority order used to
/// break ties should a chapter prefix ever be assigned to more than one
/// category. Chapter prefixes are disjoint today, so the order is currently
/// inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CbamCategory {
    /// Iron and steel, chapters 72 and 73.
    IronSteel,
    /// Aluminium and articles thereof, chapter 76.
    Aluminium,
    /// Cement, chapter 25.
    Cement,
    /// Fertilisers, chapters 28 and 31.
    Fertilisers,
}

impl CbamCategory {
    /// All categories, in classifier priority order.
    pub const ALL: [Self; 4] = [
        Self::IronSteel,
        Self::Aluminium,
        Self::Cement,
        Self::Fertilisers,
    ];

    /// Converts this category to its snake_case identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IronSteel => "iron_steel",
            Self::Aluminium => "aluminium",
            Self::Cement => "cement",
            Self::Fertilisers => "fertilisers",
        }
    }

    /// Returns the human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::IronSteel => "Iron and steel",
            Self::Aluminium => "Aluminium",
            Self::Cement => "Cement",
            Self::Fertilisers => "Fertilisers",
        }
    }

    /// Returns the tariff chapters that typically map to this category.
    ///
    /// Used for classification and for the non-blocking cross-check between a
    /// declared category and a commodity code. Codes outside these chapters
    /// may still be legitimate per EU guidance, so mismatches warn rather
    /// than fail.
    #[must_use]
    pub const fn valid_chapters(&self) -> &'static [&'static str] {
        match self {
            Self::IronSteel => &["72", "73"],
            Self::Aluminium => &["76"],
            Self::Cement => &["25"],
            Self::Fertilisers => &["28", "31"],
        }
    }
}

impl FromStr for CbamCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iron_steel" => Ok(Self::IronSteel),
            "aluminium" => Ok(Self::Aluminium),
            "cement" => Ok(Self::Cement),
            "fertilisers" => Ok(Self::Fertilisers),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for CbamCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A quarterly reporting period, e.g. `2024-Q4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// The calendar year.
    year: u16,
    /// The quarter (1-4).
    quarter: u8,
}

impl ReportingPeriod {
    /// Creates a new `ReportingPeriod`.
    ///
    /// # Errors
    ///
    /// Returns an error if the quarter is not 1-4.
    pub fn new(year: u16, quarter: u8) -> Result<Self, DomainError> {
        if !(1..=4).contains(&quarter) {
            return Err(DomainError::InvalidReportingPeriod(format!(
                "quarter must be 1-4, got {quarter}"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the quarter (1-4).
    #[must_use]
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }
}

impl FromStr for ReportingPeriod {
    type Err = DomainError;

    /// Parses the strict `YYYY-Qn` form (e.g. `2024-Q4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidReportingPeriod(s.to_string());

        let (year_part, quarter_part) = s.split_once("-Q").ok_or_else(invalid)?;
        if year_part.len() != 4 || !year_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: u16 = year_part.parse().map_err(|_| invalid())?;
        let quarter: u8 = match quarter_part {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            _ => return Err(invalid()),
        };
        Ok(Self { year, quarter })
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

/// Lifecycle state of a report.
///
/// Explicit states govern which operations are permitted and what the report
/// list presents to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Initial state after creation. Not yet checked against EU rules.
    #[default]
    Draft,
    /// Passed the Validation Engine with zero errors.
    Validated,
    /// An XML declaration has been generated for this report.
    Finalized,
    /// Absorbed into a merged quarterly declaration. Presentational only:
    /// the report remains retrievable and the mark is reversed if the merge
    /// is discarded.
    Merged,
}

impl ReportStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Validated => "validated",
            Self::Finalized => "finalized",
            Self::Merged => "merged",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Draft → Validated
    /// - Validated → Finalized
    /// - Validated | Finalized → Merged
    /// - Merged → Finalized (when a merge is discarded)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Validated)
                | (Self::Validated, Self::Finalized)
                | (Self::Validated | Self::Finalized, Self::Merged)
                | (Self::Merged, Self::Finalized)
        )
    }
}

impl FromStr for ReportStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "validated" => Ok(Self::Validated),
            "finalized" => Ok(Self::Finalized),
            "merged" => Ok(Self::Merged),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
