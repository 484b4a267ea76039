// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod document;
mod error;
mod merge;
mod number;
mod report;

pub use document::{declaration, generate_artifact, generate_merged_artifact, merged_declaration};
pub use error::EngineError;
pub use merge::{MergedReport, merge_reports};
pub use number::{merged_report_number, report_number};
pub use report::{DeclarantDetails, InstallationDetails, Report, ReportInput, validate_report};
