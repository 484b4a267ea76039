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

mod artifact;
mod error;
mod qreport;
mod schema;
mod writer;

pub use artifact::{PREVIEW_LIMIT_BYTES, TRUNCATION_MARKER, XmlArtifact};
pub use error::XmlError;
pub use qreport::{
    AggregatedTotals, CBAM_NAMESPACE, DeclarantBlock, FactorSource, GoodBlock, InstallationBlock,
    MERGED_REPORT_TYPE, QReport, ReportKind, SCHEMA_VERSION, tco2_to_wire_kg, wire_category,
};
pub use schema::{SchemaFindings, check as schema_check, is_plausible_eori};
pub use writer::XmlWriter;
