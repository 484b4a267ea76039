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
    clippy::all
)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_domain_error, translate_engine_error, translate_persistence_error,
};
pub use handlers::{
    classify_commodity, compute, create_report, delete_report, discard_merged,
    download_merged_xml, download_xml, factors, generate_xml, get_merged, get_report, list_merged,
    list_reports, merge, validate_draft,
};
pub use request_response::{
    CategoryFactors, ClassifyRequest, ClassifyResponse, ComputeEmissionsRequest,
    ComputeEmissionsResponse, CreateReportRequest, CreateReportResponse, FactorsResponse,
    GenerateXmlResponse, MergeRequest, MergedReportResponse, ReportResponse, ValidateRequest,
    XmlDownload,
};
