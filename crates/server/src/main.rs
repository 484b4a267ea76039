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
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use cbam_api::{
    ApiError, ClassifyRequest, ClassifyResponse, ComputeEmissionsRequest,
    ComputeEmissionsResponse, CreateReportRequest, CreateReportResponse, FactorsResponse,
    GenerateXmlResponse, MergeRequest, MergedReportResponse, ReportResponse, ValidateRequest,
    XmlDownload,
    classify_commodity, compute, create_report, delete_report, discard_merged,
    download_merged_xml, download_xml, factors, generate_xml, get_merged, get_report, list_merged,
    list_reports, merge, validate_draft,
};
use cbam_domain::{FactorTable, ValidationResult};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

/// CBAM Compliance Engine - HTTP server for quarterly CBAM reporting
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, wrapped for safe concurrent access.
    persistence: Arc<Mutex<cbam_persistence::Persistence>>,
    /// The active emission factor table.
    factors: FactorTable,
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::MergeRejected { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Wraps an XML document as a file-download response.
fn xml_attachment(download: XmlDownload) -> Response {
    let disposition: String = format!("attachment; filename=\"{}\"", download.filename);
    (
        [
            (header::CONTENT_TYPE, String::from("application/xml")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.xml,
    )
        .into_response()
}

/// Handler for POST `/classify`.
async fn handle_classify(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    Json(classify_commodity(&app_state.factors, &req))
}

/// Handler for POST `/compute-emissions`.
async fn handle_compute_emissions(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ComputeEmissionsRequest>,
) -> Result<Json<ComputeEmissionsResponse>, HttpError> {
    Ok(Json(compute(&app_state.factors, &req)?))
}

/// Handler for POST `/validate`.
///
/// Validation findings are data, so the response is 200 even when the draft
/// has errors.
async fn handle_validate(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Json<ValidationResult> {
    Json(validate_draft(&app_state.factors, &req))
}

/// Handler for POST `/reports`.
async fn handle_create_report(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> Result<Json<CreateReportResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateReportResponse = create_report(
        &mut persistence,
        &app_state.factors,
        req,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/reports`.
async fn handle_list_reports(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ReportResponse>>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    Ok(Json(list_reports(&persistence)?))
}

/// Handler for GET `/reports/{id}`.
async fn handle_get_report(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    Ok(Json(get_report(&persistence, id)?))
}

/// Handler for DELETE `/reports/{id}`.
async fn handle_delete_report(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    delete_report(&mut persistence, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/generate-xml`.
async fn handle_generate_xml(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> Result<Json<GenerateXmlResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateXmlResponse = generate_xml(
        &mut persistence,
        &app_state.factors,
        req,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/download-xml/{report_id}`.
async fn handle_download_xml(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let download: XmlDownload = download_xml(&mut persistence, id, OffsetDateTime::now_utc())?;
    Ok(xml_attachment(download))
}

/// Handler for POST `/merge`.
async fn handle_merge(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<MergeRequest>,
) -> Result<Json<MergedReportResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MergedReportResponse =
        merge(&mut persistence, &req, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for GET `/merged`.
async fn handle_list_merged(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<MergedReportResponse>>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    Ok(Json(list_merged(&persistence)?))
}

/// Handler for GET `/merged/{id}`.
async fn handle_get_merged(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MergedReportResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    Ok(Json(get_merged(&persistence, id)?))
}

/// Handler for DELETE `/merged/{id}`.
async fn handle_discard_merged(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    discard_merged(&mut persistence, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/download-merged-xml/{merged_id}`.
async fn handle_download_merged_xml(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let download: XmlDownload =
        download_merged_xml(&mut persistence, id, OffsetDateTime::now_utc())?;
    Ok(xml_attachment(download))
}

/// Handler for GET `/factors`.
async fn handle_factors(AxumState(app_state): AxumState<AppState>) -> Json<FactorsResponse> {
    Json(factors(&app_state.factors))
}

/// Handler for GET `/health`.
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/classify", post(handle_classify))
        .route("/compute-emissions", post(handle_compute_emissions))
        .route("/validate", post(handle_validate))
        .route("/reports", post(handle_create_report))
        .route("/reports", get(handle_list_reports))
        .route("/reports/{id}", get(handle_get_report))
        .route("/reports/{id}", delete(handle_delete_report))
        .route("/generate-xml", post(handle_generate_xml))
        .route("/download-xml/{report_id}", get(handle_download_xml))
        .route("/merge", post(handle_merge))
        .route("/merged", get(handle_list_merged))
        .route("/merged/{id}", get(handle_get_merged))
        .route("/merged/{id}", delete(handle_discard_merged))
        .route(
            "/download-merged-xml/{merged_id}",
            get(handle_download_merged_xml),
        )
        .route("/factors", get(handle_factors))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing CBAM Compliance Engine server");

    let persistence: cbam_persistence::Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        cbam_persistence::Persistence::new_with_file(std::path::Path::new(db_path))?
    } else {
        info!("Using in-memory database");
        cbam_persistence::Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        factors: FactorTable::eu_defaults(),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: cbam_persistence::Persistence =
            cbam_persistence::Persistence::new_in_memory()
                .expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            factors: FactorTable::eu_defaults(),
        }
    }

    fn report_body() -> serde_json::Value {
        serde_json::json!({
            "commodity_code": "73181500",
            "product_description": "Threaded steel fasteners",
            "net_weight_kg": 5000.0,
            "country_of_origin": "IN",
            "reporting_period": "2024-Q1",
            "declarant": {
                "eori": "DE123456789012345",
                "name": "German Steel Imports GmbH",
                "street": "Industriestrasse 42",
                "city": "Duesseldorf",
                "postal_code": "40210",
                "country": "DE"
            },
            "installation": {
                "identifier": "IN-JSR-001",
                "name": "Jamshedpur Works",
                "country": "IN",
                "address": "Jamshedpur, Jharkhand"
            }
        })
    }

    async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn get_uri(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app: Router = build_router(create_test_app_state());
        let response = get_uri(app, "/health").await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_classify_endpoint() {
        let app: Router = build_router(create_test_app_state());
        let response = post_json(
            app,
            "/classify",
            &serde_json::json!({ "commodity_code": "7318.15.00" }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["category"], "iron_steel");
        assert_eq!(body["chapter"], "73");
    }

    #[tokio::test]
    async fn test_compute_emissions_rejects_unknown_category() {
        let app: Router = build_router(create_test_app_state());
        let response = post_json(
            app,
            "/compute-emissions",
            &serde_json::json!({ "category": "textiles", "net_weight_kg": 100.0 }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_validate_returns_findings_as_data() {
        let app: Router = build_router(create_test_app_state());
        let response = post_json(app, "/validate", &serde_json::json!({})).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["valid"], false);
        assert!(!body["errors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_fetch_report() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = post_json(app.clone(), "/reports", &report_body()).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["status"], "validated");
        assert!(created["errors"].as_array().unwrap().is_empty());

        let id: &str = created["id"].as_str().unwrap();
        let response = get_uri(app, &format!("/reports/{id}")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_unknown_report_is_404() {
        let app: Router = build_router(create_test_app_state());
        let response = get_uri(app, &format!("/reports/{}", Uuid::new_v4())).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_xml_returns_a_preview() {
        let app: Router = build_router(create_test_app_state());
        let response = post_json(app, "/generate-xml", &report_body()).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["is_valid"], true);
        assert!(
            body["xml_preview"]
                .as_str()
                .unwrap()
                .starts_with("<?xml")
        );
    }

    #[tokio::test]
    async fn test_download_xml_is_an_attachment() {
        let app: Router = build_router(create_test_app_state());
        let created = body_json(post_json(app.clone(), "/reports", &report_body()).await).await;
        let id: &str = created["id"].as_str().unwrap();

        let response = get_uri(app, &format!("/download-xml/{id}")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"CBAM-"));
        assert!(disposition.ends_with(".xml\""));
    }

    #[tokio::test]
    async fn test_merge_requires_two_reports() {
        let app: Router = build_router(create_test_app_state());
        let created = body_json(post_json(app.clone(), "/reports", &report_body()).await).await;

        let response = post_json(
            app,
            "/merge",
            &serde_json::json!({ "report_ids": [created["id"]] }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_merge_and_download_merged_xml() {
        let app: Router = build_router(create_test_app_state());
        let first = body_json(post_json(app.clone(), "/reports", &report_body()).await).await;
        let mut second_body = report_body();
        second_body["commodity_code"] = serde_json::json!("25232900");
        second_body["product_description"] = serde_json::json!("Portland cement, grey");
        let second = body_json(post_json(app.clone(), "/reports", &second_body).await).await;

        let response = post_json(
            app.clone(),
            "/merge",
            &serde_json::json!({ "report_ids": [first["id"], second["id"]] }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let merged = body_json(response).await;
        assert_eq!(merged["goods_count"], 2);

        let merged_id: &str = merged["id"].as_str().unwrap();
        let response = get_uri(app, &format!("/download-merged-xml/{merged_id}")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_report_returns_no_content() {
        let app: Router = build_router(create_test_app_state());
        let created = body_json(post_json(app.clone(), "/reports", &report_body()).await).await;
        let id: &str = created["id"].as_str().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/reports/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_factors_endpoint_lists_categories() {
        let app: Router = build_router(create_test_app_state());
        let response = get_uri(app, "/factors").await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["carbon_price_eur_per_tco2e"], 80.0);
        assert_eq!(body["factors"].as_array().unwrap().len(), 4);
    }
}
