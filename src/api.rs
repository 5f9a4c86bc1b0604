//! REST API for the pitch deck analyzer
//!
//! Accepts multipart uploads and returns the analysis as JSON or as a
//! downloadable CSV report.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::error::AnalysisError;
use crate::models::{Document, MediaKind, Section};
use crate::pipeline::{AnalysisRequest, Analyzer};
use crate::report::{Report, REPORT_FILENAME};
use crate::schema::{financial_template_csv, TEMPLATE_FILENAME};

pub const PITCH_DECK_FIELD: &str = "pitch_deck";
pub const FINANCIALS_FIELD: &str = "financials";

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SectionView {
    pub title: String,
    pub available: bool,
    pub content: String,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub analyzer: Arc<Analyzer>,
}

/// =============================
/// Helpers
/// =============================

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ApiResponse::error(message))).into_response()
}

fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::MissingInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn csv_attachment(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Collect the two uploads; empty parts count as absent
async fn read_uploads(mut multipart: Multipart) -> Result<AnalysisRequest, Response> {
    let mut request = AnalysisRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid multipart upload: {}", e),
                ))
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or(name.as_str()).to_string();
        let declared = field.content_type().unwrap_or_default().to_string();

        let bytes = field.bytes().await.map_err(|e| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read upload '{}': {}", name, e),
            )
        })?;

        if bytes.is_empty() {
            debug!(field = %name, "Ignoring empty upload");
            continue;
        }

        let document = Document::new(
            filename.clone(),
            MediaKind::from_declared(&declared, &filename),
            bytes.to_vec(),
        );

        match name.as_str() {
            PITCH_DECK_FIELD => request.pitch_deck = Some(document),
            FINANCIALS_FIELD => request.financials = Some(document),
            other => debug!(field = %other, "Ignoring unknown upload field"),
        }
    }

    Ok(request)
}

async fn run_analysis(state: &ApiState, multipart: Multipart) -> Result<Report, Response> {
    let request = read_uploads(multipart).await?;

    state.analyzer.analyze(request).await.map_err(|e| {
        error!(error = %e, "Analysis failed");
        error_response(status_for(&e), e.to_string())
    })
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Template Download
/// =============================

async fn download_template() -> Response {
    match financial_template_csv() {
        Ok(csv) => csv_attachment(TEMPLATE_FILENAME, csv),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// =============================
/// Analysis Endpoints
/// =============================

async fn analyze(State(state): State<ApiState>, multipart: Multipart) -> Response {
    let report = match run_analysis(&state, multipart).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    info!(
        report_id = %report.report_id,
        available_sections = report.available_count(),
        "Analysis completed"
    );

    let sections: Vec<SectionView> = report
        .sections()
        .iter()
        .map(|(title, section)| SectionView {
            title: title.to_string(),
            available: section.is_available(),
            content: match section {
                Section::Available(text) => text.clone(),
                Section::Unavailable(reason) => reason.clone(),
            },
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "report_id": report.report_id,
            "generated_at": report.generated_at.to_rfc3339(),
            "sources": report.sources,
            "sections": sections,
            "report_text": report.render_text(),
        }))),
    )
        .into_response()
}

async fn download_report(State(state): State<ApiState>, multipart: Multipart) -> Response {
    let report = match run_analysis(&state, multipart).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    match report.to_csv() {
        Ok(csv) => csv_attachment(REPORT_FILENAME, csv),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(analyzer: Arc<Analyzer>, max_upload_bytes: usize) -> Router {
    let state = ApiState { analyzer };

    Router::new()
        .route("/health", get(health))
        .route("/api/template", get(download_template))
        .route("/api/analyze", post(analyze))
        .route("/api/report", post(download_report))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    analyzer: Arc<Analyzer>,
    port: u16,
    max_upload_bytes: usize,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(analyzer, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ValuationConfig;
    use crate::generator::MockGenerator;
    use crate::pipeline::MISSING_INPUT_GUIDANCE;
    use crate::test_support::minimal_pdf;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "analyzer-test-boundary";
    const STATEMENT: &str = "Year,Revenue,Free Cash Flow\n2021,100,10\n2022,110,12\n2023,121,13\n";

    fn router() -> Router {
        let analyzer = Analyzer::new(
            Box::new(MockGenerator::responding("Clear market, unproven team.")),
            ValuationConfig::default(),
        );
        create_router(Arc::new(analyzer), 10 * 1024 * 1024)
    }

    /// (field, filename, content type, bytes)
    fn multipart_body(parts: &[(&str, &str, &str, Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, filename, content_type, bytes) in parts {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, field, filename, content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload(uri: &str, parts: &[(&str, &str, &str, Vec<u8>)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn both_files() -> Vec<(&'static str, &'static str, &'static str, Vec<u8>)> {
        vec![
            (PITCH_DECK_FIELD, "deck.pdf", "application/pdf", minimal_pdf(&["Farm drones"])),
            (FINANCIALS_FIELD, "financials.csv", "text/csv", STATEMENT.as_bytes().to_vec()),
        ]
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("healthy"));
    }

    #[tokio::test]
    async fn test_template_download() {
        let response = router()
            .oneshot(Request::builder().uri("/api/template").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"financial_statement_template.csv\""
        );
        assert!(body_string(response).await.starts_with("Year,Revenue,"));
    }

    #[tokio::test]
    async fn test_analyze_returns_three_sections() {
        let response = router()
            .oneshot(upload("/api/analyze", &both_files()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: ApiResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.success);

        let data = body.data.unwrap();
        let sections: Vec<SectionView> = serde_json::from_value(data["sections"].clone()).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].content, "Clear market, unproven team.");
        assert_eq!(sections[1].content, "Latest revenue growth rate: 10.00%");
        assert_eq!(sections[2].content, "Valuation based on DCF model: $145.83");
        assert!(data["report_text"].as_str().unwrap().contains("## Valuation Analysis"));
    }

    #[tokio::test]
    async fn test_analyze_without_financials_gives_guidance() {
        let parts = vec![both_files().remove(0)];
        let response = router().oneshot(upload("/api/analyze", &parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ApiResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!body.success);
        assert!(body.error.unwrap().contains(MISSING_INPUT_GUIDANCE));
    }

    #[tokio::test]
    async fn test_unsupported_statement_is_a_section_failure() {
        let parts = vec![
            both_files().remove(0),
            (FINANCIALS_FIELD, "chart.png", "image/png", vec![0x89, b'P', b'N', b'G']),
        ];
        let response = router().oneshot(upload("/api/analyze", &parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: ApiResponse = serde_json::from_str(&body_string(response).await).unwrap();
        let sections: Vec<SectionView> =
            serde_json::from_value(body.data.unwrap()["sections"].clone()).unwrap();
        assert_eq!(sections[0].content, "Clear market, unproven team.");
        assert!(!sections[1].available);
        assert!(!sections[2].available);
    }

    #[tokio::test]
    async fn test_csv_with_charset_parameter() {
        let parts = vec![
            both_files().remove(0),
            (
                FINANCIALS_FIELD,
                "financials",
                "text/csv; charset=utf-8",
                STATEMENT.as_bytes().to_vec(),
            ),
        ];
        let response = router().oneshot(upload("/api/analyze", &parts)).await.unwrap();

        let body: ApiResponse = serde_json::from_str(&body_string(response).await).unwrap();
        let sections: Vec<SectionView> =
            serde_json::from_value(body.data.unwrap()["sections"].clone()).unwrap();
        assert_eq!(sections[1].content, "Latest revenue growth rate: 10.00%");
    }

    #[test]
    fn test_only_missing_input_is_a_client_error() {
        assert_eq!(
            status_for(&AnalysisError::MissingInput("upload both files".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AnalysisError::ServiceError("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_report_download() {
        let response = router()
            .oneshot(upload("/api/report", &both_files()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"pitch_deck_analysis_report.csv\""
        );

        let csv = body_string(response).await;
        assert!(csv.starts_with("Section,Analysis"));
        assert!(csv.contains("Financial Analysis,Latest revenue growth rate: 10.00%"));
    }
}
