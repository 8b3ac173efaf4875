//! HTTP handlers for ingestion and top-scorer queries.

use crate::api::dto::{to_dtos, HealthResponse, ScorerDto};
use crate::api::error::ApiError;
use crate::api::AppState;
use crate::core::report;
use crate::domain::model::IngestSummary;
use crate::utils::validation::has_allowed_extension;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

pub const SKIPPED_LINES_HEADER: &str = "x-skipped-lines";
const UPLOAD_FIELD: &str = "file";
const ALLOWED_EXTENSIONS: &[&str] = &["csv"];

const NO_CONTENT_MESSAGE: &str = "No content uploaded.";
const NO_FILE_MESSAGE: &str = "No file uploaded or invalid extension.";
const NO_NAME_MESSAGE: &str = "First or second name was not entered.";

fn ingest_response(summary: IngestSummary) -> impl IntoResponse {
    (
        [(SKIPPED_LINES_HEADER, summary.skipped.len().to_string())],
        Json(to_dtos(&summary.persisted)),
    )
}

#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn ingest_content(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::bad_request(NO_CONTENT_MESSAGE));
    }

    let cancel = state.request_token();
    let summary = state.service.ingest_content(&body, &cancel).await?;
    Ok(ingest_response(summary))
}

#[instrument(skip(state, multipart))]
pub async fn ingest_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Could not read upload: {}", e)))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = match upload {
        Some((name, bytes))
            if !bytes.is_empty() && has_allowed_extension(&name, ALLOWED_EXTENSIONS) =>
        {
            (name, bytes)
        }
        _ => return Err(ApiError::bad_request(NO_FILE_MESSAGE)),
    };

    tracing::info!("Ingesting upload {} ({} bytes)", file_name, bytes.len());
    let cancel = state.request_token();
    let summary = state.service.ingest_stream(&bytes[..], &cancel).await?;
    Ok(ingest_response(summary))
}

#[instrument(skip(state))]
pub async fn top_scorer_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ScorerDto>, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request(NO_NAME_MESSAGE));
    }

    let cancel = state.request_token();
    match state.service.find_by_name(&name, &cancel).await? {
        Some(found) => Ok(Json(ScorerDto::from(&found))),
        None => Err(ApiError::not_found(format!(
            "Top Scorer with the name {} cannot be found.",
            name
        ))),
    }
}

#[instrument(skip(state))]
pub async fn top_scorers(State(state): State<AppState>) -> Result<Json<Vec<ScorerDto>>, ApiError> {
    let cancel = state.request_token();
    let result = state.service.top_scorers(&cancel).await?;
    tracing::info!("\n{}", report::render_banner(&result));
    Ok(Json(to_dtos(&result.scorers)))
}

#[instrument(skip(state))]
pub async fn top_scorers_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cancel = state.request_token();
    let csv = state.service.export_top_scorers_csv(&cancel).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
