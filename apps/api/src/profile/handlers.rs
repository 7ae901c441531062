//! Axum route handlers for the Profile API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::{extract_text, DocumentKind};
use crate::profile::analyzer::analyze_resume;
use crate::profile::cache::{fingerprint, CachedProfile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Multipart upload: `file` (required), `api_key` and `refresh` (optional).
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub api_key: Option<String>,
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: CachedProfile,
    /// True when the analysis was served from the cache without calling the LLM.
    pub cached: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/profiles
///
/// Extracts the resume text and analyzes it, unless this exact document was
/// analyzed before and no refresh was requested.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProfileResponse>, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    DocumentKind::from_file_name(&upload.file_name)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let fingerprint = fingerprint(&upload.bytes);
    if !upload.refresh {
        if let Some(cached) = state.profiles.get(&fingerprint).await {
            info!("Serving cached profile for {}", fingerprint);
            return Ok(Json(ProfileResponse {
                profile: cached,
                cached: true,
            }));
        }
    }

    let api_key = state
        .config
        .gemini_api_key
        .clone()
        .or(upload.api_key)
        .ok_or_else(|| {
            AppError::Validation(
                "A Gemini API key is required: set GEMINI_API_KEY or send api_key".to_string(),
            )
        })?;

    let resume_text = extract_resume_text(upload.file_name.clone(), upload.bytes).await?;
    let profile = analyze_resume(&resume_text, &api_key, &state.llm).await?;

    let cached = CachedProfile {
        fingerprint,
        file_name: upload.file_name,
        profile,
        analyzed_at: Utc::now(),
    };
    state.profiles.insert(cached.clone()).await;
    info!(
        "Cached profile {} ({} profiles cached)",
        cached.fingerprint,
        state.profiles.len().await
    );

    Ok(Json(ProfileResponse {
        profile: cached,
        cached: false,
    }))
}

/// GET /api/v1/profiles/:fingerprint
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<CachedProfile>, AppError> {
    state
        .profiles
        .get(&fingerprint)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No profile cached for {fingerprint}")))
}

/// DELETE /api/v1/profiles/:fingerprint
///
/// Drops the cached analysis so the next upload of the document is analyzed again.
pub async fn handle_invalidate_profile(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.profiles.invalidate(&fingerprint).await {
        info!("Invalidated cached profile {}", fingerprint);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No profile cached for {fingerprint}"
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<ResumeUpload, AppError> {
    let mut file = None;
    let mut api_key = None;
    let mut refresh = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit, "Invalid multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("file part has no file name".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit, "Failed to read upload"))?;
                file = Some((file_name, bytes));
            }
            "api_key" => {
                let value = field_text(field, limit).await?;
                if !value.is_empty() {
                    api_key = Some(value);
                }
            }
            "refresh" => {
                let value = field_text(field, limit).await?;
                refresh = matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on");
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' upload".to_string()))?;

    Ok(ResumeUpload {
        file_name,
        bytes,
        api_key,
        refresh,
    })
}

/// Body-limit overruns surface here as multipart errors carrying a 413 status.
fn multipart_error(err: MultipartError, limit: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the {limit}-byte limit (MAX_UPLOAD_BYTES)"
        ))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

async fn field_text(
    field: axum::extract::multipart::Field<'_>,
    limit: usize,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map(|v| v.trim().to_string())
        .map_err(|e| multipart_error(e, limit, "Invalid form field"))
}

/// Runs extraction on the blocking pool. Empty text counts as a failed read.
async fn extract_resume_text(file_name: String, bytes: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the document".to_string(),
        ));
    }
    Ok(text)
}
