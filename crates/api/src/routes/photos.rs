//! Photo contribution route.

use axum::{extract::State, http::StatusCode, Json};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use domain::models::photo::{PhotoUploadFile, PhotoUploadRequest};
use domain::models::PhotoContribution;
use domain::services::{CandidateFile, FailedFile, PhotoPipeline};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_photos;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PhotoUploadResponse {
    pub committed: Vec<PhotoContribution>,
    pub rejected: Vec<UploadProblem>,
    pub failed: Vec<UploadProblem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UploadProblem {
    pub file_name: String,
    pub reason: String,
}

impl From<FailedFile> for UploadProblem {
    fn from(failed: FailedFile) -> Self {
        Self {
            file_name: failed.file_name,
            reason: failed.error.to_string(),
        }
    }
}

/// Accepts a raw base64 string or a `data:<type>;base64,<data>` URL.
fn decode_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let data = data.trim();
    let payload = match data.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, p)| p).unwrap_or(rest),
        None => data,
    };
    STANDARD.decode(payload)
}

fn content_type_for(file: &PhotoUploadFile) -> String {
    file.content_type
        .as_deref()
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            mime_guess::from_path(&file.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
}

/// Contribute a batch of photos.
///
/// POST /api/v1/photos
///
/// Files are judged one by one; invalid files are reported without blocking
/// the others. Files that fail to upload are retried once. Answers 201 as
/// long as at least one file was committed.
pub async fn upload_photos(
    State(state): State<AppState>,
    Json(request): Json<PhotoUploadRequest>,
) -> Result<(StatusCode, Json<PhotoUploadResponse>), ApiError> {
    if request.files.is_empty() {
        return Err(ApiError::Validation("No files were provided".to_string()));
    }

    let mut pipeline = PhotoPipeline::new(state.gateway.clone(), state.config.uploads.clone());
    if let Some(contributor) = request.contributor.as_deref() {
        pipeline.set_contributor(contributor)?;
    }

    let mut rejected = Vec::new();
    let mut candidates = Vec::with_capacity(request.files.len());
    for file in &request.files {
        match decode_payload(&file.data_base64) {
            Ok(bytes) => candidates.push(CandidateFile {
                file_name: file.file_name.clone(),
                content_type: content_type_for(file),
                bytes,
            }),
            Err(e) => {
                tracing::warn!(
                    file_name = %file.file_name,
                    error = %e,
                    "Photo payload is not valid base64"
                );
                rejected.push(UploadProblem {
                    file_name: file.file_name.clone(),
                    reason: "File data is not valid base64".to_string(),
                });
            }
        }
    }

    let staging = pipeline.stage_files(candidates).await;
    rejected.extend(staging.rejected.into_iter().map(|r| UploadProblem {
        file_name: r.file_name,
        reason: r.reason.to_string(),
    }));

    if staging.accepted.is_empty() {
        let reasons: Vec<String> = rejected
            .iter()
            .map(|r| format!("{}: {}", r.file_name, r.reason))
            .collect();
        return Err(ApiError::Validation(format!(
            "No file could be accepted ({})",
            reasons.join(", ")
        )));
    }

    let mut report = pipeline.submit().await?;
    if !report.is_complete() {
        tracing::info!(failed = report.failed.len(), "Retrying failed photo uploads");
        match pipeline.submit().await {
            Ok(retry) => {
                report.committed.extend(retry.committed);
                report.failed = retry.failed;
            }
            Err(e) => tracing::warn!(error = %e, "Photo retry round failed"),
        }
    }

    record_photos(report.committed.len(), rejected.len(), report.failed.len());

    if report.committed.is_empty() {
        if let Some(first) = report.failed.first() {
            return Err(first.error.clone().into());
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(PhotoUploadResponse {
            committed: report.committed,
            rejected,
            failed: report.failed.into_iter().map(UploadProblem::from).collect(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, content_type: Option<&str>) -> PhotoUploadFile {
        PhotoUploadFile {
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            data_base64: String::new(),
        }
    }

    #[test]
    fn test_decode_raw_and_data_url() {
        assert_eq!(decode_payload("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_payload("data:image/png;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert!(decode_payload("not base64!").is_err());
    }

    #[test]
    fn test_content_type_guessed_from_name() {
        assert_eq!(content_type_for(&upload("IMG_0001.JPG", None)), "image/jpeg");
        assert_eq!(content_type_for(&upload("party.png", Some("  "))), "image/png");
        assert_eq!(
            content_type_for(&upload("notes", None)),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_explicit_content_type_wins() {
        assert_eq!(
            content_type_for(&upload("photo.bin", Some("image/heic"))),
            "image/heic"
        );
    }
}
