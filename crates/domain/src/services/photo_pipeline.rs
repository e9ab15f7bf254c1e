//! Photo contribution pipeline.
//!
//! Guests stage files, name themselves and submit the batch. Each staged file
//! is uploaded to the object store and then recorded as one
//! [`PhotoContribution`]. Uploads run concurrently; a partially failed batch
//! keeps the failed files so only those are retried.
//!
//! Upload tasks are detached from the `submit` future and report into an
//! inbox owned by the pipeline. If a caller drops `submit` mid-batch, the
//! next `submit` waits for those tasks and applies their outcomes before
//! uploading anything, so a record is never written twice.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use shared::validation::{validate_media_type, validate_name};
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

use super::gateway::{Gateway, GatewayError, NewRecord};
use crate::models::{MediaRef, NewPhotoContribution, PhotoContribution, UploadLimits};

/// Local identifier of a staged file.
pub type StagedId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Staging,
    Submitting,
    Committed,
    Failed,
}

/// A file selected by the guest.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("File is empty")]
    Empty,
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("File is {size} bytes, the limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("At most {max} files can be uploaded at once")]
    CountExceeded { max: usize },
    #[error("Preview could not be generated: {0}")]
    PreviewFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: RejectionReason,
}

/// Outcome of [`PhotoPipeline::stage_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingReport {
    pub accepted: Vec<StagedId>,
    pub rejected: Vec<RejectedFile>,
}

/// Local preview of a staged image as a data URL. Dropping it releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    data_url: String,
}

impl Preview {
    /// Encodes the bytes off the async executor.
    pub async fn generate(bytes: Arc<[u8]>, content_type: String) -> Result<Self, RejectionReason> {
        tokio::task::spawn_blocking(move || {
            let data_url = format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes));
            Preview { data_url }
        })
        .await
        .map_err(|e| RejectionReason::PreviewFailed(e.to_string()))
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileState {
    Staged,
    Committed(PhotoContribution),
    /// `uploaded` is set when the media reached the object store but the
    /// record insert failed; a retry skips the upload.
    Failed {
        error: GatewayError,
        uploaded: Option<MediaRef>,
    },
}

#[derive(Debug, Clone)]
pub struct StagedFile {
    pub id: StagedId,
    pub file_name: String,
    pub content_type: String,
    bytes: Arc<[u8]>,
    preview: Option<Preview>,
    state: FileState,
}

impl StagedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> &FileState {
        &self.state
    }

    fn is_committed(&self) -> bool {
        matches!(self.state, FileState::Committed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedFile {
    pub id: StagedId,
    pub file_name: String,
    pub error: GatewayError,
}

/// Outcome of one submission round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionReport {
    pub committed: Vec<PhotoContribution>,
    pub failed: Vec<FailedFile>,
}

impl SubmissionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("A contributor name is required before submitting")]
    ContributorRequired,

    #[error("Invalid contributor name: {0}")]
    InvalidContributor(String),

    #[error("No files are staged")]
    NothingStaged,

    #[error("Unknown staged file: {0}")]
    UnknownFile(StagedId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

type UploadResult = Result<PhotoContribution, (GatewayError, Option<MediaRef>)>;

/// Outcomes written by upload tasks, drained by the pipeline.
type UploadInbox = Arc<Mutex<Vec<(StagedId, UploadResult)>>>;

/// One guest's photo batch.
pub struct PhotoPipeline {
    gateway: Arc<dyn Gateway>,
    limits: UploadLimits,
    stage: PipelineStage,
    contributor: Option<String>,
    files: Vec<StagedFile>,
    inbox: UploadInbox,
    in_flight: Vec<JoinHandle<()>>,
}

impl PhotoPipeline {
    pub fn new(gateway: Arc<dyn Gateway>, limits: UploadLimits) -> Self {
        Self {
            gateway,
            limits,
            stage: PipelineStage::Idle,
            contributor: None,
            files: Vec::new(),
            inbox: Arc::default(),
            in_flight: Vec::new(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn contributor(&self) -> Option<&str> {
        self.contributor.as_deref()
    }

    /// Number of previews currently held.
    pub fn live_previews(&self) -> usize {
        self.files.iter().filter(|f| f.preview.is_some()).count()
    }

    pub fn failed_files(&self) -> Vec<FailedFile> {
        self.files
            .iter()
            .filter_map(|f| match &f.state {
                FileState::Failed { error, .. } => Some(FailedFile {
                    id: f.id,
                    file_name: f.file_name.clone(),
                    error: error.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn set_contributor(&mut self, name: &str) -> Result<(), PipelineError> {
        validate_name(name).map_err(|e| {
            PipelineError::InvalidContributor(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            )
        })?;
        self.contributor = Some(name.trim().to_string());
        Ok(())
    }

    /// Validate and stage files. Each file is judged on its own; a rejected
    /// file never affects the others.
    pub async fn stage_files(&mut self, candidates: Vec<CandidateFile>) -> StagingReport {
        if self.stage == PipelineStage::Committed {
            self.stage = PipelineStage::Idle;
        }

        let mut report = StagingReport::default();
        let mut pending = Vec::new();
        let mut slots = self.limits.max_files.saturating_sub(self.pending_count());

        for candidate in candidates {
            let reason = if candidate.bytes.is_empty() {
                Some(RejectionReason::Empty)
            } else if validate_media_type(
                &candidate.content_type,
                &self.limits.accepted_media_types,
            )
            .is_err()
            {
                Some(RejectionReason::UnsupportedType(candidate.content_type.clone()))
            } else if candidate.bytes.len() > self.limits.max_file_bytes {
                Some(RejectionReason::TooLarge {
                    size: candidate.bytes.len(),
                    max: self.limits.max_file_bytes,
                })
            } else if slots == 0 {
                Some(RejectionReason::CountExceeded {
                    max: self.limits.max_files,
                })
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    tracing::warn!(
                        file_name = %candidate.file_name,
                        reason = %reason,
                        "Photo rejected"
                    );
                    report.rejected.push(RejectedFile {
                        file_name: candidate.file_name,
                        reason,
                    });
                }
                None => {
                    slots -= 1;
                    pending.push(candidate);
                }
            }
        }

        // Previews are generated concurrently; order of the batch is kept.
        let mut previews = JoinSet::new();
        for (index, candidate) in pending.iter().enumerate() {
            let bytes: Arc<[u8]> = Arc::from(candidate.bytes.as_slice());
            let content_type = candidate.content_type.clone();
            previews.spawn(async move {
                let preview = Preview::generate(bytes.clone(), content_type).await;
                (index, bytes, preview)
            });
        }

        let mut generated = HashMap::new();
        while let Some(joined) = previews.join_next().await {
            match joined {
                Ok((index, bytes, preview)) => {
                    generated.insert(index, (bytes, preview));
                }
                Err(e) => tracing::error!(error = %e, "Preview task failed"),
            }
        }

        for (index, candidate) in pending.into_iter().enumerate() {
            match generated.remove(&index) {
                Some((bytes, Ok(preview))) => {
                    let id = Uuid::new_v4();
                    self.files.push(StagedFile {
                        id,
                        file_name: candidate.file_name,
                        content_type: candidate.content_type,
                        bytes,
                        preview: Some(preview),
                        state: FileState::Staged,
                    });
                    report.accepted.push(id);
                }
                Some((_, Err(reason))) => report.rejected.push(RejectedFile {
                    file_name: candidate.file_name,
                    reason,
                }),
                None => report.rejected.push(RejectedFile {
                    file_name: candidate.file_name,
                    reason: RejectionReason::PreviewFailed("preview task aborted".to_string()),
                }),
            }
        }

        if !report.accepted.is_empty() && self.stage == PipelineStage::Idle {
            self.stage = PipelineStage::Staging;
        }
        tracing::debug!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "Photos staged"
        );
        report
    }

    /// Drop a file from the batch and release its preview.
    pub fn remove_file(&mut self, id: StagedId) -> Result<(), PipelineError> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id && !f.is_committed())
            .ok_or(PipelineError::UnknownFile(id))?;
        self.files.remove(index);

        if self.pending_count() == 0 {
            let any_committed = self.files.iter().any(StagedFile::is_committed);
            self.files.clear();
            self.stage = if any_committed {
                PipelineStage::Committed
            } else {
                PipelineStage::Idle
            };
        }
        Ok(())
    }

    /// Abandon the batch. Nothing staged is persisted.
    pub fn reset(&mut self) {
        self.files.clear();
        self.contributor = None;
        self.stage = PipelineStage::Idle;
    }

    fn pending_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_committed()).count()
    }

    /// Upload every file that is not yet committed.
    ///
    /// Without a contributor the call is refused and nothing changes. If the
    /// backend is unconfigured the files stay staged. Uploads left running
    /// by an abandoned call are awaited first; files they committed are
    /// reported here and not uploaded again.
    pub async fn submit(&mut self) -> Result<SubmissionReport, PipelineError> {
        let contributor = self
            .contributor
            .clone()
            .ok_or(PipelineError::ContributorRequired)?;

        let mut report = SubmissionReport::default();
        if !self.in_flight.is_empty() {
            self.settle_in_flight().await;
            let (recovered, _) = self.apply_outcomes();
            if !recovered.is_empty() {
                tracing::info!(
                    photos = recovered.len(),
                    "Recovered photos from an abandoned submission"
                );
            }
            report.committed = recovered;
        }

        if self.pending_count() == 0 {
            if report.committed.is_empty() {
                return Err(PipelineError::NothingStaged);
            }
            self.files.clear();
            self.stage = PipelineStage::Committed;
            return Ok(report);
        }

        let previous_stage = self.stage;
        self.stage = PipelineStage::Submitting;

        for file in self.files.iter().filter(|f| !f.is_committed()) {
            let gateway = self.gateway.clone();
            let inbox = self.inbox.clone();
            let id = file.id;
            let bytes = file.bytes.clone();
            let content_type = file.content_type.clone();
            let contributor = contributor.clone();
            let uploaded = match &file.state {
                FileState::Failed { uploaded, .. } => uploaded.clone(),
                _ => None,
            };
            self.in_flight.push(tokio::spawn(async move {
                let result =
                    upload_one(gateway.as_ref(), &bytes, &content_type, contributor, uploaded)
                        .await;
                lock_inbox(&inbox).push((id, result));
            }));
        }

        self.settle_in_flight().await;
        let (committed, unconfigured) = self.apply_outcomes();
        report.committed.extend(committed);

        // Files whose task died without a result count as failed.
        if unconfigured.is_none() {
            for file in self.files.iter_mut() {
                if matches!(file.state, FileState::Staged) {
                    file.state = FileState::Failed {
                        error: GatewayError::Backend("Upload did not complete".to_string()),
                        uploaded: None,
                    };
                }
            }
        }

        if let Some(error) = unconfigured {
            tracing::warn!(error = %error, "Photo batch not submitted, backend unconfigured");
            self.stage = match previous_stage {
                PipelineStage::Failed => PipelineStage::Failed,
                _ => PipelineStage::Staging,
            };
            return Err(PipelineError::Gateway(error));
        }

        report.failed = self.failed_files();
        if report.failed.is_empty() {
            tracing::info!(
                contributor = %contributor,
                photos = report.committed.len(),
                "Photo batch committed"
            );
            self.files.clear();
            self.stage = PipelineStage::Committed;
        } else {
            tracing::warn!(
                committed = report.committed.len(),
                failed = report.failed.len(),
                "Photo batch partially failed"
            );
            self.stage = PipelineStage::Failed;
        }
        Ok(report)
    }

    /// Wait for every upload task. A handle is removed only once its task
    /// finished, so dropping this future mid-way loses nothing.
    async fn settle_in_flight(&mut self) {
        while let Some(handle) = self.in_flight.last_mut() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Photo upload task failed");
            }
            self.in_flight.pop();
        }
    }

    /// Apply finished uploads to the files they belong to.
    fn apply_outcomes(&mut self) -> (Vec<PhotoContribution>, Option<GatewayError>) {
        let outcomes = std::mem::take(&mut *lock_inbox(&self.inbox));
        let mut committed = Vec::new();
        let mut unconfigured = None;

        for (id, result) in outcomes {
            let Some(file) = self.files.iter_mut().find(|f| f.id == id) else {
                continue;
            };
            match result {
                Ok(contribution) => {
                    file.preview = None;
                    committed.push(contribution.clone());
                    file.state = FileState::Committed(contribution);
                }
                Err((error, _)) if error.is_unconfigured() => {
                    unconfigured = Some(error);
                }
                Err((error, uploaded)) => {
                    tracing::error!(
                        file_name = %file.file_name,
                        error = %error,
                        "Photo upload failed"
                    );
                    file.state = FileState::Failed { error, uploaded };
                }
            }
        }
        (committed, unconfigured)
    }
}

fn lock_inbox(inbox: &UploadInbox) -> MutexGuard<'_, Vec<(StagedId, UploadResult)>> {
    inbox.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn upload_one(
    gateway: &dyn Gateway,
    bytes: &[u8],
    content_type: &str,
    contributor: String,
    uploaded: Option<MediaRef>,
) -> UploadResult {
    let media_ref = match uploaded {
        Some(media_ref) => media_ref,
        None => gateway
            .upload_media(bytes, content_type)
            .await
            .map_err(|e| (e, None))?,
    };

    let new = NewPhotoContribution {
        media_ref: media_ref.clone(),
        contributor,
        created_at: Utc::now(),
    };
    let id = gateway
        .insert(NewRecord::PhotoContribution(new.clone()))
        .await
        .map_err(|e| (e, Some(media_ref)))?;
    Ok(PhotoContribution::from_new(id, new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::{InMemoryGateway, UnconfiguredGateway};
    use std::time::Duration;

    fn image(name: &str) -> CandidateFile {
        CandidateFile {
            file_name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: format!("jpeg:{}", name).into_bytes(),
        }
    }

    fn limits(max_files: usize) -> UploadLimits {
        UploadLimits {
            max_files,
            max_file_bytes: 1024,
            accepted_media_types: vec!["image/*".to_string()],
        }
    }

    #[tokio::test]
    async fn test_scenario_three_photos_from_tom() {
        let gateway = Arc::new(InMemoryGateway::new());
        let mut pipeline = PhotoPipeline::new(gateway.clone(), limits(20));

        let report = pipeline
            .stage_files(vec![image("a.jpg"), image("b.jpg"), image("c.jpg")])
            .await;
        assert_eq!(report.accepted.len(), 3);
        assert_eq!(pipeline.stage(), PipelineStage::Staging);
        assert_eq!(pipeline.live_previews(), 3);

        pipeline.set_contributor("Tom").unwrap();
        let submitted = pipeline.submit().await.unwrap();

        assert!(submitted.is_complete());
        assert_eq!(submitted.committed.len(), 3);
        assert_eq!(pipeline.stage(), PipelineStage::Committed);
        assert_eq!(pipeline.live_previews(), 0);

        let stored = gateway.photo_contributions();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|p| p.contributor == "Tom"));
    }

    #[tokio::test]
    async fn test_staging_caps_batch_size() {
        let gateway = Arc::new(InMemoryGateway::new());
        let mut pipeline = PhotoPipeline::new(gateway, limits(2));

        let report = pipeline
            .stage_files((0..5).map(|i| image(&format!("{}.jpg", i))).collect())
            .await;

        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected.len(), 3);
        assert!(report
            .rejected
            .iter()
            .all(|r| r.reason == RejectionReason::CountExceeded { max: 2 }));

        // The cap counts files already staged.
        let report = pipeline.stage_files(vec![image("late.jpg")]).await;
        assert!(report.accepted.is_empty());
        assert_eq!(pipeline.files().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_file_excluded_individually() {
        let gateway = Arc::new(InMemoryGateway::new());
        let mut pipeline = PhotoPipeline::new(gateway, limits(20));

        let pdf = CandidateFile {
            content_type: "application/pdf".to_string(),
            ..image("doc.pdf")
        };
        let huge = CandidateFile {
            bytes: vec![0u8; 2048],
            ..image("huge.jpg")
        };
        let empty = CandidateFile {
            bytes: Vec::new(),
            ..image("empty.jpg")
        };
        let report = pipeline
            .stage_files(vec![pdf, image("ok.jpg"), huge, empty])
            .await;

        assert_eq!(report.accepted.len(), 1);
        let reasons: Vec<_> = report.rejected.iter().map(|r| r.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                RejectionReason::UnsupportedType("application/pdf".to_string()),
                RejectionReason::TooLarge { size: 2048, max: 1024 },
                RejectionReason::Empty,
            ]
        );
    }

    #[tokio::test]
    async fn test_preview_is_data_url() {
        let preview = Preview::generate(Arc::from(&b"abc"[..]), "image/png".to_string())
            .await
            .unwrap();
        assert_eq!(preview.data_url(), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_submit_without_contributor_is_blocked() {
        let gateway = Arc::new(InMemoryGateway::new());
        let mut pipeline = PhotoPipeline::new(gateway.clone(), limits(20));
        pipeline.stage_files(vec![image("a.jpg")]).await;

        let err = pipeline.submit().await.unwrap_err();
        assert_eq!(err, PipelineError::ContributorRequired);
        assert_eq!(pipeline.stage(), PipelineStage::Staging);
        assert_eq!(gateway.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_empty_batch() {
        let mut pipeline = PhotoPipeline::new(Arc::new(InMemoryGateway::new()), limits(20));
        pipeline.set_contributor("Tom").unwrap();
        assert_eq!(pipeline.submit().await.unwrap_err(), PipelineError::NothingStaged);
    }

    #[tokio::test]
    async fn test_partial_failure_retries_only_failed_files() {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.set_upload_failure(|bytes| bytes.ends_with(b"b.jpg"));
        let mut pipeline = PhotoPipeline::new(gateway.clone(), limits(20));
        pipeline
            .stage_files(vec![image("a.jpg"), image("b.jpg"), image("c.jpg")])
            .await;
        pipeline.set_contributor("Tom").unwrap();

        let report = pipeline.submit().await.unwrap();
        assert_eq!(report.committed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].file_name, "b.jpg");
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
        assert_eq!(pipeline.live_previews(), 1);
        assert_eq!(gateway.upload_calls(), 3);

        gateway.clear_upload_failure();
        let retry = pipeline.submit().await.unwrap();
        assert!(retry.is_complete());
        assert_eq!(retry.committed.len(), 1);
        assert_eq!(gateway.upload_calls(), 4);
        assert_eq!(pipeline.stage(), PipelineStage::Committed);
        assert_eq!(gateway.photo_contributions().len(), 3);
    }

    #[tokio::test]
    async fn test_retry_after_insert_failure_reuses_upload() {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.set_fail_inserts(true);
        let mut pipeline = PhotoPipeline::new(gateway.clone(), limits(20));
        pipeline.stage_files(vec![image("a.jpg")]).await;
        pipeline.set_contributor("Tom").unwrap();

        let report = pipeline.submit().await.unwrap();
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            pipeline.files()[0].state(),
            FileState::Failed { uploaded: Some(_), .. }
        ));

        gateway.set_fail_inserts(false);
        pipeline.submit().await.unwrap();
        assert_eq!(gateway.upload_calls(), 1);
        assert_eq!(gateway.photo_contributions().len(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_submit_is_not_written_twice() {
        let gateway = Arc::new(InMemoryGateway::new().with_latency(Duration::from_millis(100)));
        let mut pipeline = PhotoPipeline::new(gateway.clone(), limits(20));
        pipeline.stage_files(vec![image("a.jpg"), image("b.jpg")]).await;
        pipeline.set_contributor("Tom").unwrap();

        // Uploads finish at ~100ms, inserts at ~200ms.
        let abandoned = tokio::time::timeout(Duration::from_millis(150), pipeline.submit()).await;
        assert!(abandoned.is_err());
        assert_eq!(pipeline.stage(), PipelineStage::Submitting);

        let report = pipeline.submit().await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.committed.len(), 2);
        assert_eq!(pipeline.stage(), PipelineStage::Committed);
        assert_eq!(gateway.upload_calls(), 2);
        assert_eq!(gateway.insert_calls(), 2);
        assert_eq!(gateway.photo_contributions().len(), 2);
    }

    #[tokio::test]
    async fn test_dropping_failed_file_commits_batch() {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.set_upload_failure(|bytes| bytes.ends_with(b"b.jpg"));
        let mut pipeline = PhotoPipeline::new(gateway, limits(20));
        pipeline.stage_files(vec![image("a.jpg"), image("b.jpg")]).await;
        pipeline.set_contributor("Tom").unwrap();
        let report = pipeline.submit().await.unwrap();

        pipeline.remove_file(report.failed[0].id).unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Committed);
        assert!(pipeline.files().is_empty());
    }

    #[tokio::test]
    async fn test_remove_file_releases_preview() {
        let mut pipeline = PhotoPipeline::new(Arc::new(InMemoryGateway::new()), limits(20));
        let report = pipeline.stage_files(vec![image("a.jpg"), image("b.jpg")]).await;

        pipeline.remove_file(report.accepted[0]).unwrap();
        assert_eq!(pipeline.live_previews(), 1);
        pipeline.remove_file(report.accepted[1]).unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Idle);

        let unknown = Uuid::new_v4();
        assert_eq!(pipeline.remove_file(unknown), Err(PipelineError::UnknownFile(unknown)));
    }

    #[tokio::test]
    async fn test_unconfigured_backend_keeps_files_staged() {
        let mut pipeline = PhotoPipeline::new(Arc::new(UnconfiguredGateway), limits(20));
        pipeline.stage_files(vec![image("a.jpg")]).await;
        pipeline.set_contributor("Tom").unwrap();

        let err = pipeline.submit().await.unwrap_err();
        assert!(matches!(err, PipelineError::Gateway(GatewayError::Unconfigured(_))));
        assert_eq!(pipeline.stage(), PipelineStage::Staging);
        assert!(matches!(pipeline.files()[0].state(), FileState::Staged));
    }

    #[tokio::test]
    async fn test_reset_abandons_batch() {
        let gateway = Arc::new(InMemoryGateway::new());
        let mut pipeline = PhotoPipeline::new(gateway.clone(), limits(20));
        pipeline.stage_files(vec![image("a.jpg")]).await;
        pipeline.set_contributor("Tom").unwrap();
        pipeline.reset();

        assert_eq!(pipeline.stage(), PipelineStage::Idle);
        assert!(pipeline.files().is_empty());
        assert!(gateway.photo_contributions().is_empty());
    }
}
