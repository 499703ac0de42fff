use crate::error::{AppError, ValidationError};
use crate::models::upload::{UploadCandidate, UploadPhase};

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub fn validate_candidate(candidate: &UploadCandidate) -> Result<(), ValidationError> {
    if candidate.size() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::SizeExceeded {
            size: candidate.size(),
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

pub fn validate_folder_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFolderName);
    }
    Ok(trimmed.to_string())
}

pub fn progress_percent(bytes_sent: u64, bytes_total: u64) -> u8 {
    if bytes_total == 0 {
        return 100;
    }
    let percent = bytes_sent.saturating_mul(100) / bytes_total;
    percent.min(100) as u8
}

/// Per-candidate state machine:
/// Idle -> Selected -> Uploading(percent) -> Succeeded | Failed.
#[derive(Debug, Default)]
pub struct UploadPipeline {
    phase: UploadPhase,
    candidate: Option<UploadCandidate>,
}

impl UploadPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase.clone()
    }

    pub fn candidate(&self) -> Option<&UploadCandidate> {
        self.candidate.as_ref()
    }

    pub fn select(&mut self, candidate: UploadCandidate) -> Result<(), AppError> {
        if matches!(self.phase, UploadPhase::Uploading { .. }) {
            return Err(AppError::General(
                "an upload is already in progress".to_string(),
            ));
        }
        validate_candidate(&candidate)?;
        self.candidate = Some(candidate);
        self.phase = UploadPhase::Selected;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.candidate = None;
        self.phase = UploadPhase::Idle;
    }

    /// Hands out a copy of the candidate for transfer. Valid from Selected,
    /// and from Failed so a failed transfer can be retried.
    pub fn begin(&mut self) -> Result<UploadCandidate, AppError> {
        match self.phase {
            UploadPhase::Uploading { .. } => {
                return Err(AppError::General(
                    "an upload is already in progress".to_string(),
                ));
            }
            UploadPhase::Selected | UploadPhase::Failed { .. } => {}
            UploadPhase::Idle | UploadPhase::Succeeded => {
                return Err(AppError::General("no upload candidate selected".to_string()));
            }
        }
        let candidate = self
            .candidate
            .clone()
            .ok_or_else(|| AppError::General("no upload candidate selected".to_string()))?;
        self.phase = UploadPhase::Uploading { percent: 0 };
        Ok(candidate)
    }

    pub fn set_progress(&mut self, percent: u8) {
        if matches!(self.phase, UploadPhase::Uploading { .. }) {
            self.phase = UploadPhase::Uploading {
                percent: percent.min(100),
            };
        }
    }

    pub fn finish_success(&mut self) {
        self.phase = UploadPhase::Succeeded;
        self.candidate = None;
    }

    pub fn finish_failure(&mut self, message: impl Into<String>) {
        self.phase = UploadPhase::Failed {
            message: message.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(len: usize) -> UploadCandidate {
        UploadCandidate::from_bytes("photo.jpg", "image/jpeg", vec![0u8; len])
    }

    #[test]
    fn select_valid_candidate_moves_to_selected() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(1024)).unwrap();
        assert_eq!(pipeline.phase(), UploadPhase::Selected);
        assert_eq!(pipeline.candidate().unwrap().name, "photo.jpg");
    }

    #[test]
    fn select_accepts_exactly_the_limit() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(MAX_UPLOAD_BYTES as usize)).unwrap();
        assert_eq!(pipeline.phase(), UploadPhase::Selected);
    }

    #[test]
    fn select_rejects_oversize_and_keeps_state() {
        let mut pipeline = UploadPipeline::new();
        let err = pipeline.select(candidate(6 * 1024 * 1024)).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "size_exceeded");
        assert_eq!(pipeline.phase(), UploadPhase::Idle);
        assert!(pipeline.candidate().is_none());
    }

    #[test]
    fn failed_oversize_select_keeps_previous_candidate() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        assert!(pipeline.select(candidate(6 * 1024 * 1024)).is_err());
        assert_eq!(pipeline.phase(), UploadPhase::Selected);
        assert_eq!(pipeline.candidate().unwrap().size(), 10);
    }

    #[test]
    fn select_is_rejected_while_uploading() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        pipeline.begin().unwrap();
        assert!(pipeline.select(candidate(20)).is_err());
        assert_eq!(pipeline.phase(), UploadPhase::Uploading { percent: 0 });
    }

    #[test]
    fn clear_discards_candidate_and_returns_to_idle() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        pipeline.clear();
        assert_eq!(pipeline.phase(), UploadPhase::Idle);
        assert!(pipeline.candidate().is_none());
    }

    #[test]
    fn begin_moves_to_uploading_at_zero() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        let handed_out = pipeline.begin().unwrap();
        assert_eq!(handed_out.size(), 10);
        assert_eq!(pipeline.phase(), UploadPhase::Uploading { percent: 0 });
    }

    #[test]
    fn begin_without_selection_errors() {
        let mut pipeline = UploadPipeline::new();
        assert!(pipeline.begin().is_err());
        assert_eq!(pipeline.phase(), UploadPhase::Idle);
    }

    #[test]
    fn begin_after_failure_retries_retained_candidate() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        pipeline.begin().unwrap();
        pipeline.finish_failure("connection reset");

        assert_eq!(
            pipeline.phase(),
            UploadPhase::Failed {
                message: "connection reset".to_string()
            }
        );
        let retried = pipeline.begin().unwrap();
        assert_eq!(retried.size(), 10);
        assert_eq!(pipeline.phase(), UploadPhase::Uploading { percent: 0 });
    }

    #[test]
    fn progress_applies_only_while_uploading() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        pipeline.set_progress(50);
        assert_eq!(pipeline.phase(), UploadPhase::Selected);

        pipeline.begin().unwrap();
        pipeline.set_progress(50);
        assert_eq!(pipeline.phase(), UploadPhase::Uploading { percent: 50 });
        pipeline.set_progress(200);
        assert_eq!(pipeline.phase(), UploadPhase::Uploading { percent: 100 });
    }

    #[test]
    fn finish_success_drops_the_candidate() {
        let mut pipeline = UploadPipeline::new();
        pipeline.select(candidate(10)).unwrap();
        pipeline.begin().unwrap();
        pipeline.finish_success();
        assert_eq!(pipeline.phase(), UploadPhase::Succeeded);
        assert!(pipeline.candidate().is_none());
        assert!(pipeline.begin().is_err());
    }

    #[test]
    fn validate_rejects_only_above_the_boundary() {
        assert!(validate_candidate(&candidate(MAX_UPLOAD_BYTES as usize)).is_ok());
        let err = validate_candidate(&candidate(MAX_UPLOAD_BYTES as usize + 1)).unwrap_err();
        assert_eq!(err.code(), "size_exceeded");
    }

    #[test]
    fn folder_names_are_trimmed_and_non_empty() {
        assert_eq!(validate_folder_name("  holiday  ").unwrap(), "holiday");
        assert_eq!(
            validate_folder_name("   ").unwrap_err().code(),
            "empty_folder_name"
        );
        assert_eq!(
            validate_folder_name("").unwrap_err().code(),
            "empty_folder_name"
        );
    }

    #[test]
    fn progress_percent_floors_partial_chunks() {
        assert_eq!(progress_percent(0, 300), 0);
        assert_eq!(progress_percent(100, 300), 33);
        assert_eq!(progress_percent(200, 300), 66);
        assert_eq!(progress_percent(300, 300), 100);
        assert_eq!(progress_percent(0, 0), 100);
        assert_eq!(progress_percent(400, 300), 100);
    }
}
