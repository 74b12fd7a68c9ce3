use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::dashboard::DashboardSummary;
use super::domain::{AssessmentId, ClinicalRecord, PatientSubmission};
use super::engine::{predict, PredictionOutcome};
use super::history::{HistoryEntry, HistoryQuery};
use super::repository::{AssessmentRecord, AssessmentRepository, RepositoryError};
use super::validation::{validate_submission, InvalidFieldError, SubmissionError};

const DEFAULT_RECENT_LIMIT: usize = 5;

/// Service composing validation, the scoring engine, and the repository.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    recent_limit: usize,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("pt-{id:06}"))
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_recent_limit(repository, DEFAULT_RECENT_LIMIT)
    }

    pub fn with_recent_limit(repository: Arc<R>, recent_limit: usize) -> Self {
        Self {
            repository,
            recent_limit,
        }
    }

    /// Assess a submission and store it with a fresh identifier and timestamp.
    pub fn submit(
        &self,
        submission: PatientSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        if let Err(err) = validate_submission(&submission) {
            warn!(error = %err, "rejected patient submission");
            return Err(err.into());
        }

        let outcome = predict(&submission.record)?;
        let record = AssessmentRecord {
            id: next_assessment_id(),
            assessed_at: Utc::now(),
            patient: submission,
            outcome,
        };

        let stored = self.repository.insert(record)?;
        info!(
            assessment_id = %stored.id,
            risk_score = stored.outcome.risk_score,
            risk_level = stored.outcome.risk_level.label(),
            "assessment recorded"
        );
        Ok(stored)
    }

    /// Score a record without storing it.
    pub fn preview(
        &self,
        record: &ClinicalRecord,
    ) -> Result<PredictionOutcome, AssessmentServiceError> {
        predict(record).map_err(|err| {
            warn!(error = %err, "rejected clinical record");
            AssessmentServiceError::InvalidField(err)
        })
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryEntry>, AssessmentServiceError> {
        let records = self.repository.all()?;
        Ok(query.apply(&records))
    }

    pub fn dashboard(&self) -> Result<DashboardSummary, AssessmentServiceError> {
        let records = self.repository.all()?;
        Ok(DashboardSummary::from_records(&records, self.recent_limit))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AssessmentServiceError {
    /// True when the caller sent input the engine rejects, as opposed to a
    /// storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Submission(_) | Self::InvalidField(_))
    }
}
