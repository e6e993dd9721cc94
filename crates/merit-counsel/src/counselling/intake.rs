use super::domain::{CandidateProfile, CandidateSubmission, Subject};
use super::merit::composite_scores;

pub const MAX_MARK: u8 = 100;

/// Validation errors raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("{subject} mark {mark} is outside 0..=100")]
    InvalidMark { subject: Subject, mark: u8 },
    #[error("rank must be at least 1")]
    InvalidRank,
}

/// Guard responsible for producing `CandidateProfile` instances from raw submissions.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn new() -> Self {
        Self
    }

    /// Range-check every present mark, then derive composites and totals.
    pub fn profile_from_submission(
        &self,
        submission: &CandidateSubmission,
    ) -> Result<CandidateProfile, IntakeError> {
        if let Some((subject, mark)) = submission
            .marks
            .iter()
            .find(|(_, mark)| *mark > MAX_MARK)
        {
            return Err(IntakeError::InvalidMark { subject, mark });
        }

        if submission.rank == Some(0) {
            return Err(IntakeError::InvalidRank);
        }

        Ok(CandidateProfile {
            marks: submission.marks.clone(),
            category: submission.category,
            stream: submission.stream,
            composite_scores: composite_scores(&submission.marks),
            total_marks: submission.marks.total(),
        })
    }
}
