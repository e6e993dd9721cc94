use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::allocation::{AllotmentResult, SeatAllocationSimulator, SeatAvailability};
use super::catalog::{CatalogSnapshot, CatalogStore};
use super::domain::{CandidateProfile, CandidateSubmission, Category};
use super::eligibility::{EligibilityEvaluator, EligibilityReport};
use super::intake::{IntakeError, IntakeGuard};
use super::percentile::{classify, RankStanding};
use super::preferences::{PreferenceChoice, PreferenceError, PreferenceList};
use super::requirements::SubjectRequirementResolver;
use crate::config::CounsellingConfig;

/// Eligibility picture for one candidate against one catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub catalog_version: u64,
    pub profile: CandidateProfile,
    pub eligibility: EligibilityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing: Option<RankStanding>,
}

/// Allotment simulation input: rank, category and choices in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllotmentRequest {
    pub rank: u32,
    pub category: Category,
    pub preferences: Vec<PreferenceChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ServiceLimits {
    max_preferences: usize,
    candidate_pool: u32,
    batch_workers: usize,
}

/// Service composing intake, eligibility, allotment and the catalog store.
pub struct CounsellingService<A> {
    guard: IntakeGuard,
    evaluator: Arc<EligibilityEvaluator>,
    simulator: Arc<SeatAllocationSimulator<A>>,
    catalog: Arc<CatalogStore>,
    limits: ServiceLimits,
}

impl<A> CounsellingService<A>
where
    A: SeatAvailability + 'static,
{
    pub fn new(catalog: Arc<CatalogStore>, availability: A, config: &CounsellingConfig) -> Self {
        let evaluator = EligibilityEvaluator::new(
            config.eligibility.clone(),
            SubjectRequirementResolver::standard(),
        );

        Self {
            guard: IntakeGuard::new(),
            evaluator: Arc::new(evaluator),
            simulator: Arc::new(SeatAllocationSimulator::new(availability)),
            catalog,
            limits: ServiceLimits {
                max_preferences: config.max_preferences.max(1),
                candidate_pool: config.candidate_pool,
                batch_workers: config.batch_workers.max(1),
            },
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Validate a submission and evaluate it against the current catalog snapshot.
    pub fn assess(
        &self,
        submission: &CandidateSubmission,
    ) -> Result<Assessment, CounsellingError> {
        let snapshot = self.catalog.snapshot();
        self.assess_against(&snapshot, submission)
    }

    fn assess_against(
        &self,
        snapshot: &CatalogSnapshot,
        submission: &CandidateSubmission,
    ) -> Result<Assessment, CounsellingError> {
        let profile = self.guard.profile_from_submission(submission)?;
        let eligibility = self.evaluator.evaluate(&profile, &snapshot.catalog);
        let standing = submission
            .rank
            .map(|rank| classify(rank, self.limits.candidate_pool));

        debug!(
            catalog_version = snapshot.version,
            surfaced = eligibility.results().count(),
            "candidate assessed"
        );

        Ok(Assessment {
            catalog_version: snapshot.version,
            profile,
            eligibility,
            standing,
        })
    }

    /// Build a preference list from the request and run a single allotment round.
    pub fn allot(&self, request: &AllotmentRequest) -> Result<AllotmentResult, CounsellingError> {
        if request.rank == 0 {
            return Err(IntakeError::InvalidRank.into());
        }

        let snapshot = self.catalog.snapshot();
        if let Some(unknown) = request.preferences.iter().find(|choice| {
            snapshot
                .catalog
                .program(&choice.institution_id, &choice.program_id)
                .is_none()
        }) {
            return Err(PreferenceError::UnknownProgram {
                institution_id: unknown.institution_id.clone(),
                program_id: unknown.program_id.clone(),
            }
            .into());
        }

        let preferences = PreferenceList::from_choices(
            request.preferences.iter().cloned(),
            self.limits.max_preferences,
        )?;
        let result = self.simulator.allocate(
            request.rank,
            request.category,
            &preferences,
            &snapshot.catalog,
        );

        info!(
            catalog_version = snapshot.version,
            rank = request.rank,
            category = %request.category,
            preferences = preferences.len(),
            status = result.status.label(),
            "allotment simulated"
        );

        Ok(result)
    }

    /// Percentile and tier for `rank` within the configured candidate pool.
    pub fn standing(&self, rank: u32) -> Result<RankStanding, CounsellingError> {
        if rank == 0 {
            return Err(IntakeError::InvalidRank.into());
        }
        Ok(classify(rank, self.limits.candidate_pool))
    }

    /// Assess many candidates concurrently against a single catalog snapshot.
    ///
    /// Work runs on blocking workers, at most `batch_workers` at a time. Results
    /// come back in submission order.
    pub async fn assess_batch(
        self: Arc<Self>,
        submissions: Vec<CandidateSubmission>,
    ) -> Vec<Result<Assessment, CounsellingError>> {
        let snapshot = self.catalog.snapshot();
        let permits = Arc::new(Semaphore::new(self.limits.batch_workers));
        let total = submissions.len();

        let mut handles = Vec::with_capacity(total);
        for submission in submissions {
            let service = Arc::clone(&self);
            let snapshot = Arc::clone(&snapshot);
            let permits = Arc::clone(&permits);

            handles.push(tokio::spawn(assess_with_permit(
                service, snapshot, permits, submission,
            )));
        }

        let mut results = Vec::with_capacity(total);
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(error) => Err(CounsellingError::Worker(error.to_string())),
            };
            results.push(result);
        }

        info!(
            catalog_version = snapshot.version,
            candidates = total,
            failed = results.iter().filter(|result| result.is_err()).count(),
            "batch assessment finished"
        );

        results
    }
}

async fn assess_with_permit<A>(
    service: Arc<CounsellingService<A>>,
    snapshot: Arc<CatalogSnapshot>,
    permits: Arc<Semaphore>,
    submission: CandidateSubmission,
) -> Result<Assessment, CounsellingError>
where
    A: SeatAvailability + 'static,
{
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|error| CounsellingError::Worker(error.to_string()))?;

    tokio::task::spawn_blocking(move || service.assess_against(&snapshot, &submission))
        .await
        .map_err(|error| CounsellingError::Worker(error.to_string()))?
}

/// Error raised by the counselling service.
#[derive(Debug, thiserror::Error)]
pub enum CounsellingError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Preference(#[from] PreferenceError),
    #[error("batch worker failed: {0}")]
    Worker(String),
}
