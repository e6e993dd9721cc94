//! Merit-based admission counselling: composite scores, program eligibility,
//! preference lists, single-round seat allotment and rank standing.

pub mod allocation;
pub mod catalog;
pub mod domain;
pub(crate) mod eligibility;
pub mod intake;
pub mod merit;
pub mod percentile;
pub mod preferences;
pub mod requirements;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocation::{
    AllotmentResult, AllotmentStatus, FixedAvailability, ProbabilisticAvailability,
    SeatAllocationSimulator, SeatAvailability, SeatDraw,
};
pub use catalog::{
    Catalog, CatalogError, CatalogSnapshot, CatalogStore, Institution, Program, ProgramCutoffs,
    SeatAllotment,
};
pub use domain::{
    CandidateProfile, CandidateSubmission, Category, CompositeKind, CompositeScores,
    InstitutionId, ProgramId, Stream, Subject, SubjectMarks,
};
pub use eligibility::{
    ChanceLevel, EligibilityConfig, EligibilityEvaluator, EligibilityReport, EligibilityResult,
    EligibilityStatus, InstitutionEligibility,
};
pub use intake::{IntakeError, IntakeGuard};
pub use merit::{composite_scores, compute_composite};
pub use percentile::{classify, RankStanding, RankTier};
pub use preferences::{PreferenceChoice, PreferenceEntry, PreferenceError, PreferenceList};
pub use requirements::{ProgramRequirement, SubjectRequirementResolver};
pub use router::counselling_router;
pub use service::{AllotmentRequest, Assessment, CounsellingError, CounsellingService};
