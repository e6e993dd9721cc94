mod config;
mod policy;
mod rules;

pub use config::EligibilityConfig;
pub use policy::{ChanceLevel, EligibilityStatus};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::Catalog;
use super::domain::{CandidateProfile, InstitutionId, ProgramId};
use super::requirements::SubjectRequirementResolver;
use policy::{decide, is_surfaced, rank_institutions};

/// Stateless evaluator classifying a profile against every program in a catalog.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    config: EligibilityConfig,
    resolver: SubjectRequirementResolver,
}

impl EligibilityEvaluator {
    pub fn new(config: EligibilityConfig, resolver: SubjectRequirementResolver) -> Self {
        Self { config, resolver }
    }

    /// Evaluate every (institution, program) pair, drop hopeless results, and
    /// return them grouped by institution with the strongest institutions first.
    pub fn evaluate(&self, profile: &CandidateProfile, catalog: &Catalog) -> EligibilityReport {
        let mut institutions = Vec::with_capacity(catalog.institutions().len());
        let mut hidden = 0usize;

        for institution in catalog.institutions() {
            let mut results = Vec::with_capacity(institution.programs.len());

            for program in &institution.programs {
                let requirement = self.resolver.resolve(&program.name);
                let subject_reasons = rules::check_subjects(profile, &requirement, &self.config);
                let signal = rules::check_cutoff(profile, program, &requirement);
                let decision = decide(subject_reasons, signal, profile.category, &self.config);

                let result = EligibilityResult {
                    institution_id: institution.id.clone(),
                    program_id: program.id.clone(),
                    program_name: program.name.clone(),
                    status: decision.status,
                    chance_level: decision.chance_level,
                    your_score: decision.your_score,
                    required_score: decision.required_score,
                    reasons: decision.reasons,
                };

                if is_surfaced(&result) {
                    results.push(result);
                } else {
                    hidden += 1;
                }
            }

            if !results.is_empty() {
                institutions.push(InstitutionEligibility {
                    institution_id: institution.id.clone(),
                    institution_name: institution.name.clone(),
                    results,
                });
            }
        }

        rank_institutions(&mut institutions);

        debug!(
            category = %profile.category,
            institutions = institutions.len(),
            hidden,
            "eligibility evaluated"
        );

        EligibilityReport { institutions }
    }
}

/// Classification of one program for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub institution_id: InstitutionId,
    pub program_id: ProgramId,
    pub program_name: String,
    pub status: EligibilityStatus,
    pub chance_level: ChanceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_score: Option<f64>,
    pub reasons: Vec<String>,
}

/// Results for one institution, best chance first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionEligibility {
    pub institution_id: InstitutionId,
    pub institution_name: String,
    pub results: Vec<EligibilityResult>,
}

impl InstitutionEligibility {
    pub fn high_chance_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.chance_level == ChanceLevel::High)
            .count()
    }
}

/// Grouped, ordered eligibility output for a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub institutions: Vec<InstitutionEligibility>,
}

impl EligibilityReport {
    /// All surfaced results in display order.
    pub fn results(&self) -> impl Iterator<Item = &EligibilityResult> + '_ {
        self.institutions
            .iter()
            .flat_map(|institution| institution.results.iter())
    }

    pub fn find(
        &self,
        institution_id: &InstitutionId,
        program_id: &ProgramId,
    ) -> Option<&EligibilityResult> {
        self.results().find(|result| {
            &result.institution_id == institution_id && &result.program_id == program_id
        })
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }
}
