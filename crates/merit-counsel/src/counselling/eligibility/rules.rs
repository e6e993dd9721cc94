use super::config::EligibilityConfig;
use crate::counselling::catalog::Program;
use crate::counselling::domain::{CandidateProfile, CompositeKind};
use crate::counselling::requirements::ProgramRequirement;

/// Outcome of comparing a candidate's composite against a program cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CutoffSignal {
    /// The program ranks by no composite; only the subject check applies.
    NotApplicable,
    /// The program needs a composite the candidate's marks cannot produce.
    ScoreUnavailable { kind: CompositeKind },
    Scored {
        kind: CompositeKind,
        your_score: f64,
        required_score: f64,
    },
}

/// One reason per required subject that is absent or below the pass mark.
pub(crate) fn check_subjects(
    profile: &CandidateProfile,
    requirement: &ProgramRequirement,
    config: &EligibilityConfig,
) -> Vec<String> {
    requirement
        .required_subjects
        .iter()
        .filter_map(|subject| match profile.marks.get(*subject) {
            None => Some(format!("{subject} mark missing")),
            Some(mark) if mark < config.minimum_pass_mark => Some(format!(
                "{subject} mark {mark} below pass mark {}",
                config.minimum_pass_mark
            )),
            Some(_) => None,
        })
        .collect()
}

pub(crate) fn check_cutoff(
    profile: &CandidateProfile,
    program: &Program,
    requirement: &ProgramRequirement,
) -> CutoffSignal {
    let Some(kind) = requirement.composite else {
        return CutoffSignal::NotApplicable;
    };

    match profile.composite_scores.get(kind) {
        Some(your_score) => CutoffSignal::Scored {
            kind,
            your_score,
            required_score: program.required_score(kind, profile.category),
        },
        None => CutoffSignal::ScoreUnavailable { kind },
    }
}
