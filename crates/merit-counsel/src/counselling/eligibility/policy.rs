use serde::{Deserialize, Serialize};

use super::config::EligibilityConfig;
use super::rules::CutoffSignal;
use super::{EligibilityResult, InstitutionEligibility};
use crate::counselling::domain::Category;

/// Eligibility classification for a single program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    Borderline,
    NotEligible,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "eligible",
            EligibilityStatus::Borderline => "borderline",
            EligibilityStatus::NotEligible => "not_eligible",
        }
    }
}

/// Coarse admission chance. Ordered best first, so sorting ascending lists `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChanceLevel {
    High,
    Medium,
    Low,
}

pub(crate) struct Decision {
    pub status: EligibilityStatus,
    pub chance_level: ChanceLevel,
    pub your_score: Option<f64>,
    pub required_score: Option<f64>,
    pub reasons: Vec<String>,
}

impl Decision {
    fn without_scores(
        status: EligibilityStatus,
        chance_level: ChanceLevel,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            status,
            chance_level,
            your_score: None,
            required_score: None,
            reasons,
        }
    }
}

pub(crate) fn decide(
    subject_reasons: Vec<String>,
    signal: CutoffSignal,
    category: Category,
    config: &EligibilityConfig,
) -> Decision {
    if !subject_reasons.is_empty() {
        return Decision::without_scores(
            EligibilityStatus::NotEligible,
            ChanceLevel::Low,
            subject_reasons,
        );
    }

    match signal {
        CutoffSignal::NotApplicable => {
            Decision::without_scores(EligibilityStatus::Eligible, ChanceLevel::High, Vec::new())
        }
        CutoffSignal::ScoreUnavailable { kind } => Decision::without_scores(
            EligibilityStatus::NotEligible,
            ChanceLevel::Low,
            vec![format!(
                "{kind} composite cannot be computed from the submitted marks"
            )],
        ),
        CutoffSignal::Scored {
            kind,
            your_score,
            required_score,
        } => {
            let (status, chance_level, reasons) = if your_score >= required_score {
                let chance = if your_score - required_score >= config.high_chance_margin {
                    ChanceLevel::High
                } else {
                    ChanceLevel::Medium
                };
                (EligibilityStatus::Eligible, chance, Vec::new())
            } else if your_score >= required_score - config.borderline_band {
                (
                    EligibilityStatus::Borderline,
                    ChanceLevel::Low,
                    vec![format!(
                        "{your_score} below {required_score} ({kind} cutoff for {category})"
                    )],
                )
            } else {
                (
                    EligibilityStatus::NotEligible,
                    ChanceLevel::Low,
                    vec![format!(
                        "{your_score} below {required_score} by more than {} ({kind} cutoff for {category})",
                        config.borderline_band
                    )],
                )
            };

            Decision {
                status,
                chance_level,
                your_score: Some(your_score),
                required_score: Some(required_score),
                reasons,
            }
        }
    }
}

/// Hopeless results (ineligible for several reasons at once) are not shown to the candidate.
pub(crate) fn is_surfaced(result: &EligibilityResult) -> bool {
    !(result.status == EligibilityStatus::NotEligible && result.reasons.len() > 1)
}

/// Order programs best chance first, then institutions by how many high-chance
/// programs they hold. Both sorts are stable, so ties keep catalog order.
pub(crate) fn rank_institutions(institutions: &mut [InstitutionEligibility]) {
    for institution in institutions.iter_mut() {
        institution.results.sort_by_key(|result| result.chance_level);
    }
    institutions.sort_by_key(|institution| std::cmp::Reverse(institution.high_chance_count()));
}
