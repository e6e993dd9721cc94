use std::sync::Arc;

use super::common::*;
use crate::counselling::allocation::{AllotmentStatus, FixedAvailability};
use crate::counselling::catalog::{Catalog, Institution, Program};
use crate::counselling::domain::{InstitutionId, ProgramId, Subject};
use crate::counselling::intake::IntakeError;
use crate::counselling::percentile::RankTier;
use crate::counselling::preferences::{PreferenceChoice, PreferenceError};
use crate::counselling::{AllotmentRequest, Category, CounsellingError};

fn request(rank: u32, choices: &[(&str, &str)]) -> AllotmentRequest {
    AllotmentRequest {
        rank,
        category: Category::Oc,
        preferences: choices
            .iter()
            .map(|(institution, program)| PreferenceChoice::new(institution, program))
            .collect(),
    }
}

#[test]
fn assess_attaches_standing_when_rank_supplied() {
    let service = build_service(FixedAvailability(true));
    let mut submission = engineering_submission();
    submission.rank = Some(300);

    let assessment = service.assess(&submission).expect("assessment succeeds");

    assert_eq!(assessment.catalog_version, 1);
    assert_eq!(assessment.profile.composite_scores.engineering, Some(167.5));
    let standing = assessment.standing.expect("standing present");
    assert_eq!(standing.percentile, 99.85);
    assert_eq!(standing.tier, RankTier::Tier1);
}

#[test]
fn assess_rejects_out_of_range_marks() {
    let service = build_service(FixedAvailability(true));
    let mut submission = engineering_submission();
    submission.marks = submission.marks.with(Subject::English, 140);

    match service.assess(&submission) {
        Err(CounsellingError::Intake(IntakeError::InvalidMark { subject, mark })) => {
            assert_eq!(subject, Subject::English);
            assert_eq!(mark, 140);
        }
        other => panic!("expected invalid mark, got {other:?}"),
    }
}

#[test]
fn allot_runs_a_single_round() {
    let service = build_service(FixedAvailability(true));

    let result = service
        .allot(&request(100, &[("CEG", "CSE"), ("PSG", "CSE")]))
        .expect("allotment runs");

    assert_eq!(result.status, AllotmentStatus::Allotted);
    assert_eq!(result.institution_id, Some(InstitutionId::from("CEG")));
}

#[test]
fn allot_rejects_unknown_programs_and_duplicates() {
    let service = build_service(FixedAvailability(true));

    match service.allot(&request(100, &[("CEG", "CIVIL")])) {
        Err(CounsellingError::Preference(PreferenceError::UnknownProgram {
            institution_id,
            program_id,
        })) => {
            assert_eq!(institution_id, InstitutionId::from("CEG"));
            assert_eq!(program_id, ProgramId::from("CIVIL"));
        }
        other => panic!("expected unknown program, got {other:?}"),
    }

    assert!(matches!(
        service.allot(&request(100, &[("CEG", "CSE"), ("CEG", "CSE")])),
        Err(CounsellingError::Preference(PreferenceError::DuplicateEntry { .. }))
    ));
}

#[test]
fn allot_rejects_lists_over_configured_limit() {
    let catalog = Catalog::new(vec![Institution::new(
        "BIG",
        "Many Programs University",
        (0..20)
            .map(|index| Program::new(&format!("P{index}"), &format!("Program {index}")))
            .collect(),
    )])
    .expect("valid catalog");
    let service = crate::counselling::CounsellingService::new(
        Arc::new(crate::counselling::CatalogStore::new(catalog)),
        FixedAvailability(true),
        &config(),
    );

    let choices: Vec<(String, String)> = (0..16)
        .map(|index| ("BIG".to_string(), format!("P{index}")))
        .collect();
    let borrowed: Vec<(&str, &str)> = choices
        .iter()
        .map(|(institution, program)| (institution.as_str(), program.as_str()))
        .collect();

    assert!(matches!(
        service.allot(&request(10, &borrowed)),
        Err(CounsellingError::Preference(PreferenceError::CapacityExceeded { limit: 15 }))
    ));
}

#[test]
fn standing_rejects_rank_zero() {
    let service = build_service(FixedAvailability(true));
    assert!(matches!(
        service.standing(0),
        Err(CounsellingError::Intake(IntakeError::InvalidRank))
    ));
    let standing = service.standing(250_000).expect("rank beyond pool");
    assert_eq!(standing.percentile, 0.0);
    assert_eq!(standing.tier, RankTier::Tier5);
}

#[test]
fn reload_is_visible_to_later_assessments_only() {
    let service = build_service(FixedAvailability(true));
    let before = service
        .assess(&engineering_submission())
        .expect("first assessment");

    service.catalog().replace(
        Catalog::new(vec![Institution::new(
            "PRC",
            "Presidency College",
            vec![Program::new("PHY", "B.Sc Physics")],
        )])
        .expect("valid catalog"),
    );
    let after = service
        .assess(&engineering_submission())
        .expect("second assessment");

    assert_eq!(before.catalog_version, 1);
    assert!(before.eligibility.institutions.len() > 1);
    assert_eq!(after.catalog_version, 2);
    assert_eq!(after.eligibility.institutions.len(), 1);
}

#[tokio::test]
async fn batch_preserves_order_and_isolates_failures() {
    let service = build_service(FixedAvailability(true));
    let mut invalid = engineering_submission();
    invalid.rank = Some(0);

    let outcomes = Arc::clone(&service)
        .assess_batch(vec![
            engineering_submission(),
            invalid,
            commerce_submission(),
        ])
        .await;

    assert_eq!(outcomes.len(), 3);
    let first = outcomes[0].as_ref().expect("first succeeds");
    assert_eq!(first.profile.category, Category::Oc);
    assert!(matches!(
        outcomes[1],
        Err(CounsellingError::Intake(IntakeError::InvalidRank))
    ));
    let third = outcomes[2].as_ref().expect("third succeeds");
    assert_eq!(third.profile.category, Category::Mbc);
    assert!(outcomes
        .iter()
        .flatten()
        .all(|assessment| assessment.catalog_version == 1));
}

#[test]
fn configured_pass_mark_reaches_the_evaluator() {
    let mut submission = engineering_submission();
    submission.marks = pcm_marks(80, 38, 85);

    let lenient = build_service(FixedAvailability(true))
        .assess(&submission)
        .expect("default pass mark");
    assert!(lenient
        .eligibility
        .results()
        .all(|result| result.reasons.iter().all(|reason| !reason.contains("pass mark"))));

    let mut strict_config = config();
    strict_config.eligibility.minimum_pass_mark = 40;
    let strict = crate::counselling::CounsellingService::new(
        Arc::new(crate::counselling::CatalogStore::new(scenario_catalog())),
        FixedAvailability(true),
        &strict_config,
    );
    let assessment = strict.assess(&submission).expect("strict pass mark");
    let psg = assessment
        .eligibility
        .find(&InstitutionId::from("PSG"), &ProgramId::from("CSE"))
        .expect("single failure surfaced");
    assert_eq!(
        psg.reasons,
        vec!["physics mark 38 below pass mark 40".to_string()]
    );
}
