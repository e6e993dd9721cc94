//! End-to-end counselling flows through the public service facade and HTTP router.

mod common {
    use std::path::PathBuf;
    use std::sync::Arc;

    use merit_counsel::config::CounsellingConfig;
    use merit_counsel::counselling::{
        CandidateSubmission, Catalog, CatalogStore, Category, CounsellingService,
        SeatAvailability, Stream, Subject, SubjectMarks,
    };

    pub(super) fn catalog_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample_catalog.csv")
    }

    pub(super) fn csv_catalog() -> Catalog {
        Catalog::from_path(catalog_path()).expect("bundled catalog parses")
    }

    pub(super) fn submission(maths: u8, physics: u8, chemistry: u8) -> CandidateSubmission {
        CandidateSubmission {
            marks: SubjectMarks::new()
                .with(Subject::Maths, maths)
                .with(Subject::Physics, physics)
                .with(Subject::Chemistry, chemistry),
            category: Category::Oc,
            stream: Stream::Science,
            rank: None,
        }
    }

    pub(super) fn service<A>(availability: A) -> Arc<CounsellingService<A>>
    where
        A: SeatAvailability + 'static,
    {
        Arc::new(CounsellingService::new(
            Arc::new(CatalogStore::new(csv_catalog())),
            availability,
            &CounsellingConfig::default(),
        ))
    }
}

use axum::http::{header, Request, StatusCode};
use merit_counsel::counselling::{
    counselling_router, AllotmentRequest, AllotmentStatus, Category, ChanceLevel,
    EligibilityStatus, FixedAvailability, InstitutionId, PreferenceChoice,
    ProbabilisticAvailability, ProgramId,
};
use serde_json::Value;
use tower::ServiceExt;

#[test]
fn topper_sees_every_engineering_seat_as_high_chance() {
    let service = common::service(FixedAvailability(true));

    let assessment = service
        .assess(&common::submission(100, 100, 100))
        .expect("assessment succeeds");

    let cse = assessment
        .eligibility
        .find(&InstitutionId::from("CEG"), &ProgramId::from("CSE"))
        .expect("CEG CSE listed");
    assert_eq!(cse.status, EligibilityStatus::Eligible);
    assert_eq!(cse.your_score, Some(200.0));
    assert_eq!(cse.required_score, Some(199.5));
    assert_eq!(cse.chance_level, ChanceLevel::Medium);

    let mech = assessment
        .eligibility
        .find(&InstitutionId::from("CEG"), &ProgramId::from("MECH"))
        .expect("CEG MECH listed");
    assert_eq!(mech.required_score, Some(180.0));
    assert_eq!(mech.chance_level, ChanceLevel::High);
}

#[test]
fn waitlist_on_first_choice_stops_the_round() {
    let service = common::service(FixedAvailability(false));

    let result = service
        .allot(&AllotmentRequest {
            rank: 400,
            category: Category::Oc,
            preferences: vec![
                PreferenceChoice::new("CEG", "ECE"),
                PreferenceChoice::new("PSG", "CSE"),
            ],
        })
        .expect("allotment runs");

    assert_eq!(result.status, AllotmentStatus::Waitlisted);
    assert_eq!(result.program_id, Some(ProgramId::from("ECE")));
    assert_eq!(result.round_number, 1);
}

#[test]
fn seeded_service_is_reproducible() {
    let request = AllotmentRequest {
        rank: 50,
        category: Category::Oc,
        preferences: vec![PreferenceChoice::new("MMC", "MBBS")],
    };
    let statuses = |seed: u64| -> Vec<AllotmentStatus> {
        let service = common::service(ProbabilisticAvailability::new(0.85, Some(seed)));
        (0..16)
            .map(|_| service.allot(&request).expect("allotment runs").status)
            .collect()
    };

    assert_eq!(statuses(11), statuses(11));
}

#[tokio::test]
async fn eligibility_endpoint_serves_csv_catalog() {
    let router = counselling_router(common::service(FixedAvailability(true)));
    let body = serde_json::to_vec(&common::submission(80, 90, 85)).expect("serializable");

    let response = router
        .oneshot(
            Request::post("/api/v1/counselling/eligibility")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(body))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let payload: Value = serde_json::from_slice(&bytes).expect("valid json");
    assert_eq!(payload["profile"]["composite_scores"]["engineering"], 167.5);
    let institutions = payload["eligibility"]["institutions"]
        .as_array()
        .expect("institution list");
    assert!(!institutions.is_empty());
}
