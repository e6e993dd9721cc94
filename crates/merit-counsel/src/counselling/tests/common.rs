use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::CounsellingConfig;
use crate::counselling::allocation::{SeatAvailability, SeatDraw};
use crate::counselling::catalog::{
    Catalog, CatalogStore, Institution, Program, ProgramCutoffs, SeatAllotment,
};
use crate::counselling::domain::{
    CandidateSubmission, Category, InstitutionId, ProgramId, Stream, Subject, SubjectMarks,
};
use crate::counselling::preferences::PreferenceList;
use crate::counselling::{counselling_router, CounsellingService, PreferenceChoice};

pub(super) fn pcm_marks(maths: u8, physics: u8, chemistry: u8) -> SubjectMarks {
    SubjectMarks::new()
        .with(Subject::Maths, maths)
        .with(Subject::Physics, physics)
        .with(Subject::Chemistry, chemistry)
}

/// Maths 80, physics 90, chemistry 85: engineering composite 167.5.
pub(super) fn engineering_submission() -> CandidateSubmission {
    CandidateSubmission {
        marks: pcm_marks(80, 90, 85),
        category: Category::Oc,
        stream: Stream::Science,
        rank: None,
    }
}

pub(super) fn commerce_submission() -> CandidateSubmission {
    CandidateSubmission {
        marks: SubjectMarks::new()
            .with(Subject::Accountancy, 78)
            .with(Subject::Commerce, 81)
            .with(Subject::Economics, 74),
        category: Category::Mbc,
        stream: Stream::Commerce,
        rank: None,
    }
}

/// CEG admits OC ranks up to 150 for CSE; PSG and MIT admit far deeper.
pub(super) fn scenario_catalog() -> Catalog {
    Catalog::new(vec![
        Institution::new(
            "CEG",
            "College of Engineering, Guindy",
            vec![
                Program::new("CSE", "Computer Science and Engineering")
                    .with_cutoffs(ProgramCutoffs::new().with(Category::Oc, 150.0))
                    .with_seats(
                        SeatAllotment::new(120)
                            .with_cutoff(Category::Oc, 150)
                            .with_cutoff(Category::Bc, 420),
                    ),
                Program::new("ECE", "Electronics and Communication Engineering")
                    .with_cutoffs(ProgramCutoffs::new().with(Category::Oc, 175.0))
                    .with_seats(SeatAllotment::new(90).with_cutoff(Category::Oc, 600)),
            ],
        ),
        Institution::new(
            "PSG",
            "PSG College of Technology",
            vec![
                Program::new("CSE", "Computer Science and Engineering")
                    .with_cutoffs(ProgramCutoffs::new().with(Category::Oc, 140.0))
                    .with_seats(SeatAllotment::new(180).with_cutoff(Category::Oc, 700)),
                Program::new("RAE", "Robotics and Automation Engineering")
                    .with_cutoffs(ProgramCutoffs::new().with(Category::Oc, 155.0))
                    .with_seats(SeatAllotment::new(0).with_cutoff(Category::Oc, 2600)),
            ],
        ),
        Institution::new(
            "LOY",
            "Loyola College",
            vec![
                Program::new("BCOM", "B.Com (General)"),
                Program::new("ZOO", "B.Sc Zoology"),
            ],
        ),
    ])
    .expect("scenario catalog is well formed")
}

pub(super) fn preferences(choices: &[(&str, &str)]) -> PreferenceList {
    PreferenceList::from_choices(
        choices
            .iter()
            .map(|(institution, program)| PreferenceChoice::new(institution, program)),
        15,
    )
    .expect("fixture preferences are valid")
}

pub(super) fn config() -> CounsellingConfig {
    CounsellingConfig {
        seed: Some(7),
        batch_workers: 2,
        ..CounsellingConfig::default()
    }
}

pub(super) fn build_service<A>(availability: A) -> Arc<CounsellingService<A>>
where
    A: SeatAvailability + 'static,
{
    Arc::new(CounsellingService::new(
        Arc::new(CatalogStore::new(scenario_catalog())),
        availability,
        &config(),
    ))
}

pub(super) fn router_with_service<A>(service: Arc<CounsellingService<A>>) -> axum::Router
where
    A: SeatAvailability + 'static,
{
    counselling_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}

/// Availability answering per program and recording every draw it is asked for.
#[derive(Default)]
pub(super) struct ScriptedAvailability {
    answers: HashMap<(InstitutionId, ProgramId), bool>,
    draws: Mutex<Vec<(InstitutionId, ProgramId)>>,
}

impl ScriptedAvailability {
    pub(super) fn with(mut self, institution: &str, program: &str, available: bool) -> Self {
        self.answers.insert(
            (InstitutionId::from(institution), ProgramId::from(program)),
            available,
        );
        self
    }

    pub(super) fn draws(&self) -> Vec<(InstitutionId, ProgramId)> {
        self.draws.lock().expect("draws mutex").clone()
    }
}

impl SeatAvailability for ScriptedAvailability {
    fn is_available(&self, draw: &SeatDraw<'_>) -> bool {
        let key = (
            draw.entry.institution_id.clone(),
            draw.entry.program_id.clone(),
        );
        self.draws.lock().expect("draws mutex").push(key.clone());
        self.answers.get(&key).copied().unwrap_or(false)
    }
}
