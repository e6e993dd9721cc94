use crate::infra::{build_service, parse_choice, parse_stream};
use clap::Args;
use merit_counsel::config::{AppConfig, CounsellingConfig};
use merit_counsel::counselling::{
    AllotmentRequest, AllotmentResult, Assessment, CandidateSubmission, Catalog,
    CatalogStore, Category, CounsellingService, EligibilityResult, FixedAvailability,
    Institution, InstitutionId, PreferenceChoice, Program, ProgramCutoffs, ProgramId,
    RankStanding, SeatAllotment, Stream, Subject, SubjectMarks,
};
use merit_counsel::error::AppError;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    #[arg(long)]
    pub(crate) maths: Option<u8>,
    #[arg(long)]
    pub(crate) physics: Option<u8>,
    #[arg(long)]
    pub(crate) chemistry: Option<u8>,
    #[arg(long)]
    pub(crate) biology: Option<u8>,
    #[arg(long)]
    pub(crate) computer_science: Option<u8>,
    #[arg(long)]
    pub(crate) accountancy: Option<u8>,
    #[arg(long)]
    pub(crate) commerce: Option<u8>,
    #[arg(long)]
    pub(crate) economics: Option<u8>,
    #[arg(long)]
    pub(crate) english: Option<u8>,
    /// Reservation category code (OC, BC, BCM, MBC, DNC, SC, SCA, ST)
    #[arg(long)]
    pub(crate) category: Category,
    /// Higher-secondary stream (science, commerce, arts)
    #[arg(long, value_parser = parse_stream, default_value = "science")]
    pub(crate) stream: Stream,
    /// Merit rank, if known, to include percentile standing
    #[arg(long)]
    pub(crate) rank: Option<u32>,
    /// Catalog CSV (defaults to COUNSEL_CATALOG_PATH or the built-in sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn submission(&self) -> CandidateSubmission {
        let marks = [
            (Subject::Maths, self.maths),
            (Subject::Physics, self.physics),
            (Subject::Chemistry, self.chemistry),
            (Subject::Biology, self.biology),
            (Subject::ComputerScience, self.computer_science),
            (Subject::Accountancy, self.accountancy),
            (Subject::Commerce, self.commerce),
            (Subject::Economics, self.economics),
            (Subject::English, self.english),
        ]
        .into_iter()
        .filter_map(|(subject, mark)| mark.map(|mark| (subject, mark)))
        .collect::<SubjectMarks>();

        CandidateSubmission {
            marks,
            category: self.category,
            stream: self.stream,
            rank: self.rank,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct AllotArgs {
    /// Merit rank (1 is best)
    #[arg(long)]
    pub(crate) rank: u32,
    /// Reservation category code
    #[arg(long)]
    pub(crate) category: Category,
    /// Preference in priority order as INSTITUTION:PROGRAM; repeat for more
    #[arg(long = "choice", value_parser = parse_choice)]
    pub(crate) choices: Vec<PreferenceChoice>,
    /// Seed the seat availability draw for a reproducible run
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Catalog CSV (defaults to COUNSEL_CATALOG_PATH or the built-in sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StandingArgs {
    /// Merit rank (1 is best)
    pub(crate) rank: u32,
    /// Candidate pool size (defaults to COUNSEL_CANDIDATE_POOL)
    #[arg(long)]
    pub(crate) pool: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the sample-catalog allotment walk
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn counselling_config(catalog: Option<PathBuf>) -> Result<CounsellingConfig, AppError> {
    let mut config = AppConfig::load()?.counselling;
    if catalog.is_some() {
        config.catalog_path = catalog;
    }
    Ok(config)
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = counselling_config(args.catalog.clone())?;
    let service = build_service(&config)?;
    let assessment = service.assess(&args.submission())?;

    if args.json {
        print_json(&assessment);
    } else {
        render_assessment(&assessment);
    }
    Ok(())
}

pub(crate) fn run_allot(args: AllotArgs) -> Result<(), AppError> {
    let mut config = counselling_config(args.catalog)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let service = build_service(&config)?;
    let result = service.allot(&AllotmentRequest {
        rank: args.rank,
        category: args.category,
        preferences: args.choices,
    })?;

    if args.json {
        print_json(&result);
    } else {
        render_allotment(&result);
    }
    Ok(())
}

pub(crate) fn run_standing(args: StandingArgs) -> Result<(), AppError> {
    let config = counselling_config(None)?;
    render_standing(&standing(args.rank, args.pool, config)?);
    Ok(())
}

fn standing(
    rank: u32,
    pool: Option<u32>,
    config: CounsellingConfig,
) -> Result<RankStanding, AppError> {
    let config = CounsellingConfig {
        candidate_pool: pool.unwrap_or(config.candidate_pool),
        ..config
    };
    let service = CounsellingService::new(
        Arc::new(CatalogStore::new(Catalog::default())),
        FixedAvailability(false),
        &config,
    );
    Ok(service.standing(rank)?)
}

/// Engineering candidate from the reference walkthrough: 80 / 90 / 85.
fn reference_submission() -> CandidateSubmission {
    CandidateSubmission {
        marks: SubjectMarks::new()
            .with(Subject::Maths, 80)
            .with(Subject::Physics, 90)
            .with(Subject::Chemistry, 85),
        category: Category::Oc,
        stream: Stream::Science,
        rank: None,
    }
}

fn reference_catalog() -> Result<Catalog, AppError> {
    Ok(Catalog::new(vec![Institution::new(
        "CEG",
        "College of Engineering, Guindy",
        vec![
            Program::new("CSE", "Computer Science and Engineering")
                .with_cutoffs(ProgramCutoffs::new().with(Category::Oc, 150.0))
                .with_seats(SeatAllotment::new(120).with_cutoff(Category::Oc, 150)),
            Program::new("ECE", "Electronics and Communication Engineering")
                .with_cutoffs(ProgramCutoffs::new().with(Category::Oc, 175.0))
                .with_seats(SeatAllotment::new(90).with_cutoff(Category::Oc, 600)),
        ],
    )])?)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = CounsellingConfig {
        seed: Some(args.seed.unwrap_or(2024)),
        ..CounsellingConfig::default()
    };

    println!("Merit counselling demo");

    let reference = CounsellingService::new(
        Arc::new(CatalogStore::new(reference_catalog()?)),
        FixedAvailability(true),
        &config,
    );
    let assessment = reference.assess(&reference_submission())?;
    let engineering = assessment
        .profile
        .composite_scores
        .engineering
        .unwrap_or_default();
    println!("\nCandidate: maths 80, physics 90, chemistry 85 (OC)");
    println!("- engineering composite {engineering}");

    println!("\nScenario A: cutoff 150");
    let ceg = InstitutionId::from("CEG");
    if let Some(result) = assessment.eligibility.find(&ceg, &ProgramId::from("CSE")) {
        render_result(result);
    }
    println!("\nScenario B: cutoff 175");
    if let Some(result) = assessment.eligibility.find(&ceg, &ProgramId::from("ECE")) {
        render_result(result);
    }

    let only_cse = vec![PreferenceChoice::new("CEG", "CSE")];
    println!("\nScenario C: rank 300, preferences [CEG:CSE closing rank 150]");
    render_allotment(&reference.allot(&AllotmentRequest {
        rank: 300,
        category: Category::Oc,
        preferences: only_cse.clone(),
    })?);
    println!("\nScenario D: rank 100, preferences [CEG:CSE closing rank 150], seat available");
    render_allotment(&reference.allot(&AllotmentRequest {
        rank: 100,
        category: Category::Oc,
        preferences: only_cse,
    })?);

    println!("\nSample catalog walk (seed {})", config.seed.unwrap_or_default());
    let sample = build_service(&config)?;
    let candidate = CandidateSubmission {
        marks: SubjectMarks::new()
            .with(Subject::Maths, 98)
            .with(Subject::Physics, 96)
            .with(Subject::Chemistry, 97)
            .with(Subject::Biology, 94)
            .with(Subject::English, 88),
        category: Category::Bc,
        stream: Stream::Science,
        rank: Some(1_450),
    };
    render_assessment(&sample.assess(&candidate)?);
    render_allotment(&sample.allot(&AllotmentRequest {
        rank: 1_450,
        category: Category::Bc,
        preferences: vec![
            PreferenceChoice::new("CEG", "CSE"),
            PreferenceChoice::new("PSG", "CSE"),
            PreferenceChoice::new("MIT", "IT"),
        ],
    })?);

    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(body) => println!("{body}"),
        Err(err) => eprintln!("failed to render json: {err}"),
    }
}

fn render_assessment(assessment: &Assessment) {
    let scores = &assessment.profile.composite_scores;
    println!(
        "Catalog v{} | total marks {} | engineering {} | medical {}",
        assessment.catalog_version,
        assessment.profile.total_marks,
        scores
            .engineering
            .map_or_else(|| "n/a".to_string(), |score| score.to_string()),
        scores
            .medical
            .map_or_else(|| "n/a".to_string(), |score| score.to_string()),
    );
    if let Some(standing) = &assessment.standing {
        render_standing(standing);
    }

    if assessment.eligibility.is_empty() {
        println!("No programs to show for these marks.");
        return;
    }
    for institution in &assessment.eligibility.institutions {
        println!(
            "{} ({}) | {} high-chance program(s)",
            institution.institution_name,
            institution.institution_id,
            institution.high_chance_count()
        );
        for result in &institution.results {
            render_result(result);
        }
    }
}

fn render_result(result: &EligibilityResult) {
    let scores = match (result.your_score, result.required_score) {
        (Some(yours), Some(required)) => format!(" | {yours} vs cutoff {required}"),
        _ => String::new(),
    };
    println!(
        "  - {} [{}]: {} ({:?} chance){}",
        result.program_name,
        result.program_id,
        result.status.label(),
        result.chance_level,
        scores
    );
    for reason in &result.reasons {
        println!("      {reason}");
    }
}

fn render_allotment(result: &AllotmentResult) {
    println!("- {} (round {})", result.status.label(), result.round_number);
    println!("  {}", result.message);
}

fn render_standing(standing: &RankStanding) {
    println!(
        "Rank {} of {}: {:.2} percentile | {} ({})",
        standing.rank, standing.pool_size, standing.percentile, standing.label, standing.description
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use merit_counsel::counselling::{AllotmentStatus, ChanceLevel, EligibilityStatus};

    fn reference_service() -> CounsellingService<FixedAvailability> {
        CounsellingService::new(
            Arc::new(CatalogStore::new(reference_catalog().expect("valid catalog"))),
            FixedAvailability(true),
            &CounsellingConfig::default(),
        )
    }

    #[test]
    fn reference_scenarios_hold() {
        let service = reference_service();
        let assessment = service
            .assess(&reference_submission())
            .expect("assessment succeeds");

        let cse = assessment
            .eligibility
            .find(&InstitutionId::from("CEG"), &ProgramId::from("CSE"))
            .expect("CSE listed");
        assert_eq!(cse.status, EligibilityStatus::Eligible);
        assert_eq!(cse.chance_level, ChanceLevel::High);

        let ece = assessment
            .eligibility
            .find(&InstitutionId::from("CEG"), &ProgramId::from("ECE"))
            .expect("ECE listed");
        assert_eq!(ece.status, EligibilityStatus::Borderline);

        let request = |rank| AllotmentRequest {
            rank,
            category: Category::Oc,
            preferences: vec![PreferenceChoice::new("CEG", "CSE")],
        };
        assert_eq!(
            service.allot(&request(300)).expect("runs").status,
            AllotmentStatus::NotAllotted
        );
        assert_eq!(
            service.allot(&request(100)).expect("runs").status,
            AllotmentStatus::Allotted
        );
    }

    #[test]
    fn assess_args_keep_only_supplied_marks() {
        let args = AssessArgs {
            maths: Some(91),
            physics: Some(84),
            chemistry: None,
            biology: None,
            computer_science: None,
            accountancy: None,
            commerce: None,
            economics: None,
            english: Some(77),
            category: Category::Sc,
            stream: Stream::Science,
            rank: Some(5_000),
            catalog: None,
            json: false,
        };

        let submission = args.submission();
        assert_eq!(submission.marks.get(Subject::Maths), Some(91));
        assert_eq!(submission.marks.get(Subject::Chemistry), None);
        assert_eq!(submission.marks.total(), 252);
        assert_eq!(submission.rank, Some(5_000));
    }

    #[test]
    fn standing_uses_requested_pool() {
        let result = standing(500, Some(1_000), CounsellingConfig::default()).expect("valid rank");
        assert_eq!(result.percentile, 50.0);
        assert_eq!(result.pool_size, 1_000);

        assert!(matches!(
            standing(0, None, CounsellingConfig::default()),
            Err(AppError::Counselling(_))
        ));
    }
}
