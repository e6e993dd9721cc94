use proptest::prelude::*;

use super::common::*;
use crate::counselling::allocation::{
    AllotmentStatus, FixedAvailability, ProbabilisticAvailability, SeatAllocationSimulator,
    ROUND_NUMBER,
};
use crate::counselling::domain::{Category, InstitutionId, ProgramId};

#[test]
fn first_admissible_preference_is_final_even_when_waitlisted() {
    let availability = ScriptedAvailability::default()
        .with("CEG", "CSE", false)
        .with("PSG", "CSE", true);
    let simulator = SeatAllocationSimulator::new(availability);
    let list = preferences(&[("CEG", "CSE"), ("PSG", "CSE")]);

    let result = simulator.allocate(100, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::Waitlisted);
    assert_eq!(result.institution_id, Some(InstitutionId::from("CEG")));
    assert_eq!(result.program_id, Some(ProgramId::from("CSE")));
    assert_eq!(
        simulator.availability().draws(),
        vec![(InstitutionId::from("CEG"), ProgramId::from("CSE"))]
    );
}

#[test]
fn exhausted_list_is_not_allotted_in_round_one() {
    let simulator = SeatAllocationSimulator::new(ScriptedAvailability::default());
    let list = preferences(&[("CEG", "CSE"), ("CEG", "ECE"), ("PSG", "CSE")]);

    let result = simulator.allocate(5_000, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::NotAllotted);
    assert_eq!(result.round_number, ROUND_NUMBER);
    assert_eq!(result.institution_id, None);
    assert!(simulator.availability().draws().is_empty());
}

#[test]
fn rank_above_closing_rank_ends_the_scan() {
    let simulator = SeatAllocationSimulator::new(FixedAvailability(true));
    let list = preferences(&[("CEG", "CSE")]);

    let result = simulator.allocate(300, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::NotAllotted);
    assert_eq!(result.round_number, 1);
    assert!(result.message.contains("Consider adding more preferences"));
}

#[test]
fn admissible_and_available_preference_is_allotted() {
    let simulator = SeatAllocationSimulator::new(FixedAvailability(true));
    let list = preferences(&[("CEG", "CSE")]);

    let result = simulator.allocate(100, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::Allotted);
    assert_eq!(result.institution_id, Some(InstitutionId::from("CEG")));
    assert_eq!(result.program_id, Some(ProgramId::from("CSE")));
    assert_eq!(
        result.institution_name.as_deref(),
        Some("College of Engineering, Guindy")
    );
    assert_eq!(result.round_number, 1);
}

#[test]
fn inadmissible_preferences_are_skipped_in_order() {
    let simulator = SeatAllocationSimulator::new(FixedAvailability(true));
    let list = preferences(&[("CEG", "CSE"), ("CEG", "ECE"), ("PSG", "CSE")]);

    let result = simulator.allocate(500, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::Allotted);
    assert_eq!(result.program_id, Some(ProgramId::from("ECE")));
    assert!(result.message.contains("preference 2"));
}

#[test]
fn category_without_closing_rank_admits_nobody() {
    let simulator = SeatAllocationSimulator::new(FixedAvailability(true));
    let list = preferences(&[("CEG", "CSE"), ("PSG", "CSE"), ("LOY", "BCOM")]);

    let result = simulator.allocate(1, Category::St, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::NotAllotted);
}

#[test]
fn empty_list_asks_for_preferences() {
    let simulator = SeatAllocationSimulator::new(FixedAvailability(true));
    let list = preferences(&[]);

    let result = simulator.allocate(1, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::NotAllotted);
    assert!(result.message.contains("Add preferences"));
}

#[test]
fn zero_capacity_program_always_waitlists() {
    let simulator = SeatAllocationSimulator::new(ProbabilisticAvailability::new(1.0, Some(3)));
    let list = preferences(&[("PSG", "RAE")]);

    let result = simulator.allocate(2_000, Category::Oc, &list, &scenario_catalog());

    assert_eq!(result.status, AllotmentStatus::Waitlisted);
}

#[test]
fn seeded_draws_are_reproducible() {
    let list = preferences(&[("PSG", "CSE")]);
    let catalog = scenario_catalog();
    let run = |seed: u64| -> Vec<AllotmentStatus> {
        let simulator =
            SeatAllocationSimulator::new(ProbabilisticAvailability::new(0.5, Some(seed)));
        (0..32)
            .map(|_| simulator.allocate(10, Category::Oc, &list, &catalog).status)
            .collect()
    };

    assert_eq!(run(42), run(42));
    assert!(run(42).contains(&AllotmentStatus::Allotted));
    assert!(run(42).contains(&AllotmentStatus::Waitlisted));
}

#[test]
fn out_of_range_success_rate_falls_back_to_default() {
    assert_eq!(ProbabilisticAvailability::new(1.7, None).success_rate(), 0.85);
    assert_eq!(ProbabilisticAvailability::new(f64::NAN, None).success_rate(), 0.85);
    assert_eq!(ProbabilisticAvailability::new(0.25, None).success_rate(), 0.25);
}

const CLOSING_RANKS: [(&str, &str, u32); 4] = [
    ("CEG", "CSE", 150),
    ("CEG", "ECE", 600),
    ("PSG", "CSE", 700),
    ("PSG", "RAE", 2_600),
];

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(128))]

    #[test]
    fn prop_outcome_targets_first_admissible_preference(
        rank in 1u32..4_000,
        available in any::<bool>(),
    ) {
        let simulator = SeatAllocationSimulator::new(FixedAvailability(available));
        let choices: Vec<(&str, &str)> = CLOSING_RANKS
            .iter()
            .map(|(institution, program, _)| (*institution, *program))
            .collect();
        let list = preferences(&choices);

        let result = simulator.allocate(rank, Category::Oc, &list, &scenario_catalog());
        let expected = CLOSING_RANKS.iter().find(|(_, _, closing)| rank <= *closing);

        match expected {
            Some((institution, program, _)) => {
                let status = if available {
                    AllotmentStatus::Allotted
                } else {
                    AllotmentStatus::Waitlisted
                };
                prop_assert_eq!(result.status, status);
                prop_assert_eq!(result.institution_id, Some(InstitutionId::from(*institution)));
                prop_assert_eq!(result.program_id, Some(ProgramId::from(*program)));
            }
            None => {
                prop_assert_eq!(result.status, AllotmentStatus::NotAllotted);
            }
        }
        prop_assert_eq!(result.round_number, 1);
    }
}
