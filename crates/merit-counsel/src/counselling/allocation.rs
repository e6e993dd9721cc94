use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Catalog, SeatAllotment};
use super::domain::{Category, InstitutionId, ProgramId};
use super::preferences::{PreferenceEntry, PreferenceList};

/// Only a single counselling round is modelled.
pub const ROUND_NUMBER: u32 = 1;
pub const DEFAULT_SEAT_SUCCESS_RATE: f64 = 0.85;

/// Context handed to an availability source for the first admissible preference.
#[derive(Debug, Clone, Copy)]
pub struct SeatDraw<'a> {
    pub entry: &'a PreferenceEntry,
    pub seats: &'a SeatAllotment,
    pub rank: u32,
    pub category: Category,
}

/// Decides whether an admissible candidate actually gets the seat or is waitlisted.
pub trait SeatAvailability: Send + Sync {
    fn is_available(&self, draw: &SeatDraw<'_>) -> bool;
}

/// Allots a fixed fraction of admissible draws; programs with zero capacity never allot.
#[derive(Debug)]
pub struct ProbabilisticAvailability {
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl ProbabilisticAvailability {
    /// `success_rate` outside [0, 1] (or NaN) falls back to the default rate.
    pub fn new(success_rate: f64, seed: Option<u64>) -> Self {
        let success_rate = if (0.0..=1.0).contains(&success_rate) {
            success_rate
        } else {
            DEFAULT_SEAT_SUCCESS_RATE
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            success_rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl Default for ProbabilisticAvailability {
    fn default() -> Self {
        Self::new(DEFAULT_SEAT_SUCCESS_RATE, None)
    }
}

impl SeatAvailability for ProbabilisticAvailability {
    fn is_available(&self, draw: &SeatDraw<'_>) -> bool {
        if draw.seats.capacity == 0 {
            return false;
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_bool(self.success_rate)
    }
}

/// Deterministic availability, for tests and what-if runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAvailability(pub bool);

impl SeatAvailability for FixedAvailability {
    fn is_available(&self, _draw: &SeatDraw<'_>) -> bool {
        self.0
    }
}

impl<T: SeatAvailability + ?Sized> SeatAvailability for std::sync::Arc<T> {
    fn is_available(&self, draw: &SeatDraw<'_>) -> bool {
        (**self).is_available(draw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllotmentStatus {
    Allotted,
    Waitlisted,
    NotAllotted,
}

impl AllotmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AllotmentStatus::Allotted => "allotted",
            AllotmentStatus::Waitlisted => "waitlisted",
            AllotmentStatus::NotAllotted => "not_allotted",
        }
    }
}

/// Outcome of one simulation run. A new run produces a new result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllotmentResult {
    pub status: AllotmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<InstitutionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<ProgramId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    pub round_number: u32,
    pub message: String,
}

impl AllotmentResult {
    fn placed(status: AllotmentStatus, catalog: &Catalog, entry: &PreferenceEntry) -> Self {
        let names = catalog.program(&entry.institution_id, &entry.program_id);
        let institution_name = names.map(|(institution, _)| institution.name.clone());
        let program_name = names.map(|(_, program)| program.name.clone());

        let program_label = program_name
            .clone()
            .unwrap_or_else(|| entry.program_id.to_string());
        let institution_label = institution_name
            .clone()
            .unwrap_or_else(|| entry.institution_id.to_string());
        let message = match status {
            AllotmentStatus::Allotted => format!(
                "Seat allotted in {program_label} at {institution_label} (preference {}, round {ROUND_NUMBER})",
                entry.priority
            ),
            _ => format!(
                "Waitlisted for {program_label} at {institution_label} (preference {}, round {ROUND_NUMBER})",
                entry.priority
            ),
        };

        Self {
            status,
            institution_id: Some(entry.institution_id.clone()),
            program_id: Some(entry.program_id.clone()),
            institution_name,
            program_name,
            round_number: ROUND_NUMBER,
            message,
        }
    }

    fn not_allotted(preferences: usize) -> Self {
        let message = if preferences == 0 {
            format!(
                "No preferences submitted; nothing to allot in round {ROUND_NUMBER}. Add preferences and try again."
            )
        } else {
            format!(
                "None of your {preferences} preference(s) admit your rank in round {ROUND_NUMBER}. Consider adding more preferences."
            )
        };

        Self {
            status: AllotmentStatus::NotAllotted,
            institution_id: None,
            program_id: None,
            institution_name: None,
            program_name: None,
            round_number: ROUND_NUMBER,
            message,
        }
    }
}

/// Single-round, single-candidate seat allotment.
#[derive(Debug, Default)]
pub struct SeatAllocationSimulator<A> {
    availability: A,
}

impl<A: SeatAvailability> SeatAllocationSimulator<A> {
    pub fn new(availability: A) -> Self {
        Self { availability }
    }

    pub fn availability(&self) -> &A {
        &self.availability
    }

    /// Walk preferences in priority order and stop at the first one whose closing
    /// rank admits the candidate. That preference is either allotted or waitlisted;
    /// lower preferences are never consulted afterwards, even on a waitlist.
    /// Preferences missing from the catalog, or without a seat matrix, admit nobody.
    pub fn allocate(
        &self,
        rank: u32,
        category: Category,
        preferences: &PreferenceList,
        catalog: &Catalog,
    ) -> AllotmentResult {
        for entry in preferences.iter() {
            let Some(seats) = catalog.seat_allotment(&entry.institution_id, &entry.program_id)
            else {
                debug!(
                    institution = %entry.institution_id,
                    program = %entry.program_id,
                    "preference has no seat matrix"
                );
                continue;
            };

            if !seats.admits(rank, category) {
                debug!(
                    institution = %entry.institution_id,
                    program = %entry.program_id,
                    rank,
                    closing_rank = ?seats.closing_rank(category),
                    "rank not admissible"
                );
                continue;
            }

            let draw = SeatDraw {
                entry,
                seats,
                rank,
                category,
            };
            let status = if self.availability.is_available(&draw) {
                AllotmentStatus::Allotted
            } else {
                AllotmentStatus::Waitlisted
            };

            debug!(
                institution = %entry.institution_id,
                program = %entry.program_id,
                priority = entry.priority,
                status = status.label(),
                "first admissible preference resolved"
            );
            return AllotmentResult::placed(status, catalog, entry);
        }

        AllotmentResult::not_allotted(preferences.len())
    }
}
