//! Read-only reference data: institutions, programs, composite cutoffs and seat matrices.

mod defaults;
mod loader;
mod sample;
mod store;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{Category, CompositeKind, InstitutionId, ProgramId};

pub use defaults::default_cutoff;
pub use store::{CatalogSnapshot, CatalogStore};

/// Minimum composite per category required by a program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramCutoffs(BTreeMap<Category, f64>);

impl ProgramCutoffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, cutoff: f64) -> Self {
        self.0.insert(category, cutoff);
        self
    }

    pub fn insert(&mut self, category: Category, cutoff: f64) {
        self.0.insert(category, cutoff);
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Seat matrix for one program: capacity and closing rank per category.
///
/// Ranks are "lower is better"; a rank is admissible when it is at or below the
/// category's closing rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAllotment {
    pub capacity: u32,
    pub category_cutoffs: BTreeMap<Category, u32>,
}

impl SeatAllotment {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            category_cutoffs: BTreeMap::new(),
        }
    }

    pub fn with_cutoff(mut self, category: Category, closing_rank: u32) -> Self {
        self.category_cutoffs.insert(category, closing_rank);
        self
    }

    pub fn closing_rank(&self, category: Category) -> Option<u32> {
        self.category_cutoffs.get(&category).copied()
    }

    /// Categories without a closing rank admit nobody.
    pub fn admits(&self, rank: u32, category: Category) -> bool {
        self.closing_rank(category)
            .is_some_and(|threshold| rank <= threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoffs: Option<ProgramCutoffs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<SeatAllotment>,
}

impl Program {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: ProgramId::from(id),
            name: name.to_string(),
            cutoffs: None,
            seats: None,
        }
    }

    pub fn with_cutoffs(mut self, cutoffs: ProgramCutoffs) -> Self {
        self.cutoffs = Some(cutoffs);
        self
    }

    pub fn with_seats(mut self, seats: SeatAllotment) -> Self {
        self.seats = Some(seats);
        self
    }

    /// Composite cutoff for `category`, falling back to the static default table
    /// when the program declares no explicit value.
    pub fn required_score(&self, kind: CompositeKind, category: Category) -> f64 {
        self.cutoffs
            .as_ref()
            .and_then(|cutoffs| cutoffs.get(category))
            .unwrap_or_else(|| default_cutoff(kind, category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub programs: Vec<Program>,
}

impl Institution {
    pub fn new(id: &str, name: &str, programs: Vec<Program>) -> Self {
        Self {
            id: InstitutionId::from(id),
            name: name.to_string(),
            programs,
        }
    }

    pub fn program(&self, id: &ProgramId) -> Option<&Program> {
        self.programs.iter().find(|program| &program.id == id)
    }
}

/// Ordered institutions with their programs. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    institutions: Vec<Institution>,
}

impl Catalog {
    /// Build a catalog, rejecting repeated institution ids or program ids within an institution.
    pub fn new(institutions: Vec<Institution>) -> Result<Self, CatalogError> {
        let mut seen_institutions = HashSet::new();
        for institution in &institutions {
            if !seen_institutions.insert(&institution.id) {
                return Err(CatalogError::DuplicateInstitution(institution.id.clone()));
            }

            let mut seen_programs = HashSet::new();
            for program in &institution.programs {
                if !seen_programs.insert(&program.id) {
                    return Err(CatalogError::DuplicateProgram {
                        institution_id: institution.id.clone(),
                        program_id: program.id.clone(),
                    });
                }
            }
        }

        Ok(Self { institutions })
    }

    pub fn institutions(&self) -> &[Institution] {
        &self.institutions
    }

    pub fn institution(&self, id: &InstitutionId) -> Option<&Institution> {
        self.institutions
            .iter()
            .find(|institution| &institution.id == id)
    }

    pub fn program(
        &self,
        institution_id: &InstitutionId,
        program_id: &ProgramId,
    ) -> Option<(&Institution, &Program)> {
        let institution = self.institution(institution_id)?;
        let program = institution.program(program_id)?;
        Some((institution, program))
    }

    pub fn seat_allotment(
        &self,
        institution_id: &InstitutionId,
        program_id: &ProgramId,
    ) -> Option<&SeatAllotment> {
        self.program(institution_id, program_id)
            .and_then(|(_, program)| program.seats.as_ref())
    }

    pub fn program_count(&self) -> usize {
        self.institutions
            .iter()
            .map(|institution| institution.programs.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.program_count() == 0
    }
}

/// Errors raised while building or loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("unrecognised catalog column '{0}'")]
    UnknownColumn(String),
    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("invalid value '{value}' in column '{column}' on line {line}")]
    InvalidValue {
        column: String,
        value: String,
        line: u64,
    },
    #[error("institution {0} appears more than once")]
    DuplicateInstitution(InstitutionId),
    #[error("program {program_id} is listed twice for institution {institution_id}")]
    DuplicateProgram {
        institution_id: InstitutionId,
        program_id: ProgramId,
    },
}
