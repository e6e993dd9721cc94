use serde::{Deserialize, Serialize};

use super::domain::{InstitutionId, ProgramId};

pub const DEFAULT_PREFERENCE_LIMIT: usize = 15;

/// Candidate-supplied choice before it is placed in a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreferenceChoice {
    pub institution_id: InstitutionId,
    pub program_id: ProgramId,
}

impl PreferenceChoice {
    pub fn new(institution_id: &str, program_id: &str) -> Self {
        Self {
            institution_id: InstitutionId::from(institution_id),
            program_id: ProgramId::from(program_id),
        }
    }
}

/// Choice placed in a list; `priority` is its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub institution_id: InstitutionId,
    pub program_id: ProgramId,
    pub priority: u32,
}

impl PreferenceEntry {
    fn is_choice(&self, choice: &PreferenceChoice) -> bool {
        self.institution_id == choice.institution_id && self.program_id == choice.program_id
    }
}

/// Refusals raised by list mutations. The list is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference list already holds the maximum of {limit} choices")]
    CapacityExceeded { limit: usize },
    #[error("{program_id} at {institution_id} is already in the preference list")]
    DuplicateEntry {
        institution_id: InstitutionId,
        program_id: ProgramId,
    },
    #[error("{program_id} at {institution_id} is not offered in the catalog")]
    UnknownProgram {
        institution_id: InstitutionId,
        program_id: ProgramId,
    },
}

/// Ordered, duplicate-free, capacity-bounded list of choices.
///
/// Every mutation renumbers priorities so they always read `1..=len` in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceList {
    entries: Vec<PreferenceEntry>,
    #[serde(skip)]
    limit: usize,
}

impl Default for PreferenceList {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PREFERENCE_LIMIT)
    }
}

impl PreferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding at most `limit` choices (never fewer than one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Build a list from choices in priority order, failing on the first refusal.
    pub fn from_choices<I>(choices: I, limit: usize) -> Result<Self, PreferenceError>
    where
        I: IntoIterator<Item = PreferenceChoice>,
    {
        let mut list = Self::with_limit(limit);
        for choice in choices {
            list.add(choice)?;
        }
        Ok(list)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PreferenceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreferenceEntry> + '_ {
        self.entries.iter()
    }

    pub fn contains(&self, choice: &PreferenceChoice) -> bool {
        self.entries.iter().any(|entry| entry.is_choice(choice))
    }

    /// Append a choice at the lowest priority, returning its priority.
    pub fn add(&mut self, choice: PreferenceChoice) -> Result<u32, PreferenceError> {
        if self.entries.len() >= self.limit {
            return Err(PreferenceError::CapacityExceeded { limit: self.limit });
        }
        if self.contains(&choice) {
            return Err(PreferenceError::DuplicateEntry {
                institution_id: choice.institution_id,
                program_id: choice.program_id,
            });
        }

        self.entries.push(PreferenceEntry {
            institution_id: choice.institution_id,
            program_id: choice.program_id,
            priority: 0,
        });
        self.renumber();
        Ok(self.entries.len() as u32)
    }

    /// Remove the entry at `index`; out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<PreferenceEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Swap the entry at `index` with the one above it. Returns whether anything moved.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.entries.swap(index - 1, index);
        self.renumber();
        true
    }

    /// Swap the entry at `index` with the one below it. Returns whether anything moved.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, index + 1);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.priority = position as u32 + 1;
        }
    }
}
