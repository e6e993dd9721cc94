use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for institutions in the catalog (e.g. `CEG`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionId(pub String);

/// Identifier wrapper for a program offered by an institution (e.g. `CSE`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub String);

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstitutionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ProgramId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Subjects a mark can be recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Maths,
    Physics,
    Chemistry,
    Biology,
    ComputerScience,
    Accountancy,
    Commerce,
    Economics,
    English,
    Language,
    History,
    Geography,
}

impl Subject {
    pub const fn label(self) -> &'static str {
        match self {
            Subject::Maths => "maths",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
            Subject::ComputerScience => "computer_science",
            Subject::Accountancy => "accountancy",
            Subject::Commerce => "commerce",
            Subject::Economics => "economics",
            Subject::English => "english",
            Subject::Language => "language",
            Subject::History => "history",
            Subject::Geography => "geography",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reservation categories, each carrying its own cutoff per program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Open competition.
    Oc,
    /// Backward class.
    Bc,
    /// Backward class (Muslim).
    Bcm,
    /// Most backward class.
    Mbc,
    /// Denotified communities.
    Dnc,
    /// Scheduled caste.
    Sc,
    /// Scheduled caste (Arunthathiyar).
    Sca,
    /// Scheduled tribe.
    St,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Oc,
        Category::Bc,
        Category::Bcm,
        Category::Mbc,
        Category::Dnc,
        Category::Sc,
        Category::Sca,
        Category::St,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Category::Oc => "OC",
            Category::Bc => "BC",
            Category::Bcm => "BCM",
            Category::Mbc => "MBC",
            Category::Dnc => "DNC",
            Category::Sc => "SC",
            Category::Sca => "SCA",
            Category::St => "ST",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reservation category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

/// Higher-secondary stream the candidate studied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    #[default]
    Science,
    Commerce,
    Arts,
}

/// Sparse set of marks keyed by subject. Present marks are expected in [0, 100];
/// the intake guard enforces the range before a profile is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectMarks(BTreeMap<Subject, u8>);

impl SubjectMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, subject: Subject, mark: u8) -> Self {
        self.0.insert(subject, mark);
        self
    }

    pub fn get(&self, subject: Subject) -> Option<u8> {
        self.0.get(&subject).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, u8)> + '_ {
        self.0.iter().map(|(subject, mark)| (*subject, *mark))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|mark| u32::from(*mark)).sum()
    }
}

impl FromIterator<(Subject, u8)> for SubjectMarks {
    fn from_iter<T: IntoIterator<Item = (Subject, u8)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Composite families a program may rank candidates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Engineering,
    Medical,
}

impl CompositeKind {
    pub const fn label(self) -> &'static str {
        match self {
            CompositeKind::Engineering => "engineering",
            CompositeKind::Medical => "medical",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived composites; `None` means the composite could not be computed from the marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineering: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical: Option<f64>,
}

impl CompositeScores {
    pub fn get(&self, kind: CompositeKind) -> Option<f64> {
        match kind {
            CompositeKind::Engineering => self.engineering,
            CompositeKind::Medical => self.medical,
        }
    }
}

/// Raw candidate input as supplied by a form or API caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    pub marks: SubjectMarks,
    pub category: Category,
    #[serde(default)]
    pub stream: Stream,
    /// Counselling rank, when the candidate already has one.
    #[serde(default)]
    pub rank: Option<u32>,
}

/// Validated candidate with derived composites. Rebuilt wholesale whenever marks change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub marks: SubjectMarks,
    pub category: Category,
    pub stream: Stream,
    pub composite_scores: CompositeScores,
    pub total_marks: u32,
}
