use super::domain::{CompositeKind, CompositeScores, Subject, SubjectMarks};

/// One weighted subject inside a composite formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaTerm {
    pub subject: Subject,
    pub weight: f64,
}

/// Fixed linear combination of subject marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeFormula {
    terms: &'static [FormulaTerm],
}

/// `maths + physics/2 + chemistry/2`, out of 200.
pub const ENGINEERING_FORMULA: CompositeFormula = CompositeFormula {
    terms: &[
        FormulaTerm {
            subject: Subject::Maths,
            weight: 1.0,
        },
        FormulaTerm {
            subject: Subject::Physics,
            weight: 0.5,
        },
        FormulaTerm {
            subject: Subject::Chemistry,
            weight: 0.5,
        },
    ],
};

/// `biology + physics/2 + chemistry/2`, out of 200.
pub const MEDICAL_FORMULA: CompositeFormula = CompositeFormula {
    terms: &[
        FormulaTerm {
            subject: Subject::Biology,
            weight: 1.0,
        },
        FormulaTerm {
            subject: Subject::Physics,
            weight: 0.5,
        },
        FormulaTerm {
            subject: Subject::Chemistry,
            weight: 0.5,
        },
    ],
};

impl CompositeFormula {
    /// True when every subject of the formula carries a non-zero mark.
    pub fn is_computable(&self, marks: &SubjectMarks) -> bool {
        self.terms
            .iter()
            .all(|term| marks.get(term.subject).is_some_and(|mark| mark > 0))
    }
}

impl CompositeKind {
    pub const fn formula(self) -> &'static CompositeFormula {
        match self {
            CompositeKind::Engineering => &ENGINEERING_FORMULA,
            CompositeKind::Medical => &MEDICAL_FORMULA,
        }
    }
}

/// Evaluate `formula` over `marks`, rounded to two decimals.
///
/// Returns exactly `0.0` when any subject of the formula is absent or zero. That
/// zero means "cannot be computed"; callers that need to tell it apart from a
/// genuine score check [`CompositeFormula::is_computable`] first.
pub fn compute_composite(marks: &SubjectMarks, formula: &CompositeFormula) -> f64 {
    let mut total = 0.0;
    for term in formula.terms {
        match marks.get(term.subject) {
            Some(mark) if mark > 0 => total += f64::from(mark) * term.weight,
            _ => return 0.0,
        }
    }
    round2(total)
}

/// Every composite the marks support; unsupported composites stay `None`.
pub fn composite_scores(marks: &SubjectMarks) -> CompositeScores {
    let score = |kind: CompositeKind| {
        let formula = kind.formula();
        formula
            .is_computable(marks)
            .then(|| compute_composite(marks, formula))
    };

    CompositeScores {
        engineering: score(CompositeKind::Engineering),
        medical: score(CompositeKind::Medical),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
