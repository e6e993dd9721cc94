use serde::{Deserialize, Serialize};

use super::domain::{CompositeKind, Subject};

/// Subjects a program requires and the composite it ranks candidates by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRequirement {
    pub required_subjects: Vec<Subject>,
    pub composite: Option<CompositeKind>,
}

/// Classification rule: the first rule with a token contained in the program name applies.
///
/// Dotted abbreviations such as `b.e` only match when no letter or digit follows
/// them, so `b.ed` and `b.el.ed` do not read as `b.e`.
#[derive(Debug, Clone, Copy)]
pub struct RequirementRule {
    pub family: &'static str,
    pub tokens: &'static [&'static str],
    pub required_subjects: &'static [Subject],
    pub composite: Option<CompositeKind>,
}

impl RequirementRule {
    fn matches(&self, lowered_name: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| contains_token(lowered_name, token))
    }

    fn requirement(&self) -> ProgramRequirement {
        ProgramRequirement {
            required_subjects: self.required_subjects.to_vec(),
            composite: self.composite,
        }
    }
}

fn contains_token(lowered_name: &str, token: &str) -> bool {
    if !token.contains('.') {
        return lowered_name.contains(token);
    }

    lowered_name.match_indices(token).any(|(start, _)| {
        !lowered_name[start + token.len()..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric)
    })
}

// Engineering and medical rules come before general science: "computer science"
// must classify as engineering, not science.
const STANDARD_RULES: &[RequirementRule] = &[
    RequirementRule {
        family: "engineering",
        tokens: &[
            "engineering",
            "b.e",
            "b.tech",
            "btech",
            "technology",
            "computer science",
            "cse",
            "ece",
            "eee",
            "mechanical",
            "civil",
            "electrical",
            "electronics",
            "aeronautical",
            "robotics",
        ],
        required_subjects: &[Subject::Maths, Subject::Physics, Subject::Chemistry],
        composite: Some(CompositeKind::Engineering),
    },
    RequirementRule {
        family: "medical",
        tokens: &[
            "mbbs",
            "bds",
            "medicine",
            "medical",
            "nursing",
            "pharmacy",
            "pharm",
            "physiotherapy",
            "paramedical",
            "para-medical",
            "allied health",
            "radiology",
        ],
        required_subjects: &[Subject::Biology, Subject::Physics, Subject::Chemistry],
        composite: Some(CompositeKind::Medical),
    },
    RequirementRule {
        family: "life_science",
        tokens: &[
            "zoology",
            "botany",
            "microbiology",
            "biochemistry",
            "life science",
            "biology",
            "agriculture",
        ],
        required_subjects: &[Subject::Biology, Subject::Chemistry],
        composite: Some(CompositeKind::Medical),
    },
    RequirementRule {
        family: "commerce",
        tokens: &[
            "commerce",
            "b.com",
            "bcom",
            "accountancy",
            "accounting",
            "bba",
            "business",
            "finance",
        ],
        required_subjects: &[Subject::Accountancy],
        composite: None,
    },
    RequirementRule {
        family: "science",
        tokens: &["science", "b.sc", "bsc", "physics", "chemistry", "mathematics"],
        required_subjects: &[Subject::Physics, Subject::Chemistry],
        composite: None,
    },
];

/// Ordered rule table mapping program names to their requirements.
#[derive(Debug, Clone)]
pub struct SubjectRequirementResolver {
    rules: Vec<RequirementRule>,
}

impl Default for SubjectRequirementResolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl SubjectRequirementResolver {
    pub fn standard() -> Self {
        Self::with_rules(STANDARD_RULES.to_vec())
    }

    pub fn with_rules(rules: Vec<RequirementRule>) -> Self {
        Self { rules }
    }

    /// Add a rule evaluated after every existing rule.
    pub fn push_rule(&mut self, rule: RequirementRule) {
        self.rules.push(rule);
    }

    /// Case-insensitive, first-match-wins classification. Names matching no rule
    /// (arts and the like) require nothing and carry no composite.
    pub fn resolve(&self, program_name: &str) -> ProgramRequirement {
        let lowered = program_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(RequirementRule::requirement)
            .unwrap_or(ProgramRequirement {
                required_subjects: Vec::new(),
                composite: None,
            })
    }
}
