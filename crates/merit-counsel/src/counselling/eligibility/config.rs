use serde::{Deserialize, Serialize};

/// Thresholds steering eligibility classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Minimum mark (out of 100) every required subject must reach.
    pub minimum_pass_mark: u8,
    /// Distance below the cutoff still reported as borderline.
    pub borderline_band: f64,
    /// Margin above the cutoff that earns a high chance.
    pub high_chance_margin: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            minimum_pass_mark: 35,
            borderline_band: 10.0,
            high_chance_margin: 10.0,
        }
    }
}
