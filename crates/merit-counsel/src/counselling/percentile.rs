use serde::{Deserialize, Serialize};

use super::merit::round2;

/// Competitiveness bucket derived from a raw rank. Guidance only; allocation never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    Tier5,
}

impl RankTier {
    /// Step function over rank: ≤500, ≤2000, ≤5000, ≤15000, beyond.
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            0..=500 => RankTier::Tier1,
            501..=2_000 => RankTier::Tier2,
            2_001..=5_000 => RankTier::Tier3,
            5_001..=15_000 => RankTier::Tier4,
            _ => RankTier::Tier5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RankTier::Tier1 => "Top tier",
            RankTier::Tier2 => "Highly competitive",
            RankTier::Tier3 => "Competitive",
            RankTier::Tier4 => "Moderate",
            RankTier::Tier5 => "Developing",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            RankTier::Tier1 => "Flagship programs at premier institutions are realistic choices.",
            RankTier::Tier2 => "Most core programs at leading institutions are within reach.",
            RankTier::Tier3 => "Strong options exist across established institutions.",
            RankTier::Tier4 => "Focus on a broad list mixing reach and safe preferences.",
            RankTier::Tier5 => "Prioritise a long preference list and reserved-category seats.",
        }
    }
}

/// Percentile and tier for a rank within a candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankStanding {
    pub rank: u32,
    pub pool_size: u32,
    pub percentile: f64,
    pub tier: RankTier,
    pub label: String,
    pub description: String,
}

/// `percentile = round2((pool - rank) / pool * 100)`, clamped to [0, 100].
///
/// Ranks beyond the pool size read as the 0th percentile; an empty pool yields 0.
pub fn classify(rank: u32, pool_size: u32) -> RankStanding {
    let percentile = if pool_size == 0 {
        0.0
    } else {
        let pool = f64::from(pool_size);
        round2((pool - f64::from(rank)) / pool * 100.0).clamp(0.0, 100.0)
    };
    let tier = RankTier::for_rank(rank);

    RankStanding {
        rank,
        pool_size,
        percentile,
        tier,
        label: tier.label().to_string(),
        description: tier.description().to_string(),
    }
}
