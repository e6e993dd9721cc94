use crate::counselling::domain::{Category, CompositeKind};

/// Static composite cutoffs used when a program publishes no table of its own.
pub fn default_cutoff(kind: CompositeKind, category: Category) -> f64 {
    match kind {
        CompositeKind::Engineering => match category {
            Category::Oc => 180.0,
            Category::Bc => 175.0,
            Category::Bcm => 172.0,
            Category::Mbc => 170.0,
            Category::Dnc => 168.0,
            Category::Sc => 160.0,
            Category::Sca => 155.0,
            Category::St => 150.0,
        },
        CompositeKind::Medical => match category {
            Category::Oc => 190.0,
            Category::Bc => 186.0,
            Category::Bcm => 184.0,
            Category::Mbc => 182.0,
            Category::Dnc => 180.0,
            Category::Sc => 172.0,
            Category::Sca => 168.0,
            Category::St => 164.0,
        },
    }
}
