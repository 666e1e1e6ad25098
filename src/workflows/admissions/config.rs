use super::scoring::CriterionWeights;
use super::selection::SelectionPolicy;

pub const DEFAULT_STATUS_COLUMN: &str = "status";

/// Run-level knobs for scoring and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub weights: CriterionWeights,
    /// Applications with fewer reviews are left out of team aggregation.
    pub min_reviews: usize,
    pub status_column: String,
    pub selection: SelectionPolicy,
}

impl RankingConfig {
    pub fn new(target_headcount: usize) -> Self {
        Self {
            weights: CriterionWeights::default(),
            min_reviews: 1,
            status_column: DEFAULT_STATUS_COLUMN.to_string(),
            selection: SelectionPolicy::new(target_headcount),
        }
    }
}
