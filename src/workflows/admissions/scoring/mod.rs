mod normalize;
mod weights;

pub use weights::{CriterionWeights, WeightsError, DEFAULT_WEIGHTS};

use std::collections::HashMap;

use tracing::debug;

use super::domain::{ApplicationId, ReviewRecord};
use normalize::zscores_by_reviewer;

/// Score assigned to applications nobody reviewed so they still rank, last.
pub const UNREVIEWED_SCORE: f64 = -1e9;

/// Review aggregate for one application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicationScore {
    pub num_reviews: usize,
    pub score: f64,
}

impl ApplicationScore {
    pub const UNREVIEWED: Self = Self {
        num_reviews: 0,
        score: UNREVIEWED_SCORE,
    };
}

/// Weighted total of one review's normalized criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewTotal {
    pub application_id: ApplicationId,
    pub total: f64,
}

/// Normalizes every review against its reviewer's own history and combines the
/// criteria into one weighted total per review.
pub fn review_totals(reviews: &[ReviewRecord], weights: &CriterionWeights) -> Vec<ReviewTotal> {
    let criteria: Vec<&str> = weights.criteria().collect();
    let normalized = zscores_by_reviewer(reviews, &criteria);

    reviews
        .iter()
        .zip(normalized)
        .map(|(review, values)| {
            let total: f64 = weights
                .iter()
                .zip(values)
                .map(|((_, weight), value)| weight * value)
                .sum();
            ReviewTotal {
                application_id: review.application_id.clone(),
                total,
            }
        })
        .collect()
}

/// Reviewer-bias-corrected score per reviewed application.
#[derive(Debug, Clone, Default)]
pub struct ScoreBook {
    scores: HashMap<ApplicationId, ApplicationScore>,
}

impl ScoreBook {
    pub fn from_reviews(reviews: &[ReviewRecord], weights: &CriterionWeights) -> Self {
        let mut sums: HashMap<ApplicationId, (usize, f64)> = HashMap::new();
        for total in review_totals(reviews, weights) {
            let entry = sums.entry(total.application_id).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += total.total;
        }

        let scores: HashMap<ApplicationId, ApplicationScore> = sums
            .into_iter()
            .map(|(id, (count, sum))| {
                (
                    id,
                    ApplicationScore {
                        num_reviews: count,
                        score: sum / count as f64,
                    },
                )
            })
            .collect();

        debug!(
            reviews = reviews.len(),
            applications = scores.len(),
            criteria = %weights,
            "normalized reviewer scores"
        );

        Self { scores }
    }

    /// Unreviewed applications get [`ApplicationScore::UNREVIEWED`].
    pub fn score(&self, application_id: &ApplicationId) -> ApplicationScore {
        self.scores
            .get(application_id)
            .copied()
            .unwrap_or(ApplicationScore::UNREVIEWED)
    }
}
