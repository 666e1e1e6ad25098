use std::collections::HashMap;

use super::super::domain::ReviewRecord;

/// Per-reviewer z-scores for each criterion, indexed like `reviews` and `criteria`.
///
/// Uses the sample standard deviation. Absent scores, single-review reviewers and
/// zero-variance criteria all normalize to 0.
pub(crate) fn zscores_by_reviewer(reviews: &[ReviewRecord], criteria: &[&str]) -> Vec<Vec<f64>> {
    let mut normalized = vec![vec![0.0; criteria.len()]; reviews.len()];

    let mut groups: HashMap<Option<&str>, Vec<usize>> = HashMap::new();
    for (index, review) in reviews.iter().enumerate() {
        groups
            .entry(review.reviewer_id.as_deref())
            .or_default()
            .push(index);
    }

    for members in groups.values() {
        for (column, criterion) in criteria.iter().enumerate() {
            let present: Vec<(usize, f64)> = members
                .iter()
                .filter_map(|&index| reviews[index].score(criterion).map(|value| (index, value)))
                .collect();

            let Some(stats) = ColumnStats::from_values(present.iter().map(|(_, value)| *value))
            else {
                continue;
            };

            for (index, value) in present {
                normalized[index][column] = (value - stats.mean) / stats.std_dev;
            }
        }
    }

    normalized
}

struct ColumnStats {
    mean: f64,
    std_dev: f64,
}

impl ColumnStats {
    /// `None` when the deviation is undefined or zero. Identical values are
    /// checked before the mean is taken; a rounded mean would leave a residue.
    fn from_values<I: Iterator<Item = f64> + Clone>(values: I) -> Option<Self> {
        let count = values.clone().count();
        if count < 2 {
            return None;
        }

        let first = values.clone().next()?;
        if values.clone().all(|value| value == first) {
            return None;
        }

        let mean = values.clone().sum::<f64>() / count as f64;
        let variance =
            values.map(|value| (value - mean).powi(2)).sum::<f64>() / (count as f64 - 1.0);
        let std_dev = variance.sqrt();

        (std_dev.is_finite() && std_dev > 0.0).then_some(Self { mean, std_dev })
    }
}
