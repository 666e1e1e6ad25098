use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WEIGHTS: &str = "resume_score=3,links_score=2,q1_score=7,q2_score=3";

/// Ordered criterion weights; keys are review column names.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionWeights {
    entries: Vec<(String, f64)>,
}

impl CriterionWeights {
    pub fn new<I, K>(entries: I) -> Result<Self, WeightsError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut collected: Vec<(String, f64)> = Vec::new();
        for (key, weight) in entries {
            let key = key.into().trim().to_string();
            if key.is_empty() {
                return Err(WeightsError::EmptyKey);
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(WeightsError::InvalidWeight { key, weight });
            }
            if collected.iter().any(|(existing, _)| *existing == key) {
                return Err(WeightsError::DuplicateKey(key));
            }
            collected.push((key, weight));
        }

        if collected.is_empty() {
            return Err(WeightsError::Empty);
        }

        Ok(Self { entries: collected })
    }

    pub fn criteria(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, weight)| (key.as_str(), *weight))
    }
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            entries: vec![
                ("resume_score".to_string(), 3.0),
                ("links_score".to_string(), 2.0),
                ("q1_score".to_string(), 7.0),
                ("q2_score".to_string(), 3.0),
            ],
        }
    }
}

impl FromStr for CriterionWeights {
    type Err = WeightsError;

    /// Parses `key=value` pairs separated by commas.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut entries = Vec::new();
        for part in raw.split(',').filter(|part| !part.trim().is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WeightsError::Malformed(part.trim().to_string()))?;
            let weight = value
                .trim()
                .parse::<f64>()
                .map_err(|_| WeightsError::Malformed(part.trim().to_string()))?;
            entries.push((key.trim().to_string(), weight));
        }
        Self::new(entries)
    }
}

impl fmt::Display for CriterionWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .entries
            .iter()
            .map(|(key, weight)| format!("{key}={weight}"))
            .collect();
        f.write_str(&rendered.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("weights must name at least one criterion")]
    Empty,
    #[error("weight keys must not be blank")]
    EmptyKey,
    #[error("weight '{0}' is not of the form key=number")]
    Malformed(String),
    #[error("weight for '{key}' must be a non-negative number, got {weight}")]
    InvalidWeight { key: String, weight: f64 },
    #[error("criterion '{0}' is weighted more than once")]
    DuplicateKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_string_matches_default_weights() {
        let parsed: CriterionWeights = DEFAULT_WEIGHTS.parse().expect("defaults parse");
        assert_eq!(parsed, CriterionWeights::default());
        assert_eq!(parsed.to_string(), DEFAULT_WEIGHTS);
    }

    #[test]
    fn keeps_declaration_order_and_trims() {
        let parsed: CriterionWeights = " q1_score = 1.5 , resume_score=0 ".parse().expect("parses");
        assert_eq!(
            parsed.iter().collect::<Vec<_>>(),
            vec![("q1_score", 1.5), ("resume_score", 0.0)]
        );
    }

    #[test]
    fn rejects_negative_and_malformed_weights() {
        assert!(matches!(
            "q1_score=-1".parse::<CriterionWeights>(),
            Err(WeightsError::InvalidWeight { .. })
        ));
        assert!(matches!(
            "q1_score".parse::<CriterionWeights>(),
            Err(WeightsError::Malformed(_))
        ));
        assert!(matches!(
            "q1_score=1,q1_score=2".parse::<CriterionWeights>(),
            Err(WeightsError::DuplicateKey(_))
        ));
        assert_eq!("".parse::<CriterionWeights>(), Err(WeightsError::Empty));
    }
}
