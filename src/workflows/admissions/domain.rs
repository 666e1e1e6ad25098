use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for application rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for applicant profiles (auth user ids).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Team identifier, either a registered team row or a synthetic unmatched grouping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) const UNMATCHED_PREFIX: &str = "UNMATCHED:";

impl TeamId {
    /// Synthetic identifier for applications that matched no registered team.
    pub fn unmatched(email_key: &str) -> Self {
        Self(format!("{UNMATCHED_PREFIX}{email_key}"))
    }

    pub fn is_unmatched(&self) -> bool {
        self.0.starts_with(UNMATCHED_PREFIX)
    }
}

/// Application lifecycle as stored in the configurable status column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Submitted,
    Accepted,
    Other(String),
    Missing,
}

impl ApplicationStatus {
    pub fn from_label(value: Option<&str>) -> Self {
        match value {
            Some("submitted") => Self::Submitted,
            Some("accepted") => Self::Accepted,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Missing,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Other(value) => value,
            ApplicationStatus::Missing => "",
        }
    }
}

/// Row from the applications table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub profile_id: ProfileId,
    /// Free-text, comma separated teammate e-mails as typed by the applicant.
    pub team_members: Option<String>,
    pub status: ApplicationStatus,
}

/// Row from the reviews table, scores keyed by criterion column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub application_id: ApplicationId,
    pub reviewer_id: Option<String>,
    pub scores: BTreeMap<String, Option<f64>>,
}

impl ReviewRecord {
    pub fn score(&self, criterion: &str) -> Option<f64> {
        self.scores
            .get(criterion)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }
}

/// Row from the teams table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub team_name: Option<String>,
    pub members: [Option<String>; 4],
}

/// The three remote tables loaded for one run.
#[derive(Debug, Clone, Default)]
pub struct AdmissionRecords {
    pub applications: Vec<ApplicationRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub teams: Vec<TeamRecord>,
}
