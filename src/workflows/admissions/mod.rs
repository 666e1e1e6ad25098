//! Hackathon admissions: team matching, reviewer-normalized scoring and
//! selection of teams up to a target headcount.

pub mod config;
pub mod domain;
pub mod email;
pub mod matching;
pub mod report;
pub mod repository;
pub mod roster;
pub mod scoring;
pub mod selection;
pub mod service;
pub mod teams;

#[cfg(test)]
mod tests;

pub use config::{RankingConfig, DEFAULT_STATUS_COLUMN};
pub use domain::{
    AdmissionRecords, ApplicationId, ApplicationRecord, ApplicationStatus, ProfileId,
    ReviewRecord, TeamId, TeamRecord,
};
pub use email::EmailSet;
pub use matching::{
    match_applications, MatchOutcome, MatchedApplication, TeamAssignment, TeamDirectory,
};
pub use report::{write_outputs, OutputPaths};
pub use repository::{AdmissionsRepository, RepositoryError};
pub use roster::Roster;
pub use scoring::{ApplicationScore, CriterionWeights, ScoreBook, WeightsError, DEFAULT_WEIGHTS};
pub use selection::{Selection, SelectionPolicy};
pub use service::{
    plan_admissions, AdmissionError, AdmissionPlan, AdmissionsService, ACCEPTED_STATUS,
    UPDATE_BATCH_SIZE,
};
pub use teams::{ScoredApplication, TeamScore};
