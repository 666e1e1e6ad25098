use std::sync::Arc;

use tracing::info;

use super::config::RankingConfig;
use super::domain::{AdmissionRecords, ApplicationId, ApplicationRecord, ApplicationStatus};
use super::matching::{match_applications, MatchedApplication, TeamDirectory};
use super::repository::{AdmissionsRepository, RepositoryError};
use super::roster::Roster;
use super::scoring::ScoreBook;
use super::selection::{build_offer, Selection};
use super::teams::{rank_teams, score_applications, ScoredApplication, TeamScore};

/// Status written to offered applications.
pub const ACCEPTED_STATUS: &str = "accepted";
/// Applications per status update request.
pub const UPDATE_BATCH_SIZE: usize = 200;

/// Everything computed for one run, before any write-back.
#[derive(Debug, Clone)]
pub struct AdmissionPlan {
    /// Submitted applications with their resolved teams.
    pub applications: Vec<MatchedApplication>,
    pub unmatched: Vec<ApplicationId>,
    /// Applications that passed the review threshold (plus unmatched ones).
    pub scored: Vec<ScoredApplication>,
    pub ranked_teams: Vec<TeamScore>,
    pub selection: Selection,
    pub target_headcount: usize,
}

/// Builds the offer plan from already loaded tables.
pub fn plan_admissions(
    records: &AdmissionRecords,
    roster: &Roster,
    config: &RankingConfig,
) -> Result<AdmissionPlan, AdmissionError> {
    let submitted: Vec<ApplicationRecord> = records
        .applications
        .iter()
        .filter(|application| application.status == ApplicationStatus::Submitted)
        .cloned()
        .collect();
    info!(submitted = submitted.len(), "filtered submitted applications");
    if submitted.is_empty() {
        return Err(AdmissionError::NoSubmittedApplications);
    }

    let directory = TeamDirectory::from_records(&records.teams);
    let matched = match_applications(&submitted, roster, &directory)?;

    let scores = ScoreBook::from_reviews(&records.reviews, &config.weights);
    let scored = score_applications(&matched.applications, &scores, config.min_reviews);
    if scored.is_empty() {
        return Err(AdmissionError::NoQualifyingApplications);
    }

    let ranked_teams = rank_teams(&scored);
    let selection = build_offer(&ranked_teams, &matched.applications, &config.selection);
    info!(
        target = config.selection.target_headcount,
        selected_teams = selection.team_ids.len(),
        people_offered = selection.people_offered,
        applications = selection.offered_application_ids.len(),
        "selected teams until target headcount"
    );

    Ok(AdmissionPlan {
        applications: matched.applications,
        unmatched: matched.unmatched,
        scored,
        ranked_teams,
        selection,
        target_headcount: config.selection.target_headcount,
    })
}

/// Service composing the hosted tables with the ranking pipeline.
pub struct AdmissionsService<R> {
    repository: Arc<R>,
    config: RankingConfig,
}

impl<R> AdmissionsService<R>
where
    R: AdmissionsRepository,
{
    pub fn new(repository: Arc<R>, config: RankingConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Fetch the applications, reviews and teams tables; none may be empty.
    pub fn load(&self) -> Result<AdmissionRecords, AdmissionError> {
        let criteria: Vec<&str> = self.config.weights.criteria().collect();

        let applications = self.repository.applications(&self.config.status_column)?;
        let reviews = self.repository.reviews(&criteria)?;
        let teams = self.repository.teams()?;
        info!(
            applications = applications.len(),
            reviews = reviews.len(),
            teams = teams.len(),
            "loaded admission tables"
        );

        if applications.is_empty() {
            return Err(AdmissionError::EmptyTable("applications"));
        }
        if reviews.is_empty() {
            return Err(AdmissionError::EmptyTable("reviews"));
        }
        if teams.is_empty() {
            return Err(AdmissionError::EmptyTable("teams"));
        }

        Ok(AdmissionRecords {
            applications,
            reviews,
            teams,
        })
    }

    pub fn plan(&self, roster: &Roster) -> Result<AdmissionPlan, AdmissionError> {
        let records = self.load()?;
        plan_admissions(&records, roster, &self.config)
    }

    /// Marks every offered application as accepted, in batches.
    pub fn accept_offers(&self, plan: &AdmissionPlan) -> Result<usize, AdmissionError> {
        let mut updated = 0;
        for batch in plan
            .selection
            .offered_application_ids
            .chunks(UPDATE_BATCH_SIZE)
        {
            updated += self.repository.set_status(
                batch,
                &self.config.status_column,
                ACCEPTED_STATUS,
            )?;
            info!(
                updated,
                column = %self.config.status_column,
                status = ACCEPTED_STATUS,
                "updated application statuses"
            );
        }
        Ok(updated)
    }
}

/// Error raised while building or applying an admission plan.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("{source_name} must contain columns: {columns}")]
    MissingColumns {
        source_name: String,
        columns: &'static str,
    },
    #[error("No {0} found.")]
    EmptyTable(&'static str),
    #[error("No submitted applications to process.")]
    NoSubmittedApplications,
    #[error("{}", render_missing_emails(.count, .sample, .truncated))]
    MissingApplicantEmails {
        count: usize,
        sample: Vec<String>,
        truncated: bool,
    },
    #[error("No applications meet the min review requirement.")]
    NoQualifyingApplications,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn render_missing_emails(count: &usize, sample: &[String], truncated: &bool) -> String {
    let mut message = format!(
        "Some applications.profile_id values are missing from the roster (or have invalid emails).\n\
         Missing count={count}. Example profile_ids:\n  {}",
        sample.join("\n  ")
    );
    if *truncated {
        message.push_str("\n  ... (truncated)");
    }
    message
}
