use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::domain::{ApplicationId, ApplicationRecord, ProfileId, TeamId, TeamRecord};
use super::email::{is_valid_email, normalize_email, EmailSet};
use super::roster::Roster;
use super::AdmissionError;

const MISSING_EMAIL_SAMPLE: usize = 20;
const UNMATCHED_LOG_SAMPLE: usize = 10;

/// Team row after e-mail normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTeam {
    pub id: TeamId,
    pub name: String,
    pub emails: EmailSet,
}

/// Registered teams indexed for subset lookups.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: Vec<RegisteredTeam>,
}

impl TeamDirectory {
    pub fn from_records(records: &[TeamRecord]) -> Self {
        let mut teams: Vec<RegisteredTeam> = records
            .iter()
            .filter_map(|record| {
                let id = record.id.trim();
                if id.is_empty() {
                    return None;
                }

                let name = record
                    .team_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(id)
                    .to_string();
                let emails = EmailSet::from_candidates(record.members.iter().flatten());

                Some(RegisteredTeam {
                    id: TeamId(id.to_string()),
                    name,
                    emails,
                })
            })
            .collect();

        // A repeated id keeps the last row, as a keyed lookup would.
        let mut seen = BTreeSet::new();
        teams.reverse();
        teams.retain(|team| seen.insert(team.id.clone()));
        teams.reverse();

        Self { teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Smallest registered team whose e-mails contain every address in `emails`,
    /// ties broken by ascending team id. An empty set never matches.
    pub fn find_by_subset(&self, emails: &EmailSet) -> Option<&RegisteredTeam> {
        if emails.is_empty() {
            return None;
        }

        self.teams
            .iter()
            .filter(|team| emails.is_subset(&team.emails))
            .min_by(|a, b| {
                a.emails
                    .len()
                    .cmp(&b.emails.len())
                    .then_with(|| a.id.cmp(&b.id))
            })
    }

    /// Resolves the team for an application e-mail set, fabricating a synthetic
    /// grouping keyed by the canonical e-mail key when nothing matches.
    pub fn assign(&self, emails: &EmailSet) -> TeamAssignment {
        match self.find_by_subset(emails) {
            Some(team) => TeamAssignment {
                team_id: team.id.clone(),
                team_name: team.name.clone(),
                team_size: team.emails.len(),
                team_emails: team.emails.clone(),
            },
            None => TeamAssignment {
                team_id: TeamId::unmatched(&emails.key()),
                team_name: if emails.is_empty() {
                    "UNMATCHED".to_string()
                } else {
                    emails.join(";")
                },
                team_size: emails.len().max(1),
                team_emails: emails.clone(),
            },
        }
    }
}

/// Team a submitted application was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAssignment {
    pub team_id: TeamId,
    pub team_name: String,
    /// Nominal roster size, not the number of people who applied.
    pub team_size: usize,
    pub team_emails: EmailSet,
}

impl TeamAssignment {
    pub fn is_synthetic(&self) -> bool {
        self.team_id.is_unmatched()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedApplication {
    pub application: ApplicationRecord,
    pub emails: EmailSet,
    pub assignment: TeamAssignment,
}

#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub applications: Vec<MatchedApplication>,
    pub unmatched: Vec<ApplicationId>,
}

/// Resolves every submitted application to a team.
///
/// Applicants whose profile has no valid roster e-mail are collected across the
/// whole batch and reported together as a single error.
pub fn match_applications(
    submitted: &[ApplicationRecord],
    roster: &Roster,
    directory: &TeamDirectory,
) -> Result<MatchOutcome, AdmissionError> {
    let mut outcome = MatchOutcome::default();
    let mut missing_profiles: BTreeSet<ProfileId> = BTreeSet::new();

    for application in submitted {
        let own_email = roster
            .email(&application.profile_id)
            .map(normalize_email)
            .filter(|email| is_valid_email(email));
        if own_email.is_none() {
            missing_profiles.insert(application.profile_id.clone());
        }

        let mut emails = EmailSet::parse_team_members(application.team_members.as_deref());
        if let Some(email) = &own_email {
            emails.insert(email);
        }

        let assignment = directory.assign(&emails);
        if assignment.is_synthetic() {
            debug!(
                application_id = %application.id,
                emails = %emails.join(";"),
                "application did not match a registered team"
            );
            outcome.unmatched.push(application.id.clone());
        }

        outcome.applications.push(MatchedApplication {
            application: application.clone(),
            emails,
            assignment,
        });
    }

    if !missing_profiles.is_empty() {
        let count = missing_profiles.len();
        let sample: Vec<String> = missing_profiles
            .into_iter()
            .take(MISSING_EMAIL_SAMPLE)
            .map(|id| id.0)
            .collect();
        return Err(AdmissionError::MissingApplicantEmails {
            count,
            truncated: count > MISSING_EMAIL_SAMPLE,
            sample,
        });
    }

    if !outcome.unmatched.is_empty() {
        let sample: Vec<&str> = outcome
            .unmatched
            .iter()
            .take(UNMATCHED_LOG_SAMPLE)
            .map(|id| id.0.as_str())
            .collect();
        warn!(
            count = outcome.unmatched.len(),
            first_application_ids = ?sample,
            "applications could not be matched to a teams row by e-mail"
        );
    }

    Ok(outcome)
}
