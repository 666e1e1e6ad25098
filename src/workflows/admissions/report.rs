use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::domain::{ApplicationId, TeamId};
use super::service::AdmissionPlan;
use super::teams::TeamScore;
use super::AdmissionError;

/// Destinations for the three audit artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub ranked_teams: PathBuf,
    pub offered_teams: PathBuf,
    pub offered_application_ids: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            ranked_teams: PathBuf::from("team_scores.csv"),
            offered_teams: PathBuf::from("offered_teams.csv"),
            offered_application_ids: PathBuf::from("offered_app_ids.txt"),
        }
    }
}

pub fn write_team_csv<W: Write>(writer: W, teams: &[TeamScore]) -> Result<(), AdmissionError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if teams.is_empty() {
        csv_writer.write_record(TEAM_COLUMNS)?;
    }
    for team in teams {
        csv_writer.serialize(team)?;
    }
    csv_writer.flush().map_err(|source| AdmissionError::Io {
        path: "team csv".to_string(),
        source,
    })?;
    Ok(())
}

const TEAM_COLUMNS: [&str; 7] = [
    "team_id",
    "team_name",
    "team_score",
    "team_size",
    "team_emails",
    "profile_ids",
    "application_ids",
];

pub fn write_application_ids<W: Write>(
    mut writer: W,
    ids: &[ApplicationId],
) -> std::io::Result<()> {
    for id in ids {
        writeln!(writer, "{id}")?;
    }
    writer.flush()
}

/// Ranked teams restricted to the selection, still in rank order.
pub fn offered_teams<'a>(ranked: &'a [TeamScore], selected: &[TeamId]) -> Vec<&'a TeamScore> {
    let chosen: HashSet<&TeamId> = selected.iter().collect();
    ranked
        .iter()
        .filter(|team| chosen.contains(&team.team_id))
        .collect()
}

/// Writes the ranked-teams CSV, the offered-teams CSV and the offered id list.
pub fn write_outputs(plan: &AdmissionPlan, paths: &OutputPaths) -> Result<(), AdmissionError> {
    write_team_csv(create(&paths.ranked_teams)?, &plan.ranked_teams)?;
    info!(
        path = %paths.ranked_teams.display(),
        teams = plan.ranked_teams.len(),
        "wrote ranked teams"
    );

    let offered: Vec<TeamScore> = offered_teams(&plan.ranked_teams, &plan.selection.team_ids)
        .into_iter()
        .cloned()
        .collect();

    write_application_ids(
        create(&paths.offered_application_ids)?,
        &plan.selection.offered_application_ids,
    )
    .map_err(|source| AdmissionError::Io {
        path: paths.offered_application_ids.display().to_string(),
        source,
    })?;
    info!(
        path = %paths.offered_application_ids.display(),
        applications = plan.selection.offered_application_ids.len(),
        "wrote offered application ids"
    );

    write_team_csv(create(&paths.offered_teams)?, &offered)?;
    info!(
        path = %paths.offered_teams.display(),
        teams = offered.len(),
        "wrote offered teams"
    );

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, AdmissionError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| AdmissionError::Io {
            path: path.display().to_string(),
            source,
        })
}
