use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::domain::{ApplicationId, ProfileId, TeamId};
use super::matching::{MatchedApplication, TeamAssignment};
use super::scoring::ScoreBook;

/// Submitted application joined with its team and review score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredApplication {
    pub application_id: ApplicationId,
    pub profile_id: ProfileId,
    pub assignment: TeamAssignment,
    pub num_reviews: usize,
    pub score: f64,
}

/// Joins matched applications with their scores and drops those below the review
/// threshold. Synthetic unmatched teams are always kept so they stay auditable.
pub fn score_applications(
    matched: &[MatchedApplication],
    scores: &ScoreBook,
    min_reviews: usize,
) -> Vec<ScoredApplication> {
    matched
        .iter()
        .map(|entry| {
            let score = scores.score(&entry.application.id);
            ScoredApplication {
                application_id: entry.application.id.clone(),
                profile_id: entry.application.profile_id.clone(),
                assignment: entry.assignment.clone(),
                num_reviews: score.num_reviews,
                score: score.score,
            }
        })
        .filter(|scored| scored.num_reviews >= min_reviews || scored.assignment.is_synthetic())
        .collect()
}

/// Mean of member scores, excluding the single lowest when the team has a
/// nominal size of two or more and at least two scored members.
pub fn drop_lowest_mean(team_size: usize, member_scores: &[f64]) -> f64 {
    let mut sorted = member_scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let used = if team_size >= 2 && sorted.len() >= 2 {
        &sorted[1..]
    } else {
        &sorted[..]
    };

    if used.is_empty() {
        return f64::NAN;
    }
    used.iter().sum::<f64>() / used.len() as f64
}

/// One row of the ranked team table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore {
    pub team_id: TeamId,
    pub team_name: String,
    pub team_score: f64,
    pub team_size: usize,
    pub team_emails: String,
    /// Members that passed the review threshold; offers cover every member.
    pub profile_ids: String,
    pub application_ids: String,
}

/// Aggregates scored applications into teams, ranked by descending score with
/// ascending team id breaking ties.
pub fn rank_teams(scored: &[ScoredApplication]) -> Vec<TeamScore> {
    let mut groups: BTreeMap<&TeamId, Vec<&ScoredApplication>> = BTreeMap::new();
    for application in scored {
        groups
            .entry(&application.assignment.team_id)
            .or_default()
            .push(application);
    }

    let mut teams: Vec<TeamScore> = groups
        .into_iter()
        .filter_map(|(team_id, members)| {
            let first = members.first()?;
            let member_scores: Vec<f64> = members.iter().map(|member| member.score).collect();
            let profile_ids: BTreeSet<&str> = members
                .iter()
                .map(|member| member.profile_id.0.as_str())
                .collect();
            let application_ids: BTreeSet<&str> = members
                .iter()
                .map(|member| member.application_id.0.as_str())
                .collect();

            Some(TeamScore {
                team_id: team_id.clone(),
                team_name: first.assignment.team_name.clone(),
                team_score: drop_lowest_mean(first.assignment.team_size, &member_scores),
                team_size: first.assignment.team_size,
                team_emails: first.assignment.team_emails.join(";"),
                profile_ids: profile_ids.into_iter().collect::<Vec<_>>().join(";"),
                application_ids: application_ids.into_iter().collect::<Vec<_>>().join(";"),
            })
        })
        .collect();

    teams.sort_by(compare_rank);
    teams
}

fn compare_rank(a: &TeamScore, b: &TeamScore) -> Ordering {
    b.team_score
        .total_cmp(&a.team_score)
        .then_with(|| a.team_id.cmp(&b.team_id))
}
