use std::collections::{HashMap, HashSet};

use super::domain::{ApplicationId, TeamId};
use super::matching::MatchedApplication;
use super::teams::TeamScore;

/// Controls how many ranked teams are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Admitted headcount to reach.
    pub target_headcount: usize,
    /// Only the top N ranked teams are candidates when set.
    pub offer_top: Option<usize>,
    /// Teams still added after the target is first met.
    pub overshoot_teams: usize,
}

impl SelectionPolicy {
    pub const DEFAULT_OVERSHOOT: usize = 1;

    pub fn new(target_headcount: usize) -> Self {
        Self {
            target_headcount,
            offer_top: None,
            overshoot_teams: Self::DEFAULT_OVERSHOOT,
        }
    }
}

/// Teams chosen for offers plus the applications that follow from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// In rank order.
    pub team_ids: Vec<TeamId>,
    /// Distinct applicants summed over the selected teams.
    pub people: usize,
    pub target_reached: bool,
    /// Sorted and deduplicated.
    pub offered_application_ids: Vec<ApplicationId>,
    /// Distinct profiles among the offered applications.
    pub people_offered: usize,
}

/// Distinct applicants per team across every submitted application, scored or not.
pub fn headcount_by_team(applications: &[MatchedApplication]) -> HashMap<&TeamId, usize> {
    let mut people: HashMap<&TeamId, HashSet<&str>> = HashMap::new();
    for entry in applications {
        people
            .entry(&entry.assignment.team_id)
            .or_default()
            .insert(entry.application.profile_id.0.as_str());
    }
    people
        .into_iter()
        .map(|(team_id, profiles)| (team_id, profiles.len()))
        .collect()
}

/// Walks `ranked` greedily until the target headcount is met, then keeps
/// `overshoot_teams` more before stopping. Teams with no applicants are skipped.
pub fn select_teams<F>(ranked: &[TeamScore], policy: &SelectionPolicy, headcount: F) -> Selection
where
    F: Fn(&TeamId) -> usize,
{
    let candidates = match policy.offer_top {
        Some(limit) if limit > 0 => &ranked[..limit.min(ranked.len())],
        _ => ranked,
    };

    let mut selection = Selection::default();
    let mut extra_remaining = policy.overshoot_teams;

    for team in candidates {
        let add = headcount(&team.team_id);
        if add == 0 {
            continue;
        }

        if selection.target_reached {
            if extra_remaining == 0 {
                break;
            }
            extra_remaining -= 1;
        }

        selection.team_ids.push(team.team_id.clone());
        selection.people += add;

        if selection.people >= policy.target_headcount {
            selection.target_reached = true;
        }

        if selection.target_reached && extra_remaining == 0 {
            break;
        }
    }

    selection
}

/// Selects teams and expands them into the applications to offer.
pub fn build_offer(
    ranked: &[TeamScore],
    applications: &[MatchedApplication],
    policy: &SelectionPolicy,
) -> Selection {
    let counts = headcount_by_team(applications);
    let mut selection = select_teams(ranked, policy, |team_id| {
        counts.get(team_id).copied().unwrap_or(0)
    });

    let chosen: HashSet<&TeamId> = selection.team_ids.iter().collect();
    let offered: Vec<&MatchedApplication> = applications
        .iter()
        .filter(|entry| chosen.contains(&entry.assignment.team_id))
        .collect();

    let mut ids: Vec<ApplicationId> = offered
        .iter()
        .map(|entry| entry.application.id.clone())
        .collect();
    ids.sort();
    ids.dedup();

    selection.people_offered = offered
        .iter()
        .map(|entry| entry.application.profile_id.0.as_str())
        .collect::<HashSet<_>>()
        .len();
    selection.offered_application_ids = ids;
    selection
}
