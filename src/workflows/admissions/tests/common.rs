use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::workflows::admissions::domain::{
    AdmissionRecords, ApplicationId, ApplicationRecord, ApplicationStatus, ProfileId,
    ReviewRecord, TeamRecord,
};
use crate::workflows::admissions::repository::{AdmissionsRepository, RepositoryError};
use crate::workflows::admissions::roster::Roster;
use crate::workflows::admissions::RankingConfig;

pub(super) const CRITERIA: [&str; 4] = ["resume_score", "links_score", "q1_score", "q2_score"];

pub(super) fn application(id: &str, profile: &str, teammates: Option<&str>) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId(id.to_string()),
        profile_id: ProfileId(profile.to_string()),
        team_members: teammates.map(str::to_string),
        status: ApplicationStatus::Submitted,
    }
}

pub(super) fn review(application_id: &str, reviewer: &str, scores: [f64; 4]) -> ReviewRecord {
    ReviewRecord {
        application_id: ApplicationId(application_id.to_string()),
        reviewer_id: Some(reviewer.to_string()),
        scores: CRITERIA
            .iter()
            .zip(scores)
            .map(|(criterion, score)| (criterion.to_string(), Some(score)))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub(super) fn team(id: &str, name: &str, members: &[&str]) -> TeamRecord {
    let mut slots: [Option<String>; 4] = Default::default();
    for (slot, member) in slots.iter_mut().zip(members) {
        *slot = Some(member.to_string());
    }
    TeamRecord {
        id: id.to_string(),
        team_name: Some(name.to_string()),
        members: slots,
    }
}

pub(super) fn roster() -> Roster {
    Roster::from_pairs([
        ("p-ada", "Ada@Uni.ca"),
        ("p-bob", "bob@uni.ca"),
        ("p-cy", "cy@uni.ca"),
        ("p-dee", "dee@uni.ca"),
        ("p-eve", "eve@uni.ca"),
        ("p-fay", "fay@uni.ca"),
        ("p-hal", "hal@uni.ca"),
    ])
}

pub(super) fn teams() -> Vec<TeamRecord> {
    vec![
        team("t-big", "Big Team", &["ada@uni.ca", "bob@uni.ca", "cy@uni.ca", "zoe@uni.ca"]),
        team("t-alpha", "Alpha", &["ada@uni.ca", "bob@uni.ca", "cy@uni.ca"]),
        team("t-beta", "Beta", &["DEE@uni.ca ", "eve@uni.ca"]),
        team("t-solo", "Solo", &["fay@uni.ca"]),
    ]
}

/// Alpha is strong, Beta middling, Solo weak; Hal applied with no registered team.
pub(super) fn records() -> AdmissionRecords {
    let applications = vec![
        application("a-ada", "p-ada", Some("bob@uni.ca,cy@uni.ca")),
        application("a-bob", "p-bob", Some("ada@uni.ca")),
        application("a-cy", "p-cy", None),
        application("a-dee", "p-dee", Some("eve@uni.ca")),
        application("a-eve", "p-eve", Some("dee@uni.ca")),
        application("a-fay", "p-fay", None),
        application("a-hal", "p-hal", Some("nobody@uni.ca")),
        ApplicationRecord {
            status: ApplicationStatus::Other("draft".to_string()),
            ..application("a-draft", "p-unknown", None)
        },
    ];

    let reviews = vec![
        review("a-ada", "r1", [9.0, 9.0, 9.0, 9.0]),
        review("a-bob", "r1", [8.0, 8.0, 8.0, 8.0]),
        review("a-cy", "r1", [2.0, 2.0, 2.0, 2.0]),
        review("a-dee", "r1", [6.0, 6.0, 6.0, 6.0]),
        review("a-eve", "r1", [5.0, 5.0, 5.0, 5.0]),
        review("a-fay", "r1", [3.0, 3.0, 3.0, 3.0]),
        review("a-ada", "r2", [10.0, 10.0, 10.0, 10.0]),
        review("a-fay", "r2", [1.0, 1.0, 1.0, 1.0]),
    ];

    AdmissionRecords {
        applications,
        reviews,
        teams: teams(),
    }
}

pub(super) fn ranking_config(target: usize) -> RankingConfig {
    RankingConfig::new(target)
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct StatusUpdate {
    pub ids: Vec<ApplicationId>,
    pub column: String,
    pub status: String,
}

#[derive(Default)]
pub(super) struct InMemoryRepository {
    applications: Mutex<Vec<ApplicationRecord>>,
    reviews: Vec<ReviewRecord>,
    teams: Vec<TeamRecord>,
    pub updates: Mutex<Vec<StatusUpdate>>,
}

impl InMemoryRepository {
    pub fn new(records: AdmissionRecords) -> Self {
        Self {
            applications: Mutex::new(records.applications),
            reviews: records.reviews,
            teams: records.teams,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn status_of(&self, id: &str) -> Option<ApplicationStatus> {
        self.applications
            .lock()
            .expect("applications lock")
            .iter()
            .find(|application| application.id.0 == id)
            .map(|application| application.status.clone())
    }
}

impl AdmissionsRepository for InMemoryRepository {
    fn applications(&self, _status_column: &str) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(self.applications.lock().expect("applications lock").clone())
    }

    fn reviews(&self, _criteria: &[&str]) -> Result<Vec<ReviewRecord>, RepositoryError> {
        Ok(self.reviews.clone())
    }

    fn teams(&self) -> Result<Vec<TeamRecord>, RepositoryError> {
        Ok(self.teams.clone())
    }

    fn set_status(
        &self,
        ids: &[ApplicationId],
        status_column: &str,
        status: &str,
    ) -> Result<usize, RepositoryError> {
        let mut applications = self.applications.lock().expect("applications lock");
        let mut changed = 0;
        for application in applications.iter_mut() {
            if ids.contains(&application.id) {
                application.status = ApplicationStatus::from_label(Some(status));
                changed += 1;
            }
        }

        self.updates.lock().expect("updates lock").push(StatusUpdate {
            ids: ids.to_vec(),
            column: status_column.to_string(),
            status: status.to_string(),
        });
        Ok(changed)
    }
}
