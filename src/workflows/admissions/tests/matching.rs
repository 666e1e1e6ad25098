use super::common::*;
use crate::workflows::admissions::domain::{ApplicationStatus, ProfileId, TeamId};
use crate::workflows::admissions::email::EmailSet;
use crate::workflows::admissions::matching::{match_applications, TeamDirectory};
use crate::workflows::admissions::roster::Roster;
use crate::workflows::admissions::AdmissionError;

fn submitted() -> Vec<crate::workflows::admissions::ApplicationRecord> {
    records()
        .applications
        .into_iter()
        .filter(|application| application.status == ApplicationStatus::Submitted)
        .collect()
}

#[test]
fn subset_match_prefers_smallest_team() {
    let directory = TeamDirectory::from_records(&teams());
    let emails = EmailSet::from_candidates(["cy@uni.ca"]);

    let team = directory.find_by_subset(&emails).expect("cy is registered");
    assert_eq!(team.id, TeamId("t-alpha".to_string()));
}

#[test]
fn equal_sized_matches_break_ties_by_team_id() {
    let directory = TeamDirectory::from_records(&[
        team("t-2", "Second", &["ada@uni.ca", "bob@uni.ca"]),
        team("t-1", "First", &["ada@uni.ca", "cy@uni.ca"]),
    ]);
    let emails = EmailSet::from_candidates(["ada@uni.ca"]);

    let team = directory.find_by_subset(&emails).expect("ada is registered");
    assert_eq!(team.id, TeamId("t-1".to_string()));
}

#[test]
fn empty_email_set_never_matches() {
    let directory = TeamDirectory::from_records(&teams());
    assert!(directory.find_by_subset(&EmailSet::default()).is_none());

    let assignment = directory.assign(&EmailSet::default());
    assert_eq!(assignment.team_id, TeamId("UNMATCHED:".to_string()));
    assert_eq!(assignment.team_name, "UNMATCHED");
    assert_eq!(assignment.team_size, 1);
}

#[test]
fn blank_team_ids_are_skipped_and_names_fall_back_to_id() {
    let mut nameless = team("t-x", "", &["x@uni.ca"]);
    nameless.team_name = None;
    let directory =
        TeamDirectory::from_records(&[team("  ", "Ghost", &["ghost@uni.ca"]), nameless]);

    assert_eq!(directory.len(), 1);
    let assignment = directory.assign(&EmailSet::from_candidates(["x@uni.ca"]));
    assert_eq!(assignment.team_name, "t-x");
}

#[test]
fn applications_resolve_to_registered_and_synthetic_teams() {
    let outcome = match_applications(&submitted(), &roster(), &TeamDirectory::from_records(&teams()))
        .expect("every applicant has an email");

    let team_of = |id: &str| {
        outcome
            .applications
            .iter()
            .find(|entry| entry.application.id.0 == id)
            .map(|entry| entry.assignment.team_id.0.clone())
            .expect("application matched")
    };

    assert_eq!(team_of("a-ada"), "t-alpha");
    assert_eq!(team_of("a-bob"), "t-alpha");
    assert_eq!(team_of("a-cy"), "t-alpha");
    assert_eq!(team_of("a-dee"), "t-beta");
    assert_eq!(team_of("a-fay"), "t-solo");
    assert_eq!(team_of("a-hal"), "UNMATCHED:hal@uni.ca|nobody@uni.ca");
    assert_eq!(outcome.unmatched.len(), 1);

    let hal = outcome
        .applications
        .iter()
        .find(|entry| entry.application.id.0 == "a-hal")
        .expect("hal present");
    assert_eq!(hal.assignment.team_name, "hal@uni.ca;nobody@uni.ca");
    assert_eq!(hal.assignment.team_size, 2);
}

#[test]
fn unmatched_applications_with_same_people_share_a_synthetic_team() {
    let applications = vec![
        application("a-1", "p-hal", Some("Nobody@uni.ca")),
        application("a-2", "p-hal", Some(" nobody@uni.ca ,hal@uni.ca")),
    ];
    let outcome =
        match_applications(&applications, &roster(), &TeamDirectory::from_records(&teams()))
            .expect("matches");

    assert_eq!(
        outcome.applications[0].assignment.team_id,
        outcome.applications[1].assignment.team_id
    );
}

#[test]
fn matching_is_deterministic_regardless_of_team_order() {
    let mut reversed = teams();
    reversed.reverse();

    let forward = match_applications(&submitted(), &roster(), &TeamDirectory::from_records(&teams()))
        .expect("matches");
    let backward =
        match_applications(&submitted(), &roster(), &TeamDirectory::from_records(&reversed))
            .expect("matches");

    let ids = |outcome: &crate::workflows::admissions::MatchOutcome| {
        outcome
            .applications
            .iter()
            .map(|entry| entry.assignment.team_id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&forward), ids(&backward));
}

#[test]
fn missing_roster_emails_are_reported_together() {
    let roster = Roster::from_pairs([("p-ada", "ada@uni.ca")]);

    let err = match_applications(&submitted(), &roster, &TeamDirectory::from_records(&teams()))
        .expect_err("most profiles are missing");

    match &err {
        AdmissionError::MissingApplicantEmails {
            count,
            sample,
            truncated,
        } => {
            assert_eq!(*count, 6);
            assert_eq!(sample.first(), Some(&"p-bob".to_string()));
            assert!(!truncated);
        }
        other => panic!("expected missing email error, got {other:?}"),
    }
    assert!(err.to_string().contains("Missing count=6"));
}

#[test]
fn missing_email_sample_is_truncated_to_twenty() {
    let applications: Vec<_> = (0..25)
        .map(|n| application(&format!("a-{n}"), &format!("p-{n:02}"), None))
        .collect();

    let err = match_applications(&applications, &Roster::default(), &TeamDirectory::default())
        .expect_err("nobody is on the roster");

    match &err {
        AdmissionError::MissingApplicantEmails {
            count,
            sample,
            truncated,
        } => {
            assert_eq!(*count, 25);
            assert_eq!(sample.len(), 20);
            assert_eq!(sample[0], ProfileId("p-00".to_string()).0);
            assert!(*truncated);
        }
        other => panic!("expected missing email error, got {other:?}"),
    }
    assert!(err.to_string().ends_with("... (truncated)"));
}
