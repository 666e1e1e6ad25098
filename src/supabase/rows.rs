use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::workflows::admissions::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ProfileId, ReviewRecord, TeamRecord,
};

pub(crate) type Row = Map<String, Value>;

pub(crate) const TEAM_MEMBER_COLUMNS: [&str; 4] =
    ["team_member_1", "team_member_2", "team_member_3", "team_member_4"];

/// Ids arrive as uuids, integers or text depending on the table.
pub(crate) fn text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn number(row: &Row, column: &str) -> Option<f64> {
    match row.get(column)? {
        Value::Number(value) => value.as_f64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn application(row: &Row, status_column: &str) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId(text(row, "id").unwrap_or_default()),
        profile_id: ProfileId(text(row, "profile_id").unwrap_or_default()),
        team_members: text(row, "team_members"),
        status: ApplicationStatus::from_label(text(row, status_column).as_deref()),
    }
}

pub(crate) fn review(row: &Row, criteria: &[&str]) -> ReviewRecord {
    let scores: BTreeMap<String, Option<f64>> = criteria
        .iter()
        .map(|criterion| (criterion.to_string(), number(row, criterion)))
        .collect();

    ReviewRecord {
        application_id: ApplicationId(text(row, "application_id").unwrap_or_default()),
        reviewer_id: text(row, "reviewer_id"),
        scores,
    }
}

pub(crate) fn team(row: &Row) -> TeamRecord {
    TeamRecord {
        id: text(row, "id").unwrap_or_default(),
        team_name: text(row, "team_name"),
        members: TEAM_MEMBER_COLUMNS.map(|column| text(row, column)),
    }
}

/// PostgREST `in.(...)` filter with every value double-quoted.
pub(crate) fn in_filter(ids: &[ApplicationId]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.0.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}
