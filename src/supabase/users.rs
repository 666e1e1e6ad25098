use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use super::SupabaseError;

/// Auth user as returned by the admin listing; only the exported fields are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserPage {
    #[serde(default)]
    pub(crate) users: Vec<AuthUser>,
}

/// Writes the roster consumed by the admissions run, every field quoted.
pub fn write_users_csv<W: Write>(writer: W, users: &[AuthUser]) -> Result<(), SupabaseError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    csv_writer.write_record(["id", "email", "created_at", "last_sign_in_at"])?;
    for user in users {
        let created_at = timestamp(user.created_at);
        let last_sign_in_at = timestamp(user.last_sign_in_at);
        csv_writer.write_record([
            user.id.as_str(),
            user.email.as_deref().unwrap_or(""),
            created_at.as_str(),
            last_sign_in_at.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admissions::{ProfileId, Roster};

    fn page() -> UserPage {
        serde_json::from_str(
            r#"{
                "aud": "authenticated",
                "users": [
                    {
                        "id": "u-1",
                        "email": "Ada@Uni.ca",
                        "created_at": "2025-01-05T10:00:00.123456Z",
                        "last_sign_in_at": null,
                        "role": "authenticated"
                    },
                    { "id": "u-2", "phone": "555" }
                ]
            }"#,
        )
        .expect("page decodes")
    }

    #[test]
    fn decodes_admin_user_page() {
        let users = page().users;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email.as_deref(), Some("Ada@Uni.ca"));
        assert!(users[0].created_at.is_some());
        assert!(users[1].email.is_none());
    }

    #[test]
    fn export_quotes_every_field_and_round_trips_into_roster() {
        let mut buffer = Vec::new();
        write_users_csv(&mut buffer, &page().users).expect("export written");

        let text = String::from_utf8(buffer.clone()).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(r#""id","email","created_at","last_sign_in_at""#)
        );
        assert_eq!(
            lines.next(),
            Some(r#""u-1","Ada@Uni.ca","2025-01-05T10:00:00.123456Z","""#)
        );

        let roster = Roster::from_reader(&buffer[..], "users.csv").expect("roster loads");
        assert_eq!(roster.len(), 1);
        assert_eq!(
            roster.email(&ProfileId("u-1".to_string())),
            Some("ada@uni.ca")
        );
    }
}
