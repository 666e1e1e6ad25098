use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::ProfileId;
use super::email::normalize_email;
use super::AdmissionError;

/// Profile id to e-mail lookup exported from the auth backend.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    emails: HashMap<ProfileId, String>,
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
    #[serde(default)]
    email: String,
}

impl Roster {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AdmissionError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| AdmissionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// `source_name` only feeds error messages.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, AdmissionError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?;
        let has_column = |name: &str| headers.iter().any(|header| header == name);
        if !has_column("id") || !has_column("email") {
            return Err(AdmissionError::MissingColumns {
                source_name: source_name.to_string(),
                columns: "id,email",
            });
        }

        let mut emails = HashMap::new();
        for row in csv_reader.deserialize::<RosterRow>() {
            let row = row?;
            let email = normalize_email(&row.email);
            if !email.contains('@') {
                continue;
            }
            emails.insert(ProfileId(row.id.trim().to_string()), email);
        }

        Ok(Self { emails })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let emails = pairs
            .into_iter()
            .map(|(id, email)| (ProfileId(id.into()), normalize_email(email.as_ref())))
            .filter(|(_, email)| email.contains('@'))
            .collect();
        Self { emails }
    }

    pub fn email(&self, profile_id: &ProfileId) -> Option<&str> {
        self.emails.get(profile_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
