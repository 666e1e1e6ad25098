//! Blocking client for the hosted Postgres REST and auth admin endpoints.

mod rows;
pub mod users;

pub use users::{write_users_csv, AuthUser};

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SupabaseConfig;
use crate::workflows::admissions::{
    AdmissionsRepository, ApplicationId, ApplicationRecord, RepositoryError, ReviewRecord,
    TeamRecord,
};
use rows::Row;

const APPLICATIONS: &str = "applications";
const REVIEWS: &str = "reviews";
const TEAMS: &str = "teams";

pub struct SupabaseClient {
    config: SupabaseConfig,
    http: Client,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = Client::builder().build().map_err(SupabaseError::Client)?;
        Ok(Self { config, http })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    /// Pages through a table with offset/limit until a short page comes back.
    fn fetch_all(&self, table: &str, select: &str) -> Result<Vec<Row>, RepositoryError> {
        let page_size = self.config.page_size;
        let mut collected = Vec::new();
        let mut offset = 0usize;

        loop {
            let request = self.authorize(self.http.get(self.table_url(table))).query(&[
                ("select", select.to_string()),
                ("offset", offset.to_string()),
                ("limit", page_size.to_string()),
            ]);
            let page: Vec<Row> = send_json(table, request)?;
            let fetched = page.len();
            debug!(table, offset, fetched, "fetched page");
            collected.extend(page);

            if fetched < page_size {
                break;
            }
            offset += page_size;
        }

        info!(table, rows = collected.len(), "fetched table");
        Ok(collected)
    }

    /// Every user registered with the auth service, paging by `page_size`.
    pub fn list_users(&self) -> Result<Vec<AuthUser>, SupabaseError> {
        let per_page = self.config.page_size;
        let url = format!("{}/auth/v1/admin/users", self.config.url);
        let mut everyone = Vec::new();
        let mut page = 1usize;

        loop {
            let request = self.authorize(self.http.get(&url)).query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ]);
            let listing: users::UserPage =
                send_json("auth users", request).map_err(SupabaseError::Users)?;
            let fetched = listing.users.len();
            debug!(page, fetched, "fetched auth users page");
            everyone.extend(listing.users);

            if fetched < per_page {
                break;
            }
            page += 1;
        }

        info!(users = everyone.len(), "listed auth users");
        Ok(everyone)
    }
}

impl AdmissionsRepository for SupabaseClient {
    fn applications(&self, status_column: &str) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let select = format!("id,profile_id,team_members,{status_column}");
        let fetched = self.fetch_all(APPLICATIONS, &select)?;

        if !fetched.is_empty() && !fetched.iter().any(|row| row.contains_key(status_column)) {
            return Err(RepositoryError::MissingColumn(status_column.to_string()));
        }

        Ok(fetched
            .iter()
            .map(|row| rows::application(row, status_column))
            .collect())
    }

    fn reviews(&self, criteria: &[&str]) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let mut columns = vec!["application_id", "reviewer_id"];
        columns.extend_from_slice(criteria);
        let fetched = self.fetch_all(REVIEWS, &columns.join(","))?;

        Ok(fetched
            .iter()
            .map(|row| rows::review(row, criteria))
            .collect())
    }

    fn teams(&self) -> Result<Vec<TeamRecord>, RepositoryError> {
        let mut columns = vec!["id", "team_name"];
        columns.extend_from_slice(&rows::TEAM_MEMBER_COLUMNS);
        let fetched = self.fetch_all(TEAMS, &columns.join(","))?;

        Ok(fetched.iter().map(rows::team).collect())
    }

    fn set_status(
        &self,
        ids: &[ApplicationId],
        status_column: &str,
        status: &str,
    ) -> Result<usize, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut body = serde_json::Map::new();
        body.insert(status_column.to_string(), Value::from(status));

        let request = self
            .authorize(self.http.patch(self.table_url(APPLICATIONS)))
            .query(&[("id", rows::in_filter(ids)), ("select", "id".to_string())])
            .header("Prefer", "return=representation")
            .json(&body);
        let updated: Vec<Row> = send_json(APPLICATIONS, request)?;
        Ok(updated.len())
    }
}

fn send_json<T: DeserializeOwned>(
    table: &str,
    request: RequestBuilder,
) -> Result<T, RepositoryError> {
    let response = request.send().map_err(|source| RepositoryError::Transport {
        table: table.to_string(),
        source,
    })?;
    let response = ensure_success(table, response)?;
    response.json::<T>().map_err(|err| RepositoryError::Decode {
        table: table.to_string(),
        detail: err.to_string(),
    })
}

fn ensure_success(table: &str, response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(RepositoryError::Status {
        table: table.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Failures outside the admissions tables: client setup and the user export.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("listing auth users failed: {0}")]
    Users(#[source] RepositoryError),
    #[error("could not write user export: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not write user export: {0}")]
    Io(#[from] std::io::Error),
}
