use super::domain::{ApplicationId, ApplicationRecord, ReviewRecord, TeamRecord};

/// Access to the hosted tables so the service can be exercised in isolation.
pub trait AdmissionsRepository {
    /// Every application row. `status_column` names the column holding the status.
    fn applications(&self, status_column: &str) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    /// Every review row, reading one score column per criterion.
    fn reviews(&self, criteria: &[&str]) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn teams(&self) -> Result<Vec<TeamRecord>, RepositoryError>;
    /// Sets `status_column` to `status` on the given applications and returns
    /// how many rows the backend reports as changed.
    fn set_status(
        &self,
        ids: &[ApplicationId],
        status_column: &str,
        status: &str,
    ) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("request to {table} failed: {source}")]
    Transport {
        table: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{table} responded with {status}: {body}")]
    Status {
        table: String,
        status: u16,
        body: String,
    },
    #[error("{table} returned an unexpected payload: {detail}")]
    Decode { table: String, detail: String },
    #[error("applications table missing column '{0}'")]
    MissingColumn(String),
}
