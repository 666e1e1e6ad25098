use crate::config::ConfigError;
use crate::supabase::SupabaseError;
use crate::telemetry::TelemetryError;
use crate::workflows::admissions::{AdmissionError, RepositoryError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Admission(AdmissionError),
    Supabase(SupabaseError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Admission(err) => write!(f, "{}", err),
            AppError::Supabase(err) => write!(f, "supabase error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Admission(err) => Some(err),
            AppError::Supabase(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<AdmissionError> for AppError {
    fn from(value: AdmissionError) -> Self {
        Self::Admission(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Admission(AdmissionError::Repository(value))
    }
}

impl From<SupabaseError> for AppError {
    fn from(value: SupabaseError) -> Self {
        Self::Supabase(value)
    }
}
