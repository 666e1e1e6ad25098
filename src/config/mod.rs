use std::env;
use std::fmt;

/// Top-level configuration for a run, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let telemetry = TelemetryConfig::from_env();
        let supabase = SupabaseConfig::from_env()?;

        Ok(Self {
            supabase,
            telemetry,
        })
    }
}

/// Connection settings for the hosted Postgres REST and auth endpoints.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
    pub page_size: usize,
}

impl SupabaseConfig {
    pub const PAGE_SIZE: usize = 1000;

    pub fn from_env() -> Result<Self, ConfigError> {
        let url = non_empty_var("SUPABASE_URL").ok_or(ConfigError::MissingUrl)?;
        let service_key = non_empty_var("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| non_empty_var("SUPABASE_KEY"))
            .ok_or(ConfigError::MissingKey)?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            service_key,
            page_size: Self::PAGE_SIZE,
        })
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        Self { log_level }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    MissingUrl,
    MissingKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingUrl => write!(f, "SUPABASE_URL must be set"),
            ConfigError::MissingKey => write!(
                f,
                "SUPABASE_SERVICE_ROLE_KEY (preferred) or SUPABASE_KEY must be set"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
