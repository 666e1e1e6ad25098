mod cli;
pub mod config;
pub mod error;
pub mod supabase;
pub mod telemetry;
pub mod workflows;

use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
