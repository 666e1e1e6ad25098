use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::supabase::{write_users_csv, SupabaseClient};
use crate::telemetry;
use crate::workflows::admissions::{
    write_outputs, AdmissionPlan, AdmissionsService, CriterionWeights, OutputPaths,
    RankingConfig, Roster, SelectionPolicy, DEFAULT_STATUS_COLUMN, DEFAULT_WEIGHTS,
};

const CONFIRMATION_PROMPT: &str = "Type 'YES' to confirm database updates: ";

#[derive(Parser, Debug)]
#[command(
    name = "hackathon-admissions",
    about = "Rank hackathon teams from reviewer-normalized scores and offer admission to a target headcount",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match applications to teams, rank them and write the offer list
    Admit(AdmitArgs),
    /// Export auth users (id,email,...) to the roster CSV used by `admit`
    ExportUsers(ExportUsersArgs),
}

#[derive(Args, Debug)]
struct AdmitArgs {
    /// Ranked teams CSV
    #[arg(long, default_value = "team_scores.csv")]
    out: PathBuf,
    /// Roster CSV with at least id,email columns
    #[arg(long, default_value = "users.csv")]
    users: PathBuf,
    /// Offered teams CSV
    #[arg(long, default_value = "offered_teams.csv")]
    offered_teams_out: PathBuf,
    /// Offered application ids, one per line
    #[arg(long, default_value = "offered_app_ids.txt")]
    offered_ids_out: PathBuf,
    /// Update application statuses (disables the default dry run)
    #[arg(long = "no-dry-run")]
    no_dry_run: bool,
    /// Only the top N teams by score are candidates for offers (0 = no cap)
    #[arg(long, default_value_t = 0)]
    offer_top: usize,
    /// Minimum number of reviews for an application to count toward its team
    #[arg(long, default_value_t = 1)]
    min_reviews: usize,
    /// Criterion weights, e.g. resume_score=3,links_score=2,q1_score=7,q2_score=3
    #[arg(long, default_value = DEFAULT_WEIGHTS)]
    weights: CriterionWeights,
    /// Applications column holding the status (e.g. application_status)
    #[arg(long, default_value = DEFAULT_STATUS_COLUMN)]
    status_column: String,
    /// Number of people to admit
    #[arg(long)]
    target: usize,
    /// Teams still offered after the target is reached
    #[arg(long, default_value_t = SelectionPolicy::DEFAULT_OVERSHOOT)]
    overshoot_teams: usize,
}

impl AdmitArgs {
    fn ranking_config(&self) -> RankingConfig {
        RankingConfig {
            weights: self.weights.clone(),
            min_reviews: self.min_reviews,
            status_column: self.status_column.clone(),
            selection: SelectionPolicy {
                target_headcount: self.target,
                offer_top: (self.offer_top > 0).then_some(self.offer_top),
                overshoot_teams: self.overshoot_teams,
            },
        }
    }

    fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            ranked_teams: self.out.clone(),
            offered_teams: self.offered_teams_out.clone(),
            offered_application_ids: self.offered_ids_out.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct ExportUsersArgs {
    /// Destination CSV
    #[arg(long, default_value = "users.csv")]
    out: PathBuf,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Admit(args) => run_admit(config, args),
        Command::ExportUsers(args) => run_export_users(config, args),
    }
}

fn run_admit(config: AppConfig, args: AdmitArgs) -> Result<(), AppError> {
    let roster = Roster::from_path(&args.users)?;
    info!(path = %args.users.display(), profiles = roster.len(), "loaded roster");

    let client = SupabaseClient::new(config.supabase)?;
    let service = AdmissionsService::new(Arc::new(client), args.ranking_config());

    let plan = service.plan(&roster)?;
    let paths = args.output_paths();
    write_outputs(&plan, &paths)?;
    render_summary(&plan, &paths);

    if !args.no_dry_run {
        println!("DRY RUN: not updating application statuses.");
        return Ok(());
    }

    let stdin = io::stdin();
    if !confirm(stdin.lock(), io::stdout())? {
        println!("Aborted.");
        return Ok(());
    }

    let updated = service.accept_offers(&plan)?;
    println!(
        "Updated {} applications to {}='accepted'.",
        updated,
        service.config().status_column
    );
    Ok(())
}

fn run_export_users(config: AppConfig, args: ExportUsersArgs) -> Result<(), AppError> {
    let client = SupabaseClient::new(config.supabase)?;
    let users = client.list_users()?;

    let file = File::create(&args.out)?;
    write_users_csv(BufWriter::new(file), &users)?;
    println!("Wrote {} ({} users)", args.out.display(), users.len());
    Ok(())
}

/// Prompts on `output` and accepts only an exact `YES` line.
fn confirm<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<bool> {
    write!(output, "{CONFIRMATION_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']) == "YES")
}

fn render_summary(plan: &AdmissionPlan, paths: &OutputPaths) {
    let submitted = plan.applications.len();
    println!("Submitted applications: {submitted}");
    if !plan.unmatched.is_empty() {
        println!(
            "WARNING: {} applications could not be matched to a teams row by emails.",
            plan.unmatched.len()
        );
    }
    println!(
        "Wrote {} with {} teams.",
        paths.ranked_teams.display(),
        plan.ranked_teams.len()
    );
    println!("Target people: {}", plan.target_headcount);
    println!("Selected teams: {}", plan.selection.team_ids.len());
    println!(
        "People offered (rounded by team): {}",
        plan.selection.people_offered
    );
    println!(
        "Applications to offer: {}",
        plan.selection.offered_application_ids.len()
    );
    println!(
        "Wrote {} with {} teams",
        paths.offered_teams.display(),
        plan.selection.team_ids.len()
    );
}
