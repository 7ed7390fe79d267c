use crate::demo::{render_result, render_settlement, run_demo};
use crate::infra::{load_json, PreviewRequest, ScoreRequest};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scoreline::config::AppConfig;
use scoreline::error::AppError;
use scoreline::settlement::ScoringEngine;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Scoreline",
    about = "Settle football match predictions and serve the scoring API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a prediction against a result read from a JSON file
    Score(InputArgs),
    /// Show the best-case points for a prediction read from a JSON file
    Preview(InputArgs),
    /// Walk through the rulebook scenarios and a small gameweek
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// JSON file holding the request body
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the raw JSON instead of a breakdown table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Preview(args) => run_preview(args),
        Command::Demo => run_demo(),
    }
}

fn configured_engine() -> Result<ScoringEngine, AppError> {
    let config = AppConfig::load()?;
    Ok(ScoringEngine::new(config.scoring))
}

fn run_score(args: InputArgs) -> Result<(), AppError> {
    let request: ScoreRequest = load_json(&args.input)?;
    let outcome = configured_engine()?.score(&request.prediction, request.result.as_ref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_result(&outcome);
    }
    Ok(())
}

fn run_preview(args: InputArgs) -> Result<(), AppError> {
    let request: PreviewRequest = load_json(&args.input)?;
    let settlement = configured_engine()?.potential(&request.prediction);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settlement)?);
    } else {
        println!("Best case");
        render_settlement(&settlement);
    }
    Ok(())
}
