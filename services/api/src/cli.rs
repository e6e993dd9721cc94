use crate::demo::{
    run_allot, run_assess, run_demo, run_standing, AllotArgs, AssessArgs, DemoArgs, StandingArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use merit_counsel::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Merit Counsel",
    about = "Evaluate program eligibility and simulate seat allotment for merit-based admission counselling",
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
    /// Compute composites and list eligible programs for one candidate
    Assess(AssessArgs),
    /// Simulate a single allotment round for a rank and preference list
    Allot(AllotArgs),
    /// Show percentile and tier for a rank
    Standing(StandingArgs),
    /// Walk through the reference eligibility and allotment scenarios
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Catalog CSV to serve instead of COUNSEL_CATALOG_PATH or the built-in sample
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Allot(args) => run_allot(args),
        Command::Standing(args) => run_standing(args),
        Command::Demo(args) => run_demo(args),
    }
}
