//! Landline CLI - fetch and cache greenway geometry from ArcGIS Online.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use commands::layers::LayersArgs;
use commands::summary::SummaryArgs;
use commands::token::TokenArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "landline")]
#[command(version = landline::VERSION)]
#[command(about = "Fetch and cache greenway geometry from ArcGIS Online feature services", long_about = None)]
struct Cli {
    /// Enable debug logging (also mirrored to stderr)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a feature service layer and print it as GeoJSON
    Fetch(FetchArgs),
    /// List the layers of a feature service
    Layers(LayersArgs),
    /// Request an access token with AGOL_CLIENT_ID / AGOL_CLIENT_SECRET
    Token(TokenArgs),
    /// Tally greenway facility types in one or more services
    Summary(SummaryArgs),
    /// Manage the geometry cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        e.exit();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let debug = cli.debug;
    let runner = || CliRunner::with_debug(debug);

    match cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, &runner()?),
        Commands::Layers(args) => commands::layers::run(args, &runner()?),
        Commands::Token(args) => commands::token::run(args, &runner()?),
        Commands::Summary(args) => commands::summary::run(args, &runner()?),
        Commands::Cache { action } => commands::cache::run(action, &runner()?),
        Commands::Config { command } => commands::config::run(command),
    }
}
