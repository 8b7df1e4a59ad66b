//! widgetctl CLI - HTTP API for widgets and their client-domain installations
//!
//! Subcommands:
//! - `serve`: run the JSON API against Postgres
//! - `init-schema`: create the widgets/installations tables if missing

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::serve::{InitSchemaArgs, ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "widgetctl",
    author,
    version,
    about = "Widget catalogue and installation licensing API",
    long_about = "Serve a JSON API for managing licensable widgets, their installations on \
                  client domains, and installation expiry dates."
)]
struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create missing database tables and exit
    InitSchema(InitSchemaArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitSchema(args) => commands::run_init_schema(args).await?,
    }
    Ok(())
}
