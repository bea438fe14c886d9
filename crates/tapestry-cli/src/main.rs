//! Tapestry CLI - Content organization from the command line.

use clap::Parser;
use tapestry_cli::commands;
use tapestry_cli::{Cli, Command, Formatter, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so command output stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);
    let session = Session::load(cli.config.as_deref(), cli.fixture.as_deref())?;

    match cli.command {
        Command::Analyze(args) => commands::execute_analyze(args, &session, &formatter).await?,
        Command::Organize(args) => commands::execute_organize(args, &session, &formatter).await?,
        Command::Network(args) => commands::execute_network(args, &session, &formatter).await?,
        Command::Pathways(args) => commands::execute_pathways(args, &session, &formatter).await?,
        Command::Suggest(args) => commands::execute_suggest(args, &session, &formatter).await?,
        Command::Config(args) => commands::execute_config(args, &session, &formatter).await?,
    }

    Ok(())
}
