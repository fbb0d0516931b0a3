//! Pactum CLI - Command-line interface for the contract parser.

use clap::Parser;
use pactum_cli::commands;
use pactum_cli::{Cli, Command, Config, Formatter, ProviderSettings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> pactum_cli::Result<()> {
    let config = Config::load(
        cli.config.as_deref(),
        ProviderSettings {
            model: cli.model,
            ollama_url: cli.ollama_url,
        },
    )?;

    if config.provider.model.is_none() && !matches!(cli.command, Command::Config(_)) {
        eprintln!(
            "{}",
            formatter.warning("No model configured; using rule-based extraction")
        );
    }

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &config, formatter).await?,
        Command::Chunk(args) => commands::execute_chunk(args, &config, formatter).await?,
        Command::Process(args) => commands::execute_process(args, &config, formatter).await?,
        Command::Config(args) => commands::execute_config(args, &config, formatter)?,
    }

    Ok(())
}
