//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pactum CLI - Split contracts into typed chunks and extract their metadata.
#[derive(Debug, Parser)]
#[command(name = "pactum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Parser configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ollama model; without one every stage runs on its rule-based fallback
    #[arg(short, long, global = true, env = "PACTUM_MODEL")]
    pub model: Option<String>,

    /// Ollama endpoint
    #[arg(
        long,
        global = true,
        env = "PACTUM_OLLAMA_URL",
        default_value = pactum_llm::ollama::DEFAULT_ENDPOINT
    )]
    pub ollama_url: String,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (titles and chunk types only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract contract metadata
    Parse(DocumentArgs),

    /// Split a contract into typed chunks
    Chunk(DocumentArgs),

    /// Extract metadata and chunks in one pass
    Process(DocumentArgs),

    /// Print the effective parser configuration
    Config(ConfigArgs),
}

/// Arguments for the document commands.
#[derive(Debug, Parser)]
pub struct DocumentArgs {
    /// Contract file (plain text)
    pub file: PathBuf,

    /// Classify chunks with keyword heuristics when no model answers
    #[arg(long)]
    pub heuristic: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Start from a preset instead of the defaults
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced defaults
    Default,
    /// Smaller prompts, short timeouts
    Aggressive,
    /// Larger prompts, long timeouts
    Lenient,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for pactum_parser::ParserConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => pactum_parser::ParserConfig::default(),
            PresetArg::Aggressive => pactum_parser::ParserConfig::aggressive(),
            PresetArg::Lenient => pactum_parser::ParserConfig::lenient(),
        }
    }
}
