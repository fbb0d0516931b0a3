//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use pactum_parser::ParserConfig;

/// Execute the config command.
///
/// A preset replaces the loaded file; otherwise the effective configuration is printed.
pub fn execute_config(args: ConfigArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let parser = render(args, config);
    println!("{}", formatter.format_config(&parser)?);
    Ok(())
}

fn render(args: ConfigArgs, config: &Config) -> ParserConfig {
    match args.preset {
        Some(preset) => preset.into(),
        None => config.parser.clone(),
    }
}
