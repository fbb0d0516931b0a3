//! Parse, chunk and process command implementations.

use crate::cli::DocumentArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pactum_parser::{ContractParser, FsDocumentSource, PlainTextExtractor};
use std::path::Path;
use tracing::debug;

type FileParser = ContractParser<FsDocumentSource, PlainTextExtractor>;

/// Execute the parse command.
pub async fn execute_parse(args: DocumentArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (parser, document_id) = open(&args, config)?;
    let metadata = parser.parse(&document_id).await?;
    println!("{}", formatter.format_metadata(&metadata)?);
    Ok(())
}

/// Execute the chunk command.
pub async fn execute_chunk(args: DocumentArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (parser, document_id) = open(&args, config)?;
    let chunks = parser.chunk(&document_id).await?;
    println!("{}", formatter.format_chunks(&chunks)?);
    Ok(())
}

/// Execute the process command.
pub async fn execute_process(
    args: DocumentArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let (parser, document_id) = open(&args, config)?;
    let processed = parser.process(&document_id).await?;
    println!("{}", formatter.format_processed(&processed)?);
    Ok(())
}

/// Build a parser rooted at the file's directory; the file name is the document id.
fn open(args: &DocumentArgs, config: &Config) -> Result<(FileParser, String)> {
    let (root, document_id) = split_path(&args.file)?;

    let mut config = config.clone();
    if args.heuristic {
        config.use_heuristic_fallback();
    }

    debug!("Opening {} under {}", document_id, root.display());
    let parser = ContractParser::new(
        FsDocumentSource::new(root),
        PlainTextExtractor,
        config.parser.clone(),
        config.llm(),
    )?;

    Ok((parser, document_id))
}

fn split_path(file: &Path) -> Result<(&Path, String)> {
    let document_id = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::InvalidInput(format!("Not a file path: {}", file.display())))?
        .to_string();

    let root = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok((root, document_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use pactum_domain::StructuralType;
    use pactum_parser::ParserError;
    use std::fs;
    use tempfile::TempDir;

    const OFFER: &str = "EMPLOYMENT AGREEMENT

EMPLOYER: Acme Robotics Inc.
EMPLOYEE: Jane Doe

1. POSITION
Employee will serve as Staff Engineer reporting to the Chief Technology Officer and will work from the Denver office.

2. COMPENSATION
The base salary: $120,000 per year, paid in equal installments on the regular payroll schedule.

3. TERMINATION
Either party may terminate this Agreement with thirty days written notice to the other party.

4. CONFIDENTIALITY
Employee shall keep all confidential information of the Company secret during and after employment.

IN WITNESS WHEREOF, the parties have signed this Agreement.
By: ____________";

    fn config() -> Config {
        Config::load(
            None,
            ProviderSettings {
                model: None,
                ollama_url: "http://localhost:11434".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_split_path() {
        let (root, id) = split_path(Path::new("contracts/offer.txt")).unwrap();
        assert_eq!(root, Path::new("contracts"));
        assert_eq!(id, "offer.txt");

        let (root, id) = split_path(Path::new("offer.txt")).unwrap();
        assert_eq!(root, Path::new("."));
        assert_eq!(id, "offer.txt");

        assert!(split_path(Path::new("/")).is_err());
    }

    #[tokio::test]
    async fn test_open_and_parse_without_model() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("offer.txt");
        fs::write(&file, OFFER).unwrap();

        let args = DocumentArgs {
            file,
            heuristic: false,
        };
        let (parser, id) = open(&args, &config()).unwrap();
        assert!(!parser.is_ai_available());

        let metadata = parser.parse(&id).await.unwrap();
        assert_eq!(metadata.title.as_deref(), Some("EMPLOYMENT AGREEMENT"));
        assert_eq!(metadata.contract_value, Some(120_000.0));
    }

    #[tokio::test]
    async fn test_heuristic_flag_classifies() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("offer.txt");
        fs::write(&file, OFFER).unwrap();

        let args = DocumentArgs {
            file,
            heuristic: true,
        };
        let (parser, id) = open(&args, &config()).unwrap();
        let chunks = parser.chunk(&id).await.unwrap();
        assert_eq!(chunks.last().map(|c| c.chunk_type), Some(StructuralType::Signature));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let args = DocumentArgs {
            file: dir.path().join("nope.txt"),
            heuristic: false,
        };
        let (parser, id) = open(&args, &config()).unwrap();
        let err = parser.process(&id).await.unwrap_err();
        assert!(matches!(err, ParserError::DocumentNotFound(_)));

        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);
        let args = DocumentArgs {
            file: dir.path().join("nope.txt"),
            heuristic: false,
        };
        assert!(matches!(
            execute_parse(args, &config(), &formatter).await,
            Err(CliError::Parser(ParserError::DocumentNotFound(_)))
        ));
    }
}
