//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use pactum_domain::{Chunk, ContractMetadata};
use pactum_parser::{ParserConfig, ProcessedDocument};
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format contract metadata.
    pub fn format_metadata(&self, metadata: &ContractMetadata) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(metadata)?),
            OutputFormat::Table => Ok(self.metadata_table(metadata)),
            OutputFormat::Quiet => Ok(metadata.title.clone().unwrap_or_default()),
        }
    }

    /// Format chunks.
    pub fn format_chunks(&self, chunks: &[Chunk]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(chunks)?),
            OutputFormat::Table => Ok(self.chunks_table(chunks)),
            OutputFormat::Quiet => Ok(chunks
                .iter()
                .map(|c| c.chunk_type.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a processed document.
    pub fn format_processed(&self, processed: &ProcessedDocument) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(processed)?),
            OutputFormat::Table => Ok(format!(
                "{}\n{}\n{}",
                self.metadata_table(&processed.metadata),
                self.info(&format!(
                    "{} chunk(s), {} segmentation",
                    processed.chunks.len(),
                    processed.strategy
                )),
                self.chunks_table(&processed.chunks)
            )),
            OutputFormat::Quiet => {
                let mut lines = vec![processed.metadata.title.clone().unwrap_or_default()];
                lines.extend(processed.chunks.iter().map(|c| c.chunk_type.as_str().to_string()));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a parser configuration (TOML unless JSON was asked for).
    pub fn format_config(&self, config: &ParserConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            _ => config.to_toml().map_err(CliError::Config),
        }
    }

    fn metadata_table(&self, metadata: &ContractMetadata) -> String {
        let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
        let list = |items: &[String]| {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.join("\n")
            }
        };
        let value = metadata.contract_value.map(|v| match &metadata.currency {
            Some(currency) => format!("{:.2} {}", v, currency),
            None => format!("{:.2}", v),
        });
        let method = metadata
            .extraction_method()
            .map(|m| m.as_str().to_string());

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Title".to_string(), or_dash(metadata.title.clone())]);
        builder.push_record(["Type".to_string(), or_dash(metadata.contract_type.clone())]);
        builder.push_record(["Parties".to_string(), list(&metadata.parties)]);
        builder.push_record([
            "Contract date".to_string(),
            or_dash(metadata.contract_date.map(|d| d.to_string())),
        ]);
        builder.push_record([
            "Expiration".to_string(),
            or_dash(metadata.expiration_date.map(|d| d.to_string())),
        ]);
        builder.push_record(["Value".to_string(), or_dash(value)]);
        builder.push_record(["Key terms".to_string(), list(&metadata.key_terms)]);
        builder.push_record(["Method".to_string(), or_dash(method)]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn chunks_table(&self, chunks: &[Chunk]) -> String {
        if chunks.is_empty() {
            return self.colorize("No chunks produced.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Type", "Offsets", "Section", "Preview"]);

        for chunk in chunks {
            let section = chunk
                .section()
                .map(|s| format!("{}. {}", s.number, s.title))
                .unwrap_or_default();
            let preview = match chunk.metadata.get("preview") {
                Some(Value::String(p)) => p.clone(),
                _ => String::new(),
            };
            builder.push_record([
                chunk.index.to_string(),
                chunk.chunk_type.to_string(),
                format!("{}..{}", chunk.start_offset, chunk.end_offset),
                section,
                preview,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pactum_domain::{ExtractionMethod, StructuralType};
    use pactum_parser::{ChunkAssembler, SplitStrategy};

    fn metadata() -> ContractMetadata {
        let mut metadata = ContractMetadata::empty(ExtractionMethod::RuleBased);
        metadata.title = Some("EMPLOYMENT AGREEMENT".to_string());
        metadata.contract_value = Some(120_000.0);
        metadata.currency = Some("USD".to_string());
        metadata.set_parties(["Acme Robotics Inc.".to_string(), "Jane Doe".to_string()]);
        metadata
    }

    fn chunks() -> Vec<Chunk> {
        let texts = vec![
            "1. POSITION\nEmployee will serve as Staff Engineer.".to_string(),
            "IN WITNESS WHEREOF the parties sign below.".to_string(),
        ];
        ChunkAssembler::default().assemble(
            &texts,
            &[StructuralType::Clause, StructuralType::Signature],
            "offer",
        )
    }

    #[test]
    fn test_metadata_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_metadata(&metadata()).unwrap();
        assert!(output.contains("EMPLOYMENT AGREEMENT"));
        assert!(output.contains("120000.00 USD"));
        assert!(output.contains("Jane Doe"));
        assert!(output.contains("rule-based"));
    }

    #[test]
    fn test_metadata_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_metadata(&metadata()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "EMPLOYMENT AGREEMENT");
    }

    #[test]
    fn test_chunks_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_chunks(&chunks()).unwrap();
        assert_eq!(output, "clause\nsignature");
    }

    #[test]
    fn test_chunks_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_chunks(&chunks()).unwrap();
        assert!(output.contains("1. POSITION"));
        assert!(output.contains("signature"));

        let empty = formatter.format_chunks(&[]).unwrap();
        assert!(empty.contains("No chunks produced"));
    }

    #[test]
    fn test_processed_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let processed = ProcessedDocument {
            document_id: "offer".to_string(),
            strategy: SplitStrategy::Paragraph,
            metadata: metadata(),
            chunks: chunks(),
        };
        let output = formatter.format_processed(&processed).unwrap();
        assert_eq!(output, "EMPLOYMENT AGREEMENT\nclause\nsignature");
    }

    #[test]
    fn test_config_toml() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_config(&ParserConfig::default()).unwrap();
        assert!(output.contains("max_chunk_size = 700"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.warning("test"), "⚠ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
