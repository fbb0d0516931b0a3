//! Integration tests for the ContractParser

#[cfg(test)]
mod tests {
    use crate::{
        shared, ClassifierFallback, ContractParser, FsDocumentSource, InMemoryDocumentSource,
        ParserConfig, PlainTextExtractor, SplitStrategy,
    };
    use pactum_domain::{ExtractionMethod, StructuralType};
    use pactum_llm::MockProvider;
    use std::fs;
    use tempfile::TempDir;

    const SERVICE_AGREEMENT: &str = "SOFTWARE DEVELOPMENT AGREEMENT

This Agreement is dated February 10, 2025 between Orbit Apps LLC, a Texas limited liability company, and Helix Health Inc. (\"Client\").

CLIENT: Helix Health Inc.
DEVELOPER: Orbit Apps LLC

1. SCOPE OF WORK
Developer shall design, build and deploy a patient scheduling application as described in Exhibit A. The deliverables include source code, documentation and a deployment runbook.

2. PAYMENT
Client shall pay Developer in three milestone payments: $30,000 on kickoff, $40,000 on beta delivery and $30,000 on final acceptance. Invoices are payable within thirty days.

3. TERM AND TERMINATION
This Agreement ends on December 31, 2025. Either party may terminate this Agreement if the other party materially breaches it and fails to cure within fifteen days of notice.

4. INTELLECTUAL PROPERTY
Upon full payment, all work product and intellectual property in the deliverables transfer to Client. Developer keeps its pre-existing tools.

5. GOVERNING LAW
This Agreement is governed by the laws of the State of Texas, and any dispute will be resolved by arbitration in Austin.

IN WITNESS WHEREOF, the parties have executed this Agreement.
By: ____________ Name: Dana Ortiz";

    fn store() -> InMemoryDocumentSource {
        let mut source = InMemoryDocumentSource::new();
        source.insert_text("sda-1", SERVICE_AGREEMENT);
        source
    }

    #[tokio::test]
    async fn test_full_flow_without_ai() {
        let parser =
            ContractParser::new(store(), PlainTextExtractor, ParserConfig::default(), None).unwrap();

        let processed = parser.process("sda-1").await.unwrap();

        assert_eq!(processed.strategy, SplitStrategy::Structural);
        assert!(processed.chunks.len() >= 5);
        assert!(processed.chunks.iter().all(|c| c.chunk_type == StructuralType::Other));
        assert!(processed.chunks.iter().any(|c| c.section().map(|s| s.number) == Some(3)));

        let metadata = processed.metadata;
        assert_eq!(metadata.extraction_method(), Some(ExtractionMethod::RuleBased));
        assert_eq!(metadata.title.as_deref(), Some("SOFTWARE DEVELOPMENT AGREEMENT"));
        assert_eq!(metadata.contract_type.as_deref(), Some("Software Development Agreement"));
        assert_eq!(metadata.parties, vec!["Helix Health Inc.", "Orbit Apps LLC"]);
        assert_eq!(metadata.currency.as_deref(), Some("USD"));
        assert_eq!(metadata.contract_value, Some(40_000.0));
        assert!(metadata.key_terms.contains(&"deliverables".to_string()));
        assert!(metadata.key_terms.contains(&"arbitration".to_string()));
    }

    #[tokio::test]
    async fn test_full_flow_with_ai() {
        let mut mock = MockProvider::new("clause");
        mock.add_response("Extract structured metadata", r#"```json
{"title": "Software Development Agreement", "contractDate": "2025-02-10",
 "expirationDate": "2025-12-31", "contractValue": 100000, "currency": "USD",
 "parties": ["Orbit Apps LLC", "Helix Health Inc."], "keyTerms": ["milestones", "deliverables"],
 "contractType": "Software Development Agreement"}
```"#);
        mock.add_response("IN WITNESS WHEREOF, the parties have executed this Agreement.\nBy:", "signature");
        mock.add_response("---\n1. SCOPE OF WORK", "header");

        let parser = ContractParser::new(
            store(),
            PlainTextExtractor,
            ParserConfig::default(),
            Some(shared(mock.clone())),
        )
        .unwrap();

        let processed = parser.process("sda-1").await.unwrap();

        let metadata = &processed.metadata;
        assert_eq!(metadata.extraction_method(), Some(ExtractionMethod::Ai));
        assert_eq!(metadata.contract_value, Some(100_000.0));
        assert_eq!(metadata.custom_fields["model"], "mock");

        let types: Vec<_> = processed.chunks.iter().map(|c| c.chunk_type).collect();
        assert!(types.contains(&StructuralType::Clause));
        assert!(types.contains(&StructuralType::Header));
        assert_eq!(types.last(), Some(&StructuralType::Signature));
        assert_eq!(mock.call_count(), processed.chunks.len() + 1);
    }

    #[tokio::test]
    async fn test_heuristic_fallback_end_to_end() {
        let config = ParserConfig {
            classifier_fallback: ClassifierFallback::Heuristic,
            ..ParserConfig::default()
        };
        let parser = ContractParser::new(store(), PlainTextExtractor, config, None).unwrap();

        let chunks = parser.chunk("sda-1").await.unwrap();
        assert_eq!(chunks.last().map(|c| c.chunk_type), Some(StructuralType::Signature));
        assert!(chunks.iter().any(|c| c.chunk_type == StructuralType::Condition));
    }

    #[tokio::test]
    async fn test_fs_source_end_to_end() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sda.txt"), SERVICE_AGREEMENT).unwrap();
        fs::write(dir.path().join("sda.pdf"), b"%PDF-1.7").unwrap();

        let parser = ContractParser::new(
            FsDocumentSource::new(dir.path()),
            PlainTextExtractor,
            ParserConfig::default(),
            None,
        )
        .unwrap();

        let chunks = parser.chunk("sda.txt").await.unwrap();
        assert!(!chunks.is_empty());
        assert!(parser.parse("sda.pdf").await.unwrap_err().is_fatal());
        assert!(parser.parse("nope.txt").await.unwrap_err().is_fatal());
        assert!(parser.parse("../sda.txt").await.unwrap_err().is_fatal());
    }
}
