//! Contract metadata - the document-level summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Maximum number of parties kept on a record
pub const MAX_PARTIES: usize = 10;

/// Maximum number of key terms kept on a record
pub const MAX_KEY_TERMS: usize = 20;

/// Which extraction path produced a metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Generative model reply
    #[serde(rename = "ai")]
    Ai,

    /// Deterministic pattern extractors
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl ExtractionMethod {
    /// Get the method tag as stored in `customFields`
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Ai => "ai",
            ExtractionMethod::RuleBased => "rule-based",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured metadata for one contract
///
/// Every field is optional or empty by default; `custom_fields` always carries
/// `extractionMethod` and `extractionDate`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    /// Contract title
    pub title: Option<String>,

    /// Execution or effective date
    pub contract_date: Option<NaiveDate>,

    /// Expiration or termination date
    pub expiration_date: Option<NaiveDate>,

    /// Headline monetary value in `currency` units
    ///
    /// Stored as `f64` so it serializes as a plain JSON number; summed values are rounded to
    /// whole cents.
    pub contract_value: Option<f64>,

    /// ISO 4217 currency code
    pub currency: Option<String>,

    /// Contracting parties (deduplicated, at most 10)
    pub parties: Vec<String>,

    /// Key terms (deduplicated, sorted, at most 20)
    pub key_terms: Vec<String>,

    /// Contract archetype in title case, e.g. "Employment Agreement"
    pub contract_type: Option<String>,

    /// Extraction bookkeeping and extra fields
    pub custom_fields: Map<String, Value>,
}

impl ContractMetadata {
    /// Create an all-empty record stamped with the extraction method and today's date
    ///
    /// # Examples
    ///
    /// ```
    /// use pactum_domain::{ContractMetadata, ExtractionMethod};
    ///
    /// let metadata = ContractMetadata::empty(ExtractionMethod::RuleBased);
    /// assert!(metadata.title.is_none());
    /// assert_eq!(metadata.extraction_method(), Some(ExtractionMethod::RuleBased));
    /// ```
    pub fn empty(method: ExtractionMethod) -> Self {
        let mut custom_fields = Map::new();
        custom_fields.insert("extractionMethod".into(), Value::from(method.as_str()));
        custom_fields.insert(
            "extractionDate".into(),
            Value::from(chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        );
        Self {
            custom_fields,
            ..Default::default()
        }
    }

    /// Read back the extraction method from `custom_fields`
    pub fn extraction_method(&self) -> Option<ExtractionMethod> {
        match self.custom_fields.get("extractionMethod")?.as_str()? {
            "ai" => Some(ExtractionMethod::Ai),
            "rule-based" => Some(ExtractionMethod::RuleBased),
            _ => None,
        }
    }

    /// True when nothing beyond bookkeeping was extracted
    pub fn is_blank(&self) -> bool {
        self.title.is_none()
            && self.contract_date.is_none()
            && self.expiration_date.is_none()
            && self.contract_value.is_none()
            && self.currency.is_none()
            && self.parties.is_empty()
            && self.key_terms.is_empty()
            && self.contract_type.is_none()
    }

    /// Set parties, deduplicating in first-seen order and capping at [`MAX_PARTIES`]
    pub fn set_parties<I>(&mut self, parties: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for party in parties {
            let party = party.trim().to_string();
            if party.is_empty() || kept.contains(&party) {
                continue;
            }
            kept.push(party);
            if kept.len() == MAX_PARTIES {
                break;
            }
        }
        self.parties = kept;
    }

    /// Set key terms, deduplicating, sorting and capping at [`MAX_KEY_TERMS`]
    pub fn set_key_terms<I>(&mut self, terms: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        terms.truncate(MAX_KEY_TERMS);
        self.key_terms = terms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_records_method_and_date() {
        let metadata = ContractMetadata::empty(ExtractionMethod::Ai);
        assert_eq!(metadata.custom_fields["extractionMethod"], "ai");
        assert!(metadata.custom_fields.contains_key("extractionDate"));
        assert!(metadata.is_blank());
    }

    #[test]
    fn test_set_parties_dedups_and_caps() {
        let mut metadata = ContractMetadata::default();
        let parties = (0..15)
            .map(|i| format!("Party {}", i % 12))
            .chain(std::iter::once("Party 0".to_string()));
        metadata.set_parties(parties);

        assert_eq!(metadata.parties.len(), MAX_PARTIES);
        assert_eq!(metadata.parties[0], "Party 0");
        assert_eq!(metadata.parties[9], "Party 9");
    }

    #[test]
    fn test_set_key_terms_sorts_and_caps() {
        let mut metadata = ContractMetadata::default();
        let mut terms: Vec<String> = (0..30).map(|i| format!("term {:02}", i)).collect();
        terms.push("term 05".to_string());
        terms.reverse();
        metadata.set_key_terms(terms);

        assert_eq!(metadata.key_terms.len(), MAX_KEY_TERMS);
        assert_eq!(metadata.key_terms[0], "term 00");
        assert_eq!(metadata.key_terms[19], "term 19");
    }

    #[test]
    fn test_extraction_method_serialization() {
        assert_eq!(serde_json::to_string(&ExtractionMethod::RuleBased).unwrap(), "\"rule-based\"");
        assert_eq!(ExtractionMethod::Ai.to_string(), "ai");
    }
}
