//! Decode LLM replies into structural labels and metadata records

use crate::error::ParserError;
use crate::metadata::rules::{is_plausible_party, normalize_term, parse_amount_str, parse_date};
use pactum_domain::{ContractMetadata, ExtractionMethod, StructuralType};
use serde_json::{Map, Value};

/// Decode a classification reply into a structural type
///
/// The reply is trimmed, split on whitespace and punctuation, and the first token is looked
/// up case-insensitively. `None` means the reply carried no known label.
pub fn decode_label(reply: &str) -> Option<StructuralType> {
    reply
        .trim()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .find(|token| !token.is_empty())
        .and_then(StructuralType::parse)
}

/// Remove markdown code fences (```json ... ```) around a reply
pub fn strip_code_fences(reply: &str) -> String {
    let trimmed = reply.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    trimmed
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Slice from the first `{` to the last `}`
pub fn isolate_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parse a metadata reply field by field
///
/// Missing, null or wrongly typed fields become empty values. Only a reply with no JSON
/// object at all, or one that fails to parse, is an error.
pub fn parse_metadata_response(reply: &str) -> Result<ContractMetadata, ParserError> {
    if reply.trim().is_empty() {
        return Err(ParserError::InvalidFormat("Empty reply".to_string()));
    }

    let unfenced = strip_code_fences(reply);
    let json_str = isolate_json_object(&unfenced)
        .ok_or_else(|| ParserError::InvalidFormat("No JSON object in reply".to_string()))?;

    let json: Value = serde_json::from_str(json_str)?;
    let obj = json
        .as_object()
        .ok_or_else(|| ParserError::InvalidFormat("Expected JSON object".to_string()))?;

    let mut metadata = ContractMetadata::empty(ExtractionMethod::Ai);
    metadata.title = string_field(obj, &["title"]);
    metadata.contract_date =
        string_field(obj, &["contractDate", "contract_date", "effectiveDate"]).and_then(|s| parse_date(&s));
    metadata.expiration_date =
        string_field(obj, &["expirationDate", "expiration_date", "endDate"]).and_then(|s| parse_date(&s));
    metadata.contract_value = value_field(obj, &["contractValue", "contract_value", "value"]);
    metadata.currency = string_field(obj, &["currency"])
        .map(|c| c.to_uppercase())
        .filter(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()));
    metadata.contract_type = string_field(obj, &["contractType", "contract_type", "type"]);

    metadata.set_parties(
        string_list(obj, &["parties"])
            .into_iter()
            .filter(|p| is_plausible_party(p)),
    );
    metadata.set_key_terms(
        string_list(obj, &["keyTerms", "key_terms"])
            .into_iter()
            .map(|t| normalize_term(&t)),
    );

    Ok(metadata)
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key)).filter(|v| !v.is_null())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let value = lookup(obj, keys)?.as_str()?.trim();
    let placeholder = ["", "null", "none", "n/a", "unknown"]
        .iter()
        .any(|p| value.eq_ignore_ascii_case(p));
    (!placeholder).then(|| value.to_string())
}

fn value_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    let amount = match lookup(obj, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount_str(s),
        _ => None,
    }?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn string_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    lookup(obj, keys)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_decode_label_variants() {
        assert_eq!(decode_label("header"), Some(StructuralType::Header));
        assert_eq!(decode_label("  Clause.\n"), Some(StructuralType::Clause));
        assert_eq!(decode_label("**Signature**"), Some(StructuralType::Signature));
        assert_eq!(decode_label("TERM - a definition"), Some(StructuralType::Term));
        assert_eq!(decode_label("condition: if either party"), Some(StructuralType::Condition));
    }

    #[test]
    fn test_decode_label_unknown_or_empty() {
        assert_eq!(decode_label(""), None);
        assert_eq!(decode_label("   "), None);
        assert_eq!(decode_label("other"), None);
        assert_eq!(decode_label("The label is clause"), None);
    }

    #[test]
    fn test_strip_code_fences() {
        let reply = "```json\n{\"title\": \"X\"}\n```";
        assert_eq!(strip_code_fences(reply), "{\"title\": \"X\"}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_isolate_json_object() {
        let reply = "Here you go: {\"a\": {\"b\": 1}} hope that helps";
        assert_eq!(isolate_json_object(reply), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(isolate_json_object("no json"), None);
        assert_eq!(isolate_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"```json
{
  "title": "Software License Agreement",
  "contractDate": "2024-03-01",
  "expirationDate": "March 1, 2029",
  "contractValue": 750000,
  "currency": "usd",
  "parties": ["Licensor Labs Inc.", "Beta Pharma LLC", "Licensor Labs Inc."],
  "keyTerms": ["Royalty", "exclusive   license", "royalty"],
  "contractType": "License Agreement"
}
```"#;

        let metadata = parse_metadata_response(reply).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Software License Agreement"));
        assert_eq!(metadata.contract_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(metadata.expiration_date, NaiveDate::from_ymd_opt(2029, 3, 1));
        assert_eq!(metadata.contract_value, Some(750_000.0));
        assert_eq!(metadata.currency.as_deref(), Some("USD"));
        assert_eq!(metadata.parties, vec!["Licensor Labs Inc.", "Beta Pharma LLC"]);
        assert_eq!(metadata.key_terms, vec!["exclusive license", "royalty"]);
        assert_eq!(metadata.contract_type.as_deref(), Some("License Agreement"));
        assert_eq!(metadata.extraction_method(), Some(ExtractionMethod::Ai));
    }

    #[test]
    fn test_wrong_typed_fields_default_to_empty() {
        let reply = r#"{
            "title": 42,
            "contractDate": "sometime soon",
            "contractValue": "$1,200,000.50",
            "currency": "dollars",
            "parties": "Acme",
            "keyTerms": [1, 2, "Severance"],
            "contractType": null
        }"#;

        let metadata = parse_metadata_response(reply).unwrap();
        assert!(metadata.title.is_none());
        assert!(metadata.contract_date.is_none());
        assert_eq!(metadata.contract_value, Some(1_200_000.5));
        assert!(metadata.currency.is_none());
        assert!(metadata.parties.is_empty());
        assert_eq!(metadata.key_terms, vec!["severance"]);
        assert!(metadata.contract_type.is_none());
    }

    #[test]
    fn test_placeholder_strings_are_empty() {
        let metadata = parse_metadata_response(r#"{"title": "N/A", "contractType": "unknown"}"#).unwrap();
        assert!(metadata.title.is_none());
        assert!(metadata.contract_type.is_none());
    }

    #[test]
    fn test_unparsable_replies_are_errors() {
        assert!(matches!(parse_metadata_response(""), Err(ParserError::InvalidFormat(_))));
        assert!(matches!(
            parse_metadata_response("I could not find any metadata."),
            Err(ParserError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_metadata_response("{\"title\": \"X\",}"),
            Err(ParserError::JsonParse(_))
        ));
    }
}
