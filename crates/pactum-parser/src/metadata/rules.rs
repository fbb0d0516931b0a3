//! Deterministic, pattern-based metadata extractors
//!
//! Seven independent extractors run over the raw text: title, parties, contract date,
//! expiration date, value, currency and key terms. Contract type is derived from the title.
//! Given the same text, the output is identical on every call apart from `extractionDate`.

use super::patterns::{patterns, KeyTermDomain, PatternSet, ValueCategory};
use crate::error::ParserError;
use chrono::{Datelike, NaiveDate};
use pactum_domain::{ContractMetadata, ExtractionMethod};
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const TITLE_SCAN_LINES: usize = 5;
const MIN_FALLBACK_TITLE_CHARS: usize = 10;
const MIN_PARTY_CHARS: usize = 4;
const MAX_PARTY_CHARS: usize = 120;
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1990..=2100;

/// Last words that mark a quoted phrase as a defined term rather than a party
const DEFINED_TERM_ENDINGS: &[&str] = &[
    "Agreement",
    "Information",
    "Date",
    "Property",
    "Product",
    "Products",
    "Patents",
    "Services",
    "Period",
    "Term",
    "Territory",
    "Field",
    "Materials",
    "Rights",
    "Technology",
    "Software",
    "Fee",
    "Fees",
    "Payment",
    "Payments",
    "Deliverables",
];

const ENTITY_ABBREVIATIONS: &[&str] = &["Inc", "Corp", "Ltd", "Co", "L.L.C", "S.A", "N.V", "B.V"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d %Y", "%d %B %Y", "%b %d %Y", "%d %b %Y"];

/// Run every rule-based extractor over `text`
///
/// Fails only when the pattern tables are unusable.
pub fn extract(text: &str) -> Result<ContractMetadata, ParserError> {
    let patterns = patterns()?;
    let mut metadata = ContractMetadata::empty(ExtractionMethod::RuleBased);

    metadata.title = extract_title(patterns, text);
    metadata.contract_type = metadata
        .title
        .as_deref()
        .and_then(|title| contract_type(patterns, title));
    metadata.set_parties(extract_parties(patterns, text));
    metadata.contract_date = first_date(&patterns.contract_dates, text);
    metadata.expiration_date = first_date(&patterns.expiration_dates, text);
    metadata.contract_value = extract_value(patterns, text);
    metadata.currency = extract_currency(patterns, text);

    let (terms, domains) = extract_key_terms(patterns, text);
    metadata.set_key_terms(terms);
    metadata.custom_fields.insert(
        "keyTermDomains".into(),
        Value::Array(
            domains
                .iter()
                .map(|domain| Value::from(domain.as_str()))
                .collect(),
        ),
    );

    Ok(metadata)
}

fn extract_title(patterns: &PatternSet, text: &str) -> Option<String> {
    let head = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(TITLE_SCAN_LINES);

    for line in head {
        for pattern in &patterns.titles {
            let found = pattern
                .captures(line)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)));
            if let Some(title) = found {
                let title = title.as_str().trim();
                if !title.is_empty() {
                    return Some(title.to_string());
                }
            }
        }
    }

    text.lines()
        .map(str::trim)
        .find(|line| line.chars().count() > MIN_FALLBACK_TITLE_CHARS)
        .map(str::to_string)
}

fn contract_type(patterns: &PatternSet, title: &str) -> Option<String> {
    patterns
        .contract_types
        .iter()
        .find(|(pattern, _)| pattern.is_match(title))
        .map(|(_, label)| label.to_string())
}

fn extract_parties(patterns: &PatternSet, text: &str) -> Vec<String> {
    let mut parties = Vec::new();
    for pattern in &patterns.parties {
        for caps in pattern.captures_iter(text) {
            for group in caps.iter().skip(1).flatten() {
                let candidate = clean_party(group.as_str());
                if is_plausible_party(&candidate) && !is_defined_term(&candidate) {
                    parties.push(candidate);
                }
            }
        }
    }
    parties
}

/// Strip role descriptions and punctuation from a party candidate
fn clean_party(raw: &str) -> String {
    let mut name = raw.trim();
    for cut in [" (", ", a ", ", an ", " a corporation", " an individual"] {
        if let Some(pos) = name.find(cut) {
            name = &name[..pos];
        }
    }
    for lead in ["between ", "and ", "by "] {
        if let Some(rest) = name
            .get(..lead.len())
            .filter(|head| head.eq_ignore_ascii_case(lead))
            .and_then(|_| name.get(lead.len()..))
        {
            name = rest;
        }
    }
    let name = name
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '"' | '\u{201C}' | '\u{201D}'));

    // Keep the period of "Inc." and friends, drop a sentence-ending one
    match name.strip_suffix('.') {
        Some(stem) if !ENTITY_ABBREVIATIONS.iter().any(|abbr| stem.ends_with(abbr)) => stem.to_string(),
        _ => name.to_string(),
    }
}

fn is_defined_term(name: &str) -> bool {
    name.split_whitespace()
        .last()
        .is_some_and(|last| DEFINED_TERM_ENDINGS.contains(&last))
}

/// Whether a string can stand as a party name
///
/// Rejects short strings, URLs, pure numbers and anything not starting with an uppercase
/// letter or digit.
pub fn is_plausible_party(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_PARTY_CHARS..=MAX_PARTY_CHARS).contains(&len) {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    if lower.contains("http://") || lower.contains("https://") || lower.starts_with("www.") {
        return false;
    }
    if name.chars().all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, ',' | '.' | '-')) {
        return false;
    }
    name.chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
}

fn first_date(candidates: &[Regex], text: &str) -> Option<NaiveDate> {
    candidates.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| parse_date(m.as_str()))
    })
}

/// Parse a written date in one of the common contract formats
///
/// Accepts ISO (`2024-03-01`), US numeric (`3/1/2024`), and month-name forms with optional
/// ordinals and commas (`March 1st, 2024`, `1 Sept. 2024`). Years outside 1990..=2100 are
/// rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let normalized = raw
        .replace([',', '.'], " ")
        .split_whitespace()
        .filter(|token| !token.eq_ignore_ascii_case("of"))
        .map(normalize_date_token)
        .collect::<Vec<_>>()
        .join(" ");

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}

fn normalize_date_token(token: &str) -> String {
    if token.eq_ignore_ascii_case("sept") {
        return "Sep".to_string();
    }
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    let suffix = &token[digits..];
    if digits > 0 && ["st", "nd", "rd", "th"].iter().any(|s| suffix.eq_ignore_ascii_case(s)) {
        return token[..digits].to_string();
    }
    token.to_string()
}

fn extract_value(patterns: &PatternSet, text: &str) -> Option<f64> {
    let mut buckets: BTreeMap<ValueCategory, Vec<f64>> = BTreeMap::new();
    for (category, pattern) in &patterns.values {
        for caps in pattern.captures_iter(text) {
            if let Some(amount) = amount_from_captures(&caps) {
                buckets.entry(*category).or_default().push(amount);
            }
        }
    }

    let first = |category: ValueCategory| buckets.get(&category).and_then(|hits| hits.first().copied());

    let upfront = first(ValueCategory::UpfrontFee);
    let royalty = first(ValueCategory::MinimumRoyalty);
    if upfront.is_some() || royalty.is_some() {
        let milestone = first(ValueCategory::Milestone);
        let total = upfront.unwrap_or(0.0) + royalty.unwrap_or(0.0) + milestone.unwrap_or(0.0);
        return Some(round_cents(total));
    }

    if let Some(salary) = first(ValueCategory::BaseSalary) {
        return Some(salary);
    }

    buckets.values().flatten().copied().reduce(f64::max)
}

/// Sums of cent amounts pick up binary noise in `f64`; snap back to whole cents
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn amount_from_captures(caps: &Captures<'_>) -> Option<f64> {
    let number = caps.get(1)?.as_str();
    let scale = caps.get(2).map(|m| m.as_str());
    scaled_amount(number, scale)
}

fn scaled_amount(number: &str, scale: Option<&str>) -> Option<f64> {
    let base: f64 = number.replace(',', "").trim_end_matches('.').parse().ok()?;
    let factor = match scale {
        Some(s) if s.eq_ignore_ascii_case("million") || s == "MM" || s.eq_ignore_ascii_case("m") => {
            1_000_000.0
        }
        Some(s) if s.eq_ignore_ascii_case("thousand") || s.eq_ignore_ascii_case("k") => 1_000.0,
        _ => 1.0,
    };
    let amount = base * factor;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Parse a free-standing amount string such as `"$1,200,000"` or `"2.5 million"`
pub fn parse_amount_str(raw: &str) -> Option<f64> {
    let patterns = patterns().ok()?;
    let caps = patterns.amount.captures(raw)?;
    amount_from_captures(&caps)
}

fn extract_currency(patterns: &PatternSet, text: &str) -> Option<String> {
    if text.contains('$') {
        return Some("USD".to_string());
    }
    patterns
        .currency_code
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_key_terms(patterns: &PatternSet, text: &str) -> (BTreeSet<String>, BTreeSet<KeyTermDomain>) {
    let mut terms = BTreeSet::new();
    let mut domains = BTreeSet::new();
    for (domain, pattern) in &patterns.key_terms {
        for m in pattern.find_iter(text) {
            terms.insert(normalize_term(m.as_str()));
            domains.insert(*domain);
        }
    }
    (terms, domains)
}

/// Lower-case a term and collapse internal whitespace
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPLOYMENT: &str = "EMPLOYMENT AGREEMENT\n\n\
        This Employment Agreement is made as of January 15, 2024.\n\n\
        EMPLOYER: Acme Robotics Inc., a Delaware corporation\n\
        EMPLOYEE: Jane Doe\n\n\
        1. COMPENSATION\n\
        Employee shall receive a base salary of $120,000 per year and a signing bonus of $10,000.\n\n\
        2. TERM\n\
        Employment is at-will. This Agreement terminates on December 31, 2026.\n\n\
        3. RESTRICTIVE COVENANTS\n\
        Employee agrees to a non-compete and non-solicitation period of twelve months.";

    const LICENSE: &str = "PATENT LICENSE AGREEMENT\n\n\
        This Agreement is entered into between Licensor Labs LLC and Beta Pharma Corp. (\"Licensee\").\n\n\
        LICENSOR: Licensor Labs LLC\n\
        LICENSEE: Beta Pharma Corp.\n\n\
        Licensee shall pay an upfront fee of $250,000 within thirty days.\n\
        The minimum annual royalty is $50,000.\n\
        A milestone payment of $100,000 is due on first commercial sale, and a second milestone payment of $400,000 on approval.\n\
        Royalties are 4% of net sales in the territory. Licensee may not sublicense without consent.";

    fn run(text: &str) -> ContractMetadata {
        extract(text).unwrap()
    }

    #[test]
    fn test_employment_contract() {
        let metadata = run(EMPLOYMENT);

        assert_eq!(metadata.title.as_deref(), Some("EMPLOYMENT AGREEMENT"));
        assert_eq!(metadata.contract_type.as_deref(), Some("Employment Agreement"));
        assert_eq!(metadata.parties, vec!["Acme Robotics Inc.", "Jane Doe"]);
        assert_eq!(metadata.contract_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(metadata.expiration_date, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(metadata.contract_value, Some(120_000.0));
        assert_eq!(metadata.currency.as_deref(), Some("USD"));
        assert!(metadata.key_terms.contains(&"base salary".to_string()));
        assert!(metadata.key_terms.contains(&"non-compete".to_string()));
        assert!(metadata.key_terms.contains(&"at-will".to_string()));
        assert_eq!(metadata.extraction_method(), Some(ExtractionMethod::RuleBased));
    }

    #[test]
    fn test_license_value_sums_fee_royalty_and_first_milestone() {
        let metadata = run(LICENSE);

        assert_eq!(metadata.contract_value, Some(400_000.0));
        assert_eq!(metadata.contract_type.as_deref(), Some("License Agreement"));
        assert_eq!(metadata.parties, vec!["Licensor Labs LLC", "Beta Pharma Corp."]);

        let domains = metadata.custom_fields["keyTermDomains"].as_array().unwrap();
        assert!(domains.contains(&Value::from("license")));
    }

    #[test]
    fn test_license_shape_wins_over_salary() {
        let text = "Upfront fee: $500,000\nBase salary: $90,000";
        assert_eq!(run(text).contract_value, Some(500_000.0));
    }

    #[test]
    fn test_license_sum_is_whole_cents() {
        let text = "Upfront fee: $100.10 on signing.\nMinimum annual royalty: $200.20 per year.";
        assert_eq!(run(text).contract_value, Some(300.3));
        assert_eq!(round_cents(100.1 + 200.2), 300.3);
    }

    #[test]
    fn test_generic_value_is_maximum() {
        let text = "Phase one costs $20,000. Phase two costs $35,500.50. Hosting is $1,000.";
        assert_eq!(run(text).contract_value, Some(35_500.5));
    }

    #[test]
    fn test_scaled_amounts() {
        assert_eq!(scaled_amount("2.5", Some("million")), Some(2_500_000.0));
        assert_eq!(scaled_amount("150", Some("K")), Some(150_000.0));
        assert_eq!(scaled_amount("0", None), None);
        assert_eq!(parse_amount_str("$1,200,000"), Some(1_200_000.0));
        assert_eq!(parse_amount_str("no amount"), None);
    }

    #[test]
    fn test_title_label_and_fallback() {
        assert_eq!(
            run("Title: Master Hosting Terms\nSome body text follows.").title.as_deref(),
            Some("Master Hosting Terms")
        );
        assert_eq!(
            run("short\nThis line is the first long one\nmore").title.as_deref(),
            Some("This line is the first long one")
        );
        assert_eq!(
            run("Consulting Services Agreement\nbody").contract_type.as_deref(),
            Some("Service Agreement")
        );
    }

    #[test]
    fn test_between_clause_parties() {
        let text = "This Agreement is made between Northwind Traders, a Washington company, and Contoso Ltd (\"Vendor\").";
        let metadata = run(text);
        assert_eq!(metadata.parties[0], "Northwind Traders");
        assert!(metadata.parties.contains(&"Contoso Ltd".to_string()));
    }

    #[test]
    fn test_quoted_defined_terms_are_not_parties() {
        let text = "\"Confidential Information\" means data. \"Effective Date\" means today. \"Blue Harbor Partners\" is a party.";
        let metadata = run(text);
        assert_eq!(metadata.parties, vec!["Blue Harbor Partners"]);
    }

    #[test]
    fn test_party_plausibility() {
        assert!(is_plausible_party("Acme Inc."));
        assert!(!is_plausible_party("Bob"));
        assert!(!is_plausible_party("https://acme.example"));
        assert!(!is_plausible_party("123,456"));
        assert!(!is_plausible_party("the parties"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("3/1/2024"), expected);
        assert_eq!(parse_date("March 1st, 2024"), expected);
        assert_eq!(parse_date("1 March 2024"), expected);
        assert_eq!(parse_date("1st of March, 2024"), expected);
        assert_eq!(parse_date("Mar. 1, 2024"), expected);
        assert_eq!(parse_date("Sept 9, 2024"), NaiveDate::from_ymd_opt(2024, 9, 9));
        assert_eq!(parse_date("June 1, 1850"), None);
        assert_eq!(parse_date("next Tuesday"), None);
    }

    #[test]
    fn test_currency_code_without_symbol() {
        assert_eq!(run("Fees are 5,000 EUR per month.").currency.as_deref(), Some("EUR"));
        assert!(run("No money here.").currency.is_none());
    }

    #[test]
    fn test_key_terms_sorted_deduped_and_capped() {
        let text = "Royalty royalty ROYALTY. Governing law. Force majeure. Arbitration. Termination. \
            Warranty. Indemnification. Limitation of liability. Patents. Copyright. Trade secrets. \
            Work product. Confidentiality. Intellectual property. Equity. Benefits. Vacation. \
            Commission. Stock options. Severance. Deliverables. Milestones.";
        let metadata = run(text);

        assert_eq!(metadata.key_terms.len(), 20);
        let mut sorted = metadata.key_terms.clone();
        sorted.sort();
        assert_eq!(metadata.key_terms, sorted);
        assert_eq!(metadata.key_terms.iter().filter(|t| *t == "royalty").count(), 1);
    }

    #[test]
    fn test_rule_based_is_deterministic() {
        let mut first = run(LICENSE);
        let mut second = run(LICENSE);
        first.custom_fields.remove("extractionDate");
        second.custom_fields.remove("extractionDate");
        assert_eq!(first, second);
    }
}
