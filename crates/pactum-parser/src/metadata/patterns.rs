//! Regex tables for the rule-based metadata extractors
//!
//! The tables compile once, lazily. A table that fails to compile is reported through
//! [`patterns`] as an error instead of panicking, so callers can degrade to an empty record.

use crate::error::ParserError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Which kind of amount a value pattern recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ValueCategory {
    UpfrontFee,
    MinimumRoyalty,
    Milestone,
    BaseSalary,
    SigningBonus,
    Total,
    Amount,
}

/// Subject area of a key-term pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyTermDomain {
    /// Salary, bonuses, equity, benefits
    Compensation,
    /// IP ownership and confidentiality
    IntellectualProperty,
    /// Termination, liability, governing law
    Legal,
    /// Royalties, exclusivity, sublicensing
    License,
    /// Restrictive covenants and employment status
    Employment,
    /// Scope, deliverables, milestones
    Service,
}

impl KeyTermDomain {
    /// Get the domain name as stored in `keyTermDomains`
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyTermDomain::Compensation => "compensation",
            KeyTermDomain::IntellectualProperty => "intellectual_property",
            KeyTermDomain::Legal => "legal",
            KeyTermDomain::License => "license",
            KeyTermDomain::Employment => "employment",
            KeyTermDomain::Service => "service",
        }
    }
}

pub(crate) struct PatternSet {
    /// Whole-line title shapes; a capture group, when present, holds the title
    pub titles: Vec<Regex>,
    /// Party patterns in priority order; every capture group is one candidate
    pub parties: Vec<Regex>,
    /// Contract date patterns, phrase-anchored first; group 1 is the date
    pub contract_dates: Vec<Regex>,
    /// Expiration date patterns; group 1 is the date
    pub expiration_dates: Vec<Regex>,
    /// Category-tagged amounts; group 1 is the number, group 2 an optional scale word
    pub values: Vec<(ValueCategory, Regex)>,
    /// Number with optional scale, for free-standing amount strings
    pub amount: Regex,
    pub currency_code: Regex,
    /// Title phrase to contract type label, first match wins
    pub contract_types: Vec<(Regex, &'static str)>,
    pub key_terms: Vec<(KeyTermDomain, Regex)>,
}

static PATTERNS: Lazy<Result<PatternSet, regex::Error>> = Lazy::new(PatternSet::build);

/// The compiled pattern tables
pub(crate) fn patterns() -> Result<&'static PatternSet, ParserError> {
    PATTERNS
        .as_ref()
        .map_err(|e| ParserError::Pattern(e.to_string()))
}

const MONTH: &str = "(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)";

const AMOUNT: &str = r"(?:\$|\bUSD\s?)?\s*([0-9][0-9,]*(?:\.[0-9]+)?)(?:\s*(million|thousand|MM|[MmKk])\b)?";

const CURRENCY_CODES: &str = "USD|EUR|GBP|CAD|AUD|JPY|CHF|CNY|INR|SGD|NZD|HKD|SEK|NOK|DKK|MXN|BRL|ZAR";

impl PatternSet {
    fn build() -> Result<Self, regex::Error> {
        let date = format!(
            r"(?:{m}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}|\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{m}\.?,?\s+\d{{4}}|\d{{4}}-\d{{2}}-\d{{2}}|\d{{1,2}}/\d{{1,2}}/\d{{4}})",
            m = MONTH
        );

        let titles = compile(&[
            r"^[A-Z0-9][A-Z0-9 &,.'\-]*\b(?:AGREEMENT|CONTRACT)\b[A-Z0-9 &,.'()\-]*$",
            r"^(?:(?:[A-Z][A-Za-z&'\-]*|of|and|for|the)\s+){0,8}(?:Agreement|Contract)$",
            r"(?i)^title\s*:\s*(.+)$",
        ])?;

        let parties = compile(&[
            r"(?m)^[ \t]*(?:EMPLOYER|EMPLOYEE)[ \t]*:[ \t]*(.+)$",
            r"(?m)^[ \t]*(?:CLIENT|DEVELOPER|SERVICE PROVIDER|PROVIDER|CONTRACTOR|VENDOR|CONSULTANT)[ \t]*:[ \t]*(.+)$",
            r"(?m)^[ \t]*(?:LICENSOR|LICENSEE)[ \t]*:[ \t]*(.+)$",
            r"(?i)\bbetween\s+([^\n]+?)\s+and\s+([^\n]+?)(?:\s*[,;(]|[ \t]*\r?\n|[ \t]*$|\.[ \t]+(?:the|this|these|each|both|in|whereas|now)\b)",
            r"\b((?:[A-Z][A-Za-z0-9&'\-]*[ \t]+){0,5}[A-Z][A-Za-z0-9&'\-]*,?[ \t]+(?:Inc\b\.?|LLC\b|Ltd\b\.?|Limited\b|Corp\b\.?|Corporation\b|Company\b|GmbH\b|LLP\b|PLC\b))",
            r#"["\u{201C}]([A-Z][A-Za-z0-9&.,'\-]*(?:[ \t]+[A-Z][A-Za-z0-9&.,'\-]*)+)["\u{201D}]"#,
        ])?;

        let contract_dates = compile(&[
            &format!(r"(?i)\bas\s+of\s+({})", date),
            &format!(r"(?i)\bdated\s+(?:as\s+of\s+)?({})", date),
            &format!(r"(?i)\b(?:executed|signed|effective)\b[^\n\d]{{0,30}}?({})", date),
            &format!(r"(?i)({})", date),
        ])?;

        let expiration_dates = compile(&[
            &format!(r"(?i)\b(?:expir\w*|terminat\w*)\b[^\n\d]{{0,40}}?({})", date),
            &format!(r"(?i)\b(?:end|ends|ending|until|through)\b[^\n\d]{{0,20}}?({})", date),
        ])?;

        let values = [
            (
                ValueCategory::UpfrontFee,
                r"(?i)\b(?:upfront|up-front|initial|license|licence)\s+(?:license\s+)?fee\b[^\d\n]{0,40}?",
            ),
            (
                ValueCategory::MinimumRoyalty,
                r"(?i)\bminimum\s+(?:annual\s+)?royalt(?:y|ies)\b[^\d\n]{0,40}?",
            ),
            (
                ValueCategory::Milestone,
                r"(?i)\b(?:milestone|achievement)\s+payments?\b[^\d\n]{0,60}?",
            ),
            (
                ValueCategory::BaseSalary,
                r"(?i)\b(?:base|annual)\s+salary\b[^\d\n]{0,40}?",
            ),
            (
                ValueCategory::SigningBonus,
                r"(?i)\b(?:signing|sign-on)\s+bonus\b[^\d\n]{0,40}?",
            ),
            (
                ValueCategory::Total,
                r"(?i)\b(?:total|aggregate)\s+(?:contract\s+)?(?:price|value|amount|fees?|compensation|cost)\b[^\d\n]{0,40}?",
            ),
        ]
        .iter()
        .map(|(category, prefix)| Ok((*category, Regex::new(&format!("{}{}", prefix, AMOUNT))?)))
        .chain(std::iter::once(Ok((
            ValueCategory::Amount,
            Regex::new(r"(?:\$|\bUSD\s?)\s*([0-9][0-9,]*(?:\.[0-9]+)?)(?:\s*(million|thousand|MM|[MmKk])\b)?")?,
        ))))
        .collect::<Result<Vec<_>, regex::Error>>()?;

        let amount = Regex::new(r"([0-9][0-9,]*(?:\.[0-9]+)?)(?:\s*(million|thousand|MM|[MmKk])\b)?")?;
        let currency_code = Regex::new(&format!(r"\b({})\b", CURRENCY_CODES))?;

        let contract_types = [
            (r"(?i)\blicen[cs]e", "License Agreement"),
            (r"(?i)\bemployment\b", "Employment Agreement"),
            (r"(?i)\boffer\s+letter\b", "Offer Letter"),
            (r"(?i)\bsoftware\s+development\b|\bdevelopment\s+agreement\b", "Software Development Agreement"),
            (r"(?i)\bservices?\b|\bconsulting\b|\bMSA\b|\bstatement\s+of\s+work\b|\bSOW\b", "Service Agreement"),
            (r"(?i)\bpurchase\b", "Purchase Agreement"),
            (r"(?i)\blease\b", "Lease Agreement"),
            (r"(?i)\bnon-?disclosure\b|\bNDA\b|\bconfidentiality\s+agreement\b", "Non-Disclosure Agreement"),
            (r"(?i)\bindependent\s+contractor\b", "Independent Contractor Agreement"),
        ]
        .iter()
        .map(|(pattern, label)| Ok((Regex::new(pattern)?, *label)))
        .collect::<Result<Vec<_>, regex::Error>>()?;

        let key_terms = KEY_TERMS
            .iter()
            .map(|(domain, pattern)| Ok((*domain, Regex::new(&format!(r"(?i)\b(?:{})\b", pattern))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            titles,
            parties,
            contract_dates,
            expiration_dates,
            values,
            amount,
            currency_code,
            contract_types,
            key_terms,
        })
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

const KEY_TERMS: &[(KeyTermDomain, &str)] = &[
    (KeyTermDomain::Compensation, r"base\s+salary"),
    (KeyTermDomain::Compensation, r"signing\s+bonus"),
    (KeyTermDomain::Compensation, r"(?:annual|performance)\s+bonus"),
    (KeyTermDomain::Compensation, r"stock\s+options?"),
    (KeyTermDomain::Compensation, r"equity"),
    (KeyTermDomain::Compensation, r"benefits"),
    (KeyTermDomain::Compensation, r"paid\s+time\s+off|vacation"),
    (KeyTermDomain::Compensation, r"commissions?"),
    (KeyTermDomain::IntellectualProperty, r"intellectual\s+property"),
    (KeyTermDomain::IntellectualProperty, r"confidential\s+information|confidentiality"),
    (KeyTermDomain::IntellectualProperty, r"trade\s+secrets?"),
    (KeyTermDomain::IntellectualProperty, r"work\s+(?:product|for\s+hire)"),
    (KeyTermDomain::IntellectualProperty, r"patents?"),
    (KeyTermDomain::IntellectualProperty, r"copyrights?"),
    (KeyTermDomain::Legal, r"termination"),
    (KeyTermDomain::Legal, r"limitation\s+of\s+liability"),
    (KeyTermDomain::Legal, r"indemnification|indemnify"),
    (KeyTermDomain::Legal, r"governing\s+law"),
    (KeyTermDomain::Legal, r"arbitration"),
    (KeyTermDomain::Legal, r"force\s+majeure"),
    (KeyTermDomain::Legal, r"warranty|warranties"),
    (KeyTermDomain::License, r"royalty|royalties"),
    (KeyTermDomain::License, r"exclusive|exclusivity"),
    (KeyTermDomain::License, r"sublicense|sublicensing"),
    (KeyTermDomain::License, r"upfront\s+fee|license\s+fee"),
    (KeyTermDomain::License, r"field\s+of\s+use"),
    (KeyTermDomain::License, r"territory"),
    (KeyTermDomain::Employment, r"non-?compete|non-?competition"),
    (KeyTermDomain::Employment, r"non-?solicitation"),
    (KeyTermDomain::Employment, r"severance"),
    (KeyTermDomain::Employment, r"at-will|at\s+will"),
    (KeyTermDomain::Employment, r"probationary\s+period|probation\s+period"),
    (KeyTermDomain::Service, r"scope\s+of\s+(?:work|services)"),
    (KeyTermDomain::Service, r"deliverables?"),
    (KeyTermDomain::Service, r"milestones?"),
    (KeyTermDomain::Service, r"acceptance\s+(?:criteria|testing)"),
    (KeyTermDomain::Service, r"service\s+levels?"),
    (KeyTermDomain::Service, r"payment\s+terms"),
];
