//! LLM prompt engineering for chunk classification and metadata extraction

/// Builds the prompt that asks for one structural label for a chunk
pub struct ClassificationPrompt<'a> {
    chunk: &'a str,
    prefix_chars: usize,
}

impl<'a> ClassificationPrompt<'a> {
    /// Create a new classification prompt builder (800 character prefix)
    pub fn new(chunk: &'a str) -> Self {
        Self {
            chunk,
            prefix_chars: 800,
        }
    }

    /// Limit how much of the chunk is sent
    pub fn with_prefix_chars(mut self, prefix_chars: usize) -> Self {
        self.prefix_chars = prefix_chars;
        self
    }

    /// Build the complete classification prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(CLASSIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Text to classify:\n");
        prompt.push_str("---\n");
        prompt.push_str(char_prefix(self.chunk, self.prefix_chars));
        prompt.push_str("\n---\n\n");

        prompt.push_str(CLASSIFICATION_REMINDER);
        prompt
    }
}

/// Builds the prompt that asks for the document-level metadata JSON
pub struct MetadataPrompt<'a> {
    text: &'a str,
    prefix_chars: usize,
    backoff_chars: usize,
}

impl<'a> MetadataPrompt<'a> {
    /// Create a new metadata prompt builder (20 000 character cap, 500 character backoff)
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            prefix_chars: 20_000,
            backoff_chars: 500,
        }
    }

    /// Set the prefix cap and the paragraph backoff window
    pub fn with_limits(mut self, prefix_chars: usize, backoff_chars: usize) -> Self {
        self.prefix_chars = prefix_chars;
        self.backoff_chars = backoff_chars;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let excerpt = truncate_at_paragraph(self.text, self.prefix_chars, self.backoff_chars);
        let mut prompt = String::new();

        prompt.push_str(METADATA_INSTRUCTIONS);
        prompt.push_str("\n\n");

        if excerpt.len() < self.text.len() {
            prompt.push_str("Note: the contract is truncated; extract what is present.\n\n");
        }

        prompt.push_str("Contract text:\n");
        prompt.push_str("---\n");
        prompt.push_str(excerpt);
        prompt.push_str("\n---\n\n");

        prompt.push_str(METADATA_OUTPUT_FORMAT);
        prompt
    }
}

/// First `max_chars` characters of `text`
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cap `text` at `cap` characters, backing off to a paragraph break found within the last
/// `backoff` characters of the cap
pub fn truncate_at_paragraph(text: &str, cap: usize, backoff: usize) -> &str {
    let prefix = char_prefix(text, cap);
    if prefix.len() == text.len() || backoff == 0 {
        return prefix;
    }

    let window_start = prefix
        .char_indices()
        .rev()
        .nth(backoff - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    match prefix[window_start..].rfind("\n\n") {
        Some(pos) => &prefix[..window_start + pos],
        None => prefix,
    }
}

const CLASSIFICATION_INSTRUCTIONS: &str = r#"Classify the structural role of the following contract excerpt.
Answer with exactly one label: header, clause, term, condition or signature.

Labels and cues:
- header: document titles, party blocks, recitals, numbered section headings with little body text.
  Employment: "EMPLOYMENT AGREEMENT", "EMPLOYER: Acme Inc." / Service: "MASTER SERVICES AGREEMENT",
  "1. SCOPE OF SERVICES" / License: "PATENT LICENSE AGREEMENT", "LICENSOR: ... LICENSEE: ..."
- clause: operative obligations and rights, usually with "shall", "will", "agrees to".
  Employment: duties, compensation, benefits / Service: deliverables, payment schedule, warranties /
  License: grant of rights, royalty payments, reporting duties
- term: definitions and defined terms, "means", "shall mean", "is defined as", lists of definitions.
  Employment: "Cause means..." / Service: "Deliverables means..." / License: "Licensed Patents means..."
- condition: conditional or contingent provisions: "if", "unless", "provided that", "in the event",
  "either party may terminate". Employment: termination for cause, at-will provisions /
  Service: acceptance criteria, cure periods / License: milestone triggers, reversion of rights
- signature: signature blocks, execution lines, acknowledgements, "IN WITNESS WHEREOF",
  "By: ____", "Name:", "Title:", "Date:", "Acknowledged and agreed".

Examples:
"3. COMPENSATION" -> header
"Employee shall receive a base salary of $120,000 per year, paid bi-weekly." -> clause
"'Confidential Information' means all non-public information disclosed by either party." -> term
"If Client fails to pay any invoice within 30 days, Developer may suspend the work." -> condition
"IN WITNESS WHEREOF, the parties have executed this Agreement. By: ______ Name: Jane Doe" -> signature"#;

const CLASSIFICATION_REMINDER: &str =
    "Respond with the single label only, in lowercase, with no punctuation or explanation.";

const METADATA_INSTRUCTIONS: &str = r#"Extract structured metadata from the contract below.

Rules:
- title: the contract's own title as written, or null
- contractDate: the execution or effective date as YYYY-MM-DD, or null
- expirationDate: the expiration or end date as YYYY-MM-DD, or null; compute it when the term is
  stated relative to the effective date
- contractValue: one number without currency symbols or separators, chosen by contract type:
  - Service / software development agreements: the total contract price; if payment is split into
    milestones, sum all milestone payments
  - Employment agreements and offer letters: the annual base salary; add a signing bonus only when
    it is a fixed, guaranteed amount
  - IP / patent / technology license agreements: the upfront license fee plus the first-year
    minimum royalty plus the first milestone payment
  - Otherwise: the largest stated total amount; null if no amount is stated
- currency: ISO 4217 code such as USD or EUR, or null
- parties: legal names of the contracting parties (companies or people), no roles or addresses
- keyTerms: up to 20 short lowercase phrases naming the important concepts (e.g. "base salary",
  "non-compete", "royalty", "intellectual property", "deliverables")
- contractType: a short title-case label such as "Employment Agreement", "License Agreement",
  "Service Agreement", "Non-Disclosure Agreement", or null"#;

const METADATA_OUTPUT_FORMAT: &str = r#"Output format (one JSON object only, no additional text):
{
  "title": "string or null",
  "contractDate": "YYYY-MM-DD or null",
  "expirationDate": "YYYY-MM-DD or null",
  "contractValue": 0,
  "currency": "USD",
  "parties": ["string"],
  "keyTerms": ["string"],
  "contractType": "string or null"
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
