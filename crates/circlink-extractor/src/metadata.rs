//! Pattern-based metadata extraction from circular text
//!
//! Every function here is pure: text in, fields out. The file-reading shell
//! lives in [`crate::index`].
//!
//! Each field is resolved first-match-wins over an ordered rule list. For the
//! circular number the canonical regulator pattern always beats the generic
//! `Circular No.` label, wherever the two occur in the text.

use crate::error::ExtractionFailure;
use circlink_domain::CircularMetadata;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Subjects this short or shorter are treated as truncated matches
pub const MIN_SUBJECT_CHARS: usize = 10;

/// Vocabulary scanned for key terms, in reporting order
pub const KEY_TERM_VOCABULARY: &[&str] = &[
    "mutual fund",
    "portfolio manager",
    "stock broker",
    "stock exchange",
    "depository",
    "clearing corporation",
    "listing obligations",
    "insider trading",
    "takeover",
    "investment adviser",
    "research analyst",
    "alternative investment fund",
    "credit rating",
    "REIT",
    "InvIT",
    "KYC",
    "anti-money laundering",
    "cybersecurity",
    "risk management",
    "margin",
    "settlement",
    "disclosure",
    "compliance",
    "investor grievance",
];

/// Circular number rules, most specific first
static CIRCULAR_NUMBER_RULES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        // SEBI/HO/MRD/MRD-PoD-3/P/CIR/2023/45
        Regex::new(r"\bSEBI(?:/[A-Za-z0-9()_.\-]+){2,}").expect("valid regex"),
        // Circular No. 12/2023
        Regex::new(r"(?i)\bcircular\s+no\b\.?\s*[:\-]?\s*([A-Za-z0-9][A-Za-z0-9/_.\-]*)")
            .expect("valid regex"),
    ]
});

static SUBJECT_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:subject|re)[ \t]*:[ \t]*(.*)$").expect("valid regex")
});

/// One rule per vocabulary term: whole words, optional plural
static KEY_TERM_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    KEY_TERM_VOCABULARY
        .iter()
        .map(|term| {
            let pattern = format!(r"(?i)\b{}(?:s|es)?\b", regex::escape(term));
            (*term, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

static DATE_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("valid regex")
});

/// Extract metadata from the leading text of a circular
///
/// Returns an [`ExtractionFailure`] when the text holds nothing but whitespace.
///
/// # Examples
///
/// ```
/// use circlink_extractor::extract_metadata;
/// use std::path::Path;
///
/// let text = "CIRCULAR\nSEBI/HO/MRD/2023/45\nJune 5, 2023\nSubject: Margin framework for brokers";
/// let meta = extract_metadata(text, "circ45.pdf", Path::new("/docs/circ45.pdf")).unwrap();
/// assert_eq!(meta.circular_number.as_deref(), Some("SEBI/HO/MRD/2023/45"));
/// assert_eq!(meta.date.as_deref(), Some("June 5, 2023"));
/// assert_eq!(meta.key_terms, vec!["margin".to_string()]);
/// ```
pub fn extract_metadata(
    text: &str,
    filename: &str,
    path: &Path,
) -> Result<CircularMetadata, ExtractionFailure> {
    if text.trim().is_empty() {
        return Err(ExtractionFailure::new(filename, "no usable text"));
    }

    let mut meta = CircularMetadata::new(filename, path);
    meta.circular_number = extract_circular_number(text);
    meta.subject = extract_subject(text);
    meta.date = extract_date(text);
    meta.key_terms = extract_key_terms(text);
    Ok(meta)
}

/// Extract the circular number
pub fn extract_circular_number(text: &str) -> Option<String> {
    CIRCULAR_NUMBER_RULES.iter().find_map(|rule| {
        let caps = rule.captures(text)?;
        // Rules with a capture group report the group, the rest the whole match
        let raw = caps.get(1).or_else(|| caps.get(0))?.as_str();
        let value = trim_trailing_punctuation(raw);
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Extract the subject line
///
/// Only the first labelled line is considered. Its whitespace is collapsed and
/// the result is kept only if longer than [`MIN_SUBJECT_CHARS`].
pub fn extract_subject(text: &str) -> Option<String> {
    let caps = SUBJECT_RULE.captures(text)?;
    let subject = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
    (subject.chars().count() > MIN_SUBJECT_CHARS).then_some(subject)
}

/// Extract the first long-form date, verbatim
pub fn extract_date(text: &str) -> Option<String> {
    DATE_RULE.find(text).map(|m| m.as_str().to_string())
}

/// Extract the vocabulary terms present in the text, in vocabulary order
///
/// Terms match as whole words, so "margin" is not found in "marginal".
pub fn extract_key_terms(text: &str) -> Vec<String> {
    KEY_TERM_RULES
        .iter()
        .filter(|(_, rule)| rule.is_match(text))
        .map(|(term, _)| term.to_string())
        .collect()
}

fn trim_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(&['.', ',', ';', ':', '-'][..])
}
