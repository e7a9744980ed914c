//! Reference module - candidate and resolved references between circulars
//!
//! A [`CandidateReference`] is an unresolved guess, produced by the inference
//! collaborator, that a document cites another regulatory document. Resolving
//! it against the local index yields a [`Resolution`]: either a drop decision
//! for self-references or a [`ResolvedReference`] tagged with its
//! [`Availability`].

use crate::circular::{CircularMetadata, MatchedCircular};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory attached to every reference with no local counterpart
pub const EXTERNAL_NOTE: &str = "Not in the local collection; obtain this document separately";

/// Confidence tag reported by the inference collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Explicit, unambiguous citation
    High,
    /// Probable citation
    Medium,
    /// Weak or indirect mention
    Low,
    /// Tag missing or unrecognised
    #[default]
    Unknown,
}

impl Confidence {
    /// Parse a confidence tag leniently; anything unrecognised is `Unknown`
    ///
    /// # Examples
    ///
    /// ```
    /// use circlink_domain::Confidence;
    ///
    /// assert_eq!(Confidence::parse(" HIGH "), Confidence::High);
    /// assert_eq!(Confidence::parse("certain"), Confidence::Unknown);
    /// ```
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An unresolved reference found inside the analyzed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateReference {
    /// Exact text of the reference in the source document
    pub text: String,

    /// Kind of document referred to (circular, master_circular, regulation, ...)
    #[serde(rename = "type")]
    pub reference_type: String,

    /// Circular number, if the reference carries one
    pub circular_number: Option<String>,

    /// Title of the referenced document
    pub title: Option<String>,

    /// Page of the source document the reference appears on
    pub page: Option<u32>,

    /// Surrounding text
    pub context: String,

    /// Confidence tag
    pub confidence: Confidence,

    /// Why the collaborator considers this a reference
    pub reasoning: String,

    /// Local index key the collaborator matched, `None` when there is no local match
    pub matched_target: Option<String>,
}

/// Three-way availability classification of a resolved candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The candidate points at the document under analysis
    SelfReference,
    /// The candidate points at a document held locally
    AvailableLocally,
    /// The candidate points at a document not held locally
    ExternalReference,
}

impl Classification {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::SelfReference => "self_reference",
            Classification::AvailableLocally => "available_locally",
            Classification::ExternalReference => "external_reference",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Availability of a materialized reference
///
/// Self-references are never materialized, so they have no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "availability", rename_all = "snake_case")]
pub enum Availability {
    /// Matched a local circular
    AvailableLocally {
        /// Snapshot of the matched circular's metadata
        local_metadata: MatchedCircular,
    },
    /// No local counterpart
    ExternalReference {
        /// Advisory for the reader
        note: String,
    },
}

/// A candidate reference together with its availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReference {
    /// The candidate as produced by normalization
    #[serde(flatten)]
    pub candidate: CandidateReference,

    /// Availability classification
    #[serde(flatten)]
    pub availability: Availability,
}

impl ResolvedReference {
    /// Resolve a candidate as available locally
    pub fn available_locally(candidate: CandidateReference, matched: &CircularMetadata) -> Self {
        Self {
            candidate,
            availability: Availability::AvailableLocally {
                local_metadata: matched.snapshot(),
            },
        }
    }

    /// Resolve a candidate as external
    pub fn external(candidate: CandidateReference) -> Self {
        Self {
            candidate,
            availability: Availability::ExternalReference {
                note: EXTERNAL_NOTE.to_string(),
            },
        }
    }

    /// Classification of this reference
    pub fn classification(&self) -> Classification {
        match self.availability {
            Availability::AvailableLocally { .. } => Classification::AvailableLocally,
            Availability::ExternalReference { .. } => Classification::ExternalReference,
        }
    }

    /// Check if the reference is available locally
    pub fn is_local(&self) -> bool {
        matches!(self.availability, Availability::AvailableLocally { .. })
    }

    /// Matched local metadata, if any
    pub fn local_metadata(&self) -> Option<&MatchedCircular> {
        match &self.availability {
            Availability::AvailableLocally { local_metadata } => Some(local_metadata),
            Availability::ExternalReference { .. } => None,
        }
    }
}

/// Outcome of resolving one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate cites the document under analysis; it is dropped
    SelfReference {
        /// The index key that matched the source document
        target: String,
    },
    /// The candidate was materialized
    Resolved(ResolvedReference),
}

impl Resolution {
    /// Classification of the outcome
    pub fn classification(&self) -> Classification {
        match self {
            Resolution::SelfReference { .. } => Classification::SelfReference,
            Resolution::Resolved(r) => r.classification(),
        }
    }

    /// Take the materialized reference, `None` for dropped candidates
    pub fn into_resolved(self) -> Option<ResolvedReference> {
        match self {
            Resolution::SelfReference { .. } => None,
            Resolution::Resolved(r) => Some(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(target: Option<&str>) -> CandidateReference {
        CandidateReference {
            text: "Circular No. SEBI/X/1".to_string(),
            reference_type: "circular".to_string(),
            circular_number: Some("SEBI/X/1".to_string()),
            title: None,
            page: Some(2),
            context: "as per Circular No. SEBI/X/1".to_string(),
            confidence: Confidence::High,
            reasoning: "explicit citation".to_string(),
            matched_target: target.map(str::to_string),
        }
    }

    #[test]
    fn test_confidence_parse() {
        assert_eq!(Confidence::parse("high"), Confidence::High);
        assert_eq!(Confidence::parse("Medium"), Confidence::Medium);
        assert_eq!(Confidence::parse("LOW"), Confidence::Low);
        assert_eq!(Confidence::parse(""), Confidence::Unknown);
        assert_eq!(Confidence::parse("very high"), Confidence::Unknown);
    }

    #[test]
    fn test_resolved_classification() {
        let meta = CircularMetadata::new("circA.pdf", "/docs/circA.pdf");
        let local = ResolvedReference::available_locally(candidate(Some("circA.pdf")), &meta);
        assert_eq!(local.classification(), Classification::AvailableLocally);
        assert!(local.is_local());
        assert_eq!(local.local_metadata().unwrap().filename, "circA.pdf");

        let external = ResolvedReference::external(candidate(None));
        assert_eq!(external.classification(), Classification::ExternalReference);
        assert!(!external.is_local());
        assert!(external.local_metadata().is_none());
    }

    #[test]
    fn test_self_reference_resolution_is_dropped() {
        let resolution = Resolution::SelfReference {
            target: "circA.pdf".to_string(),
        };
        assert_eq!(resolution.classification(), Classification::SelfReference);
        assert!(resolution.into_resolved().is_none());
    }

    #[test]
    fn test_resolved_reference_json_shape() {
        let external = ResolvedReference::external(candidate(None));
        let json = serde_json::to_value(&external).unwrap();

        assert_eq!(json["availability"], "external_reference");
        assert_eq!(json["type"], "circular");
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["note"], EXTERNAL_NOTE);
        assert!(json["matched_target"].is_null());
    }

    #[test]
    fn test_local_reference_json_shape() {
        let mut meta = CircularMetadata::new("circA.pdf", "/docs/circA.pdf");
        meta.circular_number = Some("SEBI/X/1".to_string());
        let local = ResolvedReference::available_locally(candidate(Some("circA.pdf")), &meta);
        let json = serde_json::to_value(&local).unwrap();

        assert_eq!(json["availability"], "available_locally");
        assert_eq!(json["local_metadata"]["filename"], "circA.pdf");
        assert_eq!(json["local_metadata"]["circular_number"], "SEBI/X/1");
    }
}
