//! Resolution of candidate references against the local index
//!
//! Resolution is a pure function of (candidate, index, source filename). It
//! never fails: anything ambiguous becomes an external reference. A candidate
//! that resolves to the document under analysis is dropped, and dropped
//! candidates leave no trace in the output or in any count.

use crate::index::LocalIndex;
use circlink_domain::{CandidateReference, Resolution, ResolvedReference};
use tracing::debug;

/// Resolve one candidate
pub fn resolve(candidate: &CandidateReference, index: &LocalIndex, source_filename: &str) -> Resolution {
    let target = candidate
        .matched_target
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(target) = target else {
        return Resolution::Resolved(ResolvedReference::external(candidate.clone()));
    };

    match index.lookup(target) {
        Some(entry) if entry.filename == source_filename => Resolution::SelfReference {
            target: target.to_string(),
        },
        Some(entry) => Resolution::Resolved(ResolvedReference::available_locally(candidate.clone(), entry)),
        None => Resolution::Resolved(ResolvedReference::external(candidate.clone())),
    }
}

/// Resolve candidates in arrival order, dropping self-references
pub fn resolve_all(
    candidates: &[CandidateReference],
    index: &LocalIndex,
    source_filename: &str,
) -> Vec<ResolvedReference> {
    candidates
        .iter()
        .filter_map(|candidate| match resolve(candidate, index, source_filename) {
            Resolution::SelfReference { target } => {
                debug!("Dropping self-reference '{}' to {}", candidate.text, target);
                None
            }
            Resolution::Resolved(resolved) => Some(resolved),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlink_domain::{CircularMetadata, Classification, Confidence};

    fn scenario_index() -> LocalIndex {
        let mut meta = CircularMetadata::new("circA.pdf", "/docs/circA.pdf");
        meta.circular_number = Some("SEBI/X/1".to_string());
        LocalIndex::from_records(vec![meta])
    }

    fn candidate(target: Option<&str>) -> CandidateReference {
        CandidateReference {
            text: "SEBI/X/1".to_string(),
            reference_type: "circular".to_string(),
            circular_number: Some("SEBI/X/1".to_string()),
            title: None,
            page: None,
            context: String::new(),
            confidence: Confidence::Medium,
            reasoning: String::new(),
            matched_target: target.map(str::to_string),
        }
    }

    #[test]
    fn test_available_locally() {
        let resolution = resolve(&candidate(Some("circA.pdf")), &scenario_index(), "doc.pdf");
        assert_eq!(resolution.classification(), Classification::AvailableLocally);

        let resolved = resolution.into_resolved().unwrap();
        let local = resolved.local_metadata().unwrap();
        assert_eq!(local.filename, "circA.pdf");
        assert_eq!(local.circular_number.as_deref(), Some("SEBI/X/1"));
    }

    #[test]
    fn test_self_reference_dropped() {
        let resolution = resolve(&candidate(Some("circA.pdf")), &scenario_index(), "circA.pdf");
        assert_eq!(
            resolution,
            Resolution::SelfReference {
                target: "circA.pdf".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_target_is_external() {
        let resolution = resolve(&candidate(Some("unknown.pdf")), &scenario_index(), "doc.pdf");
        assert_eq!(resolution.classification(), Classification::ExternalReference);
    }

    #[test]
    fn test_missing_target_is_external() {
        let resolution = resolve(&candidate(None), &scenario_index(), "doc.pdf");
        assert_eq!(resolution.classification(), Classification::ExternalReference);
    }

    #[test]
    fn test_blank_target_is_external() {
        let resolution = resolve(&candidate(Some("   ")), &scenario_index(), "circA.pdf");
        assert_eq!(resolution.classification(), Classification::ExternalReference);
    }

    #[test]
    fn test_padded_target_resolves() {
        let resolution = resolve(&candidate(Some(" circA.pdf ")), &scenario_index(), "doc.pdf");
        assert_eq!(resolution.classification(), Classification::AvailableLocally);
    }

    #[test]
    fn test_idempotent() {
        let index = scenario_index();
        for target in [Some("circA.pdf"), Some("unknown.pdf"), None] {
            for source in ["doc.pdf", "circA.pdf"] {
                let c = candidate(target);
                assert_eq!(resolve(&c, &index, source), resolve(&c, &index, source));
            }
        }
    }

    #[test]
    fn test_resolve_all_preserves_order_and_drops_self() {
        let index = scenario_index();
        let mut first = candidate(None);
        first.text = "first".to_string();
        let mut selfref = candidate(Some("circA.pdf"));
        selfref.text = "self".to_string();
        let mut last = candidate(Some("other.pdf"));
        last.text = "last".to_string();

        let resolved = resolve_all(&[first, selfref, last], &index, "circA.pdf");
        let texts: Vec<&str> = resolved.iter().map(|r| r.candidate.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "last"]);
    }
}
