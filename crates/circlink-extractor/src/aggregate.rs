//! Partitioning and counting of resolved references

use circlink_domain::{Availability, ResolvedReference};
use serde::{Deserialize, Serialize};

/// Summary counts; `total == local + external`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCounts {
    /// All materialized references
    pub total: usize,
    /// References available locally
    pub local: usize,
    /// References to obtain separately
    pub external: usize,
}

/// References partitioned by availability, each in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Summary counts
    pub counts: ReferenceCounts,
    /// Locally available references
    pub local: Vec<ResolvedReference>,
    /// External references
    pub external: Vec<ResolvedReference>,
}

/// Partition resolved references into local and external lists
pub fn aggregate(resolved: &[ResolvedReference]) -> Aggregation {
    let (local, external): (Vec<ResolvedReference>, Vec<ResolvedReference>) = resolved
        .iter()
        .cloned()
        .partition(|r| matches!(r.availability, Availability::AvailableLocally { .. }));

    Aggregation {
        counts: ReferenceCounts {
            total: local.len() + external.len(),
            local: local.len(),
            external: external.len(),
        },
        local,
        external,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlink_domain::{CandidateReference, CircularMetadata, Confidence};

    fn reference(text: &str, local: bool) -> ResolvedReference {
        let candidate = CandidateReference {
            text: text.to_string(),
            reference_type: "circular".to_string(),
            circular_number: None,
            title: None,
            page: None,
            context: String::new(),
            confidence: Confidence::Unknown,
            reasoning: String::new(),
            matched_target: local.then(|| "circA.pdf".to_string()),
        };
        if local {
            ResolvedReference::available_locally(candidate, &CircularMetadata::new("circA.pdf", "/docs/circA.pdf"))
        } else {
            ResolvedReference::external(candidate)
        }
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[]);
        assert_eq!(agg.counts, ReferenceCounts::default());
        assert!(agg.local.is_empty());
        assert!(agg.external.is_empty());
    }

    #[test]
    fn test_partition_preserves_arrival_order() {
        let input = vec![
            reference("e1", false),
            reference("l1", true),
            reference("e2", false),
            reference("l2", true),
            reference("e3", false),
        ];
        let agg = aggregate(&input);

        let local: Vec<&str> = agg.local.iter().map(|r| r.candidate.text.as_str()).collect();
        let external: Vec<&str> = agg.external.iter().map(|r| r.candidate.text.as_str()).collect();
        assert_eq!(local, vec!["l1", "l2"]);
        assert_eq!(external, vec!["e1", "e2", "e3"]);
        assert_eq!(
            agg.counts,
            ReferenceCounts {
                total: 5,
                local: 2,
                external: 3
            }
        );
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let input = vec![reference("a", true), reference("b", false)];
        assert_eq!(aggregate(&input), aggregate(&input));
    }
}
