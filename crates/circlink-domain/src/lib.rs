//! Circlink Domain Layer
//!
//! This crate contains the data model shared by every Circlink crate: the
//! metadata held for each circular of the local collection, the candidate
//! references produced by the inference collaborator, and the resolved
//! references that make up a report.
//!
//! ## Key Concepts
//!
//! - **Circular**: a regulatory notice issued by a securities regulator
//! - **Candidate reference**: an unresolved guess that a document cites another one
//! - **Classification**: self_reference, available_locally or external_reference
//! - **Resolution**: a dropped self-reference or a materialized [`ResolvedReference`]
//!
//! ## Architecture
//!
//! - Pure data types only, no I/O
//! - Trait definitions for the text-extraction and inference collaborators
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod circular;
pub mod reference;
pub mod traits;

// Re-exports for convenience
pub use circular::{CircularMetadata, MatchedCircular};
pub use reference::{
    Availability, CandidateReference, Classification, Confidence, Resolution,
    ResolvedReference, EXTERNAL_NOTE,
};
pub use traits::{ExtractedText, LlmProvider, TextSource};
