//! Post-generation audit of a cited answer.
//!
//! All checks run against the chunks that were actually supplied as context
//! for the answer, numbered 1..=N in retrieval order.

pub mod citations;
pub mod grounding;
pub mod sources;

pub use citations::{
    extract_citations, strip_citations, validate_citations, CitationPattern, ValidationResult,
};
pub use grounding::{verify_grounding, verify_grounding_with, GroundingReport};
pub use sources::{format_sources, SourceEntry, SourceListing};
