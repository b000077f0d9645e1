//! Citation marker extraction and range validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Labels recognised whatever the prompt's `sourceLabel` is.
const BUILTIN_LABELS: [&str; 2] = ["kaynak", "source"];

static DEFAULT_PATTERN: LazyLock<CitationPattern> = LazyLock::new(CitationPattern::default);

/// Recognises `[n]` and `[Label n]` markers, any letter case.
///
/// The label set is `Source`, `Kaynak` and, when built
/// [`with_label`](Self::with_label), the label the prompt numbered its
/// sources with.
#[derive(Debug, Clone)]
pub struct CitationPattern {
    marker: Option<Regex>,
}

impl Default for CitationPattern {
    fn default() -> Self {
        Self::with_label("")
    }
}

impl CitationPattern {
    /// # Example
    /// ```
    /// use grounded_knowledge::audit::CitationPattern;
    ///
    /// let pattern = CitationPattern::with_label("Ref");
    /// assert_eq!(pattern.extract("X [Ref 2] Y [Source 1] Z [3]"), vec![2, 1, 3]);
    /// ```
    pub fn with_label(label: &str) -> Self {
        let mut labels: Vec<String> = BUILTIN_LABELS.iter().map(|l| l.to_string()).collect();
        let label = label.trim();
        if !label.is_empty() && !labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            labels.push(regex::escape(label));
        }

        let pattern = format!(r"(?i)\[(?:{})?\s*(\d+)\]", labels.join("|"));
        Self {
            marker: Regex::new(&pattern).ok(),
        }
    }

    /// Cited source numbers, de-duplicated in first-seen order.
    pub fn extract(&self, answer: &str) -> Vec<usize> {
        let Some(marker) = self.marker.as_ref() else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        marker
            .captures_iter(answer)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<usize>().ok())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn strip(&self, answer: &str) -> String {
        match self.marker.as_ref() {
            Some(marker) => marker.replace_all(answer, "").into_owned(),
            None => answer.to_string(),
        }
    }

    /// See [`validate_citations`].
    pub fn validate(&self, answer: &str, num_sources: usize) -> ValidationResult {
        let citation_ids = self.extract(answer);

        if citation_ids.is_empty() {
            return ValidationResult {
                is_valid: false,
                has_citations: false,
                citation_ids,
                invalid_ids: Vec::new(),
                message: "No citations found in the answer".to_string(),
            };
        }

        let invalid_ids: Vec<usize> = citation_ids
            .iter()
            .copied()
            .filter(|id| *id < 1 || *id > num_sources)
            .collect();

        if !invalid_ids.is_empty() {
            let message = if num_sources == 0 {
                format!("Invalid source numbers {:?}: no sources were supplied", invalid_ids)
            } else {
                format!(
                    "Invalid source numbers {:?} (valid range: 1-{})",
                    invalid_ids, num_sources
                )
            };

            return ValidationResult {
                is_valid: false,
                has_citations: true,
                citation_ids,
                invalid_ids,
                message,
            };
        }

        let message = format!("Valid: {} distinct source(s) cited", citation_ids.len());
        ValidationResult {
            is_valid: true,
            has_citations: true,
            citation_ids,
            invalid_ids: Vec::new(),
            message,
        }
    }
}

/// Outcome of checking an answer's citations against the supplied sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(rename = "isValid")]
    pub is_valid: bool,

    #[serde(rename = "hasCitations")]
    pub has_citations: bool,

    /// Distinct cited numbers in first-seen order
    #[serde(rename = "citationIds")]
    pub citation_ids: Vec<usize>,

    /// Cited numbers outside `1..=num_sources`
    #[serde(rename = "invalidIds")]
    pub invalid_ids: Vec<usize>,

    pub message: String,
}

impl ValidationResult {
    pub fn cites(&self, number: usize) -> bool {
        self.citation_ids.contains(&number)
    }
}

/// Extract cited source numbers, de-duplicated in first-seen order.
///
/// Bracketed content that is not a (representable) number is ignored.
///
/// # Example
/// ```
/// use grounded_knowledge::audit::extract_citations;
///
/// let ids = extract_citations("X [1] Y [2][2] Z [Kaynak 3]");
/// assert_eq!(ids, vec![1, 2, 3]);
/// ```
pub fn extract_citations(answer: &str) -> Vec<usize> {
    DEFAULT_PATTERN.extract(answer)
}

/// Remove every citation marker from `answer`.
pub fn strip_citations(answer: &str) -> String {
    DEFAULT_PATTERN.strip(answer)
}

/// Check that the answer cites at least one source and only sources in
/// `1..=num_sources`.
///
/// This is a presence and range check only. Whether a cited source
/// supports its claim is measured by
/// [`verify_grounding`](super::grounding::verify_grounding).
pub fn validate_citations(answer: &str, num_sources: usize) -> ValidationResult {
    DEFAULT_PATTERN.validate(answer, num_sources)
}
