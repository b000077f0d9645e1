//! Lexical grounding heuristic.
//!
//! Measures how many answer sentences share enough vocabulary with at
//! least one supplied chunk. This is word overlap, not entailment: it
//! under-counts paraphrased claims and over-counts boilerplate copied
//! verbatim from a source.

use super::citations::CitationPattern;
use crate::config::GroundingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

const SENTENCE_TERMINALS: [char; 3] = ['.', '!', '?'];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingReport {
    /// Grounded sentences over scored sentences, 0.0 when none were scored
    pub ratio: f64,

    #[serde(rename = "groundedSentences")]
    pub grounded_sentence_count: usize,

    /// Sentences long enough to be scored
    #[serde(rename = "totalSentences")]
    pub total_sentence_count: usize,

    /// Sentences with too few content words to score
    #[serde(rename = "skippedSentences")]
    pub skipped_sentence_count: usize,

    #[serde(rename = "isWellGrounded")]
    pub is_well_grounded: bool,
}

/// Score the answer's sentences against the supplied chunks.
///
/// Citation markers are removed and the answer is split on `.`, `!` and
/// `?`. A sentence with at least `min_content_words` content words is
/// grounded when some single chunk contains at least `overlap_threshold`
/// of them. Shorter sentences are skipped and excluded from the ratio.
pub fn verify_grounding<S: AsRef<str>>(
    answer: &str,
    source_chunks: &[S],
    config: &GroundingConfig,
) -> GroundingReport {
    verify_grounding_with(answer, source_chunks, config, &CitationPattern::default())
}

/// [`verify_grounding`] for answers whose markers use a custom source label.
pub fn verify_grounding_with<S: AsRef<str>>(
    answer: &str,
    source_chunks: &[S],
    config: &GroundingConfig,
    citations: &CitationPattern,
) -> GroundingReport {
    let stop_words: HashSet<String> = config
        .stop_words
        .iter()
        .map(|w| w.to_lowercase())
        .collect();

    let chunk_vocabularies: Vec<HashSet<String>> = source_chunks
        .iter()
        .map(|chunk| content_words(chunk.as_ref(), config.min_word_chars, &stop_words))
        .collect();

    let stripped = citations.strip(answer);
    let mut scored = 0;
    let mut grounded = 0;
    let mut skipped = 0;

    for sentence in stripped
        .split(SENTENCE_TERMINALS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let words = content_words(sentence, config.min_word_chars, &stop_words);
        if words.len() < config.min_content_words || words.is_empty() {
            skipped += 1;
            continue;
        }

        scored += 1;
        let needed = words.len() as f64 * config.overlap_threshold;
        if chunk_vocabularies
            .iter()
            .any(|vocabulary| words.intersection(vocabulary).count() as f64 >= needed)
        {
            grounded += 1;
        }
    }

    let ratio = if scored > 0 {
        grounded as f64 / scored as f64
    } else {
        0.0
    };

    let report = GroundingReport {
        ratio,
        grounded_sentence_count: grounded,
        total_sentence_count: scored,
        skipped_sentence_count: skipped,
        is_well_grounded: scored > 0 && ratio >= config.well_grounded_threshold,
    };

    tracing::debug!(
        "Grounding: {}/{} sentences grounded ({} skipped), ratio {:.2}",
        grounded,
        scored,
        skipped,
        ratio
    );

    report
}

/// Lower-cased words of at least `min_chars` characters, minus stop words.
fn content_words(text: &str, min_chars: usize, stop_words: &HashSet<String>) -> HashSet<String> {
    text.unicode_words()
        .filter(|w| w.chars().count() >= min_chars)
        .map(str::to_lowercase)
        .filter(|w| !stop_words.contains(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHUNKS: [&str; 2] = [
        "Parasetamol ateş düşürücü ve ağrı kesici etkili bir ilaçtır.",
        "Yetişkinlerde günlük maksimum doz dört gramdır.",
    ];

    #[test]
    fn test_fully_grounded_answer() {
        let answer = "Parasetamol ateş düşürücü bir ilaçtır [1]. \
                      Günlük maksimum doz dört gramdır [2].";
        let report = verify_grounding(answer, &CHUNKS, &GroundingConfig::default());

        assert_eq!(report.total_sentence_count, 2);
        assert_eq!(report.grounded_sentence_count, 2);
        assert_eq!(report.ratio, 1.0);
        assert!(report.is_well_grounded);
    }

    #[test]
    fn test_unsupported_sentence_lowers_ratio() {
        let answer = "Parasetamol ateş düşürücü bir ilaçtır [1]. \
                      Kedilerde kullanımı kesinlikle tehlikelidir oldukça.";
        let report = verify_grounding(answer, &CHUNKS, &GroundingConfig::default());

        assert_eq!(report.total_sentence_count, 2);
        assert_eq!(report.grounded_sentence_count, 1);
        assert_eq!(report.ratio, 0.5);
        assert!(!report.is_well_grounded);
    }

    #[test]
    fn test_short_sentences_are_excluded_from_ratio() {
        let answer = "Evet. Parasetamol ateş düşürücü bir ilaçtır [1]. Tamam!";
        let report = verify_grounding(answer, &CHUNKS, &GroundingConfig::default());

        assert_eq!(report.skipped_sentence_count, 2);
        assert_eq!(report.total_sentence_count, 1);
        assert_eq!(report.ratio, 1.0);
    }

    #[test]
    fn test_stop_words_and_short_words_are_not_content() {
        let stop_words: HashSet<String> = ["için".to_string()].into_iter().collect();
        let words = content_words("Bu ilaç için 4 mg yeterli", 3, &stop_words);

        let mut sorted: Vec<&str> = words.iter().map(String::as_str).collect();
        sorted.sort();
        assert_eq!(sorted, vec!["ilaç", "yeterli"]);
    }

    #[test]
    fn test_punctuation_does_not_block_matches() {
        let chunks = ["Doz: günlük, maksimum; dört (4) gram"];
        let answer = "Günlük maksimum doz dört gramdır";
        let report = verify_grounding(answer, &chunks, &GroundingConfig::default());
        assert_eq!(report.grounded_sentence_count, 1);
    }

    #[test]
    fn test_empty_answer() {
        let report = verify_grounding("", &CHUNKS, &GroundingConfig::default());
        assert_eq!(report.total_sentence_count, 0);
        assert_eq!(report.ratio, 0.0);
        assert!(!report.is_well_grounded);
    }

    #[test]
    fn test_no_chunks_nothing_grounded() {
        let chunks: [&str; 0] = [];
        let report = verify_grounding(
            "Parasetamol ateş düşürücü bir ilaçtır.",
            &chunks,
            &GroundingConfig::default(),
        );
        assert_eq!(report.total_sentence_count, 1);
        assert_eq!(report.grounded_sentence_count, 0);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let strict = GroundingConfig {
            overlap_threshold: 1.0,
            ..GroundingConfig::default()
        };
        let answer = "Parasetamol ateş düşürücü yeni keşfedilmiş harika ilaçtır.";

        let lenient_report = verify_grounding(answer, &CHUNKS, &GroundingConfig::default());
        let strict_report = verify_grounding(answer, &CHUNKS, &strict);
        assert_eq!(lenient_report.grounded_sentence_count, 1);
        assert_eq!(strict_report.grounded_sentence_count, 0);
    }

    #[test]
    fn test_repeated_runs_give_identical_report() {
        let answer = "Parasetamol ateş düşürücü ilaçtır [1]. \
                      Günlük maksimum doz dört gramdır [2]. \
                      Kedilerde kullanımı kesinlikle tehlikelidir oldukça.";
        let config = GroundingConfig::default();

        let first = verify_grounding(answer, &CHUNKS, &config);
        let second = verify_grounding(answer, &CHUNKS, &config);

        assert_eq!(first, second);
        assert_eq!(first.grounded_sentence_count, 2);
        assert_eq!(first.total_sentence_count, 3);
    }

    #[test]
    fn test_custom_label_markers_are_not_content() {
        let chunks = ["Alkol karaciğer hasarı riskini artırır."];
        let answer = "Alkol karaciğer hasarı riskini artırır [Referans 1].";
        let strict = GroundingConfig {
            overlap_threshold: 1.0,
            ..GroundingConfig::default()
        };

        let labelled =
            verify_grounding_with(answer, &chunks, &strict, &CitationPattern::with_label("Referans"));
        let unlabelled = verify_grounding(answer, &chunks, &strict);

        assert_eq!(labelled.grounded_sentence_count, 1);
        assert_eq!(unlabelled.grounded_sentence_count, 0);
    }
}
