//! Source listing shown alongside an answer.

use crate::config::DisplayConfig;
use serde::{Deserialize, Serialize};

/// One displayed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// 1-based position in retrieval order
    pub number: usize,
    pub preview: String,
    pub truncated: bool,
    pub cited: bool,
}

/// Sources in retrieval order, capped at the display maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceListing {
    pub entries: Vec<SourceEntry>,

    /// Retrieved chunks beyond the display maximum
    #[serde(rename = "hiddenCount")]
    pub hidden_count: usize,
}

impl SourceListing {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.hidden_count == 0
    }

    /// Markdown block with cited entries marked `✓`.
    pub fn render_markdown(&self) -> String {
        if self.is_empty() {
            return "**Sources:** none found.".to_string();
        }

        let mut out = String::from("**Sources:**\n\n");
        for entry in &self.entries {
            let mark = if entry.cited { " ✓" } else { "" };
            out.push_str(&format!(
                "**[{}]**{} {}\n\n",
                entry.number, mark, entry.preview
            ));
        }

        if self.hidden_count > 0 {
            out.push_str(&format!("_...and {} more sources_", self.hidden_count));
        }

        out.trim_end().to_string()
    }
}

/// Build the display listing for the chunks supplied to one answer.
///
/// Entries are numbered 1..=N in the order given. Text longer than
/// `preview_chars` characters is cut and suffixed with `...`.
pub fn format_sources<S: AsRef<str>>(
    chunks: &[S],
    citation_ids: &[usize],
    display: &DisplayConfig,
) -> SourceListing {
    let entries = chunks
        .iter()
        .take(display.max_display)
        .enumerate()
        .map(|(i, chunk)| {
            let number = i + 1;
            let (preview, truncated) = preview(chunk.as_ref(), display.preview_chars);
            SourceEntry {
                number,
                preview,
                truncated,
                cited: citation_ids.contains(&number),
            }
        })
        .collect();

    SourceListing {
        entries,
        hidden_count: chunks.len().saturating_sub(display.max_display),
    }
}

fn preview(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}...", &text[..cut]), true),
        None => (text.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(preview_chars: usize, max_display: usize) -> DisplayConfig {
        DisplayConfig {
            preview_chars,
            max_display,
        }
    }

    #[test]
    fn test_entries_numbered_in_retrieval_order() {
        let listing = format_sources(&["ilk", "ikinci", "üçüncü"], &[2], &display(250, 5));

        assert_eq!(listing.entries.len(), 3);
        assert_eq!(listing.entries[0].number, 1);
        assert_eq!(listing.entries[2].preview, "üçüncü");
        assert!(listing.entries[1].cited);
        assert!(!listing.entries[0].cited);
        assert_eq!(listing.hidden_count, 0);
    }

    #[test]
    fn test_preview_truncated_on_char_boundary() {
        let listing = format_sources(&["çğıöşü-abc"], &[], &display(3, 5));
        assert_eq!(listing.entries[0].preview, "çğı...");
        assert!(listing.entries[0].truncated);
    }

    #[test]
    fn test_exact_length_is_not_truncated() {
        let listing = format_sources(&["abc"], &[], &display(3, 5));
        assert_eq!(listing.entries[0].preview, "abc");
        assert!(!listing.entries[0].truncated);
    }

    #[test]
    fn test_chunks_beyond_max_display_are_counted() {
        let chunks = ["a", "b", "c", "d", "e", "f", "g"];
        let listing = format_sources(&chunks, &[7], &display(250, 5));

        assert_eq!(listing.entries.len(), 5);
        assert_eq!(listing.hidden_count, 2);
        assert!(listing.entries.iter().all(|e| !e.cited));
    }

    #[test]
    fn test_render_markdown_marks_cited() {
        let listing = format_sources(&["birinci", "ikinci"], &[1], &display(250, 1));
        let rendered = listing.render_markdown();

        assert!(rendered.starts_with("**Sources:**"));
        assert!(rendered.contains("**[1]** ✓ birinci"));
        assert!(!rendered.contains("ikinci"));
        assert!(rendered.ends_with("_...and 1 more sources_"));
    }

    #[test]
    fn test_render_empty_listing() {
        let listing = format_sources::<&str>(&[], &[], &display(250, 5));
        assert_eq!(listing.render_markdown(), "**Sources:** none found.");
    }
}
