//! Sentence-aware text chunking with configurable size and overlap.
//!
//! Sizes and offsets are counted in characters, never bytes, so multi-byte
//! text is never split inside a code point.

use grounded_core::{AppError, AppResult};

const SENTENCE_TERMINALS: [char; 3] = ['.', '!', '?'];

/// Character range `[start, end)` of one chunk window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub start: usize,
    pub end: usize,
}

impl ChunkSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Reject windows that could not make forward progress.
pub fn validate_window(size: usize, overlap: usize) -> AppResult<()> {
    if size == 0 {
        return Err(AppError::Config(
            "Chunk size must be greater than 0".to_string(),
        ));
    }

    if overlap >= size {
        return Err(AppError::Config(format!(
            "Chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, size
        )));
    }

    Ok(())
}

/// Compute the untrimmed chunk windows over `text`.
///
/// Each window is `size` characters unless its right edge can snap back to
/// a sentence terminal in the second half of the window. The next window
/// starts `overlap` characters before the previous end. Once a window
/// reaches the end of the text, or the next one would, the remainder is
/// emitted as the last window.
pub fn chunk_spans(text: &str, size: usize, overlap: usize) -> AppResult<Vec<ChunkSpan>> {
    validate_window(size, overlap)?;

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut spans = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + size).min(len);

        if end < len {
            if let Some(cut) = sentence_cut(&chars[start..end], size) {
                // A snap must still leave the next window ahead of this one
                if cut > overlap {
                    end = start + cut;
                }
            }
        }

        spans.push(ChunkSpan { start, end });

        if end >= len {
            break;
        }

        let next = end - overlap;
        if next + size >= len {
            spans.push(ChunkSpan {
                start: next,
                end: len,
            });
            break;
        }

        start = next;
    }

    Ok(spans)
}

/// Split `text` into trimmed, non-empty chunks.
///
/// # Example
/// ```
/// use grounded_knowledge::chunker::chunk_text;
///
/// let chunks = chunk_text("A. B. C.", 4, 1).unwrap();
/// assert_eq!(chunks, vec!["A. B", "B. C", "C."]);
/// ```
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> AppResult<Vec<String>> {
    let spans = chunk_spans(text, size, overlap)?;

    // Byte offset of every char boundary, including the end of the text
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let chunks: Vec<String> = spans
        .iter()
        .map(|span| text[boundaries[span.start]..boundaries[span.end]].trim())
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect();

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        size,
        overlap
    );

    Ok(chunks)
}

/// Window-relative end just past the last sentence terminal, if that
/// terminal lies beyond the window's midpoint.
fn sentence_cut(window: &[char], size: usize) -> Option<usize> {
    window
        .iter()
        .rposition(|c| SENTENCE_TERMINALS.contains(c))
        .filter(|&pos| pos > size / 2)
        .map(|pos| pos + 1)
}
