//! Document reading and text normalisation.

use grounded_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Punctuation that survives [`clean_text`].
const KEPT_PUNCTUATION: &[char] = &['.', ',', '!', '?', '(', ')', '%', '°', 'μ', '/', '-'];

/// Document format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    PlainText,
    Pdf,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("txt") | Some("text") => Self::PlainText,
            Some("pdf") => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "text",
            Self::Pdf => "pdf",
            Self::Unknown => "unknown",
        }
    }
}

/// Read a document and return its raw text.
///
/// Markdown structure (headings, fences, rules) is flattened to prose. PDF
/// and other binary formats are rejected; convert them to text first.
pub fn read_document(path: &Path) -> AppResult<String> {
    let content_type = ContentType::from_path(path);

    if content_type == ContentType::Pdf {
        return Err(AppError::Knowledge(format!(
            "PDF text extraction is not supported, convert {:?} to a .txt file first",
            path
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read {:?}: {}", path, e)))?;

    if raw.contains('\0') {
        tracing::warn!("Rejecting likely binary file: {:?}", path);
        return Err(AppError::Knowledge(format!(
            "{:?} looks like a binary file",
            path
        )));
    }

    tracing::debug!(
        "Read {} characters from {:?} ({})",
        raw.chars().count(),
        path,
        content_type.as_str()
    );

    Ok(match content_type {
        ContentType::Markdown => flatten_markdown(&raw),
        _ => raw,
    })
}

/// Normalise raw document text before chunking.
///
/// Drops every character that is not a letter, digit, underscore,
/// whitespace or one of `. , ! ? ( ) % ° μ / -`, then collapses whitespace
/// runs to single spaces.
///
/// A combining dot above (U+0307) after a dotless `ı` is a common PDF
/// extraction artefact and becomes `i`. The same dot after `i`, left by
/// lower-casing `İ`, is dropped as well.
pub fn clean_text(raw: &str) -> String {
    let repaired = raw.replace("\u{131}\u{307}", "i").replace("i\u{307}", "i");

    let kept: String = repaired
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || *c == '_' || c.is_whitespace() || KEPT_PUNCTUATION.contains(c)
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn flatten_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start_matches('#').trim();

        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_type_detection() {
        assert_eq!(
            ContentType::from_path(Path::new("leaflet.md")),
            ContentType::Markdown
        );
        assert_eq!(
            ContentType::from_path(Path::new("leaflet.TXT")),
            ContentType::PlainText
        );
        assert_eq!(
            ContentType::from_path(Path::new("leaflet.pdf")),
            ContentType::Pdf
        );
        assert_eq!(
            ContentType::from_path(Path::new("leaflet")),
            ContentType::Unknown
        );
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Doz:\n\n\t500   mg  "), "Doz 500 mg");
    }

    #[test]
    fn test_clean_text_keeps_turkish_letters_and_units() {
        let cleaned = clean_text("Günlük doz 4 g'ı (%100) aşmamalı; 37,5°C → μg/kg-gün.");
        assert_eq!(cleaned, "Günlük doz 4 gı (%100) aşmamalı 37,5°C μg/kg-gün.");
    }

    #[test]
    fn test_clean_text_repairs_dotted_i() {
        assert_eq!(clean_text("İLAÇ".to_lowercase().as_str()), "ilaç");
    }

    #[test]
    fn test_clean_text_repairs_dotless_i_with_combining_dot() {
        assert_eq!(clean_text("Parasetamol \u{131}\u{307}la\u{e7}t\u{131}r"), "Parasetamol ilaçtır");
        assert_eq!(clean_text("kad\u{131}n"), "kadın");
    }

    #[test]
    fn test_clean_text_removed_symbol_leaves_single_space() {
        assert_eq!(clean_text("a * b"), "a b");
    }

    #[test]
    fn test_flatten_markdown() {
        let input = "# Kullanım\n\nGünde iki kez.\n\n```\nkod\n```\n---\nSon satır";
        let output = flatten_markdown(input);
        assert!(output.starts_with("Kullanım"));
        assert!(output.contains("Günde iki kez."));
        assert!(!output.contains("```"));
        assert!(!output.contains("---"));
    }

    #[test]
    fn test_read_document_rejects_pdf() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("leaflet.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, AppError::Knowledge(_)));
    }

    #[test]
    fn test_read_document_plain_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("leaflet.txt");
        fs::write(&path, "Parasetamol ağrı kesicidir.").unwrap();

        assert_eq!(read_document(&path).unwrap(), "Parasetamol ağrı kesicidir.");
    }
}
