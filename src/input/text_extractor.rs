//! Text extraction from document bytes

use crate::error::{Result, ResumeScorerError};
use pulldown_cmark::{Event, Parser, Tag};

/// Converts a document's raw bytes into plain text.
///
/// A failure is always an `Err`; empty documents yield `Ok("")`.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl DocumentTextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs
        let outcome = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ResumeScorerError::Extraction(format!(
                "Failed to extract text from PDF: {}",
                e
            ))),
            Err(_) => Err(ResumeScorerError::Extraction(
                "PDF parser aborted on malformed document".to_string(),
            )),
        }
    }
}

pub struct PlainTextExtractor;

impl DocumentTextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ResumeScorerError::Extraction(format!("Document is not valid UTF-8: {}", e))
        })
    }
}

pub struct MarkdownExtractor;

impl DocumentTextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = PlainTextExtractor.extract(bytes)?;

        let mut text = String::with_capacity(markdown.len());
        for event in Parser::new(&markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        let text = PlainTextExtractor.extract(b"Rust Engineer\nTokio").unwrap();
        assert_eq!(text, "Rust Engineer\nTokio");
    }

    #[test]
    fn test_invalid_utf8_is_extraction_error() {
        let err = PlainTextExtractor.extract(&[0xff, 0xfe, 0xfd]).unwrap_err();
        assert!(matches!(err, ResumeScorerError::Extraction(_)));
    }

    #[test]
    fn test_empty_document_is_empty_text_not_error() {
        assert_eq!(PlainTextExtractor.extract(b"").unwrap(), "");
        assert_eq!(MarkdownExtractor.extract(b"").unwrap(), "");
    }

    #[test]
    fn test_markdown_markup_is_stripped() {
        let md = b"# Jane Roe\n\n**Senior** Rust `tokio` developer\n\n- Kafka\n- Postgres\n";
        let text = MarkdownExtractor.extract(md).unwrap();

        assert!(text.contains("Jane Roe"));
        assert!(text.contains("Senior Rust tokio developer"));
        assert!(text.contains("Kafka"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
        assert!(!text.contains('`'));
    }

    #[test]
    fn test_garbage_pdf_is_extraction_error() {
        let err = PdfExtractor.extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ResumeScorerError::Extraction(_)));
    }
}
