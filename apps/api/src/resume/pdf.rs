//! Resume text extraction with a fallback chain:
//! plain text → `pdf-extract` → raw content-stream scan.

use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("Resume body is empty")]
    Empty,

    #[error("Unsupported document format: expected PDF or UTF-8 text")]
    Unsupported,

    #[error("No readable text could be recovered from the document")]
    NoText,
}

/// Which stage of the chain produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    PlainText,
    PdfExtract,
    ContentStream,
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub source: TextSource,
}

/// String operands of `Tj` / `'` / `"` operators, and array operands of `TJ`.
static SHOW_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s-u)\(((?:[^()\\]|\\.)*)\)\s*(?:Tj|'|")|\[((?:[^\]\\]|\\.)*)\]\s*TJ"#)
        .expect("valid show-text regex")
});

static ARRAY_STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s-u)\(((?:[^()\\]|\\.)*)\)").expect("valid array-string regex"));

/// Text-positioning operators that start a new line.
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:T\*|Td|TD|ET)\s").expect("valid line-break regex"));

pub fn extract_resume_text(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ExtractionError::Empty);
    }

    if !bytes.starts_with(PDF_MAGIC) {
        let text = std::str::from_utf8(bytes).map_err(|_| ExtractionError::Unsupported)?;
        return Ok(ExtractedText {
            text: text.to_string(),
            source: TextSource::PlainText,
        });
    }

    match extract_with_pdf_extract(bytes) {
        Some(text) if has_content(&text) => {
            return Ok(ExtractedText {
                text,
                source: TextSource::PdfExtract,
            })
        }
        _ => warn!("pdf-extract produced no text, falling back to content-stream scan"),
    }

    let text = scan_content_streams(bytes);
    if has_content(&text) {
        debug!(chars = text.len(), "Recovered text from content streams");
        return Ok(ExtractedText {
            text,
            source: TextSource::ContentStream,
        });
    }

    Err(ExtractionError::NoText)
}

fn has_content(text: &str) -> bool {
    text.chars().any(|c| c.is_alphanumeric())
}

/// `pdf-extract` panics on some malformed documents; contain that here.
fn extract_with_pdf_extract(bytes: &[u8]) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            warn!("pdf-extract failed: {e}");
            None
        }
        Err(_) => {
            warn!("pdf-extract panicked on malformed document");
            None
        }
    }
}

/// Collects literal strings shown by text operators in uncompressed content streams.
fn scan_content_streams(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut last_end = 0;

    for caps in SHOW_TEXT_RE.captures_iter(bytes) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
        if !out.is_empty() {
            let between = &bytes[last_end..whole.0];
            out.push(if LINE_BREAK_RE.is_match(between) { '\n' } else { ' ' });
        }
        last_end = whole.1;

        if let Some(single) = caps.get(1) {
            out.push_str(&decode_pdf_string(single.as_bytes()));
        } else if let Some(array) = caps.get(2) {
            for part in ARRAY_STRING_RE.captures_iter(array.as_bytes()) {
                if let Some(s) = part.get(1) {
                    out.push_str(&decode_pdf_string(s.as_bytes()));
                }
            }
        }
    }

    out.trim().to_string()
}

/// Decodes the escape sequences of a PDF literal string body.
fn decode_pdf_string(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] != b'\\' || i + 1 == raw.len() {
            out.push(raw[i]);
            i += 1;
            continue;
        }

        let next = raw[i + 1];
        i += 2;
        match next {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'(' | b')' | b'\\' => out.push(next),
            b'\r' | b'\n' => {
                // line continuation
                if next == b'\r' && raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'0'..=b'7' => {
                let mut value = u32::from(next - b'0');
                let mut digits = 1;
                while digits < 3 && i < raw.len() && (b'0'..=b'7').contains(&raw[i]) {
                    value = value * 8 + u32::from(raw[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                out.push((value & 0xff) as u8);
            }
            other => out.push(other),
        }
    }

    // Latin-1 is the common case for simple fonts.
    out.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_pdf(content: &str) -> Vec<u8> {
        format!(
            "%PDF-1.4\n1 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n%%EOF\n",
            content.len(),
            content
        )
        .into_bytes()
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert_eq!(extract_resume_text(b"").unwrap_err(), ExtractionError::Empty);
        assert_eq!(extract_resume_text(b" \n\t").unwrap_err(), ExtractionError::Empty);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let extracted = extract_resume_text("Jane Doe\nSkills: Rust, SQL".as_bytes()).unwrap();
        assert_eq!(extracted.source, TextSource::PlainText);
        assert!(extracted.text.contains("Rust"));
    }

    #[test]
    fn test_binary_non_pdf_is_unsupported() {
        let bytes = [0xff, 0xfe, 0x00, 0x81, 0x92];
        assert_eq!(extract_resume_text(&bytes).unwrap_err(), ExtractionError::Unsupported);
    }

    #[test]
    fn test_broken_pdf_falls_back_to_content_stream_scan() {
        let pdf = minimal_pdf("BT /F1 12 Tf (Senior Engineer) Tj T* (Python, Docker) Tj ET");
        let extracted = extract_resume_text(&pdf).unwrap();
        assert_eq!(extracted.source, TextSource::ContentStream);
        assert_eq!(extracted.text, "Senior Engineer\nPython, Docker");
    }

    #[test]
    fn test_pdf_without_text_reports_no_text() {
        let pdf = minimal_pdf("0 0 m 100 100 l S");
        assert_eq!(extract_resume_text(&pdf).unwrap_err(), ExtractionError::NoText);
    }

    #[test]
    fn test_scan_reads_tj_arrays() {
        let text = scan_content_streams(b"BT [(Kuber) -20 (netes)] TJ ET");
        assert_eq!(text, "Kubernetes");
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_pdf_string(br"C\+\+ \(expert\)"), "C++ (expert)");
        assert_eq!(decode_pdf_string(br"a\\b"), "a\\b");
        assert_eq!(decode_pdf_string(br"line\nbreak"), "line\nbreak");
        assert_eq!(decode_pdf_string(br"\101\102"), "AB");
    }
}
