//! Reading line files from disk
//!
//! Two formats are accepted:
//!
//! - plain text, one line per line, UTF-8 or UTF-16 with BOM, any line endings
//! - JSON lines (`.jsonl`), one `{"text": …, "is_emphasized": …, "relative_size": …}`
//!   record per line, for extractors that keep formatting hints

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};

use crate::logger;
use crate::types::{Result, SourceLine, StructureError};

/// One record of a JSON-lines file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub text: String,
    #[serde(default)]
    pub is_emphasized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_size: Option<f32>,
}

/// Read a text file, detect its encoding and return UTF-8 with Unix line endings.
pub fn read_text_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let text = decode_bytes(&bytes);
    logger::debug(&format!("Read {} bytes from {:?}", bytes.len(), path.file_name().unwrap_or_default()));
    Ok(text)
}

/// Decode raw bytes by their BOM, defaulting to UTF-8, and normalize line endings.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let (encoding, bom_len) = detect_encoding(bytes);

    let (decoded, _encoding_used, had_errors) = encoding.decode(&bytes[bom_len..]);
    if had_errors {
        logger::warn(&format!("Encoding errors detected while decoding {} text", encoding.name()));
    }

    decoded.replace("\r\n", "\n").replace('\r', "\n")
}

/// Detect the encoding from the BOM. Returns the encoding and the BOM length.
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    // UTF-16LE BOM: 0xFF 0xFE
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return (UTF_16LE, 2);
    }
    // UTF-16BE BOM: 0xFE 0xFF
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return (UTF_16BE, 2);
    }
    // UTF-8 BOM: 0xEF 0xBB 0xBF
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return (UTF_8, 3);
    }
    (UTF_8, 0)
}

/// Parse JSON-lines content. Empty lines are skipped but still counted.
pub fn parse_jsonl(content: &str) -> Result<Vec<SourceLine>> {
    let mut lines = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let record: LineRecord = serde_json::from_str(raw).map_err(|e| StructureError::InvalidLineRecord {
            line: idx + 1,
            reason: e.to_string(),
        })?;

        lines.push(SourceLine {
            source_line: idx + 1,
            text: record.text,
            is_emphasized: record.is_emphasized,
            relative_size: record.relative_size,
        });
    }

    Ok(lines)
}

pub fn is_jsonl(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jsonl"))
        .unwrap_or(false)
}

/// Read the source lines of one volume, choosing the format by file extension.
pub fn read_source_lines(path: &Path) -> Result<Vec<SourceLine>> {
    let content = read_text_file(path)?;

    let lines = if is_jsonl(path) {
        parse_jsonl(&content)?
    } else {
        SourceLine::from_text(&content)
    };

    logger::info(&format!("Loaded {} lines from {:?}", lines.len(), path));
    Ok(lines)
}
