//! Line normalization
//!
//! Removes page furniture from the extracted line stream: blank lines,
//! page-number lines and the family's boilerplate patterns. Only lines that
//! can never be headings are removed here.

use regex::Regex;

use crate::book_family::BookFamily;
use crate::helpers::{compact_line, is_pure_digits};
use crate::types::{RawLine, Result, SourceLine};

pub struct LineNormalizer {
    boilerplate: Vec<Regex>,
}

impl LineNormalizer {
    pub fn new(family: &BookFamily) -> Result<Self> {
        Self::from_patterns(&family.boilerplate_patterns)
    }

    pub fn from_patterns(patterns: &[String]) -> Result<Self> {
        let boilerplate = patterns.iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<Regex>, regex::Error>>()?;
        Ok(LineNormalizer { boilerplate })
    }

    /// True if the line carries no text the engine could use.
    pub fn is_droppable(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty()
            || is_pure_digits(trimmed)
            || self.boilerplate.iter().any(|re| re.is_match(trimmed))
    }

    /// Filter and re-index the source lines from 0, preserving order.
    pub fn normalize(&self, lines: &[SourceLine]) -> Vec<RawLine> {
        let normalized: Vec<RawLine> = lines.iter()
            .filter(|line| !self.is_droppable(&line.text))
            .enumerate()
            .map(|(position, line)| RawLine {
                position,
                source_line: line.source_line,
                text: compact_line(&line.text),
                is_emphasized: line.is_emphasized,
                relative_size: line.relative_size,
            })
            .collect();

        tracing::debug!("Normalized {} source lines to {} lines", lines.len(), normalized.len());
        normalized
    }
}
