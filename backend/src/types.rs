//! Core data structures for the structure extraction engine
//!
//! Lines flow through the engine as `RawLine`s, headings are proposed as
//! `HeadingCandidate`s and resolved into `StructuralSlice`s, which the unit
//! parser finally turns into the `ChapterUnit` / `ContentUnit` tree.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One line as delivered by the page-text extractor, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLine {
    /// Line number in the source file (1-indexed)
    pub source_line: usize,
    pub text: String,
    #[serde(default)]
    pub is_emphasized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_size: Option<f32>,
}

impl SourceLine {
    pub fn new(source_line: usize, text: &str) -> Self {
        SourceLine {
            source_line,
            text: text.to_string(),
            is_emphasized: false,
            relative_size: None,
        }
    }

    /// Number plain text lines from 1, without formatting hints.
    pub fn from_text(text: &str) -> Vec<SourceLine> {
        text.lines()
            .enumerate()
            .map(|(idx, line)| SourceLine::new(idx + 1, line))
            .collect()
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<SourceLine> {
        lines.iter()
            .enumerate()
            .map(|(idx, line)| SourceLine::new(idx + 1, line.as_ref()))
            .collect()
    }
}

/// A normalized line of the canonical stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Position in the normalized stream (0-indexed)
    pub position: usize,
    /// Line number in the source file this line came from (1-indexed)
    pub source_line: usize,
    /// Trimmed line text
    pub text: String,
    pub is_emphasized: bool,
    pub relative_size: Option<f32>,
}

impl RawLine {
    pub fn new(position: usize, text: &str) -> Self {
        RawLine {
            position,
            source_line: position + 1,
            text: text.to_string(),
            is_emphasized: false,
            relative_size: None,
        }
    }

    pub fn emphasized(mut self) -> Self {
        self.is_emphasized = true;
        self
    }

    pub fn with_relative_size(mut self, size: f32) -> Self {
        self.relative_size = Some(size);
        self
    }

    /// Build an already-normalized stream from plain strings.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<RawLine> {
        lines.iter()
            .enumerate()
            .map(|(idx, line)| RawLine::new(idx, line.as_ref().trim()))
            .collect()
    }
}

/// Level of a structural unit in a book's hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    /// Vagga, nipāta or saṃyutta
    ChapterUnit,
    /// Vagga nested inside a chapter unit
    SubGroup,
    /// Sutta, verse or jātaka
    ContentUnit,
}

impl HierarchyLevel {
    /// All levels in precedence order, outermost first.
    pub const ALL: [HierarchyLevel; 3] = [
        HierarchyLevel::ChapterUnit,
        HierarchyLevel::SubGroup,
        HierarchyLevel::ContentUnit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyLevel::ChapterUnit => "chapter_unit",
            HierarchyLevel::SubGroup => "sub_group",
            HierarchyLevel::ContentUnit => "content_unit",
        }
    }
}

/// How a heading candidate takes part in slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingKind {
    /// Opens a new slice at its level
    Boundary,
    /// Closes the preceding chapter slice and names the chapters that follow,
    /// without becoming a chapter itself (e.g. a nipāta holding vaggas)
    Division,
    /// Title carried forward to the next numbered unit, never a boundary
    TitleOnly,
}

/// A classified line proposing that a structural boundary or title starts here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub level: HierarchyLevel,
    pub kind: HeadingKind,
    pub declared_number: Option<u32>,
    /// Literal inclusive range, e.g. "617-621", for range-numbered headings
    pub number_range: Option<String>,
    pub bare_name: String,
    pub line_position: usize,
}

impl HeadingCandidate {
    pub fn is_title_only(&self) -> bool {
        self.kind == HeadingKind::TitleOnly
    }

    /// Stand-in heading for slices that have no heading line of their own.
    pub fn synthetic(level: HierarchyLevel, bare_name: &str, line_position: usize) -> Self {
        HeadingCandidate {
            level,
            kind: HeadingKind::Boundary,
            declared_number: None,
            number_range: None,
            bare_name: bare_name.to_string(),
            line_position,
        }
    }
}

/// Where a slice's boundaries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceOrigin {
    /// Opened by a detected heading line at `start_line`
    Heading,
    /// Lines between the parent's start and the first detected heading
    Leading,
    /// No heading was found, the slice spans the whole parent
    Fallback,
}

/// One unit's exclusive line range `[start_line, end_line)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralSlice {
    pub level: HierarchyLevel,
    pub start_line: usize,
    pub end_line: usize,
    pub heading: HeadingCandidate,
    pub origin: SliceOrigin,
}

impl StructuralSlice {
    /// First line of the slice body. A heading line is never part of the body.
    pub fn content_start(&self) -> usize {
        match self.origin {
            SliceOrigin::Heading => (self.start_line + 1).min(self.end_line),
            SliceOrigin::Leading | SliceOrigin::Fallback => self.start_line,
        }
    }

    pub fn content_range(&self) -> Range<usize> {
        self.content_start()..self.end_line
    }

    pub fn is_empty(&self) -> bool {
        self.content_start() >= self.end_line
    }
}

/// A numbered content unit: sutta, verse or jātaka.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUnit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Number printed before the title, e.g. 417 in "417. Kaccānijātakaṃ"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subgroup_label: Option<String>,
    /// Position of the line that opened this unit
    pub line_position: usize,
    pub body_lines: Vec<String>,
}

/// A chapter-level unit: vagga, nipāta or saṃyutta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterUnit {
    pub id: String,
    pub title: String,
    /// Running index across the whole work, assigned with the id
    pub number: u32,
    /// Number printed in the heading line, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_number: Option<u32>,
    /// Enclosing division (e.g. "Ekakanipāto"), if one was seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    /// Lines between the enclosing division heading and this chapter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub division_preamble: Vec<String>,
    pub content_units: Vec<ContentUnit>,
}

/// Numbering carried between the physical volumes of one logical work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeContinuationState {
    pub last_assigned_number: u32,
}

impl VolumeContinuationState {
    pub fn new(last_assigned_number: u32) -> Self {
        VolumeContinuationState { last_assigned_number }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A line matched heading patterns of more than one active level
    StructuralAmbiguity,
    /// An expected level had no headings in its parent range
    NoHeadingsFound,
    /// Body text appeared before any numbered unit was opened
    OrphanBodyText,
}

/// A non-fatal condition the caller may want to log or review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_position: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn structural_ambiguity(line_position: usize, message: String) -> Self {
        Diagnostic { kind: DiagnosticKind::StructuralAmbiguity, line_position: Some(line_position), message }
    }

    pub fn no_headings_found(line_position: usize, message: String) -> Self {
        Diagnostic { kind: DiagnosticKind::NoHeadingsFound, line_position: Some(line_position), message }
    }

    pub fn orphan_body_text(line_position: usize, message: String) -> Self {
        Diagnostic { kind: DiagnosticKind::OrphanBodyText, line_position: Some(line_position), message }
    }
}

/// Structured output for one physical volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeTree {
    pub family: String,
    pub id_prefix: String,
    /// Lines preceding the first chapter heading (collection and book titles)
    pub front_matter: Vec<String>,
    pub chapters: Vec<ChapterUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Structured output for a logical work spread over several volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTree {
    pub family: String,
    pub id_prefix: String,
    pub volumes: Vec<VolumeTree>,
    pub continuation: VolumeContinuationState,
}

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Book family '{family}' has no suffix table for '{suffix}' found at line {line_position}: {line}")]
    MisconfiguredBookFamily {
        family: String,
        suffix: String,
        line_position: usize,
        line: String,
    },

    #[error("Invalid configuration for book family '{family}': {reason}")]
    InvalidConfig { family: String, reason: String },

    #[error("Chapter numbering for '{prefix}' cannot continue past {last_assigned_number}")]
    NumberingOverflow { prefix: String, last_assigned_number: u32 },

    #[error("Unknown book family: '{0}'")]
    UnknownFamily(String),

    #[error("Invalid line record at line {line}: {reason}")]
    InvalidLineRecord { line: usize, reason: String },

    #[error("Invalid boilerplate pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StructureError>;
