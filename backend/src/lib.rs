//! Structure extraction for Pāli canon volumes
//!
//! Turns the line stream of an extracted book into a two- or three-level
//! tree of chapter units, optional vagga groups and numbered content units,
//! driven by declarative book-family configuration.

pub mod types;
pub mod helpers;
pub mod logger;

pub mod book_family;
pub mod family_detector;
pub mod normalizer;
pub mod heading_classifier;
pub mod boundary_slicer;
pub mod unit_parser;
pub mod id_assigner;
pub mod pipeline;

pub mod line_source;
pub mod export;

pub use book_family::{BookFamily, TitleHeuristic};
pub use pipeline::{extract_volume, extract_work, StructureExtractor};
pub use types::{
    ChapterUnit, ContentUnit, Diagnostic, DiagnosticKind, Result, SourceLine, StructureError,
    VolumeContinuationState, VolumeTree, WorkTree,
};
