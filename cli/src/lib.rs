//! Commands of the `pitaka-structure` binary

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use pitaka_structure::book_family::BookFamily;
use pitaka_structure::export::{read_continuation_state, work_to_json_string, write_continuation_state, write_work_json};
use pitaka_structure::family_detector::detect_book_family;
use pitaka_structure::heading_classifier::HeadingClassifier;
use pitaka_structure::line_source::read_source_lines;
use pitaka_structure::logger;
use pitaka_structure::types::{HierarchyLevel, VolumeContinuationState, WorkTree};
use pitaka_structure::{extract_work, StructureExtractor};

/// Resolve the book family: custom config first, then a named built-in,
/// then detection from the first volume.
pub fn resolve_family(family: Option<&str>, config: Option<&Path>, first_volume: Option<&Path>) -> Result<BookFamily> {
    if let Some(config) = config {
        return BookFamily::load_from_json(config)
            .with_context(|| format!("Failed to load book family from {:?}", config));
    }

    if let Some(name) = family {
        return BookFamily::builtin(name).with_context(|| format!("Failed to select book family '{}'", name));
    }

    let Some(path) = first_volume else {
        bail!("No book family given. Use --family or --config.");
    };
    let lines = read_source_lines(path).with_context(|| format!("Failed to read volume: {:?}", path))?;
    detect_book_family(&lines).with_context(|| format!("Failed to detect book family of {:?}", path))
}

fn print_diagnostics(work: &WorkTree, volumes: &[PathBuf]) {
    for (tree, path) in work.volumes.iter().zip(volumes) {
        for diagnostic in &tree.diagnostics {
            let position = diagnostic.line_position
                .map(|p| format!("line {}", p))
                .unwrap_or_else(|| "-".to_string());
            logger::warn(&format!("{:?} {:?} {}: {}", path.file_name().unwrap_or_default(), diagnostic.kind, position, diagnostic.message));
            eprintln!("{}: {:?} at {}: {}", path.display(), diagnostic.kind, position, diagnostic.message);
        }
    }
}

/// Options of the `extract` command.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub family: Option<String>,
    pub config: Option<PathBuf>,
    pub prefix: Option<String>,
    pub continue_from: Option<u32>,
    pub state_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub volumes: Vec<PathBuf>,
}

/// Extract one work and write it to the output file, or print it when there is none.
pub fn extract(options: ExtractOptions) -> Result<WorkTree> {
    let ExtractOptions { family, config, prefix, continue_from, state_file, output, output_dir, volumes } = options;

    let mut book_family = resolve_family(family.as_deref(), config.as_deref(), volumes.first().map(|p| p.as_path()))?;
    if let Some(prefix) = prefix {
        book_family = book_family.with_id_prefix(&prefix);
    }

    let continuation = match (continue_from, &state_file) {
        (Some(n), _) => VolumeContinuationState::new(n),
        (None, Some(path)) => read_continuation_state(path)
            .with_context(|| format!("Failed to read state file: {:?}", path))?,
        (None, None) => VolumeContinuationState::default(),
    };

    let mut sources = Vec::with_capacity(volumes.len());
    for path in &volumes {
        let lines = read_source_lines(path).with_context(|| format!("Failed to read volume: {:?}", path))?;
        sources.push(lines);
    }

    logger::info(&format!(
        "Extracting {} volumes as '{}', continuing from {}",
        volumes.len(), book_family.name, continuation.last_assigned_number
    ));

    let work = extract_work(&book_family, &sources, continuation)
        .with_context(|| format!("Failed to extract structure with book family '{}'", book_family.name))?;

    print_diagnostics(&work, &volumes);

    let output = output.or_else(|| output_dir.map(|dir| dir.join(format!("{}.json", book_family.id_prefix))));
    match output {
        Some(path) => {
            write_work_json(&work, &path).with_context(|| format!("Failed to write output: {:?}", path))?;
        }
        None => println!("{}", work_to_json_string(&work)?),
    }

    if let Some(path) = state_file {
        write_continuation_state(&work.continuation, &path)
            .with_context(|| format!("Failed to write state file: {:?}", path))?;
    }

    Ok(work)
}

pub fn list_families() -> Result<()> {
    let json = serde_json::to_string_pretty(&BookFamily::all_builtin())?;
    println!("{}", json);
    Ok(())
}

pub fn detect(path: &Path) -> Result<()> {
    let lines = read_source_lines(path).with_context(|| format!("Failed to read volume: {:?}", path))?;
    let family = detect_book_family(&lines).with_context(|| format!("Failed to detect book family of {:?}", path))?;
    println!("{}", family.name);
    Ok(())
}

pub fn classify(family: Option<String>, config: Option<PathBuf>, path: &Path) -> Result<()> {
    let book_family = resolve_family(family.as_deref(), config.as_deref(), Some(path))?;
    let extractor = StructureExtractor::new(&book_family)?;
    let classifier: &HeadingClassifier = extractor.classifier();

    let mut levels = vec![HierarchyLevel::ChapterUnit];
    levels.extend(book_family.content_levels());

    let source = read_source_lines(path).with_context(|| format!("Failed to read volume: {:?}", path))?;
    for line in extractor.normalize(&source) {
        match classifier.classify(&line, &levels) {
            Some(candidate) => println!(
                "{}\t{}\t{:?}\t{}",
                line.source_line, candidate.level.as_str(), candidate.kind, line.text
            ),
            None => println!("{}\tbody\t-\t{}", line.source_line, line.text),
        }
    }

    Ok(())
}
