//! Export the extracted tree as JSON documents

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::logger::info;
use crate::types::{Result, VolumeContinuationState, VolumeTree, WorkTree};

pub fn volume_to_json_string(tree: &VolumeTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

pub fn work_to_json_string(work: &WorkTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(work)?)
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write one volume tree, creating parent folders as needed.
pub fn write_volume_json(tree: &VolumeTree, path: &Path) -> Result<()> {
    write_json(tree, path)?;
    info(&format!("Wrote {} chapters to {:?}", tree.chapters.len(), path));
    Ok(())
}

/// Write a multi-volume work tree, creating parent folders as needed.
pub fn write_work_json(work: &WorkTree, path: &Path) -> Result<()> {
    write_json(work, path)?;
    info(&format!(
        "Wrote {} volumes to {:?}, last chapter number {}",
        work.volumes.len(), path, work.continuation.last_assigned_number
    ));
    Ok(())
}

/// Save the numbering state so the next volume of the work can continue it.
pub fn write_continuation_state(state: &VolumeContinuationState, path: &Path) -> Result<()> {
    write_json(state, path)
}

/// Load a saved numbering state. A missing file means a fresh work.
pub fn read_continuation_state(path: &Path) -> Result<VolumeContinuationState> {
    if !path.exists() {
        return Ok(VolumeContinuationState::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
