//! JSON import/export of review progress and placement sessions.
//! Files hold the persisted field shapes; imports are checked before anything is returned.

use crate::error::{Result, TutorError};
use crate::placement::PlacementSession;
use crate::store::ItemProgress;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Writes to a temporary file next to `path`, then renames it over `path`.
/// The old file stays intact until the new contents are fully on disk.
fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json_string.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| TutorError::Io(e.error))?;
    debug!(path = %path.display(), bytes = json_string.len(), "json written");
    Ok(())
}

fn read_to_string(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Exports review progress records to a JSON array at `path`.
pub fn export_progress_to_path(progress: &[ItemProgress], path: impl AsRef<Path>) -> Result<()> {
    write_pretty(progress, path.as_ref())
}

/// Imports review progress records.
/// Rejects records whose last review is after their due date or whose ease is below the floor.
pub fn import_progress(path: impl AsRef<Path>) -> Result<Vec<ItemProgress>> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let progress: Vec<ItemProgress> = serde_json::from_str(&contents)?;

    if let Some(bad) = progress.iter().find(|p| !p.state.is_consistent()) {
        return Err(TutorError::InvalidRecord(format!(
            "progress for {} breaks scheduling invariants",
            bad.key
        )));
    }

    info!(records = progress.len(), path = %path.display(), "progress imported");
    Ok(progress)
}

pub fn export_session_to_path(session: &PlacementSession, path: impl AsRef<Path>) -> Result<()> {
    write_pretty(session, path.as_ref())
}

pub fn import_session(path: impl AsRef<Path>) -> Result<PlacementSession> {
    let contents = read_to_string(path.as_ref())?;
    let session: PlacementSession = serde_json::from_str(&contents)?;
    session.validate()?;
    Ok(session)
}
