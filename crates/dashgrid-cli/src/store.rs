//! JSON snapshot persistence.
//!
//! Writes go to a sibling temp file that is then renamed over the target,
//! so a crash never leaves a half-written state file.

use std::fs;
use std::path::{Path, PathBuf};

use dashgrid_layout::{GridSnapshot, GridState, migrate_snapshot, needs_migration};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Read and migrate the raw snapshot without validating it.
pub fn read_snapshot(path: &Path) -> Result<GridSnapshot> {
    if !path.exists() {
        return Err(CliError::StateMissing {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    let snapshot: GridSnapshot = serde_json::from_str(&text)?;
    if !needs_migration(&snapshot) {
        return Ok(snapshot);
    }

    let migrated = migrate_snapshot(snapshot)?;
    for warning in &migrated.warnings {
        warn!(path = %path.display(), from = migrated.from_version, "{warning}");
    }
    Ok(migrated.snapshot)
}

/// Load a validated grid state.
pub fn load(path: &Path) -> Result<GridState> {
    let snapshot = read_snapshot(path)?;
    let state = GridState::from_snapshot(snapshot)?;
    debug!(path = %path.display(), widgets = state.widgets().len(), "state loaded");
    Ok(state)
}

/// Persist `state` atomically.
pub fn save(path: &Path, state: &GridState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(&state.to_snapshot())?;
    content.push('\n');

    let temp = temp_path(path);
    fs::write(&temp, content)?;
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    debug!(path = %path.display(), hash = state.state_hash(), "state saved");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "dashgrid.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
