use crate::app::AppState;
use crate::errors::AppError;
use crate::io;
use crate::service::{reduce, Command};
use crate::tree::Tree;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Tree as it should be persisted: a pending placeholder is left out.
pub fn tree_for_save(app: &AppState) -> Tree {
    match &app.generation {
        Some(pending) => {
            reduce(
                app.tree(),
                &Command::Delete {
                    id: pending.placeholder.clone(),
                },
            )
            .tree
        }
        None => app.tree().clone(),
    }
}

/// Writes the map to its file and marks the session clean.
pub fn write(app: &mut AppState) -> Result<PathBuf> {
    let path = app
        .filename
        .clone()
        .or_else(|| app.config.map_path())
        .ok_or(AppError::DataDirNotFound)?;

    io::save_map(&tree_for_save(app), &path)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    app.mark_saved();
    Ok(path)
}

pub fn save(app: &mut AppState) -> Result<()> {
    let path = write(app)?;
    app.set_message(format!("Saved to {}", path.display()));
    Ok(())
}

/// True when auto-save is on, there are unsaved changes, and the interval
/// since the last save has passed.
pub fn auto_save_due(app: &AppState, now: Instant) -> bool {
    if !app.config.auto_save || !app.is_dirty() {
        return false;
    }
    let interval = Duration::from_secs(app.config.auto_save_interval);
    app.last_save_time
        .map_or(true, |last| now.duration_since(last) >= interval)
}
