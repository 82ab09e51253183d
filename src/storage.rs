// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for saved snapshots

use crate::constants::snapshot;
use std::path::PathBuf;
use tracing::debug;

/// Directory where snapshots are saved: `<pictures>/edge-viewer`
///
/// Falls back to the home directory (or the current directory) when no
/// XDG pictures directory is configured.
pub fn snapshot_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(snapshot::PICTURES_SUBDIR)
}

/// Load the latest snapshot for the gallery button
///
/// Scans the snapshot directory for PNG files, finds the most recent
/// one, and loads it as an image handle.
pub async fn load_latest_thumbnail(snapshots_dir: PathBuf) -> Option<cosmic::widget::image::Handle> {
    let mut entries = tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&snapshots_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if let Some(ext) = path.extension()
                    && ext.to_string_lossy().eq_ignore_ascii_case("png")
                {
                    files.push(entry);
                }
            }
        }
        files
    })
    .await
    .ok()?;

    if entries.is_empty() {
        return None;
    }

    // Sort by modification time (newest first)
    entries.sort_by_key(|e| {
        e.metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(std::cmp::Reverse)
    });

    let latest_path = entries.first()?.path();

    debug!(path = ?latest_path, "Loading latest thumbnail");

    let bytes = tokio::fs::read(&latest_path).await.ok()?;
    Some(cosmic::widget::image::Handle::from_bytes(bytes))
}
