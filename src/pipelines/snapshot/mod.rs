// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot pipeline
//!
//! Saves the most recently finished frame as a PNG named
//! `edge_<unix-millis>.png` in the snapshot directory. Encoding runs on
//! a blocking task; the write goes through `tokio::fs`.

mod encoder;

pub use encoder::{EncodedSnapshot, SnapshotEncoder};

use crate::pipelines::edge::EdgeFrame;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors from the snapshot pipeline
///
/// All recoverable: the UI reports them as status messages and the
/// session keeps running.
#[derive(Debug, Clone)]
pub enum SnapshotError {
    /// No processed frame has arrived yet
    NoFrameAvailable,
    /// PNG encoding failed
    EncodingFailed(String),
    /// Writing the file failed
    SaveFailed(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::NoFrameAvailable => write!(f, "No frame to capture yet"),
            SnapshotError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            SnapshotError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::SaveFailed(err.to_string())
    }
}

/// Build the snapshot filename for a capture timestamp
pub fn snapshot_filename(unix_millis: i64) -> String {
    format!("edge_{}.png", unix_millis)
}

/// Snapshot pipeline: encode and save a processed frame
pub struct SnapshotPipeline;

impl SnapshotPipeline {
    /// Encode `frame` as PNG and write it into `output_dir`
    ///
    /// Creates the directory if needed. `frame` being `None` (no frame
    /// has finished yet) returns [`SnapshotError::NoFrameAvailable`]
    /// and writes nothing.
    pub async fn capture_and_save(
        frame: Option<EdgeFrame>,
        output_dir: &Path,
    ) -> SnapshotResult<PathBuf> {
        let frame = frame.ok_or(SnapshotError::NoFrameAvailable)?;

        let encoded = SnapshotEncoder::encode(frame).await?;

        tokio::fs::create_dir_all(output_dir).await?;

        let filename = snapshot_filename(chrono::Utc::now().timestamp_millis());
        let filepath = output_dir.join(&filename);

        info!(path = %filepath.display(), "Saving snapshot");
        tokio::fs::write(&filepath, &encoded.data).await?;

        info!(path = %filepath.display(), size = encoded.data.len(), "Snapshot saved");
        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::edge::EdgeViewMode;
    use std::sync::Arc;

    #[test]
    fn test_filename_pattern() {
        let name = snapshot_filename(1724500000123);
        assert_eq!(name, "edge_1724500000123.png");
        assert!(name.starts_with("edge_"));
        assert!(name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_no_frame_writes_nothing() {
        let dir = std::env::temp_dir().join("edge-viewer-test-no-frame");
        let _ = std::fs::remove_dir_all(&dir);

        let result = SnapshotPipeline::capture_and_save(None, &dir).await;
        assert!(matches!(result, Err(SnapshotError::NoFrameAvailable)));
        assert!(!dir.exists(), "no directory or file may be created");
    }

    #[tokio::test]
    async fn test_capture_and_save_roundtrip() {
        let dir = std::env::temp_dir().join("edge-viewer-test-save");
        let _ = std::fs::remove_dir_all(&dir);

        let frame = EdgeFrame {
            width: 4,
            height: 4,
            rgba: Arc::from(vec![0u8; 64].as_slice()),
            mode: EdgeViewMode::Edges,
            threshold: 80.0,
            generation: 0,
        };

        let path = SnapshotPipeline::capture_and_save(Some(frame), &dir)
            .await
            .unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("edge_") && name.ends_with(".png"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
