// SPDX-License-Identifier: GPL-3.0-only

//! PNG encoding for snapshots
//!
//! Encoding is CPU-bound and runs on `spawn_blocking` so the UI thread
//! and the frame path are never blocked by it.

use super::SnapshotError;
use crate::pipelines::edge::EdgeFrame;
use image::RgbaImage;
use tracing::{debug, info};

/// Encoded snapshot data ready for saving
pub struct EncodedSnapshot {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Snapshot encoder (PNG only — the lossless format the viewer saves)
pub struct SnapshotEncoder;

impl SnapshotEncoder {
    /// Encode a processed frame as PNG on a blocking task
    pub async fn encode(frame: EdgeFrame) -> Result<EncodedSnapshot, SnapshotError> {
        info!(
            width = frame.width,
            height = frame.height,
            mode = %frame.mode,
            "Starting snapshot encoding"
        );

        let result = tokio::task::spawn_blocking(move || {
            let image = RgbaImage::from_raw(frame.width, frame.height, frame.rgba.to_vec())
                .ok_or_else(|| {
                    SnapshotError::EncodingFailed(
                        "Frame buffer does not match its dimensions".to_string(),
                    )
                })?;

            let mut buffer = Vec::new();
            image
                .write_to(
                    &mut std::io::Cursor::new(&mut buffer),
                    image::ImageFormat::Png,
                )
                .map_err(|e| SnapshotError::EncodingFailed(e.to_string()))?;

            Ok(EncodedSnapshot {
                data: buffer,
                width: frame.width,
                height: frame.height,
            })
        })
        .await
        .map_err(|e| SnapshotError::EncodingFailed(format!("Encoding task failed: {}", e)))?;

        if let Ok(encoded) = &result {
            debug!(size = encoded.data.len(), "Snapshot encoding complete");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::edge::EdgeViewMode;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_encode_produces_png_magic() {
        let frame = EdgeFrame {
            width: 2,
            height: 2,
            rgba: Arc::from(vec![255u8; 16].as_slice()),
            mode: EdgeViewMode::Edges,
            threshold: 80.0,
            generation: 0,
        };

        let encoded = SnapshotEncoder::encode(frame).await.unwrap();
        assert_eq!(&encoded.data[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(encoded.width, 2);
    }

    #[tokio::test]
    async fn test_encode_rejects_mismatched_buffer() {
        let frame = EdgeFrame {
            width: 10,
            height: 10,
            rgba: Arc::from(vec![0u8; 4].as_slice()),
            mode: EdgeViewMode::Edges,
            threshold: 80.0,
            generation: 0,
        };

        assert!(matches!(
            SnapshotEncoder::encode(frame).await,
            Err(SnapshotError::EncodingFailed(_))
        ));
    }
}
