// SPDX-License-Identifier: GPL-3.0-only

//! Edge detection and compositing
//!
//! Wraps `imageproc` for the per-frame work: grayscale conversion,
//! Gaussian blur, Canny edge detection, and the two-mode compositor.
//! Everything here is deterministic: the same input bytes and threshold
//! produce bit-identical output.

use super::params::{EdgeViewMode, FilterParams, effective_threshold};
use crate::backends::camera::format_converters::frame_to_rgba;
use crate::backends::camera::types::CameraFrame;
use crate::constants::edge;
use image::{GrayImage, RgbaImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use std::sync::Arc;
use tracing::warn;

/// A finished, composited frame ready for display or saving
#[derive(Debug, Clone)]
pub struct EdgeFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly-packed RGBA output
    pub rgba: Arc<[u8]>,
    /// Display mode this frame was composited with
    pub mode: EdgeViewMode,
    /// Effective low Canny threshold applied (floor-clamped)
    pub threshold: f32,
    /// Camera session that produced this frame; the UI rejects frames
    /// from retired sessions
    pub generation: u64,
}

/// Run blur + Canny on a grayscale image
///
/// The low threshold is clamped to the floor before use; the high
/// threshold is always three times the low one.
pub fn detect_edges(gray: &GrayImage, threshold: f32) -> GrayImage {
    let low = effective_threshold(threshold);
    let blurred = gaussian_blur_f32(gray, edge::BLUR_SIGMA);
    canny(&blurred, low, low * edge::CANNY_HIGH_RATIO)
}

/// Composite an edge mask onto an opaque black background
///
/// Mask pixels become white (255,255,255,255), everything else stays
/// opaque black.
pub fn composite_edges(mask: &GrayImage) -> Vec<u8> {
    let pixel_count = (mask.width() * mask.height()) as usize;
    let mut rgba = vec![0u8; pixel_count * 4];

    for (i, px) in mask.as_raw().iter().enumerate() {
        let base = i * 4;
        if *px > 0 {
            rgba[base] = 255;
            rgba[base + 1] = 255;
            rgba[base + 2] = 255;
        }
        rgba[base + 3] = 255;
    }

    rgba
}

/// Mirror an RGBA buffer horizontally in place
fn mirror_rgba(rgba: &mut [u8], width: u32, height: u32) {
    let w = width as usize;
    for row in 0..height as usize {
        let line = &mut rgba[row * w * 4..(row + 1) * w * 4];
        for col in 0..w / 2 {
            let (a, b) = (col * 4, (w - 1 - col) * 4);
            for ch in 0..4 {
                line.swap(a + ch, b + ch);
            }
        }
    }
}

/// Process one camera frame into a composited RGBA frame
///
/// Reads the filter parameters once at entry so a mid-frame UI change
/// never mixes settings within one output. Returns `None` for frames
/// the converters reject (truncated buffers).
pub fn process_frame(
    frame: &CameraFrame,
    params: &FilterParams,
    generation: u64,
) -> Option<EdgeFrame> {
    let mode = params.view_mode();
    let threshold = params.effective_threshold();
    let mirror = params.mirror();

    let mut rgba = match frame_to_rgba(frame) {
        Some(rgba) => rgba,
        None => {
            warn!(
                width = frame.width,
                height = frame.height,
                format = ?frame.format,
                "Dropping frame the converters rejected"
            );
            return None;
        }
    };

    if mode == EdgeViewMode::Edges {
        let rgba_image = RgbaImage::from_raw(frame.width, frame.height, rgba)?;
        let gray = image::DynamicImage::ImageRgba8(rgba_image).to_luma8();
        let mask = detect_edges(&gray, threshold);
        rgba = composite_edges(&mask);
    }

    if mirror {
        mirror_rgba(&mut rgba, frame.width, frame.height);
    }

    Some(EdgeFrame {
        width: frame.width,
        height: frame.height,
        rgba: Arc::from(rgba),
        mode,
        threshold,
        generation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::{FrameData, PixelFormat};
    use crate::pipelines::edge::params::FilterParams;
    use std::time::Instant;

    /// Grayscale test card with a sharp vertical step in the middle
    fn step_gray(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                image::Luma([0u8])
            } else {
                image::Luma([255u8])
            }
        })
    }

    fn gray_camera_frame(gray: &GrayImage) -> CameraFrame {
        CameraFrame {
            width: gray.width(),
            height: gray.height(),
            data: FrameData::Copied(Arc::from(gray.as_raw().as_slice())),
            format: PixelFormat::Gray8,
            stride: gray.width(),
            yuv_planes: None,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_detect_edges_deterministic() {
        let gray = step_gray(64, 64);
        let a = detect_edges(&gray, 40.0);
        let b = detect_edges(&gray, 40.0);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_detect_edges_finds_step() {
        let gray = step_gray(64, 64);
        let mask = detect_edges(&gray, 40.0);
        assert!(mask.as_raw().iter().any(|&px| px > 0));
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let gray = GrayImage::from_pixel(32, 32, image::Luma([128u8]));
        let mask = detect_edges(&gray, 40.0);
        assert!(mask.as_raw().iter().all(|&px| px == 0));
    }

    #[test]
    fn test_composite_paints_black_and_white_only() {
        let gray = step_gray(32, 32);
        let mask = detect_edges(&gray, 40.0);
        let rgba = composite_edges(&mask);

        assert_eq!(rgba.len(), 32 * 32 * 4);
        for px in rgba.chunks_exact(4) {
            assert!(px[..3] == [0, 0, 0] || px[..3] == [255, 255, 255]);
            assert_eq!(px[3], 255, "all pixels must be opaque");
        }
    }

    #[test]
    fn test_process_frame_original_passthrough() {
        let gray = step_gray(16, 16);
        let frame = gray_camera_frame(&gray);
        let params = FilterParams::new(80.0, EdgeViewMode::Original, false);

        let out = process_frame(&frame, &params, 1).unwrap();
        assert_eq!(out.mode, EdgeViewMode::Original);
        assert_eq!(out.generation, 1);
        // Gray8 passthrough expands each luma value into RGB
        assert_eq!(&out.rgba[0..4], &[0, 0, 0, 255]);
        assert_eq!(&out.rgba[60..64], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_process_frame_double_toggle_restores_output() {
        let gray = step_gray(32, 32);
        let frame = gray_camera_frame(&gray);
        let params = FilterParams::new(40.0, EdgeViewMode::Edges, false);

        let first = process_frame(&frame, &params, 0).unwrap();
        params.toggle_view_mode();
        let toggled = process_frame(&frame, &params, 0).unwrap();
        params.toggle_view_mode();
        let restored = process_frame(&frame, &params, 0).unwrap();

        assert_ne!(first.rgba, toggled.rgba);
        assert_eq!(first.rgba, restored.rgba);
        assert_eq!(first.mode, restored.mode);
    }

    #[test]
    fn test_process_frame_mirror() {
        let gray = step_gray(16, 1);
        let frame = gray_camera_frame(&gray);
        let params = FilterParams::new(80.0, EdgeViewMode::Original, true);

        let out = process_frame(&frame, &params, 0).unwrap();
        // Mirrored: the bright half now starts on the left
        assert_eq!(&out.rgba[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_threshold_recorded_is_effective() {
        let gray = step_gray(8, 8);
        let frame = gray_camera_frame(&gray);
        let params = FilterParams::new(3.0, EdgeViewMode::Edges, false);

        let out = process_frame(&frame, &params, 0).unwrap();
        assert_eq!(out.threshold, crate::constants::edge::THRESHOLD_FLOOR);
    }
}
