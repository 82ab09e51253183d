// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera backend
//!
//! Camera enumeration, format detection, and capture via PipeWire. The
//! GUI subscription, the terminal viewer, and the CLI all drive the
//! pipeline directly.

mod enumeration;
mod pipeline;

pub use enumeration::{enumerate_pipewire_cameras, get_pipewire_formats, is_pipewire_available};
pub use pipeline::PipeWirePipeline;

use super::types::CameraFormat;
use crate::constants::edge;

/// Pick the capture format for live edge processing
///
/// Canny runs on the CPU per frame, so prefer the format closest to the
/// processing target resolution over the highest one the sensor offers.
/// Ties go to the higher framerate.
pub fn select_preview_format(formats: &[CameraFormat]) -> Option<CameraFormat> {
    let target = (edge::TARGET_WIDTH * edge::TARGET_HEIGHT) as i64;

    formats
        .iter()
        .min_by_key(|f| {
            let pixels = (f.width * f.height) as i64;
            let distance = (pixels - target).abs();
            let fps = f.framerate.map(|r| r.as_int()).unwrap_or(0) as i64;
            // Distance dominates; framerate breaks ties (higher is better)
            (distance, -fps)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::Framerate;

    fn fmt(width: u32, height: u32, fps: u32) -> CameraFormat {
        CameraFormat {
            width,
            height,
            framerate: Some(Framerate::from_int(fps)),
            pixel_format: "YUY2".to_string(),
        }
    }

    #[test]
    fn test_select_prefers_target_resolution() {
        let formats = vec![fmt(3840, 2160, 30), fmt(1280, 720, 30), fmt(640, 480, 30)];
        let selected = select_preview_format(&formats).unwrap();
        assert_eq!((selected.width, selected.height), (1280, 720));
    }

    #[test]
    fn test_select_prefers_higher_framerate_on_tie() {
        let formats = vec![fmt(1280, 720, 15), fmt(1280, 720, 30)];
        let selected = select_preview_format(&formats).unwrap();
        assert_eq!(selected.framerate, Some(Framerate::from_int(30)));
    }

    #[test]
    fn test_select_empty_list() {
        assert!(select_preview_format(&[]).is_none());
    }
}
