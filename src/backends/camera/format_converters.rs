// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion to RGBA
//!
//! The edge pipeline consumes RGBA; these converters turn every camera
//! format the PipeWire backend negotiates into RGBA on the CPU. All
//! converters are stride-aware since GStreamer buffers may pad rows.

use super::types::{CameraFrame, PixelFormat};

/// Convert a single YUV sample to RGB (BT.601)
#[inline]
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    let u = u - 128.0;
    let v = v - 128.0;
    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
    [r, g, b]
}

/// Convert packed 4:2:2 YUV to RGBA
///
/// The byte order within each 4-byte group is given by the offsets of
/// (Y0, U, Y1, V): YUYV = (0,1,2,3), UYVY = (1,0,3,2), YVYU = (0,3,2,1),
/// VYUY = (1,2,3,0).
fn packed_422_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
    offsets: (usize, usize, usize, usize),
) -> Vec<u8> {
    let (y0_off, u_off, y1_off, v_off) = offsets;
    let w = width as usize;
    let h = height as usize;
    let stride = stride as usize;
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in 0..h {
        let line = &data[row * stride..];
        for pair in 0..w / 2 {
            let group = &line[pair * 4..pair * 4 + 4];
            let y0 = group[y0_off] as f32;
            let u = group[u_off] as f32;
            let y1 = group[y1_off] as f32;
            let v = group[v_off] as f32;

            for y in [y0, y1] {
                let [r, g, b] = yuv_to_rgb(y, u, v);
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
        }
        // Odd width: the last group still carries one valid pixel
        if w % 2 == 1 {
            let group = &line[(w / 2) * 4..(w / 2) * 4 + 4];
            let [r, g, b] = yuv_to_rgb(
                group[y0_off] as f32,
                group[u_off] as f32,
                group[v_off] as f32,
            );
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    rgba
}

/// Convert semi-planar 4:2:0 (NV12/NV21) to RGBA
///
/// `swap_uv` is true for NV21 (VU order instead of UV).
fn semiplanar_420_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    y_stride: u32,
    uv_offset: usize,
    uv_stride: u32,
    swap_uv: bool,
) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let y_stride = y_stride as usize;
    let uv_stride = uv_stride as usize;
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in 0..h {
        let y_line = &data[row * y_stride..];
        let uv_line = &data[uv_offset + (row / 2) * uv_stride..];
        for col in 0..w {
            let y = y_line[col] as f32;
            let uv_idx = (col / 2) * 2;
            let (u, v) = if swap_uv {
                (uv_line[uv_idx + 1] as f32, uv_line[uv_idx] as f32)
            } else {
                (uv_line[uv_idx] as f32, uv_line[uv_idx + 1] as f32)
            };
            let [r, g, b] = yuv_to_rgb(y, u, v);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    rgba
}

/// Convert planar 4:2:0 (I420) to RGBA
fn planar_420_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    y_stride: u32,
    u_offset: usize,
    u_stride: u32,
    v_offset: usize,
    v_stride: u32,
) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let y_stride = y_stride as usize;
    let u_stride = u_stride as usize;
    let v_stride = v_stride as usize;
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in 0..h {
        let y_line = &data[row * y_stride..];
        let u_line = &data[u_offset + (row / 2) * u_stride..];
        let v_line = &data[v_offset + (row / 2) * v_stride..];
        for col in 0..w {
            let y = y_line[col] as f32;
            let u = u_line[col / 2] as f32;
            let v = v_line[col / 2] as f32;
            let [r, g, b] = yuv_to_rgb(y, u, v);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    rgba
}

/// Convert 8-bit grayscale to RGBA
fn gray8_to_rgba(data: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let stride = stride as usize;
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in 0..h {
        let line = &data[row * stride..];
        for &gray in &line[..w] {
            rgba.extend_from_slice(&[gray, gray, gray, 255]);
        }
    }

    rgba
}

/// Convert 24-bit RGB to RGBA
fn rgb24_to_rgba(data: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let stride = stride as usize;
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in 0..h {
        let line = &data[row * stride..];
        for chunk in line[..w * 3].chunks_exact(3) {
            rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
        }
    }

    rgba
}

/// Convert BGRA to RGBA (swap red and blue channels)
fn bgra_to_rgba(data: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let stride = stride as usize;
    let mut rgba = Vec::with_capacity(w * h * 4);

    for row in 0..h {
        let line = &data[row * stride..];
        for chunk in line[..w * 4].chunks_exact(4) {
            rgba.extend_from_slice(&[chunk[2], chunk[1], chunk[0], chunk[3]]);
        }
    }

    rgba
}

/// UV plane location for NV12/NV21 (offset, stride)
fn semiplanar_layout(frame: &CameraFrame) -> (usize, u32) {
    match frame.yuv_planes {
        Some(planes) => (planes.uv_offset, planes.uv_stride),
        // Contiguous layout: UV plane follows the Y plane
        None => (
            (frame.height as usize) * (frame.stride as usize),
            frame.stride,
        ),
    }
}

/// U and V plane locations for I420 (u_offset, u_stride, v_offset, v_stride)
fn planar_layout(frame: &CameraFrame) -> (usize, u32, usize, u32) {
    match frame.yuv_planes {
        Some(planes) => (
            planes.uv_offset,
            planes.uv_stride,
            planes.v_offset,
            planes.v_stride,
        ),
        None => {
            let y_size = (frame.height as usize) * (frame.stride as usize);
            let u_stride = frame.stride.div_ceil(2);
            let u_size = (frame.height as usize).div_ceil(2) * (u_stride as usize);
            (y_size, u_stride, y_size + u_size, u_stride)
        }
    }
}

/// Strip row padding from tightly-interpretable RGBA data
fn rgba_unstride(data: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let stride = stride as usize;

    if stride == w * 4 {
        return data[..w * h * 4].to_vec();
    }

    let mut rgba = Vec::with_capacity(w * h * 4);
    for row in 0..h {
        rgba.extend_from_slice(&data[row * stride..row * stride + w * 4]);
    }
    rgba
}

/// Convert a camera frame to tightly-packed RGBA pixels
///
/// Returns `None` when the buffer is too small for the advertised
/// dimensions (a truncated frame from a dying pipeline).
pub fn frame_to_rgba(frame: &CameraFrame) -> Option<Vec<u8>> {
    let data: &[u8] = frame.data.as_ref();
    let (w, h, stride) = (frame.width, frame.height, frame.stride);

    let min_len = match frame.format {
        PixelFormat::RGBA | PixelFormat::BGRA => (h as usize) * (stride as usize),
        PixelFormat::RGB24 | PixelFormat::Gray8 => (h as usize) * (stride as usize),
        PixelFormat::YUYV | PixelFormat::UYVY | PixelFormat::YVYU | PixelFormat::VYUY => {
            (h as usize) * (stride as usize)
        }
        // Planar formats: main stride covers the Y plane only; chroma
        // planes have ceil(h/2) rows, so odd heights need the full
        // last chroma row counted
        PixelFormat::NV12 | PixelFormat::NV21 => {
            let (uv_offset, uv_stride) = semiplanar_layout(frame);
            uv_offset + (h as usize).div_ceil(2) * (uv_stride as usize)
        }
        PixelFormat::I420 => {
            let (_, _, v_offset, v_stride) = planar_layout(frame);
            v_offset + (h as usize).div_ceil(2) * (v_stride as usize)
        }
    };
    if data.len() < min_len || w == 0 || h == 0 {
        return None;
    }

    let rgba = match frame.format {
        PixelFormat::RGBA => rgba_unstride(data, w, h, stride),
        PixelFormat::BGRA => bgra_to_rgba(data, w, h, stride),
        PixelFormat::RGB24 => rgb24_to_rgba(data, w, h, stride),
        PixelFormat::Gray8 => gray8_to_rgba(data, w, h, stride),
        PixelFormat::YUYV => packed_422_to_rgba(data, w, h, stride, (0, 1, 2, 3)),
        PixelFormat::UYVY => packed_422_to_rgba(data, w, h, stride, (1, 0, 3, 2)),
        PixelFormat::YVYU => packed_422_to_rgba(data, w, h, stride, (0, 3, 2, 1)),
        PixelFormat::VYUY => packed_422_to_rgba(data, w, h, stride, (1, 2, 3, 0)),
        PixelFormat::NV12 | PixelFormat::NV21 => {
            let swap = frame.format == PixelFormat::NV21;
            let (uv_offset, uv_stride) = semiplanar_layout(frame);
            semiplanar_420_to_rgba(data, w, h, stride, uv_offset, uv_stride, swap)
        }
        PixelFormat::I420 => {
            let (u_offset, u_stride, v_offset, v_stride) = planar_layout(frame);
            planar_420_to_rgba(data, w, h, stride, u_offset, u_stride, v_offset, v_stride)
        }
    };

    Some(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::FrameData;
    use std::sync::Arc;
    use std::time::Instant;

    fn make_frame(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: u32,
    ) -> CameraFrame {
        CameraFrame {
            width,
            height,
            data: FrameData::Copied(Arc::from(data.as_slice())),
            format,
            stride,
            yuv_planes: None,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_yuyv_white() {
        // Pure white in YUV (Y=255, U=128, V=128)
        let frame = make_frame(vec![255u8, 128, 255, 128], 2, 1, PixelFormat::YUYV, 4);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba.len(), 8);
        assert!(rgba[0] > 250); // R
        assert!(rgba[1] > 250); // G
        assert!(rgba[2] > 250); // B
        assert_eq!(rgba[3], 255); // A
    }

    #[test]
    fn test_uyvy_black() {
        // Pure black in YUV (Y=0, U=128, V=128)
        let frame = make_frame(vec![128u8, 0, 128, 0], 2, 1, PixelFormat::UYVY, 4);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba.len(), 8);
        assert!(rgba[0] < 5);
        assert!(rgba[1] < 5);
        assert!(rgba[2] < 5);
        assert_eq!(rgba[3], 255);
    }

    #[test]
    fn test_gray8_expands_channels() {
        let frame = make_frame(vec![0u8, 128, 255], 3, 1, PixelFormat::Gray8, 3);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba, vec![0, 0, 0, 255, 128, 128, 128, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_rgb24_adds_alpha() {
        let frame = make_frame(vec![255u8, 128, 64, 0, 0, 0], 2, 1, PixelFormat::RGB24, 6);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba[0..4], [255, 128, 64, 255]);
        assert_eq!(rgba[4..8], [0, 0, 0, 255]);
    }

    #[test]
    fn test_bgra_swaps_channels() {
        let frame = make_frame(vec![10u8, 20, 30, 255], 1, 1, PixelFormat::BGRA, 4);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba, vec![30, 20, 10, 255]);
    }

    #[test]
    fn test_rgba_strips_row_padding() {
        // 1x2 RGBA with 8-byte stride (4 bytes padding per row)
        let data = vec![1u8, 2, 3, 255, 0, 0, 0, 0, 4, 5, 6, 255, 0, 0, 0, 0];
        let frame = make_frame(data, 1, 2, PixelFormat::RGBA, 8);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_nv12_gray_midpoint() {
        // 2x2 NV12: Y plane all 128, UV plane neutral (128, 128)
        let data = vec![128u8, 128, 128, 128, 128, 128];
        let frame = make_frame(data, 2, 2, PixelFormat::NV12, 2);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba.len(), 16);
        for px in rgba.chunks_exact(4) {
            assert!((px[0] as i32 - 128).abs() < 3);
            assert!((px[1] as i32 - 128).abs() < 3);
            assert!((px[2] as i32 - 128).abs() < 3);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_i420_contiguous_layout() {
        // 2x2 I420: 4-byte Y plane + 1-byte U + 1-byte V, all neutral gray
        let data = vec![200u8, 200, 200, 200, 128, 128];
        let frame = make_frame(data, 2, 2, PixelFormat::I420, 2);
        let rgba = frame_to_rgba(&frame).unwrap();

        assert_eq!(rgba.len(), 16);
        for px in rgba.chunks_exact(4) {
            assert!((px[0] as i32 - 200).abs() < 3);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_truncated_buffer_rejected() {
        let frame = make_frame(vec![0u8; 4], 100, 100, PixelFormat::RGBA, 400);
        assert!(frame_to_rgba(&frame).is_none());
    }

    #[test]
    fn test_nv12_odd_height_truncated_rejected() {
        // 2x3 NV12, stride 2: 6 Y bytes + 2 chroma rows of 2 = 10;
        // a 9-byte buffer must be rejected, not read past the end
        let frame = make_frame(vec![128u8; 9], 2, 3, PixelFormat::NV12, 2);
        assert!(frame_to_rgba(&frame).is_none());
    }

    #[test]
    fn test_nv12_odd_height_converts() {
        let frame = make_frame(vec![128u8; 10], 2, 3, PixelFormat::NV12, 2);
        let rgba = frame_to_rgba(&frame).unwrap();
        assert_eq!(rgba.len(), 2 * 3 * 4);
    }

    #[test]
    fn test_i420_odd_height_bounds() {
        // 3x3 I420, stride 3: 9 Y + 2 rows of U and V at stride 2 = 17
        let short = make_frame(vec![128u8; 16], 3, 3, PixelFormat::I420, 3);
        assert!(frame_to_rgba(&short).is_none());

        let exact = make_frame(vec![128u8; 17], 3, 3, PixelFormat::I420, 3);
        assert_eq!(frame_to_rgba(&exact).unwrap().len(), 3 * 3 * 4);
    }
}
