// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera capture backend

use gstreamer::buffer::{MappedBuffer, Readable};
use std::sync::Arc;
use std::time::Instant;

/// Frame bytes, either owned or borrowed zero-copy from GStreamer
///
/// The `Mapped` variant keeps the GStreamer buffer mapped and alive until
/// every clone of the frame is dropped, so the capture path never copies
/// pixel data.
#[derive(Clone)]
pub enum FrameData {
    /// Owned bytes (tests and synthetic frames)
    Copied(Arc<[u8]>),
    /// Mapped GStreamer buffer, reference-counted
    Mapped(Arc<MappedBuffer<Readable>>),
}

impl FrameData {
    /// Create FrameData from a mapped GStreamer buffer (zero-copy)
    pub fn from_mapped_buffer(buffer: MappedBuffer<Readable>) -> Self {
        FrameData::Mapped(Arc::new(buffer))
    }

    /// Get the length of the frame data in bytes
    pub fn len(&self) -> usize {
        match self {
            FrameData::Copied(data) => data.len(),
            FrameData::Mapped(buf) => buf.len(),
        }
    }

    /// Check if the frame data is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FrameData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameData::Copied(data) => write!(f, "FrameData::Copied({} bytes)", data.len()),
            FrameData::Mapped(buf) => write!(f, "FrameData::Mapped({} bytes)", buf.len()),
        }
    }
}

impl AsRef<[u8]> for FrameData {
    fn as_ref(&self) -> &[u8] {
        match self {
            FrameData::Copied(data) => data.as_ref(),
            FrameData::Mapped(buf) => buf.as_slice(),
        }
    }
}

impl std::ops::Deref for FrameData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_ref()
    }
}

/// Represents a camera device discovered via PipeWire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human-readable device name (e.g., "Integrated Camera")
    pub name: String,
    /// Capture path (PipeWire serial or node ID, empty for auto-select)
    pub path: String,
    /// PipeWire node ID, used for format enumeration via pw-cli
    pub node_id: Option<String>,
    /// Camera location hint from the device properties: "front", "back", or "external"
    pub camera_location: Option<String>,
}

/// Framerate as an exact fraction
///
/// Kept as numerator/denominator so NTSC rates like 59.94 (60000/1001)
/// survive the round trip into GStreamer caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Framerate {
    pub num: u32,
    pub denom: u32,
}

impl Framerate {
    /// Create a new framerate from numerator and denominator
    pub fn new(num: u32, denom: u32) -> Self {
        Self {
            num,
            denom: if denom == 0 { 1 } else { denom },
        }
    }

    /// Create a framerate from an integer (e.g., 30 becomes 30/1)
    pub fn from_int(fps: u32) -> Self {
        Self { num: fps, denom: 1 }
    }

    /// Get the framerate as a floating point value
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }

    /// Get the rounded integer framerate
    pub fn as_int(&self) -> u32 {
        self.num / self.denom
    }

    /// Format as GStreamer fraction string (e.g., "60000/1001")
    pub fn as_gst_fraction(&self) -> String {
        format!("{}/{}", self.num, self.denom)
    }
}

impl std::fmt::Display for Framerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fps = self.as_f64();
        // Show decimal for non-integer framerates (NTSC)
        if self.denom != 1 {
            write!(f, "{:.2}", fps)
        } else {
            write!(f, "{}", self.num)
        }
    }
}

impl Default for Framerate {
    fn default() -> Self {
        Self { num: 30, denom: 1 }
    }
}

/// Camera format specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub framerate: Option<Framerate>,
    /// GStreamer format string (e.g., "YUY2", "NV12")
    pub pixel_format: String,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(fps) = &self.framerate {
            write!(f, "{}x{} @ {}fps", self.width, self.height, fps)
        } else {
            write!(f, "{}x{}", self.width, self.height)
        }
    }
}

/// Pixel format for camera frames
///
/// RGBA is the canonical format the edge pipeline consumes; the other
/// variants are converted on the CPU by `format_converters` before
/// processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// BGRA - 32-bit with alpha (B G R A byte order)
    BGRA,
    /// NV12 - Semi-planar 4:2:0 (Y plane + interleaved UV plane)
    NV12,
    /// NV21 - Semi-planar 4:2:0 (Y plane + interleaved VU plane)
    NV21,
    /// I420 - Planar 4:2:0 (separate Y, U, V planes)
    I420,
    /// YUYV - Packed 4:2:2 (Y0 U Y1 V interleaved)
    YUYV,
    /// UYVY - Packed 4:2:2 (U Y0 V Y1 interleaved)
    UYVY,
    /// YVYU - Packed 4:2:2 (Y0 V Y1 U interleaved)
    YVYU,
    /// VYUY - Packed 4:2:2 (V Y0 U Y1 interleaved)
    VYUY,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
}

impl PixelFormat {
    /// Parse format from GStreamer format string
    pub fn from_gst_format(format: &str) -> Option<Self> {
        match format {
            "RGBA" | "RGBx" | "xRGB" | "ARGB" => Some(Self::RGBA),
            "BGRA" | "BGRx" => Some(Self::BGRA),
            "NV12" => Some(Self::NV12),
            "NV21" => Some(Self::NV21),
            "I420" | "YV12" => Some(Self::I420),
            "YUYV" | "YUY2" => Some(Self::YUYV),
            "UYVY" => Some(Self::UYVY),
            "YVYU" => Some(Self::YVYU),
            "VYUY" => Some(Self::VYUY),
            "GRAY8" | "GREY" | "Y8" => Some(Self::Gray8),
            "RGB" | "BGR" => Some(Self::RGB24),
            _ => None,
        }
    }
}

/// YUV plane offsets for multi-plane formats (NV12, NV21, I420)
///
/// For planar/semi-planar YUV formats, the planes are stored at different
/// offsets within a single contiguous buffer. The offsets and strides here
/// let the converters extract each plane without copying first.
#[derive(Debug, Clone, Copy)]
pub struct YuvPlanes {
    /// Y plane offset in bytes from start of buffer
    pub y_offset: usize,
    /// UV plane offset in bytes (NV12/NV21: interleaved chroma, I420: U plane)
    pub uv_offset: usize,
    /// UV plane stride in bytes
    pub uv_stride: u32,
    /// V plane offset in bytes (I420 only, 0 otherwise)
    pub v_offset: usize,
    /// V plane stride in bytes (I420 only)
    pub v_stride: u32,
}

/// A single frame from the camera
///
/// For YUV formats, `data` contains the entire buffer (all planes
/// contiguous, zero-copy) and `yuv_planes` holds the plane offsets.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Frame data: RGBA pixels, Y plane (NV12/I420), or packed YUYV
    pub data: FrameData,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride for the main data (bytes per row, may include padding)
    pub stride: u32,
    /// Additional YUV planes (for planar/semi-planar formats)
    pub yuv_planes: Option<YuvPlanes>,
    /// Timestamp when frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

/// Frame receiver type for preview streams
pub type FrameReceiver = cosmic::iced::futures::channel::mpsc::Receiver<CameraFrame>;

/// Frame sender type for preview streams
pub type FrameSender = cosmic::iced::futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
///
/// All variants are recoverable: the application reports them in the UI and
/// keeps running so the user can retry or pick another device.
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Access to the camera was denied (portal/permission)
    PermissionDenied(String),
    /// Device is in use by another client
    DeviceBusy(String),
    /// Format not supported
    FormatNotSupported(String),
    /// Backend crashed or became unresponsive
    Crashed(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::PermissionDenied(msg) => write!(f, "Camera access denied: {}", msg),
            BackendError::DeviceBusy(msg) => write!(f, "Device busy: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::Crashed(msg) => write!(f, "Backend crashed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
