// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire GStreamer pipeline for camera capture

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Raw formats the CPU converters can handle, in negotiation preference order
const SUPPORTED_FORMATS: &str = "{ RGBA, BGRA, YUY2, UYVY, YVYU, VYUY, NV12, NV21, I420, GRAY8, RGB }";

/// PipeWire camera pipeline
///
/// `pipewiresrc ! videoconvert ! appsink` with caps negotiated from the
/// requested `CameraFormat`. The appsink callback maps buffers zero-copy
/// and forwards them over a bounded channel; frames are dropped when the
/// consumer falls behind rather than blocking the PipeWire graph.
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl PipeWirePipeline {
    /// Create a new PipeWire pipeline and start it
    pub fn new(
        device: &CameraDevice,
        format: &CameraFormat,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        info!(
            device = %device.name,
            format = %format,
            "Creating PipeWire pipeline"
        );

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let description = build_pipeline_description(device, format);
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| classify_gst_error(&e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Parsed element is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        // Configure appsink for low latency: never sync to the clock, keep a
        // tiny queue, and drop stale frames instead of stalling the graph.
        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        debug!("Setting up frame callback");
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

                    let sample = match appsink.pull_sample() {
                        Ok(s) => s,
                        Err(e) => {
                            if frame_num % 30 == 0 {
                                error!(frame = frame_num, error = ?e, "Failed to pull sample");
                            }
                            return Err(gstreamer::FlowError::Eos);
                        }
                    };

                    let buffer = sample.buffer_owned().ok_or_else(|| {
                        if frame_num % 30 == 0 {
                            error!(frame = frame_num, "No buffer in sample");
                        }
                        gstreamer::FlowError::Error
                    })?;

                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        if frame_num % 30 == 0 {
                            warn!(frame = frame_num, "Buffer marked as corrupted, skipping frame");
                        }
                        return Err(gstreamer::FlowError::Error);
                    }

                    let caps = sample.caps().ok_or_else(|| {
                        if frame_num % 30 == 0 {
                            error!(frame = frame_num, "No caps in sample");
                        }
                        gstreamer::FlowError::Error
                    })?;

                    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                        if frame_num % 30 == 0 {
                            error!(frame = frame_num, error = ?e, "Failed to get video info");
                        }
                        gstreamer::FlowError::Error
                    })?;

                    let pixel_format = PixelFormat::from_gst_format(
                        video_info.format().to_str(),
                    )
                    .ok_or_else(|| {
                        if frame_num % 30 == 0 {
                            error!(
                                frame = frame_num,
                                format = %video_info.format(),
                                "Negotiated format has no CPU converter"
                            );
                        }
                        gstreamer::FlowError::NotNegotiated
                    })?;

                    // Map readable keeps the GStreamer buffer alive without copying
                    let map = buffer.into_mapped_buffer_readable().map_err(|_| {
                        if frame_num % 30 == 0 {
                            error!(frame = frame_num, "Failed to map buffer");
                        }
                        gstreamer::FlowError::Error
                    })?;

                    let stride = video_info.stride()[0] as u32;
                    let yuv_planes = match pixel_format {
                        PixelFormat::NV12 | PixelFormat::NV21 => Some(YuvPlanes {
                            y_offset: video_info.offset()[0],
                            uv_offset: video_info.offset()[1],
                            uv_stride: video_info.stride()[1] as u32,
                            v_offset: 0,
                            v_stride: 0,
                        }),
                        PixelFormat::I420 => Some(YuvPlanes {
                            y_offset: video_info.offset()[0],
                            uv_offset: video_info.offset()[1],
                            uv_stride: video_info.stride()[1] as u32,
                            v_offset: video_info.offset()[2],
                            v_stride: video_info.stride()[2] as u32,
                        }),
                        _ => None,
                    };

                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        data: FrameData::from_mapped_buffer(map),
                        format: pixel_format,
                        stride,
                        yuv_planes,
                        captured_at: frame_start,
                    };

                    // Non-blocking send; a full channel means the consumer is
                    // still busy with the previous frame, so this one is dropped
                    let mut sender = frame_sender.clone();
                    match sender.try_send(frame) {
                        Ok(_) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(
                                    frame = frame_num,
                                    total_us = frame_start.elapsed().as_micros(),
                                    width = video_info.width(),
                                    height = video_info.height(),
                                    "Frame forwarded"
                                );
                            }
                        }
                        Err(e) => {
                            if frame_num % 30 == 0 {
                                debug!(frame = frame_num, error = ?e, "Frame dropped (channel full)");
                            }
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        debug!("Setting pipeline to PLAYING state");
        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            classify_gst_error(&format!("Failed to start pipeline: {}", e))
        })?;

        // Wait for state change to complete
        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state");
        }

        info!("PipeWire camera initialization complete");

        Ok(Self { pipeline, appsink })
    }

    /// Stop the pipeline and release the camera
    pub fn stop(self) -> BackendResult<()> {
        info!("Stopping PipeWire pipeline");

        // Clear appsink callbacks to release all references
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        self.pipeline
            .set_state(gstreamer::State::Null)
            .map_err(|e| BackendError::Other(format!("Failed to stop pipeline: {}", e)))?;

        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        match result {
            Ok(_) => {
                info!(state = ?state, "PipeWire pipeline stopped successfully");
            }
            Err(e) => {
                debug!(error = ?e, state = ?state, "Pipeline state change had issues");
            }
        }

        Ok(())
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        // Clear callbacks first, then force Null to release the device immediately
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        debug!("PipeWire pipeline dropped");
    }
}

/// Build the gst-launch description for a device/format pair
fn build_pipeline_description(device: &CameraDevice, format: &CameraFormat) -> String {
    let source = match device.path.strip_prefix("pipewire-serial-") {
        Some(serial) => format!("pipewiresrc target-object={}", serial),
        // Empty path lets PipeWire auto-select the default camera
        None if device.path.is_empty() => "pipewiresrc".to_string(),
        None => format!(
            "pipewiresrc target-object={}",
            device.path.strip_prefix("pipewire-").unwrap_or(&device.path)
        ),
    };

    let mut caps = format!(
        "video/x-raw,format=(string){},width=(int){},height=(int){}",
        SUPPORTED_FORMATS, format.width, format.height
    );
    if let Some(fps) = format.framerate {
        caps.push_str(&format!(",framerate=(fraction){}", fps.as_gst_fraction()));
    }

    format!("{} ! videoconvert ! {} ! appsink name=sink", source, caps)
}

/// Map a GStreamer error message to the backend error taxonomy
fn classify_gst_error(message: &str) -> BackendError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("not authorized") {
        BackendError::PermissionDenied(message.to_string())
    } else if lower.contains("busy") || lower.contains("in use") {
        BackendError::DeviceBusy(message.to_string())
    } else if lower.contains("no such") || lower.contains("not found") {
        BackendError::DeviceNotFound(message.to_string())
    } else {
        BackendError::InitializationFailed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(path: &str) -> CameraDevice {
        CameraDevice {
            name: "Test Camera".to_string(),
            path: path.to_string(),
            node_id: None,
            camera_location: None,
        }
    }

    fn format_720p() -> CameraFormat {
        CameraFormat {
            width: 1280,
            height: 720,
            framerate: Some(Framerate::from_int(30)),
            pixel_format: "YUY2".to_string(),
        }
    }

    #[test]
    fn test_pipeline_description_with_serial() {
        let desc = build_pipeline_description(&device("pipewire-serial-2146"), &format_720p());
        assert!(desc.starts_with("pipewiresrc target-object=2146"));
        assert!(desc.contains("width=(int)1280"));
        assert!(desc.contains("framerate=(fraction)30/1"));
        assert!(desc.ends_with("appsink name=sink"));
    }

    #[test]
    fn test_pipeline_description_auto_select() {
        let desc = build_pipeline_description(&device(""), &format_720p());
        assert!(desc.starts_with("pipewiresrc !"));
    }

    #[test]
    fn test_classify_gst_error() {
        assert!(matches!(
            classify_gst_error("Device is busy"),
            BackendError::DeviceBusy(_)
        ));
        assert!(matches!(
            classify_gst_error("Permission denied by portal"),
            BackendError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify_gst_error("No such device"),
            BackendError::DeviceNotFound(_)
        ));
        assert!(matches!(
            classify_gst_error("link failed"),
            BackendError::InitializationFailed(_)
        ));
    }
}
