// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Listing available cameras and their formats
//! - Capturing a single processed frame without the GUI

use edge_viewer::backends::camera::pipewire::{
    PipeWirePipeline, enumerate_pipewire_cameras, get_pipewire_formats, is_pipewire_available,
    select_preview_format,
};
use edge_viewer::backends::camera::types::CameraFrame;
use edge_viewer::constants::edge;
use edge_viewer::errors::AppResult;
use edge_viewer::pipelines::edge::{EdgeViewMode, FilterParams, process_frame};
use edge_viewer::pipelines::snapshot::SnapshotPipeline;
use futures::channel::mpsc;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// List all available cameras
pub fn list_cameras() -> AppResult<()> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_pipewire_cameras().unwrap_or_default();

    if cameras.is_empty() {
        if !is_pipewire_available() {
            println!("PipeWire is not available on this system.");
        } else {
            println!("No cameras found.");
        }
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);

        let formats = get_pipewire_formats(camera);
        if !formats.is_empty() {
            // Group formats by resolution and show best framerate
            let mut resolutions: Vec<(u32, u32, u32)> = Vec::new();
            for format in &formats {
                let fps = format.framerate.map(|f| f.as_int()).unwrap_or(30);
                if let Some(existing) = resolutions
                    .iter_mut()
                    .find(|(w, h, _)| *w == format.width && *h == format.height)
                {
                    if fps > existing.2 {
                        existing.2 = fps;
                    }
                } else {
                    resolutions.push((format.width, format.height, fps));
                }
            }

            // Sort by resolution (highest first)
            resolutions.sort_by(|a, b| (b.0 * b.1).cmp(&(a.0 * a.1)));

            let display_count = resolutions.len().min(3);
            let res_strs: Vec<String> = resolutions
                .iter()
                .take(display_count)
                .map(|(w, h, fps)| format!("{}x{}@{}fps", w, h, fps))
                .collect();

            println!("      Formats: {}", res_strs.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Capture a single processed frame and save it as PNG
pub fn take_snapshot(
    camera_index: usize,
    threshold: Option<f32>,
    original: bool,
    output: Option<PathBuf>,
) -> AppResult<()> {
    // Initialize GStreamer
    gstreamer::init()?;

    // Enumerate cameras
    let cameras = enumerate_pipewire_cameras().unwrap_or_default();
    if cameras.is_empty() {
        if !is_pipewire_available() {
            return Err("PipeWire is not available on this system".into());
        }
        return Err("No cameras found".into());
    }

    if camera_index >= cameras.len() {
        return Err(format!(
            "Camera index {} out of range (0-{})",
            camera_index,
            cameras.len() - 1
        )
        .into());
    }

    let camera = &cameras[camera_index];
    println!("Using camera: {}", camera.name);

    let formats = get_pipewire_formats(camera);
    let format = select_preview_format(&formats).ok_or("No formats available for camera")?;
    println!("Capture format: {}x{}", format.width, format.height);

    // Same parameter handling as the GUI: slider-range clamp first,
    // floor clamp inside the pipeline
    let mode = if original {
        EdgeViewMode::Original
    } else {
        EdgeViewMode::Edges
    };
    let params = FilterParams::new(threshold.unwrap_or(edge::DEFAULT_THRESHOLD), mode, false);
    if let Some(t) = threshold {
        println!("Threshold: {:.0}", params.threshold());
        if t != params.threshold() {
            println!("  (clamped from {:.0})", t);
        }
    }

    // Determine output directory
    let output_dir = if let Some(path) = output.as_ref() {
        if path.is_dir() {
            path.clone()
        } else {
            path.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(edge_viewer::storage::snapshot_dir)
        }
    } else {
        edge_viewer::storage::snapshot_dir()
    };

    // Start camera pipeline
    println!("Capturing...");
    let (sender, mut receiver) =
        mpsc::channel(edge_viewer::constants::pipeline::FRAME_CHANNEL_CAPACITY);
    let pipeline = PipeWirePipeline::new(camera, &format, sender)?;

    // Wait for frames to stabilize (camera warm-up)
    let start = Instant::now();
    let timeout = Duration::from_secs(5);
    let warmup = Duration::from_millis(500);
    let mut frame: Option<CameraFrame> = None;

    while start.elapsed() < timeout {
        match receiver.try_next() {
            Ok(Some(f)) => {
                frame = Some(f);
                // After warmup period, use the next good frame
                if start.elapsed() > warmup {
                    break;
                }
            }
            _ => {
                // No frame available yet, wait a bit
                std::thread::sleep(Duration::from_millis(16));
            }
        }
    }

    let frame = frame.ok_or("Failed to capture frame from camera")?;

    let edge_frame =
        process_frame(&frame, &params, 0).ok_or("Failed to process captured frame")?;
    drop(frame);

    // Release the camera before encoding; the processed frame owns its pixels
    pipeline.stop()?;

    // Create async runtime for the snapshot pipeline
    let rt = tokio::runtime::Runtime::new()?;
    let output_path =
        rt.block_on(
            async { SnapshotPipeline::capture_and_save(Some(edge_frame), &output_dir).await },
        )?;

    // If user specified a specific filename, rename the file
    if let Some(user_path) = output
        && !user_path.is_dir()
    {
        std::fs::rename(&output_path, &user_path)?;
        println!("Snapshot saved: {}", user_path.display());
        return Ok(());
    }

    println!("Snapshot saved: {}", output_path.display());
    Ok(())
}
