// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based edge viewer
//!
//! Renders the processed edge view to the terminal using Unicode
//! half-block characters for improved vertical resolution. Frames run
//! through the same edge pipeline as the GUI, so the terminal shows
//! the exact output a snapshot would save.

use crate::backends::camera::pipewire::{
    PipeWirePipeline, enumerate_pipewire_cameras, get_pipewire_formats, select_preview_format,
};
use crate::backends::camera::types::{CameraDevice, CameraFormat, CameraFrame};
use crate::constants::edge;
use crate::pipelines::edge::{EdgeFrame, FilterParams, process_frame};
use crate::pipelines::snapshot::snapshot_filename;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::channel::mpsc;
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// Run the terminal edge viewer
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

struct CameraPipeline {
    pipeline: PipeWirePipeline,
    receiver: mpsc::Receiver<CameraFrame>,
}

impl CameraPipeline {
    fn new(
        device: &CameraDevice,
        format: &CameraFormat,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (sender, receiver) = mpsc::channel(crate::constants::pipeline::FRAME_CHANNEL_CAPACITY);
        let pipeline = PipeWirePipeline::new(device, format, sender)?;
        Ok(Self { pipeline, receiver })
    }

    fn try_get_frame(&mut self) -> Option<CameraFrame> {
        // Non-blocking receive
        self.receiver.try_next().ok().flatten()
    }

    /// Release the camera, waiting for the pipeline to reach Null
    fn stop(self) -> crate::backends::camera::types::BackendResult<()> {
        self.pipeline.stop()
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Enumerate cameras
    let cameras = enumerate_pipewire_cameras().unwrap_or_default();
    if cameras.is_empty() {
        return Err("No cameras found".into());
    }

    info!(count = cameras.len(), "Found cameras");

    let multi_camera = cameras.len() > 1;
    let mut current_camera_index = 0;
    let mut pipeline = initialize_camera(&cameras[current_camera_index])?;

    let params = FilterParams::default();
    let mut frame_view = FrameView::new();
    let mut show_help = false;
    let mut status_message = build_status_message(&params, multi_camera);

    loop {
        // Poll for frames (non-blocking) - drain all available frames to get latest
        let mut latest = None;
        while let Some(frame) = pipeline.try_get_frame() {
            latest = Some(frame);
        }
        if let Some(frame) = latest
            && let Some(processed) = process_frame(&frame, &params, 0)
        {
            frame_view.update_frame(processed);
        }

        // Draw
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };

            f.render_widget(&frame_view, camera_area);

            // Render status bar
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let status = StatusBar {
                message: &status_message,
            };
            f.render_widget(status, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C to quit
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            // 'p' to save a snapshot
            if key.code == KeyCode::Char('p') {
                show_help = false;
                if let Some(frame) = &frame_view.frame {
                    match save_snapshot(frame) {
                        Ok(path) => {
                            status_message = format!("Saved: {}", path.display());
                        }
                        Err(e) => {
                            error!("Failed to save snapshot: {}", e);
                            status_message = format!("Error: {}", e);
                        }
                    }
                }
            }

            // 'e' to toggle between edge view and original frame
            if key.code == KeyCode::Char('e') {
                show_help = false;
                params.toggle_view_mode();
                status_message = build_status_message(&params, multi_camera);
            }

            // '+'/'-' to adjust the edge sensitivity threshold
            if key.code == KeyCode::Char('+') || key.code == KeyCode::Char('=') {
                show_help = false;
                params.set_threshold(params.threshold() + edge::THRESHOLD_STEP);
                status_message = build_status_message(&params, multi_camera);
            }
            if key.code == KeyCode::Char('-') {
                show_help = false;
                params.set_threshold(params.threshold() - edge::THRESHOLD_STEP);
                status_message = build_status_message(&params, multi_camera);
            }

            // 's' to switch camera
            if key.code == KeyCode::Char('s') && multi_camera {
                show_help = false;
                current_camera_index = (current_camera_index + 1) % cameras.len();

                // Release the old camera before opening the next one
                if let Err(e) = pipeline.stop() {
                    error!("Failed to stop pipeline: {}", e);
                }

                match initialize_camera(&cameras[current_camera_index]) {
                    Ok(new_pipeline) => {
                        pipeline = new_pipeline;
                        status_message = build_status_message(&params, multi_camera);
                        frame_view = FrameView::new(); // Clear old frame
                    }
                    Err(e) => {
                        error!("Failed to switch camera: {}", e);
                        status_message = format!("Error: {}", e);
                        // Try to go back to previous camera
                        current_camera_index = if current_camera_index == 0 {
                            cameras.len() - 1
                        } else {
                            current_camera_index - 1
                        };
                        pipeline = initialize_camera(&cameras[current_camera_index])?;
                    }
                }
            }

            // 'h' to toggle help
            if key.code == KeyCode::Char('h') {
                show_help = !show_help;
                status_message = if show_help {
                    build_help_message(multi_camera)
                } else {
                    build_status_message(&params, multi_camera)
                };
            }

            // 'q' also quits
            if key.code == KeyCode::Char('q') {
                break;
            }
        }
    }

    Ok(())
}

fn initialize_camera(device: &CameraDevice) -> Result<CameraPipeline, Box<dyn std::error::Error>> {
    info!(device = %device.name, "Initializing camera");

    let formats = get_pipewire_formats(device);
    let format = select_preview_format(&formats)
        .ok_or_else(|| format!("No formats available for camera: {}", device.name))?;

    info!(format = %format, "Selected format");
    CameraPipeline::new(device, &format)
}

fn build_status_message(params: &FilterParams, multi_camera: bool) -> String {
    let mut msg = format!(
        "{} @ {:.0} | 'p' snapshot | 'e' mode | '+/-' sensitivity",
        params.view_mode(),
        params.threshold()
    );
    if multi_camera {
        msg.push_str(" | 's' switch camera");
    }
    msg.push_str(" | 'h' help | 'q' quit");
    msg
}

fn build_help_message(multi_camera: bool) -> String {
    let mut msg =
        String::from("p: Save snapshot | e: Toggle edges/original | +/-: Sensitivity | ");
    if multi_camera {
        msg.push_str("s: Switch camera | ");
    }
    msg.push_str("h: Toggle help | q/Ctrl+C: Quit");
    msg
}

/// Save the current processed frame as a PNG snapshot
fn save_snapshot(frame: &EdgeFrame) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let img: image::RgbaImage =
        image::ImageBuffer::from_raw(frame.width, frame.height, frame.rgba.to_vec())
            .ok_or("Failed to create image")?;

    let snapshot_dir = crate::storage::snapshot_dir();
    std::fs::create_dir_all(&snapshot_dir)?;

    let filename = snapshot_filename(chrono::Utc::now().timestamp_millis());
    let filepath = snapshot_dir.join(&filename);

    img.save(&filepath)?;
    info!(path = %filepath.display(), "Snapshot saved");

    Ok(filepath)
}

/// Renders a processed frame as half-block cells
struct FrameView {
    frame: Option<EdgeFrame>,
}

impl FrameView {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: EdgeFrame) {
        self.frame = Some(frame);
    }
}

impl Widget for &FrameView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64; // *2 because half-blocks

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        // Scale factors
        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        // Render using half-block characters
        // Each terminal cell represents 2 vertical pixels:
        // - Upper half (▀) colored with fg
        // - Lower half colored with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                // Sample upper and lower pixel for this cell
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = sample_pixel(frame, src_x, src_y_top);
                let bottom_color = sample_pixel(frame, src_x, src_y_bottom);

                let cell = buf.cell_mut((term_x, term_y)).unwrap();
                cell.set_char('▀');
                cell.set_fg(top_color);
                cell.set_bg(bottom_color);
            }
        }
    }
}

fn sample_pixel(frame: &EdgeFrame, x: u32, y: u32) -> Color {
    let x = x.min(frame.width - 1);
    let y = y.min(frame.height - 1);
    let idx = ((y * frame.width + x) * 4) as usize;

    if idx + 2 < frame.rgba.len() {
        Color::Rgb(frame.rgba[idx], frame.rgba[idx + 1], frame.rgba[idx + 2])
    } else {
        Color::Rgb(0, 0, 0)
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Render text
        let text = if self.message.len() > area.width as usize {
            &self.message[..area.width as usize]
        } else {
            self.message
        };

        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}
