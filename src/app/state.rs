// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::types::CameraDevice;
use crate::config::Config;
use crate::constants::timing;
use crate::pipelines::edge::{EdgeFrame, EdgeViewMode, FilterParams};
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Measured-FPS readout over a sliding one-second window
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames_in_window: u32,
    /// Last completed window's rate, what the stats readout shows
    pub measured_fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            window_start: Instant::now(),
            frames_in_window: 0,
            measured_fps: 0.0,
        }
    }
}

impl FpsCounter {
    /// Record one displayed frame; rolls the window over when it expires
    pub fn tick(&mut self) {
        self.frames_in_window += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= timing::FPS_WINDOW {
            self.measured_fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
            self.frames_in_window = 0;
            self.window_start = Instant::now();
        }
    }

    /// Reset after a camera switch so stale rates never show
    pub fn reset(&mut self) {
        self.window_start = Instant::now();
        self.frames_in_window = 0;
        self.measured_fps = 0.0;
    }
}

/// Identity of the running capture session
///
/// The cancel flag is shared with the subscription loop; the generation
/// number is stamped onto every frame the session produces, so frames
/// from a retired session can be recognized and dropped on arrival.
#[derive(Debug, Default)]
pub struct CameraSession {
    cancel_flag: Arc<AtomicBool>,
    generation: u64,
}

impl CameraSession {
    /// Cancel flag handle for the subscription loop
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a frame stamped with this generation belongs to the
    /// live session
    pub fn accepts(&self, frame_generation: u64) -> bool {
        frame_generation == self.generation
    }

    /// Retire the running session: signal its loop to exit, install a
    /// fresh unset flag for the next one, and bump the generation so
    /// in-flight frames are rejected
    pub fn retire(&mut self) {
        self.cancel_flag
            .store(true, std::sync::atomic::Ordering::Release);
        self.cancel_flag = Arc::new(AtomicBool::new(false));
        self.generation += 1;
    }
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Filter parameters shared with the processing task
    pub filter_params: Arc<FilterParams>,
    /// Running capture session (cancel flag + frame generation)
    pub session: CameraSession,
    /// Latest finished frame (kept for snapshots)
    pub current_frame: Option<EdgeFrame>,
    /// Preview image handle built from the latest frame
    pub preview_handle: Option<cosmic::widget::image::Handle>,
    /// Available camera devices
    pub available_cameras: Vec<CameraDevice>,
    /// Current camera index
    pub current_camera_index: usize,
    /// Whether the initial enumeration has finished
    pub cameras_initialized: bool,
    /// Dropdown options (cached for UI)
    pub camera_dropdown_options: Vec<String>,
    /// Whether a snapshot save is in flight
    pub is_capturing: bool,
    /// Flash is currently active (showing white overlay)
    pub flash_active: bool,
    /// Transient status message shown in the stats bar
    pub status_message: Option<String>,
    /// Measured display framerate
    pub fps: FpsCounter,
    /// Latest snapshot thumbnail (cached)
    pub snapshot_thumbnail: Option<cosmic::widget::image::Handle>,
}

impl AppModel {
    /// The camera the active session captures from
    pub fn current_camera(&self) -> Option<&CameraDevice> {
        self.available_cameras.get(self.current_camera_index)
    }

    /// Retire the running camera session and clear per-session state;
    /// the subscription restarts with the new identity
    pub fn restart_camera_session(&mut self) {
        self.session.retire();
        self.current_frame = None;
        self.preview_handle = None;
        self.fps.reset();
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Select app theme from the settings dropdown
    SetAppTheme(usize),
    /// Clear the transient status message
    ClearStatusMessage,

    // ===== Camera Control =====
    /// Switch to next camera (cycling)
    SwitchCamera,
    /// Select specific camera by index
    SelectCamera(usize),
    /// Processed frame received from the camera subscription
    EdgeFrameReady(EdgeFrame),
    /// Cameras initialized asynchronously during startup
    CamerasInitialized(Vec<CameraDevice>, usize),
    /// Camera list changed (hotplug event)
    CameraListChanged(Vec<CameraDevice>),

    // ===== Filter Controls =====
    /// Sensitivity slider moved
    SetThreshold(f32),
    /// Flip between Edges and Original display
    ToggleViewMode,
    /// Select display mode directly (settings drawer)
    SetViewMode(EdgeViewMode),
    /// Toggle mirror preview (horizontal flip)
    ToggleMirrorPreview,

    // ===== Snapshot =====
    /// Save the current frame as PNG
    Snapshot,
    /// Snapshot finished (path on success, message on failure)
    SnapshotSaved(Result<String, String>),
    /// Flash overlay duration elapsed
    FlashComplete,
    /// Open the snapshot folder in the file manager
    OpenSnapshotFolder,
    /// Snapshot thumbnail loaded
    ThumbnailLoaded(Option<cosmic::widget::image::Handle>),

    // ===== Settings =====
    /// Configuration updated
    UpdateConfig(Config),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_counter_reset() {
        let mut fps = FpsCounter::default();
        fps.tick();
        fps.tick();
        fps.measured_fps = 30.0;
        fps.reset();
        assert_eq!(fps.measured_fps, 0.0);
    }

    #[test]
    fn test_retire_cancels_old_session_with_fresh_flag() {
        let mut session = CameraSession::default();
        let old_flag = session.cancel_flag();

        session.retire();

        // The retired loop sees its flag set; the next session starts
        // with an unset one
        assert!(old_flag.load(std::sync::atomic::Ordering::Acquire));
        assert!(
            !session
                .cancel_flag()
                .load(std::sync::atomic::Ordering::Acquire)
        );
    }

    #[test]
    fn test_retired_generation_rejected() {
        let mut session = CameraSession::default();
        let stale_generation = session.generation();
        assert!(session.accepts(stale_generation));

        session.retire();

        // A frame still in flight from the old session arrives after
        // the switch and must be dropped
        assert!(!session.accepts(stale_generation));
        assert!(session.accepts(session.generation()));
    }
}
