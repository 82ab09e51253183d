// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the handling code
//! lives in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::camera`: Camera selection, frame handling, hotplug
//! - `handlers::capture`: Snapshot capture, flash, thumbnail
//! - `handlers::filter`: Threshold slider, display mode, mirror
//! - `handlers::ui`: Context pages, theme, config, external URLs

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::ClearStatusMessage => self.handle_clear_status_message(),

            // ===== Camera Control =====
            Message::SwitchCamera => self.handle_switch_camera(),
            Message::SelectCamera(index) => self.handle_select_camera(index),
            Message::EdgeFrameReady(frame) => self.handle_edge_frame(frame),
            Message::CamerasInitialized(cameras, index) => {
                self.handle_cameras_initialized(cameras, index)
            }
            Message::CameraListChanged(cameras) => self.handle_camera_list_changed(cameras),

            // ===== Filter Controls =====
            Message::SetThreshold(value) => self.handle_set_threshold(value),
            Message::ToggleViewMode => self.handle_toggle_view_mode(),
            Message::SetViewMode(mode) => self.handle_set_view_mode(mode),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),

            // ===== Snapshot =====
            Message::Snapshot => self.handle_snapshot(),
            Message::SnapshotSaved(result) => self.handle_snapshot_saved(result),
            Message::FlashComplete => self.handle_flash_complete(),
            Message::OpenSnapshotFolder => self.handle_open_snapshot_folder(),
            Message::ThumbnailLoaded(handle) => self.handle_thumbnail_loaded(handle),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }
}
