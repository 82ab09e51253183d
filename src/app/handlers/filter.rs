// SPDX-License-Identifier: GPL-3.0-only

//! Filter control handlers
//!
//! Handles the sensitivity slider, the Edges/Original display toggle,
//! and the mirror setting. Each change updates the shared atomics read
//! by the processing task and persists the new value; the preview picks
//! it up on the next frame.

use crate::app::state::{AppModel, Message};
use crate::pipelines::edge::EdgeViewMode;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{debug, error, info};

impl AppModel {
    // =========================================================================
    // Filter Control Handlers
    // =========================================================================

    pub(crate) fn handle_set_threshold(&mut self, value: f32) -> Task<cosmic::Action<Message>> {
        self.filter_params.set_threshold(value);
        // Read back the clamped value so config never stores out-of-range
        let clamped = self.filter_params.threshold();
        debug!(threshold = clamped, "Threshold updated");

        self.config.edge_threshold = clamped;
        self.save_config("edge threshold");
        Task::none()
    }

    pub(crate) fn handle_toggle_view_mode(&mut self) -> Task<cosmic::Action<Message>> {
        let mode = self.filter_params.toggle_view_mode();
        info!(%mode, "Display mode toggled");

        self.config.view_mode = mode;
        self.save_config("view mode");
        Task::none()
    }

    pub(crate) fn handle_set_view_mode(
        &mut self,
        mode: EdgeViewMode,
    ) -> Task<cosmic::Action<Message>> {
        if self.filter_params.view_mode() == mode {
            return Task::none();
        }

        self.filter_params.set_view_mode(mode);
        self.config.view_mode = mode;
        self.save_config("view mode");
        Task::none()
    }

    pub(crate) fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        let mirror = !self.config.mirror_preview;
        info!(mirror, "Mirror preview toggled");

        self.filter_params.set_mirror(mirror);
        self.config.mirror_preview = mirror;
        self.save_config("mirror preview");
        Task::none()
    }

    /// Write the config entry, logging instead of failing the UI
    pub(crate) fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, what, "Failed to save setting");
        }
    }
}
