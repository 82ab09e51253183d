// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Handles camera selection, switching, processed-frame delivery,
//! initialization, and hotplug events.

use crate::app::state::{AppModel, Message};
use crate::pipelines::edge::EdgeFrame;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info, warn};

impl AppModel {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    pub(crate) fn handle_switch_camera(&mut self) -> Task<cosmic::Action<Message>> {
        if self.available_cameras.len() < 2 {
            info!("Only one camera available, cannot switch");
            return Task::none();
        }

        self.current_camera_index = (self.current_camera_index + 1) % self.available_cameras.len();
        let camera_name = self.available_cameras[self.current_camera_index].name.clone();
        info!(new_index = self.current_camera_index, camera = %camera_name, "Switching to camera");

        self.restart_camera_session();
        self.persist_camera_path();

        self.set_status(camera_name)
    }

    pub(crate) fn handle_select_camera(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        if index >= self.available_cameras.len() || index == self.current_camera_index {
            return Task::none();
        }

        info!(index, "Selected camera index");
        self.current_camera_index = index;
        self.restart_camera_session();
        self.persist_camera_path();
        Task::none()
    }

    pub(crate) fn handle_edge_frame(&mut self, frame: EdgeFrame) -> Task<cosmic::Action<Message>> {
        // A frame from a retired session can still be in flight when the
        // user switches cameras; showing it would flash the old feed
        if !self.session.accepts(frame.generation) {
            warn!(
                frame_generation = frame.generation,
                current_generation = self.session.generation(),
                "Dropping frame from retired camera session"
            );
            return Task::none();
        }

        self.preview_handle = Some(cosmic::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.rgba.to_vec(),
        ));
        self.current_frame = Some(frame);
        self.fps.tick();

        Task::none()
    }

    pub(crate) fn handle_cameras_initialized(
        &mut self,
        cameras: Vec<crate::backends::camera::types::CameraDevice>,
        camera_index: usize,
    ) -> Task<cosmic::Action<Message>> {
        info!(
            count = cameras.len(),
            camera_index, "Cameras initialized asynchronously"
        );

        self.available_cameras = cameras;
        self.current_camera_index = camera_index;
        self.cameras_initialized = true;
        self.update_camera_dropdown_options();

        Task::none()
    }

    pub(crate) fn handle_camera_list_changed(
        &mut self,
        new_cameras: Vec<crate::backends::camera::types::CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        info!(
            old_count = self.available_cameras.len(),
            new_count = new_cameras.len(),
            "Camera list changed (hotplug event)"
        );

        let current_still_available = self
            .current_camera()
            .and_then(|current| new_cameras.iter().position(|c| c.path == current.path));

        self.available_cameras = new_cameras;
        self.update_camera_dropdown_options();

        match current_still_available {
            Some(new_index) => {
                // Same device, possibly at a new list position; the
                // running session is unaffected
                self.current_camera_index = new_index;
                Task::none()
            }
            None => {
                info!("Current camera disconnected, falling back to first available");
                self.current_camera_index = 0;
                self.restart_camera_session();

                if self.available_cameras.is_empty() {
                    self.set_status(crate::fl!("camera-disconnected"))
                } else {
                    self.persist_camera_path();
                    self.set_status(self.available_cameras[0].name.clone())
                }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn update_camera_dropdown_options(&mut self) {
        self.camera_dropdown_options = self
            .available_cameras
            .iter()
            .map(|cam| cam.name.clone())
            .collect();
    }

    /// Remember the active camera so the next launch restores it
    fn persist_camera_path(&mut self) {
        let path = self.current_camera().map(|cam| cam.path.clone());
        self.config.last_camera_path = path;

        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save last camera path");
        }
    }
}
