// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot handlers
//!
//! Handles saving the current processed frame, the flash overlay, and
//! the snapshot thumbnail.

use crate::app::state::{AppModel, Message};
use crate::constants::timing;
use crate::fl;
use crate::pipelines::snapshot::SnapshotPipeline;
use cosmic::Task;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // Snapshot Handlers
    // =========================================================================

    pub(crate) fn handle_snapshot(&mut self) -> Task<cosmic::Action<Message>> {
        if self.is_capturing {
            info!("Snapshot already in progress, ignoring");
            return Task::none();
        }

        // What the user sees is what gets saved: the composited frame,
        // current mode and threshold included
        let frame = self.current_frame.clone();
        self.is_capturing = true;
        self.flash_active = frame.is_some();

        let save_task = Task::perform(
            async move {
                let output_dir = crate::storage::snapshot_dir();
                SnapshotPipeline::capture_and_save(frame, &output_dir)
                    .await
                    .map(|path| path.display().to_string())
                    .map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::SnapshotSaved(result)),
        );

        // The flash overlay clears itself after its fixed duration
        let flash_task = if self.flash_active {
            Task::perform(
                async {
                    tokio::time::sleep(timing::FLASH_DURATION).await;
                },
                |_| cosmic::Action::App(Message::FlashComplete),
            )
        } else {
            Task::none()
        };

        Task::batch([save_task, flash_task])
    }

    pub(crate) fn handle_snapshot_saved(
        &mut self,
        result: Result<String, String>,
    ) -> Task<cosmic::Action<Message>> {
        self.is_capturing = false;

        match result {
            Ok(path) => {
                info!(path = %path, "Snapshot saved");
                let status_task = self.set_status(fl!("snapshot-saved"));

                // Refresh the thumbnail from the file that was just written
                let thumbnail_task = Task::perform(
                    async {
                        crate::storage::load_latest_thumbnail(crate::storage::snapshot_dir()).await
                    },
                    |handle| cosmic::Action::App(Message::ThumbnailLoaded(handle)),
                );

                Task::batch([status_task, thumbnail_task])
            }
            Err(message) => {
                error!(error = %message, "Failed to save snapshot");
                self.set_status(message)
            }
        }
    }

    pub(crate) fn handle_flash_complete(&mut self) -> Task<cosmic::Action<Message>> {
        self.flash_active = false;
        Task::none()
    }

    pub(crate) fn handle_open_snapshot_folder(&mut self) -> Task<cosmic::Action<Message>> {
        let dir = crate::storage::snapshot_dir();
        if let Err(err) = open::that_detached(&dir) {
            error!(path = %dir.display(), error = %err, "Failed to open snapshot folder");
        }
        Task::none()
    }

    pub(crate) fn handle_thumbnail_loaded(
        &mut self,
        handle: Option<cosmic::widget::image::Handle>,
    ) -> Task<cosmic::Action<Message>> {
        self.snapshot_thumbnail = handle;
        Task::none()
    }
}
