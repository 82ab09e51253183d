// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for Edge Viewer
//!
//! This module contains the application state, message handling, UI rendering,
//! and business logic for the live edge-detection viewer.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `camera_preview`: Processed-frame preview widget
//! - `settings`: Settings drawer UI
//! - `view`: Main view rendering
//! - `update`: Message handling
//! - `handlers`: Message handlers organized by functional domain

mod camera_preview;
mod handlers;
pub mod settings;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, FpsCounter, Message};
use std::sync::Arc;
use tracing::{error, info, warn};

const REPOSITORY: &str = "https://github.com/cosmic-utils/edge-viewer";
const APP_ICON: &[u8] = include_bytes!(
    "../../resources/icons/hicolor/scalable/apps/io.github.cosmic-utils.edge-viewer.svg"
);

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic-utils.edge-viewer";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Create the about widget
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        // Filter parameters start from the persisted settings
        let filter_params = Arc::new(crate::pipelines::edge::FilterParams::new(
            config.edge_threshold,
            config.view_mode,
            config.mirror_preview,
        ));

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            filter_params,
            session: state::CameraSession::default(),
            current_frame: None,
            preview_handle: None,
            available_cameras: Vec::new(),
            current_camera_index: 0,
            cameras_initialized: false,
            camera_dropdown_options: Vec::new(),
            is_capturing: false,
            flash_active: false,
            status_message: None,
            fps: FpsCounter::default(),
            snapshot_thumbnail: None,
        };

        // Enumerate cameras asynchronously (pw-cli can be slow)
        let last_camera_path = app.config.last_camera_path.clone();
        let init_task = Task::perform(
            async move {
                let cameras = tokio::task::spawn_blocking(|| {
                    crate::backends::camera::pipewire::enumerate_pipewire_cameras()
                        .unwrap_or_default()
                })
                .await
                .unwrap_or_default();
                info!(count = cameras.len(), "Found camera(s)");

                // Restore the last used camera or default to the first
                let camera_index = last_camera_path
                    .as_deref()
                    .and_then(|last_path| cameras.iter().position(|cam| cam.path == last_path))
                    .unwrap_or(0);

                (cameras, camera_index)
            },
            |(cameras, index)| cosmic::Action::App(Message::CamerasInitialized(cameras, index)),
        );

        // Load initial snapshot thumbnail
        let load_thumbnail_task = Task::perform(
            async { crate::storage::load_latest_thumbnail(crate::storage::snapshot_dir()).await },
            |handle| cosmic::Action::App(Message::ThumbnailLoaded(handle)),
        );

        (app, Task::batch([init_task, load_thumbnail_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use crate::constants::timing;
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let current_camera = self.current_camera().cloned();
        let camera_index = self.current_camera_index;
        let cancel_flag = self.session.cancel_flag();
        let params = Arc::clone(&self.filter_params);
        let generation = self.session.generation();
        // Restarts the subscription once the initial enumeration lands
        let cameras_initialized = self.cameras_initialized;

        let camera_sub = Subscription::run_with_id(
            ("camera", camera_index, generation, cameras_initialized),
            cosmic::iced::stream::channel(100, move |mut output| async move {
                info!(camera_index, generation, "Camera subscription started");

                let mut frame_count = 0u64;
                loop {
                    if cancel_flag.load(std::sync::atomic::Ordering::Acquire) {
                        info!("Cancel flag set - subscription loop exiting");
                        break;
                    }

                    // No camera yet; the subscription restarts when the
                    // enumeration finishes or a device is hotplugged
                    let Some(device) = current_camera.clone() else {
                        info!("No camera available - waiting for initialization");
                        break;
                    };

                    // Format query shells out to pw-cli, keep it off the executor
                    let formats = tokio::task::spawn_blocking({
                        let device = device.clone();
                        move || crate::backends::camera::pipewire::get_pipewire_formats(&device)
                    })
                    .await
                    .unwrap_or_default();

                    let Some(format) =
                        crate::backends::camera::pipewire::select_preview_format(&formats)
                    else {
                        error!(camera = %device.name, "No capture format available");
                        tokio::time::sleep(timing::SESSION_RETRY_DELAY).await;
                        continue;
                    };

                    info!(camera = %device.name, format = %format, "Starting capture session");

                    let (sender, mut receiver) = cosmic::iced::futures::channel::mpsc::channel(
                        crate::constants::pipeline::FRAME_CHANNEL_CAPACITY,
                    );

                    let pipeline = match crate::backends::camera::pipewire::PipeWirePipeline::new(
                        &device, &format, sender,
                    ) {
                        Ok(pipeline) => pipeline,
                        Err(e) => {
                            error!(error = %e, "Failed to initialize pipeline");
                            tokio::time::sleep(timing::SESSION_RETRY_DELAY).await;
                            continue;
                        }
                    };

                    // Frame loop: receive, process off-thread, forward
                    loop {
                        if cancel_flag.load(std::sync::atomic::Ordering::Acquire) {
                            info!("Cancel flag set - capture session being cancelled");
                            break;
                        }

                        if output.is_closed() {
                            info!("Output channel closed - capture session being cancelled");
                            break;
                        }

                        // Timeout bounds how long a cancel request can go unnoticed
                        match tokio::time::timeout(timing::FRAME_RECV_TIMEOUT, receiver.next())
                            .await
                        {
                            Ok(Some(frame)) => {
                                // The edge stage can run slower than capture;
                                // process only the newest frame so the preview
                                // never falls behind live and queued frames
                                // don't pin mapped capture buffers
                                let frame = drain_to_latest(frame, &mut receiver);

                                frame_count += 1;
                                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                    info!(
                                        frame = frame_count,
                                        width = frame.width,
                                        height = frame.height,
                                        "Received frame from pipeline"
                                    );
                                }

                                // CPU-bound stage runs on the blocking pool; a
                                // panic there surfaces as a JoinError and the
                                // session keeps running
                                let task_params = Arc::clone(&params);
                                let processed = tokio::task::spawn_blocking(move || {
                                    crate::pipelines::edge::process_frame(
                                        &frame,
                                        &task_params,
                                        generation,
                                    )
                                })
                                .await;

                                let edge_frame = match processed {
                                    Ok(Some(edge_frame)) => edge_frame,
                                    Ok(None) => continue,
                                    Err(e) => {
                                        error!(error = %e, "Frame processing task failed");
                                        continue;
                                    }
                                };

                                // try_send keeps the subscription from blocking
                                // when the UI is busy; dropping preview frames
                                // is fine, we want the latest one
                                if let Err(e) = output.try_send(Message::EdgeFrameReady(edge_frame))
                                {
                                    if e.is_disconnected() {
                                        info!("Output channel disconnected - session ending");
                                        break;
                                    }
                                }
                            }
                            Ok(None) => {
                                warn!("Pipeline frame stream ended");
                                break;
                            }
                            Err(_) => {
                                // Timeout, loop back to re-check the cancel flag
                                continue;
                            }
                        }
                    }

                    info!("Cleaning up capture session");
                    if let Err(e) = pipeline.stop() {
                        warn!(error = %e, "Pipeline teardown reported an error");
                    }

                    if cancel_flag.load(std::sync::atomic::Ordering::Acquire) || output.is_closed()
                    {
                        break;
                    }

                    // Pipeline died on its own (device unplugged, PipeWire
                    // restart); back off before retrying
                    tokio::time::sleep(timing::SESSION_RETRY_DELAY).await;
                }
            }),
        );

        // Camera hotplug monitoring subscription
        let current_cameras = self.available_cameras.clone();
        let hotplug_sub = if self.cameras_initialized {
            Subscription::run_with_id(
                "camera_hotplug",
                cosmic::iced::stream::channel(10, move |mut output| async move {
                    info!("Camera hotplug monitoring started");

                    let mut last_cameras = current_cameras;

                    loop {
                        tokio::time::sleep(timing::HOTPLUG_POLL_INTERVAL).await;

                        let new_cameras = tokio::task::spawn_blocking(|| {
                            crate::backends::camera::pipewire::enumerate_pipewire_cameras()
                                .unwrap_or_default()
                        })
                        .await
                        .unwrap_or_default();

                        let cameras_changed = last_cameras.len() != new_cameras.len()
                            || !last_cameras.iter().all(|c| {
                                new_cameras
                                    .iter()
                                    .any(|nc| nc.path == c.path && nc.name == c.name)
                            });

                        if cameras_changed {
                            info!(
                                old_count = last_cameras.len(),
                                new_count = new_cameras.len(),
                                "Camera list changed - hotplug event detected"
                            );

                            last_cameras = new_cameras.clone();

                            if output
                                .send(Message::CameraListChanged(new_cameras))
                                .await
                                .is_err()
                            {
                                warn!("Hotplug channel closed");
                                break;
                            }
                        }
                    }
                }),
            )
        } else {
            Subscription::none()
        };

        Subscription::batch([config_sub, camera_sub, hotplug_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

/// Discard queued frames and keep the newest one
fn drain_to_latest<T>(
    first: T,
    receiver: &mut cosmic::iced::futures::channel::mpsc::Receiver<T>,
) -> T {
    let mut latest = first;
    while let Ok(Some(newer)) = receiver.try_next() {
        latest = newer;
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_to_latest_keeps_newest() {
        let (mut sender, mut receiver) = cosmic::iced::futures::channel::mpsc::channel(8);
        for n in 0..4 {
            sender.try_send(n).unwrap();
        }

        let first = receiver.try_next().unwrap().unwrap();
        assert_eq!(drain_to_latest(first, &mut receiver), 3);

        // Everything older was consumed, nothing left queued
        assert!(receiver.try_next().is_err());
    }

    #[test]
    fn test_drain_to_latest_passes_single_frame_through() {
        let (_sender, mut receiver) =
            cosmic::iced::futures::channel::mpsc::channel::<u32>(8);
        assert_eq!(drain_to_latest(7, &mut receiver), 7);
    }
}
