// SPDX-License-Identifier: GPL-3.0-only

//! UI navigation and settings handlers
//!
//! Handles context pages, the theme setting, config updates from
//! outside the app, status messages, and external URLs.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::constants::timing;
use cosmic::Task;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // UI Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        match open::that_detached(&url) {
            Ok(()) => {}
            Err(err) => {
                error!(url = %url, error = %err, "Failed to open URL");
            }
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        use crate::config::AppTheme;

        let app_theme = match index {
            0 => AppTheme::System,
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => return Task::none(),
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        // The config may have been edited outside the app; push the
        // filter-related fields into the shared atomics
        self.filter_params.set_threshold(config.edge_threshold);
        self.filter_params.set_view_mode(config.view_mode);
        self.filter_params.set_mirror(config.mirror_preview);
        self.config = config;
        Task::none()
    }

    // =========================================================================
    // Status Messages
    // =========================================================================

    /// Show a transient status message and schedule it to clear
    pub(crate) fn set_status(
        &mut self,
        message: impl Into<String>,
    ) -> Task<cosmic::Action<Message>> {
        self.status_message = Some(message.into());
        Task::perform(
            async {
                tokio::time::sleep(timing::STATUS_MESSAGE_DURATION).await;
            },
            |_| cosmic::Action::App(Message::ClearStatusMessage),
        )
    }

    pub(crate) fn handle_clear_status_message(&mut self) -> Task<cosmic::Action<Message>> {
        self.status_message = None;
        Task::none()
    }
}
