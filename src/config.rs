// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::edge;
use crate::pipelines::edge::EdgeViewMode;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Last used camera device path
    pub last_camera_path: Option<String>,
    /// Edge detection sensitivity threshold (slider value, 0-100)
    pub edge_threshold: f32,
    /// Display mode the viewer starts in
    pub view_mode: EdgeViewMode,
    /// Mirror camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Bug report submission URL (GitHub issues URL)
    pub bug_report_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(), // Default to System theme
            last_camera_path: None,
            edge_threshold: edge::DEFAULT_THRESHOLD,
            view_mode: EdgeViewMode::default(),
            mirror_preview: false,
            bug_report_url: "https://github.com/cosmic-utils/edge-viewer/issues/new".to_string(),
        }
    }
}
