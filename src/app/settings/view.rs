// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::constants::app_info;
use crate::fl;
use crate::pipelines::edge::EdgeViewMode;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

/// Theme dropdown entries, in the order `Message::SetAppTheme` expects
const THEME_OPTIONS: &[&str] = &["System", "Dark", "Light"];

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Shows theme, camera selection, display options, and snapshot
    /// storage settings.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = match self.config.app_theme {
            crate::config::AppTheme::System => 0,
            crate::config::AppTheme::Dark => 1,
            crate::config::AppTheme::Light => 2,
        };
        let theme_dropdown =
            widget::dropdown(THEME_OPTIONS, Some(theme_index), Message::SetAppTheme);

        // Camera selection dropdown
        let camera_dropdown = widget::dropdown(
            &self.camera_dropdown_options,
            Some(self.current_camera_index),
            Message::SelectCamera,
        );

        // Display mode toggle (Edges on / off)
        let edges_toggle = widget::toggler(self.filter_params.view_mode() == EdgeViewMode::Edges)
            .on_toggle(|enabled| {
                Message::SetViewMode(if enabled {
                    EdgeViewMode::Edges
                } else {
                    EdgeViewMode::Original
                })
            });

        // Mirror preview toggle
        let mirror_toggle =
            widget::toggler(self.config.mirror_preview).on_toggle(|_| Message::ToggleMirrorPreview);

        let open_folder_button = widget::button::standard(fl!("open-snapshot-folder"))
            .on_press(Message::OpenSnapshotFolder);

        let about_button = widget::button::standard(fl!("about"))
            .on_press(Message::ToggleContextPage(ContextPage::About));

        let report_issue_button = widget::button::standard(fl!("report-issue"))
            .on_press(Message::LaunchUrl(self.config.bug_report_url.clone()));

        // Version info string
        let version_info = if app_info::is_flatpak() {
            format!("Version {} (Flatpak)", app_info::version())
        } else {
            format!("Version {}", app_info::version())
        };

        let settings_column: Element<'_, Message> = widget::column()
            .push(
                widget::text(fl!("appearance"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("camera"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(camera_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(
                        widget::text(fl!("show-edges"))
                            .size(16)
                            .font(cosmic::font::bold()),
                    )
                    .push(widget::horizontal_space().width(cosmic::iced::Length::Fill))
                    .push(edges_toggle)
                    .align_y(cosmic::iced::Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(
                        widget::text(fl!("mirror-preview"))
                            .size(16)
                            .font(cosmic::font::bold()),
                    )
                    .push(widget::horizontal_space().width(cosmic::iced::Length::Fill))
                    .push(mirror_toggle)
                    .align_y(cosmic::iced::Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("snapshots"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(open_folder_button)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(about_button)
                    .push(report_issue_button)
                    .spacing(spacing.space_xs),
            )
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings-title"))
    }
}
