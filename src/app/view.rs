// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! This module composes the main UI:
//! - Processed-frame preview (camera_preview module) with flash overlay
//! - Controls row: thumbnail, sensitivity slider, mode toggle,
//!   snapshot button, camera switcher
//! - Stats readout: measured FPS, resolution, mode, threshold

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::pipelines::edge::EdgeViewMode;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, Length};
use cosmic::widget::{self, icon};

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let camera_preview = self.build_camera_preview();

        // Flash overlay sits on top of the preview right after a snapshot
        let preview: Element<'_, Message> = if self.flash_active {
            let flash_overlay = widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::WHITE)),
                    ..Default::default()
                });

            cosmic::iced::widget::stack![camera_preview, flash_overlay]
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            camera_preview
        };

        let main_column = widget::column()
            .push(
                widget::container(preview)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .push(self.build_controls())
            .push(self.build_stats_bar())
            .width(Length::Fill)
            .height(Length::Fill);

        widget::container(main_column)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            })
            .into()
    }

    /// Build the controls row below the preview
    fn build_controls(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let mut row = widget::row()
            .padding(spacing.space_xs)
            .spacing(spacing.space_s)
            .align_y(Alignment::Center);

        row = row.push(self.build_thumbnail_button());

        // Sensitivity slider with the raw slider value next to it
        let slider = widget::slider(
            crate::constants::edge::THRESHOLD_MIN..=crate::constants::edge::THRESHOLD_MAX,
            self.config.edge_threshold,
            Message::SetThreshold,
        )
        .step(1.0);

        row = row.push(
            widget::row()
                .push(widget::text(fl!("sensitivity")).size(ui::STATS_TEXT_SIZE))
                .push(slider)
                .push(
                    widget::text(format!("{:.0}", self.config.edge_threshold))
                        .size(ui::STATS_TEXT_SIZE),
                )
                .spacing(spacing.space_xs)
                .align_y(Alignment::Center)
                .width(Length::Fill),
        );

        // Display mode toggle, highlighted while edges are shown
        let mode = self.filter_params.view_mode();
        let mode_label = match mode {
            EdgeViewMode::Edges => fl!("mode-edges"),
            EdgeViewMode::Original => fl!("mode-original"),
        };
        row = row.push(
            widget::button::text(mode_label)
                .on_press(Message::ToggleViewMode)
                .class(if mode == EdgeViewMode::Edges {
                    cosmic::theme::Button::Suggested
                } else {
                    cosmic::theme::Button::Standard
                }),
        );

        row = row.push(self.build_snapshot_button());

        // Camera switcher only makes sense with more than one device
        if self.available_cameras.len() > 1 {
            row = row.push(
                widget::button::icon(icon::from_name("camera-switch-symbolic"))
                    .on_press(Message::SwitchCamera),
            );
        }

        widget::container(row).width(Length::Fill).into()
    }

    /// Build the snapshot button
    ///
    /// A white circle with a press-down effect while a save is in
    /// flight; no on_press during a save so rapid presses cannot queue
    /// duplicate writes.
    fn build_snapshot_button(&self) -> Element<'_, Message> {
        let (inner_size, color) = if self.is_capturing {
            (ui::CAPTURE_BUTTON_INNER * 0.85, Color::from_rgb(0.7, 0.7, 0.7))
        } else {
            (ui::CAPTURE_BUTTON_INNER, Color::WHITE)
        };

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let mut button = widget::button::custom(button_inner)
            .padding(0)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER));

        if !self.is_capturing {
            button = button.on_press(Message::Snapshot);
        }

        // Fixed-size wrapper so the press-down effect never shifts layout
        widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .into()
    }

    /// Build the snapshot thumbnail button
    ///
    /// Shows the latest saved snapshot if one exists, otherwise a folder
    /// icon; pressing it opens the snapshot folder.
    fn build_thumbnail_button(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = if let Some(thumbnail) = &self.snapshot_thumbnail {
            widget::image::Image::new(thumbnail.clone())
                .content_fit(cosmic::iced::ContentFit::Cover)
                .width(Length::Fixed(ui::THUMBNAIL_SIZE))
                .height(Length::Fixed(ui::THUMBNAIL_SIZE))
                .into()
        } else {
            widget::container(icon::from_name("folder-pictures-symbolic").size(24))
                .width(Length::Fixed(ui::THUMBNAIL_SIZE))
                .height(Length::Fixed(ui::THUMBNAIL_SIZE))
                .center(ui::THUMBNAIL_SIZE)
                .into()
        };

        widget::button::custom(content)
            .padding(0)
            .width(Length::Fixed(ui::THUMBNAIL_SIZE))
            .height(Length::Fixed(ui::THUMBNAIL_SIZE))
            .class(cosmic::theme::Button::Image)
            .on_press(Message::OpenSnapshotFolder)
            .into()
    }

    /// Build the stats readout line
    fn build_stats_bar(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let stats = if let Some(frame) = &self.current_frame {
            format!(
                "{:.0} fps · {}×{} · {} · {:.0}",
                self.fps.measured_fps, frame.width, frame.height, frame.mode, frame.threshold
            )
        } else {
            String::new()
        };

        let mut row = widget::row()
            .padding([0, spacing.space_xs, spacing.space_xxs, spacing.space_xs])
            .spacing(spacing.space_s)
            .align_y(Alignment::Center);

        row = row.push(
            widget::text(stats)
                .size(ui::STATS_TEXT_SIZE)
                .class(cosmic::theme::Text::Accent),
        );

        row = row.push(widget::Space::new(Length::Fill, Length::Shrink));

        if let Some(message) = &self.status_message {
            row = row.push(widget::text(message.clone()).size(ui::STATS_TEXT_SIZE));
        }

        widget::container(row).width(Length::Fill).into()
    }
}
