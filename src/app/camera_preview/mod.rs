// SPDX-License-Identifier: GPL-3.0-only

//! Processed-frame preview widget
//!
//! Displays the latest composited frame from the edge pipeline. The
//! compositor already produced plain RGBA, so an image widget is all
//! the rendering this needs.

use crate::app::state::{AppModel, Message};
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, Length};
use cosmic::widget;

impl AppModel {
    /// Build the camera preview widget
    ///
    /// Shows a loading indicator while cameras are still enumerating, a
    /// themed placeholder when no frame has arrived yet, and the latest
    /// processed frame otherwise.
    pub fn build_camera_preview(&self) -> Element<'_, Message> {
        if !self.cameras_initialized {
            return preview_placeholder(widget::text(fl!("initializing-camera")).size(20).into());
        }

        if self.available_cameras.is_empty() {
            return preview_placeholder(widget::text(fl!("no-cameras-found")).size(20).into());
        }

        let Some(handle) = &self.preview_handle else {
            return preview_placeholder(widget::text(fl!("waiting-for-frames")).size(20).into());
        };

        let image = widget::image::Image::new(handle.clone())
            .content_fit(cosmic::iced::ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill);

        widget::container(image)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .align_y(cosmic::iced::alignment::Vertical::Center)
            .into()
    }
}

fn preview_placeholder(content: Element<'_, Message>) -> Element<'_, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center)
        .style(|theme| widget::container::Style {
            background: Some(Background::Color(theme.cosmic().bg_color().into())),
            text_color: Some(theme.cosmic().on_bg_color().into()),
            ..Default::default()
        })
        .into()
}
