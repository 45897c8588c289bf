use iced::widget::text::Shaping;
use iced::widget::{button, center, column, container, row, scrollable, stack, text};
use iced::{Color, ContentFit, Element, Length, Theme, alignment};
use iced_video_player::VideoPlayer;

use crate::content;
use crate::message::Message;
use crate::state::{App, LoadedVideo};

/// Vertical gap between paragraphs, so the panel is several viewports tall.
const PARAGRAPH_SPACING: f32 = 320.0;
const PANEL_WIDTH: f32 = 500.0;

/// Format the frame counter for display.
pub fn get_frame_display(frame_index: u64) -> String {
    format!("Frame {}", frame_index)
}

/// Format the estimated frame rate for display.
pub fn get_fps_display(fps: f64) -> String {
    format!("{:.0} FPS", fps)
}

/// Translucent black backdrop shared by the overlays.
fn overlay_style(alpha: f32) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, alpha).into()),
        ..Default::default()
    }
}

/// Build the frame counter overlay for the mounted video.
fn build_frame_counter(loaded: &LoadedVideo) -> Element<'_, Message> {
    let state = loaded.controller.state();
    container(
        row![
            text(get_frame_display(state.current_frame_index))
                .size(14)
                .shaping(Shaping::Basic)
                .color(Color::WHITE),
            text(get_fps_display(state.estimated_frame_rate))
                .size(12)
                .color(Color::from_rgb8(180, 180, 180)),
        ]
        .spacing(10)
        .align_y(alignment::Vertical::Center),
    )
    .padding(8)
    .style(overlay_style(0.7))
    .into()
}

/// The video, filling whatever space it is given.
fn build_video_layer(loaded: &LoadedVideo) -> Element<'_, Message> {
    container(
        VideoPlayer::new(&loaded.source.video)
            .content_fit(ContentFit::Cover)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

/// Banner for a failed load while the previous video keeps playing.
fn build_error_banner<'a>(error: &'a str, status: &'a str) -> Element<'a, Message> {
    container(
        column![
            text(error).size(14).color(Color::from_rgb8(255, 120, 120)),
            text(status).size(12).color(Color::WHITE),
        ]
        .spacing(4),
    )
    .padding(8)
    .style(overlay_style(0.7))
    .into()
}

/// The scrolling narrative column. Its scroll events drive the video.
fn build_text_panel(app: &App) -> Element<'_, Message> {
    let paragraphs = content::paragraphs(&app.config.paragraphs)
        .into_iter()
        .map(|p| text(p).size(20).color(Color::WHITE).into());

    let body = column(paragraphs)
        .spacing(PARAGRAPH_SPACING)
        .padding([96, 32])
        .width(Length::Fill);

    container(
        scrollable(body)
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .width(Length::Fixed(PANEL_WIDTH))
    .height(Length::Fill)
    .style(overlay_style(if app.config.source.plays_inline { 1.0 } else { 0.6 }))
    .into()
}

/// Render the page for a mounted video, with the frame counter pinned to the
/// bottom-right corner of the window.
fn render_page<'a>(app: &'a App, loaded: &'a LoadedVideo) -> Element<'a, Message> {
    let video = build_video_layer(loaded);
    let panel = build_text_panel(app);

    let page: Element<'a, Message> = if app.config.source.plays_inline {
        row![video, panel]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    } else {
        let panel = container(panel)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Right);
        stack![video, panel].into()
    };

    let counter = container(build_frame_counter(loaded))
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Right)
        .align_y(alignment::Vertical::Bottom);

    let mut layers = stack![page, counter];
    if let Some(error) = &app.error {
        layers = layers.push(
            container(build_error_banner(error, &app.status))
                .padding(16)
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Left),
        );
    }
    layers.into()
}

/// Render the main view.
pub fn render_main_view(app: &App) -> Element<'_, Message> {
    // Error state with nothing to fall back on
    if let (Some(error), None) = (&app.error, &app.video) {
        return center(
            column![
                text("Error Loading Video").size(32),
                text(error.clone()),
                button(text("[Browse Files]").size(18))
                    .padding(10)
                    .on_press(Message::BrowseFile),
                text(app.status.clone()).size(12),
            ]
            .spacing(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into();
    }

    match &app.video {
        Some(loaded) => render_page(app, loaded),
        None => center(
            column![
                text("Drag & Drop a Video Here").size(48),
                text("or click browse to pick the clip to scrub").size(16),
                button(text("[Browse Files]").size(18))
                    .padding(10)
                    .on_press(Message::BrowseFile),
                text(app.status.clone()).size(12),
            ]
            .spacing(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into(),
    }
}
