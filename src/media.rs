//! Seams between the sync controller and the rendering layer.
//!
//! The controller only sees [`PlaybackSource`] and [`ScrollContainer`]. The
//! application backs them with a GStreamer video ([`VideoSource`]) and the
//! last viewport reported by the text panel ([`ScrollSnapshot`]).

use gstreamer::prelude::*;
use iced::widget::scrollable::Viewport;
use iced_video_player::Video;
use std::time::Duration;

use crate::config::SourceFlags;
use crate::error::{PlaybackError, PlaybackResult};
use crate::gst_logger;

/// A playable media handle the controller can scrub.
pub trait PlaybackSource {
    /// Total length in seconds. May be 0 or NaN before metadata is known.
    fn duration(&self) -> f64;

    /// Current playback position in seconds.
    fn position(&self) -> f64;

    fn set_position(&mut self, secs: f64) -> PlaybackResult<()>;

    /// Frames the platform reports as decoded, if it exposes such a signal.
    fn decoded_frame_count(&self) -> Option<u64>;

    /// Start playback. Restrictive platforms may refuse.
    fn play(&mut self) -> PlaybackResult<()>;

    fn pause(&mut self);
}

/// A scrollable region whose content height minus viewport height is the
/// scroll range.
pub trait ScrollContainer {
    fn scrollable_height(&self) -> f32;
    fn viewport_height(&self) -> f32;
    fn scroll_offset(&self) -> f32;
}

/// Last known geometry of the text panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSnapshot {
    pub content_height: f32,
    pub viewport_height: f32,
    pub offset_y: f32,
}

impl From<Viewport> for ScrollSnapshot {
    fn from(viewport: Viewport) -> Self {
        ScrollSnapshot {
            content_height: viewport.content_bounds().height,
            viewport_height: viewport.bounds().height,
            offset_y: viewport.absolute_offset().y,
        }
    }
}

impl ScrollContainer for ScrollSnapshot {
    fn scrollable_height(&self) -> f32 {
        self.content_height
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn scroll_offset(&self) -> f32 {
        self.offset_y
    }
}

/// A GStreamer-backed video exposed as a [`PlaybackSource`].
pub struct VideoSource {
    pub id: usize,
    pub video: Video,
}

impl VideoSource {
    /// Wrap a freshly opened video and apply the source flags.
    pub fn new(id: usize, mut video: Video, flags: SourceFlags) -> Self {
        video.set_looping(false);
        video.set_muted(flags.muted);
        if flags.muted {
            video.set_volume(0.0);
        }
        // Without autoplay the pipeline stays paused until warm-up.
        video.set_paused(!flags.autoplay);
        VideoSource { id, video }
    }

    /// Framerate negotiated by the decoder, if it is a usable number.
    pub fn native_fps(&self) -> Option<f64> {
        let fps = self.video.framerate();
        (fps.is_finite() && fps > 0.0).then_some(fps)
    }
}

impl PlaybackSource for VideoSource {
    fn duration(&self) -> f64 {
        self.video.duration().as_secs_f64()
    }

    fn position(&self) -> f64 {
        self.video.position().as_secs_f64()
    }

    fn set_position(&mut self, secs: f64) -> PlaybackResult<()> {
        if !(secs.is_finite() && secs >= 0.0) {
            return Err(PlaybackError::seek(secs, "target is not a valid timestamp"));
        }
        let target = Duration::from_secs_f64(secs);
        let start = gst_logger::log_seek_start(self.id, target, true);
        match self.video.seek(target, true) {
            Ok(()) => {
                gst_logger::log_seek_complete(self.id, start);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                gst_logger::log_seek_error(self.id, &reason, start);
                Err(PlaybackError::seek(secs, reason))
            }
        }
    }

    fn decoded_frame_count(&self) -> Option<u64> {
        let fps = self.native_fps()?;
        let duration = self.duration();
        if !(duration.is_finite() && duration > 0.0) {
            return None;
        }
        Some((fps * duration).round() as u64)
    }

    fn play(&mut self) -> PlaybackResult<()> {
        let start = gst_logger::log_state_change_start(self.id, gstreamer::State::Playing);
        let result = self.video.pipeline().set_state(gstreamer::State::Playing);
        gst_logger::log_state_change_complete(self.id, gstreamer::State::Playing, start);
        result
            .map(|_| ())
            .map_err(|e| PlaybackError::AutoplayRejected(e.to_string()))
    }

    fn pause(&mut self) {
        let start = gst_logger::log_state_change_start(self.id, gstreamer::State::Paused);
        self.video.set_paused(true);
        gst_logger::log_state_change_complete(self.id, gstreamer::State::Paused, start);
    }
}
