use std::path::PathBuf;

use crate::config::Config;
use crate::controller::{FrameOutcome, FramePhase, ScrollSyncController};
use crate::media::{PlaybackSource, ScrollContainer, ScrollSnapshot, VideoSource};

/// The mounted video together with the controller scrubbing it.
///
/// Both live and die together: replacing the video tears the controller down.
pub struct LoadedVideo<S = VideoSource> {
    pub id: usize,
    pub source: S,
    pub controller: ScrollSyncController,
    pub path: PathBuf,
}

impl<S: PlaybackSource> LoadedVideo<S> {
    pub fn new(id: usize, source: S, config: &Config, path: PathBuf) -> Self {
        LoadedVideo {
            id,
            source,
            controller: ScrollSyncController::initialize(config),
            path,
        }
    }

    pub fn handle_scroll(&mut self) {
        self.controller.on_scroll();
    }

    pub fn handle_frame(&mut self, scroll: &impl ScrollContainer) -> Option<FrameOutcome> {
        self.controller.on_animation_frame(&mut self.source, scroll)
    }

    /// Run the one-time metadata handler if `id` still names this video.
    ///
    /// The warm-up rewinds to 0, so a computation is scheduled right after to
    /// bring the video back to wherever the text panel already is.
    pub fn handle_metadata(&mut self, id: usize) {
        if id != self.id {
            return;
        }
        self.controller.on_metadata_ready(&mut self.source);
        self.controller.on_scroll();
    }

    pub fn frame_pending(&self) -> bool {
        self.controller.phase() == FramePhase::Pending
    }

    /// Tear down the controller before the video is dropped.
    pub fn unmount(mut self) {
        self.controller.teardown();
        log::debug!("Unmounted video id={}", self.id);
    }
}

/// Application state for the single scrolling page.
pub struct App {
    pub config: Config,
    pub video: Option<LoadedVideo>,
    /// Geometry of the text panel as of the last scroll event.
    pub scroll: ScrollSnapshot,
    pub next_id: usize,
    pub error: Option<String>,
    pub status: String,
}

impl App {
    pub fn new(config: Config) -> Self {
        App {
            config,
            video: None,
            scroll: ScrollSnapshot::default(),
            next_id: 0,
            error: None,
            status: "Drop a video file here to load it".to_string(),
        }
    }

    pub fn frame_pending(&self) -> bool {
        self.video.as_ref().is_some_and(LoadedVideo::frame_pending)
    }
}
