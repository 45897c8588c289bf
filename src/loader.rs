use iced::Task;
use iced_video_player::Video;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PlaybackError, PlaybackResult};
use crate::gst_logger;
use crate::media::{PlaybackSource, VideoSource};
use crate::message::Message;
use crate::state::{App, LoadedVideo};

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mov", "MOV", "mp4", "MP4", "m4v", "M4V", "mkv", "MKV", "avi", "AVI", "webm", "WEBM",
];

/// Load a video from a file path, replacing the current one.
///
/// A failed load leaves the current video mounted. On success the returned
/// task delivers the one-time metadata notification to the new controller.
pub fn load_video_from_path(app: &mut App, video_path: PathBuf) -> Task<Message> {
    app.status = "Loading video...".to_string();
    let flags = app.config.source;

    let mounted = mount(
        &mut app.video,
        &mut app.next_id,
        &app.config,
        video_path.clone(),
        |id| open_video(&video_path).map(|video| VideoSource::new(id, video, flags)),
    );

    match mounted {
        Ok(video_id) => {
            if let Some(loaded) = &app.video {
                gst_logger::log_video_created(video_id, &video_path.display().to_string());
                log::info!(
                    "Video loaded: id={}, duration={:.3}s, native_fps={:?}",
                    video_id,
                    loaded.source.duration(),
                    loaded.source.native_fps()
                );
            }
            app.status = format!(
                "Video loaded: {}",
                video_path.file_name().unwrap_or_default().to_string_lossy()
            );
            app.error = None;

            // Opening blocks until preroll, so metadata is already available.
            Task::done(Message::MetadataReady(video_id))
        }
        Err(e) => {
            log::error!("{}", e);
            app.error = Some(e.to_string());
            app.status = match &app.video {
                Some(loaded) => format!(
                    "Still showing: {}",
                    loaded.path.file_name().unwrap_or_default().to_string_lossy()
                ),
                None => "Drop a video file here to load it".to_string(),
            };
            Task::none()
        }
    }
}

/// Open a source with the next id and swap it in for the current one.
///
/// The current video is only torn down once the new source opened, so an
/// error leaves both `slot` and `next_id` untouched.
pub fn mount<S: PlaybackSource>(
    slot: &mut Option<LoadedVideo<S>>,
    next_id: &mut usize,
    config: &Config,
    path: PathBuf,
    open: impl FnOnce(usize) -> PlaybackResult<S>,
) -> PlaybackResult<usize> {
    let video_id = *next_id;
    let source = open(video_id)?;

    if let Some(previous) = slot.take() {
        let previous_id = previous.id;
        previous.unmount();
        gst_logger::log_video_destroyed(previous_id);
    }

    *next_id += 1;
    *slot = Some(LoadedVideo::new(video_id, source, config, path));
    Ok(video_id)
}

fn open_video(video_path: &Path) -> PlaybackResult<Video> {
    std::fs::metadata(video_path)
        .map_err(|e| PlaybackError::load(format!("video file not found: {}", e)))?;
    let url = url::Url::from_file_path(video_path)
        .map_err(|_| PlaybackError::InvalidPath(video_path.to_path_buf()))?;
    Video::new(&url).map_err(|e| PlaybackError::load(e.to_string()))
}

/// Whether the path has one of the extensions offered in the file dialog.
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext))
}
