//! GStreamer operation logging and timing instrumentation.
//!
//! Seeks and state changes on the pipeline can stall the UI thread, so each
//! one is timed and logged with a level that grows with its duration.

use std::time::{Duration, Instant};

/// Log categories for filtering
enum LogCategory {
    Seek,
    State,
}

impl LogCategory {
    fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Seek => "SEEK",
            LogCategory::State => "STATE",
        }
    }
}

/// Log level for an operation that took `elapsed_ms`, given its slow and
/// stalled thresholds.
fn level_for(elapsed_ms: u128, slow_ms: u128, stalled_ms: u128, normal: log::Level) -> log::Level {
    if elapsed_ms > stalled_ms {
        log::Level::Error
    } else if elapsed_ms > slow_ms {
        log::Level::Warn
    } else {
        normal
    }
}

/// Log the start of a seek operation
pub fn log_seek_start(video_id: usize, target: Duration, accurate: bool) -> Instant {
    log::debug!(
        "[{}] Video {} seek START: target={}s, accurate={}",
        LogCategory::Seek.as_str(),
        video_id,
        target.as_secs_f64(),
        accurate
    );
    Instant::now()
}

/// Log the completion of a seek operation
pub fn log_seek_complete(video_id: usize, start: Instant) {
    let elapsed_ms = start.elapsed().as_millis();
    let level = level_for(elapsed_ms, 100, 1000, log::Level::Trace);
    log::log!(
        level,
        "[{}] Video {} seek COMPLETE: {}ms",
        LogCategory::Seek.as_str(),
        video_id,
        elapsed_ms
    );
}

/// Log a seek error
pub fn log_seek_error(video_id: usize, error: &str, start: Instant) {
    let elapsed_ms = start.elapsed().as_millis();
    log::error!(
        "[{}] Video {} seek ERROR after {}ms: {}",
        LogCategory::Seek.as_str(),
        video_id,
        elapsed_ms,
        error
    );
}

/// Log the start of a pipeline state change
pub fn log_state_change_start(video_id: usize, state: gstreamer::State) -> Instant {
    log::debug!(
        "[{}] Video {} -> {:?} START",
        LogCategory::State.as_str(),
        video_id,
        state
    );
    Instant::now()
}

/// Log the completion of a pipeline state change
pub fn log_state_change_complete(video_id: usize, state: gstreamer::State, start: Instant) {
    let elapsed_ms = start.elapsed().as_millis();
    let level = level_for(elapsed_ms, 500, 2000, log::Level::Debug);
    log::log!(
        level,
        "[{}] Video {} -> {:?} COMPLETE: {}ms",
        LogCategory::State.as_str(),
        video_id,
        state,
        elapsed_ms
    );
}

/// Log video creation
pub fn log_video_created(video_id: usize, path: &str) {
    log::info!("Video created: id={}, path={}", video_id, path);
}

/// Log video destruction
pub fn log_video_destroyed(video_id: usize) {
    log::info!("Video destroyed: id={}", video_id);
}
