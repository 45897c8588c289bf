//! Scroll-synchronized playback.
//!
//! Maps the vertical scroll progress of the text panel to a playback position
//! on the video. Scroll events are coalesced so at most one computation runs
//! per rendered frame, and seeks smaller than one frame are skipped.

use crate::config::{Config, DegenerateRange};
use crate::media::{PlaybackSource, ScrollContainer};

/// Playback bookkeeping owned by one controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncState {
    pub estimated_frame_rate: f64,
    /// Last position successfully written to the source, or 0.
    pub last_applied_time: f64,
    pub current_frame_index: u64,
}

impl SyncState {
    fn new(frame_rate: f64) -> Self {
        SyncState {
            estimated_frame_rate: frame_rate,
            last_applied_time: 0.0,
            current_frame_index: 0,
        }
    }
}

/// Whether a per-frame computation is waiting to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePhase {
    #[default]
    Idle,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MetadataListener {
    Armed,
    Fired,
    Detached,
}

/// Result of one scheduled computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Seeked { target: f64, frame_index: u64 },
    /// Target is within one frame of the last applied time.
    BelowThreshold,
    /// Target was not a finite number, or the seek failed.
    Skipped,
}

/// Keeps a playback source's position in step with scroll progress.
///
/// The controller doubles as its own teardown handle: [`teardown`] detaches
/// both listeners, and the application drops the controller afterwards.
///
/// [`teardown`]: ScrollSyncController::teardown
#[derive(Debug)]
pub struct ScrollSyncController {
    state: SyncState,
    phase: FramePhase,
    metadata: MetadataListener,
    scroll_attached: bool,
    default_frame_rate: f64,
    degenerate_range: DegenerateRange,
}

impl ScrollSyncController {
    /// Mount a controller with the metadata and scroll listeners attached.
    pub fn initialize(config: &Config) -> Self {
        log::debug!(
            "Sync controller mounted (default_fps={}, degenerate_range={:?})",
            config.default_frame_rate,
            config.degenerate_range
        );
        ScrollSyncController {
            state: SyncState::new(config.default_frame_rate),
            phase: FramePhase::Idle,
            metadata: MetadataListener::Armed,
            scroll_attached: true,
            default_frame_rate: config.default_frame_rate,
            degenerate_range: config.degenerate_range,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    #[cfg(test)]
    pub fn listens_for_metadata(&self) -> bool {
        self.metadata == MetadataListener::Armed
    }

    #[cfg(test)]
    pub fn listens_for_scroll(&self) -> bool {
        self.scroll_attached
    }

    /// Detach both listeners and drop any pending computation.
    pub fn teardown(&mut self) {
        self.metadata = MetadataListener::Detached;
        self.scroll_attached = false;
        self.phase = FramePhase::Idle;
        log::debug!("Sync controller torn down");
    }

    /// Estimate the frame rate, warm up the decoder and rewind to 0.
    ///
    /// Runs once; later calls are ignored.
    pub fn on_metadata_ready<S: PlaybackSource + ?Sized>(&mut self, source: &mut S) {
        if self.metadata != MetadataListener::Armed {
            return;
        }
        self.metadata = MetadataListener::Fired;

        let duration = source.duration();
        self.state.estimated_frame_rate =
            estimate_frame_rate(source.decoded_frame_count(), duration, self.default_frame_rate);
        log::info!(
            "Metadata ready: duration={:.3}s, estimated_fps={}",
            duration,
            self.state.estimated_frame_rate
        );

        // Warm-up is best effort; platforms may refuse to play.
        if let Err(e) = source.play() {
            log::debug!("Decoder warm-up play refused: {}", e);
        }
        source.pause();

        log::debug!("Rewinding from {:.3}s after warm-up", source.position());
        if let Err(e) = source.set_position(0.0) {
            log::warn!("Rewind after warm-up failed: {}", e);
        }
    }

    /// Schedule a computation for the next frame.
    ///
    /// Returns `false` when one is already pending or the scroll listener is
    /// detached.
    pub fn on_scroll(&mut self) -> bool {
        if !self.scroll_attached || self.phase == FramePhase::Pending {
            return false;
        }
        self.phase = FramePhase::Pending;
        true
    }

    /// Run the pending computation, if any, against the current geometry.
    pub fn on_animation_frame<S, C>(&mut self, source: &mut S, container: &C) -> Option<FrameOutcome>
    where
        S: PlaybackSource + ?Sized,
        C: ScrollContainer + ?Sized,
    {
        if self.phase != FramePhase::Pending {
            return None;
        }

        let max_scroll =
            f64::from(container.scrollable_height()) - f64::from(container.viewport_height());
        let progress = scroll_progress(
            f64::from(container.scroll_offset()),
            max_scroll,
            self.degenerate_range,
        );
        let target = progress * source.duration();
        let fps = self.state.estimated_frame_rate;

        let outcome = if !target.is_finite() {
            FrameOutcome::Skipped
        } else if !exceeds_frame_threshold(target, self.state.last_applied_time, fps) {
            FrameOutcome::BelowThreshold
        } else {
            match source.set_position(target) {
                Ok(()) => {
                    self.state.last_applied_time = target;
                    self.state.current_frame_index = frame_index(target, fps);
                    log::trace!(
                        "Scrubbed to {:.3}s (frame {}, progress {:.4})",
                        target,
                        self.state.current_frame_index,
                        progress
                    );
                    FrameOutcome::Seeked {
                        target,
                        frame_index: self.state.current_frame_index,
                    }
                }
                Err(e) => {
                    log::warn!("Scroll seek dropped: {}", e);
                    FrameOutcome::Skipped
                }
            }
        };

        self.phase = FramePhase::Idle;
        Some(outcome)
    }
}

/// `round(count / duration)`, or `default` when that is zero, NaN or the
/// inputs are unusable.
pub fn estimate_frame_rate(decoded_frames: Option<u64>, duration: f64, default: f64) -> f64 {
    let Some(count) = decoded_frames else {
        return default;
    };
    if !(duration.is_finite() && duration > 0.0) {
        return default;
    }
    let fps = (count as f64 / duration).round();
    if fps.is_nan() || fps == 0.0 { default } else { fps }
}

/// Normalized scroll position, clamped to `[0, 1]`.
///
/// With [`DegenerateRange::Float`] a zero range divides as floats do, so
/// `0 / 0` stays NaN and the caller skips the seek.
pub fn scroll_progress(offset: f64, max_scroll: f64, degenerate: DegenerateRange) -> f64 {
    if max_scroll <= 0.0 && degenerate == DegenerateRange::End {
        return 1.0;
    }
    (offset / max_scroll).clamp(0.0, 1.0)
}

/// Whether moving from `last` to `target` covers more than one frame.
pub fn exceeds_frame_threshold(target: f64, last: f64, fps: f64) -> bool {
    (target - last).abs() > 1.0 / fps
}

pub fn frame_index(time: f64, fps: f64) -> u64 {
    (time * fps).floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ScrollSnapshot;
    use crate::media::testing::{MockSource, page};

    fn controller() -> ScrollSyncController {
        ScrollSyncController::initialize(&Config::default())
    }

    fn scroll_to(
        ctl: &mut ScrollSyncController,
        source: &mut MockSource,
        offset: f32,
    ) -> Option<FrameOutcome> {
        ctl.on_scroll();
        ctl.on_animation_frame(source, &page(offset))
    }

    #[test]
    fn scenario_half_scroll_then_sub_frame_nudge() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);

        let outcome = scroll_to(&mut ctl, &mut source, 500.0);
        assert_eq!(
            outcome,
            Some(FrameOutcome::Seeked {
                target: 5.0,
                frame_index: 150
            })
        );
        assert_eq!(source.position, 5.0);
        assert_eq!(ctl.state().current_frame_index, 150);

        let outcome = scroll_to(&mut ctl, &mut source, 503.0);
        assert_eq!(outcome, Some(FrameOutcome::BelowThreshold));
        assert_eq!(source.seeks, vec![5.0]);
        assert_eq!(ctl.state().current_frame_index, 150);
        assert_eq!(ctl.state().last_applied_time, 5.0);
    }

    #[test]
    fn burst_of_scrolls_schedules_one_computation() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);

        assert!(ctl.on_scroll());
        for _ in 0..20 {
            assert!(!ctl.on_scroll());
        }
        assert_eq!(ctl.phase(), FramePhase::Pending);

        assert!(ctl.on_animation_frame(&mut source, &page(1000.0)).is_some());
        assert_eq!(ctl.phase(), FramePhase::Idle);
        assert!(ctl.on_animation_frame(&mut source, &page(1000.0)).is_none());
        assert_eq!(source.seeks.len(), 1);
    }

    #[test]
    fn frame_without_pending_scroll_is_noop() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);
        assert!(ctl.on_animation_frame(&mut source, &page(500.0)).is_none());
        assert!(source.seeks.is_empty());
    }

    #[test]
    fn computation_reads_geometry_at_frame_time() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);

        ctl.on_scroll();
        // The offset kept moving between the scroll event and the frame.
        ctl.on_animation_frame(&mut source, &page(250.0));
        assert_eq!(source.position, 2.5);
    }

    #[test]
    fn progress_and_target_stay_in_range() {
        let duration = 12.5;
        let max_scroll = 1000.0;
        for step in 0..=100 {
            let offset = step as f64 * 10.0;
            let progress = scroll_progress(offset, max_scroll, DegenerateRange::Float);
            assert!((0.0..=1.0).contains(&progress));
            let target = progress * duration;
            assert!((0.0..=duration).contains(&target));
        }
    }

    #[test]
    fn overscroll_clamps_to_ends() {
        assert_eq!(scroll_progress(-40.0, 1000.0, DegenerateRange::Float), 0.0);
        assert_eq!(scroll_progress(1200.0, 1000.0, DegenerateRange::Float), 1.0);
    }

    #[test]
    fn degenerate_range_float_policy() {
        assert!(scroll_progress(0.0, 0.0, DegenerateRange::Float).is_nan());
        assert_eq!(scroll_progress(10.0, 0.0, DegenerateRange::Float), 1.0);
        assert_eq!(scroll_progress(10.0, -200.0, DegenerateRange::Float), 0.0);
    }

    #[test]
    fn degenerate_range_end_policy() {
        assert_eq!(scroll_progress(0.0, 0.0, DegenerateRange::End), 1.0);
        assert_eq!(scroll_progress(0.0, -200.0, DegenerateRange::End), 1.0);
        assert_eq!(scroll_progress(500.0, 1000.0, DegenerateRange::End), 0.5);
    }

    #[test]
    fn short_page_does_not_seek_or_panic() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);
        let short = ScrollSnapshot {
            content_height: 600.0,
            viewport_height: 600.0,
            offset_y: 0.0,
        };

        ctl.on_scroll();
        assert_eq!(
            ctl.on_animation_frame(&mut source, &short),
            Some(FrameOutcome::Skipped)
        );
        assert!(source.seeks.is_empty());
        assert_eq!(ctl.phase(), FramePhase::Idle);
    }

    #[test]
    fn short_page_with_end_policy_seeks_to_end() {
        let config = Config {
            degenerate_range: DegenerateRange::End,
            ..Config::default()
        };
        let mut ctl = ScrollSyncController::initialize(&config);
        let mut source = MockSource::with_duration(4.0);
        let short = ScrollSnapshot {
            content_height: 300.0,
            viewport_height: 600.0,
            offset_y: 0.0,
        };

        ctl.on_scroll();
        ctl.on_animation_frame(&mut source, &short);
        assert_eq!(source.position, 4.0);
    }

    #[test]
    fn nan_duration_degrades_to_no_seek() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(f64::NAN);
        assert_eq!(
            scroll_to(&mut ctl, &mut source, 700.0),
            Some(FrameOutcome::Skipped)
        );
        assert!(source.seeks.is_empty());
    }

    #[test]
    fn zero_duration_degrades_to_no_seek() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(0.0);
        assert_eq!(
            scroll_to(&mut ctl, &mut source, 700.0),
            Some(FrameOutcome::BelowThreshold)
        );
        assert!(source.seeks.is_empty());
    }

    #[test]
    fn failed_seek_leaves_state_untouched() {
        let mut ctl = controller();
        let mut source = MockSource {
            fail_seeks: true,
            ..MockSource::with_duration(10.0)
        };

        assert_eq!(
            scroll_to(&mut ctl, &mut source, 500.0),
            Some(FrameOutcome::Skipped)
        );
        assert_eq!(ctl.state().last_applied_time, 0.0);
        assert_eq!(ctl.state().current_frame_index, 0);
        assert_eq!(ctl.phase(), FramePhase::Idle);
    }

    #[test]
    fn metadata_estimates_frame_rate() {
        let mut ctl = controller();
        let mut source = MockSource {
            decoded: Some(240),
            ..MockSource::with_duration(10.0)
        };
        ctl.on_metadata_ready(&mut source);
        assert_eq!(ctl.state().estimated_frame_rate, 24.0);
    }

    #[test]
    fn frame_rate_defaults_without_usable_signal() {
        let cases = [
            (None, 10.0),
            (Some(0), 10.0),
            (Some(300), 0.0),
            (Some(300), f64::NAN),
        ];
        for (decoded, duration) in cases {
            let mut ctl = controller();
            let mut source = MockSource {
                decoded,
                ..MockSource::with_duration(duration)
            };
            ctl.on_metadata_ready(&mut source);
            assert_eq!(ctl.state().estimated_frame_rate, 30.0, "{decoded:?} / {duration}");
        }
    }

    #[test]
    fn estimate_rounds_to_nearest() {
        assert_eq!(estimate_frame_rate(Some(2997), 100.0, 30.0), 30.0);
        assert_eq!(estimate_frame_rate(Some(599), 10.0, 30.0), 60.0);
        assert_eq!(estimate_frame_rate(Some(4), 10.0, 30.0), 30.0);
        assert_eq!(estimate_frame_rate(Some(100), f64::INFINITY, 30.0), 30.0);
    }

    #[test]
    fn warm_up_rewinds_even_when_play_is_rejected() {
        let mut ctl = controller();
        let mut source = MockSource {
            reject_play: true,
            position: 3.2,
            ..MockSource::with_duration(10.0)
        };

        ctl.on_metadata_ready(&mut source);
        assert_eq!(source.plays, 1);
        assert_eq!(source.pauses, 1);
        assert_eq!(source.position(), 0.0);
    }

    #[test]
    fn warm_up_rewinds_after_successful_play() {
        let mut ctl = controller();
        let mut source = MockSource {
            position: 1.0,
            ..MockSource::with_duration(10.0)
        };
        ctl.on_metadata_ready(&mut source);
        assert_eq!(source.pauses, 1);
        assert_eq!(source.position(), 0.0);
    }

    #[test]
    fn metadata_handler_fires_once() {
        let mut ctl = controller();
        let mut source = MockSource {
            decoded: Some(240),
            ..MockSource::with_duration(10.0)
        };
        ctl.on_metadata_ready(&mut source);
        assert!(!ctl.listens_for_metadata());

        source.decoded = Some(600);
        ctl.on_metadata_ready(&mut source);
        assert_eq!(ctl.state().estimated_frame_rate, 24.0);
        assert_eq!(source.plays, 1);
    }

    #[test]
    fn estimated_rate_drives_threshold_and_frame_index() {
        let mut ctl = controller();
        let mut source = MockSource {
            decoded: Some(600),
            ..MockSource::with_duration(10.0)
        };
        ctl.on_metadata_ready(&mut source);

        // 0.02s is below 1/30 but above 1/60.
        scroll_to(&mut ctl, &mut source, 500.0);
        let outcome = scroll_to(&mut ctl, &mut source, 502.0);
        assert!(matches!(
            outcome,
            Some(FrameOutcome::Seeked {
                frame_index: 301,
                ..
            })
        ));
    }

    #[test]
    fn rescheduling_after_rewind_catches_up_with_scrolled_page() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);

        ctl.on_metadata_ready(&mut source);
        assert_eq!(source.position, 0.0);

        assert!(ctl.on_scroll());
        let outcome = ctl.on_animation_frame(&mut source, &page(1000.0));
        assert_eq!(
            outcome,
            Some(FrameOutcome::Seeked {
                target: 10.0,
                frame_index: 300
            })
        );
        assert_eq!(source.position, 10.0);
    }

    #[test]
    fn teardown_detaches_listeners() {
        let mut ctl = controller();
        let mut source = MockSource::with_duration(10.0);

        ctl.on_scroll();
        ctl.teardown();
        assert_eq!(ctl.phase(), FramePhase::Idle);
        assert!(!ctl.listens_for_scroll());
        assert!(!ctl.listens_for_metadata());

        assert!(!ctl.on_scroll());
        assert!(ctl.on_animation_frame(&mut source, &page(500.0)).is_none());
        ctl.on_metadata_ready(&mut source);
        assert_eq!(source.plays, 0);
        assert!(source.seeks.is_empty());
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut first = controller();
        let second = controller();
        let mut source = MockSource::with_duration(10.0);

        scroll_to(&mut first, &mut source, 1000.0);
        assert_eq!(first.state().last_applied_time, 10.0);
        assert_eq!(second.state().last_applied_time, 0.0);
    }

    #[test]
    fn frame_index_floors() {
        assert_eq!(frame_index(5.0, 30.0), 150);
        assert_eq!(frame_index(5.03, 30.0), 150);
        assert_eq!(frame_index(0.0, 24.0), 0);
    }
}
