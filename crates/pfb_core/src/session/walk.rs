//! Deterministic offline video scan.

use std::sync::Arc;

use crate::capture::{encode_jpeg, VideoSource};
use crate::config::Settings;
use crate::correlate::{ApplyOutcome, ApplyTarget, ResultCorrelator};
use crate::inference::FrameEvaluator;
use crate::models::{Frame, InferenceResult, PostureMode, SourceContext};

/// One accumulated scan entry.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Virtual frame index this entry belongs to.
    pub frame_index: u32,
    /// The settled result for that frame (success or error).
    pub result: Arc<InferenceResult>,
}

/// Accumulated state of one video scan.
///
/// `entries` is always a prefix-consistent, strictly increasing-by-index
/// sequence: the walker only advances after the prior frame's
/// submission settles, and the correlator refuses out-of-order appends.
#[derive(Debug, Clone)]
pub struct VideoWalkState {
    total_frames: u32,
    current_frame_index: u32,
    entries: Vec<WalkEntry>,
}

impl VideoWalkState {
    /// Create a fresh walk over `total_frames` frames.
    pub fn new(total_frames: u32) -> Self {
        Self {
            total_frames,
            current_frame_index: 0,
            entries: Vec::with_capacity(total_frames as usize),
        }
    }

    /// Number of frames this walk will visit.
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Index of the next frame to settle.
    pub fn current_frame_index(&self) -> u32 {
        self.current_frame_index
    }

    /// The accumulated per-frame feedback log, in index order.
    pub fn entries(&self) -> &[WalkEntry] {
        &self.entries
    }

    /// Whether every frame has settled.
    pub fn is_complete(&self) -> bool {
        self.current_frame_index == self.total_frames
    }

    /// Append the settled result for `frame_index`.
    ///
    /// Refuses anything but the next expected index; returns whether
    /// the entry was appended.
    pub(crate) fn append(&mut self, frame_index: u32, result: Arc<InferenceResult>) -> bool {
        if frame_index != self.current_frame_index || frame_index >= self.total_frames {
            return false;
        }
        self.entries.push(WalkEntry {
            frame_index,
            result,
        });
        self.current_frame_index += 1;
        true
    }
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every frame settled and was logged.
    Completed { total_frames: u32 },
    /// The walk was superseded before finishing.
    Cancelled { frames_settled: u32 },
}

/// Sequential frame-extraction driver over a finite media duration.
///
/// Visits frame indices `0..total_frames` where
/// `total_frames = floor(duration * rate)`, extracting the frame at
/// playback time `index / rate` for each, strictly in order and never
/// concurrently. A single bad frame produces an error entry and the
/// scan continues; only supersession stops it early.
pub struct VideoWalker {
    frames_per_second: f64,
    max_duration_secs: u32,
    jpeg_quality: u8,
    evaluator: Arc<dyn FrameEvaluator>,
    correlator: Arc<ResultCorrelator>,
}

impl VideoWalker {
    /// Create a walker from settings.
    pub fn new(
        settings: &Settings,
        evaluator: Arc<dyn FrameEvaluator>,
        correlator: Arc<ResultCorrelator>,
    ) -> Self {
        Self {
            frames_per_second: settings.scan.frames_per_second,
            max_duration_secs: settings.scan.max_duration_secs,
            jpeg_quality: settings.inference.jpeg_quality,
            evaluator,
            correlator,
        }
    }

    /// Number of virtual frames a scan of `duration_secs` will visit.
    pub fn total_frames_for(duration_secs: f64, rate: f64) -> u32 {
        if duration_secs <= 0.0 || rate <= 0.0 {
            return 0;
        }
        (duration_secs * rate).floor() as u32
    }

    /// Run a scan over the whole video.
    ///
    /// Registers a new walk with the correlator (superseding any walk
    /// in progress), then drives extraction and submission one frame at
    /// a time. The accumulated log is available from the correlator's
    /// walk snapshot during and after the run.
    pub async fn run(&self, video: Arc<dyn VideoSource>, mode: PostureMode) -> WalkOutcome {
        let full_duration = video.duration_secs();
        let duration = if full_duration > self.max_duration_secs as f64 {
            tracing::warn!(
                "[VideoWalker] Media is {:.1}s, truncating scan to {}s",
                full_duration,
                self.max_duration_secs
            );
            self.max_duration_secs as f64
        } else {
            full_duration
        };

        let total_frames = Self::total_frames_for(duration, self.frames_per_second);
        let generation = self.correlator.begin_walk(total_frames);

        tracing::info!(
            "[VideoWalker] Scanning {} frames at {} fps over {:.2}s of media",
            total_frames,
            self.frames_per_second,
            duration
        );

        for index in 0..total_frames {
            // Supersession check before starting the next frame.
            if !self.correlator.walk_generation_is_current(generation) {
                tracing::info!("[VideoWalker] Walk superseded before frame {}", index);
                return WalkOutcome::Cancelled {
                    frames_settled: index,
                };
            }

            let time_secs = index as f64 / self.frames_per_second;
            let seek_video = Arc::clone(&video);
            let extracted =
                tokio::task::spawn_blocking(move || seek_video.frame_at_time(time_secs)).await;

            let result = match extracted {
                Ok(Ok(image)) => match encode_jpeg(&image, self.jpeg_quality) {
                    Ok(jpeg) => {
                        let frame = Frame::new(jpeg, mode, SourceContext::VideoFrame(index));
                        self.evaluator.evaluate(&frame).await
                    }
                    Err(e) => {
                        tracing::warn!("[VideoWalker] Frame {} encode failed: {}", index, e);
                        InferenceResult::failure(e)
                    }
                },
                Ok(Err(e)) => {
                    tracing::warn!("[VideoWalker] Frame {} extraction failed: {}", index, e);
                    InferenceResult::failure(e)
                }
                Err(e) => {
                    tracing::warn!("[VideoWalker] Frame {} extraction task failed: {}", index, e);
                    InferenceResult::failure(e)
                }
            };

            let target = ApplyTarget::Video {
                frame_index: index,
                generation,
            };
            if self.correlator.apply(result, target) == ApplyOutcome::Stale {
                tracing::info!("[VideoWalker] Walk superseded at frame {}", index);
                return WalkOutcome::Cancelled {
                    frames_settled: index,
                };
            }
        }

        tracing::info!("[VideoWalker] Scan complete: {} frames", total_frames);
        WalkOutcome::Completed { total_frames }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use image::{DynamicImage, RgbImage};
    use tokio::sync::Notify;

    use crate::capture::CaptureError;
    use crate::models::ResultStatus;

    struct TestVideo {
        duration_secs: f64,
    }

    impl VideoSource for TestVideo {
        fn frame_at_time(&self, time_secs: f64) -> Result<DynamicImage, CaptureError> {
            if time_secs >= self.duration_secs {
                return Err(CaptureError::extraction_failed(time_secs, "past end"));
            }
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                4,
                4,
                image::Rgb([64, 64, 64]),
            )))
        }

        fn duration_secs(&self) -> f64 {
            self.duration_secs
        }

        fn width(&self) -> u32 {
            4
        }

        fn height(&self) -> u32 {
            4
        }
    }

    /// Evaluator that answers in order, optionally failing one index
    /// and optionally holding the first call until released.
    struct ScriptedEvaluator {
        calls: AtomicU32,
        fail_index: Option<u32>,
        hold_first: Option<Arc<Notify>>,
    }

    impl ScriptedEvaluator {
        fn ok() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_index: None,
                hold_first: None,
            }
        }
    }

    #[async_trait]
    impl FrameEvaluator for ScriptedEvaluator {
        async fn evaluate(&self, frame: &Frame) -> InferenceResult {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                if let Some(ref gate) = self.hold_first {
                    gate.notified().await;
                }
            }

            let index = match frame.source() {
                SourceContext::VideoFrame(i) => i,
                other => panic!("walker submitted non-video frame: {}", other),
            };

            if self.fail_index == Some(index) {
                return InferenceResult::failure("simulated outage");
            }

            InferenceResult {
                feedback_messages: vec![format!("{} frame {}", frame.mode().wire_name(), index)],
                confidences: vec![0.9],
                landmarks: Vec::new(),
                status: ResultStatus::Ok,
                raw: serde_json::Value::Null,
            }
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..2000 {
            if condition() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    fn walker_with(
        evaluator: Arc<dyn FrameEvaluator>,
        correlator: Arc<ResultCorrelator>,
        rate: f64,
    ) -> VideoWalker {
        let mut settings = Settings::default();
        settings.scan.frames_per_second = rate;
        VideoWalker::new(&settings, evaluator, correlator)
    }

    #[test]
    fn total_frames_is_floor_of_duration_times_rate() {
        assert_eq!(VideoWalker::total_frames_for(2.0, 5.0), 10);
        assert_eq!(VideoWalker::total_frames_for(2.5, 2.0), 5);
        assert_eq!(VideoWalker::total_frames_for(1.99, 5.0), 9);
        assert_eq!(VideoWalker::total_frames_for(0.0, 5.0), 0);
        assert_eq!(VideoWalker::total_frames_for(-1.0, 5.0), 0);
    }

    #[tokio::test]
    async fn completed_walk_logs_every_frame_in_order() {
        let correlator = Arc::new(ResultCorrelator::new());
        let walker = walker_with(
            Arc::new(ScriptedEvaluator::ok()),
            Arc::clone(&correlator),
            5.0,
        );
        let video = Arc::new(TestVideo { duration_secs: 2.0 });

        let outcome = walker.run(video, PostureMode::Squat).await;
        assert_eq!(outcome, WalkOutcome::Completed { total_frames: 10 });

        let walk = correlator.walk_snapshot().unwrap();
        assert!(walk.is_complete());
        assert_eq!(walk.entries().len(), 10);
        for (i, entry) in walk.entries().iter().enumerate() {
            assert_eq!(entry.frame_index, i as u32);
            assert_eq!(entry.result.status, ResultStatus::Ok);
        }
    }

    #[tokio::test]
    async fn single_bad_frame_does_not_abort_the_scan() {
        let correlator = Arc::new(ResultCorrelator::new());
        let evaluator = Arc::new(ScriptedEvaluator {
            fail_index: Some(3),
            ..ScriptedEvaluator::ok()
        });
        let walker = walker_with(evaluator, Arc::clone(&correlator), 5.0);
        let video = Arc::new(TestVideo { duration_secs: 2.0 });

        let outcome = walker.run(video, PostureMode::Pushup).await;
        assert_eq!(outcome, WalkOutcome::Completed { total_frames: 10 });

        let walk = correlator.walk_snapshot().unwrap();
        assert_eq!(walk.entries().len(), 10);
        assert_eq!(walk.entries()[3].result.status, ResultStatus::Error);
        assert_eq!(walk.entries()[4].result.status, ResultStatus::Ok);
    }

    #[tokio::test]
    async fn new_walk_supersedes_an_active_one() {
        let correlator = Arc::new(ResultCorrelator::new());
        let gate = Arc::new(Notify::new());
        let evaluator = Arc::new(ScriptedEvaluator {
            hold_first: Some(Arc::clone(&gate)),
            ..ScriptedEvaluator::ok()
        });

        let walker = Arc::new(walker_with(
            Arc::clone(&evaluator) as Arc<dyn FrameEvaluator>,
            Arc::clone(&correlator),
            5.0,
        ));
        let video = Arc::new(TestVideo { duration_secs: 2.0 });

        // First walk parks inside its first submission.
        let first = {
            let walker = Arc::clone(&walker);
            let video = Arc::clone(&video) as Arc<dyn VideoSource>;
            tokio::spawn(async move { walker.run(video, PostureMode::Squat).await })
        };
        let ev = Arc::clone(&evaluator);
        wait_until(move || ev.calls.load(Ordering::SeqCst) == 1).await;

        // Second walk runs to completion while the first is parked.
        let second_outcome = walker
            .run(Arc::clone(&video) as Arc<dyn VideoSource>, PostureMode::Desk)
            .await;
        assert_eq!(
            second_outcome,
            WalkOutcome::Completed { total_frames: 10 }
        );

        // Release the first walk's held submission: its result must be
        // dropped, not appended to the new walk's log.
        gate.notify_one();
        let first_outcome = first.await.unwrap();
        assert_eq!(first_outcome, WalkOutcome::Cancelled { frames_settled: 0 });

        let walk = correlator.walk_snapshot().unwrap();
        assert!(walk.is_complete());
        assert_eq!(walk.entries().len(), 10);
        for (i, entry) in walk.entries().iter().enumerate() {
            assert_eq!(entry.frame_index, i as u32);
            assert_eq!(
                entry.result.feedback_messages,
                vec![format!("desk frame {}", i)]
            );
        }
    }

    #[tokio::test]
    async fn overlong_media_is_truncated_to_the_cap() {
        let correlator = Arc::new(ResultCorrelator::new());
        let mut settings = Settings::default();
        settings.scan.frames_per_second = 5.0;
        settings.scan.max_duration_secs = 2;
        let walker = VideoWalker::new(
            &settings,
            Arc::new(ScriptedEvaluator::ok()),
            Arc::clone(&correlator),
        );
        let video = Arc::new(TestVideo {
            duration_secs: 100.0,
        });

        let outcome = walker.run(video, PostureMode::Desk).await;
        assert_eq!(outcome, WalkOutcome::Completed { total_frames: 10 });
    }
}
