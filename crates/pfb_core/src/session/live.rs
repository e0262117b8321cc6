//! Live camera sampling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::capture::{encode_jpeg, CameraOpener, CameraSource};
use crate::config::Settings;
use crate::correlate::{ApplyTarget, ResultCorrelator};
use crate::inference::FrameEvaluator;
use crate::models::{Frame, InferenceResult, PostureMode, SourceContext};

/// Lifecycle state of the camera polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveState {
    #[default]
    Idle,
    Active,
}

/// Observable state of one live session.
///
/// The session exclusively owns the in-flight flag for the camera path;
/// nothing else sets or clears it.
#[derive(Default)]
pub struct LiveSession {
    state: Mutex<LiveState>,
    in_flight: AtomicBool,
    last_submitted_at: Mutex<Option<Instant>>,
    last_error: Mutex<Option<String>>,
}

impl LiveSession {
    /// Current lifecycle state.
    pub fn state(&self) -> LiveState {
        *self.state.lock()
    }

    /// Whether the session is actively sampling.
    pub fn is_active(&self) -> bool {
        self.state() == LiveState::Active
    }

    /// Whether a submission is currently outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// When the last frame was submitted, if any.
    pub fn last_submitted_at(&self) -> Option<Instant> {
        *self.last_submitted_at.lock()
    }

    /// The error that kept the session from starting, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn set_state(&self, state: LiveState) {
        *self.state.lock() = state;
    }

    fn set_error(&self, message: Option<String>) {
        *self.last_error.lock() = message;
    }

    fn mark_submitted(&self) {
        self.in_flight.store(true, Ordering::SeqCst);
        *self.last_submitted_at.lock() = Some(Instant::now());
    }

    fn clear_in_flight(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Fixed-period sampling loop over a camera source.
///
/// Backpressure policy: a tick that lands while a submission is still
/// in flight is dropped entirely, never queued, so the session has at
/// most one outstanding request at any time. Every non-skipped tick
/// yields exactly one visible outcome (feedback, "No pose detected", or
/// an error line).
pub struct LiveSampler {
    period: Duration,
    jpeg_quality: u8,
    mode: Arc<Mutex<PostureMode>>,
    opener: CameraOpener,
    evaluator: Arc<dyn FrameEvaluator>,
    correlator: Arc<ResultCorrelator>,
    session: Arc<LiveSession>,
    /// Wakes the active loop task so it exits (and releases the
    /// camera) at stop time instead of at the next cadence boundary.
    /// One signal per session; `stop()` takes it.
    stop_signal: Mutex<Option<Arc<Notify>>>,
}

impl LiveSampler {
    /// Create a sampler. No camera is touched until `start()`.
    pub fn new(
        settings: &Settings,
        opener: CameraOpener,
        evaluator: Arc<dyn FrameEvaluator>,
        correlator: Arc<ResultCorrelator>,
    ) -> Self {
        Self {
            period: Duration::from_millis(settings.live.sample_period_ms),
            jpeg_quality: settings.inference.jpeg_quality,
            mode: Arc::new(Mutex::new(PostureMode::default())),
            opener,
            evaluator,
            correlator,
            session: Arc::new(LiveSession::default()),
            stop_signal: Mutex::new(None),
        }
    }

    /// Observable session state.
    pub fn session(&self) -> &Arc<LiveSession> {
        &self.session
    }

    /// Currently selected posture mode.
    pub fn mode(&self) -> PostureMode {
        *self.mode.lock()
    }

    /// Select a mode. Takes effect on the next captured frame, not
    /// retroactively.
    pub fn set_mode(&self, mode: PostureMode) {
        *self.mode.lock() = mode;
    }

    /// Acquire the camera and start the sampling loop.
    ///
    /// On camera-acquisition failure the session never reaches Active:
    /// the error is recorded on the session and returned, and the state
    /// stays Idle until the user retries.
    pub fn start(&self) -> Result<(), crate::capture::CaptureError> {
        if self.session.is_active() {
            tracing::warn!("[LiveSampler] start() ignored: session already active");
            return Ok(());
        }

        let camera = (self.opener)().map_err(|e| {
            tracing::error!("[LiveSampler] Camera acquisition failed: {}", e);
            self.session.set_error(Some(e.to_string()));
            e
        })?;

        self.session.set_error(None);
        self.session.clear_in_flight();
        self.session.set_state(LiveState::Active);

        let generation = self.correlator.live_generation();
        tracing::info!(
            "[LiveSampler] Session started on {} (period {:?})",
            camera.name(),
            self.period
        );

        let stop_signal = Arc::new(Notify::new());
        *self.stop_signal.lock() = Some(Arc::clone(&stop_signal));

        let sampler_loop = SamplerLoop {
            period: self.period,
            jpeg_quality: self.jpeg_quality,
            mode: Arc::clone(&self.mode),
            evaluator: Arc::clone(&self.evaluator),
            correlator: Arc::clone(&self.correlator),
            session: Arc::clone(&self.session),
            stop_signal,
        };
        tokio::spawn(sampler_loop.run(camera, generation));

        Ok(())
    }

    /// Stop the session.
    ///
    /// Advances the live generation so any result still in flight is
    /// dropped at apply-time, and wakes the loop task so it exits and
    /// releases the camera now, not at the next cadence boundary.
    pub fn stop(&self) {
        if !self.session.is_active() {
            return;
        }
        self.correlator.invalidate_live();
        self.session.set_state(LiveState::Idle);
        self.session.clear_in_flight();
        if let Some(signal) = self.stop_signal.lock().take() {
            signal.notify_one();
        }
        tracing::info!("[LiveSampler] Session stopped");
    }
}

/// Everything the detached loop task needs, cloned out of the sampler
/// so the loop owns its handles outright.
struct SamplerLoop {
    period: Duration,
    jpeg_quality: u8,
    mode: Arc<Mutex<PostureMode>>,
    evaluator: Arc<dyn FrameEvaluator>,
    correlator: Arc<ResultCorrelator>,
    session: Arc<LiveSession>,
    stop_signal: Arc<Notify>,
}

impl SamplerLoop {
    async fn run(self, camera: Arc<dyn CameraSource>, generation: crate::session::Generation) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.stop_signal.notified() => break,
            }

            if !self.correlator.live_generation_is_current(generation) {
                break;
            }

            // Backpressure: drop the tick, do not queue.
            if self.session.in_flight() {
                tracing::trace!("[LiveSampler] Tick skipped: request in flight");
                continue;
            }

            let mode = *self.mode.lock();
            let grab_camera = Arc::clone(&camera);
            let grabbed = tokio::task::spawn_blocking(move || grab_camera.grab()).await;

            // The session may have stopped while the grab was running.
            if !self.correlator.live_generation_is_current(generation) {
                break;
            }

            let frame = match grabbed {
                Ok(Ok(image)) => match encode_jpeg(&image, self.jpeg_quality) {
                    Ok(jpeg) => Frame::new(jpeg, mode, SourceContext::Live),
                    Err(e) => {
                        tracing::warn!("[LiveSampler] Frame encode failed: {}", e);
                        self.correlator
                            .apply(InferenceResult::failure(e), ApplyTarget::Live { generation });
                        continue;
                    }
                },
                Ok(Err(e)) => {
                    tracing::warn!("[LiveSampler] Frame capture failed: {}", e);
                    self.correlator
                        .apply(InferenceResult::failure(e), ApplyTarget::Live { generation });
                    continue;
                }
                Err(e) => {
                    tracing::warn!("[LiveSampler] Capture task failed: {}", e);
                    self.correlator
                        .apply(InferenceResult::failure(e), ApplyTarget::Live { generation });
                    continue;
                }
            };

            self.session.mark_submitted();

            let evaluator = Arc::clone(&self.evaluator);
            let correlator = Arc::clone(&self.correlator);
            let session = Arc::clone(&self.session);
            tokio::spawn(async move {
                let result = evaluator.evaluate(&frame).await;
                correlator.apply(result, ApplyTarget::Live { generation });
                // Cleared on every settle, success or error, but only
                // while this task's session is still current: a
                // superseded session's late settle must not release a
                // newer session's in-flight slot.
                if correlator.live_generation_is_current(generation) {
                    session.clear_in_flight();
                }
            });
        }

        tracing::debug!("[LiveSampler] Sampling loop exited, camera released");
    }
}
