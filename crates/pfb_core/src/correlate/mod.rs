//! Result correlation.
//!
//! Results come back from the inference service at arbitrary times,
//! possibly after the session or walk that issued them is gone. The
//! correlator is the single gatekeeper: it checks the generation token
//! captured at submit time against the current one and either routes
//! the result to its slot (live overlay, walk log, one-shot report) or
//! drops it silently.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::InferenceResult;
use crate::session::{Generation, GenerationCounter, VideoWalkState};

/// Which rendering surface a repaint request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintSurface {
    /// The live camera overlay.
    Live,
    /// The static uploaded-image overlay.
    StaticImage,
}

/// Callback fired when an accepted result should be repainted.
///
/// Arguments: (surface, the accepted result)
pub type RepaintCallback = Box<dyn Fn(RepaintSurface, &InferenceResult) + Send + Sync>;

/// Routing context for one completed submission.
#[derive(Debug, Clone, Copy)]
pub enum ApplyTarget {
    /// Result for the live overlay; relevant only while the generation
    /// captured at submit time is still current.
    Live { generation: Generation },
    /// Result for one frame of a video walk; relevant only while the
    /// owning walk is the active walk.
    Video {
        frame_index: u32,
        generation: Generation,
    },
    /// One-shot uploaded-image result; always relevant.
    SingleImage,
}

/// Outcome of routing one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result was routed to its slot.
    Accepted,
    /// The result belonged to a superseded session or walk and was
    /// dropped without touching any state.
    Stale,
}

/// Routes completed inference results to the correct state slot,
/// guarding against stale overwrites.
///
/// All slots are single-writer: the live slot is written only through
/// live applies, the walk log only through walk applies, the report
/// only through single-image applies.
#[derive(Default)]
pub struct ResultCorrelator {
    live_generation: GenerationCounter,
    walk_generation: GenerationCounter,
    live_result: Mutex<Option<Arc<InferenceResult>>>,
    report: Mutex<Option<Arc<InferenceResult>>>,
    walk: Mutex<Option<VideoWalkState>>,
    repaint: Mutex<Option<RepaintCallback>>,
}

impl ResultCorrelator {
    /// Create a correlator with empty slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the repaint callback.
    pub fn set_repaint_callback(&self, callback: RepaintCallback) {
        *self.repaint.lock() = Some(callback);
    }

    /// Capture the current live-session generation.
    pub fn live_generation(&self) -> Generation {
        self.live_generation.current()
    }

    /// Check whether a captured live generation is still current.
    pub fn live_generation_is_current(&self, generation: Generation) -> bool {
        self.live_generation.is_current(generation)
    }

    /// Invalidate the live session: results issued before this call are
    /// dropped at apply-time. Also clears the displayed live result.
    pub fn invalidate_live(&self) -> Generation {
        let generation = self.live_generation.advance();
        *self.live_result.lock() = None;
        generation
    }

    /// Begin a new walk of `total_frames` frames, superseding any walk
    /// in progress. The superseded walk's in-flight results fail the
    /// generation check and never reach the new log.
    pub fn begin_walk(&self, total_frames: u32) -> Generation {
        let generation = self.walk_generation.advance();
        *self.walk.lock() = Some(VideoWalkState::new(total_frames));
        generation
    }

    /// Cancel the active walk without starting a new one. The partial
    /// log remains readable until the next `begin_walk`.
    pub fn cancel_walk(&self) -> Generation {
        self.walk_generation.advance()
    }

    /// Check whether a captured walk generation is still current.
    pub fn walk_generation_is_current(&self, generation: Generation) -> bool {
        self.walk_generation.is_current(generation)
    }

    /// Route one completed result.
    pub fn apply(&self, result: InferenceResult, target: ApplyTarget) -> ApplyOutcome {
        match target {
            ApplyTarget::Live { generation } => {
                if !self.live_generation.is_current(generation) {
                    tracing::debug!("[Correlator] Dropping stale live result");
                    return ApplyOutcome::Stale;
                }
                let result = Arc::new(result);
                *self.live_result.lock() = Some(Arc::clone(&result));
                self.request_repaint(RepaintSurface::Live, &result);
                ApplyOutcome::Accepted
            }
            ApplyTarget::Video {
                frame_index,
                generation,
            } => {
                if !self.walk_generation.is_current(generation) {
                    tracing::debug!(
                        "[Correlator] Dropping stale walk result for frame {}",
                        frame_index
                    );
                    return ApplyOutcome::Stale;
                }
                let mut walk = self.walk.lock();
                match walk.as_mut() {
                    Some(state) => {
                        if state.append(frame_index, Arc::new(result)) {
                            ApplyOutcome::Accepted
                        } else {
                            // Current generation but no matching log slot:
                            // the walk was torn down between check and lock.
                            tracing::debug!(
                                "[Correlator] No active walk slot for frame {}",
                                frame_index
                            );
                            ApplyOutcome::Stale
                        }
                    }
                    None => {
                        tracing::debug!(
                            "[Correlator] No active walk slot for frame {}",
                            frame_index
                        );
                        ApplyOutcome::Stale
                    }
                }
            }
            ApplyTarget::SingleImage => {
                let result = Arc::new(result);
                *self.report.lock() = Some(Arc::clone(&result));
                self.request_repaint(RepaintSurface::StaticImage, &result);
                ApplyOutcome::Accepted
            }
        }
    }

    /// The most recently accepted live result, if any.
    pub fn live_result(&self) -> Option<Arc<InferenceResult>> {
        self.live_result.lock().clone()
    }

    /// The one-shot uploaded-image result, if any.
    pub fn report(&self) -> Option<Arc<InferenceResult>> {
        self.report.lock().clone()
    }

    /// Snapshot of the active walk's log.
    pub fn walk_snapshot(&self) -> Option<VideoWalkState> {
        self.walk.lock().clone()
    }

    fn request_repaint(&self, surface: RepaintSurface, result: &InferenceResult) {
        if let Some(ref callback) = *self.repaint.lock() {
            callback(surface, result);
        }
    }
}
