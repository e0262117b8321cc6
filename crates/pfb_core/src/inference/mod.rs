//! Remote pose-feedback inference.
//!
//! The remote service is an external collaborator: one frame in,
//! landmarks + feedback + confidences out. Everything here is about
//! getting a frame onto the wire and mapping whatever comes back (or
//! fails to come back) into an `InferenceResult` - callers never see a
//! transport error, only a result with `status == Error`.

mod client;
mod protocol;

use async_trait::async_trait;

use crate::models::{Frame, InferenceResult};

pub use client::InferenceClient;
pub use protocol::{map_response, ProcessFrameRequest};

/// Trait for frame evaluators.
///
/// The production implementation submits to the remote endpoint; tests
/// substitute scripted evaluators. Infallible by construction: failures
/// are folded into the returned result's status.
#[async_trait]
pub trait FrameEvaluator: Send + Sync {
    /// Evaluate one frame and return the outcome.
    async fn evaluate(&self, frame: &Frame) -> InferenceResult;
}
