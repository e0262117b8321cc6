//! Frame-source sessions.
//!
//! Two drivers feed frames into the pipeline:
//! - `LiveSampler` polls a camera on a fixed cadence while a
//!   `LiveSession` is active, with at most one request in flight;
//! - `VideoWalker` deterministically visits every virtual frame of a
//!   finite video, one at a time, in strictly increasing index order.
//!
//! Both are cancelled cooperatively: stopping a session or starting a
//! new walk advances a generation token, and any result still in flight
//! fails the token check at apply-time and is dropped.

mod live;
mod token;
mod walk;

pub use live::{LiveSampler, LiveSession, LiveState};
pub use token::{Generation, GenerationCounter};
pub use walk::{VideoWalkState, VideoWalker, WalkEntry, WalkOutcome};
