//! Generation tokens for staleness detection.
//!
//! A counter is advanced whenever its owner is superseded (live session
//! stopped, new walk started). Work captures the generation at issue
//! time and compares at completion time; a mismatch means the result
//! belongs to a superseded owner and must be dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A captured generation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Monotonic generation counter, cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    value: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Create a new counter at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current generation.
    pub fn current(&self) -> Generation {
        Generation(self.value.load(Ordering::SeqCst))
    }

    /// Advance to a new generation, invalidating all captured tokens.
    ///
    /// Returns the new generation.
    pub fn advance(&self) -> Generation {
        Generation(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Check whether a captured generation is still current.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.value.load(Ordering::SeqCst) == generation.0
    }
}
