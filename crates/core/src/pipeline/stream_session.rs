use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-stream control flags shared between the HTTP side and the worker
/// driving the pipeline.
///
/// Clones share the same flags. Pausing stops the pipeline before it reads
/// the next frame; cancelling ends the stream at the next step.
#[derive(Clone, Debug, Default)]
pub struct StreamSession {
    paused: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Flips the pause flag and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
