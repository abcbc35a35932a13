//! Hand-off of per-frame detections from the worker thread to a renderer.
//!
//! One producer publishes a complete detection list per frame; one or more
//! readers draw the latest list. The list is replaced wholesale under a mutex,
//! so a reader sees either the previous frame or the new one, never a mix.

use crate::output::rescale::DetectionBox;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Published {
    generation: u64,
    boxes: Vec<DetectionBox>,
}

/// Shared slot holding the most recently published detections.
///
/// Cloning yields another handle to the same slot.
#[derive(Clone, Default)]
pub struct DetectionSlot {
    inner: Arc<Mutex<Published>>,
}

impl DetectionSlot {
    /// Creates an empty slot at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    // The list is only ever swapped whole, so a poisoned lock still guards
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, Published> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the published list and returns the new generation.
    ///
    /// The previous list is handed back so the producer can reuse its
    /// allocation for the next frame.
    pub fn publish(&self, boxes: Vec<DetectionBox>) -> (u64, Vec<DetectionBox>) {
        let mut guard = self.lock();
        guard.generation += 1;
        let previous = std::mem::replace(&mut guard.boxes, boxes);
        (guard.generation, previous)
    }

    /// Generation of the latest published list (0 before the first publish).
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Runs `f` on the latest list while holding the lock.
    pub fn with_latest<R>(&self, f: impl FnOnce(u64, &[DetectionBox]) -> R) -> R {
        let guard = self.lock();
        f(guard.generation, &guard.boxes)
    }

    /// Copies out the latest list with its generation.
    pub fn snapshot(&self) -> (u64, Vec<DetectionBox>) {
        self.with_latest(|generation, boxes| (generation, boxes.to_vec()))
    }
}
