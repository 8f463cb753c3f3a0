//! Display surface seam and its liveness handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::Note;

/// Whatever shows the list to the user. It only ever reads the notes.
pub trait DisplaySurface: Send + Sync {
    /// A fetch started.
    fn loading(&self) {}

    /// The whole list was replaced.
    fn render(&self, notes: &[Note]);

    /// The element at `position` was removed; `remaining` is the new list.
    fn remove_at(&self, position: usize, remaining: &[Note]);

    /// Transient user-visible message (errors and confirmations).
    fn show_message(&self, message: &str);
}

/// Shared flag telling whether the display surface is still alive.
///
/// Cheap to clone; every clone observes the same state.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    attached: Arc<AtomicBool>,
}

impl SurfaceHandle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_detach_state() {
        let handle = SurfaceHandle::new();
        let clone = handle.clone();
        assert!(clone.is_attached());

        handle.detach();
        assert!(!clone.is_attached());
    }
}
