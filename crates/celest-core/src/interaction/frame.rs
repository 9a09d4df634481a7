//! Animation-frame coalescing.

/// Holds at most one pending per-frame update.
///
/// Scheduling replaces whatever was pending, so a stale frame can never be
/// applied after a newer one was requested.
#[derive(Debug, Clone)]
pub struct FrameSlot<T> {
    pending: Option<T>,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame carrying `payload`, cancelling any pending one.
    pub fn schedule(&mut self, payload: T) {
        if self.pending.is_some() {
            log::trace!("Replacing pending frame");
        }
        self.pending = Some(payload);
    }

    /// Drop the pending frame, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drain the pending payload when the frame fires.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
