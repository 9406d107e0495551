//! Cooperative task handles.
//!
//! Background work (long-press timers, animations, periodic refresh) runs as
//! local tasks on the engine's single-threaded scheduler. Each task is
//! registered against a screen; [`TaskHandle`] is the cancellation side.

use tokio::task::AbortHandle;

/// Handle to a registered cooperative task.
///
/// Cancelling is idempotent and safe on a task that already finished. A
/// cancelled task never runs past its current suspension point.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    abort: AbortHandle,
}

impl TaskHandle {
    pub(crate) fn new(abort: AbortHandle) -> Self {
        Self { abort }
    }

    /// Cancel the task.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task ran to completion or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// A task registered with a screen.
#[derive(Debug)]
pub(crate) struct ScreenTask {
    pub handle: TaskHandle,
    /// Cancel when the owning screen is replaced.
    pub cancel_on_change: bool,
}
