//! Success/failure notices that dismiss themselves after a fixed delay.

use crate::domain::model::NoticeKind;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(1000);

#[derive(Default)]
struct NoticeState {
    current: Option<NoticeKind>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl NoticeState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for NoticeState {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Holds at most one visible notice. Showing a new notice replaces the old one
/// and restarts the countdown; `reset` clears it immediately.
#[derive(Clone)]
pub struct NoticeBoard {
    state: Arc<Mutex<NoticeState>>,
    dismiss_after: Duration,
}

impl NoticeBoard {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NoticeState::default())),
            dismiss_after,
        }
    }

    fn lock(state: &Mutex<NoticeState>) -> MutexGuard<'_, NoticeState> {
        state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, kind: NoticeKind) {
        let mut state = Self::lock(&self.state);
        state.cancel_timer();
        state.generation += 1;
        state.current = Some(kind);

        let generation = state.generation;
        let weak: Weak<Mutex<NoticeState>> = Arc::downgrade(&self.state);
        let delay = self.dismiss_after;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                let mut state = Self::lock(&shared);
                if state.generation == generation {
                    tracing::debug!("Dismissing {:?} notice", state.current);
                    state.current = None;
                    state.timer = None;
                }
            }
        }));
    }

    pub fn reset(&self) {
        let mut state = Self::lock(&self.state);
        state.cancel_timer();
        state.generation += 1;
        state.current = None;
    }

    pub fn current(&self) -> Option<NoticeKind> {
        Self::lock(&self.state).current
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl std::fmt::Debug for NoticeBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeBoard")
            .field("current", &self.current())
            .field("dismiss_after", &self.dismiss_after)
            .finish()
    }
}
