//! A single-slot deferred task driven by the event loop's clock.
//!
//! Scheduling replaces whatever was pending, so at most one task is ever
//! live. The event loop polls [`Deferred::take_ready`] with the current time
//! in milliseconds; nothing runs on its own.

/// Identifies one scheduled task. Stale handles are ignored by `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TaskHandle,
    due_ms: u64,
    payload: T,
}

/// At most one pending payload with a due time.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    next_id: u64,
    live: Option<Scheduled<T>>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deferred<T> {
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            live: None,
        }
    }

    /// Schedule `payload` to become ready `delay_ms` after `now_ms`,
    /// cancelling any task still pending.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.live = Some(Scheduled {
            handle,
            due_ms: now_ms.saturating_add(delay_ms),
            payload,
        });
        handle
    }

    /// Cancel the task identified by `handle`. Returns false when that task
    /// already ran or was superseded.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if self.live.as_ref().is_some_and(|task| task.handle == handle) {
            self.live = None;
            true
        } else {
            false
        }
    }

    /// Drop the pending task, if any.
    pub fn clear(&mut self) {
        self.live = None;
    }

    /// Take the payload once its due time has passed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        if self.live.as_ref()?.due_ms > now_ms {
            return None;
        }
        self.live.take().map(|task| task.payload)
    }

    pub fn due_ms(&self) -> Option<u64> {
        self.live.as_ref().map(|task| task.due_ms)
    }

    pub fn pending(&self) -> Option<&T> {
        self.live.as_ref().map(|task| &task.payload)
    }

    pub const fn is_pending(&self) -> bool {
        self.live.is_some()
    }
}
