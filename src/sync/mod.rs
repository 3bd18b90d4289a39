//! Scroll synchronization between the source and preview panes.
//!
//! [`ScrollSync`] is the per-session state machine:
//!
//! - `Idle`: no pane has been entered yet (or after [`ScrollSync::reset`]).
//! - `Tracking(pane)`: the pointer is over `pane`; only its scrolls count.
//! - `Pending`: a user scroll was captured and is waiting out the debounce
//!   delay. Further scrolls from the same pane restart the delay.
//!
//! When the delay expires the event loop takes the [`PendingSync`] and
//! resolves it against both panes' text with [`matcher`]. The resulting
//! offset is written straight into the other pane; that write never comes
//! back through [`ScrollSync::on_scroll`], and even if it did, the receiving
//! pane is not the active one so it would be ignored.

pub mod debounce;
pub mod matcher;

use std::time::Duration;

use tracing::{debug, trace};

pub use debounce::{Deferred, TaskHandle};
pub use matcher::{
    Alignment, MatchResult, PaneContent, Paragraph, find_matching_position, match_position,
    similarity,
};

/// Debounce delay between the last user scroll and the sync.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

/// One of the two synchronized panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Source,
    Preview,
}

impl Pane {
    /// The sibling pane.
    pub const fn other(self) -> Self {
        match self {
            Self::Source => Self::Preview,
            Self::Preview => Self::Source,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Preview => "preview",
        }
    }
}

/// A user scroll waiting for the debounce delay to pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSync {
    pub origin: Pane,
    pub scroll_top: f64,
    pub captured_at_ms: u64,
}

impl PendingSync {
    /// Compute where the other pane should scroll to.
    pub fn resolve(&self, origin: &PaneContent<'_>, target: &PaneContent<'_>) -> SyncTarget {
        let result = match_position(origin, target, self.scroll_top);
        SyncTarget {
            pane: self.origin.other(),
            offset: result.offset,
            alignment: result.alignment,
        }
    }
}

/// Where to put the receiving pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTarget {
    pub pane: Pane,
    pub offset: f64,
    pub alignment: Alignment,
}

/// Observable state of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncState {
    Idle,
    Tracking(Pane),
    Pending {
        origin: Pane,
        scroll_top: f64,
        deadline_ms: u64,
    },
}

/// Debounced, direction-gated scroll synchronizer for one pane pair.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    delay_ms: u64,
    enabled: bool,
    active: Option<Pane>,
    timer: Deferred<PendingSync>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl ScrollSync {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            enabled: true,
            active: None,
            timer: Deferred::new(),
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The pane the pointer last entered.
    pub const fn active(&self) -> Option<Pane> {
        self.active
    }

    pub fn state(&self) -> SyncState {
        match (self.timer.pending(), self.timer.due_ms(), self.active) {
            (Some(pending), Some(deadline_ms), _) => SyncState::Pending {
                origin: pending.origin,
                scroll_top: pending.scroll_top,
                deadline_ms,
            },
            (_, _, Some(pane)) => SyncState::Tracking(pane),
            _ => SyncState::Idle,
        }
    }

    /// Record that the pointer entered `pane`. A sync already pending from
    /// the other pane still fires.
    pub fn pointer_enter(&mut self, pane: Pane) {
        if self.active != Some(pane) {
            debug!(pane = pane.label(), "pointer entered pane");
        }
        self.active = Some(pane);
    }

    /// Handle a scroll of `pane` to `scroll_top`.
    ///
    /// Returns true when the scroll was taken as user input and (re)started
    /// the debounce timer. Scrolls from the inactive pane are side effects
    /// of an earlier sync and are dropped.
    pub fn on_scroll(&mut self, pane: Pane, scroll_top: f64, now_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }
        if self.active != Some(pane) {
            trace!(pane = pane.label(), scroll_top, "ignoring scroll from inactive pane");
            return false;
        }
        let pending = PendingSync {
            origin: pane,
            scroll_top,
            captured_at_ms: now_ms,
        };
        self.timer.schedule(now_ms, self.delay_ms, pending);
        trace!(pane = pane.label(), scroll_top, now_ms, "sync scheduled");
        true
    }

    /// Take the pending sync once its delay has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<PendingSync> {
        let pending = self.timer.take_ready(now_ms)?;
        debug!(
            origin = pending.origin.label(),
            scroll_top = pending.scroll_top,
            waited_ms = now_ms.saturating_sub(pending.captured_at_ms),
            "sync ready"
        );
        Some(pending)
    }

    /// When the pending sync becomes ready, if one exists.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timer.due_ms()
    }

    pub const fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Cancel any pending sync and forget the active pane.
    pub fn reset(&mut self) {
        self.timer.clear();
        self.active = None;
    }

    /// Turn syncing on or off. Turning it off also resets.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.reset();
        }
        self.enabled = enabled;
        debug!(enabled, "scroll sync toggled");
    }

    /// Tear down for the end of a session: nothing pending, nothing accepted.
    pub fn dispose(&mut self) {
        self.reset();
        self.enabled = false;
    }
}
