//! Virtual-clock timer queue: timeouts and animation frames.
//!
//! Time is a millisecond counter that only moves when the page is advanced,
//! which keeps timer-driven behavior deterministic under test. The async
//! [`driver`](super::driver) maps it onto real time.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use super::page::Page;

/// Milliseconds between animation frames.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// A deferred callback.
pub type Callback = Box<dyn FnOnce(&mut Page)>;

/// Timer handle. Monotonic per scheduler and never reused, so a stale handle
/// can only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Pending timers ordered by due time, then creation order.
#[derive(Default)]
pub struct Scheduler {
    now: u64,
    next_id: u64,
    queue: BTreeSet<(u64, TimerId)>,
    callbacks: HashMap<TimerId, (u64, Callback)>,
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `callback` after `delay_ms`.
    pub fn set_timeout(&mut self, delay_ms: u64, callback: Callback) -> TimerId {
        let due = self.now.saturating_add(delay_ms);
        self.schedule(due, callback)
    }

    /// Run `callback` at the next frame boundary.
    pub fn request_animation_frame(&mut self, callback: Callback) -> TimerId {
        let due = (self.now / FRAME_INTERVAL_MS + 1) * FRAME_INTERVAL_MS;
        self.schedule(due, callback)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// canceled.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.callbacks.remove(&id) {
            Some((due, _)) => {
                self.queue.remove(&(due, id));
                true
            }
            None => false,
        }
    }

    /// Whether the timer is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.callbacks.contains_key(&id)
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first().map(|&(due, _)| due)
    }

    /// Number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Remove the earliest timer due at or before `until`, moving the clock
    /// to its due time.
    pub(crate) fn pop_due(&mut self, until: u64) -> Option<(TimerId, Callback)> {
        let &(due, id) = self.queue.first()?;
        if due > until {
            return None;
        }
        self.queue.remove(&(due, id));
        let (_, callback) = self.callbacks.remove(&id)?;
        self.now = self.now.max(due);
        Some((id, callback))
    }

    /// Move the clock forward. Never moves it backwards.
    pub(crate) fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    fn schedule(&mut self, due: u64, callback: Callback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((due, id));
        self.callbacks.insert(id, (due, callback));
        id
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.callbacks.len())
            .finish()
    }
}
