//! Virtual-time scheduler for deferred, cancellable work.
//!
//! Nothing here sleeps. The scheduler only records *when* a payload becomes
//! due; the owner advances the clock and pops due payloads in order. Ties
//! fire in scheduling order.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Queue of payloads keyed by virtual due time.
///
/// ```
/// use creature_match::schedule::Scheduler;
/// use std::time::Duration;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule(Duration::from_millis(1500), "hide");
/// let early = scheduler.schedule(Duration::from_millis(1000), "reveal");
///
/// assert_eq!(scheduler.pop_due(Duration::from_millis(999)), None);
/// assert_eq!(scheduler.pop_due(Duration::from_secs(2)), Some((early, "reveal")));
/// assert_eq!(scheduler.now(), Duration::from_millis(1000));
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), T>,
    due_by_id: FxHashMap<u64, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: FxHashMap::default(),
        }
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedule `payload` to become due `delay` from now.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now + delay;
        self.queue.insert((due, id), payload);
        self.due_by_id.insert(id, due);
        TimerId(id)
    }

    /// Cancel one payload. Returns it if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let due = self.due_by_id.remove(&id.0)?;
        self.queue.remove(&(due, id.0))
    }

    /// Cancel every pending payload matching `predicate`. Returns how many.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let doomed: Vec<(Duration, u64)> = self
            .queue
            .iter()
            .filter(|(_, payload)| predicate(payload))
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.queue.remove(key);
            self.due_by_id.remove(&key.1);
        }
        doomed.len()
    }

    /// Cancel everything. Returns how many payloads were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        self.due_by_id.clear();
        dropped
    }

    /// Whether any pending payload matches `predicate`.
    pub fn any_pending(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.queue.values().any(|payload| predicate(payload))
    }

    /// Due time of the earliest pending payload.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest payload due at or before `until`, moving the clock
    /// forward to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let payload = self.queue.remove(&(due, id))?;
        self.due_by_id.remove(&id);
        self.now = self.now.max(due);
        Some((TimerId(id), payload))
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_clock_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}
