//! Owned registry of deferred effects, polled once per tick.
use smallvec::SmallVec;

/// Handle returned by [`TimerRegistry::schedule`] for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    handle: TimerHandle,
    due_at: u64,
    event: E,
}

/// Events fire in due-time order, ties broken by scheduling order.
#[derive(Debug, Clone)]
pub struct TimerRegistry<E> {
    pending: SmallVec<[Scheduled<E>; 4]>,
    next_handle: u64,
}

impl<E> Default for TimerRegistry<E> {
    fn default() -> Self {
        Self {
            pending: SmallVec::new(),
            next_handle: 0,
        }
    }
}

impl<E> TimerRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_at: u64, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending.push(Scheduled {
            handle,
            due_at,
            event,
        });
        handle
    }

    /// Returns `false` when the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        before != self.pending.len()
    }

    /// Remove and return every event due at or before `now`.
    pub fn drain_due(&mut self, now: u64) -> Vec<E> {
        let mut due: Vec<Scheduled<E>> = Vec::new();
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].due_at <= now {
                due.push(self.pending.remove(idx));
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|entry| (entry.due_at, entry.handle));
        due.into_iter().map(|entry| entry.event).collect()
    }

    /// Earliest pending due time.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|entry| entry.due_at).min()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
