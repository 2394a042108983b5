use crate::cost::Cost;
use std::sync::Mutex;

/// A single observed edge-cost change: the directed edge `u -> v` moved
/// from `old_cost` to `new_cost`.
#[derive(Debug, Clone, Copy)]
pub struct ChangeRecord<V> {
    pub u: V,
    pub v: V,
    pub old_cost: Cost,
    pub new_cost: Cost,
}

/// An append-only, thread-safe bag of edge-cost changes, drained atomically
/// at the top of each plan cycle.
///
/// Mirrors the drain-atomicity idiom this codebase's trail/cursor types use
/// for "consume everything accumulated since I last looked": a mutex around
/// a `Vec`, with `take` handing over the whole buffer via `mem::take` and
/// leaving an empty one behind.
#[derive(Debug)]
pub struct ChangeLog<V> {
    pending: Mutex<Vec<ChangeRecord<V>>>,
}

impl<V> Default for ChangeLog<V> {
    fn default() -> Self {
        ChangeLog {
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl<V> ChangeLog<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a change record. Safe to call from any thread while a plan
    /// cycle is in progress on another.
    pub fn push(&self, record: ChangeRecord<V>) {
        self.pending
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(record);
    }

    /// Atomically removes and returns every record accumulated since the
    /// last call to `drain`.
    pub fn drain(&self) -> Vec<ChangeRecord<V>> {
        let mut guard = self.pending.lock().unwrap_or_else(|poison| poison.into_inner());
        std::mem::take(&mut *guard)
    }

    pub fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .is_empty()
    }
}
