use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use takt_model::{Counters, RunState};

/// Shared line state: the coordination substrate every task operates on.
///
/// Cheap to clone; all clones observe the same underlying state. Mutation
/// goes through the accessors here, so no component ever holds an
/// unsynchronized copy.
#[derive(Clone, Default)]
pub struct LineState {
    inner: Arc<StateInner>,
}

#[derive(Default)]
struct StateInner {
    /// Run flag. The actuation driver and telemetry generator read it; the
    /// command server and remote poller write it (last write wins).
    running: AtomicBool,
    /// Held while a counter reset is in progress. Publishers observe and
    /// skip their tick; they never wait on it.
    resetting: AtomicBool,
    /// Greatest remote power-record id applied so far.
    last_applied: AtomicU64,
    /// Increment and reset both go through this lock, so neither can
    /// interleave with the other.
    counters: Mutex<Counters>,
}

/// Outcome of applying a remote power record to the run flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteApply {
    /// Record id not newer than the last applied one; nothing changed.
    Stale,
    /// Id advanced but the run flag already matched the record.
    Unchanged,
    /// Run flag flipped to the record's status.
    Transitioned(RunState),
}

impl LineState {
    /// Fresh state: stopped, gate free, counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub fn run_state(&self) -> RunState {
        RunState::from_flag(self.is_running())
    }

    /// Set the run flag; returns the previous value.
    pub fn set_running(&self, running: bool) -> bool {
        self.inner.running.swap(running, Ordering::SeqCst)
    }

    /// Snapshot of both production counters, taken under one lock
    /// acquisition so a reset can never be observed half-applied.
    pub fn counters(&self) -> Counters {
        *self.inner.counters.lock().unwrap()
    }

    /// Record one produced item and return the updated snapshot.
    pub fn record_event(&self, bad: bool) -> Counters {
        let mut counters = self.inner.counters.lock().unwrap();
        counters.record(bad);
        *counters
    }

    /// Zero both counters together.
    pub fn reset_counters(&self) {
        self.inner.counters.lock().unwrap().reset();
    }

    /// Whether telemetry publication may proceed this tick.
    pub fn publish_allowed(&self) -> bool {
        !self.inner.resetting.load(Ordering::SeqCst)
    }

    /// Hold the reset gate for the lifetime of the returned guard. The gate
    /// is released when the guard drops, on every exit path.
    pub fn begin_reset(&self) -> ResetGuard {
        self.inner.resetting.store(true, Ordering::SeqCst);
        ResetGuard {
            state: self.clone(),
        }
    }

    /// Greatest remote record id applied so far.
    pub fn last_applied(&self) -> u64 {
        self.inner.last_applied.load(Ordering::SeqCst)
    }

    /// Reconcile the run flag with a remote power record.
    ///
    /// Only a record with an id strictly greater than anything applied so
    /// far takes effect; re-observing the same or an older id is a no-op, so
    /// a late or duplicated response can never revert a newer state.
    pub fn apply_remote(&self, id: u64, status: bool) -> RemoteApply {
        if id <= self.last_applied() {
            return RemoteApply::Stale;
        }
        self.inner.last_applied.store(id, Ordering::SeqCst);

        let was_running = self.set_running(status);
        if was_running == status {
            RemoteApply::Unchanged
        } else {
            RemoteApply::Transitioned(RunState::from_flag(status))
        }
    }
}

/// Marks a counter reset in progress; dropping releases the gate.
pub struct ResetGuard {
    state: LineState,
}

impl Drop for ResetGuard {
    fn drop(&mut self) {
        self.state.inner.resetting.store(false, Ordering::SeqCst);
    }
}
