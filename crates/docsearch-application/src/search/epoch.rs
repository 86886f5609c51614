//! Request epoch tracking.
//!
//! Every scope has a monotonically increasing counter and at most one live
//! cancellation handle. The counter is the authoritative staleness oracle:
//! a response may only touch the session store if the epoch it was started
//! under is still the scope's current one, whether or not the transport
//! honoured the cancellation.

use docsearch_core::Scope;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// Handle returned by [`EpochTracker::begin`] for one request.
#[derive(Debug, Clone)]
pub struct EpochTicket {
    pub epoch: u64,
    /// Cancelled when the scope is cancelled, restarted or discarded
    pub token: CancellationToken,
}

#[derive(Debug)]
struct EpochRecord {
    counter: u64,
    handle: Option<CancellationToken>,
}

impl EpochRecord {
    fn revoke(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<Scope, EpochRecord>,
    /// Highest counter of any discarded record. Recreated scopes resume
    /// above it so an old response can never match a new epoch.
    retired_floor: u64,
}

impl Inner {
    fn record(&mut self, scope: &Scope) -> &mut EpochRecord {
        let floor = self.retired_floor;
        self.records
            .entry(scope.clone())
            .or_insert_with(|| EpochRecord {
                counter: floor,
                handle: None,
            })
    }
}

/// Per-scope epoch counters and cancellation handles.
///
/// All methods are synchronous: the increment and the comparison are never
/// separated by an await point.
#[derive(Debug, Default)]
pub struct EpochTracker {
    inner: Mutex<Inner>,
}

impl EpochTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new request for `scope`.
    ///
    /// Revokes the previous handle (if any), allocates a fresh one and
    /// returns it with the incremented epoch.
    pub fn begin(&self, scope: &Scope) -> EpochTicket {
        let mut inner = self.lock();
        let record = inner.record(scope);
        record.revoke();

        let token = CancellationToken::new();
        record.handle = Some(token.clone());
        record.counter += 1;

        tracing::debug!("[EpochTracker] begin {} -> epoch {}", scope, record.counter);
        EpochTicket {
            epoch: record.counter,
            token,
        }
    }

    /// True iff `epoch` is the current epoch of `scope`.
    pub fn is_current(&self, scope: &Scope, epoch: u64) -> bool {
        self.lock()
            .records
            .get(scope)
            .is_some_and(|record| record.counter == epoch)
    }

    /// Current epoch of `scope`, if it has a record.
    pub fn current(&self, scope: &Scope) -> Option<u64> {
        self.lock().records.get(scope).map(|record| record.counter)
    }

    /// Revokes the live handle and advances the epoch, making any
    /// outstanding response for `scope` permanently stale.
    ///
    /// Safe to call with nothing in flight.
    pub fn cancel(&self, scope: &Scope) {
        let mut inner = self.lock();
        let record = inner.record(scope);
        record.revoke();
        record.counter += 1;
        tracing::debug!("[EpochTracker] cancel {} -> epoch {}", scope, record.counter);
    }

    /// Cancels `scope` and forgets its record entirely.
    pub fn discard(&self, scope: &Scope) {
        let mut inner = self.lock();
        if let Some(mut record) = inner.records.remove(scope) {
            record.revoke();
            inner.retired_floor = inner.retired_floor.max(record.counter + 1);
            tracing::debug!("[EpochTracker] discard {}", scope);
        }
    }

    /// Number of scopes with a live record.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
