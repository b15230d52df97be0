//! In-memory subscription and transaction registry shared by the HTTP
//! handlers and the polling monitor.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::Transaction;

/// Thread-safe store mapping subscribed addresses to the transactions
/// observed for them, plus the last block height seen by the monitor.
///
/// Every operation takes one coarse lock for its full duration. The
/// operations are cheap map/vec mutations and contention is expected to be
/// low; per-address sharding stays a future axis, not a correctness need.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    current_block: u64,
    subscriptions: HashMap<String, Vec<Transaction>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last block height recorded by the monitor, 0 before the first poll.
    pub fn current_block(&self) -> u64 {
        self.inner.lock().expect("mutex poisoned").current_block
    }

    /// Registers an address for transaction tracking.
    ///
    /// Returns `true` and creates an empty transaction list on first
    /// subscription; returns `false` without mutating anything when the
    /// address is already subscribed. The address is opaque here; format
    /// validation, if any, belongs to the HTTP boundary.
    pub fn subscribe(&self, address: &str) -> bool {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        if inner.subscriptions.contains_key(address) {
            return false;
        }
        inner.subscriptions.insert(address.to_string(), Vec::new());
        true
    }

    /// Snapshot of the transactions observed for `address`, or `None` if the
    /// address was never subscribed. Appends happening after this call do
    /// not show up in a previously returned snapshot.
    pub fn transactions(&self, address: &str) -> Option<Vec<Transaction>> {
        let inner = self.inner.lock().expect("mutex poisoned");
        inner.subscriptions.get(address).cloned()
    }

    /// Snapshot of the currently subscribed addresses, used by the monitor
    /// for fan-out. A subscription racing this call lands in either this
    /// cycle's snapshot or the next one, never in a partial state.
    pub fn subscribed_addresses(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("mutex poisoned");
        inner.subscriptions.keys().cloned().collect()
    }

    /// Records a newly observed block height. Heights at or below the
    /// stored value leave the registry unchanged, so `current_block` stays
    /// monotonic even when handed a stale height.
    pub fn update_current_block(&self, height: u64) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        if height > inner.current_block {
            inner.current_block = height;
        }
    }

    /// Appends `tx` to the address's transaction list if the address is
    /// subscribed; silently does nothing otherwise.
    pub fn add_transaction(&self, address: &str, tx: Transaction) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        if let Some(observed) = inner.subscriptions.get_mut(address) {
            observed.push(tx);
        }
    }
}
