//! Per-account mutual exclusion.
//!
//! Two concurrent runs for the same account must not race on the pagination
//! cursor or double-apply a page, so every run executes under an async lock
//! keyed by account id. The guard is held for the duration of the run; an
//! on-demand sync issued while the periodic sweep is mid-flight for the same
//! account simply waits its turn. Different accounts are unaffected.

use crate::domain::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// Registry of per-account run locks.
#[derive(Default)]
pub struct AccountLockRegistry {
    locks: Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>,
}

impl AccountLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for an account, waiting while another run holds it.
    pub async fn acquire(&self, account_id: AccountId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry(account_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
