//! Sync orchestrator and integration point for all sync services.
//!
//! This module defines the `SyncOrchestrator`, which coordinates all
//! components involved in synchronizing account transactions from the
//! upstream provider. It selects the accounts due for sync, computes the
//! fetch window, drives the pagination loop, invokes the idempotent upsert
//! processor, advances the persisted cursor, and emits change events.
//!
//! The orchestrator is responsible for:
//! - Fanning the periodic sweep out across all active accounts with bounded
//!   concurrency, isolating per-account failures
//! - Running one account's windowed pagination loop strictly sequentially,
//!   because each page's cursor depends on the previous response
//! - Serializing concurrent runs for the same account through the lock
//!   registry, so an on-demand sync cannot corrupt the cursor mid-sweep
//! - Emitting one change event per upsert without coupling event delivery to
//!   store durability
//!
//! The orchestrator holds no global state; every collaborator arrives
//! through a trait object, so tests instantiate it with in-memory doubles.

use crate::domain::{Account, AccountId};
use crate::provider::ProviderGateway;
use crate::store::{AccountRepository, TransactionRepository};
use crate::sync::SyncError;
use crate::sync::events::{EventPublisher, TransactionUpserted};
use crate::sync::locks::AccountLockRegistry;
use crate::sync::processor::TransactionProcessor;
use crate::sync::progress::SyncRunStats;
use crate::sync::window::SyncWindow;

use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};

/// Main sync orchestrator that coordinates all sync components.
pub struct SyncOrchestrator {
    accounts: Arc<dyn AccountRepository>,
    transactions: Arc<dyn TransactionRepository>,
    gateway: Arc<dyn ProviderGateway>,
    publisher: Arc<dyn EventPublisher>,

    // Services
    processor: TransactionProcessor,
    locks: AccountLockRegistry,

    // Configuration
    lookback_days: i64,
    max_concurrent_accounts: usize,
}

impl SyncOrchestrator {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        transactions: Arc<dyn TransactionRepository>,
        gateway: Arc<dyn ProviderGateway>,
        publisher: Arc<dyn EventPublisher>,
        lookback_days: i64,
        max_concurrent_accounts: usize,
    ) -> Self {
        let processor = TransactionProcessor::new(transactions.clone());
        Self {
            accounts,
            transactions,
            gateway,
            publisher,
            processor,
            locks: AccountLockRegistry::new(),
            lookback_days,
            max_concurrent_accounts,
        }
    }

    /// Synchronize every active account.
    ///
    /// This is the body of the periodic trigger. Failures are caught and
    /// logged per account; one broken account never aborts the sweep, and
    /// nothing is returned to the caller.
    pub async fn sync_all(&self) {
        info!("Starting transaction sync for all accounts");

        let accounts = match self.accounts.find_active().await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!("Failed to load eligible accounts: {}", e);
                return;
            }
        };
        info!("Found {} active accounts to sync", accounts.len());

        let failures = AtomicUsize::new(0);
        futures::stream::iter(accounts)
            .for_each_concurrent(self.max_concurrent_accounts, |account| {
                let failures = &failures;
                async move {
                    if let Err(e) = self.sync_one(&account).await {
                        failures.fetch_add(1, Ordering::Relaxed);
                        error!(
                            "Error syncing account id={} provider_account_id={}: {}",
                            account.id, account.provider_account_id, e
                        );
                    }
                }
            })
            .await;

        let failed = failures.load(Ordering::Relaxed);
        if failed > 0 {
            warn!("Transaction sync finished with {} failed accounts", failed);
        } else {
            info!("Transaction sync finished");
        }
    }

    /// Synchronize a single account by id, for the on-demand trigger.
    ///
    /// Counts are reported through logging only; callers get success or the
    /// failure that aborted the run.
    pub async fn sync_account(&self, account_id: AccountId) -> Result<(), SyncError> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(SyncError::AccountNotFound(account_id))?;
        self.sync_one(&account).await
    }

    async fn sync_one(&self, account: &Account) -> Result<(), SyncError> {
        // Held for the whole run: concurrent runs for one account must not
        // race on the cursor or double-apply a page.
        let _guard = self.locks.acquire(account.id).await;

        let today = Utc::now().date_naive();
        let latest = self.transactions.latest_booking_date(account.id).await?;
        let window = SyncWindow::compute(latest, today, self.lookback_days);

        info!(
            "Syncing account id={} provider_account_id={} from {} to {}",
            account.id, account.provider_account_id, window.from, window.to
        );

        let mut stats = SyncRunStats::new();
        // Pagination restarts inside the freshly computed window; the
        // persisted continuation key is not read back as a starting cursor.
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .gateway
                .fetch_page(
                    &account.provider_account_id,
                    Some(window.from),
                    Some(window.to),
                    cursor.as_deref(),
                )
                .await?;

            debug!(
                "Got {} transactions from provider for account {} (page {})",
                page.transactions.len(),
                account.provider_account_id,
                stats.pages + 1
            );
            stats.record_page(page.transactions.len());

            for record in &page.transactions {
                let upserted = self.processor.upsert(account, record).await?;
                stats.record_upsert(upserted.inserted);

                let event = TransactionUpserted::from_transaction(
                    upserted.transaction_id,
                    &upserted.transaction,
                );
                if let Err(e) = self.publisher.publish(&event).await {
                    // The store is the system of record; a lost event is a
                    // missed downstream notification, not a failed upsert.
                    warn!(
                        "Failed to publish upsert event for transaction {}: {}",
                        upserted.transaction_id, e
                    );
                    stats.record_publish_failure();
                }
            }

            let next = normalize_continuation_key(page.continuation_key);
            self.accounts
                .save_continuation_key(account.id, next.as_deref())
                .await?;

            cursor = next;
            if cursor.is_none() {
                break;
            }
        }

        info!(
            "Account {} fully synced: {}",
            account.provider_account_id,
            stats.summary()
        );
        Ok(())
    }
}

/// Blank continuation keys from the wire mean the final page.
fn normalize_continuation_key(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.trim().is_empty())
}
