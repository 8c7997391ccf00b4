//! Local stores for accounts and synced transactions.
//!
//! Repository traits abstract the persistence technology away from the sync
//! engine: the orchestrator and processor only see these interfaces, so unit
//! tests run against the in-memory implementations and a database-backed
//! store slots in without touching the engine.

pub mod memory;

pub use memory::{InMemoryAccountStore, InMemoryTransactionStore};

use crate::domain::{Account, AccountId, BankTransaction};
use chrono::NaiveDate;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Repository for linked accounts.
///
/// The sync engine reads accounts and advances their pagination cursor; it
/// never creates or deletes them.
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    /// All accounts eligible for the periodic sweep (status = active).
    async fn find_active(&self) -> Result<Vec<Account>, StoreError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Persist the pagination cursor for an account. `None` marks the fetch
    /// as complete.
    async fn save_continuation_key(
        &self,
        id: AccountId,
        continuation_key: Option<&str>,
    ) -> Result<(), StoreError>;
}

/// Repository for synced transactions, keyed for idempotent upsert on
/// `(account_id, provider_transaction_id)`.
#[async_trait::async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Latest booking date stored for an account, used to compute the next
    /// sync window.
    async fn latest_booking_date(
        &self,
        account_id: AccountId,
    ) -> Result<Option<NaiveDate>, StoreError>;

    async fn find_by_provider_id(
        &self,
        account_id: AccountId,
        provider_transaction_id: &str,
    ) -> Result<Option<BankTransaction>, StoreError>;

    /// Insert or update a transaction row. Assigns an id when the entity has
    /// none and returns the stored row.
    async fn save(&self, transaction: BankTransaction) -> Result<BankTransaction, StoreError>;
}
