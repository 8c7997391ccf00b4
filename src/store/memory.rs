//! In-memory store implementations.
//!
//! These back the engine in tests and in deployments where the durable
//! store is provided by an external process; the repository traits are the
//! seam a database-backed implementation plugs into.

use super::{AccountRepository, StoreError, TransactionRepository};
use crate::domain::{Account, AccountId, AccountStatus, BankTransaction};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of `AccountRepository`.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. This is the linking collaborator's write path;
    /// the sync engine itself never creates accounts.
    pub fn insert(&self, account: Account) {
        self.accounts.lock().unwrap().insert(account.id, account);
    }
}

#[async_trait::async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn find_active(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        let mut active: Vec<Account> = accounts
            .values()
            .filter(|a| a.status == AccountStatus::Active)
            .cloned()
            .collect();
        // Deterministic sweep order regardless of map iteration order.
        active.sort_by_key(|a| a.id);
        Ok(active)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn save_continuation_key(
        &self,
        id: AccountId,
        continuation_key: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("unknown account id {}", id)))?;
        account.continuation_key = continuation_key.map(|k| k.to_string());
        Ok(())
    }
}

/// In-memory implementation of `TransactionRepository`.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    inner: Mutex<TransactionStoreInner>,
}

#[derive(Default)]
struct TransactionStoreInner {
    rows: HashMap<(AccountId, String), BankTransaction>,
    next_id: i64,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows stored for an account.
    pub fn transactions_for(&self, account_id: AccountId) -> Vec<BankTransaction> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<BankTransaction> = inner
            .rows
            .values()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.id);
        rows
    }
}

#[async_trait::async_trait]
impl TransactionRepository for InMemoryTransactionStore {
    async fn latest_booking_date(
        &self,
        account_id: AccountId,
    ) -> Result<Option<NaiveDate>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .values()
            .filter(|t| t.account_id == account_id)
            .filter_map(|t| t.booking_date)
            .max())
    }

    async fn find_by_provider_id(
        &self,
        account_id: AccountId,
        provider_transaction_id: &str,
    ) -> Result<Option<BankTransaction>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .get(&(account_id, provider_transaction_id.to_string()))
            .cloned())
    }

    async fn save(&self, mut transaction: BankTransaction) -> Result<BankTransaction, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if transaction.id.is_none() {
            inner.next_id += 1;
            transaction.id = Some(inner.next_id);
        }
        let key = (
            transaction.account_id,
            transaction.provider_transaction_id.clone(),
        );
        inner.rows.insert(key, transaction.clone());
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn transaction(account_id: AccountId, provider_id: &str, booking: &str) -> BankTransaction {
        BankTransaction {
            id: None,
            user_id: "user-1".to_string(),
            account_id,
            provider_transaction_id: provider_id.to_string(),
            amount: Decimal::new(1050, 2),
            currency: "EUR".to_string(),
            direction: Direction::Debit,
            booking_date: booking.parse().ok(),
            value_date: None,
            description_raw: Some("desc".to_string()),
            description_display: Some("desc".to_string()),
            raw_payload: "{}".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_assigns_ids_and_upserts_on_business_key() {
        let store = InMemoryTransactionStore::new();

        let first = store.save(transaction(1, "tx-1", "2024-01-05")).await.unwrap();
        assert_eq!(first.id, Some(1));

        // Saving the same business key again replaces the row.
        let mut again = transaction(1, "tx-1", "2024-01-05");
        again.id = first.id;
        again.amount = Decimal::new(2000, 2);
        store.save(again).await.unwrap();

        assert_eq!(store.transactions_for(1).len(), 1);
        assert_eq!(store.transactions_for(1)[0].amount, Decimal::new(2000, 2));
    }

    #[tokio::test]
    async fn latest_booking_date_ignores_other_accounts_and_undated_rows() {
        let store = InMemoryTransactionStore::new();
        store.save(transaction(1, "tx-1", "2024-01-05")).await.unwrap();
        store.save(transaction(1, "tx-2", "2024-01-10")).await.unwrap();
        store.save(transaction(1, "tx-3", "")).await.unwrap();
        store.save(transaction(2, "tx-4", "2024-02-01")).await.unwrap();

        let latest = store.latest_booking_date(1).await.unwrap();
        assert_eq!(latest, "2024-01-10".parse().ok());
        assert_eq!(store.latest_booking_date(3).await.unwrap(), None);
    }
}
