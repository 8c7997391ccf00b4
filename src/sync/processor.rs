//! Idempotent upsert of provider records.
//!
//! The processor maps one upstream transaction record onto exactly one local
//! row, keyed by `(account_id, provider_transaction_id)`. Re-seeing the same
//! record across pages, retries, or repeated runs updates the row in place
//! and never duplicates it.

use crate::domain::{Account, BankTransaction, Direction, TransactionId};
use crate::provider::ProviderTransaction;
use crate::store::{StoreError, TransactionRepository};
use crate::sync::SyncError;
use crate::sync::normalize;
use chrono::Utc;
use std::sync::Arc;

/// Result of applying one provider record: the canonical id and whether the
/// row was created, both required by the event emission step.
#[derive(Debug)]
pub struct Upserted {
    pub transaction_id: TransactionId,
    pub inserted: bool,
    pub transaction: BankTransaction,
}

/// Service applying provider records to the transaction store.
pub struct TransactionProcessor {
    transactions: Arc<dyn TransactionRepository>,
}

impl TransactionProcessor {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    /// Insert or update the row for one provider record.
    ///
    /// Synced fields (amount, currency, direction, dates, raw payload, raw
    /// description) are refreshed on every sight. `description_display` is
    /// written once at creation and left alone afterwards, so user edits
    /// survive re-syncs.
    pub async fn upsert(
        &self,
        account: &Account,
        record: &ProviderTransaction,
    ) -> Result<Upserted, SyncError> {
        let existing = self
            .transactions
            .find_by_provider_id(account.id, &record.provider_transaction_id)
            .await?;
        let inserted = existing.is_none();

        let amount = normalize::parse_amount(&record.amount)?;
        let booking_date = normalize::parse_date(&record.booking_date)?;
        let value_date = normalize::parse_date(&record.value_date)?;
        let description_raw = normalize::empty_to_none(&record.description);
        let direction = Direction::from_code(&record.direction);
        let now = Utc::now();

        let entity = match existing {
            Some(mut tx) => {
                tx.amount = amount;
                tx.currency = record.currency.clone();
                tx.direction = direction;
                tx.booking_date = booking_date;
                tx.value_date = value_date;
                tx.description_raw = description_raw;
                tx.raw_payload = record.raw_json.clone();
                tx.updated_at = now;
                tx
            }
            None => BankTransaction {
                id: None,
                user_id: account.user_id.clone(),
                account_id: account.id,
                provider_transaction_id: record.provider_transaction_id.clone(),
                amount,
                currency: record.currency.clone(),
                direction,
                booking_date,
                value_date,
                description_raw: description_raw.clone(),
                description_display: description_raw,
                raw_payload: record.raw_json.clone(),
                created_at: now,
                updated_at: now,
            },
        };

        let saved = self.transactions.save(entity).await?;
        let transaction_id = saved.id.ok_or_else(|| {
            StoreError::Backend("store returned a transaction without an id".to_string())
        })?;

        Ok(Upserted {
            transaction_id,
            inserted,
            transaction: saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountStatus;
    use crate::store::InMemoryTransactionStore;
    use rust_decimal::Decimal;

    fn account() -> Account {
        Account {
            id: 1,
            user_id: "user-1".to_string(),
            provider_account_id: "acc-1".to_string(),
            iban: None,
            status: AccountStatus::Active,
            continuation_key: None,
            created_at: Utc::now(),
        }
    }

    fn record(provider_id: &str, amount: &str, description: &str) -> ProviderTransaction {
        ProviderTransaction {
            provider_transaction_id: provider_id.to_string(),
            amount: amount.to_string(),
            currency: "EUR".to_string(),
            direction: "DEBIT".to_string(),
            booking_date: "2024-01-10".to_string(),
            value_date: "".to_string(),
            description: description.to_string(),
            raw_json: "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_defaults_display_description_from_raw() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let processor = TransactionProcessor::new(store.clone());

        let result = processor
            .upsert(&account(), &record("tx-1", "10.50", "COFFEE"))
            .await
            .unwrap();

        assert!(result.inserted);
        assert_eq!(result.transaction.amount, Decimal::new(1050, 2));
        assert_eq!(result.transaction.description_raw.as_deref(), Some("COFFEE"));
        assert_eq!(
            result.transaction.description_display.as_deref(),
            Some("COFFEE")
        );
        assert_eq!(result.transaction.value_date, None);
    }

    #[tokio::test]
    async fn update_refreshes_synced_fields_but_not_display_description() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let processor = TransactionProcessor::new(store.clone());

        let first = processor
            .upsert(&account(), &record("tx-1", "10.50", "COFFEE"))
            .await
            .unwrap();

        // Simulate a manual edit by the user between syncs.
        let mut edited = first.transaction.clone();
        edited.description_display = Some("Morning coffee".to_string());
        store.save(edited).await.unwrap();

        let second = processor
            .upsert(&account(), &record("tx-1", "12.00", "COFFEE SHOP 42"))
            .await
            .unwrap();

        assert!(!second.inserted);
        assert_eq!(second.transaction_id, first.transaction_id);
        assert_eq!(second.transaction.amount, Decimal::new(1200, 2));
        assert_eq!(
            second.transaction.description_raw.as_deref(),
            Some("COFFEE SHOP 42")
        );
        assert_eq!(
            second.transaction.description_display.as_deref(),
            Some("Morning coffee")
        );
    }

    #[tokio::test]
    async fn blank_amount_normalizes_to_zero() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let processor = TransactionProcessor::new(store);

        let result = processor
            .upsert(&account(), &record("tx-1", "", "PENDING CARD HOLD"))
            .await
            .unwrap();
        assert_eq!(result.transaction.amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn undecodable_amount_fails_the_record() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let processor = TransactionProcessor::new(store.clone());

        let result = processor
            .upsert(&account(), &record("tx-1", "NaN euros", "BAD"))
            .await;
        assert!(matches!(result, Err(SyncError::Malformed(_))));
        assert!(store.transactions_for(1).is_empty());
    }
}
