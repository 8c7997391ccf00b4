//! Core data model for the transaction synchronization service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Internal identifier of a linked bank account, owned by the account store.
pub type AccountId = i64;

/// Internal identifier of a stored transaction, owned by the transaction store.
pub type TransactionId = i64;

/// Lifecycle status of a linked account. Only active accounts are eligible
/// for the periodic sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// A bank account linked through the consent flow.
///
/// The sync engine only ever mutates `continuation_key`; creation and status
/// changes belong to the linking collaborator.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    /// Owner of the account.
    pub user_id: String,
    /// Opaque upstream identifier, unique per user.
    pub provider_account_id: String,
    pub iban: Option<String>,
    pub status: AccountStatus,
    /// Pagination cursor left over from a fetch in progress. `None` when no
    /// fetch is running or all pages have been consumed.
    pub continuation_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Money flow direction of a transaction as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Debit,
    Credit,
    Unknown,
}

impl Direction {
    /// Map a provider direction code onto the canonical enum. Unrecognized
    /// or empty codes become `Unknown` rather than an error.
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("DEBIT") {
            Direction::Debit
        } else if code.eq_ignore_ascii_case("CREDIT") {
            Direction::Credit
        } else {
            Direction::Unknown
        }
    }
}

/// A synced bank transaction.
///
/// The business key is `(account_id, provider_transaction_id)`; the engine
/// upserts on that key and never deletes rows.
#[derive(Debug, Clone)]
pub struct BankTransaction {
    /// Store-assigned id; `None` until the row has been persisted once.
    pub id: Option<TransactionId>,
    pub user_id: String,
    pub account_id: AccountId,
    pub provider_transaction_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub direction: Direction,
    pub booking_date: Option<NaiveDate>,
    pub value_date: Option<NaiveDate>,
    /// Immutable provider text, refreshed on every sync.
    pub description_raw: Option<String>,
    /// User-editable copy. Defaulted from `description_raw` at creation and
    /// never overwritten by later syncs.
    pub description_display: Option<String>,
    /// The upstream record serialized as JSON, kept for audit and debugging.
    pub raw_payload: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes_map_case_insensitively() {
        assert_eq!(Direction::from_code("DEBIT"), Direction::Debit);
        assert_eq!(Direction::from_code("credit"), Direction::Credit);
        assert_eq!(Direction::from_code(""), Direction::Unknown);
        assert_eq!(Direction::from_code("TRANSFER"), Direction::Unknown);
    }
}
