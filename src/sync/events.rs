//! Change events for transaction upserts.
//!
//! Every insert-or-update performed by the sync engine emits one
//! `TransactionUpserted` event, keyed by the transaction's canonical id so
//! repeated updates to the same transaction are routable to the same
//! consumer partition and observed in emission order. Delivery is
//! at-least-once and best-effort: the local store is the system of record,
//! and a failed publish never rolls back the upsert.

use crate::domain::{AccountId, BankTransaction, Direction, TransactionId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

/// Logical topic for upsert notifications.
pub const TX_TOPIC: &str = "transactions.upserted";

/// Payload published for every upserted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionUpserted {
    pub transaction_id: TransactionId,
    pub user_id: String,
    pub account_id: AccountId,
    pub amount: Decimal,
    pub currency: String,
    pub direction: Direction,
    pub booking_date: Option<NaiveDate>,
    pub description_raw: Option<String>,
    pub description_display: Option<String>,
}

impl TransactionUpserted {
    /// Partition key: the canonical transaction id as text.
    pub fn key(&self) -> String {
        self.transaction_id.to_string()
    }

    /// Build the event from a stored row.
    pub fn from_transaction(transaction_id: TransactionId, tx: &BankTransaction) -> Self {
        Self {
            transaction_id,
            user_id: tx.user_id.clone(),
            account_id: tx.account_id,
            amount: tx.amount,
            currency: tx.currency.clone(),
            direction: tx.direction,
            booking_date: tx.booking_date,
            description_raw: tx.description_raw.clone(),
            description_display: tx.description_display.clone(),
        }
    }
}

/// Error types for event publication
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event channel closed")]
    ChannelClosed,

    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
}

/// Seam for the downstream message channel.
///
/// Implementations must preserve emission order per key; the orchestrator
/// awaits each publish before the next, so a single ordered channel
/// satisfies that.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &TransactionUpserted) -> Result<(), PublishError>;
}

/// An event as delivered into the message channel.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub topic: &'static str,
    pub key: String,
    pub payload: TransactionUpserted,
}

/// Publisher over a bounded in-process channel.
///
/// The shipped transport: a broker-backed publisher implements the same
/// trait and replaces this at wiring time.
pub struct ChannelEventPublisher {
    sender: mpsc::Sender<PublishedEvent>,
    timeout: Duration,
}

impl ChannelEventPublisher {
    /// Create a publisher and the receiving half of its channel.
    pub fn new(buffer: usize, timeout: Duration) -> (Self, mpsc::Receiver<PublishedEvent>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { sender, timeout }, receiver)
    }
}

#[async_trait::async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: &TransactionUpserted) -> Result<(), PublishError> {
        let record = PublishedEvent {
            topic: TX_TOPIC,
            key: event.key(),
            payload: event.clone(),
        };

        match tokio::time::timeout(self.timeout, self.sender.send(record)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(PublishError::ChannelClosed),
            Err(_) => Err(PublishError::Timeout(self.timeout)),
        }
    }
}
