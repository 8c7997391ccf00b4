//! Wire types for the provider transactions endpoint.

use serde::{Deserialize, Serialize};

/// One transaction record as returned by the provider, before normalization.
///
/// Amounts and dates stay textual here; the sync engine normalizes them into
/// canonical types when upserting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTransaction {
    /// Stable upstream identifier. Falls back to the entry reference when the
    /// provider omits a transaction id.
    pub provider_transaction_id: String,
    /// Decimal text, e.g. `"10.50"`. May be blank.
    pub amount: String,
    /// ISO currency code.
    pub currency: String,
    /// Direction code, `"DEBIT"` / `"CREDIT"` / empty.
    pub direction: String,
    /// ISO date text, blank when the provider omits it.
    pub booking_date: String,
    /// ISO date text, blank for pending transactions.
    pub value_date: String,
    pub description: String,
    /// The full upstream record serialized back to JSON.
    pub raw_json: String,
}

/// One page of provider transactions plus the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct TransactionPage {
    pub transactions: Vec<ProviderTransaction>,
    /// `None` on the final page. Blank keys from the wire are normalized to
    /// `None` before this struct is built.
    pub continuation_key: Option<String>,
}

/// Error types for provider gateway calls
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("provider returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
