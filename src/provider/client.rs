//!
//! HTTP client for the open-banking provider's transactions endpoint.
//!
//! This module provides an async client for the provider's paginated
//! account-transactions resource. The first page of a sync run is requested
//! with a date window; follow-up pages are requested with the continuation
//! key alone, because the key encodes the original query on the provider
//! side. All methods are async and designed for use with Tokio.

use super::ProviderGateway;
use super::types::{GatewayError, ProviderTransaction, TransactionPage};
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP implementation of the provider gateway.
#[derive(Clone)]
pub struct HttpProviderGateway {
    /// The underlying HTTP client for provider requests.
    http_client: Client,
    /// Base URL of the provider API.
    base_url: String,
}

impl HttpProviderGateway {
    /// Create a new gateway client.
    ///
    /// # Arguments
    /// * `base_url` - The provider API base URL.
    /// * `timeout` - Per-request timeout; a slow provider call fails the
    ///   current account's sync rather than blocking it indefinitely.
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl ProviderGateway for HttpProviderGateway {
    async fn fetch_page(
        &self,
        provider_account_id: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        continuation_key: Option<&str>,
    ) -> Result<TransactionPage, GatewayError> {
        let url = format!(
            "{}/accounts/{}/transactions",
            self.base_url.trim_end_matches('/'),
            provider_account_id
        );

        // The continuation key supersedes the window: it encodes the original
        // query, so the date parameters are only sent on the first page.
        let mut query: Vec<(&str, String)> = Vec::new();
        match continuation_key {
            Some(key) => query.push(("continuation_key", key.to_string())),
            None => {
                if let Some(from) = from_date {
                    query.push(("date_from", from.to_string()));
                }
                if let Some(to) = to_date {
                    query.push(("date_to", to.to_string()));
                }
            }
        }

        debug!("Fetching transactions page from {} {:?}", url, query);

        let response = self.http_client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Remote { status, body });
        }

        let body: Value = response.json().await?;
        parse_page(&body)
    }
}

/// Parse a provider response body into a transaction page.
///
/// Kept as a free function over `serde_json::Value` so the mapping is
/// testable without an HTTP server.
pub fn parse_page(body: &Value) -> Result<TransactionPage, GatewayError> {
    let tx_array = match body.get("transactions") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Null) | None => &[],
        Some(other) => {
            return Err(GatewayError::MalformedResponse(format!(
                "transactions is not an array: {}",
                other
            )));
        }
    };

    let transactions = tx_array.iter().map(parse_transaction).collect();

    let continuation_key = text(body, "continuation_key").filter(|key| !key.trim().is_empty());

    Ok(TransactionPage {
        transactions,
        continuation_key,
    })
}

fn parse_transaction(tx_node: &Value) -> ProviderTransaction {
    let transaction_id = text(tx_node, "transaction_id");
    let entry_reference = text(tx_node, "entry_reference");

    let provider_transaction_id = transaction_id
        .filter(|id| !id.trim().is_empty())
        .or(entry_reference)
        .unwrap_or_default();

    let (amount, currency) = match tx_node.get("transaction_amount") {
        Some(amount_node) => (
            text_or_default(amount_node, "amount", "0.00"),
            text_or_default(amount_node, "currency", "EUR"),
        ),
        None => ("0.00".to_string(), "EUR".to_string()),
    };

    let credit_debit = text_or_default(tx_node, "credit_debit_indicator", "");
    let direction = if credit_debit.eq_ignore_ascii_case("DBIT") {
        "DEBIT".to_string()
    } else if credit_debit.eq_ignore_ascii_case("CRDT") {
        "CREDIT".to_string()
    } else {
        String::new()
    };

    let booking_date = text_or_default(tx_node, "booking_date", "");
    let value_date = text_or_default(tx_node, "value_date", "");

    // Prefer the first remittance line; fall back to the free-form note.
    let description = match tx_node.get("remittance_information") {
        Some(Value::Array(lines)) if !lines.is_empty() => lines[0]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_default(),
        _ => text_or_default(tx_node, "note", ""),
    };

    ProviderTransaction {
        provider_transaction_id,
        amount,
        currency,
        direction,
        booking_date,
        value_date,
        description,
        raw_json: tx_node.to_string(),
    }
}

fn text(node: &Value, field: &str) -> Option<String> {
    node.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn text_or_default(node: &Value, field: &str, default: &str) -> String {
    text(node, field).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_record() {
        let body = json!({
            "transactions": [{
                "transaction_id": "tx-1",
                "entry_reference": "ref-1",
                "transaction_amount": { "amount": "8.99", "currency": "EUR" },
                "credit_debit_indicator": "DBIT",
                "booking_date": "2025-12-04",
                "value_date": "2025-12-05",
                "remittance_information": ["COFFEE SHOP", "card 1234"],
                "status": "BOOK"
            }],
            "continuation_key": "page-2"
        });

        let page = parse_page(&body).expect("page should parse");
        assert_eq!(page.continuation_key.as_deref(), Some("page-2"));
        assert_eq!(page.transactions.len(), 1);

        let tx = &page.transactions[0];
        assert_eq!(tx.provider_transaction_id, "tx-1");
        assert_eq!(tx.amount, "8.99");
        assert_eq!(tx.currency, "EUR");
        assert_eq!(tx.direction, "DEBIT");
        assert_eq!(tx.booking_date, "2025-12-04");
        assert_eq!(tx.description, "COFFEE SHOP");
        assert!(tx.raw_json.contains("\"status\":\"BOOK\""));
    }

    #[test]
    fn falls_back_to_entry_reference_and_note() {
        let body = json!({
            "transactions": [{
                "transaction_id": "",
                "entry_reference": "ref-77",
                "transaction_amount": { "amount": "1.00", "currency": "SEK" },
                "credit_debit_indicator": "CRDT",
                "note": "salary"
            }]
        });

        let page = parse_page(&body).expect("page should parse");
        let tx = &page.transactions[0];
        assert_eq!(tx.provider_transaction_id, "ref-77");
        assert_eq!(tx.direction, "CREDIT");
        assert_eq!(tx.description, "salary");
        assert_eq!(tx.booking_date, "");
        assert!(page.continuation_key.is_none());
    }

    #[test]
    fn defaults_missing_amount_and_unknown_direction() {
        let body = json!({
            "transactions": [{
                "transaction_id": "tx-2",
                "credit_debit_indicator": "OTHR"
            }],
            "continuation_key": ""
        });

        let page = parse_page(&body).expect("page should parse");
        let tx = &page.transactions[0];
        assert_eq!(tx.amount, "0.00");
        assert_eq!(tx.currency, "EUR");
        assert_eq!(tx.direction, "");
        // Blank continuation keys mean the final page.
        assert!(page.continuation_key.is_none());
    }

    #[test]
    fn rejects_non_array_transactions() {
        let body = json!({ "transactions": "oops" });
        assert!(matches!(
            parse_page(&body),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
