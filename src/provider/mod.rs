//! Provider Transaction Gateway.
//!
//! This module is the boundary to the upstream open-banking provider. It
//! defines the `ProviderGateway` trait consumed by the sync orchestrator and
//! the HTTP implementation over the provider's paginated transactions
//! endpoint. The gateway is a thin, stateless call: all pagination state
//! (window, continuation key) lives in the orchestrator.

pub mod client;
pub mod types;

pub use client::HttpProviderGateway;
pub use types::{GatewayError, ProviderTransaction, TransactionPage};

use chrono::NaiveDate;

/// Remote procedure contract for fetching one page of account transactions.
///
/// An absent `continuation_key` requests the first page of a windowed query;
/// a present key resumes the provider-side cursor and supersedes the date
/// window. An absent key in the returned page signals the final page.
#[async_trait::async_trait]
pub trait ProviderGateway: Send + Sync {
    async fn fetch_page(
        &self,
        provider_account_id: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        continuation_key: Option<&str>,
    ) -> Result<TransactionPage, GatewayError>;
}
