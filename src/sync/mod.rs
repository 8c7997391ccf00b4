//! Transaction Synchronization Module
//!
//! This module provides all the core logic and services for synchronizing a
//! linked account's transactions from the upstream provider into the local
//! stores. It is composed of several submodules, each responsible for a
//! specific aspect of the sync process:
//!
//! - `orchestrator`: The main entry point and coordinator. It drives the
//!   per-account pagination loop and the fleet-wide sweep.
//! - `processor`: Maps one provider record onto exactly one local row via an
//!   idempotent upsert keyed on `(account_id, provider_transaction_id)`.
//! - `normalize`: Parses provider-supplied decimal text and ISO date text
//!   into canonical types with defined fallback behavior.
//! - `window`: Computes the `[from, to]` date window bounding one run.
//! - `events`: The upsert change event and its publisher seam.
//! - `progress`: Per-run counters reported through logging.
//! - `locks`: Per-account mutual exclusion between concurrent runs.
//!
//! The orchestrator coordinates the sync process by computing the window,
//! paging through the gateway, invoking the processor for every record, and
//! advancing the persisted cursor after each page. Progress tracking is
//! integrated to ensure observable synchronization.

pub mod events;
pub mod locks;
pub mod normalize;
pub mod orchestrator;
pub mod processor;
pub mod progress;
pub mod window;

pub use orchestrator::SyncOrchestrator;

use crate::domain::AccountId;
use crate::provider::GatewayError;
use crate::store::StoreError;

/// Error types for one account's synchronization run.
///
/// Publish failures are deliberately absent: event publication is a
/// best-effort side effect that is logged and counted, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("malformed provider record: {0}")]
    Malformed(#[from] normalize::NormalizeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
