//! Periodic and on-demand sync triggers.
//!
//! The scheduler replaces implicit background-job wiring with an explicit
//! handoff to the orchestrator: a periodic loop that sweeps every active
//! account at a fixed interval, and a clonable on-demand trigger for single
//! accounts. The orchestrator itself holds no scheduling state.

use crate::domain::AccountId;
use crate::sync::{SyncError, SyncOrchestrator};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Periodic trigger sweeping all eligible accounts.
pub struct SyncScheduler {
    orchestrator: Arc<SyncOrchestrator>,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
        }
    }

    /// Run the periodic sweep until the task is cancelled.
    ///
    /// The first sweep starts immediately. Each tick awaits the full sweep,
    /// so sweeps never overlap; a sweep running longer than the interval
    /// delays the next tick instead of stacking up.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Periodic transaction sync scheduled every {:?}",
            self.interval
        );

        loop {
            ticker.tick().await;
            self.orchestrator.sync_all().await;
        }
    }
}

/// On-demand trigger for one account, handed to the inbound gateway.
///
/// Success means the sync ran to completion for the current window; counts
/// are reported through logs, not returned. Callers wanting fire-and-forget
/// semantics spawn the future instead of awaiting it.
#[derive(Clone)]
pub struct SyncTrigger {
    orchestrator: Arc<SyncOrchestrator>,
}

impl SyncTrigger {
    pub fn new(orchestrator: Arc<SyncOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn synchronize(&self, account_id: AccountId) -> Result<(), SyncError> {
        self.orchestrator.sync_account(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountStatus};
    use crate::provider::{GatewayError, ProviderGateway, TransactionPage};
    use crate::store::{InMemoryAccountStore, InMemoryTransactionStore};
    use crate::sync::events::{EventPublisher, PublishError, TransactionUpserted};
    use chrono::{NaiveDate, Utc};

    struct EmptyGateway;

    #[async_trait::async_trait]
    impl ProviderGateway for EmptyGateway {
        async fn fetch_page(
            &self,
            _provider_account_id: &str,
            _from_date: Option<NaiveDate>,
            _to_date: Option<NaiveDate>,
            _continuation_key: Option<&str>,
        ) -> Result<TransactionPage, GatewayError> {
            Ok(TransactionPage::default())
        }
    }

    struct NullPublisher;

    #[async_trait::async_trait]
    impl EventPublisher for NullPublisher {
        async fn publish(&self, _event: &TransactionUpserted) -> Result<(), PublishError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn trigger_propagates_unknown_account_and_accepts_known_ones() {
        let accounts = Arc::new(InMemoryAccountStore::new());
        accounts.insert(Account {
            id: 1,
            user_id: "user-1".to_string(),
            provider_account_id: "acc-1".to_string(),
            iban: None,
            status: AccountStatus::Active,
            continuation_key: None,
            created_at: Utc::now(),
        });

        let orchestrator = Arc::new(SyncOrchestrator::new(
            accounts,
            Arc::new(InMemoryTransactionStore::new()),
            Arc::new(EmptyGateway),
            Arc::new(NullPublisher),
            30,
            4,
        ));
        let trigger = SyncTrigger::new(orchestrator);

        assert!(matches!(
            trigger.synchronize(99).await,
            Err(SyncError::AccountNotFound(99))
        ));
        trigger.synchronize(1).await.unwrap();
    }
}
