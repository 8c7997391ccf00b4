use banksync::config::SyncConfig;
use banksync::provider::HttpProviderGateway;
use banksync::scheduler::SyncScheduler;
use banksync::store::{InMemoryAccountStore, InMemoryTransactionStore};
use banksync::sync::SyncOrchestrator;
use banksync::sync::events::ChannelEventPublisher;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .init();

    info!("Starting transaction sync service");

    let config = SyncConfig::from_env();
    info!("Provider endpoint: {}", config.provider_base_url);

    // The linking collaborator populates the account store; a database-backed
    // implementation replaces both stores behind the repository traits.
    let accounts = Arc::new(InMemoryAccountStore::new());
    let transactions = Arc::new(InMemoryTransactionStore::new());

    let gateway = Arc::new(HttpProviderGateway::new(
        config.provider_base_url.clone(),
        config.request_timeout,
    ));

    let (publisher, mut events) =
        ChannelEventPublisher::new(config.event_buffer, config.publish_timeout);

    // Drain the event channel; a broker-backed consumer replaces this task
    // in deployments with downstream services.
    let consumer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(
                "Delivered event topic={} key={} account_id={}",
                event.topic, event.key, event.payload.account_id
            );
        }
    });

    let orchestrator = Arc::new(SyncOrchestrator::new(
        accounts,
        transactions,
        gateway,
        Arc::new(publisher),
        config.lookback_days,
        config.max_concurrent_accounts,
    ));

    let sync_scheduler = SyncScheduler::new(orchestrator, config.sync_interval);

    tokio::select! {
        _ = sync_scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping transaction sync service");
        }
    }

    consumer.abort();
}
