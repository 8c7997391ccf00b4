//! Service configuration.

use std::time::Duration;

/// Configuration for the sync service.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the provider transactions API.
    pub provider_base_url: String,
    /// Interval between periodic full-fleet sweeps.
    pub sync_interval: Duration,
    /// Window fallback for accounts without stored history.
    pub lookback_days: i64,
    /// Timeout for one provider page fetch.
    pub request_timeout: Duration,
    /// Timeout for one event publish.
    pub publish_timeout: Duration,
    /// Upper bound on accounts synced in parallel during a sweep.
    pub max_concurrent_accounts: usize,
    /// Capacity of the in-process event channel.
    pub event_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            provider_base_url: "http://localhost:8085".to_string(),
            sync_interval: Duration::from_secs(60 * 60),
            lookback_days: 30,
            request_timeout: Duration::from_secs(30),
            publish_timeout: Duration::from_secs(5),
            max_concurrent_accounts: 4,
            event_buffer: 256,
        }
    }
}

impl SyncConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider_base_url: env_string("BANKSYNC_PROVIDER_URL")
                .unwrap_or(defaults.provider_base_url),
            sync_interval: env_secs("BANKSYNC_SYNC_INTERVAL_SECS")
                .unwrap_or(defaults.sync_interval),
            lookback_days: env_parse("BANKSYNC_LOOKBACK_DAYS").unwrap_or(defaults.lookback_days),
            request_timeout: env_secs("BANKSYNC_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            publish_timeout: env_secs("BANKSYNC_PUBLISH_TIMEOUT_SECS")
                .unwrap_or(defaults.publish_timeout),
            max_concurrent_accounts: env_parse("BANKSYNC_MAX_CONCURRENT_ACCOUNTS")
                .unwrap_or(defaults.max_concurrent_accounts),
            event_buffer: env_parse("BANKSYNC_EVENT_BUFFER").unwrap_or(defaults.event_buffer),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_secs(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_service_contract() {
        let config = SyncConfig::default();
        assert_eq!(config.sync_interval, Duration::from_secs(3600));
        assert_eq!(config.lookback_days, 30);
    }
}
