use std::sync::Arc;
use std::time::Duration;

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, error, info};

use super::Chat;

#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Longest a participant may stay silent.
    pub ttl: Duration,
    /// Time between sweeps.
    pub period: Duration,
}

/// Starts the eviction loop. Each sweep finishes before the next tick is
/// awaited, so two sweeps never run at once; a slow sweep pushes the
/// following ticks back instead of bunching them up.
pub fn spawn_sweeper(chat: Arc<Chat>, config: SweepConfig) -> JoinHandle<()> {
    info!(
        "Starting presence sweeper (ttl: {:?}, period: {:?})",
        config.ttl, config.period
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick fires immediately and nobody can be stale yet
        interval.tick().await;

        loop {
            interval.tick().await;

            match chat.evict_expired(config.ttl).await {
                Ok(evicted) if evicted.is_empty() => debug!("sweep: nobody to evict"),
                Ok(evicted) => info!("sweep: evicted {}", evicted.join(", ")),
                Err(e) => error!("sweep failed: {e}"),
            }
        }
    })
}
