//! Background task that periodically sweeps expired links.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::application::services::SweepService;

/// Default period between sweeps: two hours.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

/// Runs [`SweepService::sweep_expired`] every `period` until `shutdown` turns `true`
/// or its sender is dropped.
///
/// The first sweep runs immediately. A failed sweep is logged and the loop carries on;
/// the next tick is the retry. Ticks missed while a sweep is slow are delayed, not
/// replayed in a burst.
pub async fn run_expiry_worker(
    sweeper: Arc<SweepService>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(period_secs = period.as_secs(), "Expiry worker started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = sweeper.sweep_expired().await {
                    error!(error = %e, "Expired link sweep failed; will retry on next tick");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Expiry worker stopped");
}
