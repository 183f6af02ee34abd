use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::state::SharedState;

const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Sessions dropped by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evicted {
    /// Host sessions, saved or not.
    pub tournaments: usize,
    /// Prediction sessions that were never submitted.
    pub predictions: usize,
}

/// Periodically evict host and prediction sessions idle for longer than the configured time.
pub async fn run(state: SharedState) {
    let idle = state.config().session_idle();
    let mut ticker = interval(sweep_period(idle));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let evicted = sweep(&state, Instant::now(), idle);
        if evicted != Evicted::default() {
            info!(
                tournaments = evicted.tournaments,
                predictions = evicted.predictions,
                "evicted idle sessions"
            );
        } else {
            debug!("no idle sessions");
        }
    }
}

fn sweep_period(idle: Duration) -> Duration {
    (idle / 4).clamp(MIN_SWEEP_PERIOD, MAX_SWEEP_PERIOD)
}

/// Drop every session last touched at least `idle` before `now`.
pub fn sweep(state: &SharedState, now: Instant, idle: Duration) -> Evicted {
    let is_idle = |touched: Instant| now.saturating_duration_since(touched) >= idle;
    let mut evicted = Evicted::default();

    state.tournaments().retain(|_, session| {
        let drop = is_idle(session.last_touched());
        evicted.tournaments += usize::from(drop);
        !drop
    });
    state.predictions().retain(|_, session| {
        let drop = is_idle(session.last_touched());
        evicted.predictions += usize::from(drop);
        !drop
    });

    evicted
}
