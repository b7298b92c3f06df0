use {
    std::time::Duration,
    tokio::time::{self, Instant, Interval, MissedTickBehavior},
};

/// Admission gate releasing at most `rate` permits per second, evenly spaced.
///
/// Only the start of work is throttled. What happens after a permit is taken
/// is not tracked here.
#[derive(Debug)]
pub struct RateLimiter {
    ticker: Interval,
}

impl RateLimiter {
    pub fn new(rate: u32) -> Self {
        let mut ticker = time::interval(period(rate));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { ticker }
    }

    /// Waits for the next permit and returns the instant it was released.
    pub async fn acquire(&mut self) -> Instant {
        self.ticker.tick().await
    }
}

fn period(rate: u32) -> Duration {
    Duration::from_secs(1) / rate.max(1)
}
