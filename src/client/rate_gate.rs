use std::time::{Duration, Instant};

/// Enforces a minimum interval between outbound API requests
///
/// The gate is owned by the single sequential caller (the gateway), so no
/// queueing or fairness is involved: `throttle` just sleeps for whatever part
/// of the interval has not yet elapsed since the previous release.
#[derive(Debug, Clone)]
pub struct RateGate {
    /// Minimum time between two releases
    min_interval: Duration,

    /// When `throttle` last returned
    last_release: Option<Instant>,
}

impl RateGate {
    /// Creates a gate that has never released
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// When the gate last let a request through
    pub fn last_release(&self) -> Option<Instant> {
        self.last_release
    }

    /// Checks whether a request may be issued at `now` without waiting
    pub fn is_ready(&self, now: Instant) -> bool {
        self.time_until_ready(now).is_none()
    }

    /// Calculates the time until the next request may be issued
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        if let Some(last) = self.last_release {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_interval {
                return Some(self.min_interval - elapsed);
            }
        }
        None
    }

    /// Waits until the minimum interval has passed, then records the release
    ///
    /// The first call never blocks.
    pub async fn throttle(&mut self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Rate gate holding request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.last_release = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gate_is_ready() {
        let gate = RateGate::new(Duration::from_secs(2));
        assert!(gate.is_ready(Instant::now()));
        assert!(gate.time_until_ready(Instant::now()).is_none());
    }

    #[test]
    fn test_time_until_ready_after_release() {
        let mut gate = RateGate::new(Duration::from_millis(1000));
        let now = Instant::now();
        gate.last_release = Some(now);

        let wait = gate
            .time_until_ready(now + Duration::from_millis(400))
            .unwrap();
        assert_eq!(wait, Duration::from_millis(600));

        assert!(gate.is_ready(now + Duration::from_millis(1000)));
    }

    #[tokio::test]
    async fn test_first_throttle_does_not_block() {
        let mut gate = RateGate::new(Duration::from_secs(5));
        let start = Instant::now();
        gate.throttle().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_consecutive_releases_are_spaced() {
        let interval = Duration::from_millis(80);
        let mut gate = RateGate::new(interval);

        gate.throttle().await;
        let first = gate.last_release().unwrap();
        gate.throttle().await;
        let second = gate.last_release().unwrap();
        gate.throttle().await;
        let third = gate.last_release().unwrap();

        assert!(second.duration_since(first) >= interval);
        assert!(third.duration_since(second) >= interval);
    }

    #[tokio::test]
    async fn test_no_wait_when_interval_already_elapsed() {
        let interval = Duration::from_millis(30);
        let mut gate = RateGate::new(interval);

        gate.throttle().await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let start = Instant::now();
        gate.throttle().await;
        assert!(start.elapsed() < interval);
    }
}
