use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Time source a scan is driven against.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    /// Time elapsed on this clock since it was created.
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time backed by the tokio timer.
pub struct TokioClock {
    started: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Simulated time that advances instantly on `sleep`.
#[derive(Default)]
pub struct VirtualClock {
    elapsed_nanos: AtomicU64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saturates at `u64::MAX` nanoseconds instead of wrapping.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .elapsed_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_add(nanos)));
    }
}

#[async_trait]
impl Clock for VirtualClock {
    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        // Still a suspend point, so other tasks observe each step.
        tokio::task::yield_now().await;
    }

    fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_virtual_clock_advances_without_waiting() {
        let clock = VirtualClock::new();
        let wall = Instant::now();
        clock.sleep(Duration::from_secs(3600)).await;
        clock.sleep(Duration::from_millis(500)).await;
        assert_eq!(clock.elapsed(), Duration::from_millis(3_600_500));
        assert!(wall.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_virtual_clock_saturates_on_huge_advance() {
        let clock = VirtualClock::new();
        clock.advance(Duration::from_secs(1));
        clock.advance(Duration::MAX);
        assert_eq!(clock.elapsed(), Duration::from_nanos(u64::MAX));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.elapsed(), Duration::from_nanos(u64::MAX));
    }

    #[tokio::test]
    async fn test_tokio_clock_sleeps() {
        let clock = TokioClock::new();
        clock.sleep(Duration::from_millis(20)).await;
        assert!(clock.elapsed() >= Duration::from_millis(20));
    }
}
