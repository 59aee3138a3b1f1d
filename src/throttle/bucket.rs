//! Sliding-window request accounting.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// A sliding-window counter enforcing one "at most `limit` requests per
/// `window`" budget.
///
/// Request instants are kept so the exact moment the oldest one leaves the
/// window can be computed; entries are pruned lazily during
/// [`SlidingWindow::delay`]. Mutation happens only inside the owning
/// limiter's decision pass.
pub struct SlidingWindow {
    /// Maximum requests allowed inside the window
    limit: usize,
    /// Window length
    window: Duration,
    /// Margin added to computed waits to absorb clock skew and latency
    margin: Duration,
    /// Instants of recorded requests, oldest first
    history: VecDeque<Instant>,
}

impl SlidingWindow {
    /// Create a window. `limit` and `window` must be positive; the owning
    /// limiter validates its configuration before construction.
    pub fn new(limit: usize, window: Duration, margin: Duration) -> Self {
        Self {
            limit,
            window,
            margin,
            history: VecDeque::new(),
        }
    }

    /// Time to wait before the next request fits the budget, or `None` when
    /// one can be made immediately.
    ///
    /// Prunes entries that have left the window as a side effect.
    pub fn delay(&mut self) -> Option<Duration> {
        if self.history.len() < self.limit {
            return None;
        }
        let now = Instant::now();
        while let Some(front) = self.history.front() {
            if now.duration_since(*front) > self.window {
                self.history.pop_front();
            } else {
                break;
            }
        }
        if self.history.len() < self.limit {
            return None;
        }
        self.history
            .front()
            .map(|oldest| self.window - now.duration_since(*oldest) + self.margin)
    }

    /// Account a request being made now.
    ///
    /// Must follow a [`SlidingWindow::delay`] that returned `None` within the
    /// same decision pass.
    pub fn record(&mut self) {
        self.history.push_back(Instant::now());
    }

    /// Number of requests currently accounted against the window.
    pub fn occupancy(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const MARGIN: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_ready_below_limit() {
        let mut window = SlidingWindow::new(2, Duration::from_secs(1), MARGIN);

        assert_eq!(window.delay(), None);
        window.record();
        assert_eq!(window.delay(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_measured_from_the_oldest_entry() {
        let mut window = SlidingWindow::new(2, Duration::from_millis(1000), MARGIN);

        window.record();
        advance(Duration::from_millis(100)).await;
        window.record();
        advance(Duration::from_millis(50)).await;

        // 1000 - 150 elapsed + 500 margin
        assert_eq!(window.delay(), Some(Duration::from_millis(1350)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_waiting_out_the_delay() {
        let mut window = SlidingWindow::new(2, Duration::from_millis(1000), MARGIN);

        window.record();
        window.record();
        let wait = window.delay().expect("window is full");

        advance(wait).await;
        assert_eq!(window.delay(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_leave_the_window_once_aged_out() {
        let mut window = SlidingWindow::new(3, Duration::from_secs(10), MARGIN);

        window.record();
        window.record();
        window.record();
        assert_eq!(window.occupancy(), 3);

        advance(Duration::from_secs(11)).await;
        assert_eq!(window.delay(), None);
        assert_eq!(window.occupancy(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_holds_more_than_limit_after_pruning() {
        let mut window = SlidingWindow::new(2, Duration::from_secs(1), MARGIN);

        for _ in 0..10 {
            if let Some(wait) = window.delay() {
                advance(wait).await;
                assert_eq!(window.delay(), None);
            }
            window.record();
            assert!(window.occupancy() <= 2);
        }
    }
}
