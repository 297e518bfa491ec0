//! Sliding-window rate limiter: at most `max_calls` admitted calls per
//! rolling `period`. Mirrors the deque-based limiter in the original
//! crawler — evict stale timestamps, sleep until the oldest ages out if
//! at capacity, then admit.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    calls: Mutex<VecDeque<Instant>>,
    max_calls: usize,
    period: Duration,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
            max_calls: max_calls.max(1),
            period,
        }
    }

    /// Blocks until a call may be admitted, then records it.
    pub async fn acquire(&self) {
        loop {
            let sleep_for = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();
                while let Some(&front) = calls.front() {
                    if front <= now - self.period {
                        calls.pop_front();
                    } else {
                        break;
                    }
                }

                if calls.len() < self.max_calls {
                    calls.push_back(now);
                    None
                } else {
                    let oldest = *calls.front().expect("len >= max_calls >= 1");
                    Some((oldest + self.period).saturating_duration_since(now))
                }
            };

            match sleep_for {
                None => return,
                Some(d) if d.is_zero() => continue,
                Some(d) => tokio::time::sleep(d).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant as StdInstant;

    #[tokio::test]
    async fn admits_up_to_capacity_without_sleeping() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = StdInstant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn blocks_past_capacity_until_window_elapses() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        limiter.acquire().await;
        let start = StdInstant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
