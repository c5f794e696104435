// Request pacing for the summarization service.
//
// Hosted inference endpoints throttle aggressively. Calls are spaced at
// least `1 / requests_per_second` apart; a non-positive rate disables pacing.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Enforces a minimum spacing between consecutive requests.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<PacingState>>,
}

struct PacingState {
    /// None when pacing is disabled
    spacing: Option<Duration>,
    last_call: Option<Instant>,
}

/// Minimum spacing for a request rate; None when pacing is disabled.
///
/// The rate must be finite, and a positive rate must give a representable
/// interval.
pub fn spacing_for(requests_per_second: f64) -> Result<Option<Duration>> {
    if !requests_per_second.is_finite() {
        anyhow::bail!("Request rate must be a finite number, got {requests_per_second}");
    }
    if requests_per_second <= 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(1.0 / requests_per_second)
        .map(Some)
        .with_context(|| format!("Request rate {requests_per_second} is too small"))
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Result<Self> {
        let spacing = spacing_for(requests_per_second)?;
        Ok(Self {
            state: Arc::new(Mutex::new(PacingState {
                spacing,
                last_call: None,
            })),
        })
    }

    /// Wait until the next request may go out.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        if let (Some(spacing), Some(last)) = (state.spacing, state.last_call) {
            let ready_at = last + spacing;
            let now = Instant::now();
            if ready_at > now {
                // Holding the lock while sleeping keeps callers strictly ordered.
                tokio::time::sleep(ready_at - now).await;
            }
        }

        state.last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_is_immediate() {
        let limiter = RateLimiter::new(1.0).unwrap();
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_second_call_waits_for_spacing() {
        let limiter = RateLimiter::new(4.0).unwrap(); // 250ms spacing
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(200),
            "Expected ~250ms spacing, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_zero_rate_disables_pacing() {
        let limiter = RateLimiter::new(0.0).unwrap();
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_unrepresentable_rates_are_errors() {
        assert!(RateLimiter::new(1e-20).is_err());
        assert!(RateLimiter::new(f64::NAN).is_err());
        assert!(RateLimiter::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_spacing_for_rate() {
        assert_eq!(spacing_for(4.0).unwrap(), Some(Duration::from_millis(250)));
        assert_eq!(spacing_for(-1.0).unwrap(), None);
    }
}
