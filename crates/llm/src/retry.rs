use std::time::Duration;

/// Backoff for 429 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first 429; the request is sent at most `max_retries + 1` times.
    pub max_retries: u32,
    /// Wait before the first retry when the server gives no `Retry-After`.
    pub initial_backoff: Duration,
    /// Upper bound on any single wait.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            initial_backoff: Duration::from_secs(2),
            max_wait: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (0-based). An integer `Retry-After`
    /// (seconds) wins; otherwise exponential backoff. Always capped at `max_wait`.
    pub fn wait_for(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        let wait = retry_after
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| {
                self.initial_backoff
                    .saturating_mul(2u32.saturating_pow(attempt))
            });
        wait.min(self.max_wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_without_header() {
        let policy = RetryPolicy::default();
        let waits: Vec<u64> = (0..4).map(|a| policy.wait_for(a, None).as_secs()).collect();
        assert_eq!(waits, vec![2, 4, 8, 16]);
    }

    #[test]
    fn retry_after_seconds_win() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.wait_for(3, Some(" 7 ")), Duration::from_secs(7));
        assert_eq!(policy.wait_for(0, Some("0")), Duration::ZERO);
    }

    #[test]
    fn unparsable_retry_after_falls_back() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.wait_for(1, Some("Wed, 21 Oct 2015 07:28:00 GMT")),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn waits_are_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.wait_for(0, Some("3600")), Duration::from_secs(60));
        assert_eq!(policy.wait_for(10, None), Duration::from_secs(60));
        assert_eq!(policy.wait_for(40, None), Duration::from_secs(60));
    }
}
