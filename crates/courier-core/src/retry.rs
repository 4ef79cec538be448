//! Retry policy for failed round trips
//!
//! The policy bounds attempts and computes the inter-attempt delay; the
//! decision of *what* is worth retrying lives in a predicate over each
//! attempt's outcome. The default predicate retries transport errors,
//! 5xx, and 429, never other 4xx, which will not get better on their
//! own. The default delay is a fixed sleep (multiplier 1.0); growth and
//! jitter are opt-in.

use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;

use crate::response::Response;
use crate::transport::TransportError;

/// Outcome of a single attempt, as seen by a retry predicate.
pub type AttemptOutcome = std::result::Result<Response, TransportError>;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap on the delay between attempts.
    pub max_delay: Duration,
    /// Growth factor per retry; 1.0 keeps the delay fixed.
    pub multiplier: f64,
    /// Randomize delays to avoid thundering herds.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 1.0,
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Policy with a custom attempt bound and default delays.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Fixed-delay policy: `max_attempts` attempts, sleeping `delay`
    /// between them.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Backoff state for one retry sequence.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.base_delay,
            initial_interval: self.base_delay,
            max_interval: self.max_delay,
            multiplier: self.multiplier,
            randomization_factor: if self.jitter { 0.5 } else { 0.0 },
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Decide whether another attempt is allowed after `attempt` attempts
    /// whose latest outcome the predicate judged `retryable`.
    pub fn decide(
        &self,
        attempt: u32,
        retryable: bool,
        backoff: &mut ExponentialBackoff,
    ) -> RetryDecision {
        if !retryable || attempt >= self.max_attempts {
            return RetryDecision::Stop;
        }
        let delay = backoff.next_backoff().unwrap_or(self.max_delay);
        RetryDecision::Retry { delay }
    }
}

/// Decision on whether to retry a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the given delay.
    Retry { delay: Duration },
    /// Give up and return the latest outcome.
    Stop,
}

/// Default retry predicate: transport errors, 5xx, and 429.
pub fn default_should_retry(outcome: &AttemptOutcome) -> bool {
    match outcome {
        Ok(response) => response.status == 429 || (500..600).contains(&response.status),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;

    fn response_with_status(status: u16) -> Response {
        Response::from_transport(
            TransportResponse {
                status,
                headers: Vec::new(),
                body: String::new(),
            },
            false,
        )
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.multiplier, 1.0);
        assert!(!policy.jitter);
    }

    #[test]
    fn test_fixed_policy() {
        let policy = RetryPolicy::fixed(5, Duration::ZERO);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::ZERO);
    }

    #[test]
    fn test_decide_stops_at_max_attempts() {
        let policy = RetryPolicy::fixed(2, Duration::ZERO);
        let mut backoff = policy.backoff();

        assert!(matches!(
            policy.decide(1, true, &mut backoff),
            RetryDecision::Retry { .. }
        ));
        assert_eq!(policy.decide(2, true, &mut backoff), RetryDecision::Stop);
    }

    #[test]
    fn test_decide_stops_on_non_retryable_outcome() {
        let policy = RetryPolicy::default();
        let mut backoff = policy.backoff();
        assert_eq!(policy.decide(1, false, &mut backoff), RetryDecision::Stop);
    }

    #[test]
    fn test_fixed_delay_does_not_grow() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(10));
        let mut backoff = policy.backoff();

        for attempt in 1..4 {
            match policy.decide(attempt, true, &mut backoff) {
                RetryDecision::Retry { delay } => {
                    assert_eq!(delay, Duration::from_millis(10), "attempt {attempt}")
                }
                RetryDecision::Stop => panic!("expected retry at attempt {attempt}"),
            }
        }
    }

    #[test]
    fn test_multiplier_grows_delay() {
        let policy = RetryPolicy::new(5)
            .with_base_delay(Duration::from_millis(100))
            .with_multiplier(2.0);
        let mut backoff = policy.backoff();

        let first = match policy.decide(1, true, &mut backoff) {
            RetryDecision::Retry { delay } => delay,
            RetryDecision::Stop => panic!("expected retry"),
        };
        let second = match policy.decide(2, true, &mut backoff) {
            RetryDecision::Retry { delay } => delay,
            RetryDecision::Stop => panic!("expected retry"),
        };

        assert_eq!(first, Duration::from_millis(100));
        assert_eq!(second, Duration::from_millis(200));
    }

    #[test]
    fn test_default_predicate_retries_server_errors_and_transport_failures() {
        assert!(default_should_retry(&Ok(response_with_status(500))));
        assert!(default_should_retry(&Ok(response_with_status(503))));
        assert!(default_should_retry(&Ok(response_with_status(429))));
        assert!(default_should_retry(&Err(TransportError::timeout("t"))));
    }

    #[test]
    fn test_default_predicate_does_not_retry_client_errors_or_success() {
        assert!(!default_should_retry(&Ok(response_with_status(200))));
        assert!(!default_should_retry(&Ok(response_with_status(301))));
        assert!(!default_should_retry(&Ok(response_with_status(404))));
        assert!(!default_should_retry(&Ok(response_with_status(401))));
    }
}
