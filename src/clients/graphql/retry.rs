//! Retry classification and backoff bookkeeping for the executor.
//!
//! The transient-message heuristic lives here, behind
//! [`is_transient_message`], so the phrase table can change without touching
//! the request loop.

use std::time::Duration;

use crate::clients::graphql::GraphqlResult;
use crate::config::MIN_INITIAL_BACKOFF;

/// Lowercase phrases that mark a GraphQL error message as transient.
pub const TRANSIENT_PHRASES: &[&str] = &["rate limit", "too many requests", "timeout", "temporary"];

/// Default number of retries for tool calls.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Returns `true` when `message` matches a transient phrase (case-insensitive).
///
/// # Example
///
/// ```rust
/// use braintree_bridge::clients::graphql::is_transient_message;
///
/// assert!(is_transient_message("Rate limit exceeded"));
/// assert!(is_transient_message("Temporary failure, please retry"));
/// assert!(!is_transient_message("Unknown payment method"));
/// ```
#[must_use]
pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Returns `true` when any error entry of `result` is transient.
#[must_use]
pub fn is_transient_result(result: &GraphqlResult) -> bool {
    result.error_messages().any(is_transient_message)
}

/// Attempt and backoff bookkeeping for one executor call.
///
/// A state is created fresh for every call and never shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    backoff: Duration,
    waits: Vec<Duration>,
}

impl RetryState {
    /// Creates a state with no attempts made yet.
    ///
    /// A zero `initial_backoff` is raised to [`MIN_INITIAL_BACKOFF`].
    #[must_use]
    pub const fn new(initial_backoff: Duration) -> Self {
        Self {
            attempts: 0,
            backoff: if initial_backoff.is_zero() {
                MIN_INITIAL_BACKOFF
            } else {
                initial_backoff
            },
            waits: Vec::new(),
        }
    }

    /// Number of network attempts started so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Number of retries performed so far.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    /// The backoff that the next computed wait will use.
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Every wait taken between attempts, in order.
    #[must_use]
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    /// Returns `true` while another retry fits within `max_retries`.
    #[must_use]
    pub const fn can_retry(&self, max_retries: u32) -> bool {
        self.retries() < max_retries
    }

    /// Records the start of an attempt and returns its 1-based number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Returns the wait before the next attempt and doubles the backoff.
    ///
    /// `retry_after` overrides the computed backoff for this one wait; the
    /// backoff still doubles.
    pub fn next_wait(&mut self, retry_after: Option<Duration>) -> Duration {
        let wait = retry_after.unwrap_or(self.backoff);
        self.backoff = self.backoff.saturating_mul(2);
        self.waits.push(wait);
        wait
    }
}
