//! Retry policy.
//!
//! Whether a failed attempt is retried is a pure function of the error code
//! and the attempt counter. Transient codes back off exponentially up to a
//! bounded number of attempts; everything else fails on the spot.

use std::time::Duration ;

use crate::error::ErrorCode ;



/// Outcome of consulting the policy after a failed attempt.
#[derive( Clone, Copy, Debug, Eq, PartialEq )]
pub struct RetryDecision {
    /// Whether another attempt should be made
    pub retry: bool,
    /// How long to wait before the next attempt
    pub delay: Duration,
}

impl RetryDecision {
    /// A decision to give up.
    pub const GIVE_UP: RetryDecision = RetryDecision { retry: false, delay: Duration::ZERO };
}

/// Bounded exponential backoff over transient error codes.
///
/// Attempts are 1-indexed: with the default `max_attempts` of 3, attempts
/// 1 and 2 may be retried and attempt 3 is final. The delay before attempt
/// `n + 1` is `base_delay * 2^(n - 1)`, capped at `max_delay`.
#[derive( Clone, Debug )]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, 500ms base delay, 8s ceiling.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis( 500 ),
            max_delay: Duration::from_millis( 8000 ),
        }
    }
}

impl RetryPolicy {

    /// Overrides the attempt bound (1-indexed; 1 means no retries).
    pub fn with_max_attempts( mut self, max_attempts: u32 ) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Overrides the base delay.
    pub fn with_base_delay( mut self, base_delay: Duration ) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Overrides the delay ceiling.
    pub fn with_max_delay( mut self, max_delay: Duration ) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// The configured attempt bound.
    #[inline] pub fn max_attempts( &self ) -> u32 { self.max_attempts }

    /// Decides whether attempt number `attempt` (1-indexed), which failed
    /// with `code`, should be followed by another attempt, and after how long.
    pub fn should_retry( &self, code: ErrorCode, attempt: u32 ) -> RetryDecision {
        if !code.is_transient() || attempt >= self.max_attempts {
            return RetryDecision::GIVE_UP ;
        }
        let exponent = attempt.saturating_sub( 1 ).min( 31 );
        let delay = self.base_delay
            .saturating_mul( 1 << exponent )
            .min( self.max_delay );
        RetryDecision { retry: true, delay }
    }

}
