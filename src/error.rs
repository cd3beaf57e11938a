//! Load failure taxonomy.
//!
//! Failures are classified so the retry policy can tell transient faults
//! apart from permanent ones. Network faults and timeouts may be retried;
//! a script that failed to execute will fail identically on a re-fetch of
//! the same bytes, so it is terminal on the first attempt.

use serde::{ Deserialize, Serialize };
use thiserror::Error ;



/// Classification of a load failure.
#[derive( Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize )]
#[serde( rename_all = "SCREAMING_SNAKE_CASE" )]
pub enum ErrorCode {
    /// No network location could be computed for the identifier. Fatal:
    /// the location itself, not the network, is the problem.
    Unresolvable,
    /// The fetch failed at the transport level. Retryable.
    NetworkError,
    /// The fetch exceeded the collaborator's own deadline. Retryable.
    Timeout,
    /// The fetched code failed to parse or execute. Not retryable:
    /// re-fetching identical bytes will not help.
    ScriptError,
    /// The code executed but did not expose the expected interface.
    InitError,
    /// Uncategorized failure. Treated as not retryable.
    Unknown,
}

impl ErrorCode {
    /// Whether failures with this code are worth another attempt.
    #[inline] pub fn is_transient( self ) -> bool {
        matches!( self, ErrorCode::NetworkError | ErrorCode::Timeout )
    }
}

/// The terminal (or latest) failure attached to a load record.
///
/// Surfaces to callers only as the rejection of
/// [`RemoteModuleLoader::load`]( crate::RemoteModuleLoader::load ) once a
/// terminal state is reached; intermediate attempts are observable only
/// through the event channel.
#[derive( Clone, Debug, Error, Serialize, Deserialize )]
#[error( "{code:?}: {message} (attempt {retry_count}, will_retry: {will_retry})" )]
pub struct LoadError {
    /// Failure classification
    pub code: ErrorCode,
    /// Human-readable description from the failing component
    pub message: String,
    /// How many attempts had completed when this error was recorded
    pub retry_count: u32,
    /// Whether the loader scheduled another attempt after this failure
    pub will_retry: bool,
}

/// Error surfaced by the injected fetch/execute collaborator.
///
/// The collaborator should classify its own failures; anything it cannot
/// classify maps to [`ErrorCode::Unknown`].
#[derive( Clone, Debug, Error )]
#[error( "{code:?}: {message}" )]
pub struct FetchFailure {
    /// Failure classification
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
}

impl FetchFailure {

    /// Creates a failure with an explicit classification.
    pub fn new( code: ErrorCode, message: impl Into<String> ) -> Self {
        Self { code, message: message.into() }
    }

    /// A transport-level failure ([`ErrorCode::NetworkError`]).
    pub fn network( message: impl Into<String> ) -> Self {
        Self::new( ErrorCode::NetworkError, message )
    }

    /// A deadline expiry ([`ErrorCode::Timeout`]).
    pub fn timeout( message: impl Into<String> ) -> Self {
        Self::new( ErrorCode::Timeout, message )
    }

    /// A parse/execution failure ([`ErrorCode::ScriptError`]).
    pub fn script( message: impl Into<String> ) -> Self {
        Self::new( ErrorCode::ScriptError, message )
    }

    /// A missing-interface failure ([`ErrorCode::InitError`]).
    pub fn init( message: impl Into<String> ) -> Self {
        Self::new( ErrorCode::InitError, message )
    }

    /// An uncategorized failure ([`ErrorCode::Unknown`]).
    pub fn other( message: impl Into<String> ) -> Self {
        Self::new( ErrorCode::Unknown, message )
    }

}
