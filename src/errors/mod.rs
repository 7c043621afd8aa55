//! Error types and retry classification for market data operations.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining retry behavior
//! - [`RetryPolicy`]: The bounded linear-backoff retry schedule

mod retry;

pub use retry::{RetryClass, RetryPolicy};

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines whether the
/// service retries the operation or surfaces the error immediately.
///
/// The enum is `Clone` so that a single failure can be handed to every
/// caller coalesced onto the same in-flight cache load.
#[derive(Clone, Debug, Error)]
pub enum MarketDataError {
    /// The request was malformed: empty or garbled symbol, or a
    /// period/interval token the provider does not support.
    /// Detected before any network call and never retried.
    #[error("Invalid request: {0}")]
    Configuration(String),

    /// The provider responded successfully but had no data for the
    /// requested symbol. This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A provider or network failure occurred.
    /// Treated as transient and retried with backoff.
    #[error("Provider error: {provider} - {message}")]
    Provider {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The retry budget was spent without a successful fetch.
    /// Carries the number of attempts made and the last underlying error.
    #[error("Fetch failed after {attempts} attempts: {cause}")]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// The error returned by the final attempt
        #[source]
        cause: Box<MarketDataError>,
    },
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockdash_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Provider {
    ///     provider: "YAHOO".to_string(),
    ///     message: "connection reset".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal errors - never retry
            Self::Configuration(_) | Self::SymbolNotFound(_) | Self::RetriesExhausted { .. } => {
                RetryClass::Never
            }

            // Transient errors - retry with backoff
            Self::Provider { .. } => RetryClass::WithBackoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_never_retries() {
        let error = MarketDataError::Configuration("bad period".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_symbol_not_found_never_retries() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_provider_error_retries_with_backoff() {
        let error = MarketDataError::Provider {
            provider: "YAHOO".to_string(),
            message: "503 service unavailable".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_retries_exhausted_never_retries() {
        let error = MarketDataError::RetriesExhausted {
            attempts: 3,
            cause: Box::new(MarketDataError::Provider {
                provider: "YAHOO".to_string(),
                message: "timeout".to_string(),
            }),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_exhaustion_preserves_last_cause() {
        let error = MarketDataError::RetriesExhausted {
            attempts: 3,
            cause: Box::new(MarketDataError::Provider {
                provider: "YAHOO".to_string(),
                message: "timeout".to_string(),
            }),
        };
        match error {
            MarketDataError::RetriesExhausted { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*cause, MarketDataError::Provider { .. }));
            }
            _ => panic!("Expected RetriesExhausted"),
        }
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::Configuration("unsupported period: 7d".to_string());
        assert_eq!(format!("{}", error), "Invalid request: unsupported period: 7d");

        let error = MarketDataError::Provider {
            provider: "YAHOO".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: YAHOO - connection reset");
    }
}
