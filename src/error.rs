//! Error types for the ticket acquisition bot.
//!
//! All fallible operations return [`Result<T>`] which uses [`enum@Error`].
//!
//! # Error Categories
//!
//! | Category | Variants | Run impact |
//! |----------|----------|------------|
//! | Configuration | [`Error::Config`] | run never starts |
//! | Authentication | [`Error::Auth`], [`Error::Logout`] | `Auth` aborts the run |
//! | Navigation | [`Error::Navigation`] | loop continues via refresh |
//! | Funnel | [`Error::FunnelStep`] | remaining steps still attempted |
//! | Driver | [`Error::FatalDriver`] | run terminates, handle released |
//!
//! Non-fatal errors are surfaced on the status channel and the run keeps
//! polling; fatal errors end the run but still release the browser handle.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::funnel::FunnelStep;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant carries enough context to produce the human-readable line
/// delivered on the status channel.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Run configuration is invalid.
    ///
    /// Returned by [`RunConfigBuilder::build`](crate::config::RunConfigBuilder::build).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Authentication Errors
    // ========================================================================
    /// Sign-in failed: form missing or credentials rejected.
    ///
    /// Fatal to the run.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Description of the authentication failure.
        message: String,
    },

    /// Sign-out failed: logout control absent or not clickable.
    #[error("Logout failed: {message}")]
    Logout {
        /// Description of the logout failure.
        message: String,
    },

    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// An expected element or control did not appear within its bounded wait.
    ///
    /// Non-fatal during polling; the loop continues via the normal
    /// refresh/sleep path.
    #[error("Timed out after {timeout_ms}ms: {operation}")]
    Navigation {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before giving up.
        timeout_ms: u64,
    },

    // ========================================================================
    // Funnel Errors
    // ========================================================================
    /// A single purchase step failed.
    ///
    /// Non-fatal to the run; the remaining steps are still attempted.
    #[error("{step} step failed: {message}")]
    FunnelStep {
        /// The step that failed.
        step: FunnelStep,
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // Driver Errors
    // ========================================================================
    /// The remote browser handle itself became unusable.
    ///
    /// Fatal; the run terminates and the handle is released.
    #[error("Fatal driver error: {message}")]
    FatalDriver {
        /// Description of the driver failure.
        message: String,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[inline]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a logout error.
    #[inline]
    pub fn logout(message: impl Into<String>) -> Self {
        Self::Logout {
            message: message.into(),
        }
    }

    /// Creates a navigation timeout error.
    #[inline]
    pub fn navigation(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Navigation {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a funnel step error.
    #[inline]
    pub fn funnel_step(step: FunnelStep, message: impl Into<String>) -> Self {
        Self::FunnelStep {
            step,
            message: message.into(),
        }
    }

    /// Creates a fatal driver error.
    #[inline]
    pub fn fatal_driver(message: impl Into<String>) -> Self {
        Self::FatalDriver {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error ends the run.
    ///
    /// Fatal errors still release the browser handle on the way out.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::FatalDriver { .. })
    }

    /// Returns `true` if the run continues past this error.
    ///
    /// Recoverable errors are reported on the status channel and the loop
    /// resumes polling; retries of availability checks are the loop's
    /// normal operation, not a retry policy.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Navigation { .. } | Self::FunnelStep { .. })
    }

    /// Returns `true` if this is a bounded-wait timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Navigation { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
