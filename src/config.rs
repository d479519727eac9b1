//! Run configuration and credentials.
//!
//! A [`RunConfig`] describes one acquisition run and is immutable once the
//! run starts. Build one through [`RunConfig::builder`], which validates
//! every field:
//!
//! ```
//! use std::time::Duration;
//! use kktix_sniper::RunConfig;
//!
//! # fn example() -> kktix_sniper::Result<()> {
//! let config = RunConfig::builder("https://kktix.com/events/example")
//!     .ticket_quantity(2)
//!     .keyword("VIP")
//!     .refresh_interval(Duration::from_secs(3))
//!     .max_refresh_count(500)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default cap on page refreshes before the run gives up.
pub const DEFAULT_MAX_REFRESH_COUNT: u32 = 1000;

/// Default pause between availability checks.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Tickets per order accepted by the purchase form.
const QUANTITY_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Refresh interval bounds in whole seconds.
const INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=60;

// ============================================================================
// RunConfig
// ============================================================================

/// Configuration for one acquisition run.
///
/// Immutable once a run starts; the worker receives it by value at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Event page to poll.
    pub event_url: String,

    /// Tickets to request once the purchase form opens (1..=10).
    pub ticket_quantity: u8,

    /// Optional substring the rendered page must contain before the funnel
    /// runs. `None` disables filtering.
    pub keyword: Option<String>,

    /// Pause between availability checks (1..=60 seconds).
    pub refresh_interval: Duration,

    /// Upper bound on page refreshes before the run stops.
    pub max_refresh_count: u32,

    /// Add a small random delay before each refresh to avoid perfectly
    /// periodic request timing.
    pub jitter: bool,
}

impl RunConfig {
    /// Starts building a configuration for the given event page.
    #[inline]
    pub fn builder(event_url: impl Into<String>) -> RunConfigBuilder {
        RunConfigBuilder::new(event_url)
    }

    /// Returns the keyword filter, `None` when filtering is disabled.
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }
}

// ============================================================================
// RunConfigBuilder
// ============================================================================

/// Builder for [`RunConfig`] with validation on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    event_url: String,
    ticket_quantity: u8,
    keyword: Option<String>,
    refresh_interval: Duration,
    max_refresh_count: u32,
    jitter: bool,
}

impl RunConfigBuilder {
    /// Creates a builder with defaults: one ticket, no keyword, 5 s
    /// interval, 1000 refreshes, jitter enabled.
    pub fn new(event_url: impl Into<String>) -> Self {
        Self {
            event_url: event_url.into(),
            ticket_quantity: 1,
            keyword: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_refresh_count: DEFAULT_MAX_REFRESH_COUNT,
            jitter: true,
        }
    }

    /// Sets the number of tickets to request (1..=10).
    #[inline]
    #[must_use]
    pub fn ticket_quantity(mut self, quantity: u8) -> Self {
        self.ticket_quantity = quantity;
        self
    }

    /// Sets the keyword filter. An empty string disables filtering.
    #[inline]
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Sets the pause between availability checks (1..=60 seconds).
    #[inline]
    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the maximum number of page refreshes before the run stops.
    #[inline]
    #[must_use]
    pub fn max_refresh_count(mut self, count: u32) -> Self {
        self.max_refresh_count = count;
        self
    }

    /// Enables or disables pre-refresh jitter.
    #[inline]
    #[must_use]
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL is empty or unparseable, the
    /// ticket quantity is outside 1..=10, the refresh interval is outside
    /// 1..=60 seconds, or the refresh cap is zero.
    pub fn build(self) -> Result<RunConfig> {
        if self.event_url.is_empty() {
            return Err(Error::config("event URL must not be empty"));
        }
        Url::parse(&self.event_url)
            .map_err(|e| Error::config(format!("invalid event URL '{}': {e}", self.event_url)))?;

        if !QUANTITY_RANGE.contains(&self.ticket_quantity) {
            return Err(Error::config(format!(
                "ticket quantity {} outside {}..={}",
                self.ticket_quantity,
                QUANTITY_RANGE.start(),
                QUANTITY_RANGE.end()
            )));
        }

        let secs = self.refresh_interval.as_secs();
        if !INTERVAL_RANGE.contains(&secs) || self.refresh_interval.subsec_nanos() != 0 {
            return Err(Error::config(format!(
                "refresh interval {:?} outside {}..={} seconds",
                self.refresh_interval,
                INTERVAL_RANGE.start(),
                INTERVAL_RANGE.end()
            )));
        }

        if self.max_refresh_count == 0 {
            return Err(Error::config("max refresh count must be at least 1"));
        }

        // Empty keyword behaves like no keyword.
        let keyword = self.keyword.filter(|k| !k.is_empty());

        Ok(RunConfig {
            event_url: self.event_url,
            ticket_quantity: self.ticket_quantity,
            keyword,
            refresh_interval: self.refresh_interval,
            max_refresh_count: self.max_refresh_count,
            jitter: self.jitter,
        })
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Account credentials, resolved by the external credential store.
///
/// Opaque to the core: this crate never reads or writes the store itself,
/// it only forwards the values into the sign-in form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username or e-mail address.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from already-resolved values.
    #[inline]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    /// Never prints the password.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
