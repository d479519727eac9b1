//! Availability polling and page-state classification.
//!
//! Each poll tick classifies the event page from its markers, in strict
//! precedence order — a sold-out marker dominates everything else, then a
//! preparing marker, then the absence of the purchase-entry control.
//! Only a page with none of those obstacles classifies as
//! [`Availability::Available`].
//!
//! Refreshing between ticks optionally adds a small uniform jitter so the
//! site never sees perfectly periodic requests.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::browser::{Browser, By};
use crate::config::RunConfig;
use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Text shown on the event page when a ticket type is sold out.
pub(crate) const SOLD_OUT_MARKER: &str = "已售完";

/// Text shown while a ticket type is not yet on sale.
pub(crate) const PREPARING_MARKER: &str = "準備中";

/// Class of the control that enters the purchase funnel.
pub(crate) const PURCHASE_ENTRY_CLASS: &str = "btn-point";

/// Bounded wait for the page body after a reload.
const PAGE_LOAD_WAIT: Duration = Duration::from_secs(10);

/// Jitter bounds applied before a refresh, milliseconds.
const JITTER_MIN_MS: u64 = 500;
const JITTER_MAX_MS: u64 = 2000;

/// Builds the XPath probe for a visible text marker.
fn text_marker(marker: &str) -> By {
    By::xpath(format!("//*[contains(text(), '{marker}')]"))
}

// ============================================================================
// Availability
// ============================================================================

/// Per-tick classification of the event page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// No check has completed yet, or the last check errored non-fatally.
    Unknown,
    /// Tickets cannot be purchased on this tick.
    Unavailable,
    /// The purchase-entry control is present and no blocking marker is.
    Available,
}

// ============================================================================
// PollState
// ============================================================================

/// Mutable state of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    /// Refreshes consumed so far; never exceeds the configured cap.
    pub refresh_count: u32,
    /// Result of the most recent classification.
    pub classification: Availability,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            refresh_count: 0,
            classification: Availability::Unknown,
        }
    }
}

// ============================================================================
// AvailabilityPoller
// ============================================================================

/// Classifies the event page and refreshes it between ticks.
pub struct AvailabilityPoller<B: Browser> {
    browser: Arc<B>,
    config: RunConfig,
}

impl<B: Browser> AvailabilityPoller<B> {
    /// Creates a poller over the run's browser handle.
    pub fn new(browser: Arc<B>, config: RunConfig) -> Self {
        Self { browser, config }
    }

    /// Classifies the current page.
    ///
    /// Precedence: sold-out marker, then preparing marker, then missing
    /// purchase-entry control — each forces `Unavailable`. A non-fatal
    /// engine error during the check yields `Unknown`, which the loop
    /// treats like `Unavailable`.
    ///
    /// # Errors
    ///
    /// Only fatal driver errors propagate.
    pub async fn classify(&self) -> Result<Availability> {
        match self.try_classify().await {
            Ok(availability) => {
                debug!(?availability, "page classified");
                Ok(availability)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(error = %e, "availability check failed");
                Ok(Availability::Unknown)
            }
        }
    }

    async fn try_classify(&self) -> Result<Availability> {
        let sold_out = self
            .browser
            .find_elements(&text_marker(SOLD_OUT_MARKER))
            .await?;
        if !sold_out.is_empty() {
            return Ok(Availability::Unavailable);
        }

        let preparing = self
            .browser
            .find_elements(&text_marker(PREPARING_MARKER))
            .await?;
        if !preparing.is_empty() {
            return Ok(Availability::Unavailable);
        }

        let entries = self
            .browser
            .find_elements(&By::class(PURCHASE_ENTRY_CLASS))
            .await?;
        if entries.is_empty() {
            return Ok(Availability::Unavailable);
        }

        Ok(Availability::Available)
    }

    /// Checks the keyword filter against the rendered page.
    ///
    /// Vacuously true when no keyword is configured.
    pub async fn keyword_matches(&self) -> Result<bool> {
        let Some(keyword) = self.config.keyword() else {
            return Ok(true);
        };
        let source = self.browser.page_source().await?;
        Ok(source.contains(keyword))
    }

    /// Reloads the page and waits for the body to be present.
    ///
    /// When jitter is enabled, sleeps a uniform random 0.5–2.0 s first.
    ///
    /// # Errors
    ///
    /// [`Error::Navigation`](crate::Error::Navigation) when the body never
    /// appears within its bounded wait; non-fatal to the run.
    pub async fn refresh_page(&self) -> Result<()> {
        if self.config.jitter {
            let jitter_ms = {
                let mut rng = rand::rng();
                rng.random_range(JITTER_MIN_MS..=JITTER_MAX_MS)
            };
            sleep(Duration::from_millis(jitter_ms)).await;
        }
        self.browser.refresh().await?;
        self.browser
            .wait_for_element(&By::tag("body"), PAGE_LOAD_WAIT)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
