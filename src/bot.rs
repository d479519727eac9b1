//! The acquisition worker.
//!
//! One [`TicketBot`] drives one run on a dedicated task: authenticate,
//! poll the event page until tickets become purchasable, run the purchase
//! funnel, repeat until stopped. The task owns the browser handle
//! exclusively for the run's lifetime; the outside world reaches it only
//! through a [`ControlSurface`] (inward flags) and a [`StatusReporter`]
//! channel (outward progress) — the worker never blocks on either.
//!
//! # Example
//!
//! ```ignore
//! let (status, mut updates) = StatusReporter::channel();
//! let control = ControlSurface::new();
//!
//! let bot = TicketBot::new(browser, config, credentials, control.clone(), status);
//! let handle = bot.spawn();
//!
//! while let Some(line) = updates.recv().await {
//!     println!("{line}");
//! }
//! control.stop();
//! handle.await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::Browser;
use crate::captcha::CaptchaSolver;
use crate::config::{Credentials, RunConfig};
use crate::control::ControlSurface;
use crate::error::Result;
use crate::funnel::PurchaseFunnel;
use crate::poll::{Availability, AvailabilityPoller, PollState};
use crate::session::SessionManager;
use crate::status::StatusReporter;

// ============================================================================
// Constants
// ============================================================================

/// Sleep between flag checks while paused.
const PAUSE_POLL: Duration = Duration::from_secs(1);

/// Settle delay after a funnel attempt, before polling resumes.
const POST_FUNNEL_SETTLE: Duration = Duration::from_secs(5);

// ============================================================================
// TicketBot
// ============================================================================

/// The worker that executes one acquisition run.
pub struct TicketBot<B: Browser> {
    browser: Arc<B>,
    config: RunConfig,
    credentials: Credentials,
    control: ControlSurface,
    status: StatusReporter,
    /// Declared capability; nothing in the run invokes it.
    #[allow(dead_code)]
    solver: Option<Arc<dyn CaptchaSolver>>,
}

impl<B: Browser> TicketBot<B> {
    /// Creates a worker for one run.
    pub fn new(
        browser: Arc<B>,
        config: RunConfig,
        credentials: Credentials,
        control: ControlSurface,
        status: StatusReporter,
    ) -> Self {
        Self {
            browser,
            config,
            credentials,
            control,
            status,
            solver: None,
        }
    }

    /// Attaches an image-recognition capability.
    ///
    /// The site flows driven here never present a challenge, so the run
    /// does not call the solver; the slot exists for embedders.
    #[must_use]
    pub fn with_solver(mut self, solver: Arc<dyn CaptchaSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Moves the worker onto a dedicated task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Executes the run to completion.
    ///
    /// On every exit path — normal stop, max-refresh exhaustion, or fatal
    /// error — the browser handle is released exactly once.
    pub async fn run(self) {
        if let Err(e) = self.drive().await {
            error!(error = %e, "run aborted");
            self.status.emit(format!("fatal error: {e}"));
        }

        // The single release point for the run's browser handle.
        match self.browser.close().await {
            Ok(()) => self.status.emit("browser released"),
            Err(e) => {
                warn!(error = %e, "failed to release browser handle");
                self.status.emit(format!("failed to release browser: {e}"));
            }
        }
    }

    /// Authenticates and runs the poll-and-funnel loop.
    async fn drive(&self) -> Result<()> {
        let manager = SessionManager::new(Arc::clone(&self.browser), self.status.clone());
        let session = manager.login(&self.credentials).await?;
        debug!(
            authenticated = session.is_authenticated(),
            "session established"
        );

        self.browser.goto(&self.config.event_url).await?;

        let poller = AvailabilityPoller::new(Arc::clone(&self.browser), self.config.clone());
        let funnel = PurchaseFunnel::new(
            Arc::clone(&self.browser),
            self.config.ticket_quantity,
            self.control.clone(),
            self.status.clone(),
        );

        let mut state = PollState::default();
        let mut pause_announced = false;

        loop {
            if !self.control.is_running() {
                self.status.emit("stopped");
                break;
            }

            if self.control.is_paused() {
                if !pause_announced {
                    self.status.emit("paused");
                    pause_announced = true;
                }
                sleep(PAUSE_POLL).await;
                continue;
            }
            pause_announced = false;

            if state.refresh_count >= self.config.max_refresh_count {
                self.status.emit("max refreshes reached, stopping");
                break;
            }

            state.classification = poller.classify().await?;

            if state.classification != Availability::Available {
                state.refresh_count += 1;
                self.status
                    .emit(format!("no tickets yet, refresh #{}", state.refresh_count));
                self.sleep_and_refresh(&poller).await?;
                continue;
            }

            self.status.emit("tickets found");

            if !self.keyword_satisfied(&poller).await? {
                // A demoted tick consumes a refresh like any unavailable one.
                state.refresh_count += 1;
                self.status.emit(format!(
                    "keyword not found: {}",
                    self.config.keyword().unwrap_or_default()
                ));
                self.sleep_and_refresh(&poller).await?;
                continue;
            }

            let report = funnel.execute().await?;
            info!(
                succeeded = report.succeeded(),
                aborted = report.aborted,
                "funnel attempt recorded"
            );
            sleep(POST_FUNNEL_SETTLE).await;
        }

        Ok(())
    }

    /// Sleeps out the refresh interval, then reloads the page.
    ///
    /// A failed reload is reported and the loop moves on; only fatal
    /// driver errors propagate.
    async fn sleep_and_refresh(&self, poller: &AvailabilityPoller<B>) -> Result<()> {
        sleep(self.config.refresh_interval).await;
        match poller.refresh_page().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(error = %e, "page refresh failed");
                self.status.emit(format!("page refresh failed: {e}"));
                Ok(())
            }
        }
    }

    /// Applies the keyword filter; engine trouble counts as a miss.
    async fn keyword_satisfied(&self, poller: &AvailabilityPoller<B>) -> Result<bool> {
        match poller.keyword_matches().await {
            Ok(matched) => Ok(matched),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(error = %e, "keyword check failed");
                self.status.emit(format!("keyword check failed: {e}"));
                Ok(false)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
