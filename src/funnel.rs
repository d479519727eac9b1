//! The purchase funnel.
//!
//! Once a tick classifies the page as available, the funnel drives the
//! purchase form through five strictly ordered steps, each with its own
//! bounded wait. The funnel is not transactional: a failed step is
//! reported and the remaining steps still run, because the later controls
//! are sometimes reachable even when an earlier one changed its markup.
//! Nothing retries inside one availability window; the next attempt comes
//! only after the poller re-detects availability.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::browser::{Browser, By, ELEMENT_WAIT, Element};
use crate::control::ControlSurface;
use crate::error::{Error, Result};
use crate::poll::PURCHASE_ENTRY_CLASS;
use crate::status::StatusReporter;

// ============================================================================
// Constants
// ============================================================================

/// Quantity input on the ticket-selection form.
const QUANTITY_FIELD_CLASS: &str = "ng-pristine";

/// Terms-agreement checkbox.
const TERMS_CHECKBOX_ID: &str = "person_agree_terms";

/// Proceed control on the ticket-selection form.
const PROCEED_SELECTOR: &str = ".btn.btn-primary.btn-lg";

/// Final confirm-order control.
const CONFIRM_SELECTOR: &str = ".btn.btn-primary.btn-lg.ng-binding.ng-isolate-scope";

/// Synthetic notification dispatched after assigning the quantity.
///
/// The form's reactive validation ignores programmatic value assignment
/// unless an input event bubbles from the field. Site-specific contract;
/// brittle against markup changes, kept verbatim.
const INPUT_CHANGED_SCRIPT: &str = "\
var element = arguments[0];
var evt = new Event('input', { bubbles: true });
element.dispatchEvent(evt);";

// ============================================================================
// FunnelStep
// ============================================================================

/// One step of the purchase funnel, executed strictly in [`ALL`](Self::ALL)
/// order — no skipping, no per-step retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunnelStep {
    /// Activate the purchase-entry control.
    EnterPurchasePage,
    /// Assign the configured ticket count and notify the form.
    SetQuantity,
    /// Activate the terms-agreement control.
    AcceptTerms,
    /// Activate the proceed control.
    ProceedNext,
    /// Activate the final confirm-order control.
    ConfirmOrder,
}

impl FunnelStep {
    /// Every step, in execution order.
    pub const ALL: [FunnelStep; 5] = [
        Self::EnterPurchasePage,
        Self::SetQuantity,
        Self::AcceptTerms,
        Self::ProceedNext,
        Self::ConfirmOrder,
    ];

    /// Human label used in status and log lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::EnterPurchasePage => "purchase entry",
            Self::SetQuantity => "quantity",
            Self::AcceptTerms => "terms agreement",
            Self::ProceedNext => "proceed",
            Self::ConfirmOrder => "confirm order",
        }
    }
}

impl std::fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// FunnelReport
// ============================================================================

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// The step that ran.
    pub step: FunnelStep,
    /// The failure message, `None` on success.
    pub error: Option<String>,
}

impl StepReport {
    /// Returns `true` if the step succeeded.
    #[inline]
    #[must_use]
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one funnel attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunnelReport {
    /// Per-step outcomes, in execution order.
    pub steps: Vec<StepReport>,
    /// True when a stop request cut the attempt short.
    pub aborted: bool,
}

impl FunnelReport {
    /// Returns `true` when every step ran and succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.aborted
            && self.steps.len() == FunnelStep::ALL.len()
            && self.steps.iter().all(StepReport::ok)
    }
}

// ============================================================================
// PurchaseFunnel
// ============================================================================

/// Drives the five purchase-form steps.
pub struct PurchaseFunnel<B: Browser> {
    browser: Arc<B>,
    quantity: u8,
    control: ControlSurface,
    status: StatusReporter,
}

impl<B: Browser> PurchaseFunnel<B> {
    /// Creates a funnel over the run's browser handle.
    pub fn new(
        browser: Arc<B>,
        quantity: u8,
        control: ControlSurface,
        status: StatusReporter,
    ) -> Self {
        Self {
            browser,
            quantity,
            control,
            status,
        }
    }

    /// Executes all steps in order.
    ///
    /// A failed step is reported and the remaining steps still run; a stop
    /// request observed between steps aborts the remainder.
    ///
    /// # Errors
    ///
    /// Only fatal driver errors propagate; step failures land in the
    /// returned [`FunnelReport`].
    pub async fn execute(&self) -> Result<FunnelReport> {
        let mut report = FunnelReport::default();

        for step in FunnelStep::ALL {
            if !self.control.is_running() {
                self.status.emit("stop requested, funnel aborted");
                report.aborted = true;
                break;
            }

            match self.run_step(step).await {
                Ok(()) => {
                    debug!(step = %step, "funnel step succeeded");
                    report.steps.push(StepReport { step, error: None });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    let wrapped = Error::funnel_step(step, e.to_string());
                    warn!(step = %step, error = %e, "funnel step failed");
                    self.status.emit(wrapped.to_string());
                    report.steps.push(StepReport {
                        step,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded(),
            aborted = report.aborted,
            "funnel attempt finished"
        );
        Ok(report)
    }

    async fn run_step(&self, step: FunnelStep) -> Result<()> {
        match step {
            FunnelStep::EnterPurchasePage => {
                let entry = self
                    .browser
                    .wait_for_clickable(&By::class(PURCHASE_ENTRY_CLASS), ELEMENT_WAIT)
                    .await?;
                entry.click().await?;
                self.status.emit("purchase entry clicked");
            }
            FunnelStep::SetQuantity => {
                let field = self
                    .browser
                    .wait_for_element(&By::class(QUANTITY_FIELD_CLASS), ELEMENT_WAIT)
                    .await?;
                field
                    .execute_script(&format!("arguments[0].value = '{}'", self.quantity))
                    .await?;
                self.status.emit(format!("quantity set to {}", self.quantity));
                field.execute_script(INPUT_CHANGED_SCRIPT).await?;
            }
            FunnelStep::AcceptTerms => {
                let checkbox = self
                    .browser
                    .wait_for_clickable(&By::id(TERMS_CHECKBOX_ID), ELEMENT_WAIT)
                    .await?;
                checkbox.click().await?;
                self.status.emit("terms accepted");
            }
            FunnelStep::ProceedNext => {
                let proceed = self
                    .browser
                    .wait_for_clickable(&By::css(PROCEED_SELECTOR), ELEMENT_WAIT)
                    .await?;
                proceed.click().await?;
                self.status.emit("proceed clicked");
            }
            FunnelStep::ConfirmOrder => {
                let confirm = self
                    .browser
                    .wait_for_clickable(&By::css(CONFIRM_SELECTOR), ELEMENT_WAIT)
                    .await?;
                confirm.click().await?;
                self.status.emit("order confirmed");
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::mock::{MockBrowser, MockEvent, PageFixture};

    fn funnel(mock: &MockBrowser, quantity: u8, control: &ControlSurface) -> PurchaseFunnel<MockBrowser> {
        let (status, _rx) = StatusReporter::channel();
        PurchaseFunnel::new(Arc::new(mock.clone()), quantity, control.clone(), status)
    }

    #[tokio::test]
    async fn test_all_steps_run_in_order() {
        let mock = MockBrowser::new(vec![PageFixture::available()]);
        let control = ControlSurface::new();

        let report = funnel(&mock, 2, &control).execute().await.unwrap();
        assert!(report.succeeded());

        assert_eq!(
            mock.clicks(),
            vec![
                PURCHASE_ENTRY_CLASS.to_string(),
                TERMS_CHECKBOX_ID.to_string(),
                PROCEED_SELECTOR.to_string(),
                CONFIRM_SELECTOR.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_quantity_assignment_dispatches_input_event() {
        let mock = MockBrowser::new(vec![PageFixture::available()]);
        let control = ControlSurface::new();

        funnel(&mock, 4, &control).execute().await.unwrap();

        let scripts: Vec<MockEvent> = mock
            .events()
            .into_iter()
            .filter(|e| matches!(e, MockEvent::Script(Some(_), _)))
            .collect();
        assert_eq!(
            scripts,
            vec![
                MockEvent::Script(
                    Some(QUANTITY_FIELD_CLASS.to_string()),
                    "arguments[0].value = '4'".to_string()
                ),
                MockEvent::Script(
                    Some(QUANTITY_FIELD_CLASS.to_string()),
                    INPUT_CHANGED_SCRIPT.to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_step_does_not_abort_remaining_steps() {
        let mock =
            MockBrowser::new(vec![PageFixture::available().without(TERMS_CHECKBOX_ID)]);
        let control = ControlSurface::new();

        let report = funnel(&mock, 1, &control).execute().await.unwrap();
        assert!(!report.succeeded());
        assert_eq!(report.steps.len(), FunnelStep::ALL.len());

        let failed: Vec<FunnelStep> = report
            .steps
            .iter()
            .filter(|s| !s.ok())
            .map(|s| s.step)
            .collect();
        assert_eq!(failed, vec![FunnelStep::AcceptTerms]);

        // Steps 4 and 5 still clicked their controls.
        let clicks = mock.clicks();
        assert!(clicks.contains(&PROCEED_SELECTOR.to_string()));
        assert!(clicks.contains(&CONFIRM_SELECTOR.to_string()));
    }

    #[tokio::test]
    async fn test_stop_between_steps_aborts_remainder() {
        let mock = MockBrowser::new(vec![PageFixture::available()]);
        let control = ControlSurface::new();
        control.stop();

        let report = funnel(&mock, 1, &control).execute().await.unwrap();
        assert!(report.aborted);
        assert!(report.steps.is_empty());
        assert!(mock.clicks().is_empty());
    }

    #[tokio::test]
    async fn test_fatal_error_propagates() {
        let mock = MockBrowser::new(vec![PageFixture::available().fatal_waits()]);
        let control = ControlSurface::new();

        let err = funnel(&mock, 1, &control).execute().await.unwrap_err();
        assert!(err.is_fatal());
    }
}
