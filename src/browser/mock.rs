//! Scripted fake engine for tests.
//!
//! A [`MockBrowser`] serves a fixed sequence of [`PageFixture`]s: each
//! `refresh()` advances to the next fixture and the last one repeats.
//! Every interaction is recorded as a [`MockEvent`] so tests can assert
//! click order, typed text, and scripts, and `close()` calls are counted
//! to verify the handle is released exactly once.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::poll::{PREPARING_MARKER, PURCHASE_ENTRY_CLASS, SOLD_OUT_MARKER};
use crate::session::{LOGIN_BUTTON_CLASS, PASSWORD_FIELD_ID, USERNAME_FIELD_ID};

use super::{Browser, By, Element};

// ============================================================================
// PageFixture
// ============================================================================

/// Markers and controls present on one rendering of the event page.
#[derive(Debug, Clone)]
pub(crate) struct PageFixture {
    /// A sold-out marker is visible.
    pub sold_out: bool,
    /// A preparing marker is visible.
    pub preparing: bool,
    /// The purchase-entry control is present.
    pub purchase_entry: bool,
    /// Full rendered page content.
    pub source: String,
    /// Selector values whose bounded waits fail on this page.
    pub missing: Vec<&'static str>,
    /// Bounded waits on this page fail with a fatal driver error.
    pub fatal_waits: bool,
}

impl PageFixture {
    /// A page with the purchase-entry control and no blocking markers.
    pub fn available() -> Self {
        Self {
            sold_out: false,
            preparing: false,
            purchase_entry: true,
            source: "tickets on sale".to_string(),
            missing: Vec::new(),
            fatal_waits: false,
        }
    }

    /// A page with no markers and no purchase-entry control.
    pub fn unavailable() -> Self {
        Self {
            sold_out: false,
            preparing: false,
            purchase_entry: false,
            source: "nothing here".to_string(),
            missing: Vec::new(),
            fatal_waits: false,
        }
    }

    /// Replaces the rendered page content.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Makes bounded waits for the given selector value fail.
    pub fn without(mut self, selector: &'static str) -> Self {
        self.missing.push(selector);
        self
    }

    /// Makes every bounded wait on this page fail fatally.
    pub fn fatal_waits(mut self) -> Self {
        self.fatal_waits = true;
        self
    }
}

// ============================================================================
// MockEvent
// ============================================================================

/// One recorded interaction with the fake engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MockEvent {
    Goto(String),
    Refresh,
    Click(String),
    Keys(String, String),
    Script(Option<String>, String),
}

// ============================================================================
// MockBrowser
// ============================================================================

#[derive(Debug)]
struct MockState {
    pages: Mutex<Vec<PageFixture>>,
    cursor: AtomicUsize,
    url: Mutex<String>,
    reject_login: bool,
    closed: AtomicUsize,
    events: Mutex<Vec<MockEvent>>,
}

/// Scripted [`Browser`] implementation.
///
/// Clones share state, so tests keep one clone for assertions and hand
/// another to the worker.
#[derive(Debug, Clone)]
pub(crate) struct MockBrowser {
    state: Arc<MockState>,
}

impl MockBrowser {
    /// Creates a browser that serves the given page sequence and accepts
    /// any credentials.
    pub fn new(pages: Vec<PageFixture>) -> Self {
        Self::build(pages, false)
    }

    /// Creates a browser that keeps the sign-in URL after submit.
    pub fn rejecting_login(pages: Vec<PageFixture>) -> Self {
        Self::build(pages, true)
    }

    fn build(pages: Vec<PageFixture>, reject_login: bool) -> Self {
        Self {
            state: Arc::new(MockState {
                pages: Mutex::new(pages),
                cursor: AtomicUsize::new(0),
                url: Mutex::new("about:blank".to_string()),
                reject_login,
                closed: AtomicUsize::new(0),
                events: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the page currently served.
    fn current_page(&self) -> PageFixture {
        let pages = self.state.pages.lock();
        if pages.is_empty() {
            return PageFixture::unavailable();
        }
        let idx = self.state.cursor.load(Ordering::SeqCst).min(pages.len() - 1);
        pages[idx].clone()
    }

    fn record(&self, event: MockEvent) {
        self.state.events.lock().push(event);
    }

    fn element(&self, selector: &str) -> MockElement {
        MockElement {
            selector: selector.to_string(),
            state: Arc::clone(&self.state),
        }
    }

    /// How many times `close()` has been called.
    pub fn close_count(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Every recorded interaction, in order.
    pub fn events(&self) -> Vec<MockEvent> {
        self.state.events.lock().clone()
    }

    /// Selector values of all recorded clicks, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MockEvent::Click(selector) => Some(selector),
                _ => None,
            })
            .collect()
    }

    /// How many refreshes the worker performed.
    pub fn refresh_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, MockEvent::Refresh))
            .count()
    }

    fn wait(&self, by: &By, timeout: Duration) -> Result<MockElement> {
        let page = self.current_page();
        if page.missing.iter().any(|m| *m == by.value()) {
            return Err(Error::navigation(
                format!("wait({by})"),
                timeout.as_millis() as u64,
            ));
        }
        // The sign-in form lives outside the event-page fixtures.
        let sign_in_form = [USERNAME_FIELD_ID, PASSWORD_FIELD_ID, LOGIN_BUTTON_CLASS];
        if sign_in_form.iter().any(|s| *s == by.value()) {
            return Ok(self.element(by.value()));
        }
        if page.fatal_waits {
            return Err(Error::fatal_driver("browser handle lost"));
        }
        if matches!(by, By::Class(c) if c == PURCHASE_ENTRY_CLASS) && !page.purchase_entry {
            return Err(Error::navigation(
                format!("wait({by})"),
                timeout.as_millis() as u64,
            ));
        }
        Ok(self.element(by.value()))
    }
}

#[async_trait]
impl Browser for MockBrowser {
    type Elem = MockElement;

    async fn goto(&self, url: &str) -> Result<()> {
        self.record(MockEvent::Goto(url.to_string()));
        *self.state.url.lock() = url.to_string();
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.record(MockEvent::Refresh);
        self.state.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.url.lock().clone())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.current_page().source)
    }

    async fn find_elements(&self, by: &By) -> Result<Vec<Self::Elem>> {
        let page = self.current_page();
        let found = match by {
            By::XPath(expr) if expr.contains(SOLD_OUT_MARKER) => page.sold_out,
            By::XPath(expr) if expr.contains(PREPARING_MARKER) => page.preparing,
            By::Class(class) if class == PURCHASE_ENTRY_CLASS => page.purchase_entry,
            By::Tag(tag) if tag == "body" => true,
            _ => false,
        };
        Ok(if found {
            vec![self.element(by.value())]
        } else {
            Vec::new()
        })
    }

    async fn wait_for_element(&self, by: &By, timeout: Duration) -> Result<Self::Elem> {
        self.wait(by, timeout)
    }

    async fn wait_for_clickable(&self, by: &By, timeout: Duration) -> Result<Self::Elem> {
        self.wait(by, timeout)
    }

    async fn execute_script(&self, script: &str) -> Result<Value> {
        self.record(MockEvent::Script(None, script.to_string()));
        Ok(Value::Null)
    }

    async fn close(&self) -> Result<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// MockElement
// ============================================================================

/// Element handle produced by [`MockBrowser`].
pub(crate) struct MockElement {
    selector: String,
    state: Arc<MockState>,
}

#[async_trait]
impl Element for MockElement {
    async fn click(&self) -> Result<()> {
        self.state
            .events
            .lock()
            .push(MockEvent::Click(self.selector.clone()));
        // Submitting the sign-in form moves off the sign-in URL unless the
        // fixture rejects the credentials.
        if self.selector == LOGIN_BUTTON_CLASS && !self.state.reject_login {
            *self.state.url.lock() = "https://kktix.com/account".to_string();
        }
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.state
            .events
            .lock()
            .push(MockEvent::Keys(self.selector.clone(), text.to_string()));
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        Ok(String::new())
    }

    async fn execute_script(&self, script: &str) -> Result<Value> {
        self.state
            .events
            .lock()
            .push(MockEvent::Script(Some(self.selector.clone()), script.to_string()));
        Ok(Value::Null)
    }
}
