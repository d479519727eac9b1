//! Consumed remote-browser control seam.
//!
//! This crate drives a browser but never implements one: the automation
//! engine is supplied by the embedder as an implementation of [`Browser`]
//! (and its element handle type, [`Element`]) speaking a WebDriver-style
//! vocabulary — navigate, locate, click, type, execute script, bounded
//! wait.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`Browser`] | Page-level operations on the one handle a run owns |
//! | [`Element`] | Interactions with a located DOM element |
//! | [`By`] | Locator strategies |
//!
//! # Contract
//!
//! - `wait_for_element` / `wait_for_clickable` return
//!   [`Error::Navigation`](crate::Error::Navigation) when nothing matched
//!   within the timeout.
//! - Any operation returns [`Error::FatalDriver`](crate::Error::FatalDriver)
//!   once the handle itself is unusable.
//! - `close` releases the underlying handle; the worker calls it exactly
//!   once per run, on every exit path.

// ============================================================================
// Submodules
// ============================================================================

/// Element locator strategies.
pub mod selector;

#[cfg(test)]
pub(crate) mod mock;

pub use selector::By;

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Bounded wait applied to every element lookup in the site flows.
pub const ELEMENT_WAIT: Duration = Duration::from_secs(10);

// ============================================================================
// Element
// ============================================================================

/// A handle to a located DOM element.
#[async_trait]
pub trait Element: Send + Sync {
    /// Clicks the element.
    async fn click(&self) -> Result<()>;

    /// Types text into the element.
    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Returns the element's text content.
    async fn text(&self) -> Result<String>;

    /// Runs `script` with this element bound as `arguments[0]`.
    ///
    /// The purchase form's quantity field needs script-level access:
    /// assigning the value and then dispatching a synthetic input event.
    async fn execute_script(&self, script: &str) -> Result<Value>;
}

// ============================================================================
// Browser
// ============================================================================

/// Page-level operations on the remote browser handle.
///
/// One run owns exactly one handle; only the worker task touches it, so
/// implementations need interior mutability but no cross-task coordination
/// beyond `Send + Sync`.
#[async_trait]
pub trait Browser: Send + Sync + 'static {
    /// The element handle type this engine produces.
    type Elem: Element;

    /// Navigates to a URL.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Reloads the current page.
    async fn refresh(&self) -> Result<()>;

    /// Returns the current page URL.
    async fn current_url(&self) -> Result<String>;

    /// Returns the full rendered page content.
    async fn page_source(&self) -> Result<String>;

    /// Returns all elements matching the selector, possibly none.
    async fn find_elements(&self, by: &By) -> Result<Vec<Self::Elem>>;

    /// Waits until an element matching the selector is present.
    async fn wait_for_element(&self, by: &By, timeout: Duration) -> Result<Self::Elem>;

    /// Waits until an element matching the selector is clickable.
    async fn wait_for_clickable(&self, by: &By, timeout: Duration) -> Result<Self::Elem>;

    /// Runs a script in the page context.
    async fn execute_script(&self, script: &str) -> Result<Value>;

    /// Releases the underlying handle.
    async fn close(&self) -> Result<()>;
}
