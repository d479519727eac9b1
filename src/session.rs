//! KKTIX session management.
//!
//! [`SessionManager::login`] drives the sign-in form and verifies the
//! browser actually left the sign-in page; only a successful login yields a
//! [`Session`]. The purchase funnel never starts before a session exists.
//!
//! # Example
//!
//! ```ignore
//! let manager = SessionManager::new(Arc::clone(&browser), status.clone());
//! let session = manager.login(&credentials).await?;
//! assert!(session.is_authenticated());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{Browser, By, ELEMENT_WAIT, Element};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::status::StatusReporter;

// ============================================================================
// Constants
// ============================================================================

/// KKTIX sign-in page.
const SIGN_IN_URL: &str = "https://kktix.com/users/sign_in";

/// Path fragment that must be gone from the URL after a successful submit.
const SIGN_IN_PATH: &str = "sign_in";

/// Username field on the sign-in form.
pub(crate) const USERNAME_FIELD_ID: &str = "user_login";

/// Password field on the sign-in form.
pub(crate) const PASSWORD_FIELD_ID: &str = "user_password";

/// Submit control on the sign-in form.
pub(crate) const LOGIN_BUTTON_CLASS: &str = "btn-login";

/// Logout link label.
const LOGOUT_LINK_TEXT: &str = "登出";

/// Settle delay after submitting credentials, before the URL check.
const LOGIN_SETTLE: Duration = Duration::from_secs(3);

/// Settle delay after activating the logout control.
const LOGOUT_SETTLE: Duration = Duration::from_secs(2);

// ============================================================================
// Session
// ============================================================================

/// An authenticated session over the run's browser handle.
///
/// Only [`SessionManager::login`] constructs one, so holding a `Session`
/// proves the sign-in URL check passed.
#[derive(Debug)]
pub struct Session<B: Browser> {
    #[allow(dead_code)]
    browser: Arc<B>,
    authenticated: bool,
}

impl<B: Browser> Session<B> {
    /// Returns `true` for the session's whole lifetime.
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

// ============================================================================
// SessionManager
// ============================================================================

/// Signs in to and out of the target site.
pub struct SessionManager<B: Browser> {
    browser: Arc<B>,
    status: StatusReporter,
}

impl<B: Browser> SessionManager<B> {
    /// Creates a manager over the run's browser handle.
    pub fn new(browser: Arc<B>, status: StatusReporter) -> Self {
        Self { browser, status }
    }

    /// Authenticates against the target site.
    ///
    /// Navigates to the sign-in page, waits up to [`ELEMENT_WAIT`] for the
    /// username field, submits the credentials, settles, then requires the
    /// post-submit URL to have left the sign-in path.
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] when the form never appears or the URL check fails;
    /// fatal driver errors pass through unchanged.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session<B>> {
        self.browser.goto(SIGN_IN_URL).await?;
        self.status.emit("signing in to KKTIX");

        let username = self
            .wait_form_field(&By::id(USERNAME_FIELD_ID))
            .await?;
        let password = self
            .wait_form_field(&By::id(PASSWORD_FIELD_ID))
            .await?;
        let submit = self
            .wait_form_field(&By::class(LOGIN_BUTTON_CLASS))
            .await?;

        username.send_keys(&credentials.username).await?;
        password.send_keys(&credentials.password).await?;
        submit.click().await?;

        sleep(LOGIN_SETTLE).await;

        let url = self.browser.current_url().await?;
        if url.contains(SIGN_IN_PATH) {
            self.status.emit("sign in failed");
            return Err(Error::auth("still on the sign-in page after submit"));
        }

        self.status.emit("signed in");
        info!(username = %credentials.username, "session authenticated");

        Ok(Session {
            browser: Arc::clone(&self.browser),
            authenticated: true,
        })
    }

    /// Signs out of the target site.
    ///
    /// # Errors
    ///
    /// [`Error::Logout`] when the logout control is absent or not
    /// clickable; the failure is reported, never silently swallowed.
    pub async fn logout(&self, session: &Session<B>) -> Result<()> {
        debug!(authenticated = session.is_authenticated(), "signing out");

        let logout = self
            .browser
            .wait_for_clickable(&By::link_text(LOGOUT_LINK_TEXT), ELEMENT_WAIT)
            .await
            .map_err(|e| {
                if e.is_fatal() {
                    e
                } else {
                    Error::logout(format!("logout control not clickable: {e}"))
                }
            })?;
        logout.click().await?;
        sleep(LOGOUT_SETTLE).await;

        self.status.emit("signed out");
        Ok(())
    }

    /// Waits for a sign-in form field, mapping absence to [`Error::Auth`].
    async fn wait_form_field(&self, by: &By) -> Result<B::Elem> {
        self.browser
            .wait_for_element(by, ELEMENT_WAIT)
            .await
            .map_err(|e| {
                if e.is_fatal() {
                    e
                } else {
                    warn!(selector = %by, error = %e, "sign-in form field missing");
                    Error::auth(format!("sign-in form missing: {e}"))
                }
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
