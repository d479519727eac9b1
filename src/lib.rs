//! KKTIX Sniper - automated event-ticket acquisition.
//!
//! This library polls a KKTIX event page until tickets become purchasable,
//! then drives the multi-step purchase form faster than a human would
//! notice availability.
//!
//! # Architecture
//!
//! The core is an acquisition state machine running on one dedicated
//! worker task:
//!
//! - **Authenticate** — [`SessionManager`] signs in and verifies the
//!   browser left the sign-in page
//! - **Poll** — [`AvailabilityPoller`] classifies the event page each
//!   tick (sold-out and preparing markers dominate, then the presence of
//!   the purchase-entry control) and refreshes with jitter between ticks
//! - **Purchase** — [`PurchaseFunnel`] runs the five form steps strictly
//!   in order, reporting each failure without aborting the rest
//! - **Control** — [`ControlSurface`] flags are read at the top of every
//!   tick and between funnel steps (cooperative, never preemptive)
//! - **Observe** — [`StatusReporter`] pushes human-readable progress
//!   lines outward without ever blocking the worker
//!
//! The browser itself is not part of this crate: the worker consumes a
//! WebDriver-style [`Browser`] trait and owns exactly one handle for the
//! run's lifetime, released exactly once on every exit path.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use kktix_sniper::{
//!     ControlSurface, Credentials, RunConfig, StatusReporter, TicketBot,
//! };
//!
//! let config = RunConfig::builder("https://kktix.com/events/example")
//!     .ticket_quantity(2)
//!     .build()?;
//! let credentials = Credentials::new("user@example.com", "secret");
//!
//! let (status, mut updates) = StatusReporter::channel();
//! let control = ControlSurface::new();
//!
//! // `engine` is any implementation of the Browser trait.
//! let bot = TicketBot::new(Arc::new(engine), config, credentials, control.clone(), status);
//! let handle = bot.spawn();
//!
//! while let Some(line) = updates.recv().await {
//!     println!("{line}");
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bot`] | The worker task: poll-and-funnel loop |
//! | [`browser`] | Consumed remote-browser traits and [`By`] selectors |
//! | [`captcha`] | Declared image-recognition capability (unused in the main flow) |
//! | [`config`] | Run configuration and credentials |
//! | [`control`] | Cooperative pause/resume/stop flags |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`funnel`] | The five-step purchase funnel |
//! | [`poll`] | Availability classification and page refresh |
//! | [`session`] | Sign-in / sign-out |
//! | [`status`] | One-directional progress channel |

// ============================================================================
// Modules
// ============================================================================

/// The worker task executing one acquisition run.
pub mod bot;

/// Consumed remote-browser control seam.
pub mod browser;

/// Declared image-recognition capability.
pub mod captcha;

/// Run configuration and credentials.
pub mod config;

/// Cooperative pause/resume/stop control.
pub mod control;

/// Error types and result alias.
pub mod error;

/// The purchase funnel.
pub mod funnel;

/// Availability polling and classification.
pub mod poll;

/// Session management.
pub mod session;

/// Progress notifications.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use bot::TicketBot;
pub use browser::{Browser, By, ELEMENT_WAIT, Element};
pub use captcha::CaptchaSolver;
pub use config::{Credentials, RunConfig, RunConfigBuilder};
pub use control::ControlSurface;
pub use error::{Error, Result};
pub use funnel::{FunnelReport, FunnelStep, PurchaseFunnel, StepReport};
pub use poll::{Availability, AvailabilityPoller, PollState};
pub use session::{Session, SessionManager};
pub use status::StatusReporter;
