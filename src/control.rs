//! Cooperative pause/resume/stop control.
//!
//! A [`ControlSurface`] is the only state shared between the worker task and
//! the outside caller. The caller flips flags from its own thread of
//! control; the worker observes them at the top of every poll tick and
//! between funnel steps. Visibility is bounded by the tick, not immediate:
//! a `stop()` issued during an in-flight bounded wait takes effect after
//! that wait resolves.
//!
//! # Example
//!
//! ```
//! use kktix_sniper::ControlSurface;
//!
//! let control = ControlSurface::new();
//! let worker_view = control.clone();
//!
//! assert!(control.pause());      // paused
//! assert!(!control.pause());     // resumed
//! control.stop();                // terminal
//! assert!(!worker_view.is_running());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// Types
// ============================================================================

/// Shared flag storage.
struct Flags {
    /// False once the run is stopped; never becomes true again.
    running: AtomicBool,
    /// True while the worker should idle without consuming refreshes.
    paused: AtomicBool,
}

// ============================================================================
// ControlSurface
// ============================================================================

/// Pause/resume/stop handle shared between the worker and external callers.
///
/// Cloning is cheap; all clones observe the same flags.
#[derive(Clone)]
pub struct ControlSurface {
    inner: Arc<Flags>,
}

impl ControlSurface {
    /// Creates a surface for a run that is running and not paused.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Flags {
                running: AtomicBool::new(true),
                paused: AtomicBool::new(false),
            }),
        }
    }

    /// Toggles the paused flag and returns the new value.
    ///
    /// A stopped run stays stopped regardless of the paused flag; `stop`
    /// supersedes pause.
    pub fn pause(&self) -> bool {
        // fetch_xor returns the previous value.
        !self.inner.paused.fetch_xor(true, Ordering::SeqCst)
    }

    /// Stops the run and clears the paused flag.
    ///
    /// Terminal: no API re-arms a stopped surface.
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.paused.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while the run has not been stopped.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Returns `true` while the run is paused.
    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ControlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSurface")
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
