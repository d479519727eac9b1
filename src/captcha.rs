//! Image recognition capability.
//!
//! The sign-in and purchase flows driven by this crate never encounter an
//! image challenge, so nothing in the main control flow calls a solver.
//! The trait exists so an embedder can hand the worker a recognizer at
//! construction without changing the worker's seam.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;

// ============================================================================
// CaptchaSolver
// ============================================================================

/// Recognizes the text in a challenge image.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    /// Returns the decoded text for an encoded image.
    async fn solve(&self, image: &[u8]) -> Result<String>;
}
