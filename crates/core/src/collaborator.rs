//! Traits for the platform collaborators this library drives.
//!
//! The chat UI, the on-device language model, the image analyzer, and the
//! image generation surface are all platform-provided. The turn controller
//! only ever talks to them through these traits, so tests can substitute
//! mocks and the embedding application can plug in whatever the platform
//! offers.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{GeneratorError, SurfaceError};

/// The downstream text generator (an on-device language-model session).
///
/// A session accumulates context across calls; `reset` drops that context
/// and starts fresh (the session is re-creatable).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send a prompt and get the generated text back.
    async fn respond(&self, prompt: &str, temperature: f32) -> Result<String, GeneratorError>;

    /// Whether the session is currently mid-response.
    fn is_busy(&self) -> bool {
        false
    }

    /// Drop accumulated session context.
    async fn reset(&self) -> Result<(), GeneratorError>;
}

/// Best-effort local image analysis (OCR, classification).
///
/// An empty return string means "no analysis available"; failures are
/// folded into that same signal rather than surfaced as errors.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> String;
}

/// The platform's image-generation surface.
///
/// Submitting a concept returns a receiver that yields the generated image
/// bytes once the (interactive, asynchronous) generation completes. The
/// surface may be unavailable on the current device.
#[async_trait]
pub trait ImageSurface: Send + Sync {
    async fn request(&self, concept: &str) -> Result<oneshot::Receiver<Vec<u8>>, SurfaceError>;
}
