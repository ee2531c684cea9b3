//! Error types for the Chatweave domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Note that most web-retrieval failures are deliberately *not* errors:
//! the pipeline converts them into user-visible advisory strings or drops
//! them silently, so only collaborator failures and turn-guard rejections
//! surface here.

use thiserror::Error;

/// The top-level error type for all Chatweave operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Generator errors ---
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    // --- Image-generation surface errors ---
    #[error("Image surface error: {0}")]
    Surface(#[from] SurfaceError),

    // --- Turn guard rejections ---
    #[error("Turn error: {0}")]
    Turn(#[from] TurnError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("Generator is unavailable: {0}")]
    Unavailable(String),

    #[error("Generator is already responding")]
    Busy,

    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("Image generation is not available on this device")]
    Unavailable,

    #[error("Image generation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Error)]
pub enum TurnError {
    #[error("Submission rejected: no text and no attachment")]
    EmptySubmission,

    #[error("A turn is already in flight")]
    Busy,
}
