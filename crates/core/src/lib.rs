//! # Chatweave Core
//!
//! Domain types, collaborator traits, and error definitions for the Chatweave
//! conversational client. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (text generator, image analyzer, image
//! generation surface) is defined as a trait here. Implementations live with
//! the platform layer that embeds this library. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod collaborator;
pub mod error;
pub mod message;
pub mod thread;

// Re-export key types at crate root for ergonomics
pub use collaborator::{Generator, ImageAnalyzer, ImageSurface};
pub use error::{Error, GeneratorError, Result, SurfaceError, TurnError};
pub use message::{Conversation, Message, Role};
pub use thread::Thread;
