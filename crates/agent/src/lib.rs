//! # Chatweave Agent
//!
//! The conversational control plane: intent rules, prompt assembly, and
//! the turn controller that drives one submission end to end against the
//! platform collaborators defined in `chatweave-core`.
//!
//! The controller is deliberately forgiving: past its two guards (empty
//! submission, turn in flight) every failure degrades into a transcript
//! message and the controller returns to idle.

pub mod prompt;
pub mod rules;
pub mod turn;

pub use prompt::{PromptAssembler, PromptInput};
pub use rules::{image_subject, wants_generated_image};
pub use turn::{TurnController, TurnOutcome, TurnState};
