//! Prompt assembly.
//!
//! Folds the recent transcript, image analysis, and web context into the
//! single string handed to the generator. Pure: all inputs arrive as
//! arguments, and nothing here touches the network or the transcript.

use chatweave_core::{Conversation, Message};

/// Recent messages included in the context window.
const WINDOW_LIMIT: usize = 6;
/// Reduced window when web context is present, to leave room for sources.
const WINDOW_LIMIT_WITH_WEB: usize = 2;
/// Per-message character cap inside the window.
const WINDOW_MESSAGE_CHAR_CAP: usize = 300;

/// Instruction prefixed to image-analysis text so the generator uses it
/// instead of disclaiming.
pub(crate) const ANALYSIS_INSTRUCTION: &str = "Below is a local analysis of the attached image. \
Use it to answer helpfully, without repeating that you cannot see the image.";

/// Prompt used when an image is attached but no analysis and no caption
/// are available.
pub(crate) const ASK_FOR_DESCRIPTION: &str = "A photo is attached. You have no direct access to \
the image; ask for a brief description (1-2 sentences) and suggest 2-3 ways you can help, \
without repeating that you cannot see the image.";

/// Everything the assembler needs for one turn.
pub struct PromptInput<'a> {
    pub conversation: &'a Conversation,
    pub user_text: &'a str,
    pub analysis: Option<&'a str>,
    pub web_context: Option<&'a str>,
    pub has_attachment: bool,
}

pub struct PromptAssembler;

impl PromptAssembler {
    /// Assemble the final prompt: context window, blank line, body.
    pub fn assemble(input: &PromptInput<'_>) -> String {
        let limit = if input.web_context.is_some() {
            WINDOW_LIMIT_WITH_WEB
        } else {
            WINDOW_LIMIT
        };
        let window = context_window(input.conversation, limit);
        let body = body_for(input);
        format!("{window}\n\n{body}")
    }
}

/// Render the last `limit` messages as compact `[Role] text` lines.
///
/// Image bytes never enter the prompt; an attached image becomes a
/// placeholder plus its caption.
fn context_window(conversation: &Conversation, limit: usize) -> String {
    let recent = conversation.recent(limit);
    let lines: Vec<String> = recent.iter().map(window_line).collect();
    format!(
        "Conversation context (last {} messages):\n{}",
        recent.len(),
        lines.join("\n\n")
    )
}

fn window_line(message: &Message) -> String {
    let role = if message.is_user() { "User" } else { "Assistant" };
    if message.has_image() {
        if message.text.trim().is_empty() {
            format!("[{role}] [Attached image]")
        } else {
            format!("[{role}] [Attached image]\nCaption: {}", message.text)
        }
    } else {
        let truncated: String = message.text.chars().take(WINDOW_MESSAGE_CHAR_CAP).collect();
        format!("[{role}] {truncated}")
    }
}

fn body_for(input: &PromptInput<'_>) -> String {
    let base = if input.has_attachment {
        match input.analysis {
            Some(analysis) if !analysis.trim().is_empty() => {
                if input.user_text.is_empty() {
                    format!("{ANALYSIS_INSTRUCTION}\n\n{analysis}")
                } else {
                    format!(
                        "{ANALYSIS_INSTRUCTION}\n\n{analysis}\n\nUser: {}",
                        input.user_text
                    )
                }
            }
            _ if input.user_text.is_empty() => ASK_FOR_DESCRIPTION.to_string(),
            _ => input.user_text.to_string(),
        }
    } else {
        input.user_text.to_string()
    };

    match input.web_context {
        Some(web) => format!("{web}\n\n━━━\nUSER: {base}"),
        None => base,
    }
}
