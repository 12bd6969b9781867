//! Conversation context: bounded windowing over the caller's history.
//!
//! Never mutates the history it is given; the window is a borrowed suffix.

use crate::message::{Message, Role};

/// Characters kept per entry when history is shown to the draft stage.
pub const DRAFT_HISTORY_ENTRY_CHARS: usize = 100;

/// Returns at most the last `max_entries` entries, oldest first.
///
/// An empty history, or `max_entries == 0`, yields an empty window.
pub fn window(history: &[Message], max_entries: usize) -> &[Message] {
    let start = history.len().saturating_sub(max_entries);
    &history[start..]
}

/// Renders history as `사용자: …` / `AI: …` lines for query rewriting.
pub fn render_dialogue(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "사용자",
                Role::Assistant => "AI",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders history as short reference bullets for the draft stage.
///
/// Each entry is cut to [`DRAFT_HISTORY_ENTRY_CHARS`] characters (not bytes) and marked
/// with `...` when cut.
pub fn render_reference(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            format!("- {}: {}", role, truncate_chars(&m.content, DRAFT_HISTORY_ENTRY_CHARS))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
