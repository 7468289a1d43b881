//! Bounded-context prompt assembly.
//!
//! Output size is bounded regardless of conversation length: at most
//! `MAX_CONTEXT_MESSAGES` recent messages appear verbatim, everything older
//! collapses into a single summary line once the log crosses the threshold.
//! The result is deterministic given the conversation state.

use crate::conversation::ConversationState;
use std::fmt::Write;

/// Recent raw messages included verbatim.
pub const MAX_CONTEXT_MESSAGES: usize = 4;

/// Older history is summarized only once the log is meaningfully longer than
/// the raw window.
const SUMMARY_THRESHOLD: usize = MAX_CONTEXT_MESSAGES + 10;

const SUMMARY_USER_TOPICS: usize = 3;
const SUMMARY_ASSISTANT_TOPICS: usize = 2;

/// Build the single prompt string sent to the completion backend.
///
/// Always ends with the literal cue `CASS:` so the model continues the
/// assistant's next line.
pub fn build_prompt(state: &ConversationState) -> String {
    let personality = state.personality();
    let mut prompt = format!(
        "{}\n{}\n\n",
        personality.answer_style(),
        personality.system_prompt()
    );

    let messages = state.messages();
    let recent_start = messages.len().saturating_sub(MAX_CONTEXT_MESSAGES);
    let recent = &messages[recent_start..];

    if messages.len() > SUMMARY_THRESHOLD
        && let Some(summary) = summarize(&messages[..recent_start])
    {
        let _ = writeln!(prompt, "{summary}");
        prompt.push('\n');
    }

    // The final two recent entries are the current user turn and the reply
    // slot it replaces; only the context ahead of them is rendered here.
    let context = &recent[..recent.len().saturating_sub(2)];
    if !context.is_empty() {
        prompt.push_str("Previous conversation context:\n");
        for message in context {
            let label = if message.is_user { "User" } else { "CASS" };
            let _ = writeln!(prompt, "{label}: {}", message.content);
        }
        prompt.push('\n');
    }

    if let Some(last_user) = state.last_user_message() {
        let _ = writeln!(prompt, "User: {}", last_user.content);
    }
    prompt.push_str("CASS:");
    prompt
}

/// Collapse everything older than the recent window into one sentence pair.
fn summarize(older: &[crate::conversation::Message]) -> Option<String> {
    let (user_topics, more_user) = distinct_contents(older, true, SUMMARY_USER_TOPICS);
    let (ai_topics, more_ai) = distinct_contents(older, false, SUMMARY_ASSISTANT_TOPICS);

    if user_topics.is_empty() && ai_topics.is_empty() {
        return None;
    }

    let mut summary = String::new();
    if !user_topics.is_empty() {
        summary.push_str("User has discussed: ");
        summary.push_str(&user_topics.join(", "));
        if more_user {
            summary.push_str(" and other topics");
        }
        summary.push('.');
    }
    if !ai_topics.is_empty() {
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str("CASS has provided responses about: ");
        summary.push_str(&ai_topics.join(", "));
        if more_ai {
            summary.push_str(" and other topics");
        }
        summary.push('.');
    }
    Some(summary)
}

/// First `limit` distinct contents for one role, in first-seen order, plus
/// whether more distinct contents exist beyond the limit.
fn distinct_contents(
    messages: &[crate::conversation::Message],
    is_user: bool,
    limit: usize,
) -> (Vec<String>, bool) {
    let mut seen: Vec<String> = Vec::new();
    let mut overflow = false;
    for message in messages.iter().filter(|m| m.is_user == is_user) {
        if seen.iter().any(|s| *s == message.content) {
            continue;
        }
        if seen.len() == limit {
            overflow = true;
            break;
        }
        seen.push(message.content.clone());
    }
    (seen, overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ConversationState;
    use crate::personality::Personality;

    fn session_with_turns(turns: usize) -> ConversationState {
        let mut state = ConversationState::new(Personality::Friend);
        for i in 0..turns {
            state.append_user(format!("question {i}"));
            state.append_assistant(format!("answer {i}"));
        }
        state
    }

    #[test]
    fn prompt_always_ends_with_cue() {
        let mut state = ConversationState::new(Personality::Friend);
        state.append_user("hello");
        assert!(build_prompt(&state).ends_with("CASS:"));

        let long = session_with_turns(20);
        assert!(build_prompt(&long).ends_with("CASS:"));
    }

    #[test]
    fn header_carries_style_then_system_prompt() {
        let mut state = ConversationState::new(Personality::Mentor);
        state.append_user("hi");
        let prompt = build_prompt(&state);
        let style_pos = prompt.find(Personality::Mentor.answer_style()).unwrap();
        let system_pos = prompt.find(Personality::Mentor.system_prompt()).unwrap();
        assert!(style_pos < system_pos);
    }

    #[test]
    fn most_recent_user_message_is_verbatim_last() {
        let mut state = session_with_turns(3);
        state.append_user("what about lifetimes?");
        let prompt = build_prompt(&state);
        assert!(prompt.ends_with("User: what about lifetimes?\nCASS:"));
    }

    #[test]
    fn raw_context_is_bounded_regardless_of_length() {
        let state = session_with_turns(50);
        let prompt = build_prompt(&state);

        // Of the last four messages, two render in the context block and one
        // as the verbatim user line; nothing older appears raw.
        let raw_lines = prompt
            .lines()
            .filter(|l| l.starts_with("User: ") || l.starts_with("CASS: "))
            .count();
        assert!(raw_lines <= MAX_CONTEXT_MESSAGES);
        assert!(!prompt.contains("question 10\n"));
    }

    #[test]
    fn short_conversation_has_no_summary() {
        let state = session_with_turns(3);
        let prompt = build_prompt(&state);
        assert!(!prompt.contains("User has discussed"));
    }

    #[test]
    fn long_conversation_summarizes_older_history() {
        let state = session_with_turns(12);
        let prompt = build_prompt(&state);
        assert!(prompt.contains(
            "User has discussed: question 0, question 1, question 2 and other topics."
        ));
        // The welcome message is the first distinct assistant content.
        let welcome = Personality::Friend.welcome_message();
        assert!(prompt.contains(&format!(
            "CASS has provided responses about: {welcome}, answer 0 and other topics."
        )));
        // Summary precedes the recent-context block.
        let summary_pos = prompt.find("User has discussed").unwrap();
        let context_pos = prompt.find("Previous conversation context").unwrap();
        assert!(summary_pos < context_pos);
    }

    #[test]
    fn summary_skips_duplicate_contents() {
        let mut state = ConversationState::new(Personality::Friend);
        for _ in 0..8 {
            state.append_user("same question");
            state.append_assistant("same answer");
        }
        let prompt = build_prompt(&state);
        assert!(prompt.contains("User has discussed: same question."));
        assert!(!prompt.contains("and other topics"));
    }

    #[test]
    fn deterministic_for_same_state() {
        let state = session_with_turns(9);
        assert_eq!(build_prompt(&state), build_prompt(&state));
    }
}
