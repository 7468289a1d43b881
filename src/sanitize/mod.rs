//! Deterministic post-processing of raw backend text into a speakable,
//! length-bounded reply.
//!
//! The step order is load-bearing: filler prefixes are stripped before the
//! vague-promise override, which runs before sentence truncation, so the
//! override's fixed sentence is never re-truncated.

/// Hard override used when the model promises to "check and get back".
pub const VAGUE_PROMISE_FALLBACK: &str =
    "I don't have that information right now, but I can help with something else!";

/// Substitute for an answer that sanitized down to nothing.
pub const EMPTY_FALLBACK: &str = "I'm sorry, I don't have an answer for that.";

const MAX_SENTENCES: usize = 2;

/// Filler preambles removed when they open the reply. Only the first match is
/// stripped, once.
const FILLER_PREFIXES: &[&str] = &[
    "sure! ",
    "sure, ",
    "of course! ",
    "of course, ",
    "certainly! ",
    "absolutely! ",
    "great question! ",
    "here's what i found: ",
    "here is what i found: ",
];

/// Any of these anywhere in the reply voids it entirely: the assistant must
/// never promise to get back later.
const VAGUE_PROMISE_PHRASES: &[&str] = &[
    "let me check",
    "let me look into",
    "let me get back to you",
    "i'll get back to you",
    "i will get back to you",
    "i'll look into",
    "i'll find out",
    "check back later",
];

/// Run the full pipeline over raw backend text.
pub fn sanitize(raw: &str) -> String {
    let flat = flatten(raw.trim());
    let no_emphasis = flat.replace('*', "");
    let plain: String = no_emphasis.chars().filter(|c| !is_pictographic(*c)).collect();
    // Stripping can leave doubled spaces behind; re-collapse before matching.
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = strip_filler_prefix(&plain);

    let lowered = stripped.to_lowercase();
    if VAGUE_PROMISE_PHRASES.iter().any(|p| lowered.contains(p)) {
        return VAGUE_PROMISE_FALLBACK.to_string();
    }

    let mut result = truncate_sentences(stripped, MAX_SENTENCES);
    if result.is_empty() {
        return EMPTY_FALLBACK.to_string();
    }
    if !result.ends_with(['.', '!', '?']) {
        result.push('.');
    }
    result
}

/// Collapse bullet markers and newlines into single spaces; the reply must be
/// a single-line utterance.
fn flatten(text: &str) -> String {
    let text = text
        .replace("\n- ", " ")
        .replace("\n• ", " ")
        .replace("\n* ", " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Approximate pictographic filter over fixed codepoint ranges. Not
/// grapheme-cluster aware; plain ASCII is never touched.
fn is_pictographic(c: char) -> bool {
    let cp = c as u32;
    matches!(
        cp,
        0x1F300..=0x1F5FF // symbols & pictographs
            | 0x1F600..=0x1F64F // emoticons
            | 0x1F680..=0x1F6FF // transport
            | 0x1F900..=0x1F9FF // supplemental symbols
            | 0x1FA70..=0x1FAFF // extended symbols
            | 0x1F1E6..=0x1F1FF // regional indicators
            | 0x2600..=0x26FF // misc symbols
            | 0x2700..=0x27BF // dingbats
            | 0x2B00..=0x2BFF // arrows, stars
            | 0xFE00..=0xFE0F // variation selectors
            | 0x200D // zero-width joiner
    )
}

fn strip_filler_prefix(text: &str) -> &str {
    let lowered = text.to_lowercase();
    for prefix in FILLER_PREFIXES {
        if lowered.starts_with(prefix) {
            return &text[prefix.len()..];
        }
    }
    text
}

/// Keep at most `limit` full sentences. A trailing fragment without terminal
/// punctuation survives only when fewer than `limit` full sentences exist.
fn truncate_sentences(text: &str, limit: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut full: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, c) in chars.iter().enumerate() {
        current.push(*c);
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.get(i + 1).is_none_or(|n| n.is_whitespace());
        if at_boundary {
            let sentence = current.trim();
            if !sentence.is_empty() {
                full.push(sentence.to_string());
            }
            current.clear();
            if full.len() == limit {
                return full.join(" ");
            }
        }
    }

    let partial = current.trim();
    if !partial.is_empty() && full.len() < limit {
        full.push(partial.to_string());
    }
    full.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_flattens_to_one_line() {
        assert_eq!(
            sanitize("  Here are some tips:\n- sleep well\n- drink water  "),
            "Here are some tips: sleep well drink water."
        );
        assert!(!sanitize("line one\nline two").contains('\n'));
    }

    #[test]
    fn strips_emphasis_and_emoji() {
        assert_eq!(sanitize("That is **great** news! 🎉🎉"), "That is great news!");
        assert_eq!(sanitize("Sunny ☀️ all day."), "Sunny all day.");
    }

    #[test]
    fn ascii_punctuation_survives() {
        assert_eq!(sanitize("It costs $5 (roughly)."), "It costs $5 (roughly).");
    }

    #[test]
    fn strips_one_filler_prefix_only() {
        assert_eq!(sanitize("Sure! It rains tomorrow."), "It rains tomorrow.");
        // Only the leading prefix goes; an inner "Sure!" is content.
        assert_eq!(
            sanitize("Of course! Sure! is a word."),
            "Sure! is a word."
        );
    }

    #[test]
    fn vague_promise_voids_entire_reply() {
        assert_eq!(
            sanitize("Sure! Let me check and get back to you."),
            VAGUE_PROMISE_FALLBACK
        );
        assert_eq!(
            sanitize("Interesting question. I'll get back to you on that."),
            VAGUE_PROMISE_FALLBACK
        );
    }

    #[test]
    fn truncates_to_two_sentences() {
        assert_eq!(sanitize("A. B. C."), "A. B.");
        assert_eq!(sanitize("One! Two? Three."), "One! Two?");
    }

    #[test]
    fn trailing_partial_kept_when_under_two_sentences() {
        assert_eq!(sanitize("First. second half without end"), "First. second half without end.");
        assert_eq!(sanitize("no punctuation at all"), "no punctuation at all.");
    }

    #[test]
    fn trailing_partial_dropped_when_two_sentences_exist() {
        assert_eq!(sanitize("A. B. and then some trailing"), "A. B.");
    }

    #[test]
    fn ellipsis_counts_as_one_boundary() {
        // Consecutive terminators only close a sentence at the last one.
        assert_eq!(sanitize("Well... maybe. Another thought."), "Well... maybe.");
    }

    #[test]
    fn empty_input_yields_apology() {
        assert_eq!(sanitize(""), EMPTY_FALLBACK);
        assert_eq!(sanitize("  🎉🎉  "), EMPTY_FALLBACK);
        assert_eq!(sanitize("***"), EMPTY_FALLBACK);
    }

    #[test]
    fn idempotent_on_sanitized_output() {
        for input in [
            "Sure! Here's a **list**:\n- one\n- two\n- three",
            "A. B. C.",
            "Let me check on that 🤔",
            "plain and simple",
            "",
        ] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }
}
