//! Static registry of selectable personalities.
//!
//! Each personality carries the system prompt, the answer-style instruction
//! that hard-caps replies at two sentences, the welcome message seeded into a
//! fresh conversation, and the voice profile handed to the speech
//! collaborator.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The answer-style instruction is authoritative over tone: it caps replies
/// at two sentences, forbids promises to check or get back later, and demands
/// a direct answer attempt every time.
pub const ANSWER_STYLE_INSTRUCTION: &str = "Answer in at most two short sentences. \
Never say you will check, search, or get back to the user later. \
Always attempt a direct answer with what you know right now.";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    Display, EnumIter, EnumString,
    Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Personality {
    #[default]
    Friend,
    Mentor,
    Debator,
}

/// Voice parameters for the text-to-speech collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceProfile {
    pub rate: f32,
    pub pitch: f32,
    pub voice: VoiceSelection,
}

/// Preferred voice identifier, with a locale to fall back on when the
/// platform does not ship that voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelection {
    Identifier(&'static str),
    Locale(&'static str),
}

impl Personality {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Friend => {
                "You are CASS, a warm and upbeat friend. You chat casually, \
                 use everyday language, and keep the mood light."
            }
            Self::Mentor => {
                "You are CASS, a calm and experienced mentor. You give \
                 practical, encouraging guidance and share what matters most first."
            }
            Self::Debator => {
                "You are CASS, a sharp debate partner. You take a clear stance, \
                 argue it confidently, and enjoy a good counterpoint."
            }
        }
    }

    pub fn answer_style(self) -> &'static str {
        ANSWER_STYLE_INSTRUCTION
    }

    pub fn welcome_message(self) -> &'static str {
        match self {
            Self::Friend => "Hey! I'm CASS. What's on your mind?",
            Self::Mentor => "Hello, I'm CASS. What would you like to work through today?",
            Self::Debator => "I'm CASS. Give me a topic and pick a side.",
        }
    }

    pub fn voice_profile(self) -> VoiceProfile {
        match self {
            Self::Friend => VoiceProfile {
                rate: 0.52,
                pitch: 1.1,
                voice: VoiceSelection::Identifier("com.apple.voice.compact.en-US.Samantha"),
            },
            Self::Mentor => VoiceProfile {
                rate: 0.48,
                pitch: 0.95,
                voice: VoiceSelection::Identifier("com.apple.voice.compact.en-GB.Daniel"),
            },
            Self::Debator => VoiceProfile {
                rate: 0.55,
                pitch: 1.0,
                voice: VoiceSelection::Locale("en-US"),
            },
        }
    }
}
