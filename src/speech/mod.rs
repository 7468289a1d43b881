//! Collaborator boundaries for speech.
//!
//! Synthesis and recognition live outside this crate; what lives here is the
//! seam the orchestrator talks to, plus the small pieces of state the design
//! owns: the most-recent-transcript slot and the one-at-a-time recording
//! guard.

use crate::personality::VoiceProfile;
use std::sync::Mutex;
use tokio::task::JoinHandle;

/// Text-to-speech boundary. `speak` fires on every assistant message;
/// `cancel` fires when the personality switches mid-utterance.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, text: &str, voice: &VoiceProfile);
    fn cancel(&self);
}

/// Synthesizer for headless and test use.
#[derive(Debug, Default)]
pub struct NoopSpeech;

impl SpeechSynthesizer for NoopSpeech {
    fn speak(&self, _text: &str, _voice: &VoiceProfile) {}
    fn cancel(&self) {}
}

/// Single most-recent-transcript cell. Every partial recognition result
/// overwrites the previous one; the final transcript is consumed exactly once
/// when recording stops.
#[derive(Debug, Default)]
pub struct TranscriptSlot {
    latest: Mutex<Option<String>>,
}

impl TranscriptSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, partial: impl Into<String>) {
        *self.latest.lock().expect("transcript lock poisoned") = Some(partial.into());
    }

    /// Take the final transcript, leaving the slot empty.
    pub fn take(&self) -> Option<String> {
        self.latest.lock().expect("transcript lock poisoned").take()
    }
}

/// Recording is a mutually exclusive device resource: starting a new session
/// tears down any previous recognition task first.
#[derive(Debug, Default)]
pub struct RecordingController {
    active: Option<JoinHandle<()>>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a recognition task, aborting whichever one was running. Returns
    /// false without starting when the microphone is not authorized.
    pub fn start(&mut self, mic_authorized: bool, task: JoinHandle<()>) -> bool {
        if !mic_authorized {
            tracing::warn!("recording refused, microphone not authorized");
            task.abort();
            return false;
        }
        self.stop();
        self.active = Some(task);
        true
    }

    /// Tear down the current recognition task, if any.
    pub fn stop(&mut self) {
        if let Some(previous) = self.active.take() {
            previous.abort();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keeps_only_latest_partial() {
        let slot = TranscriptSlot::new();
        slot.update("what");
        slot.update("what's the");
        slot.update("what's the weather");

        assert_eq!(slot.take().as_deref(), Some("what's the weather"));
    }

    #[test]
    fn slot_is_consumed_once() {
        let slot = TranscriptSlot::new();
        slot.update("hello");
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }

    #[tokio::test]
    async fn starting_a_session_aborts_the_previous_one() {
        let mut controller = RecordingController::new();

        let first = tokio::spawn(std::future::pending::<()>());
        assert!(controller.start(true, first));
        assert!(controller.is_recording());

        let second = tokio::spawn(std::future::pending::<()>());
        assert!(controller.start(true, second));
        assert!(controller.is_recording());

        controller.stop();
        assert!(!controller.is_recording());
    }

    #[tokio::test]
    async fn unauthorized_microphone_refuses_to_record() {
        let mut controller = RecordingController::new();
        let task = tokio::spawn(std::future::pending::<()>());
        assert!(!controller.start(false, task));
        assert!(!controller.is_recording());
    }
}
