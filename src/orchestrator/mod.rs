//! Turn driver: one user utterance in, one assistant message out.
//!
//! The session is shareable (`&self` methods, interior mutability). The busy
//! flag is the sole concurrency guard — one turn in flight at a time. A
//! personality switch bumps a generation counter; a backend response that
//! resolves under a stale generation is discarded at apply time instead of
//! landing in the wrong conversation.

use crate::backend::BackendClient;
use crate::conversation::{ConversationState, Message};
use crate::error::SessionError;
use crate::personality::Personality;
use crate::prompt::build_prompt;
use crate::router::{RoutingDecision, route};
use crate::sanitize::sanitize;
use crate::speech::SpeechSynthesizer;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Fixed clarifying question for location-dependent queries.
pub const LOCATION_QUESTION: &str = "What location are you talking about?";

/// The one user-visible failure message; raw errors go to logs only.
pub const FAILURE_MESSAGE: &str =
    "I encountered an issue processing that. Please check your network connection or try again later.";

struct Inner {
    state: ConversationState,
    /// Set after a `NeedsLocation` turn; the next user message is taken as
    /// the location answer.
    awaiting_location: bool,
}

pub struct ChatSession {
    inner: Mutex<Inner>,
    backend: BackendClient,
    speech: Arc<dyn SpeechSynthesizer>,
    busy: AtomicBool,
    generation: AtomicU64,
}

/// Clears the busy flag on every exit path, including panics in collaborators.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatSession {
    pub fn new(
        personality: Personality,
        backend: BackendClient,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ConversationState::new(personality),
                awaiting_location: false,
            }),
            backend,
            speech,
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Drive one turn end to end. Every exit leaves the session idle.
    pub async fn send_message(&self, text: &str) -> crate::error::Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput.into());
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::Busy.into());
        }
        let _guard = BusyGuard(&self.busy);
        let generation = self.generation.load(Ordering::Acquire);

        // Route under the lock; the lock is never held across an await.
        let (decision, prompt) = {
            let mut inner = self.inner.lock().expect("session lock poisoned");
            if inner.awaiting_location {
                inner.awaiting_location = false;
                inner.state.set_location_provided(true);
            }
            inner.state.append_user(text);
            let decision = route(text, inner.state.location_provided());
            tracing::debug!(?decision, "routed utterance");
            let prompt = match decision {
                RoutingDecision::UseCompletion => Some(build_prompt(&inner.state)),
                _ => None,
            };
            (decision, prompt)
        };

        let raw = match decision {
            RoutingDecision::NeedsLocation => {
                let mut inner = self.inner.lock().expect("session lock poisoned");
                inner.awaiting_location = true;
                return Ok(self.emit_assistant(&mut inner, LOCATION_QUESTION.to_string()));
            }
            RoutingDecision::UseSearch => self.backend.search(text).await,
            RoutingDecision::UseCompletion => {
                let prompt = prompt.expect("prompt built for completion route");
                self.backend.complete(&prompt).await
            }
        };

        if self.generation.load(Ordering::Acquire) != generation {
            tracing::info!("discarding stale response after personality switch");
            return Err(SessionError::Superseded.into());
        }

        let reply = match raw {
            Ok(text) => sanitize(&text),
            Err(e) => {
                tracing::warn!(error = %e, query = text, "backend call failed");
                FAILURE_MESSAGE.to_string()
            }
        };

        let mut inner = self.inner.lock().expect("session lock poisoned");
        Ok(self.emit_assistant(&mut inner, reply))
    }

    /// Switch personality: cancel any in-flight speech, reset the transcript
    /// to the new welcome message, and invalidate in-flight turns.
    pub fn switch_personality(&self, personality: Personality) -> Message {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.speech.cancel();

        let mut inner = self.inner.lock().expect("session lock poisoned");
        inner.awaiting_location = false;
        inner.state.switch_personality(personality);
        let welcome = inner.state.messages()[0].clone();
        self.speech.speak(&welcome.content, &personality.voice_profile());
        welcome
    }

    fn emit_assistant(&self, inner: &mut Inner, text: String) -> Message {
        let voice = inner.state.personality().voice_profile();
        let message = inner.state.append_assistant(text).clone();
        self.speech.speak(&message.content, &voice);
        message
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn personality(&self) -> Personality {
        self.inner.lock().expect("session lock poisoned").state.personality()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .state
            .messages()
            .to_vec()
    }
}
