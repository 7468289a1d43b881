#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

//! CASS — a voice-first conversational assistant client.
//!
//! One turn flows: user utterance → router (location clarification, live
//! search, or model completion) → backend call with bounded retry →
//! sanitizer → conversation store → display and speech collaborators.

pub mod backend;
pub mod config;
pub mod connectivity;
pub mod conversation;
pub mod error;
pub mod orchestrator;
pub mod personality;
pub mod prompt;
pub mod router;
pub mod sanitize;
pub mod speech;

pub use config::Config;
pub use error::{BackendError, CassError, ConfigError, Result, SessionError};
pub use orchestrator::ChatSession;
pub use personality::Personality;
