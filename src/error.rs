use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for CASS.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum CassError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Backend ─────────────────────────────────────────────────────────
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    // ── Session / turn driver ───────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Backend errors ─────────────────────────────────────────────────────────

/// Failures surfaced by the backend client.
///
/// `Transport` is the only retryable kind. A 2xx response with a missing
/// answer field is deliberately NOT represented here — it degrades to a fixed
/// fallback string at the call site instead of propagating.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Pre-flight connectivity check failed; no HTTP attempt was made.
    #[error("network unavailable")]
    NetworkUnavailable,

    /// Transport-level failure (DNS, timeout, connection reset).
    #[error("transport: {0}")]
    Transport(String),

    /// Non-2xx HTTP status. The response body is logged, never surfaced.
    #[error("backend returned status {0}")]
    Status(u16),
}

impl BackendError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    /// A turn is already in flight; input should be disabled while busy.
    #[error("a turn is already in progress")]
    Busy,

    #[error("empty input")]
    EmptyInput,

    /// The personality changed while the backend call was in flight; the
    /// response was discarded instead of landing in the new conversation.
    #[error("turn superseded by personality switch")]
    Superseded,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, CassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = CassError::Config(ConfigError::Validation("bad temperature".into()));
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn backend_status_displays_code() {
        let err = CassError::Backend(BackendError::Status(503));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn only_transport_is_retryable() {
        assert!(BackendError::Transport("connection reset".into()).is_retryable());
        assert!(!BackendError::NetworkUnavailable.is_retryable());
        assert!(!BackendError::Status(500).is_retryable());
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let cass_err: CassError = anyhow_err.into();
        assert!(cass_err.to_string().contains("something went wrong"));
    }
}
