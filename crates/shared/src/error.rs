use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes the client surfaces to the learner. Nothing in this
/// taxonomy is fatal to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Persisted state could not be read; recovered locally with defaults.
    StorageRead,
    /// The tutor credential is not configured.
    CredentialMissing,
    /// A remote service call failed in transit or server-side.
    ServiceUnavailable,
    /// The requested language has no sandbox mapping.
    UnsupportedLanguage,
    /// The operation was refused locally because the client is offline.
    Offline,
}

/// A classified, user-presentable failure. The message is the exact text the
/// rendering layer shows inline in the panel that triggered the operation.
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct SurfaceError {
    pub kind: FailureKind,
    pub message: String,
}

impl SurfaceError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
