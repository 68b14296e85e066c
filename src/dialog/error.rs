// Dialogue-level error taxonomy
//
// Cancellation is a distinguished signal, not a failure: it means the
// surrounding conversation was interrupted and must travel up to the caller
// unchanged. Everything else is either user-presentable (Failed) or
// diagnostic detail for the logs (Other). Branches on this enum match
// exhaustively; nothing inspects error codes or message text.

use thiserror::Error;

/// Result alias for dialogue operations and collaborator calls.
pub type DialogResult<T> = Result<T, DialogError>;

/// Error raised by dialogue collaborators (channel, discovery service,
/// configurer).
#[derive(Debug, Error)]
pub enum DialogError {
    /// The surrounding conversation was interrupted. Propagated to the
    /// caller, never reported to the user and never logged as an error.
    #[error("conversation cancelled")]
    Cancelled,

    /// A collaborator could not complete its work; `reason` is suitable for
    /// interpolation into a user-facing message.
    #[error("{reason}")]
    Failed { reason: String },

    /// Anything else. Carried for diagnostics only.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DialogError {
    /// Build a `Failed` value from user-presentable text.
    pub fn failed(reason: impl Into<String>) -> Self {
        DialogError::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DialogError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_displays_reason_verbatim() {
        let err = DialogError::failed("mDNS daemon unreachable");
        assert_eq!(err.to_string(), "mDNS daemon unreachable");
    }

    #[test]
    fn test_cancelled_is_cancelled() {
        assert!(DialogError::Cancelled.is_cancelled());
        assert!(!DialogError::failed("nope").is_cancelled());
    }

    #[test]
    fn test_other_wraps_anyhow_detail() {
        let err: DialogError = anyhow::anyhow!("socket closed").into();
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "socket closed");
    }
}
