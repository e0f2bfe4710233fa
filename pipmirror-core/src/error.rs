//! Error types for pipmirror

use thiserror::Error;

use crate::types::Handle;

/// Result type alias using MirrorError
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Main error type for pipmirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Screen-recording permission denied or source enumeration failed
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// A separator or unknown entry was selected
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The platform rejected the frame consumer for the fixed stream configuration
    #[error("Failed to register frame consumer: {0}")]
    ConsumerRegistrationFailed(String),

    /// Stream construction failed
    #[error("Failed to start stream: {0}")]
    StreamStart(String),

    /// No frame arrived from a started session in time
    #[error("{handle} produced no frames within {timeout_ms}ms")]
    StartTimeout {
        /// Session that never produced a frame
        handle: Handle,
        /// Watchdog timeout that elapsed
        timeout_ms: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MirrorError>,
    },
}

impl MirrorError {
    /// Create a capture-unavailable error
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    /// Create a stream start error
    pub fn stream_start(msg: impl Into<String>) -> Self {
        Self::StreamStart(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error indicates a defect rather than a runtime condition.
    ///
    /// Consumer registration only fails when the fixed stream configuration is
    /// incompatible with the platform, so callers abort instead of retrying.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ConsumerRegistrationFailed(_) => true,
            Self::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }

    /// One-line remediation hint for the user
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CaptureUnavailable(_) => Some(
                "Grant screen recording permission to this application and refresh the source list",
            ),
            Self::InvalidSelection(_) => Some("Pick a display or window entry, not a separator"),
            Self::ConsumerRegistrationFailed(_) => {
                Some("The capture backend rejected a BGRA stream; this build does not support this platform")
            }
            Self::StreamStart(_) => Some("The source may have closed; refresh the list and select it again"),
            Self::StartTimeout { .. } => {
                Some("The source may be minimized or off-screen; try another source")
            }
            Self::Config(_) => Some("Check ~/.config/pipmirror/config.toml for syntax errors"),
            Self::Io(_) => None,
            Self::WithContext { source, .. } => source.user_hint(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl From<xcap::XCapError> for MirrorError {
    fn from(err: xcap::XCapError) -> Self {
        Self::CaptureUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_through_context() {
        let err = MirrorError::ConsumerRegistrationFailed("bgra rejected".into())
            .with_context("Selecting display 1");
        assert!(err.is_fatal());
        assert!(!MirrorError::capture("denied").is_fatal());
    }
}
