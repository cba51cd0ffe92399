//! Non-blocking user notices
//!
//! Every operation outcome a user should see is pushed as a [`Notice`] to a
//! caller-supplied sink. The library never blocks on delivery; the sink
//! decides presentation (toast, banner, log line).

/// How prominently a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational, e.g. "check your email"
    Info,
    /// An operation failed
    Error,
}

/// A single user-facing notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Presentation severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Notice {
    /// Creates an informational notice
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Creates an error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Destination for user-facing notices
pub trait NoticeSink: Send + Sync {
    /// Accepts a notice for presentation. Must not block.
    fn push(&self, notice: Notice);
}
