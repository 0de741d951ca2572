//! The "focus this field" capability.

use tracing::info;

/// Moves input focus to a field after a failed full validation.
///
/// The UI binding implements this; the form never touches widgets itself.
#[cfg_attr(test, mockall::automock)]
pub trait FieldFocus: Send + Sync {
    /// Focuses the field named `name`.
    ///
    /// Returns false if no element for the field could be found.
    fn focus(&self, name: &str) -> bool;
}

/// Focus capability that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFieldFocus;

impl FieldFocus for NoOpFieldFocus {
    fn focus(&self, _name: &str) -> bool {
        false
    }
}

/// Focus capability that only logs the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFieldFocus;

impl FieldFocus for LoggingFieldFocus {
    fn focus(&self, name: &str) -> bool {
        info!(field = name, "Focus requested");
        true
    }
}
