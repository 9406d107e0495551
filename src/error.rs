//! Engine error type.
//!
//! Every variant except [`GuiError::Display`], [`GuiError::Runtime`] and
//! [`GuiError::TaskPanicked`] is a programming error: it points at a firmware
//! bug and is raised immediately instead of being absorbed. Benign conditions
//! (going back from the root, a poll with no finger down, a release with no
//! matching press) are not errors at all and never produce one of these.

use crate::render::DisplayError;
use crate::screen::ScreenId;
use crate::widget::WidgetId;

/// Errors raised by the screen/touch engine.
#[derive(Debug, thiserror::Error)]
pub enum GuiError {
    #[error("no screen is active: create or navigate to a screen first")]
    NoActiveScreen,
    #[error("forward navigation needs a fresh screen factory, not an existing screen")]
    ExistingScreenForward,
    #[error("backward navigation needs an existing screen, not a factory")]
    FreshScreenBackward,
    #[error("unknown screen {0:?}")]
    UnknownScreen(ScreenId),
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),
    #[error("widget {0:?} is already handling an event")]
    WidgetInUse(WidgetId),
    #[error("widget {id:?} is not a {expected}")]
    WrongWidgetType { id: WidgetId, expected: &'static str },
    #[error("invalid index {index} (have {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("widget {0:?} is not a member of this group")]
    NotAMember(WidgetId),
    #[error("a list needs at least one element")]
    EmptyList,
    #[error("dim factor must be greater than 1, got {0}")]
    InvalidDimFactor(u8),
    #[error("the dispatch loop is already running")]
    AlreadyRunning,
    #[error("display error: {0}")]
    Display(#[from] DisplayError),
    #[error("failed to start the cooperative runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("task faulted: {0}")]
    TaskPanicked(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = GuiError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_error_converts() {
        let err: GuiError = DisplayError::Communication.into();
        assert!(matches!(err, GuiError::Display(DisplayError::Communication)));
    }

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            GuiError::InvalidDimFactor(1).to_string(),
            "dim factor must be greater than 1, got 1"
        );
        assert_eq!(
            GuiError::InvalidIndex { index: 3, len: 2 }.to_string(),
            "invalid index 3 (have 2)"
        );
    }
}
