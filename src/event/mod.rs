//! Event system: touch input, deferred navigation commands, dispatch.

pub mod dispatch;
pub mod input;
pub mod message;

pub use dispatch::PassOutcome;
pub use input::TouchSource;
pub use message::{Command, CommandQueue, Destination, ScreenFactory};
