//! Headless testing kit: recording panel, scripted touch, Pilot.
//!
//! Use the [`Pilot`] to drive a [`Ui`](crate::app::Ui) without hardware:
//! script touches, run dispatch passes, advance the scheduler, and inspect
//! the recorded drawing calls.

pub mod pilot;
pub mod surface;
pub mod touch;

pub use pilot::Pilot;
pub use surface::{DrawOp, RecordingSurface};
pub use touch::ScriptedTouch;
