//! Widget system: trait, base state, values, and engine-side access.

pub mod base;
pub mod registry;
pub mod traits;
pub mod value;

pub use base::{Callback, Hook, TouchLatch, WidgetCore, WidgetId};
pub use traits::{Widget, WidgetExt};
pub use value::Value;
