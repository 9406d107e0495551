//! Rendering: colours, the panel driver contract, and the greying proxy.

pub mod color;
pub mod proxy;
pub mod surface;

pub use color::Color;
pub use proxy::{DisplayProxy, GreyStyle};
pub use surface::{DisplayError, DisplaySurface};
