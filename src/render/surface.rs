//! Display surface trait: the panel driver's side of the contract.
//!
//! The engine never talks to panel hardware directly. A board support crate
//! implements [`DisplaySurface`] for its controller (SSD1963, ILI9341, ...) and
//! hands it to the engine, which wraps it in a
//! [`DisplayProxy`](super::DisplayProxy) so the grey-out transform applies to
//! every call.

use crate::geometry::{Point, Region, Size};

use super::color::Color;

/// Display driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// Communication error with the panel controller.
    #[error("communication with the panel failed")]
    Communication,
    /// Coordinates or dimensions outside the panel.
    #[error("coordinates outside the panel")]
    InvalidCoordinates,
    /// Panel not initialised.
    #[error("panel not initialised")]
    NotInitialized,
}

/// Pixel drawing primitives provided by a panel driver.
///
/// Rectangles are given as [`Region`]s whose edges are inclusive, matching the
/// controller's window addressing. Text metrics come from the driver because
/// the font tables live with it.
pub trait DisplaySurface {
    /// Fill the whole panel with the background colour.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Fill a rectangle.
    fn fill_rect(&mut self, region: Region, color: Color) -> Result<(), DisplayError>;

    /// Draw a one-pixel rectangle outline.
    fn draw_rect(&mut self, region: Region, color: Color) -> Result<(), DisplayError>;

    /// Draw a straight line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), DisplayError>;

    /// Draw a circle outline.
    fn draw_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<(), DisplayError>;

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<(), DisplayError>;

    /// Render text with its top-left corner at `at`.
    fn draw_text(&mut self, at: Point, text: &str, color: Color) -> Result<(), DisplayError>;

    /// Pixel extent of `text` in the current font.
    fn text_size(&self, text: &str) -> Size;

    /// Default foreground colour.
    fn foreground(&self) -> Color;

    /// Screen background colour.
    fn background(&self) -> Color;

    /// Panel dimensions in pixels.
    fn size(&self) -> Size;
}
