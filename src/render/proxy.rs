//! Display proxy applying the disabled ("greyed-out") colour transform.
//!
//! Widgets draw through a [`DisplayProxy`], never through the raw surface. The
//! engine flips [`DisplayProxy::set_grey`] around each widget's draw call
//! according to that widget's greyed-out flag, so widget code stays unaware
//! of the disabled style and every primitive is filtered in one place.

use crate::error::{GuiError, Result};
use crate::geometry::{Point, Region, Size};

use super::color::Color;
use super::surface::{DisplayError, DisplaySurface};

// ---------------------------------------------------------------------------
// GreyStyle
// ---------------------------------------------------------------------------

/// How greyed-out widgets are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreyStyle {
    /// Divide every channel by `factor`.
    Dim { factor: u8 },
    /// Replace colours by a grey level: brightest channel divided by `factor`.
    Desaturate { factor: u8 },
    /// Draw filled shapes as outlines on the screen background.
    Skeleton,
}

impl GreyStyle {
    /// Check that the factor (if any) is usable.
    pub fn validate(self) -> Result<Self> {
        match self {
            GreyStyle::Dim { factor } | GreyStyle::Desaturate { factor } if factor <= 1 => {
                Err(GuiError::InvalidDimFactor(factor))
            }
            style => Ok(style),
        }
    }

    /// Transform a colour for greyed-out drawing.
    pub fn apply(self, color: Color) -> Color {
        match self {
            GreyStyle::Dim { factor } => color.dim(factor),
            GreyStyle::Desaturate { factor } => color.desaturate(factor),
            GreyStyle::Skeleton => color.desaturate(2),
        }
    }
}

impl Default for GreyStyle {
    fn default() -> Self {
        GreyStyle::Desaturate { factor: 2 }
    }
}

// ---------------------------------------------------------------------------
// DisplayProxy
// ---------------------------------------------------------------------------

/// Wraps the panel driver and filters every colour through the grey style
/// while the grey flag is set.
pub struct DisplayProxy {
    surface: Box<dyn DisplaySurface>,
    style: GreyStyle,
    grey: bool,
}

impl DisplayProxy {
    /// Wrap a surface with the given grey style.
    pub fn new(surface: Box<dyn DisplaySurface>, style: GreyStyle) -> Self {
        Self { surface, style, grey: false }
    }

    /// Set whether subsequent calls are greyed-out.
    pub fn set_grey(&mut self, grey: bool) {
        self.grey = grey;
    }

    /// Whether calls are currently greyed-out.
    pub fn is_grey(&self) -> bool {
        self.grey
    }

    /// Current grey style.
    pub fn style(&self) -> GreyStyle {
        self.style
    }

    /// Replace the grey style.
    pub fn set_style(&mut self, style: GreyStyle) {
        self.style = style;
    }

    /// Whether greyed-out fills are drawn as outlines.
    pub fn is_skeleton(&self) -> bool {
        self.grey && self.style == GreyStyle::Skeleton
    }

    /// The colour actually sent to the panel for `color`.
    pub fn filter(&self, color: Color) -> Color {
        if self.grey {
            self.style.apply(color)
        } else {
            color
        }
    }

    // ── Pass-through ─────────────────────────────────────────────────

    /// Clear the whole panel. Never greyed.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.surface.clear()
    }

    pub fn foreground(&self) -> Color {
        self.surface.foreground()
    }

    pub fn background(&self) -> Color {
        self.surface.background()
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    pub fn text_size(&self, text: &str) -> Size {
        self.surface.text_size(text)
    }

    // ── Filtered primitives ──────────────────────────────────────────

    pub fn draw_rect(&mut self, region: Region, color: Color) -> Result<(), DisplayError> {
        let color = self.filter(color);
        self.surface.draw_rect(region, color)
    }

    pub fn fill_rect(&mut self, region: Region, color: Color) -> Result<(), DisplayError> {
        if self.is_skeleton() {
            let bg = self.surface.background();
            self.surface.fill_rect(region, bg)?;
            return self.draw_rect(region, color);
        }
        let color = self.filter(color);
        self.surface.fill_rect(region, color)
    }

    pub fn draw_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<(), DisplayError> {
        let color = self.filter(color);
        self.surface.draw_circle(center, radius, color)
    }

    pub fn fill_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<(), DisplayError> {
        if self.is_skeleton() {
            let bg = self.surface.background();
            self.surface.fill_circle(center, radius, bg)?;
            return self.draw_circle(center, radius, color);
        }
        let color = self.filter(color);
        self.surface.fill_circle(center, radius, color)
    }

    pub fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), DisplayError> {
        let color = self.filter(color);
        self.surface.draw_line(from, to, color)
    }

    /// Horizontal line of `length` pixels starting at `at`.
    pub fn draw_hline(&mut self, at: Point, length: i32, color: Color) -> Result<(), DisplayError> {
        self.draw_line(at, Point::new(at.x + length, at.y), color)
    }

    /// Vertical line of `length` pixels starting at `at`.
    pub fn draw_vline(&mut self, at: Point, length: i32, color: Color) -> Result<(), DisplayError> {
        self.draw_line(at, Point::new(at.x, at.y + length), color)
    }

    pub fn draw_text(&mut self, at: Point, text: &str, color: Color) -> Result<(), DisplayError> {
        let color = self.filter(color);
        self.surface.draw_text(at, text, color)
    }

    /// Draw `text` centred on `center`.
    pub fn draw_text_centered(&mut self, center: Point, text: &str, color: Color) -> Result<(), DisplayError> {
        let extent = self.surface.text_size(text);
        let at = Point::new(
            (center.x - extent.width / 2).max(0),
            (center.y - extent.height / 2).max(0),
        );
        self.draw_text(at, text, color)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
