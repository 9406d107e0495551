//! Button widget: a pressable shape with an optional centred caption.
//!
//! A button fires [`Hook::Press`] when touched and [`Hook::Release`] when
//! the finger lifts. With a lit colour it shows that colour while held. A
//! long-press callback arms a timer task on press; the timer is cancelled on
//! release, so the callback fires at most once per press and never after it.

use std::any::Any;

use tracing::trace;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region, Size};
use crate::render::{Color, DisplayProxy};
use crate::task::TaskHandle;
use crate::widget::{Hook, TouchLatch, Widget, WidgetCore};

/// Corner cut of [`Shape::Clipped`] buttons, in pixels.
const CLIP: i32 = 4;

/// Button outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Rect,
    /// A circle inscribed in the box, diameter = box height.
    Circle,
    /// A rectangle with cut corners.
    Clipped,
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A pressable button.
///
/// # Examples
///
/// ```ignore
/// let ok = Button::new(Point::new(10, 200), Size::new(80, 30))
///     .with_text("OK")
///     .with_fgcolor(Color::GREEN)
///     .on_pressed(|ui, _| ui.back());
/// ```
pub struct Button {
    core: WidgetCore,
    latch: TouchLatch,
    shape: Shape,
    filled: bool,
    text: String,
    litcolor: Option<Color>,
    lit: bool,
    long_press: Option<TaskHandle>,
}

impl Button {
    pub fn new(at: Point, size: Size) -> Self {
        Self {
            core: WidgetCore::new(Region::at(at, size)),
            latch: TouchLatch::new(false),
            shape: Shape::Rect,
            filled: true,
            text: String::new(),
            litcolor: None,
            lit: false,
            long_press: None,
        }
    }

    /// A circular button of the given diameter.
    pub fn circle(at: Point, diameter: i32) -> Self {
        Self::new(at, Size::new(diameter, diameter)).with_shape(Shape::Circle)
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Draw the outline only (builder).
    pub fn outlined(mut self) -> Self {
        self.filled = false;
        self
    }

    /// Colour shown while the button is held.
    pub fn with_litcolor(mut self, color: Color) -> Self {
        self.litcolor = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn face(&self) -> Color {
        match self.litcolor {
            Some(lit) if self.lit => lit,
            _ => self.core.fg(),
        }
    }

    fn draw_clipped(&self, display: &mut DisplayProxy, color: Color) -> Result<()> {
        let r = self.core.region;
        let c = CLIP.min(r.width / 2).min(r.height / 2);
        if self.filled {
            display.fill_rect(Region::new(r.x + c, r.y, r.width - 2 * c, r.height), color)?;
            display.fill_rect(Region::new(r.x, r.y + c, r.width, r.height - 2 * c), color)?;
            return Ok(());
        }
        let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
        display.draw_hline(Point::new(x0 + c, y0), r.width - 2 * c, color)?;
        display.draw_hline(Point::new(x0 + c, y1), r.width - 2 * c, color)?;
        display.draw_vline(Point::new(x0, y0 + c), r.height - 2 * c, color)?;
        display.draw_vline(Point::new(x1, y0 + c), r.height - 2 * c, color)?;
        display.draw_line(Point::new(x0, y0 + c), Point::new(x0 + c, y0), color)?;
        display.draw_line(Point::new(x1 - c, y0), Point::new(x1, y0 + c), color)?;
        display.draw_line(Point::new(x0, y1 - c), Point::new(x0 + c, y1), color)?;
        display.draw_line(Point::new(x1 - c, y1), Point::new(x1, y1 - c), color)?;
        Ok(())
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.long_press.take() {
            handle.cancel();
        }
    }
}

impl Widget for Button {
    fn widget_type(&self) -> &'static str {
        "Button"
    }

    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn latch(&self) -> Option<&TouchLatch> {
        Some(&self.latch)
    }

    fn latch_mut(&mut self) -> Option<&mut TouchLatch> {
        Some(&mut self.latch)
    }

    fn show(&mut self, display: &mut DisplayProxy) -> Result<()> {
        self.core.redraw = false;
        let color = self.face();
        let region = self.core.region;
        let center = match self.shape {
            Shape::Rect => {
                if self.filled {
                    display.fill_rect(region, color)?;
                } else {
                    display.draw_rect(region, color)?;
                }
                region.center()
            }
            Shape::Circle => {
                let radius = region.height / 2;
                let center = region.location() + Point::new(radius, radius);
                if self.filled {
                    display.fill_circle(center, radius, color)?;
                } else {
                    display.draw_circle(center, radius, color)?;
                }
                center
            }
            Shape::Clipped => {
                self.draw_clipped(display, color)?;
                region.center()
            }
        };
        if !self.text.is_empty() {
            display.draw_text_centered(center, &self.text, self.core.font())?;
        }
        Ok(())
    }

    fn on_press(&mut self, ui: &Ui, _at: Point) -> Result<()> {
        if self.litcolor.is_some() {
            self.lit = true;
            ui.draw(self)?;
        }
        if self.core.has_callback(Hook::LongPress) {
            self.disarm();
            let id = self.core.id();
            let delay = ui.config().long_press;
            let timer = ui.clone();
            let handle = ui.register_task_on(
                self.core.owner(),
                async move {
                    tokio::time::sleep(delay).await;
                    timer.long_press(id)
                },
                true,
            )?;
            trace!(widget = ?id, ?delay, "long-press armed");
            self.long_press = Some(handle);
        }
        ui.fire(self, Hook::Press)
    }

    fn on_release(&mut self, ui: &Ui) -> Result<()> {
        self.disarm();
        if self.lit {
            self.lit = false;
            ui.draw(self)?;
        }
        Ok(())
    }

    fn on_long_press(&mut self, _ui: &Ui) -> Result<()> {
        self.long_press = None;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
