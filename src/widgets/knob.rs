//! Rotary knob: a draggable float in `[0.0, 1.0]` mapped onto an arc.
//!
//! Angle 0 is straight up, positive angles run clockwise. The usable travel
//! is centred on the vertical; touches too close to the spindle are ignored
//! because their angle is meaningless.

use std::any::Any;
use std::f32::consts::TAU;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::render::{Color, DisplayProxy};
use crate::widget::{TouchLatch, Widget, WidgetCore};

/// A rotary control.
pub struct Knob {
    core: WidgetCore,
    latch: TouchLatch,
    arc: f32,
    ticks: u32,
    color: Option<Color>,
    pointer: Option<f32>,
}

impl Knob {
    /// A full-turn knob of the given diameter, at 0.0.
    pub fn new(at: Point, diameter: i32) -> Self {
        let mut core = WidgetCore::new(Region::new(at.x, at.y, diameter, diameter));
        core.seed_value(0.0_f32);
        Self { core, latch: TouchLatch::new(true), arc: TAU, ticks: 9, color: None, pointer: None }
    }

    /// Usable travel in radians, clamped to one turn (builder).
    pub fn with_arc(mut self, arc: f32) -> Self {
        self.arc = arc.clamp(0.0, TAU);
        self
    }

    /// Tick marks, start and end of travel included (builder).
    pub fn with_ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks.max(2);
        self
    }

    /// Fill colour of the dial face.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn position(&self) -> f32 {
        self.core.value().as_float().unwrap_or(0.0)
    }

    fn radius(&self) -> f32 {
        self.core.region.height as f32 / 2.0 - self.core.border as f32
    }

    fn origin(&self) -> (f32, f32) {
        let offset = self.core.border as f32 + self.radius();
        (self.core.region.x as f32 + offset, self.core.region.y as f32 + offset)
    }

    fn tick_len(&self) -> f32 {
        0.1 * self.radius()
    }

    /// End of a ray from the origin at `theta` with length `len`.
    fn ray(&self, theta: f32, len: f32) -> Point {
        let (ox, oy) = self.origin();
        Point::new((ox + len * theta.sin()) as i32, (oy - len * theta.cos()) as i32)
    }

    fn spindle(&self) -> Point {
        let (ox, oy) = self.origin();
        Point::new(ox as i32, oy as i32)
    }

    fn draw_pointer(&self, display: &mut DisplayProxy, value: f32, color: Color) -> Result<()> {
        let len = self.radius() - self.tick_len() - 5.0;
        let angle = value * self.arc - self.arc / 2.0;
        display.draw_line(self.spindle(), self.ray(angle, len), color)?;
        Ok(())
    }

    fn draw_face(&self, display: &mut DisplayProxy) -> Result<()> {
        let fg = self.core.fg();
        let radius = self.radius();
        let tick_len = self.tick_len();
        for tick in 0..self.ticks {
            let theta = (tick as f32 / (self.ticks - 1) as f32) * self.arc - self.arc / 2.0;
            display.draw_line(self.ray(theta, radius), self.ray(theta, radius - tick_len), fg)?;
        }
        let dial = (radius - tick_len) as i32;
        if let Some(color) = self.color {
            display.fill_circle(self.spindle(), dial, color)?;
        }
        display.draw_circle(self.spindle(), dial, fg)?;
        display.draw_circle(self.spindle(), dial - 3, fg)?;
        Ok(())
    }
}

impl Widget for Knob {
    fn widget_type(&self) -> &'static str {
        "Knob"
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
        if self.core.redraw {
            self.core.redraw = false;
            self.draw_face(display)?;
        }
        if let Some(old) = self.pointer.take() {
            if display.is_skeleton() {
                let bg = display.background();
                display.set_grey(false);
                let erased = self.draw_pointer(display, old, bg);
                display.set_grey(true);
                erased?;
            } else {
                let face = self.color.unwrap_or(self.core.bg());
                self.draw_pointer(display, old, face)?;
            }
        }
        let value = self.position();
        self.draw_pointer(display, value, self.core.fg())?;
        self.pointer = Some(value);
        Ok(())
    }

    fn on_press(&mut self, ui: &Ui, at: Point) -> Result<()> {
        let (ox, oy) = self.origin();
        let dx = at.x as f32 - ox;
        let dy = oy - at.y as f32;
        let radius = self.radius();
        if radius <= 0.0 || self.arc <= 0.0 || (dx * dx + dy * dy) / (radius * radius) < 0.5 {
            return Ok(());
        }
        let half = self.arc / 2.0;
        let alpha = dx.atan2(dy).clamp(-half, half) + half;
        let value = alpha / self.arc;
        ui.update_value(self, value)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
