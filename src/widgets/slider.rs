//! Vertical slider: a draggable float in `[0.0, 1.0]`.
//!
//! Dragging fires [`Hook::Change`](crate::widget::Hook::Change) for every new
//! position; lifting the finger fires [`Hook::Release`](crate::widget::Hook::Release),
//! the "end of move" notification.

use std::any::Any;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::render::{Color, DisplayProxy};
use crate::widget::{TouchLatch, Widget, WidgetCore};

/// Height of the slide handle.
const SLIDE_HEIGHT: i32 = 6;

/// A vertical potentiometer-style control.
pub struct Slider {
    core: WidgetCore,
    latch: TouchLatch,
    divisions: u32,
    slidecolor: Option<Color>,
    legends: Vec<String>,
    slide: Option<Region>,
}

impl Slider {
    /// A slider `height` pixels tall and 30 wide, at 0.0.
    pub fn new(at: Point, height: i32) -> Self {
        let mut core = WidgetCore::new(Region::new(at.x, at.y, 30, height));
        core.seed_value(0.0_f32);
        Self {
            core,
            latch: TouchLatch::new(true),
            divisions: 10,
            slidecolor: None,
            legends: Vec::new(),
            slide: None,
        }
    }

    /// Width, rounded down to an even number (builder).
    pub fn with_width(mut self, width: i32) -> Self {
        self.core.region.width = width.max(2) & !1;
        self
    }

    /// Tick intervals along the slot. Zero draws no ticks.
    pub fn with_divisions(mut self, divisions: u32) -> Self {
        self.divisions = divisions;
        self
    }

    pub fn with_slidecolor(mut self, color: Color) -> Self {
        self.slidecolor = Some(color);
        self
    }

    /// Legends drawn right of the slider, bottom to top.
    pub fn with_legends<I, S>(mut self, legends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legends = legends.into_iter().map(Into::into).collect();
        self
    }

    pub fn position(&self) -> f32 {
        self.core.value().as_float().unwrap_or(0.0)
    }

    /// Usable travel of the slot in pixels.
    fn travel(&self) -> i32 {
        (self.core.region.height - 2 * (self.core.border + SLIDE_HEIGHT / 2)).max(1)
    }

    fn slot_top(&self) -> i32 {
        self.core.region.y + self.core.border + SLIDE_HEIGHT / 2
    }

    fn draw_scale(&self, display: &mut DisplayProxy) -> Result<()> {
        let fg = self.core.fg();
        let inner = self.core.inner();
        let y = self.slot_top();
        let height = self.travel();
        let dx = inner.width / 2 - 2;
        display.draw_rect(Region::new(inner.x + dx, y, inner.width - 2 * dx, height), fg)?;
        if self.divisions > 0 {
            let step = height as f32 / self.divisions as f32;
            for tick in 0..=self.divisions {
                let ypos = y + (step * tick as f32) as i32;
                display.draw_hline(Point::new(inner.x + 1, ypos), dx, fg)?;
                display.draw_hline(Point::new(inner.x + 2 + inner.width / 2, ypos), dx, fg)?;
            }
        }
        if !self.legends.is_empty() {
            let step = if self.legends.len() > 1 { height as f32 / (self.legends.len() - 1) as f32 } else { 0.0 };
            let x = self.core.region.right() + 2;
            let bottom = (y + height) as f32;
            for (i, legend) in self.legends.iter().enumerate() {
                let yl = bottom - step * i as f32;
                let half = display.text_size(legend).height / 2;
                display.draw_text(Point::new(x, yl as i32 - half), legend, self.core.font())?;
            }
        }
        Ok(())
    }
}

impl Widget for Slider {
    fn widget_type(&self) -> &'static str {
        "Slider"
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
        if let Some(old) = self.slide.take() {
            if !self.core.redraw {
                display.fill_rect(old, self.core.bg())?;
            }
        }
        self.core.redraw = false;
        self.draw_scale(display)?;

        let inner = self.core.inner();
        let slide_width = ((inner.width as f32 / 1.3) as i32) & !1;
        let x0 = inner.x + inner.width / 2 - slide_width / 2;
        let height = self.travel();
        let pos = self.slot_top() + height - (self.position() * height as f32) as i32;
        let slide = Region::new(x0, pos - SLIDE_HEIGHT / 2, slide_width, SLIDE_HEIGHT);
        display.fill_rect(slide, self.slidecolor.unwrap_or(self.core.fg()))?;
        self.slide = Some(slide);
        Ok(())
    }

    fn on_press(&mut self, ui: &Ui, at: Point) -> Result<()> {
        let value = (self.core.region.bottom() - at.y) as f32 / self.travel() as f32;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Blank;
    use crate::testing::{DrawOp, Pilot};
    use crate::widget::{Value, WidgetExt, WidgetId};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn open_slider(pilot: &Pilot, slider: Slider) -> WidgetId {
        let slot = Rc::new(Cell::new(None));
        let out = slot.clone();
        pilot
            .open(move |ui: &Ui| {
                out.set(Some(ui.add(slider)?));
                Ok(Blank)
            })
            .unwrap();
        slot.get().unwrap()
    }

    #[test]
    fn drag_reports_every_move_and_one_end() {
        let pilot = Pilot::new(320, 240);
        let moves = Rc::new(RefCell::new(Vec::new()));
        let ends = Rc::new(Cell::new(0));
        let (m, e) = (moves.clone(), ends.clone());
        // 106 tall: travel is 100 pixels, bottom edge at y = 106.
        let id = open_slider(
            &pilot,
            Slider::new(Point::new(0, 0), 106)
                .on_change(move |_, w| {
                    m.borrow_mut().push(w.value().as_float().unwrap_or(-1.0));
                    Ok(())
                })
                .on_released(move |_, _| {
                    e.set(e.get() + 1);
                    Ok(())
                }),
        );
        pilot.press(Point::new(10, 96)).unwrap();
        pilot.press(Point::new(10, 56)).unwrap();
        pilot.press(Point::new(10, 56)).unwrap();
        pilot.press(Point::new(10, 1)).unwrap();
        pilot.lift().unwrap();

        assert_eq!(*moves.borrow(), vec![0.1, 0.5, 1.0]);
        assert_eq!(ends.get(), 1);
        assert_eq!(pilot.ui().value(id).unwrap(), Value::Float(1.0));
    }

    #[test]
    fn moving_erases_the_old_slide() {
        let pilot = Pilot::new(320, 240);
        let id = open_slider(&pilot, Slider::new(Point::new(0, 0), 106).with_divisions(0));
        let first = pilot
            .surface()
            .ops()
            .into_iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { region, .. } => Some(region),
                _ => None,
            })
            .last()
            .unwrap();
        pilot.surface().clear_log();
        pilot.ui().set_value(id, 0.5_f32).unwrap();
        let ops = pilot.surface().ops();
        assert_eq!(ops[0], DrawOp::FillRect { region: first, color: Color::BLACK });
        assert_eq!(first.y, 3 + 100 - 3);
    }
}
