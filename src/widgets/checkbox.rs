//! Checkbox widget: a square that toggles a boolean on each press.

use std::any::Any;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::render::{Color, DisplayProxy};
use crate::widget::{TouchLatch, Widget, WidgetCore};

/// A boolean toggle.
///
/// Checked boxes are filled with the fill colour if one is set, otherwise
/// crossed.
pub struct Checkbox {
    core: WidgetCore,
    latch: TouchLatch,
    fillcolor: Option<Color>,
}

impl Checkbox {
    /// An unchecked box with sides of `size` pixels.
    pub fn new(at: Point, size: i32) -> Self {
        let mut core = WidgetCore::new(Region::new(at.x, at.y, size, size));
        core.seed_value(false);
        Self { core, latch: TouchLatch::new(false), fillcolor: None }
    }

    pub fn with_fillcolor(mut self, color: Color) -> Self {
        self.fillcolor = Some(color);
        self
    }

    pub fn is_checked(&self) -> bool {
        self.core.value().as_bool().unwrap_or(false)
    }
}

impl Widget for Checkbox {
    fn widget_type(&self) -> &'static str {
        "Checkbox"
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
        let inner = self.core.inner();
        let fg = self.core.fg();
        let checked = self.is_checked();
        match (checked, self.fillcolor) {
            (true, Some(fill)) => display.fill_rect(inner, fill)?,
            (true, None) => {}
            (false, _) => display.fill_rect(inner, self.core.bg())?,
        }
        display.draw_rect(inner, fg)?;
        if checked && self.fillcolor.is_none() {
            display.draw_line(inner.location(), inner.corner(), fg)?;
            display.draw_line(Point::new(inner.x, inner.bottom()), Point::new(inner.right(), inner.y), fg)?;
        }
        Ok(())
    }

    fn on_press(&mut self, ui: &Ui, _at: Point) -> Result<()> {
        let toggled = !self.is_checked();
        ui.update_value(self, toggled)?;
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
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn open_box(pilot: &Pilot, checkbox: Checkbox) -> WidgetId {
        let slot = Rc::new(Cell::new(None));
        let out = slot.clone();
        pilot
            .open(move |ui: &Ui| {
                out.set(Some(ui.add(checkbox)?));
                Ok(Blank)
            })
            .unwrap();
        slot.get().unwrap()
    }

    #[test]
    fn each_press_toggles() {
        let pilot = Pilot::new(320, 240);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let id = open_box(
            &pilot,
            Checkbox::new(Point::new(0, 0), 20).on_change(move |_, w| {
                log.borrow_mut().push(w.value().clone());
                Ok(())
            }),
        );
        pilot.press(Point::new(5, 5)).unwrap();
        pilot.hold(4).unwrap();
        pilot.lift().unwrap();
        pilot.tap(Point::new(5, 5)).unwrap();
        assert_eq!(*seen.borrow(), vec![Value::Bool(true), Value::Bool(false)]);
        assert_eq!(pilot.ui().value(id).unwrap(), Value::Bool(false));
    }

    #[test]
    fn checked_without_fill_draws_a_cross() {
        let pilot = Pilot::new(320, 240);
        let id = open_box(&pilot, Checkbox::new(Point::new(0, 0), 10));
        pilot.surface().clear_log();
        pilot.ui().set_value(id, true).unwrap();
        assert_eq!(
            pilot.surface().ops(),
            vec![
                DrawOp::Rect { region: Region::new(0, 0, 10, 10), color: Color::WHITE },
                DrawOp::Line { from: Point::new(0, 0), to: Point::new(10, 10), color: Color::WHITE },
                DrawOp::Line { from: Point::new(0, 10), to: Point::new(10, 0), color: Color::WHITE },
            ]
        );
    }

    #[test]
    fn checked_with_fill_is_filled() {
        let pilot = Pilot::new(320, 240);
        let id = open_box(&pilot, Checkbox::new(Point::new(0, 0), 10).with_fillcolor(Color::GREEN));
        pilot.surface().clear_log();
        pilot.ui().set_value(id, true).unwrap();
        assert_eq!(
            pilot.surface().ops(),
            vec![
                DrawOp::FillRect { region: Region::new(0, 0, 10, 10), color: Color::GREEN },
                DrawOp::Rect { region: Region::new(0, 0, 10, 10), color: Color::WHITE },
            ]
        );
    }
}
