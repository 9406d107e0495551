//! Dropdown widget: a one-line box that opens a list of choices.
//!
//! Pressing the box opens a modal [`Aperture`] just beneath it holding a
//! borderless [`Listbox`]. Picking an entry closes the list and stores the
//! entry's index as the dropdown's value. The list box shares the
//! dropdown's bottom edge, so closing it repaints the dropdown with the new
//! choice.

use std::any::Any;

use tracing::debug;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region, Size};
use crate::render::{Color, DisplayProxy};
use crate::screen::Aperture;
use crate::widget::{TouchLatch, Widget, WidgetCore, WidgetExt};

use super::label::fit;
use super::listbox::{collect_elements, entry_height, index_in, Listbox};

const BORDER: i32 = 2;

/// A compact single choice.
///
/// # Examples
///
/// ```ignore
/// let speed = Dropdown::new(ui, Point::new(10, 10), 150, ["slow", "medium", "fast"])?
///     .on_change(|ui, dropdown| Ok(()));
/// ```
pub struct Dropdown {
    core: WidgetCore,
    latch: TouchLatch,
    elements: Vec<String>,
    select_color: Color,
}

impl Dropdown {
    /// A dropdown `width` pixels wide, one entry tall, showing the first
    /// entry.
    pub fn new<I, S>(ui: &Ui, at: Point, width: i32, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = collect_elements(elements)?;
        let height = entry_height(ui) + 2 * BORDER;
        let mut core = WidgetCore::new(Region::new(at.x, at.y, width, height));
        core.border = BORDER;
        core.fill = true;
        core.seed_value(0_i64);
        Ok(Self { core, latch: TouchLatch::new(false), elements, select_color: Color::LIGHTBLUE })
    }

    /// Show entry `index`; an index past the end shows the first (builder).
    pub fn with_selected(mut self, index: usize) -> Self {
        let index = if index < self.elements.len() { index } else { 0 };
        self.core.seed_value(index as i64);
        self
    }

    /// Fill colour of the current entry in the opened list (builder).
    pub fn with_select_color(mut self, color: Color) -> Self {
        self.select_color = color;
        self
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn selected(&self) -> usize {
        index_in(self.core.value(), self.elements.len())
    }

    /// Text of the current entry.
    pub fn text(&self) -> &str {
        &self.elements[self.selected()]
    }

    /// The text field left of the arrow.
    fn field(&self) -> Region {
        let region = self.core.region;
        let inner = self.core.inner();
        Region::new(inner.x, inner.y, region.width - region.height - BORDER, inner.height)
    }

    fn draw_arrow(&self, display: &mut DisplayProxy) -> Result<()> {
        let region = self.core.region;
        let fg = self.core.fg();
        display.draw_vline(Point::new(region.x + region.width - region.height, region.y), region.height, fg)?;
        let half = (region.height - 8) / 2;
        if half > 0 {
            let cx = region.x + region.width - region.height / 2;
            let cy = region.y + region.height / 2;
            let (left, right, tip) =
                (Point::new(cx - half, cy - half), Point::new(cx + half, cy - half), Point::new(cx, cy + half));
            display.draw_hline(left, 2 * half, fg)?;
            display.draw_line(left, tip, fg)?;
            display.draw_line(right, tip, fg)?;
        }
        Ok(())
    }

    /// Navigate to the list of choices.
    fn open_list(&self, ui: &Ui) -> Result<()> {
        let region = self.core.region;
        let at = Point::new(region.x, region.bottom());
        let width = region.width - region.height;
        let owner = self.core.id();
        let elements = self.elements.clone();
        let selected = self.selected();
        let (fg, bg, font, select) = (self.core.fg(), self.core.bg(), self.core.font(), self.select_color);
        debug!(widget = ?owner, entries = elements.len(), "dropdown opened");
        ui.change_to(move |ui: &Ui| {
            let list = Listbox::new(ui, at + Point::new(1, 1), width - 2, elements)?
                .borderless()
                .with_selected(selected)
                .with_select_color(select)
                .with_fgcolor(fg)
                .with_bgcolor(bg)
                .with_fontcolor(font)
                .on_released(move |ui, list| {
                    let choice = list.value().clone();
                    ui.back()?;
                    ui.set_value(owner, choice)?;
                    Ok(())
                });
            let height = list.region().height + 2;
            ui.add(list)?;
            Ok(Aperture::new(at, Size::new(width, height)).with_bgcolor(bg).with_fgcolor(fg))
        })
    }
}

impl Widget for Dropdown {
    fn widget_type(&self) -> &'static str {
        "Dropdown"
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
            self.draw_arrow(display)?;
        }
        let field = self.field();
        display.fill_rect(field, self.core.bg())?;
        let fitted = fit(display, self.text(), field.width);
        display.draw_text(Point::new(field.x, field.y + 1), fitted, self.core.font())?;
        Ok(())
    }

    fn on_press(&mut self, ui: &Ui, _at: Point) -> Result<()> {
        if self.elements.len() > 1 {
            self.open_list(ui)?;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuiError;
    use crate::screen::Blank;
    use crate::testing::{DrawOp, Pilot};
    use crate::widget::{Value, WidgetId};
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const SPEEDS: [&str; 3] = ["slow", "medium", "fast"];

    fn open_dropdown(pilot: &Pilot, build: impl FnOnce(&Ui) -> Result<Dropdown> + 'static) -> WidgetId {
        let slot = Rc::new(Cell::new(None));
        let out = slot.clone();
        pilot
            .open(move |ui: &Ui| {
                out.set(Some(ui.add(build(ui)?)?));
                Ok(Blank)
            })
            .unwrap();
        slot.get().unwrap()
    }

    // The dropdown at (10, 10) is 120x18. Its list opens at (10, 28), 102
    // wide; list rows are 14px tall from y = 29.

    #[test]
    fn empty_dropdowns_are_rejected() {
        let pilot = Pilot::new(320, 240);
        let result = Dropdown::new(pilot.ui(), Point::new(0, 0), 100, Vec::<&str>::new());
        assert!(matches!(result, Err(GuiError::EmptyList)));
    }

    #[test]
    fn shows_the_current_entry_beside_the_arrow() {
        let pilot = Pilot::new(320, 240);
        open_dropdown(&pilot, |ui| Ok(Dropdown::new(ui, Point::new(10, 10), 120, SPEEDS)?.with_selected(1)));
        let ops = pilot.surface().ops();
        assert!(ops.contains(&DrawOp::Rect { region: Region::new(10, 10, 120, 18), color: Color::WHITE }));
        assert!(ops.contains(&DrawOp::Line { from: Point::new(112, 10), to: Point::new(112, 28), color: Color::WHITE }));
        assert!(ops.contains(&DrawOp::Text { at: Point::new(12, 13), text: "medium".into(), color: Color::WHITE }));
    }

    #[test]
    fn pressing_opens_a_modal_list_beneath() {
        let pilot = Pilot::new(320, 240);
        open_dropdown(&pilot, |ui| Dropdown::new(ui, Point::new(10, 10), 120, SPEEDS));
        let home = pilot.ui().current_screen().unwrap();
        pilot.tap(Point::new(20, 15)).unwrap();

        let ui = pilot.ui();
        let list = ui.current_screen().unwrap();
        assert_ne!(list, home);
        assert!(ui.is_modal(list));
        assert_eq!(ui.aperture_of(list).unwrap().region, Region::new(10, 28, 102, 3 * 14 + 2));
        let widgets = ui.screen_widgets(list).unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(ui.with_widget::<Listbox, _>(widgets[0], |l| l.region()).unwrap(), Region::new(11, 29, 100, 42));
    }

    #[test]
    fn picking_an_entry_closes_the_list_and_updates_the_dropdown() {
        let pilot = Pilot::new(320, 240);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let id = open_dropdown(&pilot, move |ui| {
            Ok(Dropdown::new(ui, Point::new(10, 10), 120, SPEEDS)?.on_change(move |_, dropdown| {
                log.borrow_mut().push(dropdown.value().clone());
                Ok(())
            }))
        });
        let home = pilot.ui().current_screen().unwrap();
        pilot.tap(Point::new(20, 15)).unwrap();

        pilot.press(Point::new(20, 60)).unwrap();
        pilot.surface().clear_log();
        pilot.lift().unwrap();

        assert_eq!(pilot.ui().current_screen(), Some(home));
        assert_eq!(pilot.ui().value(id).unwrap(), Value::Int(2));
        assert_eq!(*seen.borrow(), vec![Value::Int(2)]);
        assert_eq!(pilot.ui().with_widget::<Dropdown, _>(id, |d| d.text().to_owned()).unwrap(), "fast");
        assert!(pilot.surface().ops().contains(&DrawOp::Text {
            at: Point::new(12, 13),
            text: "fast".into(),
            color: Color::WHITE,
        }));
    }

    #[test]
    fn a_single_entry_never_opens() {
        let pilot = Pilot::new(320, 240);
        open_dropdown(&pilot, |ui| Dropdown::new(ui, Point::new(10, 10), 120, ["only"]));
        let home = pilot.ui().current_screen().unwrap();
        pilot.tap(Point::new(20, 15)).unwrap();
        assert_eq!(pilot.ui().current_screen(), Some(home));
    }
}
