//! Engine-side widget access: registration, checkout, values and drawing.
//!
//! Widgets live in the engine's arena. To run a handler the engine checks the
//! widget out (its slot is empty until it is checked back in), so a handler
//! may freely call back into [`Ui`] for *other* widgets. Touching the widget
//! that is already out yields [`GuiError::WidgetInUse`]; handlers receive
//! their own widget as `&mut dyn Widget` instead.

use tracing::{debug, trace};

use crate::app::Ui;
use crate::error::{GuiError, Result};

use super::base::{Hook, WidgetId};
use super::traits::Widget;
use super::value::Value;

impl Ui {
    // ── Registration ─────────────────────────────────────────────────

    /// Register a widget with the current screen.
    ///
    /// The widget joins the screen's display list, and its touch list too if
    /// it is interactive. Nothing is drawn until the screen is (re)opened or
    /// the widget changes.
    pub fn add<W: Widget>(&self, mut widget: W) -> Result<WidgetId> {
        let owner = self.current_screen().ok_or(GuiError::NoActiveScreen)?;
        {
            let display = self.inner.display.borrow();
            widget.core_mut().resolve_colors(display.foreground(), display.background());
        }
        widget.core_mut().owner = owner;
        let interactive = widget.is_interactive();
        let kind = widget.widget_type();

        let mut st = self.inner.state.borrow_mut();
        let id = st.widgets.insert_with_key(|id| {
            widget.core_mut().id = id;
            let boxed: Box<dyn Widget> = Box::new(widget);
            Some(boxed)
        });
        if let Some(entry) = st.screens.get_mut(owner) {
            entry.display_list.push(id);
            if interactive {
                entry.touch_list.push(id);
            }
        }
        debug!(widget = ?id, kind, screen = ?owner, interactive, "widget added");
        Ok(id)
    }

    /// Number of widgets alive across all screens.
    pub fn widget_count(&self) -> usize {
        self.inner.state.borrow().widgets.len()
    }

    // ── Checkout ─────────────────────────────────────────────────────

    pub(crate) fn checkout(&self, id: WidgetId) -> Result<Box<dyn Widget>> {
        let mut st = self.inner.state.borrow_mut();
        let slot = st.widgets.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        slot.take().ok_or(GuiError::WidgetInUse(id))
    }

    /// Return a widget to its slot. A widget whose screen was dropped while
    /// it was out is dropped here.
    pub(crate) fn checkin(&self, id: WidgetId, widget: Box<dyn Widget>) {
        let orphan = {
            let mut st = self.inner.state.borrow_mut();
            match st.widgets.get_mut(id) {
                Some(slot) => {
                    *slot = Some(widget);
                    None
                }
                None => Some(widget),
            }
        };
        drop(orphan);
    }

    /// Run `f` on a checked-out widget.
    pub fn with_widget_dyn<R>(
        &self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget) -> Result<R>,
    ) -> Result<R> {
        self.deferred(|| {
            let mut widget = self.checkout(id)?;
            let result = f(widget.as_mut());
            self.checkin(id, widget);
            result
        })
    }

    /// Run `f` on a widget of concrete type `W`.
    pub fn with_widget<W: Widget, R>(&self, id: WidgetId, f: impl FnOnce(&mut W) -> R) -> Result<R> {
        self.with_widget_dyn(id, |widget| match widget.as_any_mut().downcast_mut::<W>() {
            Some(w) => Ok(f(w)),
            None => Err(GuiError::WrongWidgetType { id, expected: std::any::type_name::<W>() }),
        })
    }

    // ── Values ───────────────────────────────────────────────────────

    /// The stored value of a widget.
    pub fn value(&self, id: WidgetId) -> Result<Value> {
        let st = self.inner.state.borrow();
        let slot = st.widgets.get(id).ok_or(GuiError::UnknownWidget(id))?;
        let widget = slot.as_ref().ok_or(GuiError::WidgetInUse(id))?;
        Ok(widget.core().value.clone())
    }

    /// Set a widget's value. See [`Ui::update_value`].
    pub fn set_value(&self, id: WidgetId, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        self.with_widget_dyn(id, |widget| self.update_value(widget, value))
    }

    /// Store a new value on a widget that is already in hand.
    ///
    /// Floats are clamped into `[0.0, 1.0]`. An unchanged value is a no-op: no
    /// callback, no redraw. Otherwise the change callback fires and, if the
    /// widget's screen is current, the widget redraws; on any other screen the
    /// value is stored silently and shows up when that screen is reopened.
    /// Returns whether the value changed.
    pub fn update_value(&self, widget: &mut dyn Widget, value: impl Into<Value>) -> Result<bool> {
        let value = value.into().clamped();
        if widget.core().value == value {
            return Ok(false);
        }
        trace!(widget = ?widget.id(), %value, "value changed");
        widget.core_mut().value = value;
        self.fire(widget, Hook::Change)?;
        self.draw(widget)?;
        Ok(true)
    }

    /// Invoke a widget's callback, if one is attached to `hook`.
    pub fn fire(&self, widget: &mut dyn Widget, hook: Hook) -> Result<()> {
        let Some(mut callback) = widget.core_mut().take_callback(hook) else {
            return Ok(());
        };
        let result = self.deferred(|| callback(self, &mut *widget));
        widget.core_mut().restore_callback(hook, callback);
        result
    }

    // ── Greyed-out / visibility ──────────────────────────────────────

    pub fn set_greyed_out(&self, id: WidgetId, greyed: bool) -> Result<()> {
        self.with_widget_dyn(id, |widget| self.grey_out(widget, greyed))
    }

    /// Grey out (or restore) a widget in hand. Greyed-out widgets ignore
    /// touches and draw through the disabled style.
    pub fn grey_out(&self, widget: &mut dyn Widget, greyed: bool) -> Result<()> {
        if widget.is_greyed_out() == greyed {
            return Ok(());
        }
        debug!(widget = ?widget.id(), greyed, "greyed-out changed");
        widget.core_mut().greyed_out = greyed;
        self.refresh(widget)
    }

    pub fn set_visible(&self, id: WidgetId, visible: bool) -> Result<()> {
        self.with_widget_dyn(id, |widget| self.show_or_hide(widget, visible))
    }

    /// Show or hide a widget in hand. Hiding erases its box to its background.
    pub fn show_or_hide(&self, widget: &mut dyn Widget, visible: bool) -> Result<()> {
        if widget.is_visible() == visible {
            return Ok(());
        }
        widget.core_mut().visible = visible;
        if visible {
            return self.refresh(widget);
        }
        if self.is_current(widget.owner()) {
            let mut display = self.inner.display.borrow_mut();
            display.set_grey(false);
            display.fill_rect(widget.region(), widget.core().bg())?;
        }
        Ok(())
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Redraw the widget's dynamic content if its screen is current.
    pub fn draw(&self, widget: &mut dyn Widget) -> Result<()> {
        self.paint(widget, false)
    }

    /// Redraw the widget fully (background, border, static decoration) if its
    /// screen is current.
    pub fn refresh(&self, widget: &mut dyn Widget) -> Result<()> {
        widget.core_mut().redraw = true;
        self.paint(widget, true)
    }

    fn paint(&self, widget: &mut dyn Widget, with_border: bool) -> Result<()> {
        if !widget.is_visible() || !self.is_current(widget.owner()) {
            return Ok(());
        }
        let mut display = self.inner.display.borrow_mut();
        display.set_grey(widget.is_greyed_out());
        let mut drawn = Ok(());
        if with_border {
            drawn = widget.draw_border(&mut display);
        }
        if drawn.is_ok() {
            drawn = widget.show(&mut display);
        }
        display.set_grey(false);
        drawn
    }

    // ── Long press ───────────────────────────────────────────────────

    /// Fire the long-press handlers if the widget is still being pressed.
    pub(crate) fn long_press(&self, id: WidgetId) -> Result<()> {
        let outcome = self.with_widget_dyn(id, |widget| {
            if !widget.latch().is_some_and(|l| l.was_touched) {
                return Ok(());
            }
            trace!(widget = ?id, "long press");
            widget.on_long_press(self)?;
            self.fire(widget, Hook::LongPress)
        });
        match outcome {
            Err(GuiError::UnknownWidget(_)) => Ok(()),
            other => other,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Region};
    use crate::render::Color;
    use crate::screen::Blank;
    use crate::testing::{DrawOp, Pilot};
    use crate::widget::WidgetExt;
    use crate::widgets::{Checkbox, Label, Slider};
    use std::cell::Cell;
    use std::rc::Rc;

    fn open_with<W: Widget>(pilot: &Pilot, widget: W) -> WidgetId {
        let slot = Rc::new(Cell::new(None));
        let out = slot.clone();
        pilot
            .ui()
            .change_to(move |ui: &Ui| {
                out.set(Some(ui.add(widget)?));
                Ok(Blank)
            })
            .unwrap();
        slot.get().unwrap()
    }

    // ── Registration ─────────────────────────────────────────────────

    #[test]
    fn add_without_screen_fails() {
        let pilot = Pilot::new(320, 240);
        let err = pilot.ui().add(Checkbox::new(Point::new(0, 0), 20)).unwrap_err();
        assert!(matches!(err, GuiError::NoActiveScreen));
    }

    #[test]
    fn add_sorts_into_display_and_touch_lists() {
        let pilot = Pilot::new(320, 240);
        let ui = pilot.ui();
        ui.change_to(|ui: &Ui| {
            ui.add(Label::new(ui, Point::new(0, 0), "passive"))?;
            ui.add(Checkbox::new(Point::new(0, 40), 20))?;
            Ok(Blank)
        })
        .unwrap();
        let screen = ui.current_screen().unwrap();
        assert_eq!(ui.screen_widgets(screen).unwrap().len(), 2);
        assert_eq!(ui.touch_list(screen).len(), 1);
    }

    #[test]
    fn unset_colours_resolve_to_display_defaults() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(&pilot, Checkbox::new(Point::new(0, 0), 20).with_fgcolor(Color::RED));
        let (fg, bg) = pilot
            .ui()
            .with_widget::<Checkbox, _>(id, |c| (c.core().fgcolor, c.core().bgcolor))
            .unwrap();
        assert_eq!(fg, Some(Color::RED));
        assert_eq!(bg, Some(Color::BLACK));
    }

    // ── Typed access ─────────────────────────────────────────────────

    #[test]
    fn with_widget_checks_the_type() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(&pilot, Checkbox::new(Point::new(0, 0), 20));
        let err = pilot.ui().with_widget::<Slider, _>(id, |_| ()).unwrap_err();
        assert!(matches!(err, GuiError::WrongWidgetType { .. }));
    }

    #[test]
    fn reentrant_access_is_refused() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(&pilot, Checkbox::new(Point::new(0, 0), 20));
        let ui = pilot.ui();
        let err = ui.with_widget_dyn(id, |_| ui.value(id)).unwrap_err();
        assert!(matches!(err, GuiError::WidgetInUse(w) if w == id));
        assert_eq!(ui.value(id).unwrap(), Value::Bool(false));
    }

    // ── Values ───────────────────────────────────────────────────────

    #[test]
    fn unchanged_value_is_a_no_op() {
        let pilot = Pilot::new(320, 240);
        let fired = Rc::new(Cell::new(0));
        let count = fired.clone();
        let id = open_with(
            &pilot,
            Slider::new(Point::new(10, 10), 100).with_value(0.5_f32).on_change(move |_, _| {
                count.set(count.get() + 1);
                Ok(())
            }),
        );
        pilot.surface().clear_log();

        assert!(!pilot.ui().set_value(id, 0.5_f32).unwrap());
        assert_eq!(fired.get(), 0);
        assert!(pilot.surface().ops().is_empty());

        assert!(pilot.ui().set_value(id, 0.75_f32).unwrap());
        assert_eq!(fired.get(), 1);
        assert!(!pilot.surface().ops().is_empty());
    }

    #[test]
    fn set_value_clamps_floats() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(&pilot, Slider::new(Point::new(10, 10), 100));
        pilot.ui().set_value(id, 1.7_f32).unwrap();
        assert_eq!(pilot.ui().value(id).unwrap(), Value::Float(1.0));
        pilot.ui().set_value(id, -2.0_f32).unwrap();
        assert_eq!(pilot.ui().value(id).unwrap(), Value::Float(0.0));
    }

    #[test]
    fn callback_error_propagates() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(
            &pilot,
            Checkbox::new(Point::new(0, 0), 20)
                .on_change(|_, _| Err(GuiError::InvalidIndex { index: 2, len: 1 })),
        );
        let err = pilot.ui().set_value(id, true).unwrap_err();
        assert!(matches!(err, GuiError::InvalidIndex { index: 2, len: 1 }));
        // The value itself was stored before the callback ran.
        assert_eq!(pilot.ui().value(id).unwrap(), Value::Bool(true));
    }

    // ── Greyed-out / visibility ──────────────────────────────────────

    #[test]
    fn grey_out_redraws_through_the_disabled_style() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(&pilot, Checkbox::new(Point::new(0, 0), 20).with_fgcolor(Color::RED));
        pilot.surface().clear_log();

        pilot.ui().set_greyed_out(id, true).unwrap();
        let ops = pilot.surface().ops();
        assert!(ops.contains(&DrawOp::Rect {
            region: Region::new(0, 0, 20, 20),
            color: Color::RED.desaturate(2),
        }));

        pilot.surface().clear_log();
        pilot.ui().set_greyed_out(id, true).unwrap();
        assert!(pilot.surface().ops().is_empty());
    }

    #[test]
    fn hiding_erases_to_background() {
        let pilot = Pilot::new(320, 240);
        let id = open_with(&pilot, Checkbox::new(Point::new(5, 5), 20).with_bgcolor(Color::BLUE));
        pilot.surface().clear_log();
        pilot.ui().set_visible(id, false).unwrap();
        assert_eq!(
            pilot.surface().ops(),
            vec![DrawOp::FillRect { region: Region::new(5, 5, 20, 20), color: Color::BLUE }]
        );
        pilot.surface().clear_log();
        pilot.ui().set_value(id, true).unwrap();
        assert!(pilot.surface().ops().is_empty());
    }
}
