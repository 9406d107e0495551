//! Widget trait: the capability set the engine needs from every control.
//!
//! The `Widget` trait is object-safe; the engine stores widgets as
//! `Box<dyn Widget>` and reaches concrete types through `as_any`. The
//! `WidgetExt` trait adds builder-style methods for colours, border and
//! callbacks to every widget.

use std::any::Any;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::render::{Color, DisplayProxy};
use crate::screen::ScreenId;

use super::base::{Hook, TouchLatch, WidgetCore, WidgetId};
use super::value::Value;

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by all widgets.
///
/// Passive widgets implement the required methods only. Interactive widgets
/// also return their [`TouchLatch`] and override the press/release handlers.
/// The engine decides *whether* to draw (owning screen current, widget
/// visible) and sets the display's grey flag; `show` only decides *how*.
pub trait Widget: Any {
    /// Type name used in logs and errors (e.g. "Button", "Slider").
    fn widget_type(&self) -> &'static str;

    fn core(&self) -> &WidgetCore;

    fn core_mut(&mut self) -> &mut WidgetCore;

    /// Touch state. `None` for widgets that never receive touches.
    fn latch(&self) -> Option<&TouchLatch> {
        None
    }

    fn latch_mut(&mut self) -> Option<&mut TouchLatch> {
        None
    }

    /// Render the widget's current state.
    ///
    /// When `core().redraw` is set the static decoration must be drawn too
    /// (and the flag cleared).
    fn show(&mut self, display: &mut DisplayProxy) -> Result<()>;

    /// Called for a hit at `at`. Non-draggable widgets see this once per press.
    fn on_press(&mut self, _ui: &Ui, _at: Point) -> Result<()> {
        Ok(())
    }

    /// Called once when the finger lifts after a press. The engine fires the
    /// [`Hook::Release`] callback afterwards.
    fn on_release(&mut self, _ui: &Ui) -> Result<()> {
        Ok(())
    }

    /// Called when a press outlasts the long-press threshold. The engine fires
    /// the [`Hook::LongPress`] callback afterwards.
    fn on_long_press(&mut self, _ui: &Ui) -> Result<()> {
        Ok(())
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    // ── Provided ─────────────────────────────────────────────────────

    fn id(&self) -> WidgetId {
        self.core().id
    }

    fn owner(&self) -> ScreenId {
        self.core().owner
    }

    fn region(&self) -> Region {
        self.core().region
    }

    fn value(&self) -> &Value {
        &self.core().value
    }

    fn is_visible(&self) -> bool {
        self.core().visible
    }

    fn is_greyed_out(&self) -> bool {
        self.core().greyed_out
    }

    fn is_interactive(&self) -> bool {
        self.latch().is_some()
    }

    /// Whether the widget's bounding box touches `region`.
    fn overlaps(&self, region: Region) -> bool {
        self.core().region.overlaps(region)
    }

    /// Fill the background (if the widget has one) and draw the border.
    fn draw_border(&self, display: &mut DisplayProxy) -> Result<()> {
        let core = self.core();
        if core.fill {
            display.fill_rect(core.region, core.bg())?;
        }
        if core.border > 0 {
            display.draw_rect(core.region, core.fg())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WidgetExt
// ---------------------------------------------------------------------------

/// Builder-style configuration shared by all widgets.
///
/// Automatically implemented for all types that implement `Widget`.
pub trait WidgetExt: Widget {
    fn with_fgcolor(mut self, color: Color) -> Self
    where
        Self: Sized,
    {
        self.core_mut().fgcolor = Some(color);
        self
    }

    /// Setting a background colour also makes the widget fill it.
    fn with_bgcolor(mut self, color: Color) -> Self
    where
        Self: Sized,
    {
        let core = self.core_mut();
        core.bgcolor = Some(color);
        core.fill = true;
        self
    }

    fn with_fontcolor(mut self, color: Color) -> Self
    where
        Self: Sized,
    {
        self.core_mut().fontcolor = Some(color);
        self
    }

    fn with_border(mut self, width: i32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().border = width.max(0);
        self
    }

    fn with_value(mut self, value: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.core_mut().seed_value(value);
        self
    }

    fn greyed_out(mut self, greyed: bool) -> Self
    where
        Self: Sized,
    {
        self.core_mut().greyed_out = greyed;
        self
    }

    /// Attach a callback to a hook.
    fn on<F>(mut self, hook: Hook, callback: F) -> Self
    where
        Self: Sized,
        F: FnMut(&Ui, &mut dyn Widget) -> Result<()> + 'static,
    {
        self.core_mut().set_callback(hook, Box::new(callback));
        self
    }

    fn on_change<F>(self, callback: F) -> Self
    where
        Self: Sized,
        F: FnMut(&Ui, &mut dyn Widget) -> Result<()> + 'static,
    {
        self.on(Hook::Change, callback)
    }

    fn on_pressed<F>(self, callback: F) -> Self
    where
        Self: Sized,
        F: FnMut(&Ui, &mut dyn Widget) -> Result<()> + 'static,
    {
        self.on(Hook::Press, callback)
    }

    fn on_released<F>(self, callback: F) -> Self
    where
        Self: Sized,
        F: FnMut(&Ui, &mut dyn Widget) -> Result<()> + 'static,
    {
        self.on(Hook::Release, callback)
    }

    fn on_long_pressed<F>(self, callback: F) -> Self
    where
        Self: Sized,
        F: FnMut(&Ui, &mut dyn Widget) -> Result<()> + 'static,
    {
        self.on(Hook::LongPress, callback)
    }
}

// Blanket implementation: every Widget gets WidgetExt for free.
impl<T: Widget> WidgetExt for T {}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::GreyStyle;
    use crate::testing::{DrawOp, RecordingSurface};

    // -----------------------------------------------------------------------
    // Test widgets
    // -----------------------------------------------------------------------

    struct Plain {
        core: WidgetCore,
    }

    impl Widget for Plain {
        fn widget_type(&self) -> &'static str {
            "Plain"
        }
        fn core(&self) -> &WidgetCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut WidgetCore {
            &mut self.core
        }
        fn show(&mut self, _display: &mut DisplayProxy) -> Result<()> {
            Ok(())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Touchy {
        core: WidgetCore,
        latch: TouchLatch,
    }

    impl Widget for Touchy {
        fn widget_type(&self) -> &'static str {
            "Touchy"
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
        fn show(&mut self, _display: &mut DisplayProxy) -> Result<()> {
            Ok(())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn plain(region: Region) -> Plain {
        Plain { core: WidgetCore::new(region) }
    }

    // ── Capabilities ─────────────────────────────────────────────────

    #[test]
    fn interactive_only_with_latch() {
        assert!(!plain(Region::EMPTY).is_interactive());
        let t = Touchy { core: WidgetCore::new(Region::EMPTY), latch: TouchLatch::new(true) };
        assert!(t.is_interactive());
        assert!(t.latch().is_some_and(|l| l.can_drag));
    }

    #[test]
    fn overlaps_uses_bounding_box() {
        let w = plain(Region::new(10, 10, 20, 20));
        assert!(w.overlaps(Region::new(25, 25, 50, 50)));
        assert!(!w.overlaps(Region::new(31, 0, 5, 5)));
    }

    #[test]
    fn downcast_via_as_any() {
        let boxed: Box<dyn Widget> = Box::new(plain(Region::EMPTY));
        assert!(boxed.as_any().downcast_ref::<Plain>().is_some());
        assert!(boxed.as_any().downcast_ref::<Touchy>().is_none());
    }

    // ── Builders ─────────────────────────────────────────────────────

    #[test]
    fn builder_sets_colours_and_fill() {
        let w = plain(Region::EMPTY)
            .with_fgcolor(Color::RED)
            .with_bgcolor(Color::BLUE)
            .with_border(-3);
        assert_eq!(w.core().fgcolor, Some(Color::RED));
        assert!(w.core().fill);
        assert_eq!(w.core().border, 0);
    }

    #[test]
    fn builder_attaches_callbacks() {
        let w = plain(Region::EMPTY).on_change(|_, _| Ok(())).on_released(|_, _| Ok(()));
        assert!(w.core().has_callback(Hook::Change));
        assert!(w.core().has_callback(Hook::Release));
        assert!(!w.core().has_callback(Hook::Press));
    }

    // ── draw_border ──────────────────────────────────────────────────

    #[test]
    fn draw_border_fills_then_outlines() {
        let surface = RecordingSurface::new(100, 100);
        let mut display = DisplayProxy::new(Box::new(surface.clone()), GreyStyle::default());
        let r = Region::new(5, 5, 10, 10);
        let w = plain(r).with_bgcolor(Color::BLUE).with_fgcolor(Color::RED).with_border(1);
        w.draw_border(&mut display).unwrap();
        assert_eq!(
            surface.ops(),
            vec![
                DrawOp::FillRect { region: r, color: Color::BLUE },
                DrawOp::Rect { region: r, color: Color::RED },
            ]
        );
    }

    #[test]
    fn draw_border_without_fill_or_border_draws_nothing() {
        let surface = RecordingSurface::new(100, 100);
        let mut display = DisplayProxy::new(Box::new(surface.clone()), GreyStyle::default());
        plain(Region::new(0, 0, 5, 5)).draw_border(&mut display).unwrap();
        assert!(surface.ops().is_empty());
    }
}
