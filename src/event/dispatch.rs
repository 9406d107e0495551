//! Touch dispatch: one pass of the polling loop.
//!
//! Each pass reads the touch controller once. A sample is hit-tested against
//! the current screen's touch list and delivered as a press; a pass with the
//! panel released delivers exactly one release to every widget pressed since
//! the previous release, wherever it lives now. Navigation requested by
//! handlers runs at the end of the pass.

use tracing::trace;

use crate::app::Ui;
use crate::error::{GuiError, Result};
use crate::geometry::Point;
use crate::screen::ScreenId;
use crate::widget::{Hook, Widget, WidgetId};

use super::input::{self, Reading};

/// What a dispatch pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Nothing to do: no screen, or the panel is untouched.
    Idle,
    /// A sample at `at` was delivered to `pressed` widgets (possibly zero).
    Touched { at: Point, pressed: usize },
    /// The panel is held but no usable sample arrived.
    Held,
    /// The finger lifted; `count` widgets received their release.
    Released { count: usize },
}

impl PassOutcome {
    /// Widgets pressed by this pass.
    pub fn pressed(self) -> usize {
        match self {
            PassOutcome::Touched { pressed, .. } => pressed,
            _ => 0,
        }
    }
}

impl Ui {
    /// Run one dispatch pass.
    pub fn poll_touch(&self) -> Result<PassOutcome> {
        self.count_pass();
        let Some(screen) = self.current_screen() else {
            return Ok(PassOutcome::Idle);
        };
        self.deferred(|| {
            let reading = {
                let mut touch = self.inner.touch.borrow_mut();
                input::poll(&mut **touch)
            };
            match reading {
                Reading::Sample(at) => {
                    let pressed = self.press_pass(screen, at)?;
                    Ok(PassOutcome::Touched { at, pressed })
                }
                Reading::Held => Ok(PassOutcome::Held),
                Reading::Lifted => self.release_pass(),
            }
        })
    }

    fn press_pass(&self, screen: ScreenId, at: Point) -> Result<usize> {
        let mut pressed = 0;
        for id in self.touch_list(screen) {
            match self.with_widget_dyn(id, |w| self.try_press(w, at)) {
                Ok(true) => pressed += 1,
                Ok(false) => {}
                // Dropped by an earlier handler in this pass.
                Err(GuiError::UnknownWidget(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(pressed)
    }

    fn try_press(&self, widget: &mut dyn Widget, at: Point) -> Result<bool> {
        if !widget.is_visible() || widget.is_greyed_out() || !widget.region().contains(at) {
            return Ok(false);
        }
        let id = widget.id();
        let Some(latch) = widget.latch_mut() else {
            return Ok(false);
        };
        if latch.busy && !latch.can_drag {
            return Ok(false);
        }
        let first = !latch.was_touched;
        latch.was_touched = true;
        if first {
            self.inner.state.borrow_mut().touched.push(id);
        }
        trace!(widget = ?id, kind = widget.widget_type(), x = at.x, y = at.y, "press");
        widget.on_press(self, at)?;
        if let Some(latch) = widget.latch_mut() {
            latch.busy = true;
        }
        Ok(true)
    }

    /// Release every pressed widget. A failing handler does not stop the
    /// others from being released; the first error is returned afterwards.
    fn release_pass(&self) -> Result<PassOutcome> {
        let touched = std::mem::take(&mut self.inner.state.borrow_mut().touched);
        let mut count = 0;
        let mut first_error = None;
        for id in touched {
            match self.with_widget_dyn(id, |w| self.release(w)) {
                Ok(true) => count += 1,
                Ok(false) | Err(GuiError::UnknownWidget(_)) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(if count == 0 { PassOutcome::Idle } else { PassOutcome::Released { count } }),
        }
    }

    fn release(&self, widget: &mut dyn Widget) -> Result<bool> {
        let Some(latch) = widget.latch_mut() else {
            return Ok(false);
        };
        if !latch.was_touched {
            return Ok(false);
        }
        latch.was_touched = false;
        latch.busy = false;
        trace!(widget = ?widget.id(), kind = widget.widget_type(), "release");
        widget.on_release(self)?;
        self.fire(widget, Hook::Release)?;
        Ok(true)
    }

    /// Latch a widget as pressed by the finger already down, so the ongoing
    /// press neither presses it again nor skips its release.
    pub(crate) fn hold_touch(&self, widget: &mut dyn Widget) {
        let id = widget.id();
        let Some(latch) = widget.latch_mut() else {
            return;
        };
        latch.busy = true;
        if !latch.was_touched {
            latch.was_touched = true;
            self.inner.state.borrow_mut().touched.push(id);
        }
    }

    /// Widgets pressed and not yet released.
    pub fn pressed_widgets(&self) -> Vec<WidgetId> {
        self.inner.state.borrow().touched.clone()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
