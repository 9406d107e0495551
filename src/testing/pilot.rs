//! Pilot: programmatic interaction with a headless engine.
//!
//! The `Pilot` builds a [`Ui`] over a [`RecordingSurface`] and a
//! [`ScriptedTouch`], then offers a high-level API for simulating the finger
//! (press, hold, lift, tap), running dispatch passes and letting registered
//! tasks make progress.

use std::time::Duration;

use crate::app::{GuiConfig, Ui};
use crate::error::Result;
use crate::event::PassOutcome;
use crate::geometry::Point;
use crate::screen::View;

use super::surface::RecordingSurface;
use super::touch::ScriptedTouch;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless engine driver for testing.
///
/// Dispatch passes are run explicitly; nothing polls the touch source in the
/// background unless the test calls [`Ui::serve`] itself.
///
/// # Examples
///
/// ```ignore
/// use tft_gui::testing::Pilot;
///
/// let pilot = Pilot::new(320, 240);
/// pilot.open(|ui| { /* add widgets */ Ok(Blank) })?;
/// pilot.tap(Point::new(10, 10))?;
/// ```
pub struct Pilot {
    ui: Ui,
    surface: RecordingSurface,
    touch: ScriptedTouch,
}

impl Pilot {
    /// Create a headless engine with a panel of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        let surface = RecordingSurface::new(width, height);
        let touch = ScriptedTouch::new();
        let ui = Ui::build(Box::new(surface.clone()), Box::new(touch.clone()), GuiConfig::default());
        Self { ui, surface, touch }
    }

    /// Create a Pilot with an explicit configuration.
    pub fn with_config(width: i32, height: i32, config: GuiConfig) -> Result<Self> {
        let surface = RecordingSurface::new(width, height);
        let touch = ScriptedTouch::new();
        let ui = Ui::new(surface.clone(), touch.clone(), config)?;
        Ok(Self { ui, surface, touch })
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn touch(&self) -> &ScriptedTouch {
        &self.touch
    }

    /// Navigate forward to a fresh screen.
    pub fn open<F, V>(&self, factory: F) -> Result<()>
    where
        F: FnOnce(&Ui) -> Result<V> + 'static,
        V: View,
    {
        self.ui.change_to(factory)
    }

    // ── Touch simulation ─────────────────────────────────────────────

    /// Put the finger at `at` and run one dispatch pass.
    pub fn press(&self, at: Point) -> Result<PassOutcome> {
        self.touch.touch_at(at);
        self.ui.poll_touch()
    }

    /// Run `passes` dispatch passes with the finger where it is.
    pub fn hold(&self, passes: usize) -> Result<()> {
        for _ in 0..passes {
            self.ui.poll_touch()?;
        }
        Ok(())
    }

    /// Lift the finger and run one dispatch pass.
    pub fn lift(&self) -> Result<PassOutcome> {
        self.touch.lift();
        self.ui.poll_touch()
    }

    /// Press at `at` and lift straight away.
    pub fn tap(&self, at: Point) -> Result<()> {
        self.press(at)?;
        self.lift()?;
        Ok(())
    }

    // ── Scheduler ────────────────────────────────────────────────────

    /// Let registered tasks run for `duration` of (possibly paused) time.
    pub async fn advance(&self, duration: Duration) {
        self.ui.run_until(tokio::time::sleep(duration)).await;
    }

    /// Let every ready task run once.
    pub async fn settle(&self) {
        self.ui.run_until(tokio::task::yield_now()).await;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
