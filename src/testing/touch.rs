//! Scripted touch controller.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::TouchSource;
use crate::geometry::Point;

#[derive(Debug, Default)]
struct Script {
    at: Option<Point>,
    paused: bool,
}

/// A [`TouchSource`] driven by the test.
///
/// While a finger is down every poll yields a sample at the last position,
/// unless samples are paused, in which case the panel reads as held with no
/// usable sample.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTouch {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTouch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the finger down (or move it) at `at`.
    pub fn touch_at(&self, at: Point) {
        let mut script = self.script.borrow_mut();
        script.at = Some(at);
        script.paused = false;
    }

    /// Lift the finger.
    pub fn lift(&self) {
        let mut script = self.script.borrow_mut();
        script.at = None;
        script.paused = false;
    }

    /// Withhold samples while keeping the panel pressed.
    pub fn pause_samples(&self, paused: bool) {
        self.script.borrow_mut().paused = paused;
    }

    pub fn is_down(&self) -> bool {
        self.script.borrow().at.is_some()
    }
}

impl TouchSource for ScriptedTouch {
    fn is_ready(&mut self) -> bool {
        let script = self.script.borrow();
        script.at.is_some() && !script.paused
    }

    fn is_pressed(&mut self) -> bool {
        self.is_down()
    }

    fn read_sample(&mut self) -> Option<Point> {
        let script = self.script.borrow();
        if script.paused {
            None
        } else {
            script.at
        }
    }
}
