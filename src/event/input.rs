//! Touch input contract.
//!
//! A resistive controller (XPT2046, ADS7843, ...) is polled, never interrupt
//! driven from the engine's point of view. The board support crate implements
//! [`TouchSource`]; calibration, averaging and rotation stay on that side, so
//! [`TouchSource::read_sample`] already yields panel pixel coordinates.

use crate::geometry::Point;

/// A polled touch controller.
pub trait TouchSource {
    /// A fresh sample is waiting to be read.
    fn is_ready(&mut self) -> bool;

    /// The panel is being pressed, whether or not a sample is ready.
    fn is_pressed(&mut self) -> bool;

    /// Read the pending sample. `None` means the reading was rejected (noise,
    /// out of range) while the panel may still be pressed.
    fn read_sample(&mut self) -> Option<Point>;
}

/// What one poll of the controller reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reading {
    /// A usable sample at this position.
    Sample(Point),
    /// Pressed, but no usable sample this pass.
    Held,
    /// Not pressed.
    Lifted,
}

/// Poll a controller once.
pub(crate) fn poll(source: &mut dyn TouchSource) -> Reading {
    if source.is_ready() {
        match source.read_sample() {
            Some(at) => Reading::Sample(at),
            None => Reading::Held,
        }
    } else if source.is_pressed() {
        Reading::Held
    } else {
        Reading::Lifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTouch;

    #[test]
    fn poll_reports_samples_and_lifts() {
        let touch = ScriptedTouch::new();
        let mut source: Box<dyn TouchSource> = Box::new(touch.clone());
        assert_eq!(poll(source.as_mut()), Reading::Lifted);

        touch.touch_at(Point::new(4, 5));
        assert_eq!(poll(source.as_mut()), Reading::Sample(Point::new(4, 5)));

        touch.pause_samples(true);
        assert_eq!(poll(source.as_mut()), Reading::Held);

        touch.lift();
        assert_eq!(poll(source.as_mut()), Reading::Lifted);
    }
}
