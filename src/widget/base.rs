//! Base widget state shared by every displayable object.
//!
//! [`WidgetCore`] is the non-interactive base: geometry, colours, border and
//! the redraw/greyed-out/visible flags plus the stored [`Value`] and user
//! callbacks. [`TouchLatch`] is the extra state an interactive widget carries
//! for the dispatch loop.

use slotmap::new_key_type;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::Region;
use crate::render::Color;
use crate::screen::ScreenId;

use super::traits::Widget;
use super::value::Value;

new_key_type! {
    /// Handle to a widget registered with a screen.
    pub struct WidgetId;
}

/// A user callback. Receives the engine handle and the widget that fired it.
pub type Callback = Box<dyn FnMut(&Ui, &mut dyn Widget) -> Result<()>>;

/// Which callback slot to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// The stored value changed.
    Change,
    /// The widget was pressed (fired by widgets that act on press).
    Press,
    /// The finger was lifted after a press.
    Release,
    /// The press outlasted the long-press threshold.
    LongPress,
}

#[derive(Default)]
struct Callbacks {
    change: Option<Callback>,
    press: Option<Callback>,
    release: Option<Callback>,
    long_press: Option<Callback>,
}

impl Callbacks {
    fn slot(&mut self, hook: Hook) -> &mut Option<Callback> {
        match hook {
            Hook::Change => &mut self.change,
            Hook::Press => &mut self.press,
            Hook::Release => &mut self.release,
            Hook::LongPress => &mut self.long_press,
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetCore
// ---------------------------------------------------------------------------

/// State common to all widgets.
///
/// Colours left unset are resolved against the display's foreground and
/// background when the widget is added to a screen. A widget gets a fill
/// only when it was given an explicit background colour.
pub struct WidgetCore {
    pub(crate) id: WidgetId,
    pub(crate) owner: ScreenId,
    pub region: Region,
    pub border: i32,
    pub fgcolor: Option<Color>,
    pub bgcolor: Option<Color>,
    pub fontcolor: Option<Color>,
    pub fill: bool,
    /// Forces the static decoration to be drawn on the next `show`.
    pub redraw: bool,
    pub(crate) greyed_out: bool,
    pub(crate) visible: bool,
    pub(crate) value: Value,
    callbacks: Callbacks,
}

impl WidgetCore {
    pub fn new(region: Region) -> Self {
        Self {
            id: WidgetId::default(),
            owner: ScreenId::default(),
            region,
            border: 0,
            fgcolor: None,
            bgcolor: None,
            fontcolor: None,
            fill: false,
            redraw: true,
            greyed_out: false,
            visible: true,
            value: Value::None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn owner(&self) -> ScreenId {
        self.owner
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Store a value without firing callbacks or drawing. Used to seed the
    /// initial value before the widget is added.
    pub fn seed_value(&mut self, value: impl Into<Value>) {
        self.value = value.into().clamped();
    }

    pub fn fg(&self) -> Color {
        self.fgcolor.unwrap_or(Color::WHITE)
    }

    pub fn bg(&self) -> Color {
        self.bgcolor.unwrap_or(Color::BLACK)
    }

    pub fn font(&self) -> Color {
        self.fontcolor.unwrap_or(Color::WHITE)
    }

    /// Region inside the border.
    pub fn inner(&self) -> Region {
        self.region.inset(self.border)
    }

    pub(crate) fn resolve_colors(&mut self, foreground: Color, background: Color) {
        self.fgcolor.get_or_insert(foreground);
        self.bgcolor.get_or_insert(background);
        self.fontcolor.get_or_insert(foreground);
    }

    pub fn set_callback(&mut self, hook: Hook, callback: Callback) {
        *self.callbacks.slot(hook) = Some(callback);
    }

    pub fn has_callback(&self, hook: Hook) -> bool {
        let c = &self.callbacks;
        match hook {
            Hook::Change => c.change.is_some(),
            Hook::Press => c.press.is_some(),
            Hook::Release => c.release.is_some(),
            Hook::LongPress => c.long_press.is_some(),
        }
    }

    pub(crate) fn take_callback(&mut self, hook: Hook) -> Option<Callback> {
        self.callbacks.slot(hook).take()
    }

    /// Put a callback back unless it was replaced while it ran.
    pub(crate) fn restore_callback(&mut self, hook: Hook, callback: Callback) {
        self.callbacks.slot(hook).get_or_insert(callback);
    }
}

impl std::fmt::Debug for WidgetCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetCore")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("region", &self.region)
            .field("greyed_out", &self.greyed_out)
            .field("visible", &self.visible)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// TouchLatch
// ---------------------------------------------------------------------------

/// Touch bookkeeping for interactive widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchLatch {
    /// Receive a press on every sample while held, not just the first.
    pub can_drag: bool,
    /// Set between the first handled press and the release.
    pub busy: bool,
    /// Set by any hit; guarantees exactly one release per press.
    pub was_touched: bool,
}

impl TouchLatch {
    pub fn new(can_drag: bool) -> Self {
        Self { can_drag, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_resolve_only_when_unset() {
        let mut core = WidgetCore::new(Region::new(0, 0, 10, 10));
        core.fgcolor = Some(Color::RED);
        core.resolve_colors(Color::WHITE, Color::BLACK);
        assert_eq!(core.fg(), Color::RED);
        assert_eq!(core.bg(), Color::BLACK);
        assert_eq!(core.font(), Color::WHITE);
    }

    #[test]
    fn seed_value_clamps() {
        let mut core = WidgetCore::new(Region::EMPTY);
        core.seed_value(2.5_f32);
        assert_eq!(core.value(), &Value::Float(1.0));
    }

    #[test]
    fn restore_keeps_replacement() {
        let mut core = WidgetCore::new(Region::EMPTY);
        core.set_callback(Hook::Change, Box::new(|_, _| Ok(())));
        let taken = core.take_callback(Hook::Change);
        assert!(!core.has_callback(Hook::Change));
        core.set_callback(Hook::Change, Box::new(|_, _| Ok(())));
        if let Some(cb) = taken {
            core.restore_callback(Hook::Change, cb);
        }
        assert!(core.has_callback(Hook::Change));
    }

    #[test]
    fn inner_region_excludes_border() {
        let mut core = WidgetCore::new(Region::new(10, 10, 20, 20));
        core.border = 2;
        assert_eq!(core.inner(), Region::new(12, 12, 16, 16));
    }
}
