//! Screens, Apertures and the navigation stack.
//!
//! A screen is a full-extent view owning a display list (every widget, in
//! registration order) and a touch list (interactive widgets only). Screens
//! form a stack through their parent links: forward navigation builds a fresh
//! screen whose parent is the outgoing one, `back` returns to the parent.
//! An [`Aperture`] is a modal screen confined to a bounding box drawn over
//! its parent.
//!
//! Exactly one screen is current. Screens no longer reachable from the current
//! one through parent links are retired (all their tasks cancelled) and later
//! dropped together with their widgets by [`Ui::reclaim`].

use slotmap::new_key_type;
use tracing::debug;

use crate::app::Ui;
use crate::error::{GuiError, Result};
use crate::event::message::{Command, Destination, ScreenFactory};
use crate::geometry::{Point, Region, Size};
use crate::render::{Color, GreyStyle};
use crate::task::ScreenTask;
use crate::widget::{Widget, WidgetId};

new_key_type! {
    /// Handle to a screen in the engine's arena.
    pub struct ScreenId;
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Per-screen behaviour.
///
/// A view is built by a factory passed to [`Ui::change_to`]; the factory adds
/// the screen's widgets and registers its tasks. The hooks run on every
/// change: `on_hide` on the outgoing screen, then `on_open` and, after the
/// redraw, `after_open` on the incoming one.
pub trait View: 'static {
    /// The bounding box if this screen is a modal Aperture.
    fn aperture(&self) -> Option<Aperture> {
        None
    }

    fn on_open(&mut self, _ui: &Ui) -> Result<()> {
        Ok(())
    }

    fn after_open(&mut self, _ui: &Ui) -> Result<()> {
        Ok(())
    }

    fn on_hide(&mut self, _ui: &Ui) -> Result<()> {
        Ok(())
    }
}

/// A screen with no behaviour of its own.
///
/// Used as the implicit root when navigation starts with no screen current.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl View for Blank {}

// ---------------------------------------------------------------------------
// Aperture
// ---------------------------------------------------------------------------

/// A modal box drawn over part of the parent screen.
///
/// Opening an Aperture paints only its box (background plus optional border)
/// and its own widgets; closing it blanks the box and redraws only the
/// parent's widgets that overlap it. The screen is never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aperture {
    pub region: Region,
    pub draw_border: bool,
    /// Defaults to the display background.
    pub bgcolor: Option<Color>,
    /// Border colour. Defaults to the display foreground.
    pub fgcolor: Option<Color>,
}

impl Aperture {
    pub fn new(location: Point, size: Size) -> Self {
        Self { region: Region::at(location, size), draw_border: true, bgcolor: None, fgcolor: None }
    }

    pub fn with_border(mut self, draw_border: bool) -> Self {
        self.draw_border = draw_border;
        self
    }

    pub fn with_bgcolor(mut self, color: Color) -> Self {
        self.bgcolor = Some(color);
        self
    }

    pub fn with_fgcolor(mut self, color: Color) -> Self {
        self.fgcolor = Some(color);
        self
    }

    /// Translate box-relative coordinates to screen coordinates.
    pub fn locn(&self, dx: i32, dy: i32) -> Point {
        self.region.location() + Point::new(dx, dy)
    }
}

/// A bare Aperture is a usable modal view.
impl View for Aperture {
    fn aperture(&self) -> Option<Aperture> {
        Some(*self)
    }
}

// ---------------------------------------------------------------------------
// ScreenEntry
// ---------------------------------------------------------------------------

/// Arena record for one screen.
pub(crate) struct ScreenEntry {
    /// Taken out while one of its hooks runs.
    pub view: Option<Box<dyn View>>,
    pub parent: Option<ScreenId>,
    pub aperture: Option<Aperture>,
    pub display_list: Vec<WidgetId>,
    pub touch_list: Vec<WidgetId>,
    pub tasks: Vec<ScreenTask>,
}

impl ScreenEntry {
    fn new(parent: Option<ScreenId>, view: Option<Box<dyn View>>) -> Self {
        Self {
            view,
            parent,
            aperture: None,
            display_list: Vec::new(),
            touch_list: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Ui {
    pub fn current_screen(&self) -> Option<ScreenId> {
        self.inner.state.borrow().current
    }

    pub fn is_current(&self, screen: ScreenId) -> bool {
        self.current_screen() == Some(screen)
    }

    pub fn parent_of(&self, screen: ScreenId) -> Option<ScreenId> {
        self.inner.state.borrow().screens.get(screen).and_then(|e| e.parent)
    }

    /// Number of screens alive, retired ones included until reclaimed.
    pub fn screen_count(&self) -> usize {
        self.inner.state.borrow().screens.len()
    }

    pub fn contains_screen(&self, screen: ScreenId) -> bool {
        self.inner.state.borrow().screens.contains_key(screen)
    }

    pub fn is_modal(&self, screen: ScreenId) -> bool {
        self.aperture_of(screen).is_some()
    }

    pub fn aperture_of(&self, screen: ScreenId) -> Option<Aperture> {
        self.inner.state.borrow().screens.get(screen).and_then(|e| e.aperture)
    }

    /// Widgets of a screen in registration order.
    pub fn screen_widgets(&self, screen: ScreenId) -> Result<Vec<WidgetId>> {
        self.inner
            .state
            .borrow()
            .screens
            .get(screen)
            .map(|e| e.display_list.clone())
            .ok_or(GuiError::UnknownScreen(screen))
    }

    pub(crate) fn touch_list(&self, screen: ScreenId) -> Vec<WidgetId> {
        self.inner
            .state
            .borrow()
            .screens
            .get(screen)
            .map(|e| e.touch_list.clone())
            .unwrap_or_default()
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Navigate forward to a fresh screen built by `factory`.
    pub fn change_to<F, V>(&self, factory: F) -> Result<()>
    where
        F: FnOnce(&Ui) -> Result<V> + 'static,
        V: View,
    {
        self.change(Destination::fresh(factory), true)
    }

    /// Navigate to `to`.
    ///
    /// Forward navigation only accepts a fresh screen; backward navigation
    /// only accepts an existing one. When called from a handler the change
    /// is queued and runs once the handler returns.
    pub fn change(&self, to: Destination, forward: bool) -> Result<()> {
        match (&to, forward) {
            (Destination::Existing(_), true) => return Err(GuiError::ExistingScreenForward),
            (Destination::Fresh(_), false) => return Err(GuiError::FreshScreenBackward),
            _ => {}
        }
        self.inner.state.borrow_mut().commands.push(Command::Change(to));
        self.pump()
    }

    /// Return to the parent screen. Does nothing at the root.
    pub fn back(&self) -> Result<()> {
        self.inner.state.borrow_mut().commands.push(Command::Back);
        self.pump()
    }

    /// Execute queued navigation unless a handler is in flight.
    pub(crate) fn pump(&self) -> Result<()> {
        loop {
            let command = {
                let mut st = self.inner.state.borrow_mut();
                if st.defer_depth > 0 || st.pumping {
                    return Ok(());
                }
                match st.commands.pop() {
                    Some(command) => {
                        st.pumping = true;
                        command
                    }
                    None => return Ok(()),
                }
            };
            let result = self.execute(command);
            let mut st = self.inner.state.borrow_mut();
            st.pumping = false;
            if result.is_err() {
                st.commands.clear();
            }
            drop(st);
            result?;
        }
    }

    fn execute(&self, command: Command) -> Result<()> {
        debug!(command = command.name(), "navigation");
        match command {
            Command::Change(to) => self.switch(to),
            Command::Back => {
                let parent = self.current_screen().and_then(|id| self.parent_of(id));
                match parent {
                    Some(parent) => self.switch(Destination::Existing(parent)),
                    None => {
                        debug!("back from root ignored");
                        Ok(())
                    }
                }
            }
        }
    }

    fn switch(&self, to: Destination) -> Result<()> {
        if let Destination::Existing(id) = &to {
            let st = self.inner.state.borrow();
            if !st.screens.contains_key(*id) || st.retired.contains(id) {
                return Err(GuiError::UnknownScreen(*id));
            }
        }
        let old = match self.current_screen() {
            Some(id) => id,
            None => self.open_blank_root(),
        };
        self.cancel_tasks(old, true);
        self.with_view(old, |view, ui| view.on_hide(ui))?;

        let (new, forward) = match to {
            Destination::Fresh(factory) => (self.build_screen(old, factory)?, true),
            Destination::Existing(id) => {
                self.inner.state.borrow_mut().current = Some(id);
                (id, false)
            }
        };
        debug!(from = ?old, to = ?new, forward, modal = self.is_modal(new), "screen change");

        self.with_view(new, |view, ui| view.on_open(ui))?;
        self.open(new, old, forward)?;
        self.with_view(new, |view, ui| view.after_open(ui))?;
        self.retire_unreachable();
        Ok(())
    }

    fn open_blank_root(&self) -> ScreenId {
        let mut st = self.inner.state.borrow_mut();
        let id = st.screens.insert(ScreenEntry::new(None, Some(Box::new(Blank))));
        st.current = Some(id);
        debug!(screen = ?id, "implicit root created");
        id
    }

    fn build_screen(
        &self,
        parent: ScreenId,
        factory: ScreenFactory,
    ) -> Result<ScreenId> {
        let id = {
            let mut st = self.inner.state.borrow_mut();
            let id = st.screens.insert(ScreenEntry::new(Some(parent), None));
            st.current = Some(id);
            id
        };
        match factory(self) {
            Ok(view) => {
                let aperture = view.aperture();
                let mut st = self.inner.state.borrow_mut();
                if let Some(entry) = st.screens.get_mut(id) {
                    entry.aperture = aperture;
                    entry.view = Some(view);
                }
                Ok(id)
            }
            Err(e) => {
                self.inner.state.borrow_mut().current = Some(parent);
                self.discard(id);
                Err(e)
            }
        }
    }

    /// Run a view hook with the view taken out of the arena.
    fn with_view(&self, screen: ScreenId, hook: impl FnOnce(&mut dyn View, &Ui) -> Result<()>) -> Result<()> {
        let view = self.inner.state.borrow_mut().screens.get_mut(screen).and_then(|e| e.view.take());
        let Some(mut view) = view else {
            return Ok(());
        };
        let result = hook(view.as_mut(), self);
        if let Some(entry) = self.inner.state.borrow_mut().screens.get_mut(screen) {
            entry.view = Some(view);
        }
        result
    }

    /// Paint a screen that just became current.
    fn open(&self, new: ScreenId, old: ScreenId, forward: bool) -> Result<()> {
        let (new_box, old_box) = {
            let st = self.inner.state.borrow();
            (
                st.screens.get(new).and_then(|e| e.aperture),
                st.screens.get(old).and_then(|e| e.aperture),
            )
        };
        if let Some(aperture) = new_box {
            {
                let mut display = self.inner.display.borrow_mut();
                display.set_grey(false);
                let bg = aperture.bgcolor.unwrap_or(display.background());
                display.fill_rect(aperture.region, bg)?;
                if aperture.draw_border {
                    let fg = aperture.fgcolor.unwrap_or(display.foreground());
                    display.draw_rect(aperture.region, fg)?;
                }
            }
            self.show_matching(new, |_| true)
        } else if let (Some(aperture), false) = (old_box, forward) {
            {
                let mut display = self.inner.display.borrow_mut();
                display.set_grey(false);
                let bg = display.background();
                display.fill_rect(aperture.region, bg)?;
            }
            self.show_matching(new, |w| w.overlaps(aperture.region))
        } else {
            self.inner.display.borrow_mut().clear()?;
            self.show_matching(new, |_| true)
        }
    }

    /// Fully redraw the screen's visible widgets that satisfy `filter`.
    fn show_matching(&self, screen: ScreenId, filter: impl Fn(&dyn Widget) -> bool) -> Result<()> {
        let ids = self.screen_widgets(screen)?;
        for id in ids {
            self.with_widget_dyn(id, |w| if filter(&*w) { self.refresh(w) } else { Ok(()) })?;
        }
        Ok(())
    }

    // ── Redraw ───────────────────────────────────────────────────────

    /// Redraw every visible widget of the current screen, static decoration
    /// included.
    pub fn redraw_all(&self) -> Result<()> {
        match self.current_screen() {
            Some(screen) => self.show_matching(screen, |_| true),
            None => Ok(()),
        }
    }

    /// Change how greyed-out widgets are drawn and redraw those on screen.
    pub fn set_disabled_style(&self, style: GreyStyle) -> Result<()> {
        let style = style.validate()?;
        self.inner.display.borrow_mut().set_style(style);
        debug!(?style, "disabled style changed");
        match self.current_screen() {
            Some(screen) => self.show_matching(screen, |w| w.is_greyed_out()),
            None => Ok(()),
        }
    }

    // ── Tasks and reclamation ────────────────────────────────────────

    fn cancel_tasks(&self, screen: ScreenId, only_on_change: bool) {
        let doomed: Vec<ScreenTask> = {
            let mut st = self.inner.state.borrow_mut();
            let Some(entry) = st.screens.get_mut(screen) else {
                return;
            };
            let (doomed, kept) = std::mem::take(&mut entry.tasks)
                .into_iter()
                .partition(|t| !only_on_change || t.cancel_on_change);
            entry.tasks = kept;
            doomed
        };
        if !doomed.is_empty() {
            debug!(?screen, count = doomed.len(), "cancelling screen tasks");
        }
        for task in doomed {
            task.handle.cancel();
        }
    }

    /// Retire every screen not reachable from the current one.
    fn retire_unreachable(&self) {
        let newly: Vec<ScreenId> = {
            let mut st = self.inner.state.borrow_mut();
            let state = &mut *st;
            let mut chain = Vec::new();
            let mut cursor = state.current;
            while let Some(id) = cursor {
                if chain.contains(&id) {
                    break;
                }
                chain.push(id);
                cursor = state.screens.get(id).and_then(|e| e.parent);
            }
            let newly: Vec<ScreenId> = state
                .screens
                .keys()
                .filter(|id| !chain.contains(id) && !state.retired.contains(id))
                .collect();
            state.retired.extend(newly.iter().copied());
            newly
        };
        for id in newly {
            debug!(screen = ?id, "screen retired");
            self.cancel_tasks(id, false);
        }
    }

    /// Drop retired screens and their widgets. Returns how many were dropped.
    pub fn reclaim(&self) -> usize {
        let retired = std::mem::take(&mut self.inner.state.borrow_mut().retired);
        for id in &retired {
            self.discard(*id);
        }
        if !retired.is_empty() {
            debug!(count = retired.len(), "screens reclaimed");
        }
        retired.len()
    }

    fn discard(&self, screen: ScreenId) {
        let removed = {
            let mut st = self.inner.state.borrow_mut();
            let Some(entry) = st.screens.remove(screen) else {
                return;
            };
            let widgets: Vec<_> = entry
                .display_list
                .iter()
                .filter_map(|id| st.widgets.remove(*id))
                .collect();
            (entry, widgets)
        };
        for task in &removed.0.tasks {
            task.handle.cancel();
        }
        // Views and widgets may own `Ui` clones; drop them with no borrow held.
        drop(removed);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
