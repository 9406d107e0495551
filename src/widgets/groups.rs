//! Button groups: mutually exclusive radio buttons and cyclic button lists.
//!
//! A group is a cloneable handle onto shared state. Each member button gets a
//! press callback holding a clone of the handle, so the group reacts to
//! presses without the engine knowing groups exist.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::app::Ui;
use crate::error::{GuiError, Result};
use crate::render::Color;
use crate::widget::{Widget, WidgetExt, WidgetId};

use super::button::Button;

/// Group callback, given the member that became current.
pub type GroupCallback = Box<dyn FnMut(&Ui, WidgetId) -> Result<()>>;

fn notify(slot: &RefCell<Option<GroupCallback>>, ui: &Ui, member: WidgetId) -> Result<()> {
    let taken = slot.borrow_mut().take();
    let Some(mut callback) = taken else {
        return Ok(());
    };
    let result = callback(ui, member);
    slot.borrow_mut().get_or_insert(callback);
    result
}

// ---------------------------------------------------------------------------
// RadioButtons
// ---------------------------------------------------------------------------

struct RadioState {
    highlight: Color,
    selected: usize,
    /// Members with their own foreground colour.
    members: Vec<(WidgetId, Color)>,
    current: Option<WidgetId>,
    greyed_out: bool,
}

/// Buttons of which exactly one is highlighted.
///
/// The button added at index `selected` starts highlighted. Until that many
/// members exist the first member holds the highlight, so a group whose
/// `selected` index is never reached still has exactly one current member.
/// Pressing any member highlights it, restores the others and calls the
/// group callback.
///
/// # Examples
///
/// ```ignore
/// let speed = RadioButtons::new(Color::YELLOW, 0).on_select(|ui, id| Ok(()));
/// for (i, name) in ["slow", "fast"].iter().enumerate() {
///     speed.add(ui, Button::new(Point::new(10 + 60 * i as i32, 10), Size::new(50, 30)).with_text(*name))?;
/// }
/// ```
#[derive(Clone)]
pub struct RadioButtons {
    state: Rc<RefCell<RadioState>>,
    callback: Rc<RefCell<Option<GroupCallback>>>,
}

impl RadioButtons {
    pub fn new(highlight: Color, selected: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(RadioState {
                highlight,
                selected,
                members: Vec::new(),
                current: None,
                greyed_out: false,
            })),
            callback: Rc::new(RefCell::new(None)),
        }
    }

    /// Set the callback run after every selection (builder).
    pub fn on_select<F>(self, callback: F) -> Self
    where
        F: FnMut(&Ui, WidgetId) -> Result<()> + 'static,
    {
        *self.callback.borrow_mut() = Some(Box::new(callback));
        self
    }

    /// Add a member to the current screen.
    pub fn add(&self, ui: &Ui, button: Button) -> Result<WidgetId> {
        let own = button.core().fgcolor.unwrap_or_else(|| ui.foreground());
        let (chosen, stand_in, highlight) = {
            let st = self.state.borrow();
            let chosen = st.members.len() == st.selected;
            // The first member stands in for a selection not yet added.
            let stand_in = if chosen { st.current } else { None };
            (chosen || st.current.is_none(), stand_in, st.highlight)
        };
        let group = self.clone();
        let button = button
            .with_fgcolor(if chosen { highlight } else { own })
            .on_pressed(move |ui, pressed| group.select(ui, pressed));
        let id = ui.add(button)?;
        let restore = {
            let mut st = self.state.borrow_mut();
            st.members.push((id, own));
            if chosen {
                st.current = Some(id);
            }
            stand_in.and_then(|prev| st.members.iter().find(|(m, _)| *m == prev).copied())
        };
        if let Some((prev, color)) = restore {
            ui.with_widget_dyn(prev, |w| {
                w.core_mut().fgcolor = Some(color);
                ui.draw(w)
            })?;
        }
        Ok(id)
    }

    /// The highlighted member.
    pub fn value(&self) -> Option<WidgetId> {
        self.state.borrow().current
    }

    pub fn members(&self) -> Vec<WidgetId> {
        self.state.borrow().members.iter().map(|(id, _)| *id).collect()
    }

    /// The member added at `index`.
    pub fn member(&self, index: usize) -> Result<WidgetId> {
        let st = self.state.borrow();
        st.members
            .get(index)
            .map(|(id, _)| *id)
            .ok_or(GuiError::InvalidIndex { index, len: st.members.len() })
    }

    /// Highlight `member` as if it had been pressed. Selecting the current
    /// member does nothing.
    pub fn set_value(&self, ui: &Ui, member: WidgetId) -> Result<()> {
        {
            let st = self.state.borrow();
            if !st.members.iter().any(|(id, _)| *id == member) {
                return Err(GuiError::NotAMember(member));
            }
            if st.current == Some(member) {
                return Ok(());
            }
        }
        ui.with_widget_dyn(member, |w| self.select(ui, w))
    }

    pub fn is_greyed_out(&self) -> bool {
        self.state.borrow().greyed_out
    }

    /// Grey out (or restore) every member.
    pub fn set_greyed_out(&self, ui: &Ui, greyed: bool) -> Result<()> {
        let members = {
            let mut st = self.state.borrow_mut();
            if st.greyed_out == greyed {
                return Ok(());
            }
            st.greyed_out = greyed;
            st.members.clone()
        };
        for (id, _) in members {
            ui.set_greyed_out(id, greyed)?;
        }
        Ok(())
    }

    /// Recolour every member around `pressed`, which is checked out.
    fn select(&self, ui: &Ui, pressed: &mut dyn Widget) -> Result<()> {
        let chosen = pressed.id();
        let (members, highlight) = {
            let mut st = self.state.borrow_mut();
            st.current = Some(chosen);
            (st.members.clone(), st.highlight)
        };
        debug!(member = ?chosen, "radio selection");
        for (id, own) in members {
            if id == chosen {
                pressed.core_mut().fgcolor = Some(highlight);
                ui.draw(pressed)?;
            } else {
                ui.with_widget_dyn(id, |w| {
                    w.core_mut().fgcolor = Some(own);
                    ui.draw(w)
                })?;
            }
        }
        notify(&self.callback, ui, chosen)
    }
}

// ---------------------------------------------------------------------------
// ButtonList
// ---------------------------------------------------------------------------

struct ListState {
    members: Vec<WidgetId>,
    current: Option<WidgetId>,
    greyed_out: bool,
}

/// Buttons sharing one spot, shown one at a time.
///
/// Pressing the visible member hides it and shows the next one (wrapping), as
/// for a start/stop toggle. The newly shown member counts as already held, so
/// the press that revealed it does not also press it.
#[derive(Clone)]
pub struct ButtonList {
    state: Rc<RefCell<ListState>>,
    callback: Rc<RefCell<Option<GroupCallback>>>,
}

impl Default for ButtonList {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonList {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ListState { members: Vec::new(), current: None, greyed_out: false })),
            callback: Rc::new(RefCell::new(None)),
        }
    }

    /// Set the callback run when a member becomes current (builder).
    pub fn on_change<F>(self, callback: F) -> Self
    where
        F: FnMut(&Ui, WidgetId) -> Result<()> + 'static,
    {
        *self.callback.borrow_mut() = Some(Box::new(callback));
        self
    }

    /// Add a member to the current screen. The first member starts visible.
    pub fn add(&self, ui: &Ui, mut button: Button) -> Result<WidgetId> {
        let first = self.state.borrow().members.is_empty();
        button.core_mut().visible = first;
        let group = self.clone();
        let button = button.on_pressed(move |ui, pressed| group.advance(ui, pressed));
        let id = ui.add(button)?;
        let mut st = self.state.borrow_mut();
        st.members.push(id);
        if first {
            st.current = Some(id);
        }
        Ok(id)
    }

    /// The visible member.
    pub fn value(&self) -> Option<WidgetId> {
        self.state.borrow().current
    }

    pub fn members(&self) -> Vec<WidgetId> {
        self.state.borrow().members.clone()
    }

    /// The member added at `index`.
    pub fn member(&self, index: usize) -> Result<WidgetId> {
        let st = self.state.borrow();
        st.members.get(index).copied().ok_or(GuiError::InvalidIndex { index, len: st.members.len() })
    }

    /// Make `member` the visible one and run the callback.
    pub fn set_value(&self, ui: &Ui, member: WidgetId) -> Result<()> {
        let old = {
            let st = self.state.borrow();
            if !st.members.contains(&member) {
                return Err(GuiError::NotAMember(member));
            }
            match st.current {
                Some(current) if current == member => return Ok(()),
                current => current,
            }
        };
        if let Some(old) = old {
            ui.set_visible(old, false)?;
        }
        ui.set_visible(member, true)?;
        self.state.borrow_mut().current = Some(member);
        notify(&self.callback, ui, member)
    }

    pub fn is_greyed_out(&self) -> bool {
        self.state.borrow().greyed_out
    }

    /// Grey out (or restore) every member.
    pub fn set_greyed_out(&self, ui: &Ui, greyed: bool) -> Result<()> {
        let members = {
            let mut st = self.state.borrow_mut();
            if st.greyed_out == greyed {
                return Ok(());
            }
            st.greyed_out = greyed;
            st.members.clone()
        };
        for id in members {
            ui.set_greyed_out(id, greyed)?;
        }
        Ok(())
    }

    fn advance(&self, ui: &Ui, pressed: &mut dyn Widget) -> Result<()> {
        let old = pressed.id();
        let next = {
            let st = self.state.borrow();
            let Some(index) = st.members.iter().position(|id| *id == old) else {
                return Err(GuiError::NotAMember(old));
            };
            st.members[(index + 1) % st.members.len()]
        };
        if next != old {
            ui.show_or_hide(pressed, false)?;
            ui.with_widget_dyn(next, |w| {
                ui.hold_touch(w);
                ui.show_or_hide(w, true)
            })?;
        }
        self.state.borrow_mut().current = Some(next);
        debug!(from = ?old, to = ?next, "button list advanced");
        notify(&self.callback, ui, next)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Region, Size};
    use crate::screen::Blank;
    use crate::testing::{DrawOp, Pilot};
    use pretty_assertions::assert_eq;

    fn button(x: i32) -> Button {
        Button::new(Point::new(x, 0), Size::new(40, 20))
    }

    fn open_radio(pilot: &Pilot, group: &RadioButtons, count: usize) -> Vec<WidgetId> {
        let ids = Rc::new(RefCell::new(Vec::new()));
        let (out, group) = (ids.clone(), group.clone());
        pilot
            .open(move |ui: &Ui| {
                for i in 0..count {
                    out.borrow_mut().push(group.add(ui, button(50 * i as i32).with_fgcolor(Color::BLUE))?);
                }
                Ok(Blank)
            })
            .unwrap();
        let ids = ids.borrow().clone();
        ids
    }

    fn fg(pilot: &Pilot, id: WidgetId) -> Color {
        pilot.ui().with_widget::<Button, _>(id, |b| b.core().fg()).unwrap()
    }

    // ── RadioButtons ─────────────────────────────────────────────────

    #[test]
    fn initial_selection_is_highlighted() {
        let pilot = Pilot::new(320, 240);
        let group = RadioButtons::new(Color::YELLOW, 1);
        let ids = open_radio(&pilot, &group, 3);
        assert_eq!(group.value(), Some(ids[1]));
        assert_eq!(fg(&pilot, ids[0]), Color::BLUE);
        assert_eq!(fg(&pilot, ids[1]), Color::YELLOW);
    }

    #[test]
    fn selection_beyond_the_members_falls_back_to_the_first() {
        let pilot = Pilot::new(320, 240);
        let group = RadioButtons::new(Color::YELLOW, 5);
        let ids = open_radio(&pilot, &group, 3);
        assert_eq!(group.value(), Some(ids[0]));
        let highlighted: Vec<_> = ids.iter().filter(|id| fg(&pilot, **id) == Color::YELLOW).collect();
        assert_eq!(highlighted, vec![&ids[0]]);
    }

    #[test]
    fn the_chosen_member_takes_over_from_the_first() {
        let pilot = Pilot::new(320, 240);
        let group = RadioButtons::new(Color::YELLOW, 2);
        let ids = open_radio(&pilot, &group, 3);
        assert_eq!(group.value(), Some(ids[2]));
        assert_eq!(fg(&pilot, ids[0]), Color::BLUE);
        assert_eq!(fg(&pilot, ids[1]), Color::BLUE);
        assert_eq!(fg(&pilot, ids[2]), Color::YELLOW);
    }

    #[test]
    fn pressing_moves_the_highlight() {
        let pilot = Pilot::new(320, 240);
        let chosen = Rc::new(RefCell::new(Vec::new()));
        let log = chosen.clone();
        let group = RadioButtons::new(Color::YELLOW, 0).on_select(move |_, id| {
            log.borrow_mut().push(id);
            Ok(())
        });
        let ids = open_radio(&pilot, &group, 3);

        pilot.tap(Point::new(110, 5)).unwrap();
        assert_eq!(group.value(), Some(ids[2]));
        let highlighted: Vec<_> = ids.iter().filter(|id| fg(&pilot, **id) == Color::YELLOW).collect();
        assert_eq!(highlighted, vec![&ids[2]]);
        assert_eq!(*chosen.borrow(), vec![ids[2]]);
    }

    #[test]
    fn set_value_rejects_strangers() {
        let pilot = Pilot::new(320, 240);
        let group = RadioButtons::new(Color::YELLOW, 0);
        let other = RadioButtons::new(Color::RED, 0);
        let ids = open_radio(&pilot, &group, 2);
        let ui = pilot.ui().clone();
        let stranger = other.add(&ui, button(200)).unwrap();

        assert!(matches!(group.set_value(&ui, stranger), Err(GuiError::NotAMember(id)) if id == stranger));
        assert!(matches!(group.member(5), Err(GuiError::InvalidIndex { index: 5, len: 2 })));
        group.set_value(&ui, group.member(1).unwrap()).unwrap();
        assert_eq!(group.value(), Some(ids[1]));
        assert_eq!(fg(&pilot, ids[0]), Color::BLUE);
    }

    #[test]
    fn greying_the_group_greys_every_member() {
        let pilot = Pilot::new(320, 240);
        let group = RadioButtons::new(Color::YELLOW, 0);
        let ids = open_radio(&pilot, &group, 2);
        group.set_greyed_out(pilot.ui(), true).unwrap();
        assert!(group.is_greyed_out());
        for id in &ids {
            assert!(pilot.ui().with_widget::<Button, _>(*id, |b| b.is_greyed_out()).unwrap());
        }
        pilot.tap(Point::new(60, 5)).unwrap();
        assert_eq!(group.value(), Some(ids[0]));
    }

    // ── ButtonList ───────────────────────────────────────────────────

    fn open_list(pilot: &Pilot, list: &ButtonList) -> Vec<WidgetId> {
        let ids = Rc::new(RefCell::new(Vec::new()));
        let (out, list) = (ids.clone(), list.clone());
        pilot
            .open(move |ui: &Ui| {
                for (text, color) in [("start", Color::GREEN), ("stop", Color::RED)] {
                    let b = button(0).with_text(text).with_fgcolor(color).with_bgcolor(Color::BLACK);
                    out.borrow_mut().push(list.add(ui, b)?);
                }
                Ok(Blank)
            })
            .unwrap();
        let ids = ids.borrow().clone();
        ids
    }

    #[test]
    fn only_the_first_member_is_drawn() {
        let pilot = Pilot::new(320, 240);
        let list = ButtonList::new();
        open_list(&pilot, &list);
        assert_eq!(pilot.surface().texts(), vec!["start"]);
    }

    #[test]
    fn a_held_press_advances_exactly_once() {
        let pilot = Pilot::new(320, 240);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let log = changes.clone();
        let list = ButtonList::new().on_change(move |_, id| {
            log.borrow_mut().push(id);
            Ok(())
        });
        let ids = open_list(&pilot, &list);
        pilot.surface().clear_log();

        pilot.press(Point::new(5, 5)).unwrap();
        pilot.hold(5).unwrap();
        assert_eq!(list.value(), Some(ids[1]));
        assert_eq!(*changes.borrow(), vec![ids[1]]);
        assert_eq!(
            pilot.surface().ops()[0],
            DrawOp::FillRect { region: Region::new(0, 0, 40, 20), color: Color::BLACK }
        );
        assert_eq!(pilot.surface().texts(), vec!["stop"]);

        assert_eq!(pilot.lift().unwrap(), crate::event::PassOutcome::Released { count: 2 });
        pilot.tap(Point::new(5, 5)).unwrap();
        assert_eq!(list.value(), Some(ids[0]));
        assert_eq!(*changes.borrow(), vec![ids[1], ids[0]]);
    }

    #[test]
    fn set_value_switches_members() {
        let pilot = Pilot::new(320, 240);
        let list = ButtonList::new();
        let ids = open_list(&pilot, &list);
        list.set_value(pilot.ui(), ids[1]).unwrap();
        assert_eq!(list.value(), Some(ids[1]));
        assert!(!pilot.ui().with_widget::<Button, _>(ids[0], |b| b.is_visible()).unwrap());
        assert!(pilot.ui().with_widget::<Button, _>(ids[1], |b| b.is_visible()).unwrap());
    }
}
