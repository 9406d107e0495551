//! Listbox widget: a column of text entries, one of them selected.
//!
//! The value is the selected entry's index as a [`Value::Int`]. A press
//! marks the row under the finger; the choice is committed on release, and
//! every committed choice fires [`Hook::Change`], a repeat of the current
//! selection included.

use std::any::Any;

use crate::app::Ui;
use crate::error::{GuiError, Result};
use crate::geometry::{Point, Region};
use crate::render::{Color, DisplayProxy};
use crate::widget::{Hook, TouchLatch, Value, Widget, WidgetCore};

use super::label::fit;

const BORDER: i32 = 2;

/// Row height for the panel's font: one pixel above and below the glyphs.
pub(crate) fn entry_height(ui: &Ui) -> i32 {
    ui.text_size("x").height + 2
}

/// Collect list entries, rejecting an empty list.
pub(crate) fn collect_elements<I, S>(elements: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
    if elements.is_empty() {
        return Err(GuiError::EmptyList);
    }
    Ok(elements)
}

/// Index stored in `value`, or 0 when it names no entry.
pub(crate) fn index_in(value: &Value, len: usize) -> usize {
    value
        .as_int()
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < len)
        .unwrap_or(0)
}

/// A scrolling-free list of choices.
///
/// # Examples
///
/// ```ignore
/// let colours = Listbox::new(ui, Point::new(10, 10), 120, ["red", "green", "blue"])?
///     .with_selected(1)
///     .on_change(|ui, list| Ok(()));
/// ```
pub struct Listbox {
    core: WidgetCore,
    latch: TouchLatch,
    elements: Vec<String>,
    entry_height: i32,
    select_color: Color,
    pending: Option<usize>,
}

impl Listbox {
    /// A list `width` pixels wide, tall enough for every entry, with the
    /// first entry selected.
    pub fn new<I, S>(ui: &Ui, at: Point, width: i32, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = collect_elements(elements)?;
        let entry_height = entry_height(ui);
        let height = entry_height * elements.len() as i32 + 2 * BORDER;
        let mut core = WidgetCore::new(Region::new(at.x, at.y, width, height));
        core.border = BORDER;
        core.seed_value(0_i64);
        Ok(Self {
            core,
            latch: TouchLatch::new(false),
            elements,
            entry_height,
            select_color: Color::LIGHTBLUE,
            pending: None,
        })
    }

    /// Select entry `index`; an index past the end selects the first entry
    /// (builder).
    pub fn with_selected(mut self, index: usize) -> Self {
        let index = if index < self.elements.len() { index } else { 0 };
        self.core.seed_value(index as i64);
        self
    }

    /// Fill colour of the selected row (builder).
    pub fn with_select_color(mut self, color: Color) -> Self {
        self.select_color = color;
        self
    }

    /// Drop the border, shrinking the box around the entries (builder).
    pub fn borderless(mut self) -> Self {
        self.core.region.height -= 2 * self.core.border;
        self.core.border = 0;
        self
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn selected(&self) -> usize {
        index_in(self.core.value(), self.elements.len())
    }

    /// Text of the selected entry.
    pub fn text(&self) -> &str {
        &self.elements[self.selected()]
    }

    /// Select the entry reading `text`. Returns its index, or `None` when no
    /// entry matches.
    pub fn select_text(&mut self, ui: &Ui, text: &str) -> Result<Option<usize>> {
        let Some(index) = self.elements.iter().position(|e| e == text) else {
            return Ok(None);
        };
        ui.update_value(self, index as i64)?;
        Ok(Some(index))
    }

    fn row(&self, index: usize) -> Region {
        let inner = self.core.inner();
        Region::new(inner.x, inner.y + index as i32 * self.entry_height, inner.width, self.entry_height)
    }
}

impl Widget for Listbox {
    fn widget_type(&self) -> &'static str {
        "Listbox"
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
        self.core.redraw = false;
        let inner = self.core.inner();
        display.fill_rect(inner, self.core.bg())?;
        let selected = self.selected();
        for (index, text) in self.elements.iter().enumerate() {
            let row = self.row(index);
            if index == selected {
                display.fill_rect(row, self.select_color)?;
            }
            let fitted = fit(display, text, inner.width);
            display.draw_text(Point::new(row.x, row.y + 1), fitted, self.core.font())?;
        }
        Ok(())
    }

    fn on_press(&mut self, _ui: &Ui, at: Point) -> Result<()> {
        let last = self.elements.len() as i32 - 1;
        let row = ((at.y - self.core.inner().y) / self.entry_height).clamp(0, last);
        self.pending = Some(row as usize);
        Ok(())
    }

    fn on_release(&mut self, ui: &Ui) -> Result<()> {
        let Some(row) = self.pending.take() else {
            return Ok(());
        };
        if !ui.update_value(self, row as i64)? {
            ui.fire(self, Hook::Change)?;
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
