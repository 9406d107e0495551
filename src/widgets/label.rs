//! Label widget: a passive line of text.
//!
//! The text is the widget's [`Value`](crate::widget::Value), so
//! `ui.set_value(label, "new text")` updates and redraws it. Numbers are
//! rendered through their `Display` form.

use std::any::Any;

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::render::DisplayProxy;
use crate::widget::{Widget, WidgetCore};

/// A single line of text.
///
/// # Examples
///
/// ```ignore
/// let title = Label::new(ui, Point::new(0, 0), "Settings");
/// let status = Label::new(ui, Point::new(0, 40), "").with_width(120);
/// ```
pub struct Label {
    core: WidgetCore,
}

impl Label {
    /// A label sized to fit `text` in the panel's font.
    pub fn new(ui: &Ui, at: Point, text: impl Into<String>) -> Self {
        let text = text.into();
        let extent = ui.text_size(&text);
        let mut core = WidgetCore::new(Region::at(at, extent));
        core.seed_value(text);
        Self { core }
    }

    /// Fix the width, for labels whose text changes later (builder).
    pub fn with_width(mut self, width: i32) -> Self {
        self.core.region.width = width.max(0);
        self
    }

    /// Give the label a border, growing its box to keep the text clear of it.
    pub fn with_frame(mut self, border: i32) -> Self {
        let border = border.max(0);
        let grow = 2 * (border - self.core.border);
        self.core.region.width += grow;
        self.core.region.height += grow;
        self.core.border = border;
        self
    }

    pub fn text(&self) -> String {
        self.core.value().to_string()
    }
}

impl Widget for Label {
    fn widget_type(&self) -> &'static str {
        "Label"
    }

    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn show(&mut self, display: &mut DisplayProxy) -> Result<()> {
        self.core.redraw = false;
        let text = self.core.value().to_string();
        if text.is_empty() {
            return Ok(());
        }
        let inner = self.core.inner();
        display.fill_rect(inner, self.core.bg())?;
        let fitted = fit(display, &text, inner.width);
        display.draw_text(inner.location(), fitted, self.core.font())?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Longest prefix of `text` no wider than `width`.
pub(crate) fn fit<'a>(display: &DisplayProxy, text: &'a str, width: i32) -> &'a str {
    if display.text_size(text).width <= width {
        return text;
    }
    let mut end = 0;
    for (idx, ch) in text.char_indices() {
        let next = idx + ch.len_utf8();
        if display.text_size(&text[..next]).width > width {
            break;
        }
        end = next;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use crate::screen::Blank;
    use crate::testing::{DrawOp, Pilot};
    use crate::widget::WidgetExt;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn open_label(pilot: &Pilot, build: impl FnOnce(&Ui) -> Label + 'static) -> crate::widget::WidgetId {
        let slot = Rc::new(Cell::new(None));
        let out = slot.clone();
        pilot
            .open(move |ui: &Ui| {
                out.set(Some(ui.add(build(ui))?));
                Ok(Blank)
            })
            .unwrap();
        slot.get().unwrap()
    }

    #[test]
    fn sized_from_text() {
        let pilot = Pilot::new(320, 240);
        let label = Label::new(pilot.ui(), Point::new(4, 5), "hello");
        assert_eq!(label.region(), Region::new(4, 5, 40, 12));
        assert_eq!(label.text(), "hello");
        let framed = Label::new(pilot.ui(), Point::new(0, 0), "ab").with_frame(2);
        assert_eq!(framed.region(), Region::new(0, 0, 20, 16));
        assert_eq!(framed.core().inner(), Region::new(2, 2, 16, 12));
    }

    #[test]
    fn draws_background_then_text() {
        let pilot = Pilot::new(320, 240);
        open_label(&pilot, |ui| Label::new(ui, Point::new(10, 20), "hi").with_fontcolor(Color::YELLOW));
        let ops = pilot.surface().ops();
        assert_eq!(
            ops[1..].to_vec(),
            vec![
                DrawOp::FillRect { region: Region::new(10, 20, 16, 12), color: Color::BLACK },
                DrawOp::Text { at: Point::new(10, 20), text: "hi".into(), color: Color::YELLOW },
            ]
        );
    }

    #[test]
    fn set_value_replaces_the_text() {
        let pilot = Pilot::new(320, 240);
        let id = open_label(&pilot, |ui| Label::new(ui, Point::new(0, 0), "").with_width(80));
        pilot.surface().clear_log();
        pilot.ui().set_value(id, "ready").unwrap();
        pilot.ui().set_value(id, 42_i64).unwrap();
        assert_eq!(pilot.surface().texts(), vec!["ready", "42"]);
    }

    #[test]
    fn long_text_is_clipped_to_the_box() {
        let pilot = Pilot::new(320, 240);
        let id = open_label(&pilot, |ui| Label::new(ui, Point::new(0, 0), "").with_width(24));
        pilot.surface().clear_log();
        pilot.ui().set_value(id, "truncated").unwrap();
        assert_eq!(pilot.surface().texts(), vec!["tru"]);
    }

    #[test]
    fn empty_label_draws_nothing() {
        let pilot = Pilot::new(320, 240);
        open_label(&pilot, |ui| Label::new(ui, Point::new(0, 0), ""));
        assert_eq!(pilot.surface().ops(), vec![DrawOp::Clear]);
    }
}
