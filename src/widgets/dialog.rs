//! Generated dialog boxes.
//!
//! A [`DialogBox`] lays out a modal [`Aperture`] with an optional caption, a
//! row of coloured buttons and a close button. Pressing any of them stores
//! its caption (`"Close"` for the close button) in the Aperture value slot and
//! goes back; the parent screen reads the answer in its `on_open` hook.

use crate::app::Ui;
use crate::error::Result;
use crate::geometry::{Point, Size};
use crate::render::Color;
use crate::screen::Aperture;
use crate::widget::WidgetExt;

use super::button::Button;
use super::label::Label;

const HEIGHT: i32 = 150;
const SPACING: i32 = 20;
const MIN_BUTTON: i32 = 25;

/// Value stored by the close button.
pub const CLOSE: &str = "Close";

/// Builder for a button dialog.
///
/// # Examples
///
/// ```ignore
/// let dialog = DialogBox::new([("Yes", Color::GREEN), ("No", Color::RED)]).with_label("Save?");
/// ui.change_to(move |ui| dialog.build(ui))?;
/// ```
#[derive(Debug, Clone)]
pub struct DialogBox {
    elements: Vec<(String, Color)>,
    location: Point,
    label: Option<String>,
    bgcolor: Color,
    min_button_width: i32,
    close_button: bool,
}

impl DialogBox {
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<String>,
    {
        Self {
            elements: elements.into_iter().map(|(text, color)| (text.into(), color)).collect(),
            location: Point::new(20, 20),
            label: None,
            bgcolor: Color::DARKGREEN,
            min_button_width: MIN_BUTTON,
            close_button: true,
        }
    }

    pub fn at(mut self, location: Point) -> Self {
        self.location = location;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_bgcolor(mut self, color: Color) -> Self {
        self.bgcolor = color;
        self
    }

    pub fn with_min_button_width(mut self, width: i32) -> Self {
        self.min_button_width = width.max(0);
        self
    }

    pub fn with_close_button(mut self, close: bool) -> Self {
        self.close_button = close;
        self
    }

    /// Add the dialog's widgets to the current screen and return its box.
    /// Call from a screen factory.
    pub fn build(self, ui: &Ui) -> Result<Aperture> {
        let count = self.elements.len() as i32;
        let widest = self.elements.iter().map(|(text, _)| ui.text_size(text).width + 4).max().unwrap_or(0);
        let button_width = widest.max(self.min_button_width);
        let button_height = ui.text_size("x").height.max(MIN_BUTTON);

        let mut width = SPACING + (button_width + SPACING) * count;
        if let Some(label) = &self.label {
            width = width.max(ui.text_size(label).width + 2 * SPACING);
        }
        let aperture = Aperture::new(self.location, Size::new(width, HEIGHT)).with_bgcolor(self.bgcolor);

        let gap = if count > 1 { (width - 2 * SPACING - count * button_width) / (count - 1) } else { 0 };
        let mut x = self.location.x + SPACING;
        let y = self.location.y + HEIGHT - button_height - 10;

        if let Some(label) = self.label {
            ui.add(Label::new(ui, Point::new(x, self.location.y + 50), label).with_bgcolor(self.bgcolor))?;
        }
        for (text, color) in self.elements {
            let button = Button::new(Point::new(x, y), Size::new(button_width, button_height))
                .with_fgcolor(color)
                .with_fontcolor(Color::BLACK)
                .with_text(text.clone());
            ui.add(answer(button, text))?;
            x += button_width + gap;
        }
        if self.close_button {
            let glyph = ui.text_size("X");
            let side = glyph.width.max(glyph.height).max(MIN_BUTTON);
            let at = Point::new(self.location.x + width - (side + 1), self.location.y + 1);
            let close = Button::new(at, Size::new(side, side)).with_fgcolor(Color::RED).with_text("X");
            ui.add(answer(close, CLOSE.to_owned()))?;
        }
        Ok(aperture)
    }
}

/// Make `button` answer the dialog with `value`.
fn answer(button: Button, value: String) -> Button {
    button.on_pressed(move |ui, _| {
        ui.set_aperture_value(value.as_str());
        ui.back()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Blank, View};
    use crate::testing::Pilot;
    use crate::widget::Value;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Asker {
        answers: Rc<RefCell<Vec<Value>>>,
    }

    impl View for Asker {
        fn on_open(&mut self, ui: &Ui) -> Result<()> {
            self.answers.borrow_mut().push(ui.aperture_value());
            Ok(())
        }
    }

    fn ask(pilot: &Pilot) -> Rc<RefCell<Vec<Value>>> {
        let answers = Rc::new(RefCell::new(Vec::new()));
        let log = answers.clone();
        pilot.open(move |_: &Ui| Ok(Asker { answers: log })).unwrap();
        let dialog = DialogBox::new([("Yes", Color::GREEN), ("No", Color::RED)]).with_label("Sure?");
        pilot.open(move |ui: &Ui| dialog.build(ui)).unwrap();
        answers
    }

    #[test]
    fn layout_follows_the_button_row() {
        let pilot = Pilot::new(480, 272);
        ask(&pilot);
        let ui = pilot.ui();
        let dialog = ui.current_screen().unwrap();
        let aperture = ui.aperture_of(dialog).unwrap();
        // Buttons 28 wide ("Yes" + 4), two of them with 20 px spacing.
        assert_eq!(aperture.region.size(), Size::new(20 + 2 * 48, 150));
        assert_eq!(ui.screen_widgets(dialog).unwrap().len(), 4);
    }

    #[test]
    fn pressing_an_answer_reports_to_the_parent() {
        let pilot = Pilot::new(480, 272);
        let answers = ask(&pilot);
        // First button at (40, 20 + 150 - 25 - 10).
        pilot.tap(Point::new(45, 140)).unwrap();
        assert_eq!(*answers.borrow(), vec![Value::None, Value::Text("Yes".into())]);
        assert!(!pilot.ui().is_modal(pilot.ui().current_screen().unwrap()));
    }

    #[test]
    fn close_button_answers_close() {
        let pilot = Pilot::new(480, 272);
        let answers = ask(&pilot);
        let ui = pilot.ui();
        let region = ui.aperture_of(ui.current_screen().unwrap()).unwrap().region;
        pilot.tap(Point::new(region.right() - 5, region.y + 5)).unwrap();
        assert_eq!(answers.borrow().last(), Some(&Value::Text(CLOSE.into())));
    }

    #[test]
    fn empty_dialog_still_closes() {
        let pilot = Pilot::new(480, 272);
        pilot.open(|_: &Ui| Ok(Blank)).unwrap();
        pilot.open(|ui: &Ui| DialogBox::new(Vec::<(String, Color)>::new()).build(ui)).unwrap();
        assert_eq!(pilot.ui().screen_widgets(pilot.ui().current_screen().unwrap()).unwrap().len(), 1);
    }
}
