//! Built-in widgets: Label, Button, Checkbox, Slider, Knob, lists, groups and
//! dialogs.

pub mod button;
pub mod checkbox;
pub mod dialog;
pub mod dropdown;
pub mod groups;
pub mod knob;
pub mod label;
pub mod listbox;
pub mod slider;

pub use button::{Button, Shape};
pub use checkbox::Checkbox;
pub use dialog::DialogBox;
pub use dropdown::Dropdown;
pub use groups::{ButtonList, GroupCallback, RadioButtons};
pub use knob::Knob;
pub use label::Label;
pub use listbox::Listbox;
pub use slider::Slider;
