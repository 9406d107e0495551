//! # tft-gui
//!
//! A screen/touch event engine for resistive-touch TFT panels.
//!
//! tft-gui drives a small retained widget GUI on a single-threaded cooperative
//! scheduler: it polls the touch controller, dispatches exactly one press and
//! one release per touch to the widgets of the current screen, manages a stack
//! of full-screen and modal ("Aperture") screens, redraws lazily, and renders
//! disabled widgets through a greyed-out colour transform.
//!
//! ## Core Systems
//!
//! - **[`app`]**: `Ui` engine handle, `GuiConfig`, the run loop and `Gui`
//! - **[`screen`]**: Screens, Apertures, navigation stack and reclamation
//! - **[`event`]**: Touch source contract, dispatch passes, deferred navigation
//! - **[`widget`]**: Widget trait, base state, values, engine-side access
//! - **[`widgets`]**: Built-in widgets: Label, Button, Checkbox, Slider, Knob, Listbox, Dropdown, groups, dialogs
//! - **[`render`]**: Colours, panel driver contract, greying display proxy
//! - **[`task`]**: Cancellable per-screen cooperative tasks
//! - **[`testing`]**: Headless panel, scripted touch and `Pilot`
//! - **[`geometry`]**: Point, Size, Region primitives

// Foundation
pub mod error;
pub mod geometry;

// Widget system
pub mod widget;
pub mod widgets;

// Events and tasks
pub mod event;
pub mod task;

// Rendering
pub mod render;

// Engine
pub mod app;
pub mod screen;

// Headless harness
pub mod testing;

pub use app::{Gui, GuiConfig, Ui};
pub use error::{GuiError, Result};
pub use event::{Destination, PassOutcome, TouchSource};
pub use geometry::{Point, Region, Size};
pub use render::{Color, DisplayError, DisplaySurface, GreyStyle};
pub use screen::{Aperture, Blank, ScreenId, View};
pub use task::TaskHandle;
pub use widget::{Hook, Value, Widget, WidgetExt, WidgetId};
