//! In-memory panel that records every drawing call.
//!
//! [`RecordingSurface`] is a cloneable handle: hand one clone to the engine and
//! keep another to inspect what was drawn. [`RecordingSurface::transcript`]
//! renders the log as one line per call for inline snapshots.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use crate::geometry::{Point, Region, Size};
use crate::render::{Color, DisplayError, DisplaySurface};

/// Glyph cell of the recording font.
pub const GLYPH_WIDTH: i32 = 8;
pub const GLYPH_HEIGHT: i32 = 12;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear,
    FillRect { region: Region, color: Color },
    Rect { region: Region, color: Color },
    Line { from: Point, to: Point, color: Color },
    Circle { center: Point, radius: i32, color: Color },
    FillCircle { center: Point, radius: i32, color: Color },
    Text { at: Point, text: String, color: Color },
}

struct Recorder {
    size: Size,
    foreground: Color,
    background: Color,
    ops: Vec<DrawOp>,
    failure: Option<DisplayError>,
}

/// A headless [`DisplaySurface`].
#[derive(Clone)]
pub struct RecordingSurface {
    inner: Rc<RefCell<Recorder>>,
}

impl RecordingSurface {
    /// A white-on-black panel of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recorder {
                size: Size::new(width, height),
                foreground: Color::WHITE,
                background: Color::BLACK,
                ops: Vec::new(),
                failure: None,
            })),
        }
    }

    /// Replace the default foreground and background (builder).
    pub fn with_colors(self, foreground: Color, background: Color) -> Self {
        {
            let mut rec = self.inner.borrow_mut();
            rec.foreground = foreground;
            rec.background = background;
        }
        self
    }

    /// Make every later drawing call fail with `error`, or succeed again.
    pub fn fail_with(&self, error: Option<DisplayError>) {
        self.inner.borrow_mut().failure = error;
    }

    /// Every call recorded since the last clear of the log.
    pub fn ops(&self) -> Vec<DrawOp> {
        self.inner.borrow().ops.clone()
    }

    /// Drain the log.
    pub fn take_ops(&self) -> Vec<DrawOp> {
        std::mem::take(&mut self.inner.borrow_mut().ops)
    }

    pub fn clear_log(&self) {
        self.inner.borrow_mut().ops.clear();
    }

    pub fn background_color(&self) -> Color {
        self.inner.borrow().background
    }

    /// Texts drawn, in order.
    pub fn texts(&self) -> Vec<String> {
        self.inner
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The log, one call per line.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for op in &self.inner.borrow().ops {
            let _ = match op {
                DrawOp::Clear => writeln!(out, "clear"),
                DrawOp::FillRect { region, color } => writeln!(out, "fill {} {}", rect(*region), hex(*color)),
                DrawOp::Rect { region, color } => writeln!(out, "rect {} {}", rect(*region), hex(*color)),
                DrawOp::Line { from, to, color } => {
                    writeln!(out, "line {},{} -> {},{} {}", from.x, from.y, to.x, to.y, hex(*color))
                }
                DrawOp::Circle { center, radius, color } => {
                    writeln!(out, "circle {},{} r{} {}", center.x, center.y, radius, hex(*color))
                }
                DrawOp::FillCircle { center, radius, color } => {
                    writeln!(out, "disc {},{} r{} {}", center.x, center.y, radius, hex(*color))
                }
                DrawOp::Text { at, text, color } => writeln!(out, "text {},{} {:?} {}", at.x, at.y, text, hex(*color)),
            };
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn record(&self, op: DrawOp) -> Result<(), DisplayError> {
        let mut rec = self.inner.borrow_mut();
        if let Some(error) = rec.failure {
            return Err(error);
        }
        rec.ops.push(op);
        Ok(())
    }
}

fn rect(r: Region) -> String {
    format!("{},{} {}x{}", r.x, r.y, r.width, r.height)
}

fn hex(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.record(DrawOp::Clear)
    }

    fn fill_rect(&mut self, region: Region, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::FillRect { region, color })
    }

    fn draw_rect(&mut self, region: Region, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::Rect { region, color })
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::Line { from, to, color })
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::Circle { center, radius, color })
    }

    fn fill_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::FillCircle { center, radius, color })
    }

    fn draw_text(&mut self, at: Point, text: &str, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::Text { at, text: text.to_owned(), color })
    }

    fn text_size(&self, text: &str) -> Size {
        Size::new(text.chars().count() as i32 * GLYPH_WIDTH, GLYPH_HEIGHT)
    }

    fn foreground(&self) -> Color {
        self.inner.borrow().foreground
    }

    fn background(&self) -> Color {
        self.inner.borrow().background
    }

    fn size(&self) -> Size {
        self.inner.borrow().size
    }
}
