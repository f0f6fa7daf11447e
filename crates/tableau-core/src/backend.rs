//! The display backend contract.
//!
//! The engine never talks to a windowing or graphics library directly. It
//! consumes a [`Backend`]: something that owns one resizable surface, yields
//! the frame's raw input, measures text, and draws [`Picture`]s.
//!
//! [`HeadlessBackend`] implements the contract in memory. It is what tests and
//! the headless demo run against.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Color, Picture, RawEvent, Result, Size, UiError, Vec2};

/// Parameters for creating the output surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub size: Size,
    /// Index of the output device the surface is created on.
    pub display: u32,
    pub caption: String,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            size: Size::new(1600, 900),
            display: 0,
            caption: "Tableau".into(),
        }
    }
}

pub trait TextMetrics {
    /// Pixel extent of `text` rendered at font size `px`.
    fn text_size(&self, text: &str, px: u32) -> Size;
}

pub trait Backend: TextMetrics {
    /// Current surface size.
    fn size(&self) -> Size;
    /// Current pointer position in surface coordinates.
    fn pointer(&self) -> Vec2;
    /// Drains the raw events received since the last call.
    fn poll_events(&mut self) -> Vec<RawEvent>;
    fn clear(&mut self, color: Color);
    /// Draws `picture` with its local origin at `at`.
    fn draw(&mut self, picture: &Picture, at: Vec2) -> Result<()>;
    fn present(&mut self) -> Result<()>;
    /// Blocking modal message box, used for fatal error reports.
    fn message_box(&mut self, title: &str, message: &str);
}

#[derive(Debug, Default)]
pub struct HeadlessState {
    pub size: Size,
    pub pointer: Vec2,
    pub pending: Vec<RawEvent>,
    /// Pictures drawn since the last `clear`, with their positions.
    pub drawn: Vec<(Vec2, Picture)>,
    pub clear_color: Option<Color>,
    pub frames_presented: u64,
    pub message_boxes: Vec<(String, String)>,
    /// When set, every `draw` fails with a rendering error.
    pub fail_draws: bool,
}

/// In-memory backend. Clones share state, so a test can keep a handle after
/// giving one to the engine.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessBackend {
    pub fn new(size: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                size,
                ..Default::default()
            })),
        }
    }

    pub fn from_spec(spec: &SurfaceSpec) -> Self {
        log::info!(
            "headless surface {}x{} on display {} ({})",
            spec.size.width,
            spec.size.height,
            spec.display,
            spec.caption
        );
        Self::new(spec.size)
    }

    pub fn push(&self, event: RawEvent) {
        self.state.borrow_mut().pending.push(event);
    }

    pub fn move_pointer(&self, to: Vec2) {
        self.state.borrow_mut().pointer = to;
    }

    pub fn set_fail_draws(&self, fail: bool) {
        self.state.borrow_mut().fail_draws = fail;
    }

    /// Read access to the recorded state.
    pub fn with_state<R>(&self, f: impl FnOnce(&HeadlessState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn drawn_count(&self) -> usize {
        self.state.borrow().drawn.len()
    }
}

impl TextMetrics for HeadlessBackend {
    // Monospace: every char is half the font size wide.
    fn text_size(&self, text: &str, px: u32) -> Size {
        let px = px as i32;
        Size::new(text.chars().count() as i32 * (px / 2), px)
    }
}

impl Backend for HeadlessBackend {
    fn size(&self) -> Size {
        self.state.borrow().size
    }

    fn pointer(&self) -> Vec2 {
        self.state.borrow().pointer
    }

    fn poll_events(&mut self) -> Vec<RawEvent> {
        let mut st = self.state.borrow_mut();
        let events = std::mem::take(&mut st.pending);
        for e in &events {
            if let RawEvent::Resize(size) = e {
                st.size = *size;
            }
        }
        events
    }

    fn clear(&mut self, color: Color) {
        let mut st = self.state.borrow_mut();
        st.clear_color = Some(color);
        st.drawn.clear();
    }

    fn draw(&mut self, picture: &Picture, at: Vec2) -> Result<()> {
        let mut st = self.state.borrow_mut();
        if st.fail_draws {
            return Err(UiError::Rendering(format!(
                "headless draw of {}x{} picture refused",
                picture.size.width, picture.size.height
            )));
        }
        st.drawn.push((at, picture.clone()));
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.state.borrow_mut().frames_presented += 1;
        Ok(())
    }

    fn message_box(&mut self, title: &str, message: &str) {
        self.state
            .borrow_mut()
            .message_boxes
            .push((title.to_string(), message.to_string()));
    }
}
