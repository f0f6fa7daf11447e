use std::collections::VecDeque;

use tableau_core::{
    Backend, Color, HeadlessBackend, MouseButton, Picture, RawEvent, Result, Size, TextMetrics,
    Vec2,
};

/// Headless backend fed from a per-frame event script.
pub struct Scripted {
    inner: HeadlessBackend,
    script: VecDeque<Vec<RawEvent>>,
}

impl Scripted {
    pub fn new(inner: HeadlessBackend, script: impl IntoIterator<Item = Vec<RawEvent>>) -> Self {
        Self {
            inner,
            script: script.into_iter().collect(),
        }
    }

    /// Clicks at the pointer every `period` frames, then quits after
    /// `frames` frames.
    pub fn clicking(inner: HeadlessBackend, period: usize, frames: usize) -> Self {
        let script = (0..frames).map(|f| match f % period {
            _ if f + 1 == frames => vec![RawEvent::Quit],
            p if p == period - 2 => vec![RawEvent::MouseDown(MouseButton::Primary)],
            p if p == period - 1 => vec![RawEvent::MouseUp(MouseButton::Primary)],
            _ => Vec::new(),
        });
        Self::new(inner, script)
    }
}

impl TextMetrics for Scripted {
    fn text_size(&self, text: &str, px: u32) -> Size {
        self.inner.text_size(text, px)
    }
}

impl Backend for Scripted {
    fn size(&self) -> Size {
        self.inner.size()
    }

    fn pointer(&self) -> Vec2 {
        self.inner.pointer()
    }

    fn poll_events(&mut self) -> Vec<RawEvent> {
        for event in self.script.pop_front().unwrap_or_default() {
            self.inner.push(event);
        }
        self.inner.poll_events()
    }

    fn clear(&mut self, color: Color) {
        self.inner.clear(color);
    }

    fn draw(&mut self, picture: &Picture, at: Vec2) -> Result<()> {
        self.inner.draw(picture, at)
    }

    fn present(&mut self) -> Result<()> {
        let drawn = self.inner.drawn_count();
        log::trace!("present: {drawn} pictures");
        self.inner.present()
    }

    fn message_box(&mut self, title: &str, message: &str) {
        self.inner.message_box(title, message);
    }
}
