use std::time::Duration;

use crate::Vec2;

/// Per-element pointer/keyboard state plus the animated hover and click
/// intensities derived from it.
///
/// `click_percent` and `hover_percent` ramp linearly toward 100 while the
/// matching flag is set and toward 0 otherwise, covering the full range in
/// one fade time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub is_clicked: bool,
    pub is_hovered: bool,
    pub is_kb_focused: bool,
    /// Keep keyboard focus even when the pointer is released elsewhere.
    pub keep_kb_focus: bool,
    pub click_percent: f32,
    pub hover_percent: f32,
    /// Pointer position relative to the element's top-left, `None` when the
    /// pointer is not over the element.
    pub pointer: Option<Vec2>,
}

impl InteractionState {
    pub const fn new() -> Self {
        Self {
            is_clicked: false,
            is_hovered: false,
            is_kb_focused: false,
            keep_kb_focus: false,
            click_percent: 0.0,
            hover_percent: 0.0,
            pointer: None,
        }
    }

    /// Advances both intensities by `dt`.
    pub fn advance(&mut self, dt: Duration, fade: Duration) {
        let delta = if fade.is_zero() {
            100.0
        } else {
            100.0 * dt.as_secs_f32() / fade.as_secs_f32()
        };
        self.click_percent = step(self.click_percent, delta, self.is_clicked);
        self.hover_percent = step(self.hover_percent, delta, self.is_hovered);
    }

    /// Whether either intensity is still visible; animated widgets redraw
    /// while this holds.
    pub fn is_animating(&self) -> bool {
        self.click_percent > 0.0 || self.hover_percent > 0.0
    }
}

fn step(value: f32, delta: f32, up: bool) -> f32 {
    let signed = if up { delta } else { -delta };
    (value + signed).clamp(0.0, 100.0)
}
