use std::time::Duration;

use tableau_core::{Key, KeyEvent, Picture, Size, Vec2, lerp_alpha};

use crate::element::{Cx, DrawCx, Element, MeasureCx};

/// Single-line text field. Clicking takes keyboard focus; typing edits.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryBox {
    text: String,
    placeholder: String,
    pub px: Option<u32>,
}

impl EntryBox {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            placeholder: placeholder.into(),
            px: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn shown(&self, focused: bool) -> &str {
        if self.text.is_empty() && !focused {
            &self.placeholder
        } else {
            &self.text
        }
    }

    fn changed(cx: &mut Cx<'_>) {
        cx.mark_dirty();
        cx.reflow();
    }
}

impl Default for EntryBox {
    fn default() -> Self {
        Self::new("Type...")
    }
}

impl Element for EntryBox {
    fn measure(&self, cx: &MeasureCx<'_>) -> Size {
        let text = cx.metrics.text_size(
            self.shown(cx.state.is_kb_focused),
            self.px.unwrap_or(cx.style.font_med),
        );
        let pad = cx.style.padding.button * 2;
        Size::new(text.width + pad, text.height + pad)
    }

    fn update(&mut self, cx: &mut Cx<'_>, _dt: Duration) {
        if cx.state().is_animating() {
            cx.mark_dirty();
        }
    }

    fn draw(&mut self, cx: &DrawCx<'_>) -> Option<Picture> {
        let style = cx.style;
        let focused = cx.state.is_kb_focused;
        let (bg, text_color) = if focused {
            (255, style.colors.text_input)
        } else {
            let t = cx.state.hover_percent / 100.0;
            (
                lerp_alpha(style.alpha.button, style.alpha.button_hover, t),
                style.colors.text_normal.with_alpha(128),
            )
        };
        let pad = style.padding.button;
        Some(
            Picture::rounded(
                cx.size,
                style.colors.foreground.with_alpha(bg),
                style.padding.corner_radius,
            )
            .with_text(
                Vec2::new(pad, pad),
                self.shown(focused),
                text_color,
                self.px.unwrap_or(style.font_med),
            ),
        )
    }

    fn on_click(&mut self, cx: &mut Cx<'_>, _at: Vec2) {
        if let Err(e) = cx.focus() {
            log::warn!("entry box could not take focus: {e}");
        }
    }

    fn on_kb_focus(&mut self, cx: &mut Cx<'_>) {
        Self::changed(cx);
    }

    fn on_kb_defocus(&mut self, cx: &mut Cx<'_>) {
        Self::changed(cx);
    }

    fn on_keystroke(&mut self, cx: &mut Cx<'_>, key: &KeyEvent) {
        if !cx.state().is_kb_focused {
            return;
        }
        match key.key {
            Key::Backspace => {
                self.text.pop();
            }
            Key::Delete => self.text.clear(),
            _ => match key.text {
                Some(c) if !c.is_control() => self.text.push(c),
                _ => return,
            },
        }
        Self::changed(cx);
    }
}
