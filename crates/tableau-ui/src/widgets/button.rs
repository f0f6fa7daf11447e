use std::time::Duration;

use tableau_core::{Picture, Size, Vec2, lerp_alpha};

use crate::element::{Cx, DrawCx, Element, MeasureCx};
use crate::Engine;

/// Click callback; receives the pointer position relative to the button.
pub type ClickFn = Box<dyn FnMut(&mut Engine, Vec2)>;

/// Text on a background that brightens on hover and lights up while held.
pub struct Button {
    text: String,
    pub px: Option<u32>,
    on_click: Option<ClickFn>,
    /// Draw the active look regardless of pointer state.
    pub force_on: bool,
}

impl Button {
    pub fn new(text: impl Into<String>, on_click: impl FnMut(&mut Engine, Vec2) + 'static) -> Self {
        Self {
            text: text.into(),
            px: None,
            on_click: Some(Box::new(on_click)),
            force_on: false,
        }
    }

    /// A button that does nothing when clicked.
    pub fn inert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            px: None,
            on_click: None,
            force_on: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("force_on", &self.force_on)
            .finish_non_exhaustive()
    }
}

impl Element for Button {
    fn measure(&self, cx: &MeasureCx<'_>) -> Size {
        let text = cx
            .metrics
            .text_size(&self.text, self.px.unwrap_or(cx.style.font_med));
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
        let (alpha, text_color) = if cx.state.is_clicked || self.force_on {
            (style.alpha.button_active, style.colors.text_highlighted)
        } else {
            let t = cx.state.hover_percent / 100.0;
            (
                lerp_alpha(style.alpha.button, style.alpha.button_hover, t),
                style.colors.text_normal,
            )
        };
        let pad = style.padding.button;
        Some(
            Picture::rounded(
                cx.size,
                style.colors.foreground.with_alpha(alpha),
                style.padding.corner_radius,
            )
            .with_text(
                Vec2::new(pad, pad),
                self.text.clone(),
                text_color,
                self.px.unwrap_or(style.font_med),
            ),
        )
    }

    fn on_down(&mut self, cx: &mut Cx<'_>, _at: Vec2) {
        cx.mark_dirty();
    }

    fn on_up(&mut self, cx: &mut Cx<'_>) {
        cx.mark_dirty();
    }

    fn on_click(&mut self, cx: &mut Cx<'_>, at: Vec2) {
        if let Some(f) = self.on_click.as_mut() {
            f(cx.ui, at);
        }
    }
}
