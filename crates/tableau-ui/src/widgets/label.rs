use tableau_core::{Color, Picture, Size, Vec2};

use crate::element::{DrawCx, Element, ElementId, MeasureCx};
use crate::Engine;

/// Plain text with no background.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    text: String,
    /// Font size in px; the style's medium size when unset.
    pub px: Option<u32>,
    /// Text colour; the style's normal text colour when unset.
    pub color: Option<Color>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            px: None,
            color: None,
        }
    }

    pub fn with_px(mut self, px: u32) -> Self {
        self.px = Some(px);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text of the label at `id`. Returns `false` when `id` is
    /// not a label.
    pub fn set_text(ui: &mut Engine, id: ElementId, text: impl Into<String>) -> bool {
        let Some(label) = ui.widget_mut::<Label>(id) else {
            return false;
        };
        label.text = text.into();
        ui.mark_dirty(id);
        ui.reflow(id);
        true
    }
}

impl Element for Label {
    fn measure(&self, cx: &MeasureCx<'_>) -> Size {
        cx.metrics
            .text_size(&self.text, self.px.unwrap_or(cx.style.font_med))
    }

    fn draw(&mut self, cx: &DrawCx<'_>) -> Option<Picture> {
        Some(Picture::new(cx.size).with_text(
            Vec2::ZERO,
            self.text.clone(),
            self.color.unwrap_or(cx.style.colors.text_normal),
            self.px.unwrap_or(cx.style.font_med),
        ))
    }
}
