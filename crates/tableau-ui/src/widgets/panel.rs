use tableau_core::Picture;

use crate::element::{DrawCx, Element};

/// Container look: a rounded rect at layout alpha, or nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel {
    pub background: bool,
}

impl Panel {
    pub fn new() -> Self {
        Self { background: true }
    }

    /// No background; used by the root.
    pub fn transparent() -> Self {
        Self { background: false }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Element for Panel {
    fn draw(&mut self, cx: &DrawCx<'_>) -> Option<Picture> {
        self.background.then(|| {
            Picture::rounded(
                cx.size,
                cx.style.colors.foreground.with_alpha(cx.style.alpha.layout),
                cx.style.padding.corner_radius,
            )
        })
    }
}
