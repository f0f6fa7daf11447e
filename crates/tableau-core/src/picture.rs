use smallvec::SmallVec;

use crate::{Color, Rect, Size, Vec2};

/// A primitive draw command in element-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    RoundedRect {
        rect: Rect,
        color: Color,
        radius: i32,
    },
    Text {
        origin: Vec2,
        text: String,
        color: Color,
        size: u32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
}

/// Cached render output of one element.
///
/// Pictures are produced by an element's draw operation, kept until the
/// element is marked dirty, and handed to the backend at the element's
/// top-left every frame it is visible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Picture {
    pub size: Size,
    pub cmds: SmallVec<[DrawCmd; 4]>,
}

impl Picture {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cmds: SmallVec::new(),
        }
    }

    /// A filled rounded rect covering the whole picture.
    pub fn rounded(size: Size, color: Color, radius: i32) -> Self {
        Self::new(size).with_rounded_rect(Rect::from_origin_size(Vec2::ZERO, size), color, radius)
    }

    pub fn with_rounded_rect(mut self, rect: Rect, color: Color, radius: i32) -> Self {
        self.cmds.push(DrawCmd::RoundedRect {
            rect,
            color,
            radius,
        });
        self
    }

    pub fn with_text(mut self, origin: Vec2, text: impl Into<String>, color: Color, size: u32) -> Self {
        self.cmds.push(DrawCmd::Text {
            origin,
            text: text.into(),
            color,
            size,
        });
        self
    }

    pub fn with_line(mut self, from: Vec2, to: Vec2, color: Color) -> Self {
        self.cmds.push(DrawCmd::Line { from, to, color });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}
