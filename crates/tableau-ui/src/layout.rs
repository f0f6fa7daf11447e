//! Layout strategies.
//!
//! A container delegates sizing and placement of its children to a
//! [`Strategy`]. Strategies hold no per-child state: they see the children's
//! measured sizes and positions in order, and return one rect per child.

use tableau_core::{Rect, Size, Vec2};

use crate::Position;

/// A child as its container's strategy sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measured {
    pub size: Size,
    pub position: Position,
}

pub trait Strategy {
    /// Aggregate size of `children`, in order.
    fn measure(&self, children: &[Size]) -> Size;

    /// One rect per child, inside `bounds`.
    fn distribute(&self, children: &[Measured], bounds: Rect) -> Vec<Rect>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Lays children out one after the other along `axis`, with `padding`
/// between neighbours and around the outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxLayout {
    pub axis: Axis,
    pub padding: i32,
}

impl BoxLayout {
    pub const DEFAULT_PADDING: i32 = 5;

    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            padding: Self::DEFAULT_PADDING,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    /// (main, cross) extents of `size`.
    fn split(&self, size: Size) -> (i32, i32) {
        match self.axis {
            Axis::Vertical => (size.height, size.width),
            Axis::Horizontal => (size.width, size.height),
        }
    }

    fn join(&self, main: i32, cross: i32) -> Size {
        match self.axis {
            Axis::Vertical => Size::new(cross, main),
            Axis::Horizontal => Size::new(main, cross),
        }
    }
}

impl Strategy for BoxLayout {
    fn measure(&self, children: &[Size]) -> Size {
        let p = self.padding;
        let (main, cross) = children.iter().fold((0, 0), |(main, cross), s| {
            let (m, c) = self.split(*s);
            (main + m, cross.max(c))
        });
        let gaps = children.len().saturating_sub(1) as i32;
        self.join(main + gaps * p + 2 * p, cross + 2 * p)
    }

    fn distribute(&self, children: &[Measured], bounds: Rect) -> Vec<Rect> {
        let p = self.padding;
        let mut cursor = p;
        children
            .iter()
            .map(|child| {
                let (main, _) = self.split(child.size);
                // Slot along the main axis; the child aligns itself inside it.
                let (offset, space) = match self.axis {
                    Axis::Vertical => (
                        Vec2::new(p, cursor),
                        Size::new(bounds.w - 2 * p, child.size.height),
                    ),
                    Axis::Horizontal => (
                        Vec2::new(cursor, p),
                        Size::new(child.size.width, bounds.h - 2 * p),
                    ),
                };
                let top_left = bounds.origin() + offset + child.position.resolve(child.size, space);
                cursor += main + p;
                Rect::from_origin_size(top_left, child.size)
            })
            .collect()
    }
}

/// Gives every child the full bounds; children overlap and place themselves
/// through their own [`Position`]. Sized by the first child.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackLayout;

impl Strategy for StackLayout {
    fn measure(&self, children: &[Size]) -> Size {
        children.first().copied().unwrap_or(Size::ZERO)
    }

    fn distribute(&self, children: &[Measured], bounds: Rect) -> Vec<Rect> {
        children
            .iter()
            .map(|child| {
                let top_left = bounds.origin() + child.position.resolve(child.size, bounds.size());
                Rect::from_origin_size(top_left, child.size)
            })
            .collect()
    }
}
