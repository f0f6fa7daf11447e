use tableau_core::{Size, Vec2};

/// One of the nine reference points of a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    TopLeft,
    TopCentre,
    TopRight,
    CentreLeft,
    #[default]
    Centre,
    CentreRight,
    BottomLeft,
    BottomCentre,
    BottomRight,
}

impl Alignment {
    /// Normalised position of the point, in halves: 0 = start, 1 = middle,
    /// 2 = end.
    fn halves(self) -> (i32, i32) {
        match self {
            Alignment::TopLeft => (0, 0),
            Alignment::TopCentre => (1, 0),
            Alignment::TopRight => (2, 0),
            Alignment::CentreLeft => (0, 1),
            Alignment::Centre => (1, 1),
            Alignment::CentreRight => (2, 1),
            Alignment::BottomLeft => (0, 2),
            Alignment::BottomCentre => (1, 2),
            Alignment::BottomRight => (2, 2),
        }
    }

    /// The point inside a box of `size`, truncated toward zero.
    pub fn point_in(self, size: Size) -> Vec2 {
        let (hx, hy) = self.halves();
        Vec2::new(size.width * hx / 2, size.height * hy / 2)
    }
}

/// Where an element goes inside the space its parent gives it.
///
/// `anchor` is the point on the parent the element sticks to, `align` the
/// point on the element that sticks there, and `offset` a pixel nudge applied
/// afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub anchor: Alignment,
    pub align: Alignment,
    pub offset: Vec2,
}

impl Position {
    /// Anchored at `anchor` with the same point on the element.
    pub fn new(anchor: Alignment) -> Self {
        Self {
            anchor,
            align: anchor,
            offset: Vec2::ZERO,
        }
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// Top-left of a `child` sized box inside a `parent` sized box.
    pub fn resolve(&self, child: Size, parent: Size) -> Vec2 {
        self.anchor.point_in(parent) - self.align.point_in(child) + self.offset
    }
}
