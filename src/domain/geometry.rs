/// Axis-aligned rectangle, the one shape shared by the player and terrain.
///
/// Position is top-left, y grows downward (terminal convention). Width and
/// height are fixed at construction and must be positive, so the derived
/// edges always satisfy `right() > x` and `bottom() > y`.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    /// Panics on non-positive dimensions; malformed geometry is a
    /// construction-time error, not a runtime condition.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        assert!(w > 0.0 && h > 0.0, "rectangle dimensions must be positive");
        Rect { x, y, w, h }
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.h
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// The rectangle displaced by (dx, dy): the one-frame look-ahead
    /// position used during collision checks.
    #[inline]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, w: self.w, h: self.h }
    }

    /// Strict overlap on both axes. Rectangles that merely share an edge
    /// do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }
}
