#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Page coordinates are `f64` pixels with the origin at the top-left of the
//! document. A [`Rect`] describes a highlighted region; a [`Viewport`]
//! describes the visible window over the document including its scroll
//! offset.

/// A rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Center point as `(x, y)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.left + self.width / 2.0,
            self.top + self.height / 2.0,
        )
    }

    /// Outer size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow the rectangle outward by the given sides.
    ///
    /// The left/top edges move up and left; width and height absorb the
    /// opposing sides. Edges are not clamped: a padded rect near the
    /// document origin may have negative `left`/`top`.
    pub fn expand(&self, sides: Sides) -> Rect {
        Rect {
            left: self.left - sides.left,
            top: self.top - sides.top,
            width: self.width + sides.left + sides.right,
            height: self.height + sides.top + sides.bottom,
        }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-side pixel amounts for padding the highlight frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Equal padding on all sides.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Explicit per-side padding.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// The visible window over the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Horizontal scroll offset of the document.
    pub scroll_left: f64,
    /// Vertical scroll offset of the document.
    pub scroll_top: f64,
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    pub const fn new(scroll_left: f64, scroll_top: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_left,
            scroll_top,
            width,
            height,
        }
    }

    /// Whether the bounds are entirely visible at the current scroll offset.
    pub fn contains(&self, bounds: &Rect) -> bool {
        bounds.top >= self.scroll_top
            && bounds.left >= self.scroll_left
            && bounds.bottom() <= self.scroll_top + self.height
            && bounds.right() <= self.scroll_left + self.width
    }

    /// Whether the bounds could fit inside the viewport extent at some
    /// scroll offset.
    pub fn fits(&self, bounds: &Rect) -> bool {
        bounds.width <= self.width && bounds.height <= self.height
    }
}

/// An absolute scroll destination. Offsets are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollTarget {
    pub left: f64,
    pub top: f64,
}

impl ScrollTarget {
    /// Create a scroll target, clamping negative offsets to zero.
    pub fn clamped(left: f64, top: f64) -> Self {
        Self {
            left: left.max(0.0),
            top: top.max(0.0),
        }
    }
}
