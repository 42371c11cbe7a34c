#![forbid(unsafe_code)]

//! Scroll planning for bringing the highlight and its step box into view.
//!
//! [`ScrollPlanner`] is pure geometry: given the highlight frame, the step
//! box's footprint, and the current viewport, it decides whether a scroll
//! is needed and where to scroll to. Suppression of scrolling (before the
//! first layout pass, after manual user scrolls) is the caller's concern.

use crate::geometry::{Rect, ScrollTarget, Size, Viewport};
use crate::position::ResolvedPosition;

/// Plans scroll adjustments for a highlighted region.
#[derive(Debug, Clone, Copy)]
pub struct ScrollPlanner {
    /// Margin kept between the snapped edge and the viewport edge when the
    /// bounds are too large to center.
    pub edge_margin: f64,
    /// Horizontal gap between frame and box (matches the placement gap).
    pub gap_horizontal: f64,
    /// Vertical gap between frame and box.
    pub gap_vertical: f64,
}

impl Default for ScrollPlanner {
    fn default() -> Self {
        Self {
            edge_margin: 50.0,
            gap_horizontal: 10.0,
            gap_vertical: 10.0,
        }
    }
}

impl ScrollPlanner {
    /// Decide whether a scroll is needed to bring the frame — extended by
    /// the step box on the side it occupies — into view.
    ///
    /// Returns `None` when the extended bounds are already fully visible.
    /// Otherwise the target centers the bounds when they fit within the
    /// viewport extent, or snaps the edge implied by `position` into view
    /// with [`edge_margin`](Self::edge_margin). Offsets are never negative.
    pub fn plan(
        &self,
        frame: Rect,
        box_size: Size,
        position: ResolvedPosition,
        viewport: Viewport,
    ) -> Option<ScrollTarget> {
        let bounds = self.extend_bounds(frame, box_size, position);

        if viewport.contains(&bounds) {
            return None;
        }

        let (mid_x, mid_y) = bounds.center();
        let mut top = mid_y - viewport.height / 2.0;
        let mut left = mid_x - viewport.width / 2.0;

        if !viewport.fits(&bounds) {
            // Too large to center: snap the edge nearest the step box so
            // the box comes into view together with the target.
            match position {
                ResolvedPosition::Top => top = bounds.top - self.edge_margin,
                ResolvedPosition::Bottom => {
                    top = bounds.bottom() + self.edge_margin - viewport.height;
                }
                ResolvedPosition::Left => left = bounds.left - self.edge_margin,
                ResolvedPosition::Right => {
                    left = bounds.right() + self.edge_margin - viewport.width;
                }
                _ => {}
            }
        }

        Some(ScrollTarget::clamped(left, top))
    }

    /// Extend the frame bounds by the box footprint on the side matching
    /// the resolved position. Screen-fixed and anchored positions leave
    /// the bounds untouched.
    fn extend_bounds(&self, frame: Rect, box_size: Size, position: ResolvedPosition) -> Rect {
        let mut bounds = frame;
        match position {
            ResolvedPosition::Top => {
                let extent = box_size.height + self.gap_vertical;
                bounds.top -= extent;
                bounds.height += extent;
            }
            ResolvedPosition::Bottom => {
                bounds.height += box_size.height + self.gap_vertical;
            }
            ResolvedPosition::Left => {
                let extent = box_size.width + self.gap_horizontal;
                bounds.left -= extent;
                bounds.width += extent;
            }
            ResolvedPosition::Right => {
                bounds.width += box_size.width + self.gap_horizontal;
            }
            _ => {}
        }
        bounds
    }
}
