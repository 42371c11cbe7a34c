#![forbid(unsafe_code)]

//! Step-box placement resolution.
//!
//! A step declares a [`Position`] directive; the resolver turns it into a
//! concrete [`Placement`] — a [`ResolvedPosition`] plus an offset for the
//! box relative to the highlight frame's container.
//!
//! # Invariants
//!
//! 1. Resolution never fails: every directive degrades to a valid concrete
//!    position (`Anchor` without an anchored container becomes `Auto`,
//!    unknown names parse as `Auto`, `Auto` without frame geometry becomes
//!    `ScreenCenter`).
//! 2. `Auto` with frame geometry picks a side by comparing each side's free
//!    space against one quarter of the total free space, checked in the
//!    fixed order top, left, right, then bottom. This is deliberately not a
//!    true maximum-space selection; the check order is part of the
//!    documented behavior.

use crate::geometry::{Rect, Size};

/// A requested placement directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Fixed to the top-left corner of the screen.
    ScreenTopLeft,
    /// Fixed to the top-right corner of the screen.
    ScreenTopRight,
    /// Fixed to the bottom-right corner of the screen.
    ScreenBottomRight,
    /// Fixed to the bottom-left corner of the screen.
    ScreenBottomLeft,
    /// Fixed to the center of the screen.
    ScreenCenter,
    /// Above the highlight frame, centered horizontally.
    Top,
    /// To the right of the highlight frame, centered vertically.
    Right,
    /// Below the highlight frame, centered horizontally.
    Bottom,
    /// To the left of the highlight frame, centered vertically.
    Left,
    /// Inside the configured anchored container instead of floating.
    Anchor,
    /// Choose a side automatically from the available space.
    #[default]
    Auto,
}

impl Position {
    /// Parse a directive name. Unrecognized names degrade to [`Auto`]
    /// rather than failing.
    ///
    /// [`Auto`]: Position::Auto
    pub fn parse(name: &str) -> Self {
        match name {
            "screen-top-left" => Self::ScreenTopLeft,
            "screen-top-right" => Self::ScreenTopRight,
            "screen-bottom-right" => Self::ScreenBottomRight,
            "screen-bottom-left" => Self::ScreenBottomLeft,
            "screen-center" => Self::ScreenCenter,
            "top" => Self::Top,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "anchor" => Self::Anchor,
            _ => Self::Auto,
        }
    }

    /// Whether this directive is fixed to the screen and therefore needs no
    /// target element.
    pub const fn is_fixed(&self) -> bool {
        matches!(
            self,
            Self::ScreenTopLeft
                | Self::ScreenTopRight
                | Self::ScreenBottomRight
                | Self::ScreenBottomLeft
                | Self::ScreenCenter
        )
    }
}

/// A concrete position after resolution. Never `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPosition {
    ScreenTopLeft,
    ScreenTopRight,
    ScreenBottomRight,
    ScreenBottomLeft,
    ScreenCenter,
    Top,
    Right,
    Bottom,
    Left,
    Anchor,
}

impl ResolvedPosition {
    /// CSS class name for styling the positioned box.
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::ScreenTopLeft => "pos-screen-top-left",
            Self::ScreenTopRight => "pos-screen-top-right",
            Self::ScreenBottomRight => "pos-screen-bottom-right",
            Self::ScreenBottomLeft => "pos-screen-bottom-left",
            Self::ScreenCenter => "pos-screen-center",
            Self::Top => "pos-top",
            Self::Right => "pos-right",
            Self::Bottom => "pos-bottom",
            Self::Left => "pos-left",
            Self::Anchor => "pos-anchor",
        }
    }
}

/// Offset of the step box relative to the highlight frame's container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxOffset {
    pub left: f64,
    pub top: f64,
}

/// The output of position resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// The concrete position the directive resolved to.
    pub position: ResolvedPosition,
    /// Box offset relative to the frame container. Zero for `Anchor`.
    pub offset: BoxOffset,
}

/// Everything resolution needs to know about the current layout.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    /// Current highlight frame geometry, if a target is highlighted.
    pub frame: Option<Rect>,
    /// Outer size of the floating step box.
    pub box_size: Size,
    /// Size of the containing body.
    pub body: Size,
    /// Whether an anchored step container is configured.
    pub has_anchor: bool,
}

/// Resolves placement directives into concrete box offsets.
#[derive(Debug, Clone, Copy)]
pub struct PositionResolver {
    /// Horizontal gap between frame and box.
    pub gap_horizontal: f64,
    /// Vertical gap between frame and box.
    pub gap_vertical: f64,
}

impl Default for PositionResolver {
    fn default() -> Self {
        Self {
            gap_horizontal: 10.0,
            gap_vertical: 10.0,
        }
    }
}

impl PositionResolver {
    /// Resolve a directive into a concrete placement. Never fails.
    pub fn resolve(&self, requested: Position, ctx: &ResolveContext) -> Placement {
        let requested = match requested {
            Position::Anchor if !ctx.has_anchor => Position::Auto,
            Position::Anchor => {
                return Placement {
                    position: ResolvedPosition::Anchor,
                    offset: BoxOffset::default(),
                };
            }
            other => other,
        };

        let position = match (requested, ctx.frame) {
            (Position::ScreenTopLeft, _) => ResolvedPosition::ScreenTopLeft,
            (Position::ScreenTopRight, _) => ResolvedPosition::ScreenTopRight,
            (Position::ScreenBottomRight, _) => ResolvedPosition::ScreenBottomRight,
            (Position::ScreenBottomLeft, _) => ResolvedPosition::ScreenBottomLeft,
            (Position::ScreenCenter, _) => ResolvedPosition::ScreenCenter,
            // Relative placement needs frame geometry to attach to.
            (_, None) => ResolvedPosition::ScreenCenter,
            (Position::Top, Some(_)) => ResolvedPosition::Top,
            (Position::Right, Some(_)) => ResolvedPosition::Right,
            (Position::Bottom, Some(_)) => ResolvedPosition::Bottom,
            (Position::Left, Some(_)) => ResolvedPosition::Left,
            (Position::Auto, Some(frame)) => self.choose_side(&frame, ctx.body),
            (Position::Anchor, Some(_)) => unreachable!("anchor handled above"),
        };

        Placement {
            position,
            offset: self.offset_for(position, ctx),
        }
    }

    /// Pick a side for `Auto`: the first side (top, left, right, bottom)
    /// holding at least a quarter of the total free space around the frame.
    fn choose_side(&self, frame: &Rect, body: Size) -> ResolvedPosition {
        let space_top = frame.top;
        let space_left = frame.left;
        let space_bottom = body.height - frame.top - frame.height;
        let space_right = body.width - frame.left - frame.width;
        let total = space_top + space_left + space_bottom + space_right;

        if space_top * 4.0 >= total {
            ResolvedPosition::Top
        } else if space_left * 4.0 >= total {
            ResolvedPosition::Left
        } else if space_right * 4.0 >= total {
            ResolvedPosition::Right
        } else {
            ResolvedPosition::Bottom
        }
    }

    fn offset_for(&self, position: ResolvedPosition, ctx: &ResolveContext) -> BoxOffset {
        let gh = self.gap_horizontal;
        let gv = self.gap_vertical;
        let bx = ctx.box_size;

        // Fixed screen positions use constant offsets only.
        let frame = match position {
            ResolvedPosition::ScreenCenter | ResolvedPosition::Anchor => {
                return BoxOffset::default();
            }
            ResolvedPosition::ScreenTopLeft => return BoxOffset { left: gh, top: gv },
            ResolvedPosition::ScreenTopRight => return BoxOffset { left: -gh, top: gv },
            ResolvedPosition::ScreenBottomRight => {
                return BoxOffset {
                    left: -gh,
                    top: -gv,
                };
            }
            ResolvedPosition::ScreenBottomLeft => {
                return BoxOffset {
                    left: gh,
                    top: -gv,
                };
            }
            _ => ctx.frame.unwrap_or_default(),
        };

        // Relative positions center the box on the perpendicular axis and
        // push it out by the gap on the primary axis.
        match position {
            ResolvedPosition::Bottom => BoxOffset {
                left: (frame.width - bx.width) / 2.0,
                top: gv + frame.height,
            },
            ResolvedPosition::Top => BoxOffset {
                left: (frame.width - bx.width) / 2.0,
                top: -gv - bx.height,
            },
            ResolvedPosition::Right => BoxOffset {
                left: gh + frame.width,
                top: (frame.height - bx.height) / 2.0,
            },
            ResolvedPosition::Left => BoxOffset {
                left: -gh - bx.width,
                top: (frame.height - bx.height) / 2.0,
            },
            _ => unreachable!("fixed positions returned above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(frame: Option<Rect>) -> ResolveContext {
        ResolveContext {
            frame,
            box_size: Size::new(200.0, 100.0),
            body: Size::new(1000.0, 800.0),
            has_anchor: false,
        }
    }

    #[test]
    fn parse_known_names() {
        assert_eq!(Position::parse("top"), Position::Top);
        assert_eq!(Position::parse("anchor"), Position::Anchor);
        assert_eq!(Position::parse("screen-center"), Position::ScreenCenter);
    }

    #[test]
    fn parse_unknown_degrades_to_auto() {
        assert_eq!(Position::parse("sideways"), Position::Auto);
        assert_eq!(Position::parse(""), Position::Auto);
    }

    #[test]
    fn fixed_positions_need_no_element() {
        assert!(Position::ScreenCenter.is_fixed());
        assert!(Position::ScreenTopLeft.is_fixed());
        assert!(!Position::Top.is_fixed());
        assert!(!Position::Auto.is_fixed());
    }

    #[test]
    fn auto_without_frame_is_screen_center() {
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Auto, &ctx(None));
        assert_eq!(placement.position, ResolvedPosition::ScreenCenter);
        assert_eq!(placement.offset, BoxOffset::default());
    }

    #[test]
    fn auto_picks_top_when_top_space_largest() {
        // Frame near the bottom-center: most free space is above.
        let frame = Rect::new(400.0, 700.0, 100.0, 50.0);
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Auto, &ctx(Some(frame)));
        assert_eq!(placement.position, ResolvedPosition::Top);
    }

    #[test]
    fn auto_picks_left_when_left_space_largest() {
        let frame = Rect::new(900.0, 380.0, 80.0, 40.0);
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Auto, &ctx(Some(frame)));
        assert_eq!(placement.position, ResolvedPosition::Left);
    }

    #[test]
    fn auto_tie_break_prefers_top() {
        // Frame centered in a square body: every side holds exactly a
        // quarter of the free space; top wins the tie.
        let frame = Rect::new(450.0, 450.0, 100.0, 100.0);
        let mut context = ctx(Some(frame));
        context.body = Size::new(1000.0, 1000.0);
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Auto, &context);
        assert_eq!(placement.position, ResolvedPosition::Top);
    }

    #[test]
    fn anchor_without_container_falls_back_to_auto() {
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Anchor, &ctx(None));
        assert_eq!(placement.position, ResolvedPosition::ScreenCenter);
    }

    #[test]
    fn anchor_with_container_resolves_to_anchor() {
        let resolver = PositionResolver::default();
        let mut context = ctx(None);
        context.has_anchor = true;
        let placement = resolver.resolve(Position::Anchor, &context);
        assert_eq!(placement.position, ResolvedPosition::Anchor);
    }

    #[test]
    fn relative_without_frame_degrades_to_screen_center() {
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Bottom, &ctx(None));
        assert_eq!(placement.position, ResolvedPosition::ScreenCenter);
    }

    #[test]
    fn bottom_centers_horizontally_and_clears_frame() {
        let frame = Rect::new(100.0, 100.0, 300.0, 50.0);
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Bottom, &ctx(Some(frame)));
        assert_eq!(placement.position, ResolvedPosition::Bottom);
        // Box is 200 wide against a 300 wide frame: centered at +50.
        assert_eq!(placement.offset.left, 50.0);
        assert_eq!(placement.offset.top, 10.0 + 50.0);
    }

    #[test]
    fn left_pushes_box_fully_outside_frame() {
        let frame = Rect::new(500.0, 100.0, 100.0, 100.0);
        let resolver = PositionResolver::default();
        let placement = resolver.resolve(Position::Left, &ctx(Some(frame)));
        assert_eq!(placement.offset.left, -10.0 - 200.0);
        assert_eq!(placement.offset.top, 0.0);
    }

    #[test]
    fn screen_corner_offsets_point_inward() {
        let resolver = PositionResolver::default();
        let tl = resolver.resolve(Position::ScreenTopLeft, &ctx(None));
        assert_eq!(tl.offset, BoxOffset { left: 10.0, top: 10.0 });
        let br = resolver.resolve(Position::ScreenBottomRight, &ctx(None));
        assert_eq!(
            br.offset,
            BoxOffset {
                left: -10.0,
                top: -10.0
            }
        );
    }

    #[test]
    fn css_classes_are_distinct() {
        let positions = [
            ResolvedPosition::ScreenTopLeft,
            ResolvedPosition::ScreenTopRight,
            ResolvedPosition::ScreenBottomRight,
            ResolvedPosition::ScreenBottomLeft,
            ResolvedPosition::ScreenCenter,
            ResolvedPosition::Top,
            ResolvedPosition::Right,
            ResolvedPosition::Bottom,
            ResolvedPosition::Left,
            ResolvedPosition::Anchor,
        ];
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert_ne!(a.css_class(), b.css_class());
            }
        }
    }
}
