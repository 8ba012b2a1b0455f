//! Core geometry for layout analysis
//!
//! Everything here works on abstract float units. Callers convert from their
//! native units (inches, EMU, points) before handing rectangles over.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance for floating-point residue left behind by translations.
///
/// Overflows and spacing deficits at or below this are treated as zero, and
/// projections overlapping by less than this are treated as touching.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// A 2D point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset the point by a displacement
    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis along which two rectangles are compared or moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }

    /// Whether the rectangle may enter analysis: finite, with positive extent
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Check if the interiors of two rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// The overlapping region of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Area of the overlapping region (0 when disjoint)
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        self.intersection(other).map_or(0.0, |r| r.area())
    }

    /// Overlap area relative to the smaller of the two rectangles
    pub fn overlap_ratio(&self, other: &Rect) -> f64 {
        let smaller = self.area().min(other.area());
        if smaller <= 0.0 {
            return 0.0;
        }
        self.overlap_area(other) / smaller
    }

    /// Per-axis separation `(horizontal, vertical)`.
    ///
    /// A positive value is the empty space between the facing edges on that
    /// axis; a negative value is how deep the projections overlap.
    pub fn axis_gaps(&self, other: &Rect) -> (f64, f64) {
        let gap_x = self.left.max(other.left) - self.right().min(other.right());
        let gap_y = self.top.max(other.top) - self.bottom().min(other.bottom());
        (gap_x, gap_y)
    }

    /// Signed nearest-edge distance along the axis of least separation.
    ///
    /// Negative when the rectangles overlap; the magnitude is then the
    /// minimal translation distance that separates them.
    pub fn edge_gap(&self, other: &Rect) -> f64 {
        let (gap_x, gap_y) = self.axis_gaps(other);
        gap_x.max(gap_y)
    }

    /// Minimal translation that moves `other` off `self`.
    ///
    /// Picks the axis with the smaller overlap (horizontal on ties) and points
    /// away from `self`'s center. Returns `None` when the rectangles don't
    /// intersect.
    pub fn minimal_translation(&self, other: &Rect) -> Option<(Axis, f64)> {
        if !self.intersects(other) {
            return None;
        }
        let (gap_x, gap_y) = self.axis_gaps(other);
        let (depth_x, depth_y) = (-gap_x, -gap_y);
        let (here, there) = (self.center(), other.center());
        if depth_x <= depth_y {
            let sign = if there.x >= here.x { 1.0 } else { -1.0 };
            Some((Axis::Horizontal, sign * depth_x))
        } else {
            let sign = if there.y >= here.y { 1.0 } else { -1.0 };
            Some((Axis::Vertical, sign * depth_y))
        }
    }

    /// Move the rectangle by a displacement
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Move the rectangle along one axis
    pub fn shift(&self, axis: Axis, delta: f64) -> Rect {
        match axis {
            Axis::Horizontal => self.translate(delta, 0.0),
            Axis::Vertical => self.translate(0.0, delta),
        }
    }

    /// Translate (never resize) the rectangle so it lies within the canvas.
    ///
    /// An axis on which the rectangle is larger than the canvas keeps its
    /// left/top edge at 0 and overflows on the right/bottom.
    pub fn clamp_into(&self, canvas: &Canvas) -> Rect {
        self.clamp_within(&canvas.bounds())
    }

    /// Translate (never resize) the rectangle so it lies within `area`.
    ///
    /// Same policy as [`Rect::clamp_into`]: oversized axes pin to the
    /// area's left/top edge.
    pub fn clamp_within(&self, area: &Rect) -> Rect {
        let left = clamp_axis(self.left, self.width, area.left, area.right());
        let top = clamp_axis(self.top, self.height, area.top, area.bottom());
        Rect::new(left, top, self.width, self.height)
    }

    /// Start coordinate along an axis
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Center coordinate along an axis
    pub fn mid(&self, axis: Axis) -> f64 {
        let center = self.center();
        match axis {
            Axis::Horizontal => center.x,
            Axis::Vertical => center.y,
        }
    }
}

fn clamp_axis(start: f64, extent: f64, min: f64, max: f64) -> f64 {
    if extent >= max - min {
        min
    } else {
        start.max(min).min(max - extent)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) {:.2}x{:.2}",
            self.left, self.top, self.width, self.height
        )
    }
}

/// Slide aspect ratios with standard canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 16:9, 10 x 5.625
    #[serde(rename = "16:9")]
    Widescreen,
    /// 4:3, 10 x 7.5
    #[serde(rename = "4:3")]
    Standard,
}

/// The fixed-size area elements are placed on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// 16:9 slide in inches
    pub const WIDESCREEN: Canvas = Canvas {
        width: 10.0,
        height: 5.625,
    };

    /// 4:3 slide in inches
    pub const STANDARD: Canvas = Canvas {
        width: 10.0,
        height: 7.5,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn for_aspect(aspect: AspectRatio) -> Self {
        match aspect {
            AspectRatio::Widescreen => Self::WIDESCREEN,
            AspectRatio::Standard => Self::STANDARD,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The whole canvas as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// The canvas shrunk by `margin` on every side
    pub fn content_area(&self, margin: f64) -> Rect {
        Rect::new(
            margin,
            margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    /// Room left between a position and the far edges, respecting `margin`
    pub fn available_space(&self, left: f64, top: f64, margin: f64) -> (f64, f64) {
        (
            (self.width - left - margin).max(0.0),
            (self.height - top - margin).max(0.0),
        )
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}
