//! Pixel geometry: Point, Size, Region.
//!
//! Coordinates are panel pixels with the origin at the top-left corner. A
//! [`Region`] spans `x..=x + width` and `y..=y + height`: edges are inclusive,
//! the same extent the panel's rectangle primitives paint, so hit testing and
//! overlap checks agree with what is visible on the glass.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A pixel position (or displacement) on the panel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The panel origin.
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    #[inline]
    pub const fn distance_squared(self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point { x: -self.x, y: -self.y }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A width and height in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// An axis-aligned bounding box: top-left corner plus extent.
///
/// Used for widget bounds, aperture boxes and hit testing. The hot methods are
/// `#[inline]`; the dispatch loop calls [`Region::contains`] for every
/// interactive widget on every touch sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a region from a location and a size.
    #[inline]
    pub const fn at(location: Point, size: Size) -> Self {
        Self { x: location.x, y: location.y, width: size.width, height: size.height }
    }

    /// The right edge (inclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (inclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The top-left corner.
    #[inline]
    pub const fn location(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// The bottom-right corner.
    #[inline]
    pub const fn corner(self) -> Point {
        Point { x: self.right(), y: self.bottom() }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// The centre point (rounded towards the top-left).
    #[inline]
    pub const fn center(self) -> Point {
        Point { x: self.x + self.width / 2, y: self.y + self.height / 2 }
    }

    /// Whether the point lies inside this region, edges included.
    #[inline]
    pub const fn contains(self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.right() && self.y <= p.y && p.y <= self.bottom()
    }

    /// Whether `other` touches or overlaps this region, edges included.
    #[inline]
    pub const fn overlaps(self, other: Region) -> bool {
        other.y <= self.bottom()
            && other.bottom() >= self.y
            && other.x <= self.right()
            && other.right() >= self.x
    }

    /// Translate the region by a displacement.
    #[inline]
    pub const fn translate(self, by: Point) -> Region {
        Region { x: self.x + by.x, y: self.y + by.y, width: self.width, height: self.height }
    }

    /// Contract the region inward by `amount` pixels on every side.
    ///
    /// Width and height are clamped to zero to avoid negative dimensions.
    #[inline]
    pub const fn inset(self, amount: i32) -> Region {
        let w = self.width - 2 * amount;
        let h = self.height - 2 * amount;
        Region {
            x: self.x + amount,
            y: self.y + amount,
            width: if w > 0 { w } else { 0 },
            height: if h > 0 { h } else { 0 },
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Point ────────────────────────────────────────────────────────

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3, 4);
        let b = Point::new(1, 1);
        assert_eq!(a + b, Point::new(4, 5));
        assert_eq!(a - b, Point::new(2, 3));
        assert_eq!(-a, Point::new(-3, -4));
    }

    #[test]
    fn point_from_tuple() {
        let p: Point = (7, 9).into();
        assert_eq!(p, Point::new(7, 9));
    }

    #[test]
    fn point_distance_squared() {
        assert_eq!(Point::new(0, 0).distance_squared(Point::new(3, 4)), 25);
        assert_eq!(Point::ORIGIN.distance_squared(Point::ORIGIN), 0);
    }

    // ── Region ───────────────────────────────────────────────────────

    #[test]
    fn region_edges_are_inclusive() {
        let r = Region::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert!(r.contains(Point::new(10, 20)));
        assert!(r.contains(Point::new(40, 60)));
        assert!(!r.contains(Point::new(41, 60)));
        assert!(!r.contains(Point::new(9, 30)));
    }

    #[test]
    fn region_at_and_accessors() {
        let r = Region::at(Point::new(5, 6), Size::new(10, 12));
        assert_eq!(r.location(), Point::new(5, 6));
        assert_eq!(r.corner(), Point::new(15, 18));
        assert_eq!(r.size(), Size::new(10, 12));
        assert_eq!(r.center(), Point::new(10, 12));
    }

    #[test]
    fn region_overlaps_including_touching_edges() {
        let a = Region::new(0, 0, 10, 10);
        assert!(a.overlaps(Region::new(5, 5, 10, 10)));
        assert!(a.overlaps(Region::new(10, 10, 5, 5)));
        assert!(!a.overlaps(Region::new(11, 0, 5, 5)));
        assert!(!a.overlaps(Region::new(0, 11, 5, 5)));
    }

    #[test]
    fn region_overlaps_is_symmetric() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(8, -4, 3, 5);
        assert_eq!(a.overlaps(b), b.overlaps(a));
    }

    #[test]
    fn region_translate() {
        let r = Region::new(1, 2, 3, 4).translate(Point::new(10, 20));
        assert_eq!(r, Region::new(11, 22, 3, 4));
    }

    #[test]
    fn region_inset() {
        assert_eq!(Region::new(0, 0, 10, 10).inset(2), Region::new(2, 2, 6, 6));
        assert_eq!(Region::new(0, 0, 3, 3).inset(2), Region::new(2, 2, 0, 0));
    }
}
