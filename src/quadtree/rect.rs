//! Axis-aligned rectangle geometry used for node regions, item footprints and queries.

use geo_traits::{
    CoordTrait, Dimensions, GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection,
    UnimplementedLine, UnimplementedLineString, UnimplementedMultiLineString,
    UnimplementedMultiPoint, UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon,
    UnimplementedTriangle,
};

use crate::r#type::IndexableNum;

/// An axis-aligned rectangle given by its two corners `(min_x, min_y)`-`(max_x, max_y)`.
///
/// Corners are not validated. A rectangle built with `min > max` on either axis is
/// "inverted": every predicate still runs, but such a rectangle never contains a point and
/// is only useful as the result of [`Rect::clip`] on a disjoint input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<N: IndexableNum> {
    min_x: N,
    min_y: N,
    max_x: N,
    max_y: N,
}

impl<N: IndexableNum> Rect<N> {
    /// Create a rectangle from its corner coordinates.
    pub fn new(min_x: N, min_y: N, max_x: N, max_y: N) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a rectangle from its top-left corner and its dimensions.
    ///
    /// The far corner saturates at the bounds of `N`. Use [`Rect::checked_from_xywh`] to
    /// detect that case instead.
    pub fn from_xywh(x: N, y: N, width: N, height: N) -> Self {
        Self::new(x, y, saturating_add(x, width), saturating_add(y, height))
    }

    /// Like [`Rect::from_xywh`], but returns `None` if the far corner is not representable
    /// in `N`.
    pub fn checked_from_xywh(x: N, y: N, width: N, height: N) -> Option<Self> {
        Some(Self::new(x, y, checked_add(x, width)?, checked_add(y, height)?))
    }

    /// Create a zero-sized rectangle located at a single point.
    pub fn from_point(x: N, y: N) -> Self {
        Self::new(x, y, x, y)
    }

    /// Copy the corners of any [`RectTrait`] implementation.
    pub fn from_rect_trait(rect: &impl RectTrait<T = N>) -> Self {
        Self::new(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Get the minimum `x` value of this rectangle.
    #[inline]
    pub fn min_x(&self) -> N {
        self.min_x
    }

    /// Get the minimum `y` value of this rectangle.
    #[inline]
    pub fn min_y(&self) -> N {
        self.min_y
    }

    /// Get the maximum `x` value of this rectangle.
    #[inline]
    pub fn max_x(&self) -> N {
        self.max_x
    }

    /// Get the maximum `y` value of this rectangle.
    #[inline]
    pub fn max_y(&self) -> N {
        self.max_y
    }

    #[inline]
    pub fn width(&self) -> N {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> N {
        self.max_y - self.min_y
    }

    /// The center point of this rectangle.
    pub fn center(&self) -> (N, N) {
        (
            self.min_x + self.width().half(),
            self.min_y + self.height().half(),
        )
    }

    /// Returns `true` if `min > max` on either axis.
    pub fn is_inverted(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow all four sides by `d`.
    ///
    /// For non-negative `d` the corners saturate at the bounds of `N`, so padding a point
    /// near the origin of an unsigned coordinate space does not underflow.
    pub fn pad(&self, d: N) -> Self {
        if d < N::zero() {
            return Self::new(
                self.min_x - d,
                self.min_y - d,
                self.max_x + d,
                self.max_y + d,
            );
        }

        let lower = |v: N| {
            if v >= N::min_value() + d {
                v - d
            } else {
                N::min_value()
            }
        };
        let upper = |v: N| {
            if v <= N::max_value() - d {
                v + d
            } else {
                N::max_value()
            }
        };

        Self::new(
            lower(self.min_x),
            lower(self.min_y),
            upper(self.max_x),
            upper(self.max_y),
        )
    }

    /// Clamp each coordinate into `bounds`.
    ///
    /// The result is never larger than `bounds`. If `self` lies entirely outside of `bounds`
    /// the result is inverted rather than empty, check [`Rect::is_inverted`] if that matters.
    pub fn clip(&self, bounds: &Rect<N>) -> Self {
        let mut clipped = *self;

        if clipped.min_x < bounds.min_x {
            clipped.min_x = bounds.min_x;
        }
        if clipped.min_y < bounds.min_y {
            clipped.min_y = bounds.min_y;
        }
        if clipped.max_x > bounds.max_x {
            clipped.max_x = bounds.max_x;
        }
        if clipped.max_y > bounds.max_y {
            clipped.max_y = bounds.max_y;
        }

        clipped
    }

    /// Returns `true` if the point lies inside this rectangle. Both edges are inclusive.
    #[inline]
    pub fn contains_point(&self, x: N, y: N) -> bool {
        if x < self.min_x || y < self.min_y {
            return false;
        }

        if x > self.max_x || y > self.max_y {
            return false;
        }

        true
    }

    /// Returns `true` if both corners of `other` lie inside this rectangle.
    #[inline]
    pub fn contains_rect(&self, other: &Rect<N>) -> bool {
        self.contains_point(other.min_x, other.min_y)
            && self.contains_point(other.max_x, other.max_y)
    }

    /// Returns `true` if this rectangle overlaps `other`.
    ///
    /// The test is deliberately asymmetric: the minimum edge of `self` must be strictly below
    /// the maximum edge of `other`, while the maximum edge of `self` only has to reach the
    /// minimum edge of `other`.
    #[inline]
    pub fn overlaps(&self, other: &Rect<N>) -> bool {
        self.min_x < other.max_x
            && self.max_x >= other.min_x
            && self.min_y < other.max_y
            && self.max_y >= other.min_y
    }

    /// Split into four quadrants, ordered upper-left, upper-right, lower-left, lower-right.
    ///
    /// The quadrants tile `self` exactly. With integer coordinates and an odd extent, the
    /// right column and the lower row take the remainder.
    pub fn split(&self) -> [Rect<N>; 4] {
        let mid_x = self.min_x + self.width().half();
        let mid_y = self.min_y + self.height().half();

        [
            Self::new(self.min_x, self.min_y, mid_x, mid_y),
            Self::new(mid_x, self.min_y, self.max_x, mid_y),
            Self::new(self.min_x, mid_y, mid_x, self.max_y),
            Self::new(mid_x, mid_y, self.max_x, self.max_y),
        ]
    }
}

fn checked_add<N: IndexableNum>(v: N, d: N) -> Option<N> {
    if (d >= N::zero() && v > N::max_value() - d) || (d < N::zero() && v < N::min_value() - d) {
        None
    } else {
        Some(v + d)
    }
}

fn saturating_add<N: IndexableNum>(v: N, d: N) -> N {
    checked_add(v, d).unwrap_or_else(|| {
        if d >= N::zero() {
            N::max_value()
        } else {
            N::min_value()
        }
    })
}

/// A single coordinate.
///
/// Used in the implementation of RectTrait for Rect.
#[derive(Debug, Clone, Copy)]
pub struct Coord<N: IndexableNum> {
    x: N,
    y: N,
}

impl<N: IndexableNum> CoordTrait for Coord<N> {
    type T = N;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

impl<N: IndexableNum> GeometryTrait for Rect<N> {
    type T = N;
    type PointType<'b>
        = UnimplementedPoint<N>
    where
        Self: 'b;
    type LineStringType<'b>
        = UnimplementedLineString<N>
    where
        Self: 'b;
    type PolygonType<'b>
        = UnimplementedPolygon<N>
    where
        Self: 'b;
    type MultiPointType<'b>
        = UnimplementedMultiPoint<N>
    where
        Self: 'b;
    type MultiLineStringType<'b>
        = UnimplementedMultiLineString<N>
    where
        Self: 'b;
    type MultiPolygonType<'b>
        = UnimplementedMultiPolygon<N>
    where
        Self: 'b;
    type GeometryCollectionType<'b>
        = UnimplementedGeometryCollection<N>
    where
        Self: 'b;
    type RectType<'b>
        = Rect<N>
    where
        Self: 'b;
    type TriangleType<'b>
        = UnimplementedTriangle<N>
    where
        Self: 'b;
    type LineType<'b>
        = UnimplementedLine<N>
    where
        Self: 'b;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<N>,
        UnimplementedLineString<N>,
        UnimplementedPolygon<N>,
        UnimplementedMultiPoint<N>,
        UnimplementedMultiLineString<N>,
        UnimplementedMultiPolygon<N>,
        UnimplementedGeometryCollection<N>,
        Rect<N>,
        UnimplementedTriangle<N>,
        UnimplementedLine<N>,
    > {
        GeometryType::Rect(self)
    }
}

impl<N: IndexableNum> RectTrait for Rect<N> {
    type CoordType<'a>
        = Coord<N>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.min_x,
            y: self.min_y,
        }
    }

    fn max(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.max_x,
            y: self.max_y,
        }
    }
}
