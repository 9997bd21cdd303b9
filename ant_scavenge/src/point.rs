use crate::error::ScavengeError;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A coordinate on the board.
///
/// Supports componentwise arithmetic against another point, a `(x, y)` tuple or a scalar
/// which is applied to both components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// The absolute distance to `other` along each axis.
    pub fn abs_dist(&self, other: impl Into<Point>) -> (i32, i32) {
        let other = other.into();
        ((self.x - other.x).abs(), (self.y - other.y).abs())
    }

    /// The largest of the two axis distances, i.e. the number of king moves between the points.
    pub fn chebyshev(&self, other: impl Into<Point>) -> i32 {
        let (dx, dy) = self.abs_dist(other);
        dx.max(dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Point {
        Point { x, y }
    }
}

impl From<Point> for (i32, i32) {
    fn from(point: Point) -> (i32, i32) {
        (point.x, point.y)
    }
}

impl TryFrom<&[i32]> for Point {
    type Error = ScavengeError;

    fn try_from(values: &[i32]) -> Result<Point, Self::Error> {
        match values {
            [x, y] => Ok(Point::new(*x, *y)),
            _ => Err(ScavengeError::PointArity(values.len())),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<Point> for Point {
            type Output = Point;

            fn $method(self, other: Point) -> Point {
                Point::new(self.x $op other.x, self.y $op other.y)
            }
        }

        impl $trait<(i32, i32)> for Point {
            type Output = Point;

            fn $method(self, (x, y): (i32, i32)) -> Point {
                Point::new(self.x $op x, self.y $op y)
            }
        }

        impl $trait<i32> for Point {
            type Output = Point;

            fn $method(self, scalar: i32) -> Point {
                Point::new(self.x $op scalar, self.y $op scalar)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);
componentwise!(Mul, mul, *);
