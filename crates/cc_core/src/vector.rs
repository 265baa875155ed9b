//! Integer and real 2D coordinates, each with a distinguished null sentinel.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Integer lattice coordinate. `(-1, -1)` is the reserved null sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2D {
    pub x: i64,
    pub y: i64,
}

/// Real-valued coordinate. `(-1.0, -1.0)` is the reserved null sentinel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DoubleVec2D {
    pub x: f64,
    pub y: f64,
}

impl Vec2D {
    pub const NULL: Vec2D = Vec2D { x: -1, y: -1 };

    pub const fn new(x: i64, y: i64) -> Self {
        Vec2D { x, y }
    }

    pub fn is_null(self) -> bool {
        self == Vec2D::NULL
    }

    pub fn to_double(self) -> DoubleVec2D {
        DoubleVec2D::new(self.x as f64, self.y as f64)
    }
}

impl Default for Vec2D {
    fn default() -> Self {
        Vec2D::new(0, 0)
    }
}

impl Add for Vec2D {
    type Output = Vec2D;
    fn add(self, rhs: Vec2D) -> Vec2D {
        Vec2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2D {
    type Output = Vec2D;
    fn sub(self, rhs: Vec2D) -> Vec2D {
        Vec2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl DoubleVec2D {
    pub const NULL: DoubleVec2D = DoubleVec2D { x: -1.0, y: -1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        DoubleVec2D { x, y }
    }

    pub fn is_null(self) -> bool {
        self == DoubleVec2D::NULL
    }

    /// Exact equality, matching the source's non-fuzzy `operator==`.
    pub fn eq_exact(self, other: DoubleVec2D) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn dot(self, rhs: DoubleVec2D) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: DoubleVec2D) -> f64 {
        (self - other).magnitude()
    }

    pub fn floor(self) -> DoubleVec2D {
        DoubleVec2D::new(self.x.floor(), self.y.floor())
    }

    pub fn ceil(self) -> DoubleVec2D {
        DoubleVec2D::new(self.x.ceil(), self.y.ceil())
    }

    /// Truncates to the containing integer lattice cell (source's `to_int`,
    /// used here only after an explicit `floor`/`ceil`, never directly on a
    /// fractional position).
    pub fn to_vec2d(self) -> Vec2D {
        Vec2D::new(self.x as i64, self.y as i64)
    }
}

impl Default for DoubleVec2D {
    fn default() -> Self {
        DoubleVec2D::new(0.0, 0.0)
    }
}

impl PartialEq for DoubleVec2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Exact bit-pattern equality, consistent with `PartialEq` for the
/// deterministic, NaN-free arithmetic this type is used for (path-graph
/// waypoints and actor positions derived from our own floor/ceil/interpolate
/// operations, never from arbitrary external doubles).
impl Eq for DoubleVec2D {}

impl std::hash::Hash for DoubleVec2D {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl Add for DoubleVec2D {
    type Output = DoubleVec2D;
    fn add(self, rhs: DoubleVec2D) -> DoubleVec2D {
        DoubleVec2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for DoubleVec2D {
    type Output = DoubleVec2D;
    fn sub(self, rhs: DoubleVec2D) -> DoubleVec2D {
        DoubleVec2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for DoubleVec2D {
    type Output = DoubleVec2D;
    fn mul(self, scalar: f64) -> DoubleVec2D {
        DoubleVec2D::new(self.x * scalar, self.y * scalar)
    }
}

impl From<Vec2D> for DoubleVec2D {
    fn from(v: Vec2D) -> Self {
        v.to_double()
    }
}
