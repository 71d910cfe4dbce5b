//! Axial hex coordinate arithmetic.
//!
//! Positions are axial `(q, r)` pairs with an implicit third axis
//! `s = -q - r`. All adjacency and slide reasoning in the engine is built
//! from the six unit offsets and the two 60° rotation operators defined
//! here. Every function is total and side-effect free.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// An axial hex position. Unbounded; equality is structural.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub q: i64,
    pub r: i64,
}

/// The six unit offsets to a hex's neighbors, in clockwise order starting
/// from east. The slide "freedom to move" gate depends on rotations mapping
/// each offset onto the next, so the order here is load-bearing.
pub const ADJACENT_OFFSETS: [Coordinate; 6] = [
    Coordinate { q: 1, r: 0 },
    Coordinate { q: 1, r: -1 },
    Coordinate { q: 0, r: -1 },
    Coordinate { q: -1, r: 0 },
    Coordinate { q: -1, r: 1 },
    Coordinate { q: 0, r: 1 },
];

impl Coordinate {
    #[inline]
    pub const fn new(q: i64, r: i64) -> Self {
        Coordinate { q, r }
    }

    /// The six neighboring positions.
    #[inline]
    pub fn adjacent(&self) -> [Coordinate; 6] {
        ADJACENT_OFFSETS.map(|offset| *self + offset)
    }

    /// Rotate this vector 60° clockwise about the origin:
    /// `(q, r) → (q + r, -q)`.
    #[inline]
    pub const fn rotate_cw(&self) -> Coordinate {
        Coordinate {
            q: self.q + self.r,
            r: -self.q,
        }
    }

    /// Rotate this vector 300° clockwise (60° counter-clockwise) about the
    /// origin: `(q, r) → (-r, q + r)`.
    #[inline]
    pub const fn rotate_ccw(&self) -> Coordinate {
        Coordinate {
            q: -self.r,
            r: self.q + self.r,
        }
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn add(self, other: Coordinate) -> Coordinate {
        Coordinate {
            q: self.q + other.q,
            r: self.r + other.r,
        }
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn sub(self, other: Coordinate) -> Coordinate {
        Coordinate {
            q: self.q - other.q,
            r: self.r - other.r,
        }
    }
}

impl Mul<i64> for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn mul(self, scalar: i64) -> Coordinate {
        Coordinate {
            q: self.q * scalar,
            r: self.r * scalar,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
