//! Minimal 3D vector used for state vectors (metres, metres per second).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Double-precision 3D vector. Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean norm.
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// Fails for zero-length (or non-finite) vectors instead of producing NaN.
    pub fn normalized(&self) -> Result<Vector3D, DomainError> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Err(DomainError::ZeroLengthVector);
        }
        Ok(*self * (1.0 / len))
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(v: [f64; 3]) -> Self {
        Vector3D::new(v[0], v[1], v[2])
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(v: Vector3D) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, s: f64) -> Vector3D {
        Vector3D::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, v: Vector3D) -> Vector3D {
        v * self
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {} Y: {} Z: {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3D, b: Vector3D, tol: f64) -> bool {
        (a - b).length() <= tol
    }

    fn samples() -> [Vector3D; 4] {
        [
            Vector3D::new(1.0, 2.0, 3.0),
            Vector3D::new(-4.5, 0.25, 7.0),
            Vector3D::new(1.496e11, -3.0e9, 12.0),
            Vector3D::new(0.0, -29_784.8, 1.0e-3),
        ]
    }

    #[test]
    fn cross_is_anti_commutative_and_dot_commutes() {
        for a in samples() {
            for b in samples() {
                assert_eq!(a.cross(&b), -b.cross(&a));
                assert_eq!(a.dot(&b), b.dot(&a));
            }
        }
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vector3D::new(1.0, 0.0, 0.0);
        let y = Vector3D::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3D::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn addition_is_associative() {
        let [a, b, c, _] = samples();
        let lhs = (a + b) + c;
        let rhs = a + (b + c);
        assert!(close(lhs, rhs, 1e-3), "{lhs} vs {rhs}");
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn scalar_multiply_commutes() {
        let v = Vector3D::new(1.5, -2.0, 0.5);
        assert_eq!(2.0 * v, v * 2.0);
        assert_eq!(v * 2.0, Vector3D::new(3.0, -4.0, 1.0));
    }

    #[test]
    fn normalized_has_unit_length() {
        for v in samples() {
            let n = v.normalized().expect("non-zero vector");
            assert!((n.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn normalizing_zero_vector_fails() {
        assert_eq!(Vector3D::ZERO.normalized(), Err(DomainError::ZeroLengthVector));
    }

    #[test]
    fn displays_labelled_components() {
        assert_eq!(Vector3D::new(1.0, -2.5, 0.0).to_string(), "X: 1 Y: -2.5 Z: 0");
    }

    #[test]
    fn serializes_as_array() {
        let v = Vector3D::new(1.0, -2.0, 3.5);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[1.0,-2.0,3.5]");
        let back: Vector3D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
