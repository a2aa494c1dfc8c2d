//! Minimal vector and affine-matrix types for LDraw coordinates.
//!
//! LDraw stores a reference transform as twelve numbers `x y z a b c d e f g h i`,
//! which map onto the row-major matrix
//!
//! ```text
//! | a b c x |
//! | d e f y |
//! | g h i z |
//! | 0 0 0 1 |
//! ```

use std::ops::Mul;

/// Tolerance used when comparing coordinates.
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True if both points are within [`EPSILON`] of each other on every axis.
    pub fn approx_eq(self, other: Vector3) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }
}

/// A 4×4 affine transform, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    pub rows: [[f64; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Build a transform from the twelve numbers of an LDraw type-1 line.
    pub fn from_ldraw(values: [f64; 12]) -> Self {
        let [x, y, z, a, b, c, d, e, f, g, h, i] = values;
        Self {
            rows: [
                [a, b, c, x],
                [d, e, f, y],
                [g, h, i, z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// The twelve numbers of an LDraw type-1 line, in file order.
    pub fn to_ldraw(&self) -> [f64; 12] {
        let r = &self.rows;
        [
            r[0][3], r[1][3], r[2][3], r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2],
            r[2][0], r[2][1], r[2][2],
        ]
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[0][3] = x;
        m.rows[1][3] = y;
        m.rows[2][3] = z;
        m
    }

    pub fn is_identity(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(Self::IDENTITY.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() < EPSILON)
    }

    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let r = &self.rows;
        Vector3::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2] * p.z + r[0][3],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2] * p.z + r[1][3],
            r[2][0] * p.x + r[2][1] * p.y + r[2][2] * p.z + r[2][3],
        )
    }

    /// Determinant of the upper-left 3×3 block.
    pub fn determinant(&self) -> f64 {
        let r = &self.rows;
        r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
            - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
            + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0])
    }

    pub fn is_singular(&self) -> bool {
        self.determinant().abs() < EPSILON
    }

    /// A negative determinant mirrors geometry and flips winding.
    pub fn is_mirroring(&self) -> bool {
        self.determinant() < 0.0
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Matrix4 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ldraw_round_trip() {
        let values = [1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0];
        assert_eq!(Matrix4::from_ldraw(values).to_ldraw(), values);
    }

    #[test]
    fn test_compose_applies_right_hand_side_first() {
        let outer = Matrix4::translation(10.0, 0.0, 0.0);
        let inner = Matrix4::from_ldraw([0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0]);
        let p = (outer * inner).transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert!(p.approx_eq(Vector3::new(10.0, 0.0, -1.0)));
    }

    #[test]
    fn test_singular_and_mirroring() {
        let flat = Matrix4::from_ldraw([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(flat.is_singular());
        let mirror = Matrix4::from_ldraw([0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(mirror.is_mirroring());
        assert!(!Matrix4::IDENTITY.is_mirroring());
    }
}
