// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 slot transform.

use core::ops::Mul;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Affine;

/// Perspective term used by the coverflow pipeline (eye at 500 points).
pub const COVERFLOW_PERSPECTIVE: f64 = -0.002;

/// A column-major 4×4 transform applied about a slot's center.
///
/// Each inner array is one column `[x, y, z, w]`. The matrix follows the
/// layout of Core Animation's `CATransform3D`, so a perspective term lives in
/// `cols[2][3]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns.
    pub cols: [[f64; 4]; 4],
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3d {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// A translation.
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[3] = [x, y, z, 1.0];
        t
    }

    /// A non-uniform scale.
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[0][0] = sx;
        t.cols[1][1] = sy;
        t.cols[2][2] = sz;
        t
    }

    /// A rotation about the Y axis (radians).
    #[must_use]
    pub fn from_rotation_y(radians: f64) -> Self {
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// A perspective projection with the given `m34` term.
    #[must_use]
    pub const fn from_perspective(m34: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[2][3] = m34;
        t
    }

    /// The perspective term.
    #[must_use]
    pub const fn m34(&self) -> f64 {
        self.cols[2][3]
    }

    /// The `(x, y, z)` translation part.
    #[must_use]
    pub const fn translation(&self) -> (f64, f64, f64) {
        let [x, y, z, _] = self.cols[3];
        (x, y, z)
    }

    /// Returns `true` if every element is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Returns `true` if this is exactly the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Projects onto the XY plane, dropping depth and perspective.
    ///
    /// This is what a 2D renderer can draw when it cannot apply the full matrix.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let [c0, c1, _, c3] = self.cols;
        Affine::new([c0[0], c0[1], c1[0], c1[1], c3[0], c3[1]])
    }
}

impl Mul for Transform3d {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (j, col) in rhs.cols.iter().enumerate() {
            for (i, cell) in out[j].iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][i] * col[k]).sum();
            }
        }
        Self { cols: out }
    }
}
