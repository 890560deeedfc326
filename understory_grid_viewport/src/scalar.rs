// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction for pixel sizes, positions, and scroll coordinates.
//!
//! Only implemented for `f32` and `f64`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Scalar type used for item sizes, pixel positions, and scroll coordinates.
///
/// Implemented for `f32` and `f64`. The trait is deliberately minimal and
/// geared toward floating-point coordinates.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity (typically `0.0`).
    fn zero() -> Self;

    /// Returns the maximum of `self` and `other`.
    fn max(self, other: Self) -> Self;

    /// Returns the minimum of `self` and `other`.
    fn min(self, other: Self) -> Self;

    /// Returns `true` if the value is finite (not NaN or infinite).
    fn is_finite(self) -> bool;

    /// Returns `true` if the value is negative, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// Constructs from a `usize` lossily.
    fn from_usize(value: usize) -> Self;

    /// Floors a non-negative value to an item count.
    ///
    /// Negative values and NaN map to `0`; values past `usize::MAX` saturate.
    fn floor_to_usize(self) -> usize;

    /// Clamps negative values to zero.
    fn clamp_non_negative(self) -> Self {
        if self.is_sign_negative() {
            Self::zero()
        } else {
            self
        }
    }

    /// Clamps `self` into `[lo, hi]`, preferring `lo` if the bounds cross.
    fn clamp_between(self, lo: Self, hi: Self) -> Self {
        self.min(hi).max(lo)
    }
}

impl Scalar for f32 {
    fn zero() -> Self {
        0.0
    }

    fn max(self, other: Self) -> Self {
        Self::max(self, other)
    }

    fn min(self, other: Self) -> Self {
        Self::min(self, other)
    }

    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    fn is_sign_negative(self) -> bool {
        Self::is_sign_negative(self)
    }

    fn from_usize(value: usize) -> Self {
        value as Self
    }

    fn floor_to_usize(self) -> usize {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float-to-int `as` casts saturate and map NaN to zero"
        )]
        let index = self as usize;
        index
    }
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn max(self, other: Self) -> Self {
        Self::max(self, other)
    }

    fn min(self, other: Self) -> Self {
        Self::min(self, other)
    }

    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    fn is_sign_negative(self) -> bool {
        Self::is_sign_negative(self)
    }

    fn from_usize(value: usize) -> Self {
        value as Self
    }

    fn floor_to_usize(self) -> usize {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float-to-int `as` casts saturate and map NaN to zero"
        )]
        let index = self as usize;
        index
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn floor_to_usize_saturates_at_zero() {
        assert_eq!(<f32 as Scalar>::floor_to_usize(-3.5), 0);
        assert_eq!(<f32 as Scalar>::floor_to_usize(f32::NAN), 0);
        assert_eq!(<f64 as Scalar>::floor_to_usize(9.99), 9);
    }

    #[test]
    fn clamp_between_prefers_lower_bound() {
        assert_eq!(Scalar::clamp_between(5.0_f32, 0.0, 10.0), 5.0);
        assert_eq!(Scalar::clamp_between(-1.0_f32, 0.0, 10.0), 0.0);
        assert_eq!(Scalar::clamp_between(12.0_f64, 0.0, 10.0), 10.0);
        // Crossed bounds collapse onto `lo`.
        assert_eq!(Scalar::clamp_between(3.0_f64, 4.0, 2.0), 4.0);
    }
}
