//! The scalar capability set shared by every numeric representation.
//!
//! A type usable by the harness must behave like a built-in number inside
//! `ndarray`: the [`LinalgScalar`] bound brings `+ - * /`, zero and one, which
//! is what `Array2::dot` and the elementwise operators need. [`Scalar`] adds
//! the conversions and the finiteness predicate the error metric relies on.

use std::fmt::Debug;

use ndarray::{Array2, LinalgScalar};

use crate::config::Shape;
use crate::Reference;

pub trait Scalar: LinalgScalar + Debug + PartialEq {
    /// Short name used in reports, e.g. `"f32"`.
    const NAME: &'static str;

    /// Rounds a double-precision value into this representation.
    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;

    /// `false` for NaN, infinities, and posit NaR.
    fn is_finite(self) -> bool;

    /// Spacing between 1.0 and the next representable value.
    fn epsilon() -> Self;

    /// Decimal digits that survive a round trip through this representation.
    fn digits10() -> u32;
}

macro_rules! impl_ieee_scalar {
    ($t:ty, $name:literal) => {
        impl Scalar for $t {
            const NAME: &'static str = $name;

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            fn epsilon() -> Self {
                <$t>::EPSILON
            }

            fn digits10() -> u32 {
                <$t>::DIGITS
            }
        }
    };
}

impl_ieee_scalar!(f32, "f32");
impl_ieee_scalar!(f64, "f64");

/// A `shape` matrix with every element set to `value` rounded into `T`.
pub fn filled<T: Scalar>(shape: Shape, value: f64) -> Array2<T> {
    Array2::from_elem(shape.dim(), T::from_f64(value))
}

/// Whole-matrix finiteness check.
pub fn all_finite<T: Scalar>(matrix: &Array2<T>) -> bool {
    matrix.iter().all(|&x| x.is_finite())
}

/// Converts every element to the reference representation.
pub fn to_reference<T: Scalar>(matrix: &Array2<T>) -> Array2<Reference> {
    matrix.mapv(T::to_f64)
}

/// Mean over all elements of `|reference - approx|`.
pub fn mean_absolute_error(approx: &Array2<Reference>, reference: &Array2<Reference>) -> f64 {
    (reference - approx).mapv(f64::abs).mean().unwrap_or(0.0)
}
