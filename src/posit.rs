//! Posit element types for `ndarray` matrices.
//!
//! The arithmetic comes from `fast_posit`. These newtypes only add what
//! `ndarray` and the harness need on top of it: `num` zero/one identities and
//! the [`Scalar`] capability set.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use fast_posit::{p16, p32, RoundFrom};
use num::{One, Zero};

use crate::scalar::Scalar;

macro_rules! posit_scalar {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $label:literal, $fraction_bits:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name($inner);

        impl $name {
            /// Not-a-Real, the single non-finite posit value.
            pub const NAR: Self = Self(<$inner>::NAR);

            /// Fraction bits available at magnitude 1.0.
            pub const FRACTION_BITS: u32 = $fraction_bits;

            pub const fn new(inner: $inner) -> Self {
                Self(inner)
            }

            pub const fn into_inner(self) -> $inner {
                self.0
            }

            pub fn is_nar(self) -> bool {
                self.0 == <$inner>::NAR
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self(self.0 * rhs.0)
            }
        }

        impl Div for $name {
            type Output = Self;

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                Self(self.0 / rhs.0)
            }
        }

        impl Zero for $name {
            fn zero() -> Self {
                Self(<$inner>::ZERO)
            }

            fn is_zero(&self) -> bool {
                self.0 == <$inner>::ZERO
            }
        }

        impl One for $name {
            fn one() -> Self {
                Self(<$inner>::ONE)
            }
        }

        impl Scalar for $name {
            const NAME: &'static str = $label;

            fn from_f64(value: f64) -> Self {
                Self(<$inner>::round_from(value))
            }

            fn to_f64(self) -> f64 {
                f64::round_from(self.0)
            }

            fn is_finite(self) -> bool {
                !self.is_nar()
            }

            fn epsilon() -> Self {
                Self::from_f64((-f64::from(Self::FRACTION_BITS)).exp2())
            }

            fn digits10() -> u32 {
                (f64::from(Self::FRACTION_BITS) * std::f64::consts::LOG10_2) as u32
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_nar() {
                    write!(f, "{}(NaR)", $label)
                } else {
                    write!(f, "{}({})", $label, f64::round_from(self.0))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_nar() {
                    write!(f, "NaR")
                } else {
                    fmt::Display::fmt(&f64::round_from(self.0), f)
                }
            }
        }
    };
}

posit_scalar!(
    /// Standard 32-bit posit with two exponent bits.
    Posit32,
    p32,
    "posit32",
    27
);

posit_scalar!(
    /// Standard 16-bit posit with two exponent bits.
    Posit16,
    p16,
    "posit16",
    11
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert_eq!(Posit32::zero().to_f64(), 0.0);
        assert_eq!(Posit32::one().to_f64(), 1.0);
        assert!(Posit16::zero().is_zero());
        assert!(!Posit16::one().is_zero());
    }

    #[test]
    fn test_exact_arithmetic() {
        let a = Posit32::from_f64(1.0);
        let b = Posit32::from_f64(2.0);
        assert_eq!((a + b).to_f64(), 3.0);
        assert_eq!((a - b).to_f64(), -1.0);
        assert_eq!((a * b).to_f64(), 2.0);
        assert_eq!((b / b).to_f64(), 1.0);
    }

    #[test]
    fn test_nar_is_not_finite() {
        assert!(!Posit32::NAR.is_finite());
        assert!(!Posit16::NAR.is_finite());
        assert!(Posit32::from_f64(1e30).is_finite());
        assert!(Posit32::NAR.is_nar());
        assert!(!Posit32::zero().is_nar());
        assert!(!Posit16::from_f64(-3.5).is_nar());
        assert_eq!(format!("{:?}", Posit32::NAR), "posit32(NaR)");
        assert_eq!(Posit16::NAR.to_string(), "NaR");
    }

    #[test]
    fn test_epsilon_and_digits() {
        assert_eq!(Posit32::epsilon().to_f64(), 2f64.powi(-27));
        assert_eq!(Posit16::epsilon().to_f64(), 2f64.powi(-11));
        assert_eq!(Posit32::digits10(), 8);
        assert_eq!(Posit16::digits10(), 3);

        let one = Posit32::one();
        assert!(one + Posit32::epsilon() > one);
    }

    #[test]
    fn test_tapered_precision() {
        // Near 1.0 posit32 carries 27 fraction bits against 23 for f32.
        let value = 1.0 + 2f64.powi(-25);
        assert_eq!(Posit32::from_f64(value).to_f64(), value);
        assert_ne!(f32::from_f64(value).to_f64(), value);

        // Far from 1.0 the regime eats fraction bits and f32 wins.
        let value = 1e9 + 64.0;
        assert_ne!(Posit32::from_f64(value).to_f64(), value);
        assert_eq!(f32::from_f64(value).to_f64(), value);
    }
}
