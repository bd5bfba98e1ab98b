//! Error/timing harness.
//!
//! One invocation builds two same-shaped matrices in each of three
//! representations: a narrow format `N`, a native float `F` and the `f64`
//! reference. Each repetition then:
//!
//! 1. times `a * b`, `a + b` and `a - b` on the narrow matrices,
//! 2. times the same sequence on the native matrices,
//! 3. computes the reference product (never timed),
//! 4. checks the native product, then the narrow inputs, for non-finite values,
//! 5. accumulates the mean absolute error of both products vs the reference.
//!
//! Sums and differences are never read; they go through
//! [`std::hint::black_box`] so the optimizer cannot drop them from the timed
//! region. Error computation stays outside the timed region.

use std::hint::black_box;
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use ndarray::Array2;
use tracing::{debug, warn};

use crate::config::Shape;
use crate::error::{self, ConfigError, HarnessError};
use crate::scalar::{self, Scalar};
use crate::Reference;

/// A pair of operand matrices in one representation.
#[derive(Debug, Clone)]
pub struct Pair<T> {
    pub a: Array2<T>,
    pub b: Array2<T>,
}

impl<T: Scalar> Pair<T> {
    fn filled(shape: Shape, a: f64, b: f64) -> Self {
        Self {
            a: scalar::filled(shape, a),
            b: scalar::filled(shape, b),
        }
    }

    fn all_finite(&self) -> bool {
        scalar::all_finite(&self.a) && scalar::all_finite(&self.b)
    }

    fn product(&self) -> Array2<T> {
        self.a.dot(&self.b)
    }
}

/// All six input matrices of one invocation.
#[derive(Debug, Clone)]
pub struct Operands<N, F> {
    shape: Shape,
    narrow: Pair<N>,
    native: Pair<F>,
    reference: Pair<Reference>,
}

impl<N: Scalar, F: Scalar> Operands<N, F> {
    /// Fills the first matrix of every pair with `a` and the second with `b`.
    ///
    /// Each representation rounds the `f64` fill values on its own.
    pub fn filled(shape: Shape, a: f64, b: f64) -> Self {
        Self {
            shape,
            narrow: Pair::filled(shape, a, b),
            native: Pair::filled(shape, a, b),
            reference: Pair::filled(shape, a, b),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn narrow(&self) -> &Pair<N> {
        &self.narrow
    }

    /// Mutable access to the narrow inputs, e.g. to plant a NaR.
    pub fn narrow_mut(&mut self) -> &mut Pair<N> {
        &mut self.narrow
    }

    pub fn native(&self) -> &Pair<F> {
        &self.native
    }

    pub fn reference(&self) -> &Pair<Reference> {
        &self.reference
    }
}

/// Per-invocation means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub shape: Shape,
    /// Mean wall time of the narrow-format arithmetic sequence.
    pub narrow_time: Duration,
    /// Mean wall time of the native-float arithmetic sequence.
    pub native_time: Duration,
    /// Mean absolute error of the narrow-format product.
    pub narrow_error: f64,
    /// Mean absolute error of the native-float product.
    pub native_error: f64,
}

/// Times `a * b`, `a + b` and `a - b` and returns the product.
fn timed_workload<T: Scalar>(pair: &Pair<T>) -> (Array2<T>, Duration) {
    let start = Instant::now();
    let product = pair.product();
    let retained = black_box((&pair.a + &pair.b, &pair.a - &pair.b));
    let elapsed = start.elapsed();

    drop(retained);
    (product, elapsed)
}

/// Runs the comparison of narrow format `N` against native float `F`.
#[derive(Debug, Clone, Copy)]
pub struct Harness<N, F> {
    repetitions: NonZeroUsize,
    _formats: PhantomData<fn() -> (N, F)>,
}

impl<N: Scalar, F: Scalar> Harness<N, F> {
    pub fn new(repetitions: NonZeroUsize) -> Self {
        Self {
            repetitions,
            _formats: PhantomData,
        }
    }

    /// Like [`Harness::new`], rejecting a zero repetition count.
    pub fn try_new(repetitions: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(repetitions)
            .map(Self::new)
            .ok_or(ConfigError::ZeroRepetitions)
    }

    pub fn repetitions(&self) -> NonZeroUsize {
        self.repetitions
    }

    /// Fills fresh operands with `a` and `b` and measures them.
    pub fn run(&self, shape: Shape, a: f64, b: f64) -> Result<Measurement, HarnessError> {
        self.measure(&Operands::filled(shape, a, b))
    }

    /// Measures prepared operands.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::NonFiniteResult`] if the native product holds a
    /// non-finite value and [`HarnessError::NonFiniteInput`] if a narrow input
    /// does. The native product is checked first. Nothing is measured in
    /// either case.
    pub fn measure(&self, operands: &Operands<N, F>) -> Result<Measurement, HarnessError> {
        let shape = operands.shape();

        let mut narrow_elapsed = Duration::ZERO;
        let mut native_elapsed = Duration::ZERO;
        let mut narrow_error = 0.0;
        let mut native_error = 0.0;

        for repetition in 0..self.repetitions.get() {
            let (narrow_product, elapsed) = timed_workload(operands.narrow());
            narrow_elapsed += elapsed;

            let (native_product, elapsed) = timed_workload(operands.native());
            native_elapsed += elapsed;

            let reference = operands.reference().product();

            if !scalar::all_finite(&native_product) {
                warn!(%shape, format = F::NAME, "float result has NaN or Inf");
                return Err(error::non_finite_result(shape));
            }
            if !operands.narrow().all_finite() {
                warn!(%shape, format = N::NAME, "narrow-format input matrices are invalid");
                return Err(error::non_finite_input(shape));
            }

            let narrow_mae =
                scalar::mean_absolute_error(&scalar::to_reference(&narrow_product), &reference);
            let native_mae =
                scalar::mean_absolute_error(&scalar::to_reference(&native_product), &reference);
            debug!(%shape, repetition, narrow_mae, native_mae, "repetition done");

            narrow_error += narrow_mae;
            native_error += native_mae;
        }

        let n = self.repetitions.get() as f64;
        Ok(Measurement {
            shape,
            narrow_time: narrow_elapsed.div_f64(n),
            native_time: native_elapsed.div_f64(n),
            narrow_error: narrow_error / n,
            native_error: native_error / n,
        })
    }
}
