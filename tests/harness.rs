//! Accuracy and timing tests for the error/timing harness.
//!
//! These exercise whole invocations: fill, timed arithmetic, reference
//! product, validity checks and averaging.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use approx::assert_relative_eq;
use ndarray::Array2;
use positbench::scalar::{self, Scalar};
use positbench::{ConfigError, Harness, HarnessError, Operands, Posit16, Posit32, Shape};
use tracing_subscriber::fmt::MakeWriter;

fn square(n: usize) -> Shape {
    Shape::new(n, n).unwrap()
}

fn harness(repetitions: usize) -> Harness<Posit32, f32> {
    Harness::try_new(repetitions).unwrap()
}

/// Formatted log output kept in memory.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        (capture, tracing::subscriber::set_default(subscriber))
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Product of two constant matrices must be `a * b * cols` everywhere.
fn check_constant_product<T: Scalar>(shape: Shape, a: f64, b: f64, max_relative: f64) {
    let lhs: Array2<T> = scalar::filled(shape, a);
    let rhs: Array2<T> = scalar::filled(shape, b);
    let product = lhs.dot(&rhs);
    let expected = a * b * shape.cols() as f64;

    assert_eq!(product.dim(), shape.dim());
    for &value in product.iter() {
        assert_relative_eq!(value.to_f64(), expected, max_relative = max_relative);
    }
}

#[test]
fn test_constant_product_every_representation() {
    let shapes = [square(1), square(7), square(10), square(50)];

    for shape in shapes {
        println!("Testing constant product at {shape}");
        check_constant_product::<f64>(shape, 1.00001, 0.99999, 1e-12);
        check_constant_product::<f32>(shape, 1.00001, 0.99999, 1e-5);
        check_constant_product::<Posit32>(shape, 1.00001, 0.99999, 1e-6);
        check_constant_product::<Posit16>(shape, 1.0, 2.0, 1e-3);
        check_constant_product::<Posit32>(shape, 1e-5, 2e-5, 1e-4);
    }
}

#[test]
fn test_exact_regime_has_zero_error() {
    for n in [10, 20, 50] {
        let m = harness(2).run(square(n), 1.0, 2.0).unwrap();
        println!("{n}x{n}: {m:?}");

        assert_eq!(m.narrow_error, 0.0, "posit product of 1*2*{n} is exact");
        assert_eq!(m.native_error, 0.0, "f32 product of 1*2*{n} is exact");
    }
}

#[test]
fn test_errors_are_non_negative() {
    let regimes = [(1.0, 2.0), (1.00001, 0.99999), (1e-5, 2e-5), (1e4, 1e4)];

    for (a, b) in regimes {
        let m = harness(1).run(square(20), a, b).unwrap();
        assert!(m.narrow_error >= 0.0 && m.narrow_error.is_finite());
        assert!(m.native_error >= 0.0 && m.native_error.is_finite());
    }
}

#[test]
fn test_small_differences_errors_match() {
    // Both formats round 1.00001 * 0.99999 to exactly 1.0, so the whole
    // deviation comes from the reference product.
    let m = harness(2).run(square(10), 1.00001, 0.99999).unwrap();
    println!(
        "posit MAE: {:.3e}, float MAE: {:.3e}",
        m.narrow_error, m.native_error
    );

    assert!(m.native_error > 0.0);
    assert_relative_eq!(m.narrow_error, m.native_error, max_relative = 1e-9);
}

#[test]
fn test_overflow_regime_posit_worse_than_float() {
    let m = harness(2).run(square(10), 1e4, 1e4).unwrap();
    println!(
        "posit MAE: {:.3e}, float MAE: {:.3e}",
        m.narrow_error, m.native_error
    );

    assert!(
        m.narrow_error > m.native_error,
        "posit32 has fewer fraction bits than f32 around 1e9: posit={}, float={}",
        m.narrow_error,
        m.native_error
    );
}

#[test]
fn test_overflow_error_grows_with_size() {
    let errors: Vec<_> = (10..=50)
        .step_by(10)
        .map(|n| (n, harness(1).run(square(n), 1e4, 1e4).unwrap().narrow_error))
        .collect();
    println!("posit MAE by size: {errors:?}");

    for pair in errors.windows(2) {
        let ((small, e_small), (large, e_large)) = (pair[0], pair[1]);
        assert!(
            e_large >= e_small,
            "{small}x{small}: {e_small}, {large}x{large}: {e_large}"
        );
    }
    assert!(errors[4].1 > errors[0].1, "50x50 must be worse than 10x10");
}

#[test]
fn test_averaging_deterministic_inputs() {
    let shape = square(20);
    let once = harness(1).run(shape, 1.00001, 0.99999).unwrap();
    let many = harness(4).run(shape, 1.00001, 0.99999).unwrap();

    assert_relative_eq!(once.narrow_error, many.narrow_error, max_relative = 1e-12);
    assert_relative_eq!(once.native_error, many.native_error, max_relative = 1e-12);
}

#[test]
fn test_mean_times_are_positive() {
    let m = harness(3).run(square(30), 1.0, 2.0).unwrap();

    assert_eq!(m.shape, square(30));
    assert!(m.narrow_time > Duration::ZERO);
    assert!(m.native_time > Duration::ZERO);
}

#[test]
fn test_nar_input_aborts() {
    let (logs, _guard) = LogCapture::install();
    let shape = square(10);
    let mut operands = Operands::<Posit32, f32>::filled(shape, 1.0, 2.0);
    operands.narrow_mut().b[[3, 4]] = Posit32::NAR;

    let result = harness(2).measure(&operands);

    assert_eq!(
        result,
        Err(HarnessError::NonFiniteInput { rows: 10, cols: 10 })
    );
    let logs = logs.contents();
    assert!(logs.contains("narrow-format input matrices are invalid"), "{logs}");
    assert!(logs.contains("10x10"), "{logs}");
}

#[test]
fn test_nan_fill_aborts() {
    // Both the f32 product and the posit inputs are non-finite; the float
    // product is checked first.
    let (logs, _guard) = LogCapture::install();
    let result = harness(2).run(square(10), f64::NAN, 1.0);

    assert_eq!(
        result,
        Err(HarnessError::NonFiniteResult { rows: 10, cols: 10 })
    );
    let logs = logs.contents();
    assert!(logs.contains("float result has NaN or Inf"), "{logs}");
    assert!(!logs.contains("input matrices are invalid"), "{logs}");
}

#[test]
fn test_non_square_shape_rejected() {
    assert_eq!(
        Shape::new(3, 4).unwrap_err(),
        ConfigError::NonSquare { rows: 3, cols: 4 }
    );

    // Every shape the harness can be handed multiplies cleanly.
    let m = harness(1).run(Shape::new(3, 3).unwrap(), 1.0, 2.0).unwrap();
    assert_eq!(m.shape.dim(), (3, 3));
    assert_eq!(m.narrow_error, 0.0);
}

#[test]
fn test_float_overflow_aborts() {
    // 1e20 * 1e20 overflows f32 while the posit product saturates.
    let result = harness(1).run(square(4), 1e20, 1e20);

    assert_eq!(
        result,
        Err(HarnessError::NonFiniteResult { rows: 4, cols: 4 })
    );
}

#[test]
fn test_posit16_harness() {
    let harness = Harness::<Posit16, f32>::try_new(2).unwrap();
    let exact = harness.run(square(10), 1.0, 2.0).unwrap();
    assert_eq!(exact.narrow_error, 0.0);

    let coarse = harness.run(square(10), 1.00001, 0.99999).unwrap();
    assert!(coarse.narrow_error >= coarse.native_error);
}
