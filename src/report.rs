//! Human-readable report blocks written to the sweep's sink.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::SweepConfig;
use crate::harness::Measurement;
use crate::scalar::Scalar;
use crate::Reference;

macro_rules! write_field {
    ($f:ident, $field:expr, $($expr:tt)*) => {
        writeln!($f, "\t {:>28}: {}", $field, $($expr)*)
    }
}

/// Duration in microseconds, with sub-microsecond digits.
pub fn micros(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000.0
}

/// Describes the sweep before any measurement is written.
pub struct Header<'a, N, F> {
    config: &'a SweepConfig,
    started: DateTime<Local>,
    _formats: std::marker::PhantomData<fn() -> (N, F)>,
}

impl<'a, N: Scalar, F: Scalar> Header<'a, N, F> {
    pub fn new(config: &'a SweepConfig, started: DateTime<Local>) -> Self {
        Self {
            config,
            started,
            _formats: std::marker::PhantomData,
        }
    }
}

impl<N: Scalar, F: Scalar> fmt::Display for Header<'_, N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}: {} vs {} (reference {})",
            env!("CARGO_PKG_NAME"),
            self.started.format("%Y-%m-%d %H:%M:%S"),
            N::NAME,
            F::NAME,
            Reference::NAME
        )?;
        write_field!(
            f,
            format!("{} epsilon", N::NAME),
            format!("{:e} ({} digits)", N::epsilon().to_f64(), N::digits10())
        )?;
        write_field!(
            f,
            format!("{} epsilon", F::NAME),
            format!("{:e} ({} digits)", F::epsilon().to_f64(), F::digits10())
        )?;
        write_field!(f, "repetitions", self.config.repetitions())?;
        write_field!(f, "combinations", self.config.combinations())
    }
}

/// One successful invocation, labelled with its regime.
pub struct Block<'a, N, F> {
    label: &'a str,
    measurement: &'a Measurement,
    _formats: std::marker::PhantomData<fn() -> (N, F)>,
}

impl<'a, N: Scalar, F: Scalar> Block<'a, N, F> {
    pub fn new(label: &'a str, measurement: &'a Measurement) -> Self {
        Self {
            label,
            measurement,
            _formats: std::marker::PhantomData,
        }
    }
}

impl<N: Scalar, F: Scalar> fmt::Display for Block<'_, N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.measurement;
        writeln!(
            f,
            "\t--------Matrix Size: {} ({})--------",
            m.shape, self.label
        )?;
        write_field!(
            f,
            format!("{} Time taken (us)", N::NAME),
            micros(m.narrow_time)
        )?;
        write_field!(
            f,
            format!("{} Time taken (us)", F::NAME),
            micros(m.native_time)
        )?;
        write_field!(
            f,
            format!("{} Mean Absolute Error", N::NAME),
            m.narrow_error
        )?;
        write_field!(
            f,
            format!("{} Mean Absolute Error", F::NAME),
            m.native_error
        )
    }
}
