//! Timing and accuracy of posit vs IEEE `f32` matrix arithmetic, measured
//! against an `f64` reference.

pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod platform;
pub mod posit;
pub mod report;
pub mod scalar;
pub mod sweep;

pub use config::{NarrowFormat, Regime, Shape, SweepConfig};
pub use error::{BenchError, ConfigError, HarnessError, Result};
pub use harness::{Harness, Measurement, Operands};
pub use posit::{Posit16, Posit32};
pub use scalar::Scalar;
pub use sweep::{Outcome, Sweep};

/// High-precision representation used as ground truth. Never timed.
pub type Reference = f64;
