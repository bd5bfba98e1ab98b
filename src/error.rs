//! Error types for positbench operations.
//!
//! Harness failures are local to a single benchmark invocation: the sweep
//! reports them and moves on. Configuration failures are rejected when the
//! configuration is built, so an invalid sweep never starts.

use thiserror::Error;

use crate::config::Shape;

/// Reasons a single benchmark invocation produced no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// The native-float product contains NaN or infinity.
    #[error("float result has NaN or Inf at size {rows}x{cols}")]
    NonFiniteResult {
        /// Rows of the offending matrices.
        rows: usize,
        /// Columns of the offending matrices.
        cols: usize,
    },
    /// One of the narrow-format input matrices contains a non-finite element.
    #[error("narrow-format input matrices are invalid at size {rows}x{cols}")]
    NonFiniteInput {
        /// Rows of the offending matrices.
        rows: usize,
        /// Columns of the offending matrices.
        cols: usize,
    },
}

impl HarnessError {
    /// Shape of the invocation that failed, as `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        match *self {
            HarnessError::NonFiniteResult { rows, cols }
            | HarnessError::NonFiniteInput { rows, cols } => (rows, cols),
        }
    }
}

/// Invalid sweep or harness parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("matrix shape must be non-empty, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("matrix shape must be square, got {rows}x{cols}")]
    NonSquare { rows: usize, cols: usize },
    #[error("repetition count must be positive")]
    ZeroRepetitions,
    #[error("sweep needs at least one matrix size")]
    EmptySizes,
    #[error("sweep needs at least one input regime")]
    EmptyRegimes,
}

/// Errors that stop a whole sweep.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for positbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Creates a non-finite result error for `shape`.
pub fn non_finite_result(shape: Shape) -> HarnessError {
    HarnessError::NonFiniteResult {
        rows: shape.rows(),
        cols: shape.cols(),
    }
}

/// Creates a non-finite input error for `shape`.
pub fn non_finite_input(shape: Shape) -> HarnessError {
    HarnessError::NonFiniteInput {
        rows: shape.rows(),
        cols: shape.cols(),
    }
}
