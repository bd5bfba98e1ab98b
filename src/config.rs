//! Sweep configuration.
//!
//! Everything the sweep driver iterates over lives in [`SweepConfig`]: the
//! ordered matrix sizes, the repetition count and the ordered fill-value
//! regimes. Invalid values are rejected on construction.

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Dimensions of every matrix in one benchmark invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: NonZeroUsize,
    cols: NonZeroUsize,
}

impl Shape {
    /// Builds a shape, rejecting empty and non-square dimensions.
    ///
    /// Both operands share this shape and are multiplied with each other, so
    /// `rows` must equal `cols`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        match (NonZeroUsize::new(rows), NonZeroUsize::new(cols)) {
            (Some(r), Some(c)) if r == c => Ok(Self { rows: r, cols: c }),
            (Some(_), Some(_)) => Err(ConfigError::NonSquare { rows, cols }),
            _ => Err(ConfigError::ZeroDimension { rows, cols }),
        }
    }

    /// An `n x n` shape.
    pub const fn square(n: NonZeroUsize) -> Self {
        Self { rows: n, cols: n }
    }

    pub fn rows(&self) -> usize {
        self.rows.get()
    }

    pub fn cols(&self) -> usize {
        self.cols.get()
    }

    /// `(rows, cols)`, in the form `ndarray` expects.
    pub fn dim(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A labelled pair of fill values stressing one numeric behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct Regime {
    pub a: f64,
    pub b: f64,
    pub label: String,
}

impl Regime {
    pub fn new(a: f64, b: f64, label: impl Into<String>) -> Self {
        Self {
            a,
            b,
            label: label.into(),
        }
    }
}

/// Which narrow format the sweep compares against `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrowFormat {
    #[default]
    Posit32,
    Posit16,
}

impl fmt::Display for NarrowFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = match self {
            Self::Posit32 => "posit32",
            Self::Posit16 => "posit16",
        };
        write!(f, "{}", st)
    }
}

const DEFAULT_REPETITIONS: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// Parameters of a full sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    sizes: Vec<Shape>,
    repetitions: NonZeroUsize,
    regimes: Vec<Regime>,
    format: NarrowFormat,
}

impl SweepConfig {
    /// Builds a configuration, rejecting empty sequences and zero repetitions.
    pub fn new(
        sizes: Vec<Shape>,
        repetitions: usize,
        regimes: Vec<Regime>,
    ) -> Result<Self, ConfigError> {
        if sizes.is_empty() {
            return Err(ConfigError::EmptySizes);
        }
        if regimes.is_empty() {
            return Err(ConfigError::EmptyRegimes);
        }
        let repetitions = NonZeroUsize::new(repetitions).ok_or(ConfigError::ZeroRepetitions)?;

        Ok(Self {
            sizes,
            repetitions,
            regimes,
            format: NarrowFormat::default(),
        })
    }

    pub fn with_format(mut self, format: NarrowFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_repetitions(mut self, repetitions: usize) -> Result<Self, ConfigError> {
        self.repetitions = NonZeroUsize::new(repetitions).ok_or(ConfigError::ZeroRepetitions)?;
        Ok(self)
    }

    pub fn sizes(&self) -> &[Shape] {
        &self.sizes
    }

    pub fn repetitions(&self) -> NonZeroUsize {
        self.repetitions
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    pub fn format(&self) -> NarrowFormat {
        self.format
    }

    /// Number of harness invocations a sweep over this configuration makes.
    pub fn combinations(&self) -> usize {
        self.sizes.len() * self.regimes.len()
    }
}

impl Default for SweepConfig {
    /// Square matrices from 10x10 to 50x50 in steps of 10, five repetitions,
    /// and the baseline, small-differences, underflow and overflow regimes.
    fn default() -> Self {
        let sizes = (10..=50)
            .step_by(10)
            .filter_map(NonZeroUsize::new)
            .map(Shape::square)
            .collect();

        let regimes = vec![
            Regime::new(1.0, 2.0, "baseline"),
            Regime::new(1.00001, 0.99999, "small differences"),
            Regime::new(1e-5, 2e-5, "underflow"),
            Regime::new(1e4, 1e4, "overflow"),
        ];

        Self {
            sizes,
            repetitions: DEFAULT_REPETITIONS,
            regimes,
            format: NarrowFormat::default(),
        }
    }
}
