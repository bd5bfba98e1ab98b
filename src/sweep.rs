//! Sweep driver: one harness invocation per (size, regime) pair.

use std::io::Write;

use chrono::Local;
use tracing::{info, warn};

use crate::config::{NarrowFormat, Shape, SweepConfig};
use crate::error::{HarnessError, Result};
use crate::harness::{Harness, Measurement};
use crate::posit::{Posit16, Posit32};
use crate::report::{Block, Header};
use crate::scalar::Scalar;

/// Result of one (size, regime) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub shape: Shape,
    pub label: String,
    pub result: std::result::Result<Measurement, HarnessError>,
}

impl Outcome {
    pub fn measurement(&self) -> Option<&Measurement> {
        self.result.as_ref().ok()
    }
}

#[derive(Debug, Clone)]
pub struct Sweep {
    config: SweepConfig,
}

impl Sweep {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Runs the configured narrow format against `f32`.
    pub fn run<W: Write>(&self, sink: &mut W) -> Result<Vec<Outcome>> {
        match self.config.format() {
            NarrowFormat::Posit32 => self.run_with::<Posit32, f32, W>(sink),
            NarrowFormat::Posit16 => self.run_with::<Posit16, f32, W>(sink),
        }
    }

    /// Size-major sweep: every regime for one size before the next size.
    ///
    /// Successful invocations are written to `sink`; failed ones are logged
    /// and skipped. Either way each combination yields one [`Outcome`].
    ///
    /// # Errors
    ///
    /// Only a failed write to `sink` stops the sweep.
    pub fn run_with<N: Scalar, F: Scalar, W: Write>(&self, sink: &mut W) -> Result<Vec<Outcome>> {
        let config = &self.config;
        let harness = Harness::<N, F>::new(config.repetitions());

        info!(
            narrow = N::NAME,
            native = F::NAME,
            combinations = config.combinations(),
            "starting sweep"
        );
        write!(sink, "{}", Header::<N, F>::new(config, Local::now()))?;

        let mut outcomes = Vec::with_capacity(config.combinations());
        for &shape in config.sizes() {
            for regime in config.regimes() {
                let result = harness.run(shape, regime.a, regime.b);
                match &result {
                    Ok(measurement) => {
                        write!(sink, "{}", Block::<N, F>::new(&regime.label, measurement))?;
                    }
                    Err(err) => {
                        warn!(%shape, regime = %regime.label, %err, "invocation discarded");
                    }
                }
                outcomes.push(Outcome {
                    shape,
                    label: regime.label.clone(),
                    result,
                });
            }
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(total = outcomes.len(), failed, "sweep finished");
        Ok(outcomes)
    }
}
