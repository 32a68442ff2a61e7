// src/mc/shape.rs
//! Typed sample-shape descriptor
//!
//! Sample batches are dense arrays with a fixed axis order:
//!
//! ```text
//! terminal:   (draw, repeat, parameter set)
//! trajectory: (draw, time, repeat, parameter set)
//! ```
//!
//! Axis 0 (`draw`) is averaged into one expectation estimate. `repeat` indexes
//! independent estimates of the same expectation, used to measure the
//! estimator's own variance. `parameter set` indexes distinct
//! [`ModelParameters`] priced together. Optional axes have length 1 when absent.

use crate::error::{validation::*, SdeError, SdeResult};
use crate::params::ModelParameters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleShape {
    /// Independent draws averaged into one estimate (before antithetic doubling)
    pub inner_draws: usize,
    /// Number of time steps after t = 0; `None` for terminal-only sampling
    pub time_steps: Option<usize>,
    /// Independent repetitions of the whole estimate
    pub outer_repeats: Option<usize>,
    /// Number of parameter records priced at once
    pub parameter_sets: Option<usize>,
}

impl SampleShape {
    pub fn terminal(inner_draws: usize) -> Self {
        SampleShape {
            inner_draws,
            time_steps: None,
            outer_repeats: None,
            parameter_sets: None,
        }
    }

    pub fn trajectory(inner_draws: usize, time_steps: usize) -> Self {
        SampleShape {
            time_steps: Some(time_steps),
            ..Self::terminal(inner_draws)
        }
    }

    pub fn with_repeats(self, outer_repeats: usize) -> Self {
        SampleShape {
            outer_repeats: Some(outer_repeats),
            ..self
        }
    }

    pub fn with_parameter_sets(self, parameter_sets: usize) -> Self {
        SampleShape {
            parameter_sets: Some(parameter_sets),
            ..self
        }
    }

    pub fn repeats(&self) -> usize {
        self.outer_repeats.unwrap_or(1)
    }

    pub fn sets(&self) -> usize {
        self.parameter_sets.unwrap_or(1)
    }

    /// Dense (draw, repeat, set) dimensions of the raw normals for terminal sampling.
    pub fn terminal_dim(&self) -> (usize, usize, usize) {
        (self.inner_draws, self.repeats(), self.sets())
    }

    /// Dense (draw, step, repeat, set) dimensions of the raw normals for trajectory sampling.
    pub fn trajectory_dim(&self) -> SdeResult<(usize, usize, usize, usize)> {
        let steps = self.time_steps.ok_or_else(|| SdeError::InvalidConfiguration {
            field: "time_steps".to_string(),
            reason: "trajectory sampling needs a time axis".to_string(),
        })?;
        Ok((self.inner_draws, steps, self.repeats(), self.sets()))
    }

    /// Check the shape against the parameter records it will be used with.
    ///
    /// Without an explicit `parameter_sets` exactly one record is expected.
    pub fn validate(&self, params: &[ModelParameters]) -> SdeResult<()> {
        validate_paths(self.inner_draws)?;
        if let Some(steps) = self.time_steps {
            validate_steps(steps)?;
        }
        if self.outer_repeats == Some(0) {
            return Err(SdeError::InvalidConfiguration {
                field: "outer_repeats".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if params.len() != self.sets() {
            return Err(SdeError::DimensionMismatch {
                axis: "parameter-set",
                expected: self.sets(),
                found: params.len(),
            });
        }
        Ok(())
    }

    /// Fail unless the shape has no time axis.
    pub fn require_terminal(&self) -> SdeResult<()> {
        match self.time_steps {
            None => Ok(()),
            Some(_) => Err(SdeError::InvalidConfiguration {
                field: "time_steps".to_string(),
                reason: "terminal sampling takes no time axis".to_string(),
            }),
        }
    }
}
