// src/mc/variance_reduction.rs
//! Variance Reduction Transforms
//!
//! # Antithetic Variates
//!
//! Each normal draw Z is paired with -Z. The pair's payoffs are negatively
//! correlated for monotone payoffs, so the doubled sample has lower estimator
//! variance than twice as many independent draws. Applied to the raw normals,
//! before the exponential map, so the symmetry is exact.
//!
//! # Moment Matching
//!
//! - Terminal sampling: the normals are rescaled along the draw axis to have
//!   empirical mean 0 and standard deviation 1 exactly:
//!   ```text
//!   z' = (z - mean(z)) / std(z)
//!   ```
//! - Trajectory sampling: the generated prices are rescaled at each time index so
//!   their cross-sectional mean equals E[S_t] exactly:
//!   ```text
//!   S_t' = S_t * S_0 e^(rt) / mean(S_t)
//!   ```
//!   Matching the normals of a path does not fix the mean of their exponential.
//!
//! Every statistic is taken over axis 0 only, separately for each combination
//! of the remaining axes.

use crate::error::{SdeError, SdeResult};
use crate::models::gbm::Gbm;
use crate::params::ModelParameters;
use bitflags::bitflags;
use ndarray::{concatenate, Array, Array4, ArrayViewMut1, Axis, Dimension, RemoveAxis};
use tracing::trace;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VarianceReduction: u32 {
        const NONE            = 0;
        const ANTITHETIC      = 1 << 0;
        const MOMENT_MATCHING = 1 << 1;
    }
}

impl Default for VarianceReduction {
    fn default() -> Self {
        VarianceReduction::NONE
    }
}

/// Concatenate `z` with its negation along axis 0, doubling that axis.
pub fn antithetic<D>(z: &Array<f64, D>) -> SdeResult<Array<f64, D>>
where
    D: Dimension + RemoveAxis,
{
    let negated = z.mapv(|x| -x);
    let paired = concatenate(Axis(0), &[z.view(), negated.view()])?;
    trace!(draws = paired.len_of(Axis(0)), "antithetic pairing applied");
    Ok(paired)
}

/// Center and scale every axis-0 lane of `z` to mean 0, standard deviation 1.
///
/// Uses the population standard deviation. Fails if any lane has zero spread,
/// which happens for a single draw without antithetic pairing.
pub fn moment_match_normals<D: Dimension>(z: &mut Array<f64, D>) -> SdeResult<()> {
    for mut lane in z.lanes_mut(Axis(0)) {
        let (mean, std) = lane_moments(&lane);
        if !(std > 0.0) || !std.is_finite() {
            return Err(SdeError::NumericalInstability {
                method: "Moment matching".to_string(),
                reason: format!(
                    "sample of {} normal draws has standard deviation {}",
                    lane.len(),
                    std
                ),
            });
        }
        lane.mapv_inplace(|x| (x - mean) / std);
    }
    trace!(lanes = z.len() / z.len_of(Axis(0)).max(1), "normals moment matched");
    Ok(())
}

/// Rescale trajectory prices so the cross-sectional mean at each time index
/// equals S_0 e^(r t_k), `t_k = k T / steps`.
///
/// `paths` has layout (draw, time, repeat, parameter set) with `steps + 1`
/// time indices; `params` has one record per parameter set.
pub fn moment_match_paths(paths: &mut Array4<f64>, params: &[ModelParameters]) -> SdeResult<()> {
    let (_, n_times, _, n_sets) = paths.dim();
    if params.len() != n_sets {
        return Err(SdeError::DimensionMismatch {
            axis: "parameter-set",
            expected: n_sets,
            found: params.len(),
        });
    }
    let steps = n_times.saturating_sub(1).max(1) as f64;

    for (mut set, p) in paths.axis_iter_mut(Axis(3)).zip(params) {
        let gbm = Gbm::from(p);
        let dt = p.t() / steps;
        for (k, mut slice) in set.axis_iter_mut(Axis(1)).enumerate() {
            // Time index 0 holds S_0 exactly and carries no randomness
            if k == 0 {
                continue;
            }
            let target = gbm.expected_value(dt * k as f64);
            for mut lane in slice.lanes_mut(Axis(0)) {
                let mean = lane.sum() / lane.len() as f64;
                if !(mean > 0.0) || !mean.is_finite() {
                    return Err(SdeError::NumericalInstability {
                        method: "Path moment matching".to_string(),
                        reason: format!("cross-sectional mean {} at time index {}", mean, k),
                    });
                }
                let scale = target / mean;
                lane.mapv_inplace(|s| s * scale);
            }
        }
    }
    trace!(time_indices = n_times, sets = n_sets, "paths moment matched");
    Ok(())
}

fn lane_moments(lane: &ArrayViewMut1<f64>) -> (f64, f64) {
    let n = lane.len() as f64;
    let mean = lane.sum() / n;
    let var = lane.fold(0.0, |acc, &x| acc + (x - mean) * (x - mean)) / n;
    (mean, var.sqrt())
}
