// src/mc/sampler.rs
//! Sample Generator for geometric Brownian motion
//!
//! # Terminal sampling
//!
//! ```text
//! S_T = S_0 * exp((r - σ²/2)T + σ√T * Z),   Z ~ N(0,1)
//! ```
//!
//! # Trajectory sampling
//!
//! With `n` steps of size Δt = T/n, a discrete Brownian path is built from the
//! cumulative sum of the normals, with a zero prepended at t = 0:
//!
//! ```text
//! W_k = √Δt * (Z_1 + ... + Z_k),   W_0 = 0
//! S_k = S_0 * exp(σ W_k + (r - σ²/2) Δt k),   k = 0..=n
//! ```
//!
//! `S_0` is reproduced exactly at time index 0 and `S_n` has the exact terminal
//! marginal. Each parameter set gets its own slice of independent normals.
//!
//! The raw normals go through the requested [`VarianceReduction`] first:
//! antithetic pairing, then (terminal only) moment matching of the normals.
//! Trajectories are moment matched after the exponential map instead.

use crate::error::{SdeError, SdeResult};
use crate::mc::shape::SampleShape;
use crate::mc::variance_reduction::{
    antithetic, moment_match_normals, moment_match_paths, VarianceReduction,
};
use crate::models::gbm::Gbm;
use crate::params::ModelParameters;
use crate::rng;
use ndarray::{s, Array3, Array4, Axis};
use rand::Rng;
use tracing::debug;

/// Raw normals (draw, repeat, set) for terminal sampling, variance reduction applied.
pub fn terminal_normals<R: Rng + ?Sized>(
    shape: &SampleShape,
    reduction: VarianceReduction,
    rng: &mut R,
) -> SdeResult<Array3<f64>> {
    shape.require_terminal()?;
    let mut z: Array3<f64> = rng::standard_normal_array(shape.terminal_dim(), rng);
    if reduction.contains(VarianceReduction::ANTITHETIC) {
        z = antithetic(&z)?;
    }
    if reduction.contains(VarianceReduction::MOMENT_MATCHING) {
        // Centering is a no-op after antithetic pairing; scaling is not
        moment_match_normals(&mut z)?;
    }
    Ok(z)
}

/// Raw normals (draw, step, repeat, set) for trajectory sampling, antithetic applied.
pub fn trajectory_normals<R: Rng + ?Sized>(
    shape: &SampleShape,
    reduction: VarianceReduction,
    rng: &mut R,
) -> SdeResult<Array4<f64>> {
    let mut z: Array4<f64> = rng::standard_normal_array(shape.trajectory_dim()?, rng);
    if reduction.contains(VarianceReduction::ANTITHETIC) {
        z = antithetic(&z)?;
    }
    Ok(z)
}

/// Map normals (draw, repeat, set) to terminal prices, one parameter record per set.
///
/// # Errors
/// `DimensionMismatch` unless there is exactly one record per parameter set.
pub fn terminal_from_normals(
    mut normals: Array3<f64>,
    params: &[ModelParameters],
) -> SdeResult<Array3<f64>> {
    ensure_record_per_set(normals.len_of(Axis(2)), params)?;
    for (mut set, p) in normals.axis_iter_mut(Axis(2)).zip(params) {
        let gbm = Gbm::from(p);
        let t = p.t();
        set.mapv_inplace(|z| gbm.value_at(t, z));
    }
    Ok(normals)
}

/// Map step normals (draw, step, repeat, set) to price paths (draw, time, repeat, set).
///
/// The time axis of the result is one longer than the step axis of the input.
///
/// # Errors
/// `DimensionMismatch` unless there is exactly one record per parameter set.
pub fn trajectory_from_normals(
    normals: &Array4<f64>,
    params: &[ModelParameters],
) -> SdeResult<Array4<f64>> {
    let (draws, steps, repeats, sets) = normals.dim();
    ensure_record_per_set(sets, params)?;
    let mut paths = Array4::<f64>::zeros((draws, steps + 1, repeats, sets));
    paths.slice_mut(s![.., 1.., .., ..]).assign(normals);
    paths.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);

    for (mut set, p) in paths.axis_iter_mut(Axis(3)).zip(params) {
        let gbm = Gbm::from(p);
        let dt = p.t() / steps.max(1) as f64;
        let sqrt_dt = dt.sqrt();
        for (k, mut slice) in set.axis_iter_mut(Axis(1)).enumerate() {
            let t_k = dt * k as f64;
            slice.mapv_inplace(|cum_z| gbm.value_from_brownian(t_k, sqrt_dt * cum_z));
        }
    }
    Ok(paths)
}

fn ensure_record_per_set(sets: usize, params: &[ModelParameters]) -> SdeResult<()> {
    if params.len() != sets {
        return Err(SdeError::DimensionMismatch {
            axis: "parameter-set",
            expected: sets,
            found: params.len(),
        });
    }
    Ok(())
}

/// Terminal batch (draw, repeat, set) of S_T under the risk-neutral measure.
///
/// With [`VarianceReduction::ANTITHETIC`] the draw axis has `2 * inner_draws` entries.
pub fn generate_terminal<P, R>(
    shape: &SampleShape,
    params: &P,
    reduction: VarianceReduction,
    rng: &mut R,
) -> SdeResult<Array3<f64>>
where
    P: AsRef<[ModelParameters]> + ?Sized,
    R: Rng + ?Sized,
{
    let params = params.as_ref();
    shape.validate(params)?;
    debug!(?shape, ?reduction, "generating terminal samples");

    let normals = terminal_normals(shape, reduction, rng)?;
    terminal_from_normals(normals, params)
}

/// Trajectory batch (draw, time, repeat, set) of S_t on the grid t_k = kT/n, k = 0..=n.
pub fn generate_trajectory<P, R>(
    shape: &SampleShape,
    params: &P,
    reduction: VarianceReduction,
    rng: &mut R,
) -> SdeResult<Array4<f64>>
where
    P: AsRef<[ModelParameters]> + ?Sized,
    R: Rng + ?Sized,
{
    let params = params.as_ref();
    shape.validate(params)?;
    shape.trajectory_dim()?;
    debug!(?shape, ?reduction, "generating trajectory samples");

    let normals = trajectory_normals(shape, reduction, rng)?;
    let mut paths = trajectory_from_normals(&normals, params)?;
    if reduction.contains(VarianceReduction::MOMENT_MATCHING) {
        moment_match_paths(&mut paths, params)?;
    }
    Ok(paths)
}
