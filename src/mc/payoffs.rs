//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **European call**: max(S_T - K, 0)
//! - **Down-and-out barrier call**: max(S_T - K, 0) if min(S_t) ≥ H over every
//!   monitored time index (including t = 0 and t = T), else 0
//!
//! # Evaluation
//!
//! Payoffs are averaged over the draw axis (axis 0) and discounted by e^(-rT)
//! of the parameter set they belong to. The repeat and parameter-set axes are
//! kept, so the result is a [`PriceEstimate`] of shape (repeat, set).
//!
//! The barrier payoff depends on the path minimum and so needs a trajectory
//! batch; the European call can be evaluated on either layout.

use crate::error::{validation::*, SdeError, SdeResult};
use crate::mc::estimate::PriceEstimate;
use crate::params::ModelParameters;
use ndarray::{Array3, Array4, Axis, Zip};

/// Supported option payoffs
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },

    /// Down-and-out barrier call: max(S_T - K, 0) if min(S_t) ≥ H, else 0
    BarrierCallDownAndOut { k: f64, h: f64 },
}

impl Payoff {
    /// Whether the payoff needs more than the terminal value of the path.
    pub fn is_path_dependent(&self) -> bool {
        matches!(self, Payoff::BarrierCallDownAndOut { .. })
    }

    pub fn validate(&self) -> SdeResult<()> {
        match *self {
            Payoff::EuropeanCall { k } => validate_finite("k", k),
            Payoff::BarrierCallDownAndOut { k, h } => {
                validate_finite("k", k)?;
                validate_finite("h", h)
            }
        }
    }

    /// Payoff from the terminal value and the running minimum of a path.
    pub fn from_extremes(&self, s_t: f64, path_min: f64) -> f64 {
        match *self {
            Payoff::EuropeanCall { k } => (s_t - k).max(0.0),
            // Knocked out as soon as any monitored price is strictly below H
            Payoff::BarrierCallDownAndOut { k, h } => {
                if path_min < h {
                    0.0
                } else {
                    (s_t - k).max(0.0)
                }
            }
        }
    }
}

/// Discounted estimate from a terminal batch (draw, repeat, set).
pub fn evaluate_terminal<P>(batch: &Array3<f64>, params: &P, payoff: &Payoff) -> SdeResult<PriceEstimate>
where
    P: AsRef<[ModelParameters]> + ?Sized,
{
    if payoff.is_path_dependent() {
        return Err(SdeError::InvalidConfiguration {
            field: "payoff".to_string(),
            reason: "path-dependent payoff needs a trajectory batch".to_string(),
        });
    }
    let payoffs = batch.mapv(|s_t| payoff.from_extremes(s_t, s_t));
    discounted_estimate(payoffs, params.as_ref())
}

/// Discounted estimate from a trajectory batch (draw, time, repeat, set).
pub fn evaluate_trajectory<P>(batch: &Array4<f64>, params: &P, payoff: &Payoff) -> SdeResult<PriceEstimate>
where
    P: AsRef<[ModelParameters]> + ?Sized,
{
    let n_times = batch.len_of(Axis(1));
    if n_times == 0 {
        return Err(SdeError::InvalidConfiguration {
            field: "time_steps".to_string(),
            reason: "trajectory batch has an empty time axis".to_string(),
        });
    }
    let terminal = batch.index_axis(Axis(1), n_times - 1);
    let path_min = batch.fold_axis(Axis(1), f64::INFINITY, |m, &s| m.min(s));
    let payoffs = Zip::from(&terminal)
        .and(&path_min)
        .map_collect(|&s_t, &m| payoff.from_extremes(s_t, m));
    discounted_estimate(payoffs, params.as_ref())
}

fn discounted_estimate(payoffs: Array3<f64>, params: &[ModelParameters]) -> SdeResult<PriceEstimate> {
    let (n, _, n_sets) = payoffs.dim();
    if params.len() != n_sets {
        return Err(SdeError::DimensionMismatch {
            axis: "parameter-set",
            expected: n_sets,
            found: params.len(),
        });
    }
    validate_paths(n)?;

    let mut prices = payoffs
        .mean_axis(Axis(0))
        .ok_or_else(|| SdeError::InvalidConfiguration {
            field: "paths".to_string(),
            reason: "no draws to average".to_string(),
        })?;
    let ddof = if n > 1 { 1.0 } else { 0.0 };
    let mut std_errors = payoffs.std_axis(Axis(0), ddof) / (n as f64).sqrt();

    for (j, p) in params.iter().enumerate() {
        let discount = p.discount_factor();
        prices.column_mut(j).mapv_inplace(|v| v * discount);
        std_errors.column_mut(j).mapv_inplace(|v| v * discount);
    }
    Ok(PriceEstimate { prices, std_errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn params() -> ModelParameters {
        ModelParameters::new(100.0, 0.05, 0.2, 1.0).unwrap()
    }

    #[test]
    fn test_from_extremes() {
        let call = Payoff::EuropeanCall { k: 100.0 };
        let barrier = Payoff::BarrierCallDownAndOut { k: 100.0, h: 95.0 };

        // (terminal, path minimum)
        let survivor = (112.0, 96.0);
        let knocked = (112.0, 94.9);
        assert_eq!(call.from_extremes(survivor.0, survivor.1), 12.0);
        assert_eq!(barrier.from_extremes(survivor.0, survivor.1), 12.0);
        assert_eq!(call.from_extremes(knocked.0, knocked.1), 12.0);
        assert_eq!(barrier.from_extremes(knocked.0, knocked.1), 0.0);
        assert_eq!(barrier.from_extremes(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_touching_barrier_does_not_knock_out() {
        let barrier = Payoff::BarrierCallDownAndOut { k: 100.0, h: 95.0 };
        assert_eq!(barrier.from_extremes(105.0, 95.0), 5.0);
    }

    #[test]
    fn test_evaluate_terminal_discounts_mean() {
        let p = params();
        let batch = array![[[90.0]], [[110.0]], [[120.0]], [[100.0]]];
        let est = evaluate_terminal(&batch, &p, &Payoff::EuropeanCall { k: 100.0 }).unwrap();

        let df = (-0.05f64).exp();
        assert!((est.price().unwrap() - df * 7.5).abs() < 1e-12);
        // payoffs (0, 10, 20, 0): sample std = sqrt(275/3)
        let expected_se = df * (275.0f64 / 3.0).sqrt() / 2.0;
        assert!((est.std_error().unwrap() - expected_se).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_terminal_rejects_barrier() {
        let p = params();
        let batch = array![[[90.0]]];
        let payoff = Payoff::BarrierCallDownAndOut { k: 100.0, h: 95.0 };
        assert!(evaluate_terminal(&batch, &p, &payoff).is_err());
    }

    #[test]
    fn test_evaluate_trajectory_uses_path_minimum() {
        let p = params();
        // Two paths, three time indices
        let batch = Array4::from_shape_vec(
            (2, 3, 1, 1),
            vec![100.0, 90.0, 130.0, 100.0, 99.0, 110.0],
        )
        .unwrap();
        let df = (-0.05f64).exp();

        let barrier = Payoff::BarrierCallDownAndOut { k: 100.0, h: 95.0 };
        let est = evaluate_trajectory(&batch, &p, &barrier).unwrap();
        assert!((est.price().unwrap() - df * 5.0).abs() < 1e-12);

        let call = Payoff::EuropeanCall { k: 100.0 };
        let est = evaluate_trajectory(&batch, &p, &call).unwrap();
        assert!((est.price().unwrap() - df * 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_reduction_keeps_outer_axes() {
        let a = params();
        let b = ModelParameters::new(100.0, 0.0, 0.2, 1.0).unwrap();
        let batch = Array3::from_elem((5, 3, 2), 110.0);
        let est = evaluate_terminal(&batch, &[a, b], &Payoff::EuropeanCall { k: 100.0 }).unwrap();
        assert_eq!(est.prices.dim(), (3, 2));
        assert!((est.prices[[1, 0]] - 10.0 * (-0.05f64).exp()).abs() < 1e-12);
        assert_eq!(est.prices[[2, 1]], 10.0);
        assert_eq!(est.std_errors[[0, 0]], 0.0);
    }

    #[test]
    fn test_parameter_set_mismatch() {
        let p = params();
        let batch = Array3::from_elem((5, 1, 2), 110.0);
        let err = evaluate_terminal(&batch, &p, &Payoff::EuropeanCall { k: 100.0 }).unwrap_err();
        assert!(matches!(err, SdeError::DimensionMismatch { .. }));
    }
}
