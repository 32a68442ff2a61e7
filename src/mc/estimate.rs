// src/mc/estimate.rs
use crate::error::{SdeError, SdeResult};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Discounted Monte Carlo price estimates, laid out as (repeat, parameter set).
///
/// `std_errors` holds the standard error of each entry of `prices`, computed
/// from the sample standard deviation of the discounted payoffs it averages.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceEstimate {
    pub prices: Array2<f64>,
    pub std_errors: Array2<f64>,
}

impl PriceEstimate {
    /// The price when the estimate has a single repeat and a single parameter set.
    pub fn price(&self) -> Option<f64> {
        single(&self.prices)
    }

    /// Standard error of [`PriceEstimate::price`].
    pub fn std_error(&self) -> Option<f64> {
        single(&self.std_errors)
    }

    pub fn repeats(&self) -> usize {
        self.prices.len_of(Axis(0))
    }

    pub fn sets(&self) -> usize {
        self.prices.len_of(Axis(1))
    }

    /// Estimates for one parameter set, one entry per repeat.
    pub fn set_prices(&self, set: usize) -> ArrayView1<'_, f64> {
        self.prices.column(set)
    }

    /// Average of the repeated estimates, per parameter set.
    pub fn mean_over_repeats(&self) -> Array1<f64> {
        self.prices
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.sets()))
    }

    /// Sample variance of the estimator across repeats, per parameter set.
    ///
    /// Needs at least two repeats.
    pub fn repeat_variance(&self) -> SdeResult<Array1<f64>> {
        if self.repeats() < 2 {
            return Err(SdeError::InvalidConfiguration {
                field: "outer_repeats".to_string(),
                reason: "estimator variance needs at least 2 repeats".to_string(),
            });
        }
        Ok(self.prices.var_axis(Axis(0), 1.0))
    }

    /// Two-sided interval `price ± z * std_error` for a single estimate.
    pub fn confidence_interval(&self, z: f64) -> Option<(f64, f64)> {
        let price = self.price()?;
        let half_width = z * self.std_error()?;
        Some((price - half_width, price + half_width))
    }

    pub(crate) fn ensure_finite(&self, method: &str) -> SdeResult<()> {
        if let Some(bad) = self.prices.iter().find(|p| !p.is_finite()) {
            return Err(SdeError::NumericalInstability {
                method: method.to_string(),
                reason: format!("Price estimate is not finite: {}", bad),
            });
        }
        Ok(())
    }
}

fn single(a: &Array2<f64>) -> Option<f64> {
    match a.dim() {
        (1, 1) => Some(a[[0, 0]]),
        _ => None,
    }
}
