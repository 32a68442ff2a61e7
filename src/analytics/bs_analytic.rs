// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European and down-and-out barrier calls
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! Both contracts here have closed-form solutions involving the cumulative
//! normal distribution function Φ(x). They serve as reference prices for the
//! Monte Carlo engine.

use crate::error::{validation::*, SdeError, SdeResult};
use crate::math_utils::norm_cdf;
use crate::params::ModelParameters;

/// β = -ζ(1/2) / √(2π), the Broadie-Glasserman-Kou barrier shift constant
pub const BGK_BETA: f64 = 0.5825971579390106;

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
/// - `t`: Time to expiration
///
/// No domain checks; see [`european_call_price`] for the validated form.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Continuously monitored down-and-out call price, barrier `h` below strike `k`
///
/// # Formula
/// ```text
/// C_do = C(S,K) - (H/S)^(1 + 2r/σ²) * S * Φ(h₁)
///               + (H/S)^(-1 + 2r/σ²) * K * e^(-rT) * Φ(h₂)
/// ```
///
/// Where:
/// ```text
/// h₁ = [ln(H²/(S K)) + (r + σ²/2)T] / (σ√T)
/// h₂ = h₁ - σ√T
/// ```
///
/// The reflection terms are the price of the matching down-and-in call.
pub fn bs_down_and_out_call_price(s: f64, k: f64, h: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let sigma_sqrt_t = sigma * t.sqrt();
    let h1 = ((h * h / (s * k)).ln() + (r + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    let h2 = h1 - sigma_sqrt_t;
    let lambda = 2.0 * r / (sigma * sigma);
    let ratio = h / s;

    bs_call_price(s, k, r, sigma, t) - ratio.powf(1.0 + lambda) * s * norm_cdf(h1)
        + ratio.powf(lambda - 1.0) * k * (-r * t).exp() * norm_cdf(h2)
}

/// European call price for a validated parameter record.
///
/// # Errors
/// `k` must be positive and finite.
pub fn european_call_price(params: &ModelParameters, k: f64) -> SdeResult<f64> {
    validate_positive_finite("k", k)?;
    Ok(bs_call_price(params.s0(), k, params.r(), params.sigma(), params.t()))
}

/// Continuously monitored down-and-out call price for a validated parameter record.
///
/// # Errors
/// `k` and `h` must be positive and finite, and `h < k`: above the strike
/// the reflection formula no longer prices the contract.
///
/// A spot at or below the barrier is knocked out at inception and prices at 0.
pub fn barrier_call_price(params: &ModelParameters, k: f64, h: f64) -> SdeResult<f64> {
    validate_positive_finite("k", k)?;
    validate_positive_finite("h", h)?;
    if h >= k {
        return Err(SdeError::InvalidParameters {
            parameter: "h".to_string(),
            value: h,
            constraint: format!("barrier must lie below the strike ({})", k),
        });
    }
    if params.s0() <= h {
        return Ok(0.0);
    }
    Ok(bs_down_and_out_call_price(
        params.s0(),
        k,
        h,
        params.r(),
        params.sigma(),
        params.t(),
    ))
}

/// Down-and-out call price when the barrier is only checked at
/// `monitoring_steps` equally spaced dates.
///
/// Uses the Broadie-Glasserman-Kou continuity correction: the continuous
/// formula evaluated at the shifted barrier
/// ```text
/// H' = H * exp(-β σ √(T/m))
/// ```
/// This is the reference for Monte Carlo trajectories with `m` time steps.
pub fn barrier_call_price_discrete(
    params: &ModelParameters,
    k: f64,
    h: f64,
    monitoring_steps: usize,
) -> SdeResult<f64> {
    validate_steps(monitoring_steps)?;
    validate_positive_finite("h", h)?;
    // t = 0 is a monitoring date, checked against the unshifted barrier
    if params.s0() < h {
        return barrier_call_price(params, k, h);
    }
    let dt = params.t() / monitoring_steps as f64;
    let shifted = h * (-BGK_BETA * params.sigma() * dt.sqrt()).exp();
    barrier_call_price(params, k, shifted)
}
