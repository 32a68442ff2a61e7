//! # gbm-pricer: Black-Scholes Option Pricing by Formula and by Monte Carlo
//!
//! Prices European calls and down-and-out barrier calls under the
//! Black-Scholes model in two independent ways: closed-form formulas, and
//! Monte Carlo simulation of geometric Brownian motion with variance reduction.
//! The formulas act as the correctness oracle for the simulation.
//!
//! ## Key Features
//!
//! - **Exact GBM sampling**: terminal values and full trajectories under the risk-neutral measure
//! - **Variance Reduction**: antithetic variates and moment matching
//! - **Batched pricing**: repeated estimates and several parameter sets in one call
//! - **Reproducible**: every sampler takes an explicit RNG; parallel runs use seeded streams
//! - **Validated inputs**: domain errors instead of NaN prices
//!
//! ## Quick Start
//!
//! ```rust
//! use gbm_pricer::analytics::bs_analytic::european_call_price;
//! use gbm_pricer::mc::mc_engine::{mc_price_option_gbm, McConfig};
//! use gbm_pricer::mc::payoffs::Payoff;
//! use gbm_pricer::ModelParameters;
//!
//! let params = ModelParameters::new(100.0, 0.05, 0.2, 1.0).expect("valid parameters");
//!
//! let config = McConfig {
//!     paths: 100_000,
//!     payoff: Payoff::EuropeanCall { k: 100.0 },
//!     ..Default::default()
//! };
//!
//! let estimate = mc_price_option_gbm(&config, &params).expect("valid configuration");
//! let price = estimate.price().expect("single estimate");
//! let reference = european_call_price(&params, 100.0).expect("valid strike");
//! assert!((price - reference).abs() < 5.0 * estimate.std_error().unwrap());
//! ```
//!
//! ## Mathematical Foundation
//!
//! Under the risk-neutral measure the underlying follows
//! `dS_t = r S_t dt + σ S_t dW_t`, and an option paying `f` at maturity is worth
//! `e^(-rT) E[f]`. The Monte Carlo engine replaces the expectation by an average
//! over simulated samples.

// Module declarations
pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod params;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{SdeError, SdeResult};
pub use mc::estimate::PriceEstimate;
pub use mc::payoffs::Payoff;
pub use mc::shape::SampleShape;
pub use mc::variance_reduction::VarianceReduction;
pub use params::ModelParameters;
