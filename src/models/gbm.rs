// src/models/gbm.rs
//! Geometric Brownian motion under the risk-neutral measure
//!
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! S_t  = S_0 * exp((r - σ²/2)t + σW_t)
//! ```

use crate::params::ModelParameters;
use std::f64;

#[derive(Clone, Copy, Debug)]
pub struct Gbm {
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, r: f64, sigma: f64) -> Self {
        Gbm { s0, r, sigma }
    }

    /// Drift of log S_t per unit time: r - σ²/2
    pub fn log_drift(&self) -> f64 {
        self.r - 0.5 * self.sigma * self.sigma
    }

    /// S_t from a standard normal draw z, with W_t = √t * z
    pub fn value_at(&self, t: f64, normal_draw: f64) -> f64 {
        self.s0 * (self.log_drift() * t + self.sigma * t.sqrt() * normal_draw).exp()
    }

    /// S_t from an already scaled Brownian value W_t
    pub fn value_from_brownian(&self, t: f64, w_t: f64) -> f64 {
        self.s0 * (self.log_drift() * t + self.sigma * w_t).exp()
    }

    /// E[S_t] = S_0 * e^(rt)
    pub fn expected_value(&self, t: f64) -> f64 {
        self.s0 * (self.r * t).exp()
    }
}

impl From<&ModelParameters> for Gbm {
    fn from(p: &ModelParameters) -> Self {
        Gbm::new(p.s0(), p.r(), p.sigma())
    }
}
