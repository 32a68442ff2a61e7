// src/params.rs
//! Black-Scholes model parameters
//!
//! A [`ModelParameters`] record is immutable once built. Construction goes
//! through [`ModelParameters::new`] (or [`ModelParameters::from_json`]), which
//! rejects records outside the model's numeric domain, so pricing code never
//! re-checks the fields.
//!
//! Every pricing entry point takes `&impl AsRef<[ModelParameters]>`: a single
//! record prices one parameter set, a slice or `Vec` prices one set per element
//! along the parameter-set axis.

use crate::error::{validation::*, SdeError, SdeResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelParameters", into = "RawModelParameters")]
pub struct ModelParameters {
    s0: f64,    // Price of the underlying at t = 0
    r: f64,     // Risk-free rate
    sigma: f64, // Volatility
    t: f64,     // Maturity
}

/// Wire form of the record, keyed the way market data files name the fields.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModelParameters {
    #[serde(rename = "S0")]
    s0: f64,
    r: f64,
    sigma: f64,
    #[serde(rename = "T")]
    t: f64,
}

impl ModelParameters {
    pub fn new(s0: f64, r: f64, sigma: f64, t: f64) -> SdeResult<Self> {
        validate_positive_finite("s0", s0)?;
        validate_finite("r", r)?;
        validate_positive_finite("sigma", sigma)?;
        validate_positive_finite("t", t)?;
        Ok(ModelParameters { s0, r, sigma, t })
    }

    /// Parse a JSON object with keys `S0`, `r`, `sigma` and `T`.
    ///
    /// A missing or mistyped key surfaces as [`SdeError::ParameterLookup`];
    /// a present but out-of-domain value as [`SdeError::InvalidParameters`].
    pub fn from_json(json: &str) -> SdeResult<Self> {
        let raw: RawModelParameters =
            serde_json::from_str(json).map_err(|e| SdeError::ParameterLookup {
                reason: e.to_string(),
            })?;
        Self::try_from(raw)
    }

    pub fn s0(&self) -> f64 {
        self.s0
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.r * self.t).exp()
    }
}

impl TryFrom<RawModelParameters> for ModelParameters {
    type Error = SdeError;

    fn try_from(raw: RawModelParameters) -> SdeResult<Self> {
        ModelParameters::new(raw.s0, raw.r, raw.sigma, raw.t)
    }
}

impl From<ModelParameters> for RawModelParameters {
    fn from(p: ModelParameters) -> Self {
        RawModelParameters {
            s0: p.s0,
            r: p.r,
            sigma: p.sigma,
            t: p.t,
        }
    }
}

impl AsRef<[ModelParameters]> for ModelParameters {
    fn as_ref(&self) -> &[ModelParameters] {
        std::slice::from_ref(self)
    }
}
