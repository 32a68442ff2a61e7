// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! Every sampling routine in this crate takes an explicit `&mut R: Rng`; there
//! is no process-wide generator. Reproducibility comes from seeding:
//! same seed → same normals → same prices.
//!
//! # Parallel streams
//!
//! [`RngFactory`] hands out one `StdRng` per stream id, derived from a single
//! base seed. Workers that each own a stream draw statistically independent
//! samples, and results do not depend on how work is scheduled across threads.

use ndarray::{Array, Dimension, ShapeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Create a standard RNG for a specific stream (one per worker or repeat)
    pub fn create_std_rng(&self, stream_id: u64) -> StdRng {
        StdRng::seed_from_u64(splitmix64(self.base_seed ^ splitmix64(stream_id)))
    }
}

/// Finalizer from splitmix64, spreads nearby stream ids across the seed space.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Array of independent N(0,1) draws with the given shape, filled in logical order.
pub fn standard_normal_array<Sh, D, R>(shape: Sh, rng: &mut R) -> Array<f64, D>
where
    Sh: ShapeBuilder<Dim = D>,
    D: Dimension,
    R: Rng + ?Sized,
{
    Array::from_shape_simple_fn(shape, || get_normal_draw(rng))
}
