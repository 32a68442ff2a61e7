pub mod estimate;
pub mod mc_engine;
pub mod payoffs;
pub mod sampler;
pub mod shape;
pub mod variance_reduction;
