//! Core engine types: RNG and configuration.
//!
//! Randomness is injected through `RandomSource` so pulls are reproducible
//! under a fixed seed.

pub mod config;
pub mod rng;

pub use config::SummonConfig;
pub use rng::{GameRng, RandomSource};
