//! Parameter generation
//!
//! The randomized front half of the pipeline: global constants, per-partial
//! tuples with their modulators, voices, and the shared noise bed.

mod generator;
mod random;

pub use generator::{
    generate_config, generate_noise, generate_partials, generate_voices, ModTarget,
    ModulatorSpec, Partial, Voice,
};
pub use random::RandomSource;
