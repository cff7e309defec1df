//! Benchmark support crate for isosweep.
//!
//! Provides the parameter grid and seeded graph fixtures used by the
//! Criterion benchmarks for generator throughput, connectivity counting and
//! perturbation cost.

pub mod error;
pub mod params;
