//! Support library for the isosweep CLI binary.
//!
//! Re-exports the command and logging modules so doctests and integration
//! tests can drive a sweep without forking the binary.

pub mod cli;
pub mod logging;
