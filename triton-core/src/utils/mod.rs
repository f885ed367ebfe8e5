//! Utility helpers shared across the Triton crates.

pub mod fs;
pub mod paths;
