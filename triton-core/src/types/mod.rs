//! Shared value types.

pub mod color;

pub use color::{Color, ColorParseError};
