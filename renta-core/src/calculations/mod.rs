//! Renta calculation.
//!
//! The calculator maps a gross salary onto one of three flat-rate brackets
//! and derives the net salary. [`money`] holds the rounding and formatting
//! helpers used when results are shown to the user.

pub mod money;
pub mod renta;

pub use renta::{CalculationError, compute_tax};
