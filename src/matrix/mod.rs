//! Matrix storage and the sequential reference multiplication.
//!
//! The reference kernel is the correctness baseline for every parallel
//! kernel in [`crate::threaded`].

pub mod dense;
pub mod naive_ijk;

pub use dense::{Fill, Matrix, Shape};
