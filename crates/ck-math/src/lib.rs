//! # ck-math
//!
//! Numerical building blocks of the curve engine: one-dimensional
//! interpolation (with analytic derivatives and primitives), Brent root
//! finding over fallible objectives, and display rounding.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// 1D interpolation schemes.
pub mod interpolations;

/// Rounding conventions.
pub mod rounding;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use interpolations::{
    BackwardFlatInterpolation, CubicNaturalSpline, Interpolation1D, LinearInterpolation,
};
pub use rounding::{round, Rounding};
pub use solvers1d::{bracket_root, brent};
