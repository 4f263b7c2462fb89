//! # ck-termstructures
//!
//! Yield curves: the range-checked `TermStructure` / `YieldTermStructure`
//! traits, flat and interpolated curves, the piecewise bootstrap with its
//! rate-helper interface, and spreaded curves over relinkable handles.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure`: base trait for all term structures.
pub mod term_structure;

/// `YieldTermStructure`: discount factors, zero and forward rates.
pub mod yield_term_structure;

/// `FlatForward`: single-rate yield curve.
pub mod flat_forward;

/// `InterpolatedCurve` and the `CurveInterpolation` policies.
pub mod interpolated_curve;

/// `RateHelper` trait and `DepositRateHelper`.
pub mod rate_helpers;

/// `PiecewiseYieldCurve`: sequential bootstrap.
pub mod piecewise_yield_curve;

/// Zero-spreaded curves over a base-curve handle.
pub mod spreaded;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use flat_forward::FlatForward;
pub use interpolated_curve::{CurveInterpolation, InterpolatedCurve, NodeKind};
pub use piecewise_yield_curve::{BootstrapOptions, PiecewiseYieldCurve};
pub use rate_helpers::{helper_range_error, DepositRateHelper, RateHelper};
pub use spreaded::{InterpolatedSpreadedTermStructure, ZeroSpreadedTermStructure};
pub use term_structure::{TermStructure, TermStructureData};
pub use yield_term_structure::{
    RelinkableYieldTermStructureHandle, YieldTermStructure, YieldTermStructureHandle,
};
