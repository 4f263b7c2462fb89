//! # ck-instruments
//!
//! Fixed-rate bonds and fixed-vs-floating swaps, the discounting engines
//! that price them through yield-curve handles, and the rate helpers that
//! let the bootstrap calibrate a curve to their quotes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `FixedRateBond`.
pub mod bond;

/// Discounting engines observing curves through handles.
pub mod engines;

/// `Instrument` and `PricingEngine` traits, `PricingResults`.
pub mod instrument;

/// Bond, swap and OIS rate helpers.
pub mod rate_helpers;

/// `VanillaSwap` (Ibor or overnight floating leg).
pub mod swap;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bond::FixedRateBond;
pub use engines::{DiscountingBondEngine, DiscountingSwapEngine};
pub use instrument::{Instrument, PricingEngine, PricingResults};
pub use rate_helpers::{FixedRateBondHelper, OisRateHelper, SwapConventions, SwapRateHelper};
pub use swap::{SwapType, SwapValuation, VanillaSwap};
