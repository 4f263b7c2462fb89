//! # ck-cashflows
//!
//! Cash flows, coupons (fixed, Ibor, overnight-indexed) and legs, the
//! interest-rate indexes floating coupons fix on, and leg analytics.
//!
//! Floating amounts are projected off a forecast curve passed in by the
//! caller, so the same leg can be valued on a bootstrap trial curve, on a
//! relinked handle's current target or on any other yield curve.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `CashFlow` trait, `Leg`, simple flows and redemptions.
pub mod cashflow;

/// Leg analytics: NPV, BPS, accrued amount, cash-flow dates.
pub mod cashflows;

/// `Coupon` trait.
pub mod coupon;

/// Fixed-rate coupons and legs.
pub mod fixed_rate_coupon;

/// Ibor coupons and legs.
pub mod floating_rate_coupon;

/// Ibor and overnight indexes with their fixing history.
pub mod indexes;

/// Overnight-indexed (compounded) coupons and legs.
pub mod overnight_indexed_coupon;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use cashflow::{CashFlow, Leg, Redemption, SimpleCashFlow};
pub use cashflows::{
    accrued_amount, bps, maturity_date, next_cashflow_date, npv, previous_cashflow_date,
    start_date,
};
pub use coupon::Coupon;
pub use fixed_rate_coupon::{FixedRateCoupon, FixedRateLegBuilder};
pub use floating_rate_coupon::{IborCoupon, IborCouponPricing, IborLegBuilder};
pub use indexes::{FixingStore, IborIndex, OvernightIndex};
pub use overnight_indexed_coupon::{OvernightIndexedCoupon, OvernightLegBuilder};
