//! Leg analytics.
//!
//! - `npv`: present value on a discount curve, floating amounts projected
//!   off a forecast curve
//! - `bps`: value of one basis point of coupon rate
//! - `accrued_amount`
//! - `start_date`, `maturity_date`, `previous_cashflow_date`,
//!   `next_cashflow_date`
//!
//! Flows paid on or before the settlement date are excluded from `npv`
//! and `bps`. Both are expressed at the discount curve's reference date.

use crate::cashflow::Leg;
use ck_core::{errors::Result, Real};
use ck_termstructures::YieldTermStructure;
use ck_time::Date;

const BASIS_POINT: Real = 1.0e-4;

// ── Leg queries ──────────────────────────────────────────────────────────────

/// The first accrual start (or first payment for plain flows) of a leg.
pub fn start_date(leg: &Leg) -> Option<Date> {
    leg.iter()
        .map(|cf| cf.as_coupon().map_or(cf.date(), |c| c.accrual_start_date()))
        .min()
}

/// The maturity (last payment) date of a leg.
pub fn maturity_date(leg: &Leg) -> Option<Date> {
    leg.iter().map(|cf| cf.date()).max()
}

/// The date of the last cash flow on or before `ref_date`.
pub fn previous_cashflow_date(leg: &Leg, ref_date: Date) -> Option<Date> {
    leg.iter()
        .map(|cf| cf.date())
        .filter(|&d| d <= ref_date)
        .max()
}

/// The date of the next cash flow strictly after `ref_date`.
pub fn next_cashflow_date(leg: &Leg, ref_date: Date) -> Option<Date> {
    leg.iter()
        .map(|cf| cf.date())
        .filter(|&d| d > ref_date)
        .min()
}

// ── Valuation ────────────────────────────────────────────────────────────────

/// Net present value of the flows paid after `settlement_date`.
pub fn npv(
    leg: &Leg,
    forecast: &dyn YieldTermStructure,
    discount: &dyn YieldTermStructure,
    settlement_date: Date,
) -> Result<Real> {
    let mut total = 0.0;
    for cf in leg {
        if cf.date() <= settlement_date {
            continue;
        }
        total += cf.amount(forecast)? * discount.discount(cf.date())?;
    }
    Ok(total)
}

/// Change in NPV for a one-basis-point increase of every coupon rate:
/// `Σ nominal · τ · P(payment) · 1bp` over the coupons paid after
/// `settlement_date`.
pub fn bps(leg: &Leg, discount: &dyn YieldTermStructure, settlement_date: Date) -> Result<Real> {
    let mut total = 0.0;
    for cf in leg {
        if cf.date() <= settlement_date {
            continue;
        }
        if let Some(coupon) = cf.as_coupon() {
            total += coupon.nominal() * coupon.accrual_period() * discount.discount(cf.date())?;
        }
    }
    Ok(total * BASIS_POINT)
}

/// Interest accrued at `settlement_date` on the coupons running over it.
/// A coupon paid on the settlement date no longer counts.
pub fn accrued_amount(
    leg: &Leg,
    settlement_date: Date,
    forecast: &dyn YieldTermStructure,
) -> Result<Real> {
    let mut total = 0.0;
    for cf in leg.iter().filter(|cf| cf.date() > settlement_date) {
        if let Some(coupon) = cf.as_coupon() {
            total += coupon.accrued_amount(settlement_date, forecast)?;
        }
    }
    Ok(total)
}
