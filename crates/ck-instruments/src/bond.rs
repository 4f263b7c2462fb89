//! Fixed-rate bonds.
//!
//! Prices are quoted per 100 of face amount. The dirty price is the value
//! of the flows paid after settlement, carried forward to the settlement
//! date; the clean price strips the accrued interest from it.

use crate::instrument::Instrument;
use ck_cashflows::{cashflows, FixedRateLegBuilder, Leg};
use ck_core::{errors::Result, Rate, Real};
use ck_termstructures::YieldTermStructure;
use ck_time::{BusinessDayConvention, Calendar, Date, DayCounter, EvaluationContext, Schedule};
use std::sync::Arc;

/// A bond paying fixed coupons on a schedule and its face amount at
/// maturity.
#[derive(Debug)]
pub struct FixedRateBond {
    settlement_days: u32,
    calendar: Arc<dyn Calendar>,
    face_amount: Real,
    issue_date: Option<Date>,
    cashflows: Leg,
}

impl FixedRateBond {
    /// Create a bond on `schedule` paying `coupons` (simple rates on
    /// `day_counter`, the last extending to the remaining periods).
    ///
    /// Payment dates are adjusted on `calendar` with `payment_convention`;
    /// the face amount is redeemed with the last coupon.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settlement_days: u32,
        face_amount: Real,
        schedule: &Schedule,
        coupons: Vec<Rate>,
        day_counter: Arc<dyn DayCounter>,
        payment_convention: BusinessDayConvention,
        calendar: Arc<dyn Calendar>,
        issue_date: Option<Date>,
    ) -> Result<Self> {
        ck_core::ensure!(face_amount > 0.0, "face amount must be positive, got {face_amount}");
        let cashflows = FixedRateLegBuilder::new(schedule, day_counter)
            .with_notional(face_amount)
            .with_coupon_rates(coupons)
            .with_payment_adjustment(&*calendar, payment_convention)
            .with_redemption(face_amount)
            .build()?;
        Ok(Self {
            settlement_days,
            calendar,
            face_amount,
            issue_date,
            cashflows,
        })
    }

    /// Business days between trade and settlement.
    pub fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    /// Settlement calendar.
    pub fn calendar(&self) -> &dyn Calendar {
        &*self.calendar
    }

    /// Face (redemption) amount.
    pub fn face_amount(&self) -> Real {
        self.face_amount
    }

    /// Issue date, if one was given.
    pub fn issue_date(&self) -> Option<Date> {
        self.issue_date
    }

    /// Coupons followed by the redemption.
    pub fn cashflows(&self) -> &Leg {
        &self.cashflows
    }

    /// Settlement date for a trade on the evaluation date of `ctx`.
    ///
    /// Never earlier than the issue date.
    pub fn settlement_date(&self, ctx: &EvaluationContext) -> Result<Date> {
        let settlement = ctx.settlement_date(&*self.calendar, self.settlement_days)?;
        Ok(self.issue_date.map_or(settlement, |issue| settlement.max(issue)))
    }

    /// Accrued interest at `settlement`, per 100 of face.
    pub fn accrued_amount(&self, curve: &dyn YieldTermStructure, settlement: Date) -> Result<Real> {
        let accrued = cashflows::accrued_amount(&self.cashflows, settlement, curve)?;
        Ok(accrued * 100.0 / self.face_amount)
    }

    /// Value at `settlement` of the flows paid after it, per 100 of face.
    pub fn dirty_price(&self, discount: &dyn YieldTermStructure, settlement: Date) -> Result<Real> {
        let value = cashflows::npv(&self.cashflows, discount, discount, settlement)?;
        Ok(value / discount.discount(settlement)? * 100.0 / self.face_amount)
    }

    /// Dirty price less accrued interest.
    pub fn clean_price(&self, discount: &dyn YieldTermStructure, settlement: Date) -> Result<Real> {
        Ok(self.dirty_price(discount, settlement)? - self.accrued_amount(discount, settlement)?)
    }
}

impl Instrument for FixedRateBond {
    fn maturity_date(&self) -> Option<Date> {
        cashflows::maturity_date(&self.cashflows)
    }
}
