//! `Coupon` trait, the base for interest-rate coupons.
//!
//! A coupon accrues interest over `[accrual_start, accrual_end)` and pays on
//! its payment date.

use crate::cashflow::CashFlow;
use ck_core::{errors::Result, Rate, Real, Time};
use ck_termstructures::YieldTermStructure;
use ck_time::{Date, DayCounter};

/// Base trait for interest-rate coupons.
pub trait Coupon: CashFlow {
    /// The notional (face) amount.
    fn nominal(&self) -> Real;

    /// Start of the accrual period.
    fn accrual_start_date(&self) -> Date;

    /// End of the accrual period.
    fn accrual_end_date(&self) -> Date;

    /// Reference period start (differs from the accrual start for stubs).
    fn reference_period_start(&self) -> Date {
        self.accrual_start_date()
    }

    /// Reference period end.
    fn reference_period_end(&self) -> Date {
        self.accrual_end_date()
    }

    /// The day counter used for accrual.
    fn day_counter(&self) -> &dyn DayCounter;

    /// The accrual period as a year fraction.
    fn accrual_period(&self) -> Time {
        self.day_counter().year_fraction_with_ref(
            self.accrual_start_date(),
            self.accrual_end_date(),
            self.reference_period_start(),
            self.reference_period_end(),
        )
    }

    /// The annualized coupon rate, projected off `forecast` when floating.
    fn rate(&self, forecast: &dyn YieldTermStructure) -> Result<Rate>;

    /// Interest accrued from the accrual start up to `date`.
    ///
    /// Zero on or before the accrual start and after the payment date.
    fn accrued_amount(&self, date: Date, forecast: &dyn YieldTermStructure) -> Result<Real> {
        if date <= self.accrual_start_date() || date > self.date() {
            return Ok(0.0);
        }
        let end = date.min(self.accrual_end_date());
        let fraction = self.day_counter().year_fraction_with_ref(
            self.accrual_start_date(),
            end,
            self.reference_period_start(),
            self.reference_period_end(),
        );
        Ok(self.nominal() * self.rate(forecast)? * fraction)
    }
}
