//! Fixed-rate coupons and leg builders.

use crate::cashflow::{CashFlow, Leg, Redemption};
use crate::coupon::Coupon;
use ck_core::{errors::Result, Compounding, Rate, Real};
use ck_termstructures::YieldTermStructure;
use ck_time::{
    BusinessDayConvention, Calendar, Date, DayCounter, Frequency, InterestRate, Schedule,
};
use std::sync::Arc;

/// A coupon paying a fixed interest rate.
#[derive(Debug, Clone)]
pub struct FixedRateCoupon {
    nominal: Real,
    payment_date: Date,
    rate: InterestRate,
    accrual_start: Date,
    accrual_end: Date,
    ref_start: Date,
    ref_end: Date,
}

impl FixedRateCoupon {
    /// Create a new fixed-rate coupon.
    ///
    /// The rate's day counter is the accrual day counter.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payment_date: Date,
        nominal: Real,
        rate: InterestRate,
        accrual_start: Date,
        accrual_end: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> Result<Self> {
        ck_core::ensure!(
            accrual_start < accrual_end,
            "accrual start ({}) must precede accrual end ({})",
            accrual_start.iso(),
            accrual_end.iso()
        );
        Ok(Self {
            nominal,
            payment_date,
            rate,
            accrual_start,
            accrual_end,
            ref_start,
            ref_end,
        })
    }

    /// A regular coupon paying `rate` with simple compounding.
    pub fn simple(
        payment_date: Date,
        nominal: Real,
        rate: Rate,
        day_counter: Arc<dyn DayCounter>,
        accrual_start: Date,
        accrual_end: Date,
    ) -> Result<Self> {
        let ir = InterestRate::new(rate, day_counter, Compounding::Simple, Frequency::Annual)?;
        Self::new(
            payment_date,
            nominal,
            ir,
            accrual_start,
            accrual_end,
            accrual_start,
            accrual_end,
        )
    }

    /// The coupon's `InterestRate`.
    pub fn interest_rate(&self) -> &InterestRate {
        &self.rate
    }

    fn interest(&self, end: Date) -> Result<Real> {
        let t = self.rate.day_counter().year_fraction_with_ref(
            self.accrual_start,
            end,
            self.ref_start,
            self.ref_end,
        );
        Ok(self.nominal * (self.rate.compound_factor_time(t)? - 1.0))
    }
}

impl CashFlow for FixedRateCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn amount(&self, _forecast: &dyn YieldTermStructure) -> Result<Real> {
        self.interest(self.accrual_end)
    }

    fn as_coupon(&self) -> Option<&dyn Coupon> {
        Some(self)
    }
}

impl Coupon for FixedRateCoupon {
    fn nominal(&self) -> Real {
        self.nominal
    }

    fn accrual_start_date(&self) -> Date {
        self.accrual_start
    }

    fn accrual_end_date(&self) -> Date {
        self.accrual_end
    }

    fn reference_period_start(&self) -> Date {
        self.ref_start
    }

    fn reference_period_end(&self) -> Date {
        self.ref_end
    }

    fn day_counter(&self) -> &dyn DayCounter {
        self.rate.day_counter()
    }

    fn rate(&self, _forecast: &dyn YieldTermStructure) -> Result<Rate> {
        Ok(self.rate.rate())
    }

    fn accrued_amount(&self, date: Date, _forecast: &dyn YieldTermStructure) -> Result<Real> {
        if date <= self.accrual_start || date > self.payment_date {
            return Ok(0.0);
        }
        self.interest(date.min(self.accrual_end))
    }
}

// ── Leg builder ───────────────────────────────────────────────────────────────

/// Reference period of schedule period `i`: a stub is measured against the
/// full tenor it was cut from.
pub(crate) fn reference_period(schedule: &Schedule, i: usize) -> Result<(Date, Date)> {
    let dates = schedule.dates();
    let (start, end) = (dates[i], dates[i + 1]);
    let Some(tenor) = schedule.tenor() else {
        return Ok((start, end));
    };
    if schedule.is_regular(i) {
        return Ok((start, end));
    }
    if i == 0 {
        Ok((end.add_period(tenor.negated())?, end))
    } else {
        Ok((start, start.add_period(tenor)?))
    }
}

/// Payment date for an accrual period ending on `end`.
pub(crate) fn payment_date(
    end: Date,
    calendar: Option<&dyn Calendar>,
    convention: BusinessDayConvention,
) -> Result<Date> {
    match calendar {
        Some(cal) => cal.adjust(end, convention),
        None => Ok(end),
    }
}

/// Build a fixed-rate leg from a schedule.
///
/// Coupons pay at the end of their accrual period, adjusted on the payment
/// calendar when one is set.
#[derive(Debug)]
pub struct FixedRateLegBuilder<'a> {
    schedule: &'a Schedule,
    notionals: Vec<Real>,
    coupon_rates: Vec<Rate>,
    day_counter: Arc<dyn DayCounter>,
    compounding: Compounding,
    frequency: Frequency,
    payment_calendar: Option<&'a dyn Calendar>,
    payment_convention: BusinessDayConvention,
    redemption: Option<Real>,
}

impl<'a> FixedRateLegBuilder<'a> {
    /// Create a new builder; rates accrue on `day_counter`.
    pub fn new(schedule: &'a Schedule, day_counter: Arc<dyn DayCounter>) -> Self {
        Self {
            schedule,
            notionals: vec![1.0],
            coupon_rates: vec![0.0],
            day_counter,
            compounding: Compounding::Simple,
            frequency: Frequency::Annual,
            payment_calendar: None,
            payment_convention: BusinessDayConvention::Following,
            redemption: None,
        }
    }

    /// Set a single notional.
    pub fn with_notional(mut self, notional: Real) -> Self {
        self.notionals = vec![notional];
        self
    }

    /// Set the notional(s). The last value extends to the remaining periods.
    pub fn with_notionals(mut self, notionals: Vec<Real>) -> Self {
        self.notionals = notionals;
        self
    }

    /// Set a single coupon rate for all periods.
    pub fn with_coupon_rate(mut self, rate: Rate) -> Self {
        self.coupon_rates = vec![rate];
        self
    }

    /// Set coupon rates per period. The last value extends to the remaining
    /// periods.
    pub fn with_coupon_rates(mut self, rates: Vec<Rate>) -> Self {
        self.coupon_rates = rates;
        self
    }

    /// Set the compounding of the coupon rate.
    pub fn with_compounding(mut self, compounding: Compounding, frequency: Frequency) -> Self {
        self.compounding = compounding;
        self.frequency = frequency;
        self
    }

    /// Adjust payment dates on `calendar` with `convention`.
    pub fn with_payment_adjustment(
        mut self,
        calendar: &'a dyn Calendar,
        convention: BusinessDayConvention,
    ) -> Self {
        self.payment_calendar = Some(calendar);
        self.payment_convention = convention;
        self
    }

    /// Add a redemption of `amount` on the last payment date.
    pub fn with_redemption(mut self, amount: Real) -> Self {
        self.redemption = Some(amount);
        self
    }

    /// Build the leg.
    pub fn build(self) -> Result<Leg> {
        ck_core::ensure!(!self.notionals.is_empty(), "no notional given");
        ck_core::ensure!(!self.coupon_rates.is_empty(), "no coupon rate given");
        let dates = self.schedule.dates();
        let periods = dates.len().saturating_sub(1);
        ck_core::ensure!(periods > 0, "schedule has no coupon periods");

        let mut leg: Leg = Vec::with_capacity(periods + 1);
        let mut last_payment = dates[periods];
        for i in 0..periods {
            let (start, end) = (dates[i], dates[i + 1]);
            let (ref_start, ref_end) = reference_period(self.schedule, i)?;
            let notional = self.notionals[i.min(self.notionals.len() - 1)];
            let rate = self.coupon_rates[i.min(self.coupon_rates.len() - 1)];
            let ir = InterestRate::new(
                rate,
                Arc::clone(&self.day_counter),
                self.compounding,
                self.frequency,
            )?;
            let payment =
                payment_date(end, self.payment_calendar, self.payment_convention)?;
            last_payment = payment;
            leg.push(Box::new(FixedRateCoupon::new(
                payment, notional, ir, start, end, ref_start, ref_end,
            )?));
        }
        if let Some(amount) = self.redemption {
            leg.push(Box::new(Redemption::new(amount, last_payment)));
        }
        Ok(leg)
    }
}
