//! Overnight-indexed coupons: daily fixings compounded over the accrual
//! period.
//!
//! Sub-periods starting before the forecast curve's reference date use
//! stored fixings. The rest of the period compounds to
//! `P(first unknown date) / P(accrual end)` because the daily forwards of a
//! single curve telescope.

use crate::cashflow::{CashFlow, Leg};
use crate::coupon::Coupon;
use crate::fixed_rate_coupon::payment_date;
use crate::indexes::OvernightIndex;
use ck_core::{errors::Result, Rate, Real, Spread};
use ck_termstructures::YieldTermStructure;
use ck_time::{BusinessDayConvention, Calendar, Date, DayCounter, Schedule};
use std::sync::Arc;

/// A coupon paying the compounded overnight rate plus a spread.
#[derive(Debug, Clone)]
pub struct OvernightIndexedCoupon {
    nominal: Real,
    payment_date: Date,
    accrual_start: Date,
    accrual_end: Date,
    index: Arc<OvernightIndex>,
    spread: Spread,
    day_counter: Arc<dyn DayCounter>,
    // Business days in [start, end) followed by the accrual end.
    value_dates: Vec<Date>,
}

impl OvernightIndexedCoupon {
    /// Create a coupon compounding `index` over `[accrual_start,
    /// accrual_end)`.
    pub fn new(
        payment_date: Date,
        nominal: Real,
        accrual_start: Date,
        accrual_end: Date,
        index: Arc<OvernightIndex>,
        spread: Spread,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        ck_core::ensure!(
            accrual_start < accrual_end,
            "accrual start ({}) must precede accrual end ({})",
            accrual_start.iso(),
            accrual_end.iso()
        );
        let calendar = index.fixing_calendar();
        let mut value_dates = vec![accrual_start];
        let mut d = calendar.adjust(accrual_start, BusinessDayConvention::Following)?;
        if d > accrual_start && d < accrual_end {
            value_dates.push(d);
        }
        loop {
            d = calendar.advance_business_days(d, 1)?;
            if d >= accrual_end {
                break;
            }
            value_dates.push(d);
        }
        value_dates.push(accrual_end);
        Ok(Self {
            nominal,
            payment_date,
            accrual_start,
            accrual_end,
            index,
            spread,
            day_counter,
            value_dates,
        })
    }

    /// The index compounded by the coupon.
    pub fn index(&self) -> &OvernightIndex {
        &self.index
    }

    /// Spread added to the compounded rate.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// Start dates of the daily sub-periods, followed by the accrual end.
    pub fn value_dates(&self) -> &[Date] {
        &self.value_dates
    }

    /// The compounded overnight rate over the accrual period, before spread.
    pub fn compounded_rate(&self, forecast: &dyn YieldTermStructure) -> Result<Rate> {
        let today = forecast.reference_date();
        let calendar = self.index.fixing_calendar();
        let dc = self.index.day_counter();
        let n = self.value_dates.len() - 1;

        let mut compound = 1.0;
        let mut i = 0;
        while i < n {
            let start = self.value_dates[i];
            let fixing_date =
                calendar.advance_business_days(start, -(self.index.fixing_days() as i32))?;
            let known = self.index.fixing_store().get(fixing_date);
            let fixing = match known {
                Some(value) if start <= today => value,
                _ if start < today => self.index.past_fixing(fixing_date)?,
                _ => break,
            };
            compound *= 1.0 + fixing * dc.year_fraction(start, self.value_dates[i + 1]);
            i += 1;
        }
        if i < n {
            compound *= forecast.discount(self.value_dates[i])? / forecast.discount(self.accrual_end)?;
        }
        Ok((compound - 1.0) / dc.year_fraction(self.accrual_start, self.accrual_end))
    }
}

impl CashFlow for OvernightIndexedCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn amount(&self, forecast: &dyn YieldTermStructure) -> Result<Real> {
        Ok(self.nominal * self.rate(forecast)? * self.accrual_period())
    }

    fn as_coupon(&self) -> Option<&dyn Coupon> {
        Some(self)
    }
}

impl Coupon for OvernightIndexedCoupon {
    fn nominal(&self) -> Real {
        self.nominal
    }

    fn accrual_start_date(&self) -> Date {
        self.accrual_start
    }

    fn accrual_end_date(&self) -> Date {
        self.accrual_end
    }

    fn day_counter(&self) -> &dyn DayCounter {
        &*self.day_counter
    }

    fn rate(&self, forecast: &dyn YieldTermStructure) -> Result<Rate> {
        Ok(self.compounded_rate(forecast)? + self.spread)
    }
}

// ── Leg builder ───────────────────────────────────────────────────────────────

/// Build an overnight-indexed leg from a schedule.
#[derive(Debug)]
pub struct OvernightLegBuilder<'a> {
    schedule: &'a Schedule,
    index: Arc<OvernightIndex>,
    notionals: Vec<Real>,
    day_counter: Arc<dyn DayCounter>,
    spread: Spread,
    payment_calendar: Option<&'a dyn Calendar>,
    payment_convention: BusinessDayConvention,
}

impl<'a> OvernightLegBuilder<'a> {
    /// Create a new builder accruing on the index day counter.
    pub fn new(schedule: &'a Schedule, index: Arc<OvernightIndex>) -> Self {
        let day_counter = index.day_counter();
        Self {
            schedule,
            index,
            notionals: vec![1.0],
            day_counter,
            spread: 0.0,
            payment_calendar: None,
            payment_convention: BusinessDayConvention::Following,
        }
    }

    /// Set a single notional.
    pub fn with_notional(mut self, notional: Real) -> Self {
        self.notionals = vec![notional];
        self
    }

    /// Accrue on `day_counter`.
    pub fn with_day_counter(mut self, day_counter: Arc<dyn DayCounter>) -> Self {
        self.day_counter = day_counter;
        self
    }

    /// Add `spread` to every compounded rate.
    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
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

    /// Build the leg.
    pub fn build(self) -> Result<Leg> {
        ck_core::ensure!(!self.notionals.is_empty(), "no notional given");
        let dates = self.schedule.dates();
        let periods = dates.len().saturating_sub(1);
        ck_core::ensure!(periods > 0, "schedule has no coupon periods");

        let mut leg: Leg = Vec::with_capacity(periods);
        for i in 0..periods {
            let (start, end) = (dates[i], dates[i + 1]);
            let notional = self.notionals[i.min(self.notionals.len() - 1)];
            let payment = payment_date(end, self.payment_calendar, self.payment_convention)?;
            leg.push(Box::new(OvernightIndexedCoupon::new(
                payment,
                notional,
                start,
                end,
                Arc::clone(&self.index),
                self.spread,
                Arc::clone(&self.day_counter),
            )?));
        }
        Ok(leg)
    }
}
