//! Ibor coupons and leg builders.
//!
//! `rate = gearing * index fixing + spread`, with the fixing taken in
//! advance, `fixing_days` business days before the accrual start.

use crate::cashflow::{CashFlow, Leg};
use crate::coupon::Coupon;
use crate::fixed_rate_coupon::{payment_date, reference_period};
use crate::indexes::IborIndex;
use ck_core::{errors::Result, Rate, Real, Spread};
use ck_termstructures::YieldTermStructure;
use ck_time::{BusinessDayConvention, Calendar, Date, DayCounter, Schedule};
use std::sync::Arc;

/// How a coupon whose fixing is not yet known is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IborCouponPricing {
    /// Forward rate over the coupon's own accrual period, so that a
    /// floating leg plus notional exchanges prices at par.
    #[default]
    Par,
    /// Forward rate over the index deposit period starting on the value
    /// date, which may differ from the accrual period.
    Indexed,
}

/// A coupon paying an Ibor fixing plus a spread.
#[derive(Debug, Clone)]
pub struct IborCoupon {
    nominal: Real,
    payment_date: Date,
    accrual_start: Date,
    accrual_end: Date,
    ref_start: Date,
    ref_end: Date,
    fixing_date: Date,
    index: Arc<IborIndex>,
    gearing: Real,
    spread: Spread,
    day_counter: Arc<dyn DayCounter>,
    pricing: IborCouponPricing,
}

impl IborCoupon {
    /// Create a coupon fixing on `index` in advance of `accrual_start`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payment_date: Date,
        nominal: Real,
        accrual_start: Date,
        accrual_end: Date,
        index: Arc<IborIndex>,
        gearing: Real,
        spread: Spread,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        ck_core::ensure!(
            accrual_start < accrual_end,
            "accrual start ({}) must precede accrual end ({})",
            accrual_start.iso(),
            accrual_end.iso()
        );
        let fixing_date = index.fixing_date(accrual_start)?;
        Ok(Self {
            nominal,
            payment_date,
            accrual_start,
            accrual_end,
            ref_start: accrual_start,
            ref_end: accrual_end,
            fixing_date,
            index,
            gearing,
            spread,
            day_counter,
            pricing: IborCouponPricing::Par,
        })
    }

    /// Use `pricing` to project the fixing.
    pub fn with_pricing(mut self, pricing: IborCouponPricing) -> Self {
        self.pricing = pricing;
        self
    }

    fn with_reference_period(mut self, ref_start: Date, ref_end: Date) -> Self {
        self.ref_start = ref_start;
        self.ref_end = ref_end;
        self
    }

    /// The fixing date.
    pub fn fixing_date(&self) -> Date {
        self.fixing_date
    }

    /// The index the coupon fixes on.
    pub fn index(&self) -> &IborIndex {
        &self.index
    }

    /// Multiplier applied to the fixing.
    pub fn gearing(&self) -> Real {
        self.gearing
    }

    /// Spread added to the geared fixing.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// Projection mode.
    pub fn pricing(&self) -> IborCouponPricing {
        self.pricing
    }

    /// Start of the index deposit fixed for this coupon.
    pub fn index_start_date(&self) -> Result<Date> {
        self.index.value_date(self.fixing_date)
    }

    /// End of the index deposit fixed for this coupon.
    pub fn index_end_date(&self) -> Result<Date> {
        self.index.maturity_date(self.index_start_date()?)
    }

    /// The index fixing used by the coupon (before gearing and spread).
    pub fn index_fixing(&self, forecast: &dyn YieldTermStructure) -> Result<Rate> {
        if let Some(stored) = self.index.fixing_store().get(self.fixing_date) {
            return Ok(stored);
        }
        match self.pricing {
            IborCouponPricing::Indexed => self.index.fixing(self.fixing_date, forecast),
            IborCouponPricing::Par if self.accrual_start < forecast.reference_date() => {
                self.index.fixing(self.fixing_date, forecast)
            }
            IborCouponPricing::Par => {
                let tau = self
                    .index
                    .day_counter()
                    .year_fraction(self.accrual_start, self.accrual_end);
                let growth =
                    forecast.discount(self.accrual_start)? / forecast.discount(self.accrual_end)?;
                Ok((growth - 1.0) / tau)
            }
        }
    }
}

impl CashFlow for IborCoupon {
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

impl Coupon for IborCoupon {
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
        &*self.day_counter
    }

    fn rate(&self, forecast: &dyn YieldTermStructure) -> Result<Rate> {
        Ok(self.gearing * self.index_fixing(forecast)? + self.spread)
    }
}

// ── Leg builder ───────────────────────────────────────────────────────────────

/// Build an Ibor leg from a schedule.
#[derive(Debug)]
pub struct IborLegBuilder<'a> {
    schedule: &'a Schedule,
    index: Arc<IborIndex>,
    notionals: Vec<Real>,
    day_counter: Arc<dyn DayCounter>,
    gearing: Real,
    spread: Spread,
    pricing: IborCouponPricing,
    payment_calendar: Option<&'a dyn Calendar>,
    payment_convention: BusinessDayConvention,
}

impl<'a> IborLegBuilder<'a> {
    /// Create a new builder; coupons accrue on the index day counter unless
    /// told otherwise.
    pub fn new(schedule: &'a Schedule, index: Arc<IborIndex>) -> Self {
        let day_counter = index.day_counter();
        Self {
            schedule,
            index,
            notionals: vec![1.0],
            day_counter,
            gearing: 1.0,
            spread: 0.0,
            pricing: IborCouponPricing::Par,
            payment_calendar: None,
            payment_convention: BusinessDayConvention::Following,
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

    /// Accrue on `day_counter`.
    pub fn with_day_counter(mut self, day_counter: Arc<dyn DayCounter>) -> Self {
        self.day_counter = day_counter;
        self
    }

    /// Multiply the fixings by `gearing`.
    pub fn with_gearing(mut self, gearing: Real) -> Self {
        self.gearing = gearing;
        self
    }

    /// Add `spread` to every coupon rate.
    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    /// Projection mode for unknown fixings.
    pub fn with_pricing(mut self, pricing: IborCouponPricing) -> Self {
        self.pricing = pricing;
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
            let (ref_start, ref_end) = reference_period(self.schedule, i)?;
            let notional = self.notionals[i.min(self.notionals.len() - 1)];
            let payment = payment_date(end, self.payment_calendar, self.payment_convention)?;
            let coupon = IborCoupon::new(
                payment,
                notional,
                start,
                end,
                Arc::clone(&self.index),
                self.gearing,
                self.spread,
                Arc::clone(&self.day_counter),
            )?
            .with_pricing(self.pricing)
            .with_reference_period(ref_start, ref_end);
            leg.push(Box::new(coupon));
        }
        Ok(leg)
    }
}
