//! Instrument-based rate helpers.
//!
//! Each helper builds its instrument once, at construction, and prices it on
//! every trial curve the bootstrap hands in:
//!
//! - [`FixedRateBondHelper`]: clean price at the bond's settlement date
//! - [`SwapRateHelper`]: fair fixed rate of a fixed-vs-Ibor swap
//! - [`OisRateHelper`]: fair fixed rate of an overnight-indexed swap
//!
//! Swap helpers may take exogenous forecast and discount curves through
//! handles; whichever is not given is the trial curve.

use crate::bond::FixedRateBond;
use crate::instrument::Instrument;
use crate::swap::{SwapType, VanillaSwap};
use ck_cashflows::{IborIndex, OvernightIndex};
use ck_core::errors::Result;
use ck_core::{Real, Spread};
use ck_quotes::QuoteHandle;
use ck_termstructures::{
    helper_range_error, RateHelper, YieldTermStructure, YieldTermStructureHandle,
};
use ck_time::{
    BusinessDayConvention, Calendar, Date, DateGeneration, DayCounter, EvaluationContext,
    Frequency, Period, ScheduleBuilder, Target, Thirty360, Thirty360Convention,
};
use std::sync::Arc;

// ── Bonds ─────────────────────────────────────────────────────────────────────

/// A fixed-rate bond quoted by clean price.
#[derive(Debug)]
pub struct FixedRateBondHelper {
    quote: QuoteHandle,
    bond: FixedRateBond,
    settlement_date: Date,
    maturity_date: Date,
}

impl FixedRateBondHelper {
    /// Helper for `bond` traded on the evaluation date of `ctx`.
    pub fn new(quote: QuoteHandle, bond: FixedRateBond, ctx: &EvaluationContext) -> Result<Self> {
        let settlement_date = bond.settlement_date(ctx)?;
        let Some(maturity_date) = bond.maturity_date() else {
            ck_core::fail!("bond has no cash flows");
        };
        ck_core::ensure!(
            maturity_date > settlement_date,
            "bond matures ({}) before settlement ({})",
            maturity_date.iso(),
            settlement_date.iso()
        );
        Ok(Self {
            quote,
            bond,
            settlement_date,
            maturity_date,
        })
    }

    /// The underlying bond.
    pub fn bond(&self) -> &FixedRateBond {
        &self.bond
    }

    /// Settlement date of the quoted trade.
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }
}

impl RateHelper for FixedRateBondHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn earliest_date(&self) -> Date {
        self.settlement_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        self.bond
            .clean_price(curve, self.settlement_date)
            .map_err(|e| helper_range_error(&self.description(), e))
    }

    fn description(&self) -> String {
        format!("bond {}", self.maturity_date.iso())
    }
}

// ── Swaps ─────────────────────────────────────────────────────────────────────

/// Market conventions of a quoted fixed-vs-Ibor swap.
#[derive(Debug, Clone)]
pub struct SwapConventions {
    /// Business days from the evaluation date to spot.
    pub settlement_days: u32,
    /// Calendar for spot, start and both schedules.
    pub calendar: Arc<dyn Calendar>,
    /// Fixed coupon frequency.
    pub fixed_frequency: Frequency,
    /// Roll convention of the fixed schedule.
    pub fixed_convention: BusinessDayConvention,
    /// Fixed-leg day counter.
    pub fixed_day_counter: Arc<dyn DayCounter>,
    /// Floating index; its tenor, roll convention and day counter drive the
    /// floating leg.
    pub index: Arc<IborIndex>,
    /// Spread over the index.
    pub spread: Spread,
    /// Delay between spot and the swap start.
    pub forward_start: Period,
}

impl SwapConventions {
    /// EUR market standard against `index`: TARGET, spot T+2, annual
    /// unadjusted 30/360 fixed leg.
    pub fn euribor(index: Arc<IborIndex>) -> Self {
        Self {
            settlement_days: 2,
            calendar: Arc::new(Target),
            fixed_frequency: Frequency::Annual,
            fixed_convention: BusinessDayConvention::Unadjusted,
            fixed_day_counter: Arc::new(Thirty360::new(Thirty360Convention::BondBasis)),
            index,
            spread: 0.0,
            forward_start: Period::days(0),
        }
    }

    /// Same conventions with a spread over the index.
    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    /// Same conventions starting `forward_start` after spot.
    pub fn with_forward_start(mut self, forward_start: Period) -> Self {
        self.forward_start = forward_start;
        self
    }
}

/// A par swap rate.
#[derive(Debug)]
pub struct SwapRateHelper {
    quote: QuoteHandle,
    tenor: Period,
    forward_start: Period,
    swap: VanillaSwap,
    start_date: Date,
    pillar_date: Date,
    forecast: Option<YieldTermStructureHandle>,
    discount: Option<YieldTermStructureHandle>,
}

impl SwapRateHelper {
    /// Swap of length `tenor` starting at spot (plus any forward start) for
    /// the evaluation date of `ctx`.
    pub fn new(
        quote: QuoteHandle,
        tenor: Period,
        conventions: &SwapConventions,
        ctx: &EvaluationContext,
    ) -> Result<Self> {
        let calendar = &*conventions.calendar;
        let index = &conventions.index;
        let spot = ctx.settlement_date(calendar, conventions.settlement_days)?;
        let start = calendar.advance(
            spot,
            conventions.forward_start,
            index.business_day_convention(),
            false,
        )?;
        let end = start.add_period(tenor)?;

        let fixed_schedule = ScheduleBuilder::new(
            start,
            end,
            Period::from_frequency(conventions.fixed_frequency)?,
            calendar,
        )
        .with_convention(conventions.fixed_convention)
        .with_termination_convention(conventions.fixed_convention)
        .with_rule(DateGeneration::Backward)
        .build()?;
        let floating_schedule = ScheduleBuilder::new(start, end, index.tenor(), calendar)
            .with_convention(index.business_day_convention())
            .with_termination_convention(index.business_day_convention())
            .with_rule(DateGeneration::Backward)
            .build()?;

        let swap = VanillaSwap::new(
            SwapType::Payer,
            1.0,
            &fixed_schedule,
            0.0,
            Arc::clone(&conventions.fixed_day_counter),
            &floating_schedule,
            Arc::clone(index),
            conventions.spread,
            index.day_counter(),
        )?;
        let Some(pillar_date) = swap.maturity_date() else {
            ck_core::fail!("swap {tenor} has no cash flows");
        };
        Ok(Self {
            quote,
            tenor,
            forward_start: conventions.forward_start,
            swap,
            start_date: start,
            pillar_date,
            forecast: None,
            discount: None,
        })
    }

    /// Project the floating leg on an exogenous curve.
    pub fn with_forecast_curve(mut self, forecast: YieldTermStructureHandle) -> Self {
        self.forecast = Some(forecast);
        self
    }

    /// Discount both legs on an exogenous curve.
    pub fn with_discount_curve(mut self, discount: YieldTermStructureHandle) -> Self {
        self.discount = Some(discount);
        self
    }

    /// The underlying (zero-coupon-rate) swap.
    pub fn swap(&self) -> &VanillaSwap {
        &self.swap
    }

    /// Start of the swap.
    pub fn start_date(&self) -> Date {
        self.start_date
    }
}

impl RateHelper for SwapRateHelper {
    fn pillar_date(&self) -> Date {
        self.pillar_date
    }

    fn earliest_date(&self) -> Date {
        self.start_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        let forecast = self.forecast.as_ref().map(|h| h.current());
        let discount = self.discount.as_ref().map(|h| h.current());
        let forecast: &dyn YieldTermStructure = match &forecast {
            Some(c) => &**c,
            None => curve,
        };
        let discount: &dyn YieldTermStructure = match &discount {
            Some(c) => &**c,
            None => curve,
        };
        self.swap
            .valuation(forecast, discount)
            .map(|v| v.fair_rate)
            .map_err(|e| helper_range_error(&self.description(), e))
    }

    fn description(&self) -> String {
        if self.forward_start.length == 0 {
            format!("swap {}", self.tenor)
        } else {
            format!("swap {}x{}", self.forward_start, self.tenor)
        }
    }
}

// ── Overnight-indexed swaps ───────────────────────────────────────────────────

/// A par OIS rate: annual fixed leg against the compounded overnight rate.
#[derive(Debug)]
pub struct OisRateHelper {
    quote: QuoteHandle,
    label: String,
    swap: VanillaSwap,
    start_date: Date,
    pillar_date: Date,
    discount: Option<YieldTermStructureHandle>,
}

impl OisRateHelper {
    /// OIS of length `tenor` starting `settlement_days` business days after
    /// the evaluation date of `ctx`.
    pub fn new(
        quote: QuoteHandle,
        tenor: Period,
        settlement_days: u32,
        index: Arc<OvernightIndex>,
        ctx: &EvaluationContext,
    ) -> Result<Self> {
        let start = ctx.settlement_date(index.fixing_calendar(), settlement_days)?;
        let end = start.add_period(tenor)?;
        Self::build(quote, format!("OIS {tenor}"), start, end, index)
    }

    /// OIS over explicit start and end dates.
    pub fn dated(
        quote: QuoteHandle,
        start_date: Date,
        end_date: Date,
        index: Arc<OvernightIndex>,
    ) -> Result<Self> {
        let label = format!("OIS {}..{}", start_date.iso(), end_date.iso());
        Self::build(quote, label, start_date, end_date, index)
    }

    fn build(
        quote: QuoteHandle,
        label: String,
        start: Date,
        end: Date,
        index: Arc<OvernightIndex>,
    ) -> Result<Self> {
        ck_core::ensure!(
            end > start,
            "{label}: end ({}) must follow start ({})",
            end.iso(),
            start.iso()
        );
        let schedule = ScheduleBuilder::new(start, end, Period::years(1), index.fixing_calendar())
            .with_convention(BusinessDayConvention::ModifiedFollowing)
            .with_termination_convention(BusinessDayConvention::ModifiedFollowing)
            .with_rule(DateGeneration::Backward)
            .build()?;
        let swap = VanillaSwap::overnight(
            SwapType::Payer,
            1.0,
            &schedule,
            0.0,
            index.day_counter(),
            index,
            0.0,
        )?;
        let Some(pillar_date) = swap.maturity_date() else {
            ck_core::fail!("{label} has no cash flows");
        };
        Ok(Self {
            quote,
            label,
            swap,
            start_date: start,
            pillar_date,
            discount: None,
        })
    }

    /// Discount both legs on an exogenous curve.
    pub fn with_discount_curve(mut self, discount: YieldTermStructureHandle) -> Self {
        self.discount = Some(discount);
        self
    }

    /// The underlying swap.
    pub fn swap(&self) -> &VanillaSwap {
        &self.swap
    }
}

impl RateHelper for OisRateHelper {
    fn pillar_date(&self) -> Date {
        self.pillar_date
    }

    fn earliest_date(&self) -> Date {
        self.start_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        let discount = self.discount.as_ref().map(|h| h.current());
        let discount: &dyn YieldTermStructure = match &discount {
            Some(c) => &**c,
            None => curve,
        };
        self.swap
            .valuation(curve, discount)
            .map(|v| v.fair_rate)
            .map_err(|e| helper_range_error(&self.description(), e))
    }

    fn description(&self) -> String {
        self.label.clone()
    }
}
