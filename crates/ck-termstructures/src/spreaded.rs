//! Spreaded yield curves: a base curve seen through a handle plus a zero
//! spread read from quotes.
//!
//! Nothing is cached. Every query resolves the base handle and the spread
//! quotes, so relinking the base or moving a spread shows up on the next
//! call. The spreaded curve shares the base curve's reference date, day
//! counter and maximum date.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::{YieldTermStructure, YieldTermStructureHandle};
use ck_core::errors::Result;
use ck_core::{Compounding, DiscountFactor, Rate, Real, Spread, Time};
use ck_math::{Interpolation1D, LinearInterpolation};
use ck_quotes::QuoteHandle;
use ck_time::{Date, DayCounter, Frequency, InterestRate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const DT: Time = 1.0e-4;

// ── ZeroSpreadedTermStructure ─────────────────────────────────────────────────

/// Base curve plus a constant zero-yield spread.
///
/// The spread is added to the base zero rate expressed in the spread's
/// compounding convention (continuous by default).
#[derive(Debug)]
pub struct ZeroSpreadedTermStructure {
    base: YieldTermStructureHandle,
    spread: QuoteHandle,
    compounding: Compounding,
    frequency: Frequency,
    extrapolate: AtomicBool,
}

impl ZeroSpreadedTermStructure {
    /// Continuously-compounded spread over `base`.
    pub fn new(base: YieldTermStructureHandle, spread: QuoteHandle) -> Self {
        Self {
            base,
            spread,
            compounding: Compounding::Continuous,
            frequency: Frequency::NoFrequency,
            extrapolate: AtomicBool::new(false),
        }
    }

    /// Spread applied to zero rates quoted under other conventions.
    pub fn with_compounding(
        base: YieldTermStructureHandle,
        spread: QuoteHandle,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        InterestRate::new(0.0, Arc::new(ck_time::Actual365Fixed), compounding, frequency)?;
        Ok(Self {
            compounding,
            frequency,
            ..Self::new(base, spread)
        })
    }

    /// The spread currently quoted.
    pub fn spread(&self) -> Result<Spread> {
        self.spread.current().checked_value()
    }

    /// Handle to the base curve.
    pub fn base(&self) -> &YieldTermStructureHandle {
        &self.base
    }
}

impl TermStructure for ZeroSpreadedTermStructure {
    fn reference_date(&self) -> Date {
        self.base.current().reference_date()
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.base.current().day_counter()
    }

    fn max_date(&self) -> Date {
        self.base.current().max_date()
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate.load(Ordering::Acquire) || self.base.current().allows_extrapolation()
    }

    fn enable_extrapolation(&self, flag: bool) {
        self.extrapolate.store(flag, Ordering::Release);
    }
}

impl YieldTermStructure for ZeroSpreadedTermStructure {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        Ok((-self.zero_yield_impl(t)? * t).exp())
    }

    fn zero_yield_impl(&self, t: Time) -> Result<Rate> {
        let base = self.base.current();
        let spread = self.spread()?;
        if self.compounding == Compounding::Continuous {
            return Ok(base.zero_yield_impl(t)? + spread);
        }
        let t = if t == 0.0 { DT } else { t };
        let zero = base.implied_zero(t, self.compounding, self.frequency)?;
        InterestRate::new(
            zero.rate() + spread,
            base.day_counter(),
            self.compounding,
            self.frequency,
        )?
        .equivalent_rate_time(Compounding::Continuous, Frequency::NoFrequency, t)
        .map(|r| r.rate())
    }

    fn forward_impl(&self, t: Time) -> Result<Rate> {
        if self.compounding == Compounding::Continuous {
            return Ok(self.base.current().forward_impl(t)? + self.spread()?);
        }
        let t1 = (t - DT / 2.0).max(0.0);
        let t2 = t1 + DT;
        Ok((self.zero_yield_impl(t2)? * t2 - self.zero_yield_impl(t1)? * t1) / DT)
    }
}

// ── InterpolatedSpreadedTermStructure ─────────────────────────────────────────

/// Base curve plus a term structure of continuously-compounded zero
/// spreads.
///
/// Spreads are quoted at dates, interpolated linearly in time between them
/// and held flat before the first and after the last.
#[derive(Debug)]
pub struct InterpolatedSpreadedTermStructure {
    base: YieldTermStructureHandle,
    spreads: Vec<(Date, QuoteHandle)>,
    extrapolate: AtomicBool,
}

impl InterpolatedSpreadedTermStructure {
    /// Spreads at strictly increasing dates over `base`.
    pub fn new(base: YieldTermStructureHandle, spreads: Vec<(Date, QuoteHandle)>) -> Result<Self> {
        ck_core::ensure!(!spreads.is_empty(), "at least one spread is required");
        for pair in spreads.windows(2) {
            ck_core::ensure!(
                pair[0].0 < pair[1].0,
                "spread dates must be increasing: {} then {}",
                pair[0].0.iso(),
                pair[1].0.iso()
            );
        }
        Ok(Self {
            base,
            spreads,
            extrapolate: AtomicBool::new(false),
        })
    }

    /// The spread in force at `date`.
    pub fn spread(&self, date: Date) -> Result<Spread> {
        let t = self.base.current().time_from_reference(date);
        Ok(self.spread_at(t)?.0)
    }

    /// Handle to the base curve.
    pub fn base(&self) -> &YieldTermStructureHandle {
        &self.base
    }

    // Spread and its time derivative at `t`.
    fn spread_at(&self, t: Time) -> Result<(Spread, Real)> {
        let base = self.base.current();
        let times: Vec<Time> = self
            .spreads
            .iter()
            .map(|(d, _)| base.time_from_reference(*d))
            .collect();
        let values = self
            .spreads
            .iter()
            .map(|(_, q)| q.current().checked_value())
            .collect::<Result<Vec<_>>>()?;
        let last = values.len() - 1;
        if t <= times[0] || last == 0 {
            return Ok((values[0], 0.0));
        }
        if t >= times[last] {
            return Ok((values[last], 0.0));
        }
        let line = LinearInterpolation::new(&times, &values)?;
        Ok((line.value(t), line.derivative(t)))
    }
}

impl TermStructure for InterpolatedSpreadedTermStructure {
    fn reference_date(&self) -> Date {
        self.base.current().reference_date()
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.base.current().day_counter()
    }

    fn max_date(&self) -> Date {
        self.base.current().max_date()
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate.load(Ordering::Acquire) || self.base.current().allows_extrapolation()
    }

    fn enable_extrapolation(&self, flag: bool) {
        self.extrapolate.store(flag, Ordering::Release);
    }
}

impl YieldTermStructure for InterpolatedSpreadedTermStructure {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        Ok((-self.zero_yield_impl(t)? * t).exp())
    }

    fn zero_yield_impl(&self, t: Time) -> Result<Rate> {
        Ok(self.base.current().zero_yield_impl(t)? + self.spread_at(t)?.0)
    }

    // d/dt [t * (z(t) + s(t))] = f(t) + s(t) + t * s'(t)
    fn forward_impl(&self, t: Time) -> Result<Rate> {
        let (spread, slope) = self.spread_at(t)?;
        Ok(self.base.current().forward_impl(t)? + spread + t * slope)
    }
}
