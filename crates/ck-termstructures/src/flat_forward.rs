//! `FlatForward`: a yield curve with a single rate for all maturities.
//!
//! The rate is read from a quote handle on every query, so a curve built on
//! a [`SimpleQuote`](ck_quotes::SimpleQuote) follows the quote without being
//! rebuilt.

use crate::term_structure::{TermStructure, TermStructureData};
use crate::yield_term_structure::YieldTermStructure;
use ck_core::errors::Result;
use ck_core::{Compounding, DiscountFactor, Rate, Real, Time};
use ck_quotes::{Quote, QuoteHandle, SimpleQuote};
use ck_time::{Date, DayCounter, Frequency, InterestRate};
use std::sync::Arc;

/// A flat yield term structure.
///
/// Discount factors are `1 / (1 + r)^t` in the quoted conventions; with
/// continuous compounding the instantaneous forward is `r` everywhere.
#[derive(Debug)]
pub struct FlatForward {
    data: TermStructureData,
    rate: QuoteHandle,
    compounding: Compounding,
    frequency: Frequency,
}

impl FlatForward {
    /// Flat curve at a fixed rate quoted under `compounding` / `frequency`.
    pub fn new(
        reference_date: Date,
        rate: Rate,
        day_counter: Arc<dyn DayCounter>,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        let quote: Arc<dyn Quote> = Arc::new(SimpleQuote::named("flat rate", rate));
        Self::with_quote(
            reference_date,
            QuoteHandle::new(quote),
            day_counter,
            compounding,
            frequency,
        )
    }

    /// Flat curve at a continuously-compounded rate.
    pub fn continuous(
        reference_date: Date,
        rate: Rate,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        Self::new(
            reference_date,
            rate,
            day_counter,
            Compounding::Continuous,
            Frequency::NoFrequency,
        )
    }

    /// Flat curve following a live quote.
    pub fn with_quote(
        reference_date: Date,
        rate: QuoteHandle,
        day_counter: Arc<dyn DayCounter>,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        // Validates the compounding/frequency pair once.
        InterestRate::new(0.0, day_counter.clone(), compounding, frequency)?;
        Ok(Self {
            data: TermStructureData::new(reference_date, day_counter),
            rate,
            compounding,
            frequency,
        })
    }

    /// The rate currently quoted, in the curve's conventions.
    pub fn rate(&self) -> Result<InterestRate> {
        let r = self.rate.current().checked_value()?;
        InterestRate::new(
            r,
            self.data.day_counter.clone(),
            self.compounding,
            self.frequency,
        )
    }
}

impl TermStructure for FlatForward {
    fn reference_date(&self) -> Date {
        self.data.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.data.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }

    fn allows_extrapolation(&self) -> bool {
        self.data.allows_extrapolation()
    }

    fn enable_extrapolation(&self, flag: bool) {
        self.data.enable_extrapolation(flag);
    }
}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        self.rate()?.discount_factor_time(t)
    }

    // -d ln P / dt in closed form for every compounding convention.
    fn forward_impl(&self, t: Time) -> Result<Rate> {
        let ir = self.rate()?;
        let r = ir.rate();
        let f = ir
            .frequency()
            .periods_per_year()
            .filter(|&n| n > 0)
            .map_or(1.0, |n| n as Real);
        let simple = r / (1.0 + r * t);
        let compounded = f * (1.0 + r / f).ln();
        Ok(match ir.compounding() {
            Compounding::Continuous => r,
            Compounding::Simple => simple,
            Compounding::Compounded => compounded,
            Compounding::SimpleThenCompounded => {
                if t <= 1.0 / f {
                    simple
                } else {
                    compounded
                }
            }
            Compounding::CompoundedThenSimple => {
                if t <= 1.0 / f {
                    compounded
                } else {
                    simple
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ck_time::Actual365Fixed;

    fn reference() -> Date {
        Date::from_ymd(2025, 1, 2).unwrap()
    }

    #[test]
    fn continuous_discount() {
        let curve = FlatForward::continuous(reference(), 0.05, Arc::new(Actual365Fixed)).unwrap();
        assert_eq!(curve.discount_t(0.0).unwrap(), 1.0);
        assert_abs_diff_eq!(curve.discount_t(1.0).unwrap(), (-0.05_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(curve.discount_t(10.0).unwrap(), (-0.5_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(curve.instantaneous_forward(3.0).unwrap(), 0.05, epsilon = 1e-15);
    }

    #[test]
    fn zero_rate_round_trips_conventions() {
        let curve = FlatForward::new(
            reference(),
            0.04,
            Arc::new(Actual365Fixed),
            Compounding::Compounded,
            Frequency::Annual,
        )
        .unwrap();
        let zero = curve
            .zero_rate_t(2.0, Compounding::Compounded, Frequency::Annual)
            .unwrap();
        assert_abs_diff_eq!(zero.rate(), 0.04, epsilon = 1e-12);
        let cont = curve
            .zero_rate_t(2.0, Compounding::Continuous, Frequency::NoFrequency)
            .unwrap();
        assert_abs_diff_eq!(cont.rate(), 1.04_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(curve.instantaneous_forward(2.0).unwrap(), 1.04_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn analytic_forward_matches_finite_difference() {
        let curve = FlatForward::new(
            reference(),
            0.03,
            Arc::new(Actual365Fixed),
            Compounding::Simple,
            Frequency::Annual,
        )
        .unwrap();
        let t = 1.5;
        let h = 1e-5;
        let numeric = (curve.discount_t(t - h).unwrap().ln() - curve.discount_t(t + h).unwrap().ln()) / (2.0 * h);
        assert_abs_diff_eq!(curve.instantaneous_forward(t).unwrap(), numeric, epsilon = 1e-8);
    }

    #[test]
    fn follows_its_quote() {
        let (quote, handle) = SimpleQuote::shared("flat", 0.02);
        let curve = FlatForward::with_quote(
            reference(),
            handle,
            Arc::new(Actual365Fixed),
            Compounding::Continuous,
            Frequency::NoFrequency,
        )
        .unwrap();
        assert_abs_diff_eq!(curve.discount_t(1.0).unwrap(), (-0.02_f64).exp(), epsilon = 1e-15);
        quote.set_value(0.03);
        assert_abs_diff_eq!(curve.discount_t(1.0).unwrap(), (-0.03_f64).exp(), epsilon = 1e-15);
        quote.reset();
        assert!(curve.discount_t(1.0).is_err());
    }

    #[test]
    fn dates_before_reference_are_rejected() {
        let curve = FlatForward::continuous(reference(), 0.05, Arc::new(Actual365Fixed)).unwrap();
        let before = Date::from_ymd(2024, 12, 31).unwrap();
        assert!(matches!(
            curve.discount(before),
            Err(ck_core::Error::Extrapolation(_))
        ));
    }
}
