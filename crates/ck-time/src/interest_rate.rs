//! Interest rate with compounding and day-counting conventions.
//!
//! An `InterestRate` bundles a rate value with a `DayCounter`, a
//! `Compounding` convention and a `Frequency`.  It can compute compound
//! factors, discount factors, equivalent rates and implied rates.

use crate::date::Date;
use crate::day_counter::DayCounter;
use crate::period::Frequency;
use ck_core::errors::{Error, Result};
use ck_core::{Compounding, Real, Time};
use std::sync::Arc;

/// An interest rate with associated compounding and day-counting conventions.
#[derive(Debug, Clone)]
pub struct InterestRate {
    rate: Real,
    dc: Arc<dyn DayCounter>,
    compounding: Compounding,
    frequency: Frequency,
}

impl InterestRate {
    /// Create a new interest rate.
    ///
    /// # Arguments
    /// * `rate`: the annual rate as a decimal (e.g. 0.05 = 5%)
    /// * `dc`: day counter for year-fraction calculations
    /// * `compounding`: compounding convention
    /// * `frequency`: compounding frequency (ignored for Simple and Continuous)
    pub fn new(
        rate: Real,
        dc: Arc<dyn DayCounter>,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        if needs_frequency(compounding) {
            ck_core::ensure!(
                frequency.periods_per_year().unwrap_or(0) > 0,
                "{compounding} compounding requires a periodic frequency, got {frequency}"
            );
        }
        Ok(Self {
            rate,
            dc,
            compounding,
            frequency,
        })
    }

    /// The rate value.
    pub fn rate(&self) -> Real {
        self.rate
    }

    /// The day counter.
    pub fn day_counter(&self) -> &dyn DayCounter {
        &*self.dc
    }

    /// The compounding convention.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// The compounding frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Compound factor for a given time period `t` (in years).
    pub fn compound_factor_time(&self, t: Time) -> Result<Real> {
        ck_core::ensure!(t >= 0.0, "negative time ({t}) not allowed");
        if t == 0.0 {
            return Ok(1.0);
        }
        let r = self.rate;
        let f = freq_value(self.frequency);
        let factor = match self.compounding {
            Compounding::Simple => 1.0 + r * t,
            Compounding::Compounded => (1.0 + r / f).powf(f * t),
            Compounding::Continuous => (r * t).exp(),
            Compounding::SimpleThenCompounded => {
                if t <= 1.0 / f {
                    1.0 + r * t
                } else {
                    (1.0 + r / f).powf(f * t)
                }
            }
            Compounding::CompoundedThenSimple => {
                if t <= 1.0 / f {
                    (1.0 + r / f).powf(f * t)
                } else {
                    1.0 + r * t
                }
            }
        };
        ck_core::ensure!(factor > 0.0, "non-positive compound factor {factor} for {self}");
        Ok(factor)
    }

    /// Compound factor between two dates.
    pub fn compound_factor(&self, d1: Date, d2: Date) -> Result<Real> {
        self.compound_factor_time(self.dc.year_fraction(d1, d2))
    }

    /// Discount factor for a given time period `t` (in years).
    pub fn discount_factor_time(&self, t: Time) -> Result<Real> {
        Ok(1.0 / self.compound_factor_time(t)?)
    }

    /// Discount factor between two dates.
    pub fn discount_factor(&self, d1: Date, d2: Date) -> Result<Real> {
        Ok(1.0 / self.compound_factor(d1, d2)?)
    }

    /// The rate equivalent to this one under other conventions over `t`.
    pub fn equivalent_rate_time(
        &self,
        comp: Compounding,
        freq: Frequency,
        t: Time,
    ) -> Result<InterestRate> {
        Self::implied_rate_time(
            self.compound_factor_time(t)?,
            Arc::clone(&self.dc),
            comp,
            freq,
            t,
        )
    }

    /// Implied rate from a compound factor observed over time `t`.
    pub fn implied_rate_time(
        compound: Real,
        dc: Arc<dyn DayCounter>,
        comp: Compounding,
        freq: Frequency,
        t: Time,
    ) -> Result<InterestRate> {
        if !(compound > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "compound factor must be positive, got {compound}"
            )));
        }
        let f = freq_value(freq);
        let compounded = |c: Real| (c.powf(1.0 / (f * t)) - 1.0) * f;
        let r = if compound == 1.0 {
            ck_core::ensure!(t >= 0.0, "negative time ({t}) not allowed");
            0.0
        } else {
            ck_core::ensure!(t > 0.0, "non-positive time ({t}) not allowed");
            match comp {
                Compounding::Simple => (compound - 1.0) / t,
                Compounding::Compounded => compounded(compound),
                Compounding::Continuous => compound.ln() / t,
                Compounding::SimpleThenCompounded => {
                    if t <= 1.0 / f {
                        (compound - 1.0) / t
                    } else {
                        compounded(compound)
                    }
                }
                Compounding::CompoundedThenSimple => {
                    if t <= 1.0 / f {
                        compounded(compound)
                    } else {
                        (compound - 1.0) / t
                    }
                }
            }
        };
        InterestRate::new(r, dc, comp, freq)
    }

    /// Implied rate from a compound factor observed between two dates.
    pub fn implied_rate(
        compound: Real,
        dc: Arc<dyn DayCounter>,
        comp: Compounding,
        freq: Frequency,
        d1: Date,
        d2: Date,
    ) -> Result<InterestRate> {
        let t = dc.year_fraction(d1, d2);
        Self::implied_rate_time(compound, dc, comp, freq, t)
    }
}

fn needs_frequency(comp: Compounding) -> bool {
    !matches!(comp, Compounding::Simple | Compounding::Continuous)
}

fn freq_value(freq: Frequency) -> Real {
    match freq.periods_per_year() {
        Some(n) if n > 0 => n as Real,
        _ => 1.0,
    }
}

impl std::fmt::Display for InterestRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4}% {} {} {}",
            self.rate * 100.0,
            self.compounding,
            self.frequency,
            self.dc.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_counter::Actual365Fixed;
    use approx::assert_abs_diff_eq;

    fn rate(r: Real, comp: Compounding, freq: Frequency) -> InterestRate {
        InterestRate::new(r, Arc::new(Actual365Fixed), comp, freq).unwrap()
    }

    #[test]
    fn simple_compound_factor() {
        let ir = rate(0.05, Compounding::Simple, Frequency::Annual);
        assert_abs_diff_eq!(ir.compound_factor_time(1.0).unwrap(), 1.05, epsilon = 1e-12);
        assert_abs_diff_eq!(ir.compound_factor_time(2.0).unwrap(), 1.10, epsilon = 1e-12);
    }

    #[test]
    fn compounded_semiannual() {
        let ir = rate(0.10, Compounding::Compounded, Frequency::Semiannual);
        assert_abs_diff_eq!(ir.compound_factor_time(1.0).unwrap(), 1.1025, epsilon = 1e-12);
    }

    #[test]
    fn continuous_factor() {
        let ir = rate(0.05, Compounding::Continuous, Frequency::NoFrequency);
        assert_abs_diff_eq!(
            ir.compound_factor_time(1.0).unwrap(),
            0.05_f64.exp(),
            epsilon = 1e-12
        );
        assert_eq!(ir.compound_factor_time(0.0).unwrap(), 1.0);
        assert!(ir.compound_factor_time(-1.0).is_err());
    }

    #[test]
    fn compounded_requires_frequency() {
        assert!(InterestRate::new(
            0.05,
            Arc::new(Actual365Fixed),
            Compounding::Compounded,
            Frequency::NoFrequency
        )
        .is_err());
    }

    #[test]
    fn equivalent_rate_roundtrip() {
        let ir = rate(0.05, Compounding::Compounded, Frequency::Annual);
        let cont = ir
            .equivalent_rate_time(Compounding::Continuous, Frequency::NoFrequency, 1.0)
            .unwrap();
        assert_abs_diff_eq!(cont.rate(), 1.05_f64.ln(), epsilon = 1e-12);
        let back = cont
            .equivalent_rate_time(Compounding::Compounded, Frequency::Annual, 1.0)
            .unwrap();
        assert_abs_diff_eq!(back.rate(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn implied_rate_rejects_bad_factor() {
        let dc: Arc<dyn DayCounter> = Arc::new(Actual365Fixed);
        assert!(InterestRate::implied_rate_time(
            -1.0,
            dc,
            Compounding::Simple,
            Frequency::Annual,
            1.0
        )
        .is_err());
    }
}
