//! `YieldTermStructure`: discount factors, zero rates and forward rates.
//!
//! Concrete curves implement the unchecked `*_impl` hooks in terms of time;
//! the public queries check the requested range first and then express the
//! result under the caller's compounding conventions.

use crate::term_structure::TermStructure;
use ck_core::errors::Result;
use ck_core::{Compounding, DiscountFactor, Handle, Rate, Real, RelinkableHandle, Time};
use ck_time::{Date, Frequency, InterestRate};

/// Small time step used when a zero or forward rate degenerates to an
/// instantaneous one.
const DT: Real = 1.0e-4;

/// A yield (interest-rate) term structure.
///
/// Implementors must provide [`discount_impl`](YieldTermStructure::discount_impl)
/// and should override [`forward_impl`](YieldTermStructure::forward_impl)
/// whenever the forward is known analytically.
pub trait YieldTermStructure: TermStructure {
    // ── Low-level impl hooks (no range check) ────────────────────────────

    /// Discount factor for time `t`.
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor>;

    /// Continuously-compounded zero yield for time `t`.
    fn zero_yield_impl(&self, t: Time) -> Result<Rate> {
        if t == 0.0 {
            return self.forward_impl(0.0);
        }
        Ok(-self.discount_impl(t)?.ln() / t)
    }

    /// Instantaneous forward rate at time `t`.
    ///
    /// Default: central difference of `ln P`.
    fn forward_impl(&self, t: Time) -> Result<Rate> {
        let t1 = (t - DT / 2.0).max(0.0);
        let t2 = t1 + DT;
        let df1 = self.discount_impl(t1)?;
        let df2 = self.discount_impl(t2)?;
        Ok((df1.ln() - df2.ln()) / (t2 - t1))
    }

    // ── Public interface ─────────────────────────────────────────────────

    /// Discount factor for a date.
    fn discount(&self, date: Date) -> Result<DiscountFactor> {
        let t = self.check_date(date)?;
        self.discount_impl(t)
    }

    /// Discount factor for a time.
    fn discount_t(&self, t: Time) -> Result<DiscountFactor> {
        self.check_range(t)?;
        self.discount_impl(t)
    }

    /// Zero rate from the reference date to `date`, measured with the
    /// curve's own day counter.
    fn zero_rate(&self, date: Date, comp: Compounding, freq: Frequency) -> Result<InterestRate> {
        let t = self.check_date(date)?;
        self.implied_zero(t, comp, freq)
    }

    /// Zero rate for time `t`.
    fn zero_rate_t(&self, t: Time, comp: Compounding, freq: Frequency) -> Result<InterestRate> {
        self.check_range(t)?;
        self.implied_zero(t, comp, freq)
    }

    /// Forward rate between two dates, measured with the curve's own day
    /// counter. Equal dates give the instantaneous forward.
    fn forward_rate(
        &self,
        d1: Date,
        d2: Date,
        comp: Compounding,
        freq: Frequency,
    ) -> Result<InterestRate> {
        ck_core::ensure!(
            d1 <= d2,
            "forward start ({}) later than forward end ({})",
            d1.iso(),
            d2.iso()
        );
        let t1 = self.check_date(d1)?;
        let t2 = self.check_date(d2)?;
        self.implied_forward(t1, t2, comp, freq)
    }

    /// Forward rate between two times.
    fn forward_rate_t(
        &self,
        t1: Time,
        t2: Time,
        comp: Compounding,
        freq: Frequency,
    ) -> Result<InterestRate> {
        ck_core::ensure!(t1 <= t2, "forward start ({t1}) later than forward end ({t2})");
        self.check_range(t1)?;
        self.check_range(t2)?;
        self.implied_forward(t1, t2, comp, freq)
    }

    /// Instantaneous continuously-compounded forward at time `t`.
    fn instantaneous_forward(&self, t: Time) -> Result<Rate> {
        self.check_range(t)?;
        self.forward_impl(t)
    }

    // ── Shared conversions (range already checked) ───────────────────────

    /// Zero rate at `t` expressed under the given conventions.
    fn implied_zero(&self, t: Time, comp: Compounding, freq: Frequency) -> Result<InterestRate> {
        let dc = self.day_counter();
        if t == 0.0 {
            let compound = 1.0 / self.discount_impl(DT)?;
            return InterestRate::implied_rate_time(compound, dc, comp, freq, DT);
        }
        let compound = 1.0 / self.discount_impl(t)?;
        InterestRate::implied_rate_time(compound, dc, comp, freq, t)
    }

    /// Forward rate over `[t1, t2]` expressed under the given conventions.
    fn implied_forward(
        &self,
        t1: Time,
        t2: Time,
        comp: Compounding,
        freq: Frequency,
    ) -> Result<InterestRate> {
        let dc = self.day_counter();
        if t2 == t1 {
            let compound = (self.forward_impl(t1)? * DT).exp();
            return InterestRate::implied_rate_time(compound, dc, comp, freq, DT);
        }
        let compound = self.discount_impl(t1)? / self.discount_impl(t2)?;
        InterestRate::implied_rate_time(compound, dc, comp, freq, t2 - t1)
    }
}

/// Read-only handle to a yield curve.
pub type YieldTermStructureHandle = Handle<dyn YieldTermStructure>;

/// Handle to a yield curve that can be re-pointed at another curve.
pub type RelinkableYieldTermStructureHandle = RelinkableHandle<dyn YieldTermStructure>;
