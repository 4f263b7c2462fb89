//! `TermStructure`: base trait for all term structures.
//!
//! Every term structure has a **reference date**, a **day counter**, and a
//! **maximum date**. Queries are range-checked against `[reference date,
//! max date]`; past the maximum date they fail with
//! [`Error::Extrapolation`] unless extrapolation has been enabled.

use ck_core::errors::{Error, Result};
use ck_core::Time;
use ck_time::{Date, DayCounter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Base trait for all term structures.
pub trait TermStructure: std::fmt::Debug + Send + Sync {
    /// The date at which discount = 1.0 and from which time is measured.
    fn reference_date(&self) -> Date;

    /// The day counter used for date → time-fraction conversions.
    fn day_counter(&self) -> Arc<dyn DayCounter>;

    /// The latest date for which the curve can be used.
    fn max_date(&self) -> Date;

    /// Whether queries past [`max_date`](TermStructure::max_date) are allowed.
    fn allows_extrapolation(&self) -> bool;

    /// Allow or forbid queries past the maximum date.
    fn enable_extrapolation(&self, flag: bool);

    /// The latest time for which the curve can be used.
    fn max_time(&self) -> Time {
        self.time_from_reference(self.max_date())
    }

    /// Convert a date to a year fraction relative to the reference date.
    fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter()
            .year_fraction(self.reference_date(), date)
    }

    /// Fail unless `t` is a valid query time.
    fn check_range(&self, t: Time) -> Result<()> {
        if t < 0.0 {
            return Err(Error::Extrapolation(format!(
                "negative time ({t}) given"
            )));
        }
        if !self.allows_extrapolation() && t > self.max_time() {
            return Err(Error::Extrapolation(format!(
                "time ({t}) is past max curve time ({}) at {}",
                self.max_time(),
                self.max_date().iso()
            )));
        }
        Ok(())
    }

    /// Fail unless `date` is a valid query date; return its time.
    fn check_date(&self, date: Date) -> Result<Time> {
        let reference = self.reference_date();
        if date < reference {
            return Err(Error::Extrapolation(format!(
                "date ({}) before reference date ({})",
                date.iso(),
                reference.iso()
            )));
        }
        if !self.allows_extrapolation() && date > self.max_date() {
            return Err(Error::Extrapolation(format!(
                "date ({}) is past max curve date ({})",
                date.iso(),
                self.max_date().iso()
            )));
        }
        Ok(self.time_from_reference(date))
    }
}

// ── Helpers for concrete term structures ──────────────────────────────────────

/// Common data shared by most term-structure implementations.
#[derive(Debug)]
pub struct TermStructureData {
    /// Reference date.
    pub reference_date: Date,
    /// Day counter for time calculations.
    pub day_counter: Arc<dyn DayCounter>,
    extrapolate: AtomicBool,
}

impl TermStructureData {
    /// Create a new data bundle with extrapolation disabled.
    pub fn new(reference_date: Date, day_counter: Arc<dyn DayCounter>) -> Self {
        Self {
            reference_date,
            day_counter,
            extrapolate: AtomicBool::new(false),
        }
    }

    /// Current extrapolation flag.
    pub fn allows_extrapolation(&self) -> bool {
        self.extrapolate.load(Ordering::Acquire)
    }

    /// Set the extrapolation flag.
    pub fn enable_extrapolation(&self, flag: bool) {
        self.extrapolate.store(flag, Ordering::Release);
    }

    /// Year fraction from the reference date.
    pub fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter.year_fraction(self.reference_date, date)
    }
}
