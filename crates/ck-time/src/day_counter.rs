//! `DayCounter` trait and the supported day-count conventions.
//!
//! A day counter computes the **day count fraction** (the fraction of a year
//! between two dates) used when discounting or accruing interest.
//!
//! | type | conventions |
//! |------|-------------|
//! | [`Actual360`] | Actual/360 |
//! | [`Actual365Fixed`] | Actual/365 (Fixed) |
//! | [`Thirty360`] | 30/360 USA, Bond Basis, European |
//! | [`ActualActual`] | Actual/Actual ISMA, ISDA |

use crate::date::{is_leap_year, Date};
use crate::period::Period;
use ck_core::errors::{Error, Result};
use ck_core::{Real, Time};
use tracing::warn;

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name of this convention (e.g. `"Actual/365 (Fixed)"`).
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2` according to this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64;

    /// Fraction of a year between `d1` and `d2`.
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;

    /// Fraction of a year between `d1` and `d2` within the coupon period
    /// `[ref_start, ref_end]`.
    ///
    /// Only conventions with irregular-period semantics (Actual/Actual ISMA)
    /// look at the reference period; the default ignores it.
    fn year_fraction_with_ref(
        &self,
        d1: Date,
        d2: Date,
        _ref_start: Date,
        _ref_end: Date,
    ) -> Time {
        self.year_fraction(d1, d2)
    }
}

fn actual_days(d1: Date, d2: Date) -> i64 {
    (d2.serial() - d1.serial()) as i64
}

// ── Actual/365 and Actual/360 ────────────────────────────────────────────────

/// Actual/365 (Fixed) day counter.
///
/// `year_fraction = actual_days / 365`
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        actual_days(d1, d2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 365.0
    }
}

/// Actual/360 day counter.
///
/// `year_fraction = actual_days / 360`
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        actual_days(d1, d2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

// ── 30/360 ────────────────────────────────────────────────────────────────────

/// End-of-month rules of the 30/360 family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Thirty360Convention {
    /// 30/360 US: the 31st and the last day of February count as the 30th.
    Usa,
    /// ISDA bond basis: `D1 = 31 → 30`; `D2 = 31 → 30` only if `D1 ≥ 30`.
    #[default]
    BondBasis,
    /// 30E/360 (Eurobond basis): every 31st counts as the 30th.
    European,
}

/// Thirty/360 day counter.
///
/// `day_count = 360(Y2−Y1) + 30(M2−M1) + (D2−D1)` after the end-of-month
/// adjustments of the chosen [`Thirty360Convention`]. Under the US and bond
/// basis rules the 30th to the 31st of the same month counts zero days.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360 {
    /// End-of-month rule.
    pub convention: Thirty360Convention,
}

impl Thirty360 {
    /// Create a 30/360 day counter with the given convention.
    pub fn new(convention: Thirty360Convention) -> Self {
        Self { convention }
    }

    /// Return `true` when the pair hits the "30th to 31st" degenerate case,
    /// where the 30/360 fraction is zero although calendar time elapses.
    pub fn is_end_of_month_anomaly(&self, d1: Date, d2: Date) -> bool {
        d1 < d2
            && d1.year() == d2.year()
            && d1.month() == d2.month()
            && d2.day_of_month() == 31
            && d1.day_of_month() == 30
            && self.day_count(d1, d2) == 0
    }
}

fn is_last_of_february(d: Date) -> bool {
    d.month() == 2 && d.is_end_of_month()
}

impl DayCounter for Thirty360 {
    fn name(&self) -> &str {
        match self.convention {
            Thirty360Convention::Usa => "30/360 (US)",
            Thirty360Convention::BondBasis => "30/360 (Bond Basis)",
            Thirty360Convention::European => "30E/360 (Eurobond Basis)",
        }
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        let (y1, m1) = (d1.year() as i64, d1.month() as i64);
        let (y2, m2) = (d2.year() as i64, d2.month() as i64);
        let mut dd1 = d1.day_of_month() as i64;
        let mut dd2 = d2.day_of_month() as i64;

        match self.convention {
            Thirty360Convention::Usa => {
                if dd1 == 31 {
                    dd1 = 30;
                }
                if dd2 == 31 && dd1 >= 30 {
                    dd2 = 30;
                }
                if is_last_of_february(d1) {
                    if is_last_of_february(d2) {
                        dd2 = 30;
                    }
                    dd1 = 30;
                }
            }
            Thirty360Convention::BondBasis => {
                if dd1 == 31 {
                    dd1 = 30;
                }
                if dd2 == 31 && dd1 == 30 {
                    dd2 = 30;
                }
            }
            Thirty360Convention::European => {
                dd1 = dd1.min(30);
                dd2 = dd2.min(30);
            }
        }

        360 * (y2 - y1) + 30 * (m2 - m1) + (dd2 - dd1)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

// ── Actual/Actual ─────────────────────────────────────────────────────────────

/// Variants of the Actual/Actual family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActualActualConvention {
    /// ISMA / ICMA: fraction of the enclosing coupon period.
    #[default]
    Isma,
    /// ISDA: days in leap years over 366 plus days in other years over 365.
    Isda,
}

/// Actual/Actual day counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActual {
    /// Which Actual/Actual rule to apply.
    pub convention: ActualActualConvention,
}

impl ActualActual {
    /// Create an Actual/Actual day counter with the given convention.
    pub fn new(convention: ActualActualConvention) -> Self {
        Self { convention }
    }

    /// Year fraction against a reference coupon period, failing on a
    /// reference period ISMA cannot use.
    pub fn checked_year_fraction(
        &self,
        d1: Date,
        d2: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> Result<Time> {
        match self.convention {
            ActualActualConvention::Isda => Ok(Self::isda(d1, d2)),
            ActualActualConvention::Isma => Self::isma(d1, d2, ref_start, ref_end),
        }
    }

    fn isda(d1: Date, d2: Date) -> Time {
        if d1 == d2 {
            return 0.0;
        }
        if d1 > d2 {
            return -Self::isda(d2, d1);
        }
        let days_in_year = |y: u16| if is_leap_year(y) { 366.0 } else { 365.0 };
        let (y1, y2) = (d1.year(), d2.year());
        // Days from d1 to Jan 1 of the next year, and from Jan 1 of y2 to d2.
        let head = (days_in_year(y1) - d1.day_of_year() as Real + 1.0) / days_in_year(y1);
        let tail = (d2.day_of_year() as Real - 1.0) / days_in_year(y2);
        (y2 - y1) as Real - 1.0 + head + tail
    }

    fn isma(d1: Date, d2: Date, ref_start: Date, ref_end: Date) -> Result<Time> {
        if d1 == d2 {
            return Ok(0.0);
        }
        if d1 > d2 {
            return Ok(-Self::isma(d2, d1, ref_start, ref_end)?);
        }
        ck_core::ensure!(
            ref_end > ref_start && ref_end > d1,
            "invalid reference period [{ref_start}, {ref_end}] for {d1}"
        );

        let mut ref_start = ref_start;
        let mut ref_end = ref_end;
        // Rough length of the reference period in months.
        let mut months = (12.0 * (ref_end - ref_start) as Real / 365.0).round() as i32;
        if months == 0 {
            ref_start = d1;
            ref_end = d1.add_period(Period::years(1))?;
            months = 12;
        }
        let period = months as Real / 12.0;

        if d2 <= ref_end {
            if d1 >= ref_start {
                // ref_start <= d1 <= d2 <= ref_end
                return Ok(period * (d2 - d1) as Real / (ref_end - ref_start) as Real);
            }
            // Long first coupon: d1 precedes the reference period.
            let previous_ref = ref_start.add_period(Period::months(-months))?;
            if d2 > ref_start {
                return Ok(Self::isma(d1, ref_start, previous_ref, ref_start)?
                    + Self::isma(ref_start, d2, ref_start, ref_end)?);
            }
            return Self::isma(d1, d2, previous_ref, ref_start);
        }

        // Long last coupon: ref_start <= d1 < ref_end < d2.
        if ref_start > d1 {
            return Err(Error::InvalidArgument(format!(
                "invalid dates: {d1} < {ref_start} < {ref_end} < {d2}"
            )));
        }
        let mut sum = Self::isma(d1, ref_end, ref_start, ref_end)?;
        let mut i = 0;
        loop {
            let new_start = ref_end.add_period(Period::months(months * i))?;
            let new_end = ref_end.add_period(Period::months(months * (i + 1)))?;
            if d2 < new_end {
                sum += Self::isma(new_start, d2, new_start, new_end)?;
                return Ok(sum);
            }
            sum += period;
            i += 1;
        }
    }
}

impl DayCounter for ActualActual {
    fn name(&self) -> &str {
        match self.convention {
            ActualActualConvention::Isma => "Actual/Actual (ISMA)",
            ActualActualConvention::Isda => "Actual/Actual (ISDA)",
        }
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        actual_days(d1, d2)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        match self.convention {
            ActualActualConvention::Isda => Self::isda(d1, d2),
            // Without a coupon schedule the dates are their own period.
            ActualActualConvention::Isma => self.year_fraction_with_ref(d1, d2, d1, d2),
        }
    }

    /// Falls back to ISDA, with a warning, when the ISMA reference period
    /// is unusable. Use [`ActualActual::checked_year_fraction`] to get the
    /// error instead.
    fn year_fraction_with_ref(&self, d1: Date, d2: Date, ref_start: Date, ref_end: Date) -> Time {
        self.checked_year_fraction(d1, d2, ref_start, ref_end)
            .unwrap_or_else(|e| {
                warn!(error = %e, %d1, %d2, "ISMA fraction failed, using ISDA");
                Self::isda(d1, d2)
            })
    }
}
