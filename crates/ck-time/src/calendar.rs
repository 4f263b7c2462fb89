//! Business-day conventions, the `Calendar` trait and the two trivial
//! calendars.

use crate::date::{Date, Weekday};
use crate::period::{Period, TimeUnit};
use ck_core::errors::Result;

// ── Business-day conventions ──────────────────────────────────────────────────

/// Roll rule for a date that falls on a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessDayConvention {
    /// Next business day.
    Following,
    /// Next business day, or the previous one when rolling forward leaves
    /// the month.
    ModifiedFollowing,
    /// Previous business day.
    Preceding,
    /// Previous business day, or the next one when rolling back leaves the
    /// month.
    ModifiedPreceding,
    /// Keep the date.
    Unadjusted,
}

impl BusinessDayConvention {
    /// Direction of the first roll in days; zero when unadjusted.
    fn step(self) -> i32 {
        match self {
            BusinessDayConvention::Following | BusinessDayConvention::ModifiedFollowing => 1,
            BusinessDayConvention::Preceding | BusinessDayConvention::ModifiedPreceding => -1,
            BusinessDayConvention::Unadjusted => 0,
        }
    }

    fn stays_in_month(self) -> bool {
        matches!(
            self,
            BusinessDayConvention::ModifiedFollowing | BusinessDayConvention::ModifiedPreceding
        )
    }
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::Unadjusted => "Unadjusted",
        };
        f.write_str(s)
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"TARGET"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is a holiday (non-business) day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Return `true` if `date` is a weekend according to this calendar.
    fn is_weekend(&self, date: Date) -> bool {
        matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    /// Return `true` if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> bool {
        match date
            .add_days(1)
            .and_then(|next| self.adjust(next, BusinessDayConvention::Following))
        {
            Ok(next) => date.month() != next.month(),
            Err(_) => true,
        }
    }

    /// Return the last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Result<Date> {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Roll `date` to a business day under `convention`.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Result<Date> {
        let step = convention.step();
        if step == 0 {
            return Ok(date);
        }
        let roll = |mut d: Date, step: i32| -> Result<Date> {
            while self.is_holiday(d) {
                d = d.add_days(step)?;
            }
            Ok(d)
        };
        let adjusted = roll(date, step)?;
        if convention.stays_in_month() && adjusted.month() != date.month() {
            roll(date, -step)
        } else {
            Ok(adjusted)
        }
    }

    /// Advance `date` by `n` business days.
    ///
    /// `n == 0` adjusts a holiday to the following business day.
    fn advance_business_days(&self, date: Date, n: i32) -> Result<Date> {
        if n == 0 {
            return self.adjust(date, BusinessDayConvention::Following);
        }
        let step: i32 = if n > 0 { 1 } else { -1 };
        let mut remaining = n.unsigned_abs();
        let mut d = date;
        while remaining > 0 {
            d = d.add_days(step)?;
            if self.is_business_day(d) {
                remaining -= 1;
            }
        }
        Ok(d)
    }

    /// Advance `date` by `period` and adjust the result.
    ///
    /// Day periods count business days. Month and year periods roll to the
    /// end of the month when `end_of_month` is set and `date` is the last
    /// business day of its month.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        match period.unit {
            TimeUnit::Days => self.advance_business_days(date, period.length),
            TimeUnit::Weeks => self.adjust(date.add_period(period)?, convention),
            TimeUnit::Months | TimeUnit::Years => {
                let raw = date.add_period(period)?;
                if end_of_month && self.is_end_of_month(date) {
                    self.end_of_month(raw)
                } else {
                    self.adjust(raw, convention)
                }
            }
        }
    }

    /// Count the number of business days between `d1` (exclusive) and `d2`
    /// (inclusive).  Returns a negative number if `d2 < d1`.
    fn business_days_between(&self, d1: Date, d2: Date) -> i32 {
        let (start, end, sign) = if d2 >= d1 { (d1, d2, 1) } else { (d2, d1, -1) };
        let count = (start.serial() + 1..=end.serial())
            .filter_map(|s| Date::from_serial(s).ok())
            .filter(|d| self.is_business_day(*d))
            .count() as i32;
        sign * count
    }
}

/// A null calendar: every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }

    fn is_weekend(&self, _date: Date) -> bool {
        false
    }
}

/// A calendar that treats only Saturdays and Sundays as non-business days.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.is_weekend(date)
    }
}
