//! `Schedule`: a sequence of coupon dates.
//!
//! A `Schedule` generates the payment/accrual dates for an instrument given a
//! start date, end date, tenor, calendar and business-day conventions.

use crate::calendar::BusinessDayConvention;
use crate::calendar::Calendar;
use crate::date::Date;
use crate::period::Period;
use ck_core::errors::{Error, Result};

/// Date generation rule for schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateGeneration {
    /// Dates generated backward from the end date; any stub is at the front.
    Backward,
    /// Dates generated forward from the start date; any stub is at the back.
    Forward,
    /// Only start and end dates.
    Zero,
}

/// An ordered sequence of coupon/payment dates.
#[derive(Debug, Clone)]
pub struct Schedule {
    dates: Vec<Date>,
    is_regular: Vec<bool>,
    tenor: Option<Period>,
}

impl Schedule {
    /// Return all dates in the schedule.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates.
    pub fn size(&self) -> usize {
        self.dates.len()
    }

    /// Return `true` if the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Return the start (effective) date.
    pub fn start_date(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Return the end (termination) date.
    pub fn end_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// The generating tenor, if any.
    pub fn tenor(&self) -> Option<Period> {
        self.tenor
    }

    /// Return `true` if the period ending at date `i + 1` is a full period.
    pub fn is_regular(&self, i: usize) -> bool {
        self.is_regular.get(i).copied().unwrap_or(true)
    }

    /// Iterate over `(start, end)` accrual periods.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// Build a schedule from an explicit list of dates.
    pub fn from_dates(dates: Vec<Date>) -> Result<Self> {
        ck_core::ensure!(dates.len() >= 2, "a schedule needs at least two dates");
        ck_core::ensure!(
            dates.windows(2).all(|w| w[0] < w[1]),
            "schedule dates must be strictly increasing"
        );
        Ok(Self {
            is_regular: vec![true; dates.len() - 1],
            dates,
            tenor: None,
        })
    }
}

/// Builder for [`Schedule`].
#[derive(Debug)]
pub struct ScheduleBuilder<'a> {
    effective_date: Date,
    termination_date: Date,
    tenor: Period,
    calendar: &'a dyn Calendar,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGeneration,
    end_of_month: bool,
}

impl<'a> ScheduleBuilder<'a> {
    /// Begin building a schedule.
    pub fn new(
        effective_date: Date,
        termination_date: Date,
        tenor: Period,
        calendar: &'a dyn Calendar,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            tenor,
            calendar,
            convention: BusinessDayConvention::ModifiedFollowing,
            termination_convention: BusinessDayConvention::ModifiedFollowing,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Set the business-day convention for all dates but the last.
    pub fn with_convention(mut self, c: BusinessDayConvention) -> Self {
        self.convention = c;
        self
    }

    /// Set the business-day convention for the termination date.
    pub fn with_termination_convention(mut self, c: BusinessDayConvention) -> Self {
        self.termination_convention = c;
        self
    }

    /// Set the date-generation rule.
    pub fn with_rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Whether to snap dates to the end of the month.
    pub fn end_of_month(mut self, flag: bool) -> Self {
        self.end_of_month = flag;
        self
    }

    fn roll(&self, seed: Date, n: i32) -> Result<Date> {
        let steps = n.checked_mul(self.tenor.length).ok_or_else(|| {
            Error::InvalidDate(format!("{n} x {} overflows the schedule", self.tenor))
        })?;
        let unadjusted = seed.advance(steps, self.tenor.unit)?;
        if self.end_of_month && self.calendar.is_end_of_month(seed) {
            self.calendar.end_of_month(unadjusted)
        } else {
            Ok(unadjusted)
        }
    }

    /// Build the `Schedule`.
    pub fn build(self) -> Result<Schedule> {
        let start = self.effective_date;
        let end = self.termination_date;

        if start >= end {
            return Err(Error::InvalidArgument(format!(
                "effective date {start} must be before termination date {end}"
            )));
        }

        let first = self.calendar.adjust(start, self.convention)?;
        let last = self.calendar.adjust(end, self.termination_convention)?;

        if self.tenor.length <= 0 || self.rule == DateGeneration::Zero {
            return Ok(Schedule {
                dates: vec![first, last],
                is_regular: vec![false],
                tenor: None,
            });
        }

        let mut unadjusted: Vec<Date> = Vec::new();
        let mut is_regular: Vec<bool> = Vec::new();

        match self.rule {
            DateGeneration::Forward => {
                unadjusted.push(start);
                let mut n = 1;
                loop {
                    let next = self.roll(start, n)?;
                    if next >= end {
                        is_regular.push(next == end);
                        break;
                    }
                    unadjusted.push(next);
                    is_regular.push(true);
                    n += 1;
                }
                unadjusted.push(end);
            }
            DateGeneration::Backward | DateGeneration::Zero => {
                unadjusted.push(end);
                let mut n = 1;
                loop {
                    let prev = self.roll(end, -n)?;
                    if prev <= start {
                        is_regular.push(prev == start);
                        break;
                    }
                    unadjusted.push(prev);
                    is_regular.push(true);
                    n += 1;
                }
                unadjusted.push(start);
                unadjusted.reverse();
                is_regular.reverse();
            }
        }

        let count = unadjusted.len();
        let mut dates = Vec::with_capacity(count);
        let mut merged = 0;
        for (i, d) in unadjusted.into_iter().enumerate() {
            let adjusted = if i == 0 {
                first
            } else if i == count - 1 {
                last
            } else {
                self.calendar.adjust(d, self.convention)?
            };
            // Adjustment can collapse a short stub onto its neighbour.
            if dates.last() == Some(&adjusted) {
                let idx = (i - 1).saturating_sub(merged);
                if idx < is_regular.len() {
                    is_regular.remove(idx);
                }
                merged += 1;
                continue;
            }
            dates.push(adjusted);
        }

        Ok(Schedule {
            dates,
            is_regular,
            tenor: Some(self.tenor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{NullCalendar, WeekendsOnly};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn zero_coupon_schedule() {
        let cal = WeekendsOnly;
        let sched = ScheduleBuilder::new(date(2023, 1, 1), date(2025, 1, 1), Period::years(0), &cal)
            .build()
            .unwrap();
        assert_eq!(sched.size(), 2);
    }

    #[test]
    fn annual_backward_schedule() {
        let cal = NullCalendar;
        let sched = ScheduleBuilder::new(date(2020, 1, 1), date(2023, 1, 1), Period::years(1), &cal)
            .build()
            .unwrap();
        assert_eq!(
            sched.dates(),
            &[date(2020, 1, 1), date(2021, 1, 1), date(2022, 1, 1), date(2023, 1, 1)]
        );
        assert!((0..3).all(|i| sched.is_regular(i)));
    }

    #[test]
    fn backward_schedule_puts_stub_first() {
        let cal = NullCalendar;
        let sched = ScheduleBuilder::new(
            date(2004, 5, 15),
            date(2006, 1, 15),
            Period::months(6),
            &cal,
        )
        .with_convention(BusinessDayConvention::Unadjusted)
        .with_termination_convention(BusinessDayConvention::Unadjusted)
        .build()
        .unwrap();
        assert_eq!(
            sched.dates(),
            &[date(2004, 5, 15), date(2004, 7, 15), date(2005, 1, 15), date(2005, 7, 15), date(2006, 1, 15)]
        );
        assert!(!sched.is_regular(0));
        assert!(sched.is_regular(1));
    }

    #[test]
    fn forward_schedule_puts_stub_last() {
        let cal = NullCalendar;
        let sched = ScheduleBuilder::new(date(2020, 1, 1), date(2021, 3, 1), Period::months(6), &cal)
            .with_rule(DateGeneration::Forward)
            .build()
            .unwrap();
        assert_eq!(
            sched.dates(),
            &[date(2020, 1, 1), date(2020, 7, 1), date(2021, 1, 1), date(2021, 3, 1)]
        );
        assert!(!sched.is_regular(2));
    }

    #[test]
    fn from_dates_rejects_unsorted() {
        assert!(Schedule::from_dates(vec![date(2020, 1, 1), date(2019, 1, 1)]).is_err());
        assert!(Schedule::from_dates(vec![date(2020, 1, 1)]).is_err());
    }
}
