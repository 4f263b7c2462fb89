//! `EvaluationContext`: the "today" of a computation.
//!
//! Every date-relative construction (rate helpers, curves anchored on a
//! settlement date, instruments) receives the context explicitly, so two
//! computations with different evaluation dates never interfere.

use crate::calendar::Calendar;
use crate::date::Date;
use crate::period::Period;
use ck_core::errors::Result;

/// Immutable evaluation settings threaded through a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvaluationContext {
    evaluation_date: Date,
}

impl EvaluationContext {
    /// Context for the given evaluation date.
    pub fn new(evaluation_date: Date) -> Self {
        Self { evaluation_date }
    }

    /// Context from a (day, month, year) triple.
    pub fn from_dmy(day: u32, month: u32, year: i32) -> Result<Self> {
        Ok(Self::new(Date::from_dmy(day, month, year)?))
    }

    /// The evaluation date.
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date
    }

    /// Spot date: the evaluation date advanced by `settlement_days` business
    /// days on `calendar`.
    pub fn settlement_date(&self, calendar: &dyn Calendar, settlement_days: u32) -> Result<Date> {
        calendar.advance_business_days(self.evaluation_date, settlement_days as i32)
    }

    /// A copy of this context moved to another date.
    pub fn with_evaluation_date(&self, evaluation_date: Date) -> Self {
        Self { evaluation_date }
    }

    /// The evaluation date plus an unadjusted period.
    pub fn offset(&self, period: Period) -> Result<Date> {
        self.evaluation_date.add_period(period)
    }
}
