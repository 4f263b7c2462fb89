//! # ck-time
//!
//! Date, calendar, day counter, schedule, interest-rate and
//! evaluation-context types.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day conventions, the `Calendar` trait and the trivial calendars.
pub mod calendar;

/// Concrete market calendars.
pub mod calendars;

/// `Date` and `Weekday`.
pub mod date;

/// `DayCounter` trait and built-in day-count conventions.
pub mod day_counter;

/// Explicit evaluation date passed through every computation.
pub mod evaluation_context;

/// `InterestRate`: a rate with its compounding and day-count conventions.
pub mod interest_rate;

/// `Period`, `TimeUnit` and coupon `Frequency`.
pub mod period;

/// `Schedule`: an ordered sequence of dates.
pub mod schedule;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use calendar::{BusinessDayConvention, Calendar, NullCalendar, WeekendsOnly};
pub use calendars::{Target, UnitedStatesGovernmentBond, UnitedStatesSettlement};
pub use date::{Date, Weekday};
pub use day_counter::{
    Actual360, Actual365Fixed, ActualActual, ActualActualConvention, DayCounter, Thirty360,
    Thirty360Convention,
};
pub use evaluation_context::EvaluationContext;
pub use interest_rate::InterestRate;
pub use period::{Frequency, Period, TimeUnit};
pub use schedule::{DateGeneration, Schedule, ScheduleBuilder};
