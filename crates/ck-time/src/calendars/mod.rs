//! Concrete market calendars.

/// TARGET (euro settlement) calendar.
pub mod target;

/// United States calendars.
pub mod united_states;

pub use target::Target;
pub use united_states::{UnitedStatesGovernmentBond, UnitedStatesSettlement};
