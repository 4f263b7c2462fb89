//! Closed sets of user choices.
//!
//! Requests name their interpolation, calendar, day counter and so on by
//! string. They are parsed into these enums once, at deserialization, and
//! dispatched with `match` from then on.

use ck_core::errors::{Error, Result};
use ck_termstructures::CurveInterpolation;
use ck_time::{
    Actual360, Actual365Fixed, ActualActual, ActualActualConvention, BusinessDayConvention,
    Calendar, DayCounter, NullCalendar, Target, Thirty360, Thirty360Convention,
    UnitedStatesGovernmentBond, UnitedStatesSettlement, WeekendsOnly,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Lower-case alphanumerics only, so `"Log-Cubic"` and `"log_cubic"` agree.
fn key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn unknown(kind: &str, s: &str, expected: &str) -> Error {
    Error::InvalidArgument(format!("unknown {kind} '{s}', expected one of {expected}"))
}

// ── Interpolation ─────────────────────────────────────────────────────────────

/// Interpolation of a bootstrapped curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationChoice {
    /// Cubic spline on log discount factors.
    #[default]
    #[serde(alias = "LogCubic", alias = "log_cubic_discount")]
    LogCubic,
    /// Linear on zero rates.
    #[serde(alias = "LinearZero")]
    LinearZero,
    /// Cubic spline on zero rates.
    #[serde(alias = "CubicZero")]
    CubicZero,
    /// Backward-flat instantaneous forwards.
    #[serde(alias = "FlatForward")]
    FlatForward,
}

impl InterpolationChoice {
    /// The curve policy.
    pub fn policy(self) -> CurveInterpolation {
        match self {
            InterpolationChoice::LogCubic => CurveInterpolation::LogCubicDiscount,
            InterpolationChoice::LinearZero => CurveInterpolation::LinearZero,
            InterpolationChoice::CubicZero => CurveInterpolation::CubicZero,
            InterpolationChoice::FlatForward => CurveInterpolation::FlatForward,
        }
    }
}

impl FromStr for InterpolationChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match key(s).as_str() {
            "logcubic" | "logcubicdiscount" => Ok(InterpolationChoice::LogCubic),
            "linearzero" => Ok(InterpolationChoice::LinearZero),
            "cubiczero" => Ok(InterpolationChoice::CubicZero),
            "flatforward" => Ok(InterpolationChoice::FlatForward),
            _ => Err(unknown(
                "interpolation",
                s,
                "log_cubic, linear_zero, cubic_zero, flat_forward",
            )),
        }
    }
}

// ── Shock ─────────────────────────────────────────────────────────────────────

/// Shape of the rate shock applied by the sensitivity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockType {
    /// The same spread at every maturity.
    #[default]
    Parallel,
    /// A spread rising linearly with maturity, zero at 10 years.
    Tilt,
}

impl FromStr for ShockType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match key(s).as_str() {
            "parallel" => Ok(ShockType::Parallel),
            "tilt" => Ok(ShockType::Tilt),
            _ => Err(unknown("shock type", s, "parallel, tilt")),
        }
    }
}

// ── Day counter ───────────────────────────────────────────────────────────────

/// Day-count convention analysed by the day-count service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountChoice {
    /// 30/360, US rules.
    #[serde(alias = "Thirty360", alias = "thirty_360")]
    Thirty360,
    /// Actual/Actual, ISMA rules.
    #[serde(alias = "ActualActual")]
    ActualActual,
    /// Actual/365 (Fixed).
    #[serde(alias = "Actual365Fixed", alias = "actual_365_fixed")]
    Actual365Fixed,
    /// Actual/360.
    #[serde(alias = "Actual360", alias = "actual_360")]
    Actual360,
}

impl DayCountChoice {
    /// The day counter.
    pub fn day_counter(self) -> Arc<dyn DayCounter> {
        match self {
            DayCountChoice::Thirty360 => Arc::new(Thirty360::new(Thirty360Convention::Usa)),
            DayCountChoice::ActualActual => {
                Arc::new(ActualActual::new(ActualActualConvention::Isma))
            }
            DayCountChoice::Actual365Fixed => Arc::new(Actual365Fixed),
            DayCountChoice::Actual360 => Arc::new(Actual360),
        }
    }
}

impl FromStr for DayCountChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match key(s).as_str() {
            "thirty360" | "30360" => Ok(DayCountChoice::Thirty360),
            "actualactual" | "actact" => Ok(DayCountChoice::ActualActual),
            "actual365fixed" | "act365f" | "actual365" => Ok(DayCountChoice::Actual365Fixed),
            "actual360" | "act360" => Ok(DayCountChoice::Actual360),
            _ => Err(unknown(
                "day counter",
                s,
                "thirty360, actual_actual, actual365_fixed, actual360",
            )),
        }
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

/// Holiday calendar for date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarChoice {
    /// TARGET (euro area).
    #[default]
    #[serde(alias = "TARGET")]
    Target,
    /// US government bond market.
    #[serde(alias = "UnitedStatesGovernmentBond")]
    UnitedStatesGovernmentBond,
    /// US settlement.
    #[serde(alias = "UnitedStatesSettlement")]
    UnitedStatesSettlement,
    /// Saturdays and Sundays only.
    #[serde(alias = "WeekendsOnly")]
    WeekendsOnly,
    /// Every day is a business day.
    #[serde(alias = "NullCalendar", alias = "null_calendar")]
    Null,
}

impl CalendarChoice {
    /// The calendar.
    pub fn calendar(self) -> Arc<dyn Calendar> {
        match self {
            CalendarChoice::Target => Arc::new(Target),
            CalendarChoice::UnitedStatesGovernmentBond => Arc::new(UnitedStatesGovernmentBond),
            CalendarChoice::UnitedStatesSettlement => Arc::new(UnitedStatesSettlement),
            CalendarChoice::WeekendsOnly => Arc::new(WeekendsOnly),
            CalendarChoice::Null => Arc::new(NullCalendar),
        }
    }
}

impl FromStr for CalendarChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match key(s).as_str() {
            "target" => Ok(CalendarChoice::Target),
            "unitedstatesgovernmentbond" | "usgovernmentbond" => {
                Ok(CalendarChoice::UnitedStatesGovernmentBond)
            }
            "unitedstatessettlement" | "ussettlement" => Ok(CalendarChoice::UnitedStatesSettlement),
            "weekendsonly" => Ok(CalendarChoice::WeekendsOnly),
            "null" | "nullcalendar" => Ok(CalendarChoice::Null),
            _ => Err(unknown(
                "calendar",
                s,
                "target, united_states_government_bond, united_states_settlement, weekends_only, null",
            )),
        }
    }
}

// ── Business-day convention ──────────────────────────────────────────────────

/// Business-day convention named in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionChoice {
    /// Next business day.
    #[default]
    #[serde(alias = "Following")]
    Following,
    /// Next business day unless it changes month.
    #[serde(alias = "ModifiedFollowing")]
    ModifiedFollowing,
    /// Previous business day.
    #[serde(alias = "Preceding")]
    Preceding,
    /// Previous business day unless it changes month.
    #[serde(alias = "ModifiedPreceding")]
    ModifiedPreceding,
    /// No adjustment.
    #[serde(alias = "Unadjusted")]
    Unadjusted,
}

impl ConventionChoice {
    /// The convention.
    pub fn convention(self) -> BusinessDayConvention {
        match self {
            ConventionChoice::Following => BusinessDayConvention::Following,
            ConventionChoice::ModifiedFollowing => BusinessDayConvention::ModifiedFollowing,
            ConventionChoice::Preceding => BusinessDayConvention::Preceding,
            ConventionChoice::ModifiedPreceding => BusinessDayConvention::ModifiedPreceding,
            ConventionChoice::Unadjusted => BusinessDayConvention::Unadjusted,
        }
    }
}

impl FromStr for ConventionChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match key(s).as_str() {
            "following" | "f" => Ok(ConventionChoice::Following),
            "modifiedfollowing" | "mf" => Ok(ConventionChoice::ModifiedFollowing),
            "preceding" | "p" => Ok(ConventionChoice::Preceding),
            "modifiedpreceding" | "mp" => Ok(ConventionChoice::ModifiedPreceding),
            "unadjusted" | "u" => Ok(ConventionChoice::Unadjusted),
            _ => Err(unknown(
                "business-day convention",
                s,
                "following, modified_following, preceding, modified_preceding, unadjusted",
            )),
        }
    }
}

// ── Curve instruments ─────────────────────────────────────────────────────────

/// Instruments quoted beyond one year in the custom-curve service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveInstruments {
    /// Par fixed-rate bonds with semiannual coupons.
    #[default]
    Bonds,
    /// Par swaps against 6M Euribor.
    Swaps,
}

impl FromStr for CurveInstruments {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match key(s).as_str() {
            "bonds" | "bond" => Ok(CurveInstruments::Bonds),
            "swaps" | "swap" => Ok(CurveInstruments::Swaps),
            _ => Err(unknown("curve instruments", s, "bonds, swaps")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_time::Date;

    #[test]
    fn serde_names_and_aliases() {
        let i: InterpolationChoice = serde_json::from_str("\"linear_zero\"").unwrap();
        assert_eq!(i, InterpolationChoice::LinearZero);
        let i: InterpolationChoice = serde_json::from_str("\"FlatForward\"").unwrap();
        assert_eq!(i.policy(), CurveInterpolation::FlatForward);
        let d: DayCountChoice = serde_json::from_str("\"Thirty360\"").unwrap();
        assert_eq!(d, DayCountChoice::Thirty360);
        assert_eq!(serde_json::to_string(&ShockType::Tilt).unwrap(), "\"tilt\"");
        assert!(serde_json::from_str::<ShockType>("\"twist\"").is_err());
    }

    #[test]
    fn from_str_is_lenient_on_punctuation() {
        assert_eq!("Log-Cubic".parse::<InterpolationChoice>().unwrap(), InterpolationChoice::LogCubic);
        assert_eq!("Modified Following".parse::<ConventionChoice>().unwrap(), ConventionChoice::ModifiedFollowing);
        assert_eq!("ACT/360".parse::<DayCountChoice>().unwrap(), DayCountChoice::Actual360);
        assert_eq!("swaps".parse::<CurveInstruments>().unwrap(), CurveInstruments::Swaps);
        let err = "hermite".parse::<InterpolationChoice>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(m) if m.contains("hermite")));
    }

    #[test]
    fn dispatch_builds_the_named_objects() {
        let d1 = Date::from_ymd(2024, 1, 30).unwrap();
        let d2 = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(DayCountChoice::Thirty360.day_counter().day_count(d1, d2), 0);
        assert_eq!(DayCountChoice::Actual360.day_counter().day_count(d1, d2), 1);

        // Independence Day is a US holiday but a TARGET business day.
        let july4 = Date::from_ymd(2024, 7, 4).unwrap();
        assert!(CalendarChoice::Target.calendar().is_business_day(july4));
        assert!(!CalendarChoice::UnitedStatesSettlement.calendar().is_business_day(july4));
        assert_eq!(
            ConventionChoice::Unadjusted.convention(),
            BusinessDayConvention::Unadjusted
        );
    }
}
