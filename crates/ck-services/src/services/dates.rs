//! Date arithmetic: weekdays, periods and calendar advances.

use super::CurveService;
use crate::choices::{CalendarChoice, ConventionChoice};
use crate::types::{DateInput, ServiceResponse};
use ck_time::{Calendar, Period};
use serde::{Deserialize, Serialize};

fn default_period() -> String {
    "1M".to_string()
}

/// A date and a period to move it by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateToolsRequest {
    /// Starting date.
    pub date: DateInput,
    /// Tenor such as `"3D"`, `"2W"`, `"1M"`, `"5Y"`; `"1M"` by default.
    #[serde(default = "default_period")]
    pub period: String,
    /// Calendar used for the business-day advance.
    #[serde(default)]
    pub calendar: CalendarChoice,
    /// Roll convention for the business-day advance.
    #[serde(default)]
    pub convention: ConventionChoice,
}

/// The date moved three ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateToolsResponse {
    /// Weekday of the starting date.
    pub weekday: String,
    /// Starting date plus ten calendar days, ISO.
    pub plus_ten_days: String,
    /// Starting date plus the period, unadjusted, ISO.
    pub plus_period: String,
    /// Starting date advanced by the period on the calendar, ISO. Day
    /// periods count business days.
    pub calendar_advanced: String,
    /// Whether the starting date is a business day on the calendar.
    pub is_business_day: bool,
}

impl CurveService {
    /// Weekday, calendar-day and business-day arithmetic on one date.
    pub fn date_tools(&self, request: &DateToolsRequest) -> ServiceResponse<DateToolsResponse> {
        self.respond("date_tools", || {
            let date = request.date.to_date()?;
            let period: Period = request.period.parse()?;
            let calendar = request.calendar.calendar();
            let advanced = calendar.advance(date, period, request.convention.convention(), false)?;
            Ok(DateToolsResponse {
                weekday: date.weekday().to_string(),
                plus_ten_days: date.add_days(10)?.iso(),
                plus_period: date.add_period(period)?.iso(),
                calendar_advanced: advanced.iso(),
                is_business_day: calendar.is_business_day(date),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(date: DateInput, period: &str, calendar: CalendarChoice) -> DateToolsResponse {
        CurveService::default()
            .date_tools(&DateToolsRequest {
                date,
                period: period.to_string(),
                calendar,
                convention: ConventionChoice::Following,
            })
            .into_result()
            .unwrap()
    }

    #[test]
    fn month_end_clamps() {
        let r = run(DateInput::new(30, 1, 2024), "1M", CalendarChoice::Target);
        assert_eq!(r.weekday, "Tuesday");
        assert_eq!(r.plus_ten_days, "2024-02-09");
        assert_eq!(r.plus_period, "2024-02-29");
        assert_eq!(r.calendar_advanced, "2024-02-29");
        assert!(r.is_business_day);
    }

    #[test]
    fn good_friday_on_target() {
        // Good Friday 2024 closes TARGET; three business days later is the
        // Thursday after Easter Monday.
        let r = run(DateInput::new(29, 3, 2024), "3D", CalendarChoice::Target);
        assert_eq!(r.weekday, "Friday");
        assert!(!r.is_business_day);
        assert_eq!(r.plus_period, "2024-04-01");
        assert_eq!(r.calendar_advanced, "2024-04-04");

        let r = run(DateInput::new(29, 3, 2024), "3D", CalendarChoice::Null);
        assert!(r.is_business_day);
        assert_eq!(r.calendar_advanced, "2024-04-01");
    }

    #[test]
    fn weekend_rolls_forward() {
        // 2 March 2024 + 1W is Saturday 9 March.
        let r = run(DateInput::new(2, 3, 2024), "1W", CalendarChoice::WeekendsOnly);
        assert_eq!(r.plus_period, "2024-03-09");
        assert_eq!(r.calendar_advanced, "2024-03-11");
    }

    #[test]
    fn bad_period_is_an_error() {
        let response = CurveService::default().date_tools(&DateToolsRequest {
            date: DateInput::new(1, 1, 2024),
            period: "soon".to_string(),
            calendar: CalendarChoice::Target,
            convention: ConventionChoice::Following,
        });
        assert!(response.message().unwrap().contains("soon"));
    }

    #[test]
    fn oversized_period_is_an_error() {
        for period in ["999999999Y", "999999999M", "999999999W"] {
            let response = CurveService::default().date_tools(&DateToolsRequest {
                date: DateInput::new(1, 1, 2024),
                period: period.to_string(),
                calendar: CalendarChoice::Target,
                convention: ConventionChoice::Following,
            });
            assert!(!response.is_ok(), "{period}");
            assert!(response.message().unwrap().contains(period), "{response:?}");
        }
    }

    #[test]
    fn defaults_from_json() {
        let request: DateToolsRequest =
            serde_json::from_str(r#"{"date": {"day": 1, "month": 2, "year": 2024}}"#).unwrap();
        assert_eq!(request.period, "1M");
        assert_eq!(request.calendar, CalendarChoice::Target);
        assert_eq!(request.convention, ConventionChoice::Following);
    }
}
