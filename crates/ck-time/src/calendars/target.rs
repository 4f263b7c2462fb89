//! TARGET (Trans-European Automated Real-time Gross Settlement) calendar.

use crate::calendar::Calendar;
use crate::date::{days_in_month, Date};
use crate::date::Weekday;

/// TARGET calendar (ECB's settlement system).
///
/// Weekends and the following holidays are observed:
/// * New Year's Day (Jan 1)
/// * Good Friday and Easter Monday (from 2000)
/// * Labour Day (May 1, from 2000)
/// * Christmas Day (Dec 25) and Boxing Day (Dec 26)
/// * December 31 in 1998, 1999 and 2001
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        let w = date.weekday();
        if matches!(w, Weekday::Saturday | Weekday::Sunday) {
            return false;
        }
        let y = date.year();
        let m = date.month();
        let d = date.day_of_month();
        let dd = date.day_of_year();
        let em = easter_monday(y);

        let holiday = (d == 1 && m == 1)
            || (dd == em - 3 && y >= 2000)
            || (dd == em && y >= 2000)
            || (d == 1 && m == 5 && y >= 2000)
            || (d == 25 && m == 12)
            || (d == 26 && m == 12)
            || (d == 31 && m == 12 && (y == 1998 || y == 1999 || y == 2001));
        !holiday
    }
}

/// Day-of-year (1-based) of Easter Monday in `year`.
///
/// Oudin's algorithm for Easter Sunday, plus one day.
pub(crate) fn easter_monday(year: u16) -> u16 {
    let y = year as i32;
    let g = y % 19;
    let c = y / 100;
    let h = (c - c / 4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let i = h - (h / 28) * (1 - (h / 28) * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (y + y / 4 + i + 2 - c + c / 4) % 7;
    let p = i - j;
    let e_day = 1 + (p + 27 + (p + 6) / 40) % 31;
    let e_month = (3 + (p + 26) / 30) as u8;
    let mut doy = e_day as u16;
    for mon in 1..e_month {
        doy += days_in_month(year, mon) as u16;
    }
    doy + 1
}
