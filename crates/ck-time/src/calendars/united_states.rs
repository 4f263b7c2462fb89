//! United States calendars.

use super::target::easter_monday;
use crate::calendar::Calendar;
use crate::date::Date;
use crate::date::Weekday;

/// United States, Settlement (federal holidays) calendar.
///
/// Holidays:
/// * New Year's Day (Jan 1; if Sun → Mon; if Sat → Fri)
/// * Martin Luther King Jr. Day (3rd Mon in Jan, from 1983)
/// * Presidents' Day (3rd Mon in Feb)
/// * Memorial Day (last Mon in May)
/// * Juneteenth (Jun 19, from 2022)
/// * Independence Day (Jul 4)
/// * Labor Day (1st Mon in Sep)
/// * Columbus Day (2nd Mon in Oct)
/// * Veterans' Day (Nov 11)
/// * Thanksgiving Day (4th Thu in Nov)
/// * Christmas Day (Dec 25)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitedStatesSettlement;

impl Calendar for UnitedStatesSettlement {
    fn name(&self) -> &str {
        "US (Settlement)"
    }

    fn is_business_day(&self, date: Date) -> bool {
        let w = date.weekday();
        if w.is_weekend() {
            return false;
        }
        let (y, m, d) = (date.year(), date.month(), date.day_of_month());
        !(is_federal_holiday(y, m, d, w) || (d == 31 && m == 12 && w == Weekday::Friday))
    }
}

/// United States, government bond market calendar.
///
/// The federal holidays (New Year's Day is not brought forward to a
/// Friday) plus Good Friday.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitedStatesGovernmentBond;

impl Calendar for UnitedStatesGovernmentBond {
    fn name(&self) -> &str {
        "US government bond market"
    }

    fn is_business_day(&self, date: Date) -> bool {
        let w = date.weekday();
        if w.is_weekend() {
            return false;
        }
        let (y, m, d) = (date.year(), date.month(), date.day_of_month());
        let good_friday = date.day_of_year() == easter_monday(y) - 3;
        !(is_federal_holiday(y, m, d, w) || good_friday)
    }
}

fn is_federal_holiday(y: u16, m: u8, d: u8, w: Weekday) -> bool {
    // New Year's Day, moved to Monday if on Sunday
    if m == 1 && (d == 1 || (d == 2 && w == Weekday::Monday)) {
        return true;
    }
    // Martin Luther King Jr. Day
    if y >= 1983 && m == 1 && w == Weekday::Monday && (15..=21).contains(&d) {
        return true;
    }
    // Presidents' Day
    if m == 2 && w == Weekday::Monday && (15..=21).contains(&d) {
        return true;
    }
    // Memorial Day
    if m == 5 && w == Weekday::Monday && d >= 25 {
        return true;
    }
    // Juneteenth
    if y >= 2022 && m == 6 && is_observed(d, 19, w) {
        return true;
    }
    // Independence Day
    if m == 7 && is_observed(d, 4, w) {
        return true;
    }
    // Labor Day
    if m == 9 && w == Weekday::Monday && d <= 7 {
        return true;
    }
    // Columbus Day
    if m == 10 && w == Weekday::Monday && (8..=14).contains(&d) {
        return true;
    }
    // Veterans' Day
    if m == 11 && is_observed(d, 11, w) {
        return true;
    }
    // Thanksgiving
    if m == 11 && w == Weekday::Thursday && (22..=28).contains(&d) {
        return true;
    }
    // Christmas
    m == 12 && is_observed(d, 25, w)
}

/// A fixed-date holiday, moved to Monday when on Sunday and to Friday when
/// on Saturday.
fn is_observed(d: u8, holiday: u8, w: Weekday) -> bool {
    d == holiday
        || (d == holiday + 1 && w == Weekday::Monday)
        || (d + 1 == holiday && w == Weekday::Friday)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn government_bond_holidays_2004() {
        let cal = UnitedStatesGovernmentBond;
        assert!(!cal.is_business_day(date(2004, 4, 9))); // Good Friday
        assert!(!cal.is_business_day(date(2004, 5, 31))); // Memorial Day
        assert!(!cal.is_business_day(date(2004, 7, 5))); // Independence Day observed
        assert!(!cal.is_business_day(date(2004, 11, 25))); // Thanksgiving
        assert!(cal.is_business_day(date(2004, 5, 18)));
    }

    #[test]
    fn settlement_does_not_close_on_good_friday() {
        assert!(UnitedStatesSettlement.is_business_day(date(2004, 4, 9)));
        assert!(!UnitedStatesSettlement.is_business_day(date(2004, 12, 24)));
    }
}
