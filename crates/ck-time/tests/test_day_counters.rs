//! Integration tests for the `DayCounter` implementations.

use ck_time::{
    Actual360, Actual365Fixed, ActualActual, ActualActualConvention, Date, DayCounter, Thirty360,
    Thirty360Convention,
};
use proptest::prelude::*;

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

// ─── Actual/Actual ────────────────────────────────────────────────────────────

#[test]
fn test_actual_actual_isda() {
    let dc = ActualActual::new(ActualActualConvention::Isda);

    let cases: Vec<(Date, Date, f64)> = vec![
        (date(2003, 11, 1), date(2004, 5, 1), 0.497724380567),
        // short first calculation period
        (date(1999, 2, 1), date(1999, 7, 1), 0.410958904110),
        (date(1999, 7, 1), date(2000, 7, 1), 1.001377348600),
        // long first calculation period
        (date(2002, 8, 15), date(2003, 7, 15), 0.915068493151),
        (date(2003, 7, 15), date(2004, 1, 15), 0.504004790778),
        // short final calculation period
        (date(1999, 7, 30), date(2000, 1, 30), 0.503892506924),
        (date(2000, 1, 30), date(2000, 6, 30), 0.415300546448),
    ];

    for (i, (d1, d2, expected)) in cases.iter().enumerate() {
        let calculated = dc.year_fraction(*d1, *d2);
        assert!(
            (calculated - expected).abs() < 1.0e-10,
            "ISDA case {i}: from {d1} to {d2}: calculated {calculated:.12}, expected {expected:.12}"
        );
    }
}

#[test]
fn test_actual_actual_isma_with_ref() {
    let dc = ActualActual::new(ActualActualConvention::Isma);

    // (start, end, ref start, ref end, expected)
    let cases: Vec<(Date, Date, Date, Date, f64)> = vec![
        (
            date(2003, 11, 1),
            date(2004, 5, 1),
            date(2003, 11, 1),
            date(2004, 5, 1),
            0.5,
        ),
        (
            date(1999, 2, 1),
            date(1999, 7, 1),
            date(1998, 7, 1),
            date(1999, 7, 1),
            0.410958904110,
        ),
        (
            date(1999, 7, 1),
            date(2000, 7, 1),
            date(1999, 7, 1),
            date(2000, 7, 1),
            1.0,
        ),
        (
            date(2002, 8, 15),
            date(2003, 7, 15),
            date(2003, 1, 15),
            date(2003, 7, 15),
            0.915760869565,
        ),
        (
            date(2003, 7, 15),
            date(2004, 1, 15),
            date(2003, 7, 15),
            date(2004, 1, 15),
            0.5,
        ),
        (
            date(1999, 7, 30),
            date(2000, 1, 30),
            date(1999, 7, 30),
            date(2000, 1, 30),
            0.5,
        ),
        (
            date(2000, 1, 30),
            date(2000, 6, 30),
            date(2000, 1, 30),
            date(2000, 7, 30),
            0.417582417582,
        ),
    ];

    for (i, (d1, d2, r1, r2, expected)) in cases.iter().enumerate() {
        let calculated = dc.year_fraction_with_ref(*d1, *d2, *r1, *r2);
        assert!(
            (calculated - expected).abs() < 1.0e-10,
            "ISMA case {i}: from {d1} to {d2}: calculated {calculated:.12}, expected {expected:.12}"
        );
    }
}

// ─── 30/360 ───────────────────────────────────────────────────────────────────

/// ISDA 30/360 bond-basis examples.
#[test]
fn test_thirty360_bond_basis() {
    let dc = Thirty360::new(Thirty360Convention::BondBasis);

    let cases: Vec<(Date, Date, i64)> = vec![
        (date(2006, 8, 20), date(2007, 2, 20), 180),
        (date(2007, 2, 20), date(2007, 8, 20), 180),
        (date(2006, 8, 31), date(2007, 2, 28), 178),
        (date(2007, 2, 28), date(2007, 8, 31), 183),
        (date(2007, 8, 31), date(2008, 2, 29), 179),
        (date(2008, 2, 29), date(2008, 8, 31), 182),
        (date(2006, 1, 31), date(2006, 2, 28), 28),
        (date(2006, 2, 28), date(2006, 3, 3), 5),
        (date(2006, 9, 30), date(2006, 10, 31), 30),
        (date(2006, 10, 31), date(2006, 11, 28), 28),
        (date(2008, 2, 29), date(2009, 2, 28), 359),
        (date(2008, 2, 28), date(2008, 3, 31), 33),
    ];

    for (d1, d2, expected) in &cases {
        let calculated = dc.day_count(*d1, *d2);
        assert_eq!(
            calculated, *expected,
            "30/360 bond basis: from {d1} to {d2}: calculated {calculated}, expected {expected}"
        );
    }
}

#[test]
fn test_thirty360_eurobond_basis() {
    let dc = Thirty360::new(Thirty360Convention::European);

    let cases: Vec<(Date, Date, i64)> = vec![
        (date(2006, 8, 20), date(2007, 2, 20), 180),
        (date(2006, 2, 28), date(2006, 8, 31), 182),
        (date(2006, 8, 31), date(2007, 2, 28), 178),
        (date(2007, 2, 28), date(2007, 8, 31), 182),
        (date(2006, 1, 30), date(2006, 1, 31), 0),
    ];

    for (d1, d2, expected) in &cases {
        assert_eq!(dc.day_count(*d1, *d2), *expected, "30E/360: from {d1} to {d2}");
    }
}

/// 30th to 31st of the same month counts zero days, so the fraction does
/// not grow although a calendar day elapses.
#[test]
fn test_thirty360_end_of_month_anomaly() {
    for convention in [
        Thirty360Convention::Usa,
        Thirty360Convention::BondBasis,
        Thirty360Convention::European,
    ] {
        let dc = Thirty360::new(convention);
        let d30 = date(2016, 3, 30);
        let d31 = date(2016, 3, 31);
        assert_eq!(dc.year_fraction(d30, d31), 0.0, "{}", dc.name());
        assert!(dc.is_end_of_month_anomaly(d30, d31), "{}", dc.name());
        let a365 = Actual365Fixed;
        assert!(a365.year_fraction(d30, d31) > 0.0);
    }
}

// ─── Basic day counter functionality ─────────────────────────────────────────

#[test]
fn test_year_fraction_symmetry() {
    let counters: Vec<Box<dyn DayCounter>> = vec![
        Box::new(Actual365Fixed),
        Box::new(Actual360),
        Box::new(ActualActual::new(ActualActualConvention::Isda)),
    ];

    let d1 = date(2003, 11, 1);
    let d2 = date(2004, 5, 1);

    for dc in &counters {
        let fwd = dc.year_fraction(d1, d2);
        let bwd = dc.year_fraction(d2, d1);
        assert!(
            (fwd + bwd).abs() < 1.0e-12,
            "{}: yf({d1}, {d2}) = {fwd}, yf({d2}, {d1}) = {bwd}",
            dc.name()
        );
    }
}

#[test]
fn test_zero_period() {
    let counters: Vec<Box<dyn DayCounter>> = vec![
        Box::new(Actual365Fixed),
        Box::new(Actual360),
        Box::new(ActualActual::new(ActualActualConvention::Isda)),
        Box::new(ActualActual::new(ActualActualConvention::Isma)),
        Box::new(Thirty360::new(Thirty360Convention::Usa)),
        Box::new(Thirty360::new(Thirty360Convention::European)),
    ];

    let d = date(2004, 6, 15);
    for dc in &counters {
        assert_eq!(dc.day_count(d, d), 0, "{}", dc.name());
        assert_eq!(dc.year_fraction(d, d), 0.0, "{}", dc.name());
    }
}

proptest! {
    #[test]
    fn actual_counters_are_additive(a in 0i32..20_000, b in 0i32..20_000, c in 0i32..20_000) {
        let mut serials = [a, b, c];
        serials.sort_unstable();
        let base = date(1950, 1, 1).serial();
        let [d1, d2, d3] = serials.map(|s| Date::from_serial(base + s).unwrap());
        let dc = Actual365Fixed;
        let whole = dc.year_fraction(d1, d3);
        let parts = dc.year_fraction(d1, d2) + dc.year_fraction(d2, d3);
        prop_assert!((whole - parts).abs() < 1e-12);
    }

    #[test]
    fn isda_year_fraction_is_monotone(a in 0i32..30_000, gap in 1i32..4_000) {
        let base = date(1950, 1, 1).serial();
        let d1 = Date::from_serial(base + a).unwrap();
        let d2 = Date::from_serial(base + a + gap).unwrap();
        let dc = ActualActual::new(ActualActualConvention::Isda);
        prop_assert!(dc.year_fraction(d1, d2) > 0.0);
    }
}
