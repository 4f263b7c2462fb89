//! Spreaded curves over relinkable base curves.

use approx::assert_abs_diff_eq;
use ck_core::{Compounding, Error};
use ck_quotes::SimpleQuote;
use ck_termstructures::{
    FlatForward, InterpolatedCurve, InterpolatedSpreadedTermStructure,
    RelinkableYieldTermStructureHandle, TermStructure, YieldTermStructure,
    ZeroSpreadedTermStructure,
};
use ck_time::{Actual365Fixed, Date, DayCounter, Frequency};
use std::sync::Arc;

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn today() -> Date {
    date(2020, 1, 2)
}

fn zero_base() -> InterpolatedCurve {
    let dates = vec![
        today(),
        date(2021, 1, 2),
        date(2023, 1, 2),
        date(2025, 1, 2),
        date(2030, 1, 2),
    ];
    InterpolatedCurve::zero_curve(
        dates,
        vec![0.010, 0.010, 0.015, 0.020, 0.025],
        Arc::new(Actual365Fixed),
    )
    .unwrap()
}

fn continuous_zero(curve: &dyn YieldTermStructure, d: Date) -> f64 {
    curve
        .zero_rate(d, Compounding::Continuous, Frequency::NoFrequency)
        .unwrap()
        .rate()
}

#[test]
fn constant_spread_shifts_zero_rates() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (spread, spread_handle) = SimpleQuote::shared("spread", 0.0050);
    let curve = ZeroSpreadedTermStructure::new(base.handle(), spread_handle);

    for d in [date(2020, 7, 2), date(2022, 3, 15), date(2029, 12, 31)] {
        assert_abs_diff_eq!(
            continuous_zero(&curve, d),
            continuous_zero(&*base.current(), d) + 0.005,
            epsilon = 1e-12
        );
    }
    assert_eq!(curve.discount(today()).unwrap(), 1.0);

    spread.set_value(0.0100);
    let d = date(2024, 6, 1);
    assert_abs_diff_eq!(
        continuous_zero(&curve, d),
        continuous_zero(&*base.current(), d) + 0.01,
        epsilon = 1e-12
    );
    let t = curve.time_from_reference(d);
    assert_abs_diff_eq!(
        curve.instantaneous_forward(t).unwrap(),
        base.current().instantaneous_forward(t).unwrap() + 0.01,
        epsilon = 1e-12
    );
}

#[test]
fn relinking_the_base_moves_the_spreaded_curve() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (_, spread) = SimpleQuote::shared("spread", 0.001);
    let curve = ZeroSpreadedTermStructure::new(base.handle(), spread);
    let d = date(2022, 1, 2);
    let before = continuous_zero(&curve, d);

    let flat = FlatForward::continuous(today(), 0.04, Arc::new(Actual365Fixed)).unwrap();
    base.link_to(Arc::new(flat));
    assert_abs_diff_eq!(continuous_zero(&curve, d), 0.041, epsilon = 1e-12);
    assert!(continuous_zero(&curve, d) > before);
}

#[test]
fn compounded_spread_is_added_in_its_own_convention() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (_, spread) = SimpleQuote::shared("spread", 0.002);
    let curve = ZeroSpreadedTermStructure::with_compounding(
        base.handle(),
        spread,
        Compounding::Compounded,
        Frequency::Semiannual,
    )
    .unwrap();
    let d = date(2026, 1, 2);
    let base_rate = base
        .current()
        .zero_rate(d, Compounding::Compounded, Frequency::Semiannual)
        .unwrap()
        .rate();
    let spreaded = curve
        .zero_rate(d, Compounding::Compounded, Frequency::Semiannual)
        .unwrap()
        .rate();
    assert_abs_diff_eq!(spreaded, base_rate + 0.002, epsilon = 1e-12);
}

#[test]
fn spreaded_curve_shares_the_base_range() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (_, spread) = SimpleQuote::shared("spread", 0.001);
    let curve = ZeroSpreadedTermStructure::new(base.handle(), spread);
    assert_eq!(curve.max_date(), date(2030, 1, 2));

    let late = date(2035, 1, 2);
    assert!(matches!(curve.discount(late), Err(Error::Extrapolation(_))));

    base.current().enable_extrapolation(true);
    assert!(curve.discount(late).is_ok());
    base.current().enable_extrapolation(false);
    assert!(curve.discount(late).is_err());

    curve.enable_extrapolation(true);
    assert!(curve.discount(late).is_ok());
}

#[test]
fn interpolated_spreads_are_linear_inside_and_flat_outside() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (_, s1) = SimpleQuote::shared("2Y", 0.0010);
    let (far, s2) = SimpleQuote::shared("6Y", 0.0030);
    let curve = InterpolatedSpreadedTermStructure::new(
        base.handle(),
        vec![(date(2022, 1, 2), s1), (date(2026, 1, 2), s2)],
    )
    .unwrap();

    assert_abs_diff_eq!(curve.spread(date(2021, 1, 2)).unwrap(), 0.0010, epsilon = 1e-15);
    assert_abs_diff_eq!(curve.spread(date(2029, 1, 2)).unwrap(), 0.0030, epsilon = 1e-15);

    let dc = Actual365Fixed;
    let t1 = dc.year_fraction(today(), date(2022, 1, 2));
    let t2 = dc.year_fraction(today(), date(2026, 1, 2));
    let mid = date(2024, 1, 2);
    let tm = dc.year_fraction(today(), mid);
    let expected = 0.0010 + (tm - t1) / (t2 - t1) * 0.0020;
    assert_abs_diff_eq!(curve.spread(mid).unwrap(), expected, epsilon = 1e-15);
    assert_abs_diff_eq!(
        continuous_zero(&curve, mid),
        continuous_zero(&*base.current(), mid) + expected,
        epsilon = 1e-12
    );

    far.set_value(0.0050);
    assert_abs_diff_eq!(curve.spread(date(2029, 1, 2)).unwrap(), 0.0050, epsilon = 1e-15);
}

#[test]
fn interpolated_spread_forward_matches_finite_difference() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (_, s1) = SimpleQuote::shared("2Y", 0.0010);
    let (_, s2) = SimpleQuote::shared("6Y", 0.0030);
    let curve = InterpolatedSpreadedTermStructure::new(
        base.handle(),
        vec![(date(2022, 1, 2), s1), (date(2026, 1, 2), s2)],
    )
    .unwrap();
    let t = 3.3;
    let h = 1e-6;
    let numeric =
        (curve.discount_t(t - h).unwrap().ln() - curve.discount_t(t + h).unwrap().ln()) / (2.0 * h);
    assert_abs_diff_eq!(curve.instantaneous_forward(t).unwrap(), numeric, epsilon = 1e-7);
}

#[test]
fn spread_dates_must_increase() {
    let base = RelinkableYieldTermStructureHandle::new(Arc::new(zero_base()));
    let (_, s1) = SimpleQuote::shared("a", 0.001);
    let (_, s2) = SimpleQuote::shared("b", 0.002);
    assert!(InterpolatedSpreadedTermStructure::new(
        base.handle(),
        vec![(date(2026, 1, 2), s1), (date(2022, 1, 2), s2)],
    )
    .is_err());
    assert!(InterpolatedSpreadedTermStructure::new(base.handle(), Vec::new()).is_err());
}
