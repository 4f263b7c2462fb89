//! Leg-level identities on flat and interpolated curves.

use approx::assert_abs_diff_eq;
use ck_cashflows::{
    bps, npv, FixedRateLegBuilder, IborIndex, IborLegBuilder, Leg, OvernightIndex,
    OvernightLegBuilder,
};
use ck_core::Real;
use ck_termstructures::{FlatForward, InterpolatedCurve, YieldTermStructure};
use ck_time::{
    Actual360, Actual365Fixed, BusinessDayConvention, Date, DateGeneration, Period, Schedule,
    ScheduleBuilder, Target, Thirty360, Thirty360Convention,
};
use proptest::prelude::*;
use std::sync::Arc;

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn schedule(start: Date, end: Date, tenor: Period) -> Schedule {
    ScheduleBuilder::new(start, end, tenor, &Target)
        .with_convention(BusinessDayConvention::ModifiedFollowing)
        .with_termination_convention(BusinessDayConvention::ModifiedFollowing)
        .with_rule(DateGeneration::Forward)
        .build()
        .unwrap()
}

fn fixed_leg(s: &Schedule, rate: Real) -> Leg {
    FixedRateLegBuilder::new(s, Arc::new(Thirty360::new(Thirty360Convention::BondBasis)))
        .with_notional(1.0)
        .with_coupon_rate(rate)
        .build()
        .unwrap()
}

fn zero_curve(today: Date) -> InterpolatedCurve {
    let dates = [0, 1, 2, 5, 10]
        .iter()
        .map(|&y| today.add_period(Period::years(y)).unwrap())
        .collect();
    InterpolatedCurve::zero_curve(
        dates,
        vec![0.010, 0.012, 0.015, 0.021, 0.026],
        Arc::new(Actual365Fixed),
    )
    .unwrap()
}

#[test]
fn fair_fixed_rate_balances_ibor_leg() {
    let today = date(2016, 3, 8);
    let curve = zero_curve(today);
    let start = date(2016, 3, 10);
    let end = date(2024, 3, 11);
    let fixed_s = schedule(start, end, Period::years(1));
    let float_s = schedule(start, end, Period::months(6));
    let floating = IborLegBuilder::new(&float_s, Arc::new(IborIndex::euribor6m()))
        .with_notional(1.0)
        .build()
        .unwrap();

    let float_npv = npv(&floating, &curve, &curve, today).unwrap();
    let annuity = bps(&fixed_leg(&fixed_s, 0.0), &curve, today).unwrap() / 1.0e-4;
    let fair = float_npv / annuity;
    let fixed_npv = npv(&fixed_leg(&fixed_s, fair), &curve, &curve, today).unwrap();
    assert_abs_diff_eq!(fixed_npv, float_npv, epsilon = 1e-12);
    assert!(fair > 0.01 && fair < 0.026, "fair rate {fair}");
}

#[test]
fn projection_and_discounting_curves_are_independent() {
    let today = date(2016, 3, 8);
    let forecast = FlatForward::continuous(today, 0.03, Arc::new(Actual365Fixed)).unwrap();
    let discount = FlatForward::continuous(today, 0.01, Arc::new(Actual365Fixed)).unwrap();
    let s = schedule(date(2016, 3, 10), date(2019, 3, 11), Period::months(6));
    let leg = IborLegBuilder::new(&s, Arc::new(IborIndex::euribor6m()))
        .with_notional(100.0)
        .build()
        .unwrap();
    let dual = npv(&leg, &forecast, &discount, today).unwrap();
    let single = npv(&leg, &forecast, &forecast, today).unwrap();
    // Same amounts, discounted at a lower rate.
    assert!(dual > single);
    let amounts: Real = leg
        .iter()
        .map(|cf| cf.amount(&forecast).unwrap() * discount.discount(cf.date()).unwrap())
        .sum();
    assert_abs_diff_eq!(dual, amounts, epsilon = 1e-12);
}

#[test]
fn overnight_leg_prices_at_par() {
    let today = date(2016, 3, 10);
    let curve = zero_curve(today);
    let s = schedule(today, date(2021, 3, 10), Period::years(1));
    let leg = OvernightLegBuilder::new(&s, Arc::new(OvernightIndex::eonia()))
        .with_day_counter(Arc::new(Actual360))
        .build()
        .unwrap();
    let end = s.end_date().unwrap();
    let value = npv(&leg, &curve, &curve, today).unwrap() + curve.discount(end).unwrap();
    assert_abs_diff_eq!(value, 1.0, epsilon = 1e-12);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ibor_leg_plus_notional_is_par(rate in -0.01f64..0.08, years in 1i32..15) {
        let today = date(2020, 6, 1);
        let curve = FlatForward::continuous(today, rate, Arc::new(Actual365Fixed)).unwrap();
        let start = date(2020, 6, 3);
        let s = schedule(start, start.add_period(Period::years(years)).unwrap(), Period::months(6));
        let leg = IborLegBuilder::new(&s, Arc::new(IborIndex::euribor6m()))
            .with_notional(1.0)
            .build()
            .unwrap();
        let end = s.end_date().unwrap();
        let value = npv(&leg, &curve, &curve, today).unwrap() + curve.discount(end).unwrap();
        prop_assert!((value - curve.discount(start).unwrap()).abs() < 1e-12);
    }
}
