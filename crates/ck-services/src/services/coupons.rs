//! Anatomy of a floating coupon: fixing, index deposit and accrual period.
//!
//! The index deposit runs from the value date of the fixing for one index
//! tenor, which need not match the coupon's accrual period. Par pricing
//! projects the rate over the accrual period; indexed pricing uses the
//! index forecast itself.

use super::{simple_forward, CurveService};
use crate::choices::ConventionChoice;
use crate::types::{DateInput, ServiceResponse};
use ck_cashflows::{CashFlow, Coupon, IborCoupon, IborCouponPricing, IborIndex};
use ck_core::{errors::Result, Rate, Real};
use ck_math::{round, Rounding};
use ck_termstructures::{InterpolatedCurve, TermStructure};
use ck_time::{
    Actual365Fixed, BusinessDayConvention, Calendar, Date, DateGeneration, EvaluationContext,
    Period, ScheduleBuilder, Target,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const NOTIONAL: Real = 1_000_000.0;

/// Forward nodes as days after the evaluation date and continuous rates.
const FORWARD_NODES: [(i32, Rate); 5] = [
    (0, 0.03613),
    (91, 0.03613),
    (182, 0.03384),
    (365, 0.03573),
    (546, 0.03445),
];

fn default_coupon_date() -> DateInput {
    DateInput::new(7, 1, 2013)
}

/// Evaluation date and roll convention of the coupon schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponDetailsRequest {
    /// Evaluation date and schedule start, 7 January 2013 by default.
    #[serde(default = "default_coupon_date")]
    pub evaluation_date: DateInput,
    /// Roll convention of the semiannual schedule.
    #[serde(default)]
    pub convention: ConventionChoice,
}

impl Default for CouponDetailsRequest {
    fn default() -> Self {
        Self {
            evaluation_date: default_coupon_date(),
            convention: ConventionChoice::default(),
        }
    }
}

/// Dates and rates of one Euribor 6M coupon. Rates in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponDetails {
    /// ISO fixing date.
    pub fixing_date: String,
    /// Projected index fixing.
    pub index_fixing: Real,
    /// ISO start of the index deposit.
    pub index_start_date: String,
    /// ISO end of the index deposit.
    pub index_end_date: String,
    /// Simple forward over the index deposit.
    pub index_period_rate: Real,
    /// ISO accrual start.
    pub accrual_start_date: String,
    /// ISO accrual end.
    pub accrual_end_date: String,
    /// Simple forward over the accrual period.
    pub accrual_period_rate: Real,
    /// Coupon rate under par pricing.
    pub par_rate: Real,
    /// Coupon rate under indexed pricing.
    pub indexed_rate: Real,
    /// Par coupon amount on a notional of one million.
    pub amount: Real,
}

/// The schedule and the details of its second coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponDetailsResponse {
    /// ISO reference date of the forecast curve.
    pub reference_date: String,
    /// ISO schedule dates.
    pub schedule: Vec<String>,
    /// The coupon of the second period, the first fixing after today.
    pub coupon: CouponDetails,
}

impl CurveService {
    /// Build a one-year semiannual Euribor 6M schedule and take apart its
    /// second coupon on a flat-forward forecast curve.
    pub fn coupon_details(
        &self,
        request: &CouponDetailsRequest,
    ) -> ServiceResponse<CouponDetailsResponse> {
        self.respond("coupon_details", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let today = ctx.evaluation_date();
            let dates = FORWARD_NODES
                .iter()
                .map(|&(days, _)| today.add_days(days))
                .collect::<Result<Vec<_>>>()?;
            let forwards = FORWARD_NODES.iter().map(|&(_, f)| f).collect();
            let curve = InterpolatedCurve::forward_curve(dates, forwards, Arc::new(Actual365Fixed))?;

            let convention = request.convention.convention();
            let end = Target.advance(today, Period::years(1), convention, false)?;
            let schedule = ScheduleBuilder::new(today, end, Period::months(6), &Target)
                .with_convention(convention)
                .with_termination_convention(convention)
                .with_rule(DateGeneration::Backward)
                .build()?;
            let periods = schedule.dates();
            ck_core::ensure!(periods.len() >= 3, "schedule has {} dates", periods.len());
            let (start, end) = (periods[1], periods[2]);

            let index = Arc::new(IborIndex::euribor6m());
            let coupon = IborCoupon::new(
                end,
                NOTIONAL,
                start,
                end,
                Arc::clone(&index),
                1.0,
                0.0,
                index.day_counter(),
            )?;
            let indexed = IborCoupon::new(
                end,
                NOTIONAL,
                start,
                end,
                Arc::clone(&index),
                1.0,
                0.0,
                index.day_counter(),
            )?
            .with_pricing(IborCouponPricing::Indexed);

            let index_start = coupon.index_start_date()?;
            let index_end = coupon.index_end_date()?;
            let dc = index.day_counter();
            let details = CouponDetails {
                fixing_date: coupon.fixing_date().iso(),
                index_fixing: self.percent(indexed.index_fixing(&curve)?),
                index_start_date: index_start.iso(),
                index_end_date: index_end.iso(),
                index_period_rate: self.percent(simple_forward(&curve, index_start, index_end, &*dc)?),
                accrual_start_date: start.iso(),
                accrual_end_date: end.iso(),
                accrual_period_rate: self.percent(simple_forward(&curve, start, end, &*dc)?),
                par_rate: self.percent(coupon.rate(&curve)?),
                indexed_rate: self.percent(indexed.rate(&curve)?),
                amount: round(coupon.amount(&curve)?, 2, Rounding::Closest),
            };
            Ok(CouponDetailsResponse {
                reference_date: curve.reference_date().iso(),
                schedule: periods.iter().map(Date::iso).collect(),
                coupon: details,
            })
        })
    }
}
