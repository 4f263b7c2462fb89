//! EONIA curve from overnight deposits and OIS quotes.
//!
//! Year-end funding pressure is modelled as a discount jump on the last
//! day of the evaluation year: the curve discounts by an extra factor over
//! the turn, however the pillars around it are interpolated.

use super::{rate_quote, simple_forward, CurveService};
use crate::choices::InterpolationChoice;
use crate::types::{DateInput, SeriesPoint, ServiceResponse};
use ck_cashflows::OvernightIndex;
use ck_core::{errors::Result, Compounding, Real};
use ck_instruments::OisRateHelper;
use ck_termstructures::{DepositRateHelper, RateHelper, TermStructure, YieldTermStructure};
use ck_time::{
    Actual360, Actual365Fixed, BusinessDayConvention, Calendar, Date, DayCounter,
    EvaluationContext, Frequency, Period, Target,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Deposit quotes in percent.
const DEPOSITS: [(&str, Real); 9] = [
    ("1D", 0.13),
    ("1W", 0.17),
    ("2W", 0.18),
    ("1M", 0.20),
    ("2M", 0.23),
    ("3M", 0.26),
    ("4M", 0.28),
    ("5M", 0.31),
    ("6M", 0.34),
];

/// OIS quotes in percent, one year and beyond.
pub(super) const OIS_QUOTES: [(&str, Real); 9] = [
    ("1Y", 0.07),
    ("2Y", 0.12),
    ("3Y", 0.21),
    ("5Y", 0.59),
    ("10Y", 1.13),
    ("15Y", 1.52),
    ("20Y", 1.939),
    ("25Y", 2.003),
    ("30Y", 2.038),
];

/// Extra simple rate (Actual/360) paid over the turn of the year.
const TURN_OF_YEAR_PREMIUM: Real = 0.0030;

fn default_eonia_date() -> DateInput {
    DateInput::new(4, 12, 2017)
}

fn default_include_jump() -> bool {
    true
}

/// EONIA curve choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoniaCurveRequest {
    /// Evaluation date; the curve starts on the next TARGET business day.
    #[serde(default = "default_eonia_date")]
    pub evaluation_date: DateInput,
    /// Interpolation between pillars.
    #[serde(default)]
    pub interpolation: InterpolationChoice,
    /// Apply the turn-of-year jump.
    #[serde(default = "default_include_jump")]
    pub include_jump: bool,
    /// Zero-rate horizon in years.
    #[serde(default)]
    pub duration_years: Option<u32>,
}

impl Default for EoniaCurveRequest {
    fn default() -> Self {
        Self {
            evaluation_date: default_eonia_date(),
            interpolation: InterpolationChoice::default(),
            include_jump: default_include_jump(),
            duration_years: None,
        }
    }
}

/// Zero rates and overnight forwards of the EONIA curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoniaCurveResponse {
    /// ISO reference date of the curve.
    pub reference_date: String,
    /// ISO date of the turn-of-year jump, when applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_date: Option<String>,
    /// Discount factor applied over the turn, when applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_factor: Option<Real>,
    /// Monthly zero rates (annual compounding, percent) by ISO date.
    pub zero_rates: Vec<SeriesPoint<String>>,
    /// Daily overnight forwards (simple, Actual/360, percent) by ISO date.
    pub overnight_forwards: Vec<SeriesPoint<String>>,
}

fn eonia_helpers(
    ctx: &EvaluationContext,
    index: &Arc<OvernightIndex>,
) -> Result<Vec<Box<dyn RateHelper>>> {
    let mut helpers: Vec<Box<dyn RateHelper>> = Vec::with_capacity(DEPOSITS.len() + OIS_QUOTES.len());
    for (tenor, rate) in DEPOSITS {
        helpers.push(Box::new(DepositRateHelper::from_tenor(
            rate_quote(format!("deposit {tenor}"), rate),
            tenor.parse()?,
            2,
            &Target,
            BusinessDayConvention::ModifiedFollowing,
            false,
            Arc::new(Actual365Fixed),
            ctx,
        )?));
    }
    for (tenor, rate) in OIS_QUOTES {
        helpers.push(Box::new(OisRateHelper::new(
            rate_quote(format!("OIS {tenor}"), rate),
            tenor.parse()?,
            2,
            Arc::clone(index),
            ctx,
        )?));
    }
    Ok(helpers)
}

/// The last day of the year, and the discount factor for the premium over
/// the days until business resumes.
fn turn_of_year(after: Date) -> Result<(Date, Real)> {
    let mut year = after.year();
    let mut last = Date::from_ymd(year, 12, 31)?;
    if last <= after {
        year += 1;
        last = Date::from_ymd(year, 12, 31)?;
    }
    let resume = Target.adjust(last.add_days(1)?, BusinessDayConvention::Following)?;
    let days = Actual360.day_count(last, resume) as Real;
    Ok((last, 1.0 / (1.0 + TURN_OF_YEAR_PREMIUM * days / 360.0)))
}

impl CurveService {
    /// Bootstrap the EONIA curve and sample its zero rates monthly and its
    /// overnight forwards daily.
    pub fn eonia_curve(&self, request: &EoniaCurveRequest) -> ServiceResponse<EoniaCurveResponse> {
        self.respond("eonia_curve", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let years = self.horizon(request.duration_years, self.settings().sampling.max_curve_years)?;
            let reference = ctx.settlement_date(&Target, 0)?;
            let index = Arc::new(OvernightIndex::eonia());

            let jump = if request.include_jump {
                Some(turn_of_year(reference)?)
            } else {
                None
            };
            let curve = self.bootstrap(
                reference,
                eonia_helpers(&ctx, &index)?,
                request.interpolation.policy(),
                jump.as_slice(),
            )?;

            let zero_rates = (0..=years as i32 * 12)
                .map(|month| {
                    let d = Target.advance(
                        ctx.evaluation_date(),
                        Period::months(month),
                        BusinessDayConvention::Following,
                        false,
                    )?;
                    let z = curve.zero_rate(d, Compounding::Compounded, Frequency::Annual)?;
                    Ok(SeriesPoint::new(d.iso(), self.percent(z.rate())))
                })
                .collect::<Result<Vec<_>>>()?;

            let horizon = reference.add_days(self.settings().sampling.overnight_forward_days as i32)?;
            let mut overnight_forwards = Vec::new();
            let mut d = reference;
            while d < horizon {
                let next = Target.advance_business_days(d, 1)?;
                let f = simple_forward(&*curve, d, next, &Actual360)?;
                overnight_forwards.push(SeriesPoint::new(d.iso(), self.percent(f)));
                d = next;
            }

            Ok(EoniaCurveResponse {
                reference_date: curve.reference_date().iso(),
                jump_date: jump.map(|(d, _)| d.iso()),
                jump_factor: jump.map(|(_, f)| f),
                zero_rates,
                overnight_forwards,
            })
        })
    }
}
