//! 6M Euribor forecasting curve over an EONIA discount curve.
//!
//! The discount curve is bootstrapped from overnight deposits, short and
//! forward-starting OIS and the term OIS quotes of the EONIA service.
//! The naive curve bootstraps the 6M deposit and the swaps alone, so its
//! short end is interpolated across six months. The improved curve adds
//! synthetic deposits below six months, quoted at the EONIA forward plus a
//! constant Euribor/EONIA basis.

use super::curves::TenorQuote;
use super::eonia::OIS_QUOTES;
use super::{rate_quote, simple_forward, CurveService};
use crate::types::{DateInput, SeriesPoint, ServiceResponse};
use ck_cashflows::{IborIndex, OvernightIndex};
use ck_core::{errors::Result, Compounding, Real};
use ck_instruments::{OisRateHelper, SwapConventions, SwapRateHelper};
use ck_quotes::SimpleQuote;
use ck_termstructures::{
    CurveInterpolation, DepositRateHelper, PiecewiseYieldCurve, RateHelper, TermStructure,
    YieldTermStructure, YieldTermStructureHandle,
};
use ck_time::{
    Actual360, BusinessDayConvention, Calendar, Date, EvaluationContext, Frequency, Period,
    Target,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Overnight deposit rate in percent, quoted for 0, 1 and 2 fixing days.
const OVERNIGHT_DEPOSIT: Real = 0.04;

/// Short OIS quotes in percent.
const SHORT_OIS: [(&str, Real); 4] = [("1W", 0.070), ("2W", 0.069), ("3W", 0.078), ("1M", 0.074)];

/// One-month OIS starting one month after spot, percent.
const FORWARD_OIS: Real = 0.046;

const EURIBOR_6M_DEPOSIT: Real = 0.312;

/// Swap quotes in percent against 6M Euribor.
const EURIBOR_SWAPS: [(i32, Real); 5] = [
    (3, 0.424),
    (5, 0.762),
    (10, 1.584),
    (20, 2.187),
    (30, 2.256),
];

/// Tenors of the synthetic deposits.
const SYNTHETIC_TENORS: [&str; 6] = ["1W", "1M", "2M", "3M", "4M", "5M"];

fn default_euribor_date() -> DateInput {
    DateInput::new(8, 3, 2016)
}

/// Euribor curve inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EuriborCurveRequest {
    /// Evaluation date, 8 March 2016 by default.
    #[serde(default = "default_euribor_date")]
    pub evaluation_date: DateInput,
    /// Euribor over EONIA basis added to the synthetic deposits, bps.
    #[serde(default)]
    pub basis_spread_bps: Real,
    /// Sampling horizon in years.
    #[serde(default)]
    pub duration_years: Option<u32>,
}

/// Zero rates and 6M forwards of both curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EuriborCurveResponse {
    /// ISO reference date of all curves.
    pub reference_date: String,
    /// Synthetic deposit quotes, percent.
    pub synthetic_deposits: Vec<TenorQuote>,
    /// Naive curve zero rates (annual compounding, percent) by ISO date.
    pub naive_zero_rates: Vec<SeriesPoint<String>>,
    /// Improved curve zero rates.
    pub improved_zero_rates: Vec<SeriesPoint<String>>,
    /// Naive 6M forwards (simple, Actual/360, percent) by ISO start date.
    pub naive_forwards: Vec<SeriesPoint<String>>,
    /// Improved 6M forwards.
    pub improved_forwards: Vec<SeriesPoint<String>>,
}

fn eonia_helpers(ctx: &EvaluationContext) -> Result<Vec<Box<dyn RateHelper>>> {
    let eonia = Arc::new(OvernightIndex::eonia());
    let mut helpers: Vec<Box<dyn RateHelper>> = Vec::new();
    for fixing_days in 0..3 {
        helpers.push(Box::new(DepositRateHelper::from_tenor(
            rate_quote(format!("ON T+{fixing_days}"), OVERNIGHT_DEPOSIT),
            Period::days(1),
            fixing_days,
            &Target,
            BusinessDayConvention::Following,
            false,
            Arc::new(Actual360),
            ctx,
        )?));
    }
    for (tenor, rate) in SHORT_OIS.into_iter().chain(OIS_QUOTES) {
        helpers.push(Box::new(OisRateHelper::new(
            rate_quote(format!("OIS {tenor}"), rate),
            tenor.parse()?,
            2,
            Arc::clone(&eonia),
            ctx,
        )?));
    }
    let spot = ctx.settlement_date(&Target, 2)?;
    let start = Target.advance(spot, Period::months(1), BusinessDayConvention::Following, false)?;
    let end = Target.advance(start, Period::months(1), BusinessDayConvention::Following, false)?;
    helpers.push(Box::new(OisRateHelper::dated(
        rate_quote("OIS 1Mx2M", FORWARD_OIS),
        start,
        end,
        eonia,
    )?));
    Ok(helpers)
}

fn naive_helpers(
    ctx: &EvaluationContext,
    discount: &YieldTermStructureHandle,
) -> Result<Vec<Box<dyn RateHelper>>> {
    let index = Arc::new(IborIndex::euribor6m());
    let conventions = SwapConventions::euribor(Arc::clone(&index));
    let mut helpers: Vec<Box<dyn RateHelper>> = vec![Box::new(DepositRateHelper::from_tenor(
        rate_quote("Euribor 6M", EURIBOR_6M_DEPOSIT),
        index.tenor(),
        2,
        &Target,
        BusinessDayConvention::Following,
        false,
        Arc::new(Actual360),
        ctx,
    )?)];
    for (years, rate) in EURIBOR_SWAPS {
        let tenor = Period::years(years);
        let helper = SwapRateHelper::new(rate_quote(tenor.to_string(), rate), tenor, &conventions, ctx)?
            .with_discount_curve(discount.clone());
        helpers.push(Box::new(helper));
    }
    Ok(helpers)
}

/// Deposits quoted at the EONIA forward from today to each tenor plus
/// `basis`.
fn synthetic_deposits(
    ctx: &EvaluationContext,
    eonia: &dyn YieldTermStructure,
    basis: Real,
) -> Result<(Vec<Box<dyn RateHelper>>, Vec<(String, Real)>)> {
    let today = ctx.evaluation_date();
    let mut helpers: Vec<Box<dyn RateHelper>> = Vec::with_capacity(SYNTHETIC_TENORS.len());
    let mut rates = Vec::with_capacity(SYNTHETIC_TENORS.len());
    for tenor in SYNTHETIC_TENORS {
        let period: Period = tenor.parse()?;
        let end = Target.advance(today, period, BusinessDayConvention::Following, false)?;
        let rate = simple_forward(eonia, today, end, &Actual360)? + basis;
        helpers.push(Box::new(DepositRateHelper::from_tenor(
            SimpleQuote::shared(format!("synthetic {tenor}"), rate).1,
            period,
            2,
            &Target,
            BusinessDayConvention::Following,
            false,
            Arc::new(Actual360),
            ctx,
        )?));
        rates.push((tenor.to_string(), rate));
    }
    Ok((helpers, rates))
}

impl CurveService {
    fn euribor_series(
        &self,
        curve: &PiecewiseYieldCurve,
        dates: &[Date],
    ) -> Result<(Vec<SeriesPoint<String>>, Vec<SeriesPoint<String>>)> {
        let mut zeros = Vec::with_capacity(dates.len());
        let mut forwards = Vec::with_capacity(dates.len());
        for &d in dates {
            let z = curve.zero_rate(d, Compounding::Compounded, Frequency::Annual)?;
            zeros.push(SeriesPoint::new(d.iso(), self.percent(z.rate())));
            let f = simple_forward(curve, d, d.add_period(Period::months(6))?, &Actual360)?;
            forwards.push(SeriesPoint::new(d.iso(), self.percent(f)));
        }
        Ok((zeros, forwards))
    }

    /// Bootstrap the EONIA discount curve, then the naive and improved 6M
    /// Euribor curves over it.
    pub fn euribor_curve(
        &self,
        request: &EuriborCurveRequest,
    ) -> ServiceResponse<EuriborCurveResponse> {
        self.respond("euribor_curve", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let today = ctx.evaluation_date();
            let years = self.horizon(request.duration_years, self.settings().sampling.max_curve_years)?;

            let eonia = self.bootstrap(today, eonia_helpers(&ctx)?, CurveInterpolation::LinearZero, &[])?;
            let discount = YieldTermStructureHandle::new(Arc::clone(&eonia) as Arc<dyn YieldTermStructure>);

            let naive = self.bootstrap(
                today,
                naive_helpers(&ctx, &discount)?,
                CurveInterpolation::LinearZero,
                &[],
            )?;
            let (synthetic, rates) = synthetic_deposits(&ctx, &*eonia, request.basis_spread_bps / 10_000.0)?;
            let mut helpers = naive_helpers(&ctx, &discount)?;
            helpers.extend(synthetic);
            let improved = self.bootstrap(today, helpers, CurveInterpolation::LinearZero, &[])?;

            let dates = (0..=years as i32 * 12)
                .map(|month| today.add_period(Period::months(month)))
                .collect::<Result<Vec<_>>>()?;
            let (naive_zero_rates, naive_forwards) = self.euribor_series(&naive, &dates)?;
            let (improved_zero_rates, improved_forwards) = self.euribor_series(&improved, &dates)?;

            Ok(EuriborCurveResponse {
                reference_date: naive.reference_date().iso(),
                synthetic_deposits: rates
                    .into_iter()
                    .map(|(tenor, rate)| TenorQuote::new(tenor, self.percent(rate)))
                    .collect(),
                naive_zero_rates,
                improved_zero_rates,
                naive_forwards,
                improved_forwards,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(basis_spread_bps: Real) -> EuriborCurveResponse {
        CurveService::default()
            .euribor_curve(&EuriborCurveRequest {
                evaluation_date: default_euribor_date(),
                basis_spread_bps,
                duration_years: Some(10),
            })
            .into_result()
            .unwrap()
    }

    #[test]
    fn synthetic_deposits_sit_on_the_eonia_forwards() {
        let flat = run(0.0);
        let wide = run(10.0);
        assert_eq!(flat.synthetic_deposits.len(), 6);
        for (a, b) in flat.synthetic_deposits.iter().zip(&wide.synthetic_deposits) {
            assert_eq!(a.tenor, b.tenor);
            assert!((b.rate - a.rate - 0.10).abs() < 1e-3, "{a:?} {b:?}");
            // EONIA quotes are all below 0.1%.
            assert!(a.rate > 0.0 && a.rate < 0.1, "{a:?}");
        }
    }

    #[test]
    fn curves_meet_at_the_long_end() {
        let r = run(5.0);
        assert_eq!(r.reference_date, "2016-03-08");
        assert_eq!(r.naive_zero_rates.len(), 121);
        let (naive, improved) = (&r.naive_zero_rates[120], &r.improved_zero_rates[120]);
        assert_eq!(naive.x, improved.x);
        assert!((naive.y - improved.y).abs() < 0.05, "{naive:?} {improved:?}");
    }

    #[test]
    fn short_end_differs() {
        let r = run(5.0);
        // The 2M forward of the naive curve comes from interpolation alone.
        let diff = (r.naive_forwards[2].y - r.improved_forwards[2].y).abs();
        assert!(diff > 1e-4, "forwards agree: {diff}");
    }
}
