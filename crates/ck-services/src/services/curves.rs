//! Curves bootstrapped from user quotes, the 2004 treasury curve and a
//! zero curve shifted by a constant spread.

use super::{rate_quote, CurveService};
use crate::choices::{CurveInstruments, InterpolationChoice};
use crate::types::{DateInput, SeriesPoint, ServiceResponse};
use ck_cashflows::IborIndex;
use ck_core::{errors::Result, Compounding, Real};
use ck_instruments::{FixedRateBond, FixedRateBondHelper, SwapConventions, SwapRateHelper};
use ck_quotes::SimpleQuote;
use ck_termstructures::{
    CurveInterpolation, DepositRateHelper, InterpolatedCurve, PiecewiseYieldCurve, RateHelper,
    TermStructure, YieldTermStructure, YieldTermStructureHandle, ZeroSpreadedTermStructure,
};
use ck_time::{
    Actual360, Actual365Fixed, BusinessDayConvention, Calendar, Date, DateGeneration, DayCounter,
    EvaluationContext, Frequency, Period, ScheduleBuilder, Target, TimeUnit,
    UnitedStatesGovernmentBond,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A market rate for one tenor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorQuote {
    /// Tenor such as `"6M"` or `"10Y"`.
    pub tenor: String,
    /// Rate in percent.
    pub rate: Real,
}

impl TenorQuote {
    /// `rate` percent at `tenor`.
    pub fn new(tenor: impl Into<String>, rate: Real) -> Self {
        Self {
            tenor: tenor.into(),
            rate,
        }
    }
}

/// One bootstrapped pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarRow {
    /// Helper that produced the pillar.
    pub instrument: String,
    /// ISO pillar date.
    pub date: String,
    /// Zero rate at the pillar, percent.
    pub zero_rate: Real,
    /// Discount factor at the pillar.
    pub discount: Real,
}

// ── Custom curve ──────────────────────────────────────────────────────────────

/// Curve from quotes chosen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCurveRequest {
    /// Evaluation date.
    pub evaluation_date: DateInput,
    /// Interpolation between pillars.
    #[serde(default)]
    pub interpolation: InterpolationChoice,
    /// Instruments quoted at one year and beyond.
    #[serde(default)]
    pub instruments: CurveInstruments,
    /// Quotes; tenors under one year are deposits.
    pub market_rates: Vec<TenorQuote>,
    /// Sampling horizon in years.
    #[serde(default)]
    pub horizon_years: Option<u32>,
}

/// Custom curve pillars and monthly semiannual zero rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCurveResponse {
    /// ISO evaluation date.
    pub evaluation_date: String,
    /// Interpolation used.
    pub interpolation: InterpolationChoice,
    /// Solved pillars in date order.
    pub pillars: Vec<PillarRow>,
    /// Zero rates (semiannual compounding, percent) by ISO date.
    pub zero_rates: Vec<SeriesPoint<String>>,
}

fn is_money_market(tenor: Period) -> bool {
    match tenor.unit {
        TimeUnit::Days | TimeUnit::Weeks => true,
        TimeUnit::Months => tenor.length < 12,
        TimeUnit::Years => false,
    }
}

/// A bond paying `coupon` semiannually from the evaluation date to
/// `maturity`, settling T+2 on the US government bond calendar.
fn par_bond(ctx: &EvaluationContext, maturity: Date, coupon: Real) -> Result<FixedRateBond> {
    let calendar = UnitedStatesGovernmentBond;
    let schedule = ScheduleBuilder::new(ctx.evaluation_date(), maturity, Period::months(6), &calendar)
        .with_convention(BusinessDayConvention::Unadjusted)
        .with_termination_convention(BusinessDayConvention::Unadjusted)
        .with_rule(DateGeneration::Backward)
        .build()?;
    FixedRateBond::new(
        2,
        100.0,
        &schedule,
        vec![coupon],
        Arc::new(Actual365Fixed),
        BusinessDayConvention::Unadjusted,
        Arc::new(calendar),
        None,
    )
}

fn deposit(
    quote: &TenorQuote,
    tenor: Period,
    calendar: &dyn Calendar,
    day_counter: Arc<dyn DayCounter>,
    ctx: &EvaluationContext,
) -> Result<Box<dyn RateHelper>> {
    Ok(Box::new(DepositRateHelper::from_tenor(
        rate_quote(&quote.tenor, quote.rate),
        tenor,
        2,
        calendar,
        BusinessDayConvention::ModifiedFollowing,
        false,
        day_counter,
        ctx,
    )?))
}

fn custom_helpers(
    request: &CustomCurveRequest,
    ctx: &EvaluationContext,
) -> Result<Vec<Box<dyn RateHelper>>> {
    ck_core::ensure!(!request.market_rates.is_empty(), "at least one market rate is required");
    let conventions = SwapConventions::euribor(Arc::new(IborIndex::euribor6m()));
    let mut helpers: Vec<Box<dyn RateHelper>> = Vec::with_capacity(request.market_rates.len());
    for quote in &request.market_rates {
        let tenor: Period = quote.tenor.parse()?;
        ck_core::ensure!(tenor.length > 0, "tenor {} must be positive", quote.tenor);
        let helper: Box<dyn RateHelper> = match (is_money_market(tenor), request.instruments) {
            (true, CurveInstruments::Bonds) => deposit(
                quote,
                tenor,
                &UnitedStatesGovernmentBond,
                Arc::new(Actual365Fixed),
                ctx,
            )?,
            (true, CurveInstruments::Swaps) => {
                deposit(quote, tenor, &Target, Arc::new(Actual360), ctx)?
            }
            (false, CurveInstruments::Bonds) => {
                let maturity = UnitedStatesGovernmentBond.advance(
                    ctx.evaluation_date(),
                    tenor,
                    BusinessDayConvention::Following,
                    false,
                )?;
                let bond = par_bond(ctx, maturity, quote.rate / 100.0)?;
                let (_, price) = SimpleQuote::shared(format!("{} price", quote.tenor), 100.0);
                Box::new(FixedRateBondHelper::new(price, bond, ctx)?)
            }
            (false, CurveInstruments::Swaps) => Box::new(SwapRateHelper::new(
                rate_quote(&quote.tenor, quote.rate),
                tenor,
                &conventions,
                ctx,
            )?),
        };
        helpers.push(helper);
    }
    Ok(helpers)
}

impl CurveService {
    fn pillar_rows(
        &self,
        curve: &PiecewiseYieldCurve,
        frequency: Frequency,
    ) -> Result<Vec<PillarRow>> {
        curve
            .helpers()
            .iter()
            .map(|h| {
                let d = h.pillar_date();
                Ok(PillarRow {
                    instrument: h.description(),
                    date: d.iso(),
                    zero_rate: self.percent(
                        curve.zero_rate(d, Compounding::Compounded, frequency)?.rate(),
                    ),
                    discount: curve.discount(d)?,
                })
            })
            .collect()
    }

    /// Bootstrap a curve from deposits and either par bonds or par swaps.
    pub fn custom_curve(&self, request: &CustomCurveRequest) -> ServiceResponse<CustomCurveResponse> {
        self.respond("custom_curve", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let years = self.horizon(request.horizon_years, self.settings().sampling.custom_curve_years)?;
            let curve = self.bootstrap(
                ctx.evaluation_date(),
                custom_helpers(request, &ctx)?,
                request.interpolation.policy(),
                &[],
            )?;

            let calendar = UnitedStatesGovernmentBond;
            let zero_rates = (1..=years as i32 * 12)
                .map(|month| {
                    let d = calendar.advance(
                        ctx.evaluation_date(),
                        Period::months(month),
                        BusinessDayConvention::Following,
                        false,
                    )?;
                    let t = Real::from(month) / 12.0;
                    let z = curve.zero_rate_t(t, Compounding::Compounded, Frequency::Semiannual)?;
                    Ok(SeriesPoint::new(d.iso(), self.percent(z.rate())))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(CustomCurveResponse {
                evaluation_date: ctx.evaluation_date().iso(),
                interpolation: request.interpolation,
                pillars: self.pillar_rows(&curve, Frequency::Semiannual)?,
                zero_rates,
            })
        })
    }
}

// ── Treasury curve ────────────────────────────────────────────────────────────

const TREASURY_DEPOSITS: [(&str, Real); 4] =
    [("1W", 3.82), ("1M", 3.72), ("3M", 3.63), ("6M", 3.53)];

/// Years to maturity and coupon in percent; bonds trade at par.
const TREASURY_BONDS: [(i32, Real); 4] = [(1, 2.00), (2, 2.25), (3, 2.50), (4, 2.75)];

fn default_treasury_date() -> DateInput {
    DateInput::new(15, 5, 2004)
}

/// The 2004 US treasury scenario, optionally moved to another date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryCurveRequest {
    /// Evaluation date, 15 May 2004 by default.
    #[serde(default = "default_treasury_date")]
    pub evaluation_date: DateInput,
}

impl Default for TreasuryCurveRequest {
    fn default() -> Self {
        Self {
            evaluation_date: default_treasury_date(),
        }
    }
}

/// Treasury pillars and quarterly annual zero rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryCurveResponse {
    /// ISO evaluation date.
    pub evaluation_date: String,
    /// Solved pillars in date order.
    pub pillars: Vec<PillarRow>,
    /// Zero rates (annual compounding, percent) by time in years.
    pub zero_rates: Vec<SeriesPoint<Real>>,
}

fn treasury_helpers(ctx: &EvaluationContext) -> Result<Vec<Box<dyn RateHelper>>> {
    let mut helpers: Vec<Box<dyn RateHelper>> = Vec::new();
    for (tenor, rate) in TREASURY_DEPOSITS {
        let quote = TenorQuote::new(tenor, rate);
        helpers.push(deposit(
            &quote,
            tenor.parse()?,
            &UnitedStatesGovernmentBond,
            Arc::new(Actual365Fixed),
            ctx,
        )?);
    }
    for (years, coupon) in TREASURY_BONDS {
        let maturity = ctx.offset(Period::years(years))?;
        let schedule = ScheduleBuilder::new(
            ctx.evaluation_date(),
            maturity,
            Period::years(1),
            &UnitedStatesGovernmentBond,
        )
        .with_convention(BusinessDayConvention::Unadjusted)
        .with_termination_convention(BusinessDayConvention::Unadjusted)
        .with_rule(DateGeneration::Backward)
        .build()?;
        let bond = FixedRateBond::new(
            2,
            100.0,
            &schedule,
            vec![coupon / 100.0],
            Arc::new(Actual365Fixed),
            BusinessDayConvention::Unadjusted,
            Arc::new(UnitedStatesGovernmentBond),
            None,
        )?;
        let (_, price) = SimpleQuote::shared(format!("{years}Y price"), 100.0);
        helpers.push(Box::new(FixedRateBondHelper::new(price, bond, ctx)?));
    }
    Ok(helpers)
}

impl CurveService {
    /// Log-cubic treasury curve from four deposits and four par bonds.
    pub fn treasury_curve(
        &self,
        request: &TreasuryCurveRequest,
    ) -> ServiceResponse<TreasuryCurveResponse> {
        self.respond("treasury_curve", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let curve = self.bootstrap(
                ctx.evaluation_date(),
                treasury_helpers(&ctx)?,
                CurveInterpolation::LogCubicDiscount,
                &[],
            )?;

            let calendar = UnitedStatesGovernmentBond;
            let quarters = self.settings().sampling.treasury_years as i32 * 4;
            let zero_rates = (0..=quarters)
                .map(|quarter| {
                    let d = calendar.advance(
                        ctx.evaluation_date(),
                        Period::months(3 * quarter),
                        BusinessDayConvention::Following,
                        false,
                    )?;
                    let z = curve.zero_rate(d, Compounding::Compounded, Frequency::Annual)?;
                    Ok(SeriesPoint::new(Real::from(quarter) / 4.0, self.percent(z.rate())))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(TreasuryCurveResponse {
                evaluation_date: ctx.evaluation_date().iso(),
                pillars: self.pillar_rows(&curve, Frequency::Annual)?,
                zero_rates,
            })
        })
    }
}

// ── Spreaded curve ────────────────────────────────────────────────────────────

/// Node years and zero rates (decimal) of the base curve.
const BASE_ZERO_NODES: [(i32, Real); 6] = [
    (0, 0.010),
    (1, 0.015),
    (3, 0.020),
    (5, 0.022),
    (10, 0.025),
    (20, 0.028),
];

/// A constant spread over a fixed zero curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadedCurveRequest {
    /// Evaluation date; the base curve starts here.
    pub evaluation_date: DateInput,
    /// Spread in basis points.
    pub spread_bps: Real,
}

/// Base and spreaded monthly zero rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadedCurveResponse {
    /// Spread applied, in basis points.
    pub spread_bps: Real,
    /// Base zero rates (annual compounding, percent) by ISO date.
    pub base: Vec<SeriesPoint<String>>,
    /// Spreaded zero rates by ISO date.
    pub spreaded: Vec<SeriesPoint<String>>,
}

impl CurveService {
    /// Shift a linear zero curve by `spread_bps` and sample both curves
    /// monthly up to the base curve's last node.
    pub fn spreaded_curve(
        &self,
        request: &SpreadedCurveRequest,
    ) -> ServiceResponse<SpreadedCurveResponse> {
        self.respond("spreaded_curve", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let dates = BASE_ZERO_NODES
                .iter()
                .map(|&(years, _)| ctx.offset(Period::years(years)))
                .collect::<Result<Vec<_>>>()?;
            let zeros = BASE_ZERO_NODES.iter().map(|&(_, z)| z).collect();
            let base: Arc<dyn YieldTermStructure> =
                Arc::new(InterpolatedCurve::zero_curve(dates, zeros, Arc::new(Actual365Fixed))?);
            let spreaded = ZeroSpreadedTermStructure::new(
                YieldTermStructureHandle::new(Arc::clone(&base)),
                SimpleQuote::shared("spread", request.spread_bps / 10_000.0).1,
            );
            spreaded.enable_extrapolation(true);

            let months = self.settings().sampling.spreaded_curve_years as i32 * 12;
            let mut base_series = Vec::new();
            let mut spreaded_series = Vec::new();
            for month in 0..months {
                let d = Target.advance(
                    ctx.evaluation_date(),
                    Period::months(month),
                    BusinessDayConvention::Following,
                    false,
                )?;
                if d >= base.max_date() {
                    break;
                }
                let b = base.zero_rate(d, Compounding::Compounded, Frequency::Annual)?;
                let s = spreaded.zero_rate(d, Compounding::Compounded, Frequency::Annual)?;
                base_series.push(SeriesPoint::new(d.iso(), self.percent(b.rate())));
                spreaded_series.push(SeriesPoint::new(d.iso(), self.percent(s.rate())));
            }

            Ok(SpreadedCurveResponse {
                spread_bps: request.spread_bps,
                base: base_series,
                spreaded: spreaded_series,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_request(instruments: CurveInstruments) -> CustomCurveRequest {
        let market_rates = match instruments {
            CurveInstruments::Bonds => vec![
                TenorQuote::new("6M", 3.53),
                TenorQuote::new("2Y", 2.25),
                TenorQuote::new("5Y", 3.00),
                TenorQuote::new("10Y", 4.00),
            ],
            CurveInstruments::Swaps => vec![
                TenorQuote::new("6M", 0.312),
                TenorQuote::new("3Y", 0.424),
                TenorQuote::new("5Y", 0.762),
                TenorQuote::new("10Y", 1.584),
            ],
        };
        CustomCurveRequest {
            evaluation_date: DateInput::new(15, 5, 2004),
            interpolation: InterpolationChoice::LinearZero,
            instruments,
            market_rates,
            horizon_years: None,
        }
    }

    #[test]
    fn money_market_split() {
        assert!(is_money_market("6M".parse().unwrap()));
        assert!(is_money_market("2W".parse().unwrap()));
        assert!(!is_money_market("12M".parse().unwrap()));
        assert!(!is_money_market("1Y".parse().unwrap()));
    }

    #[test]
    fn custom_bond_curve_samples_ten_years() {
        let service = CurveService::default();
        let r = service
            .custom_curve(&custom_request(CurveInstruments::Bonds))
            .into_result()
            .unwrap();
        assert_eq!(r.pillars.len(), 4);
        assert_eq!(r.zero_rates.len(), 120);
        assert_eq!(r.zero_rates[0].x, "2004-06-15");
        // The curve starts near the 6M deposit and ends near the 10Y bond.
        assert!((r.zero_rates[0].y - 3.5).abs() < 0.3, "{:?}", r.zero_rates[0]);
        assert!((r.zero_rates[119].y - 4.0).abs() < 0.2, "{:?}", r.zero_rates[119]);
    }

    #[test]
    fn custom_swap_curve_uses_swap_helpers() {
        let service = CurveService::default();
        let r = service
            .custom_curve(&custom_request(CurveInstruments::Swaps))
            .into_result()
            .unwrap();
        assert!(r.pillars.iter().any(|p| p.instrument == "swap 5Y"));
        assert!(r.zero_rates.iter().all(|p| p.y > 0.0 && p.y < 2.0));
    }

    #[test]
    fn bad_tenor_is_an_error_response() {
        let mut request = custom_request(CurveInstruments::Bonds);
        request.market_rates.push(TenorQuote::new("7Q", 1.0));
        let response = CurveService::default().custom_curve(&request);
        assert!(!response.is_ok());
        assert!(response.message().unwrap().contains("7Q"));
    }

    #[test]
    fn oversized_tenor_is_an_error_response() {
        for instruments in [CurveInstruments::Bonds, CurveInstruments::Swaps] {
            let mut request = custom_request(instruments);
            request.market_rates.push(TenorQuote::new("999999999Y", 3.0));
            let response = CurveService::default().custom_curve(&request);
            assert!(!response.is_ok());
            assert!(response.message().unwrap().contains("999999999Y"), "{response:?}");
        }
    }

    #[test]
    fn duplicate_pillars_are_reported() {
        let mut request = custom_request(CurveInstruments::Bonds);
        request.market_rates.push(TenorQuote::new("24M", 2.25));
        let message = CurveService::default()
            .custom_curve(&request)
            .message()
            .map(str::to_string)
            .unwrap();
        assert!(message.contains("duplicate pillar"), "{message}");
    }

    #[test]
    fn treasury_pillars_and_quarters() {
        let r = CurveService::default()
            .treasury_curve(&TreasuryCurveRequest::default())
            .into_result()
            .unwrap();
        assert_eq!(r.pillars.len(), 8);
        assert_eq!(r.pillars[4].date, "2005-05-15");
        assert_eq!(r.zero_rates.len(), 21);
        assert_eq!(r.zero_rates[20].x, 5.0);

        // The 3.82% 1W deposit (simple, Actual/365) is the highest quote.
        let one_week = ((1.0_f64 + 0.0382 * 7.0 / 365.0).powf(365.0 / 7.0) - 1.0) * 100.0;
        // x = 0 is the reference date, where the zero rate is the short rate
        // extrapolated from the first pillar.
        let (short, later) = r.zero_rates.split_first().unwrap();
        assert_eq!(short.x, 0.0);
        assert!((short.y - one_week).abs() < 0.05, "{short:?} vs {one_week}");
        for p in later {
            assert!(p.y > 1.80 && p.y < one_week + 0.02, "{p:?}");
        }
        // Falling through the deposits, rising across the bonds.
        let samples: Vec<Real> = r.zero_rates.iter().take(5).map(|p| p.y).collect();
        assert!(samples.windows(2).all(|w| w[1] < w[0]), "{samples:?}");
        let (deposits, bonds) = r.pillars.split_at(4);
        assert!(deposits.windows(2).all(|w| w[1].zero_rate < w[0].zero_rate), "{deposits:?}");
        assert!(bonds.windows(2).all(|w| w[1].zero_rate >= w[0].zero_rate), "{bonds:?}");
    }

    #[test]
    fn spread_shifts_every_sample() {
        let r = CurveService::default()
            .spreaded_curve(&SpreadedCurveRequest {
                evaluation_date: DateInput::new(15, 1, 2020),
                spread_bps: 50.0,
            })
            .into_result()
            .unwrap();
        assert_eq!(r.base.len(), r.spreaded.len());
        assert!(r.base.len() > 230 && r.base.len() <= 240);
        for (b, s) in r.base.iter().zip(&r.spreaded) {
            assert_eq!(b.x, s.x);
            // 50bp continuous is a little more than 50bp annual.
            assert!(s.y - b.y > 0.49 && s.y - b.y < 0.53, "{b:?} {s:?}");
        }
    }
}
