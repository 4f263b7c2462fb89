//! Year fractions under a chosen convention.

use super::CurveService;
use crate::choices::DayCountChoice;
use crate::types::{DateInput, SeriesPoint, ServiceResponse};
use ck_core::{errors::Result, Real};
use ck_math::{round, Rounding};
use ck_time::{Calendar, Date, Period, Target, Thirty360, Thirty360Convention};
use serde::{Deserialize, Serialize};

const FRACTION_DECIMALS: i32 = 8;

/// Message reported when 30/360 counts nothing between the 30th and the 31st.
pub const ANOMALY_MESSAGE: &str =
    "Anomaly Detected! The fraction between the 30th and 31st of this month is 0.0.";

/// Convention and period to measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCountRequest {
    /// Day-count convention.
    pub convention: DayCountChoice,
    /// Start of the period.
    pub start: DateInput,
    /// End of the period, not before the start.
    pub end: DateInput,
}

/// Fraction, day count and daily fractions from the start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCountResponse {
    /// Name of the day counter.
    pub day_counter: String,
    /// Year fraction between the dates.
    pub year_fraction: Real,
    /// Days between the dates under the convention.
    pub day_count: i64,
    /// Whether the 30/360 month-end anomaly hits the start date's month.
    pub anomaly: bool,
    /// Explanation when `anomaly` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_message: Option<String>,
    /// Fraction from the start date to each day, by ISO date.
    pub series: Vec<SeriesPoint<String>>,
}

/// Whether the last two business days of `date`'s month on TARGET are the
/// 30th and the 31st and 30/360 counts no time between them.
fn month_end_anomaly(date: Date) -> Result<bool> {
    let last = Target.end_of_month(date)?;
    let day_before = last.add_days(-1)?;
    Ok(Thirty360::new(Thirty360Convention::Usa).is_end_of_month_anomaly(day_before, last))
}

impl CurveService {
    /// Measure `[start, end]` and sample the fraction daily, capped at the
    /// configured number of years.
    pub fn day_count(&self, request: &DayCountRequest) -> ServiceResponse<DayCountResponse> {
        self.respond("day_count", || {
            let start = request.start.to_date()?;
            let end = request.end.to_date()?;
            ck_core::ensure!(
                end >= start,
                "end date {} precedes start date {}",
                end.iso(),
                start.iso()
            );
            let dc = request.convention.day_counter();
            let fraction = |v: Real| round(v, FRACTION_DECIMALS, Rounding::Closest);

            let anomaly = match request.convention {
                DayCountChoice::Thirty360 => month_end_anomaly(start)?,
                _ => false,
            };

            let cap = start.add_period(Period::years(self.settings().sampling.day_count_years as i32))?;
            let plot_end = end.min(cap);
            let mut series = Vec::with_capacity((plot_end - start) as usize + 1);
            let mut d = start;
            while d <= plot_end {
                let y = match request.convention {
                    DayCountChoice::ActualActual => dc.year_fraction_with_ref(start, d, start, plot_end),
                    _ => dc.year_fraction(start, d),
                };
                series.push(SeriesPoint::new(d.iso(), fraction(y)));
                d = d.add_days(1)?;
            }

            Ok(DayCountResponse {
                day_counter: dc.name().to_string(),
                year_fraction: fraction(dc.year_fraction(start, end)),
                day_count: dc.day_count(start, end),
                anomaly,
                anomaly_message: anomaly.then(|| ANOMALY_MESSAGE.to_string()),
                series,
            })
        })
    }
}
