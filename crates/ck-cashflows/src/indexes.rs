//! Interest-rate indexes: Ibor (term) and overnight.
//!
//! An index knows its fixing conventions and keeps a history of published
//! fixings. Fixings whose value date precedes the forecast curve's reference
//! date must come from that history; later ones are forecast off the curve
//! supplied by the caller.

use ck_core::errors::{Error, Result};
use ck_core::{Rate, Real};
use ck_termstructures::YieldTermStructure;
use ck_time::{
    Actual360, BusinessDayConvention, Calendar, Date, DayCounter, Period, Target, TimeUnit,
};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

// ── Fixing history ────────────────────────────────────────────────────────────

/// Thread-safe map from fixing date to published value.
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct FixingStore {
    data: Arc<RwLock<BTreeMap<Date, Real>>>,
}

impl FixingStore {
    /// Create a new, empty fixing store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or overwrite) a fixing.
    pub fn add(&self, date: Date, value: Real) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(date, value);
    }

    /// Look up a fixing.
    pub fn get(&self, date: Date) -> Option<Real> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&date)
            .copied()
    }

    /// Number of stored fixings.
    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all fixings.
    pub fn clear(&self) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn missing_fixing(name: &str, date: Date) -> Error {
    Error::MissingQuote(format!("{name} fixing for {}", date.iso()))
}

// ── IborIndex ─────────────────────────────────────────────────────────────────

/// An interbank offered-rate index such as Euribor 6M.
#[derive(Debug, Clone)]
pub struct IborIndex {
    name: String,
    tenor: Period,
    fixing_days: u32,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    end_of_month: bool,
    day_counter: Arc<dyn DayCounter>,
    fixings: FixingStore,
}

impl IborIndex {
    /// Create a new Ibor index named `family` + tenor, e.g. `Euribor6M`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        family: &str,
        tenor: Period,
        fixing_days: u32,
        calendar: Arc<dyn Calendar>,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_counter: Arc<dyn DayCounter>,
    ) -> Self {
        Self {
            name: format!("{family}{tenor}"),
            tenor,
            fixing_days,
            calendar,
            convention,
            end_of_month,
            day_counter,
            fixings: FixingStore::new(),
        }
    }

    /// Euribor with the given tenor: TARGET, T+2, Actual/360. Tenors of a
    /// month or more roll Modified Following with the end-of-month rule,
    /// shorter ones roll Following.
    pub fn euribor(tenor: Period) -> Self {
        let monthly = matches!(tenor.unit, TimeUnit::Months | TimeUnit::Years);
        let convention = if monthly {
            BusinessDayConvention::ModifiedFollowing
        } else {
            BusinessDayConvention::Following
        };
        Self::new(
            "Euribor",
            tenor,
            2,
            Arc::new(Target),
            convention,
            monthly,
            Arc::new(Actual360),
        )
    }

    /// Euribor 6M.
    pub fn euribor6m() -> Self {
        Self::euribor(Period::months(6))
    }

    /// Index name, e.g. `Euribor6M`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tenor of the underlying deposit.
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// Business days between fixing and value date.
    pub fn fixing_days(&self) -> u32 {
        self.fixing_days
    }

    /// Fixing calendar.
    pub fn fixing_calendar(&self) -> &dyn Calendar {
        &*self.calendar
    }

    /// Roll convention for the deposit maturity.
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Whether maturities follow the end-of-month rule.
    pub fn end_of_month(&self) -> bool {
        self.end_of_month
    }

    /// Day counter of the quoted rate.
    pub fn day_counter(&self) -> Arc<dyn DayCounter> {
        Arc::clone(&self.day_counter)
    }

    /// The fixing history.
    pub fn fixing_store(&self) -> &FixingStore {
        &self.fixings
    }

    /// Record a published fixing.
    pub fn add_fixing(&self, date: Date, value: Rate) {
        self.fixings.add(date, value);
    }

    /// Fixing date for a deposit starting on `value_date`.
    pub fn fixing_date(&self, value_date: Date) -> Result<Date> {
        self.calendar
            .advance_business_days(value_date, -(self.fixing_days as i32))
    }

    /// Start of the deposit fixed on `fixing_date`.
    pub fn value_date(&self, fixing_date: Date) -> Result<Date> {
        self.calendar
            .advance_business_days(fixing_date, self.fixing_days as i32)
    }

    /// End of the deposit starting on `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> Result<Date> {
        self.calendar
            .advance(value_date, self.tenor, self.convention, self.end_of_month)
    }

    /// Simple forward rate over the deposit fixed on `fixing_date`.
    pub fn forecast_fixing(
        &self,
        fixing_date: Date,
        forecast: &dyn YieldTermStructure,
    ) -> Result<Rate> {
        let start = self.value_date(fixing_date)?;
        let end = self.maturity_date(start)?;
        let tau = self.day_counter.year_fraction(start, end);
        ck_core::ensure!(tau > 0.0, "{}: empty deposit period at {}", self.name, start.iso());
        Ok((forecast.discount(start)? / forecast.discount(end)? - 1.0) / tau)
    }

    /// The fixing on `fixing_date`: the stored value if there is one,
    /// otherwise a forecast. A deposit that started before the curve's
    /// reference date cannot be forecast.
    pub fn fixing(&self, fixing_date: Date, forecast: &dyn YieldTermStructure) -> Result<Rate> {
        if let Some(value) = self.fixings.get(fixing_date) {
            return Ok(value);
        }
        if self.value_date(fixing_date)? < forecast.reference_date() {
            return Err(missing_fixing(&self.name, fixing_date));
        }
        self.forecast_fixing(fixing_date, forecast)
    }
}

// ── OvernightIndex ────────────────────────────────────────────────────────────

/// An overnight index such as Eonia.
#[derive(Debug, Clone)]
pub struct OvernightIndex {
    name: String,
    fixing_days: u32,
    calendar: Arc<dyn Calendar>,
    day_counter: Arc<dyn DayCounter>,
    fixings: FixingStore,
}

impl OvernightIndex {
    /// Create a new overnight index.
    pub fn new(
        name: impl Into<String>,
        fixing_days: u32,
        calendar: Arc<dyn Calendar>,
        day_counter: Arc<dyn DayCounter>,
    ) -> Self {
        Self {
            name: name.into(),
            fixing_days,
            calendar,
            day_counter,
            fixings: FixingStore::new(),
        }
    }

    /// Eonia: TARGET, same-day fixing, Actual/360.
    pub fn eonia() -> Self {
        Self::new("Eonia", 0, Arc::new(Target), Arc::new(Actual360))
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Business days between fixing and value date.
    pub fn fixing_days(&self) -> u32 {
        self.fixing_days
    }

    /// Fixing calendar.
    pub fn fixing_calendar(&self) -> &dyn Calendar {
        &*self.calendar
    }

    /// Day counter of the quoted rate.
    pub fn day_counter(&self) -> Arc<dyn DayCounter> {
        Arc::clone(&self.day_counter)
    }

    /// The fixing history.
    pub fn fixing_store(&self) -> &FixingStore {
        &self.fixings
    }

    /// Record a published fixing.
    pub fn add_fixing(&self, date: Date, value: Rate) {
        self.fixings.add(date, value);
    }

    /// Stored fixing for `date`, required for dates before the curve.
    pub fn past_fixing(&self, date: Date) -> Result<Rate> {
        self.fixings
            .get(date)
            .ok_or_else(|| missing_fixing(&self.name, date))
    }

    /// Simple overnight forward from `date` to the next business day.
    pub fn forecast_fixing(&self, date: Date, forecast: &dyn YieldTermStructure) -> Result<Rate> {
        let next = self.calendar.advance_business_days(date, 1)?;
        let tau = self.day_counter.year_fraction(date, next);
        Ok((forecast.discount(date)? / forecast.discount(next)? - 1.0) / tau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ck_termstructures::FlatForward;
    use ck_time::Actual365Fixed;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn fixing_store_is_shared_by_clones() {
        let store = FixingStore::new();
        let copy = store.clone();
        store.add(date(2025, 1, 15), 0.035);
        assert_eq!(copy.get(date(2025, 1, 15)), Some(0.035));
        assert!(copy.get(date(2025, 1, 16)).is_none());
        assert_eq!(copy.len(), 1);
        copy.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn euribor_conventions() {
        let index = IborIndex::euribor6m();
        assert_eq!(index.name(), "Euribor6M");
        assert_eq!(index.fixing_days(), 2);
        assert!(index.end_of_month());
        let weekly = IborIndex::euribor(Period::weeks(1));
        assert_eq!(weekly.business_day_convention(), BusinessDayConvention::Following);
        assert!(!weekly.end_of_month());
    }

    #[test]
    fn euribor_dates() {
        let index = IborIndex::euribor6m();
        // Tuesday 2016-03-08 fixes for Thursday 2016-03-10.
        let value = index.value_date(date(2016, 3, 8)).unwrap();
        assert_eq!(value, date(2016, 3, 10));
        assert_eq!(index.fixing_date(value).unwrap(), date(2016, 3, 8));
        assert_eq!(index.maturity_date(value).unwrap(), date(2016, 9, 12));
    }

    #[test]
    fn forecast_matches_simple_forward() {
        let today = date(2016, 3, 8);
        let curve = FlatForward::continuous(today, 0.02, Arc::new(Actual365Fixed)).unwrap();
        let index = IborIndex::euribor6m();
        let start = index.value_date(today).unwrap();
        let end = index.maturity_date(start).unwrap();
        let tau = (end - start) as f64 / 360.0;
        let expected = ((0.02 * (end - start) as f64 / 365.0).exp() - 1.0) / tau;
        assert_abs_diff_eq!(index.fixing(today, &curve).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn past_fixings_come_from_history() {
        let today = date(2016, 3, 8);
        let curve = FlatForward::continuous(today, 0.02, Arc::new(Actual365Fixed)).unwrap();
        let index = IborIndex::euribor6m();
        let past = date(2016, 2, 1);
        assert!(matches!(index.fixing(past, &curve), Err(Error::MissingQuote(_))));
        index.add_fixing(past, 0.0012);
        assert_eq!(index.fixing(past, &curve).unwrap(), 0.0012);
    }

    #[test]
    fn eonia_overnight_forecast() {
        // Friday: the overnight deposit runs over the weekend.
        let friday = date(2016, 3, 11);
        let curve = FlatForward::continuous(friday, 0.01, Arc::new(Actual360)).unwrap();
        let eonia = OvernightIndex::eonia();
        let rate = eonia.forecast_fixing(friday, &curve).unwrap();
        let expected = ((0.01f64 * 3.0 / 360.0).exp() - 1.0) * 120.0;
        assert_abs_diff_eq!(rate, expected, epsilon = 1e-14);
        assert!(eonia.past_fixing(friday).is_err());
    }
}
