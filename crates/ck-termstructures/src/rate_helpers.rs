//! Rate helpers for yield-curve bootstrapping.
//!
//! A *rate helper* couples a market quote with the instrument conventions
//! needed to price that quote on a curve. The bootstrapper moves the node at
//! the helper's pillar date until the implied quote matches the market one.
//!
//! Instrument-based helpers (bonds, swaps, OIS) live in `ck-instruments`;
//! this module holds the trait and the money-market deposit.

use crate::yield_term_structure::YieldTermStructure;
use ck_core::errors::{Error, Result};
use ck_core::{Real, Time};
use ck_quotes::QuoteHandle;
use ck_time::{
    BusinessDayConvention, Calendar, Date, DayCounter, EvaluationContext, Period,
};
use std::sync::Arc;

// ── RateHelper trait ──────────────────────────────────────────────────────────

/// A single market quote that constrains the yield curve at a pillar date.
pub trait RateHelper: std::fmt::Debug + Send + Sync {
    /// The date up to which this helper constrains the curve.
    fn pillar_date(&self) -> Date;

    /// The first date at which the helper needs the curve.
    fn earliest_date(&self) -> Date;

    /// Handle to the market quote.
    fn quote(&self) -> &QuoteHandle;

    /// The quote implied by `curve`.
    ///
    /// Range errors from the curve are reported as
    /// [`Error::HelperOutOfRange`].
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real>;

    /// Short label used in errors and logs, e.g. `"deposit 3M"`.
    fn description(&self) -> String;

    /// `implied - market` on `curve`.
    fn quote_error(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        let market = self.quote().current().checked_value()?;
        Ok(self.implied_quote(curve)? - market)
    }
}

/// Turn a curve range error into [`Error::HelperOutOfRange`] for `helper`;
/// every other error passes through.
pub fn helper_range_error(helper: &str, err: Error) -> Error {
    match err {
        Error::Extrapolation(reason) => Error::HelperOutOfRange {
            helper: helper.to_string(),
            reason,
        },
        other => other,
    }
}

// ── DepositRateHelper ─────────────────────────────────────────────────────────

/// A money-market deposit quoted as a simple rate.
///
/// The implied quote is the simple forward rate over the deposit period:
/// `(P(settlement) / P(maturity) - 1) / τ`.
#[derive(Debug)]
pub struct DepositRateHelper {
    quote: QuoteHandle,
    tenor: Option<Period>,
    settlement_date: Date,
    maturity_date: Date,
    day_counter: Arc<dyn DayCounter>,
}

impl DepositRateHelper {
    /// Deposit over explicit settlement and maturity dates.
    pub fn new(
        quote: QuoteHandle,
        settlement_date: Date,
        maturity_date: Date,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        ck_core::ensure!(
            maturity_date > settlement_date,
            "deposit maturity ({}) must follow settlement ({})",
            maturity_date.iso(),
            settlement_date.iso()
        );
        Ok(Self {
            quote,
            tenor: None,
            settlement_date,
            maturity_date,
            day_counter,
        })
    }

    /// Deposit starting `fixing_days` business days after the evaluation
    /// date and running for `tenor`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_tenor(
        quote: QuoteHandle,
        tenor: Period,
        fixing_days: u32,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_counter: Arc<dyn DayCounter>,
        ctx: &EvaluationContext,
    ) -> Result<Self> {
        let settlement = ctx.settlement_date(calendar, fixing_days)?;
        let maturity = calendar.advance(settlement, tenor, convention, end_of_month)?;
        let mut helper = Self::new(quote, settlement, maturity, day_counter)?;
        helper.tenor = Some(tenor);
        Ok(helper)
    }

    /// Settlement (start) date.
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Accrual fraction of the deposit.
    pub fn accrual(&self) -> Time {
        self.day_counter
            .year_fraction(self.settlement_date, self.maturity_date)
    }
}

impl RateHelper for DepositRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn earliest_date(&self) -> Date {
        self.settlement_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Result<Real> {
        let on_curve = |d: Date| {
            curve
                .discount(d)
                .map_err(|e| helper_range_error(&self.description(), e))
        };
        let df_settle = on_curve(self.settlement_date)?;
        let df_maturity = on_curve(self.maturity_date)?;
        Ok((df_settle / df_maturity - 1.0) / self.accrual())
    }

    fn description(&self) -> String {
        match self.tenor {
            Some(tenor) => format!("deposit {tenor}"),
            None => format!(
                "deposit {}..{}",
                self.settlement_date.iso(),
                self.maturity_date.iso()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_forward::FlatForward;
    use approx::assert_abs_diff_eq;
    use ck_quotes::SimpleQuote;
    use ck_time::{Actual360, Actual365Fixed, Target};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn deposit_dates_follow_conventions() {
        // Friday 2016-03-11, T+2 on TARGET is Tuesday 2016-03-15.
        let ctx = EvaluationContext::new(date(2016, 3, 11));
        let (_, quote) = SimpleQuote::shared("3M", 0.01);
        let helper = DepositRateHelper::from_tenor(
            quote,
            Period::months(3),
            2,
            &Target,
            BusinessDayConvention::ModifiedFollowing,
            false,
            Arc::new(Actual360),
            &ctx,
        )
        .unwrap();
        assert_eq!(helper.settlement_date(), date(2016, 3, 15));
        assert_eq!(helper.maturity_date(), date(2016, 6, 15));
        assert_eq!(helper.description(), "deposit 3M");
    }

    #[test]
    fn implied_quote_on_flat_curve() {
        let reference = date(2020, 1, 2);
        let curve = FlatForward::continuous(reference, 0.03, Arc::new(Actual365Fixed)).unwrap();
        let (_, quote) = SimpleQuote::shared("6M", 0.0);
        let helper =
            DepositRateHelper::new(quote, reference, date(2020, 7, 2), Arc::new(Actual360)).unwrap();
        let tau365 = Actual365Fixed.year_fraction(reference, date(2020, 7, 2));
        let expected = ((0.03 * tau365).exp() - 1.0) / helper.accrual();
        assert_abs_diff_eq!(helper.implied_quote(&curve).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn range_errors_name_the_helper() {
        let reference = date(2020, 1, 2);
        let curve = FlatForward::continuous(reference, 0.03, Arc::new(Actual365Fixed)).unwrap();
        let (_, quote) = SimpleQuote::shared("old", 0.01);
        let helper = DepositRateHelper::new(
            quote,
            date(2019, 6, 1),
            date(2019, 12, 1),
            Arc::new(Actual360),
        )
        .unwrap();
        match helper.implied_quote(&curve) {
            Err(Error::HelperOutOfRange { helper, .. }) => {
                assert_eq!(helper, "deposit 2019-06-01..2019-12-01")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_inverted_dates() {
        let (_, quote) = SimpleQuote::shared("bad", 0.01);
        assert!(DepositRateHelper::new(
            quote,
            date(2020, 6, 1),
            date(2020, 6, 1),
            Arc::new(Actual360)
        )
        .is_err());
    }
}
