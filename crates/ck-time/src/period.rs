//! Tenors: [`Period`], its [`TimeUnit`] and the coupon [`Frequency`].

use std::str::FromStr;

use ck_core::errors::{Error, Result};
use ck_core::Real;

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Days; calendars count them as business days.
    Days,
    /// Seven days.
    Weeks,
    /// Months, clamped to the end of the target month.
    Months,
    /// Twelve months.
    Years,
}

impl TimeUnit {
    /// Tenor letter: `D`, `W`, `M` or `Y`.
    pub fn code(&self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(TimeUnit::Days),
            'W' => Some(TimeUnit::Weeks),
            'M' => Some(TimeUnit::Months),
            'Y' => Some(TimeUnit::Years),
            _ => None,
        }
    }
}

/// Coupon or compounding frequency; the discriminant is the number of
/// periods per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Simple and continuous rates.
    NoFrequency = -1,
    /// A single payment at maturity.
    Once = 0,
    /// Once a year.
    Annual = 1,
    /// Twice a year.
    Semiannual = 2,
    /// Every three months.
    Quarterly = 4,
    /// Every month.
    Monthly = 12,
    /// Every week.
    Weekly = 52,
    /// Every day.
    Daily = 365,
}

impl Frequency {
    /// Periods per year, `None` for `NoFrequency`.
    pub fn periods_per_year(&self) -> Option<u32> {
        u32::try_from(*self as i32).ok()
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A time span made up of an integer length and a [`TimeUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Shorthand for `n` days.
    pub fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// Shorthand for `n` weeks.
    pub fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// Shorthand for `n` months.
    pub fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// Shorthand for `n` years.
    pub fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Construct the coupon period of a [`Frequency`].
    ///
    /// # Errors
    /// Returns an error for `NoFrequency`.
    pub fn from_frequency(freq: Frequency) -> Result<Self> {
        match freq {
            Frequency::NoFrequency => Err(Error::InvalidArgument(format!(
                "cannot convert {freq} to a Period"
            ))),
            Frequency::Once => Ok(Period::years(0)),
            Frequency::Annual => Ok(Period::years(1)),
            Frequency::Semiannual => Ok(Period::months(6)),
            Frequency::Quarterly => Ok(Period::months(3)),
            Frequency::Monthly => Ok(Period::months(1)),
            Frequency::Weekly => Ok(Period::weeks(1)),
            Frequency::Daily => Ok(Period::days(1)),
        }
    }

    /// Rough length in years, used to order and classify tenors.
    pub fn approx_years(&self) -> Real {
        let n = self.length as Real;
        match self.unit {
            TimeUnit::Days => n / 365.0,
            TimeUnit::Weeks => n * 7.0 / 365.0,
            TimeUnit::Months => n / 12.0,
            TimeUnit::Years => n,
        }
    }

    /// Negate the period (reverse direction). `i32::MIN` saturates.
    pub fn negated(self) -> Self {
        Self {
            length: self.length.saturating_neg(),
            unit: self.unit,
        }
    }
}

impl std::ops::Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        self.negated()
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse a tenor such as `"1W"`, `"6M"`, `"10Y"` or `"2d"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = || Error::InvalidArgument(format!("cannot parse tenor {s:?}"));
        let unit_char = s.chars().last().ok_or_else(bad)?;
        let unit = TimeUnit::from_code(unit_char).ok_or_else(bad)?;
        let length = s[..s.len() - unit_char.len_utf8()]
            .parse::<i32>()
            .map_err(|_| bad())?;
        Ok(Period::new(length, unit))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.unit.code())
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}
