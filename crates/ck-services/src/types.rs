//! Types shared by every request and response.

use ck_core::{errors::Result, Real};
use ck_time::Date;
use serde::{Deserialize, Serialize};

/// A calendar date as it crosses the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInput {
    /// Day of month, 1-based.
    pub day: u32,
    /// Month, 1 = January.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}

impl DateInput {
    /// `{day, month, year}`.
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    /// Validate into a [`Date`].
    pub fn to_date(self) -> Result<Date> {
        Date::from_dmy(self.day, self.month, self.year)
    }
}

impl From<Date> for DateInput {
    fn from(d: Date) -> Self {
        Self::new(
            u32::from(d.day_of_month()),
            u32::from(d.month()),
            i32::from(d.year()),
        )
    }
}

/// One sample of a plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<X> {
    /// Abscissa: an ISO date or a time in years.
    pub x: X,
    /// Ordinate, usually a rate in percent.
    pub y: Real,
}

impl<X> SeriesPoint<X> {
    /// Point `(x, y)`.
    pub fn new(x: X, y: Real) -> Self {
        Self { x, y }
    }
}

/// Envelope returned by every service call.
///
/// Serializes as the payload's own fields next to `"status": "ok"`, or as
/// `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServiceResponse<T> {
    /// The call succeeded.
    Ok(T),
    /// The call failed; nothing was computed.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl<T> ServiceResponse<T> {
    /// Successful response.
    pub fn ok(value: T) -> Self {
        ServiceResponse::Ok(value)
    }

    /// Failed response.
    pub fn error(message: impl Into<String>) -> Self {
        ServiceResponse::Error {
            message: message.into(),
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, ServiceResponse::Ok(_))
    }

    /// The payload of a successful call.
    pub fn value(&self) -> Option<&T> {
        match self {
            ServiceResponse::Ok(v) => Some(v),
            ServiceResponse::Error { .. } => None,
        }
    }

    /// The message of a failed call.
    pub fn message(&self) -> Option<&str> {
        match self {
            ServiceResponse::Ok(_) => None,
            ServiceResponse::Error { message } => Some(message),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            ServiceResponse::Ok(v) => Ok(v),
            ServiceResponse::Error { message } => Err(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::Error;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        rate: Real,
    }

    #[test]
    fn date_input_validates() {
        let d = DateInput::new(15, 5, 2004).to_date().unwrap();
        assert_eq!(d.iso(), "2004-05-15");
        assert_eq!(DateInput::from(d), DateInput::new(15, 5, 2004));
        assert!(matches!(
            DateInput::new(31, 2, 2024).to_date(),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn ok_envelope_flattens_the_payload() {
        let response = ServiceResponse::ok(Payload { rate: 1.25 });
        let v = serde_json::to_value(&response).unwrap();
        assert_eq!(v, json!({"status": "ok", "rate": 1.25}));
        let back: ServiceResponse<Payload> = serde_json::from_value(v).unwrap();
        assert_eq!(back.value(), Some(&Payload { rate: 1.25 }));
    }

    #[test]
    fn error_envelope_carries_the_message() {
        let response: ServiceResponse<Payload> = ServiceResponse::error("bad tenor");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "error", "message": "bad tenor"})
        );
        assert_eq!(response.message(), Some("bad tenor"));
        assert_eq!(response.into_result(), Err("bad tenor".to_string()));
    }

    #[test]
    fn series_points_serialize_as_xy() {
        let p = SeriesPoint::new("2020-01-31".to_string(), 1.5);
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({"x": "2020-01-31", "y": 1.5}));
    }
}
