//! # ck-services
//!
//! Request/response services over the curvekit crates. Each use case takes a
//! serde request (rates in percent, spreads in basis points, dates as
//! `{day, month, year}`), builds the curves it needs for its own evaluation
//! date and answers with a [`ServiceResponse`]: the payload tagged
//! `"status": "ok"`, or `"status": "error"` with a message.
//!
//! ```
//! use ck_services::{CurveService, DayCountChoice, DayCountRequest, DateInput};
//!
//! let service = CurveService::default();
//! let response = service.day_count(&DayCountRequest {
//!     convention: DayCountChoice::Thirty360,
//!     start: DateInput::new(30, 1, 2024),
//!     end: DateInput::new(31, 1, 2024),
//! });
//! let answer = response.value().unwrap();
//! assert_eq!(answer.year_fraction, 0.0);
//! assert!(answer.anomaly);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Closed choice enums parsed at the request boundary.
pub mod choices;

/// `ServiceSettings`: bootstrap accuracy, display precision, horizons.
pub mod settings;

/// `CurveService` and one module per use case.
pub mod services;

/// `init_tracing` for binaries and tests.
pub mod telemetry;

/// Boundary types: dates, series points, the response envelope.
pub mod types;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use choices::{
    CalendarChoice, ConventionChoice, CurveInstruments, DayCountChoice, InterpolationChoice,
    ShockType,
};
pub use services::coupons::{CouponDetails, CouponDetailsRequest, CouponDetailsResponse};
pub use services::curves::{
    CustomCurveRequest, CustomCurveResponse, PillarRow, SpreadedCurveRequest,
    SpreadedCurveResponse, TenorQuote, TreasuryCurveRequest, TreasuryCurveResponse,
};
pub use services::dates::{DateToolsRequest, DateToolsResponse};
pub use services::day_count::{DayCountRequest, DayCountResponse};
pub use services::eonia::{EoniaCurveRequest, EoniaCurveResponse};
pub use services::euribor::{EuriborCurveRequest, EuriborCurveResponse};
pub use services::glitch::{ForwardGlitchRequest, ForwardGlitchResponse, NodeCheck};
pub use services::quotes::{QuoteLabRequest, QuoteLabResponse};
pub use services::sensitivity::{SensitivityRequest, SensitivityResponse};
pub use services::CurveService;
pub use settings::{BootstrapSettings, SamplingSettings, ServiceSettings};
pub use telemetry::init_tracing;
pub use types::{DateInput, SeriesPoint, ServiceResponse};
