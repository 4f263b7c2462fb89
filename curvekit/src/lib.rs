//! # curvekit
//!
//! Piecewise yield-curve bootstrapping: rate helpers solved pillar by
//! pillar, curves observed through relinkable handles, spreads layered on
//! top, and request/response services that turn market quotes into
//! display-ready series.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on it rather than on the individual
//! `ck-*` crates.
//!
//! ```rust
//! use std::sync::Arc;
//! use curvekit::termstructures::{FlatForward, YieldTermStructure};
//! use curvekit::time::{Actual365Fixed, Date};
//!
//! let today = Date::from_ymd(2024, 1, 15).unwrap();
//! let curve = FlatForward::continuous(today, 0.03, Arc::new(Actual365Fixed)).unwrap();
//! assert_eq!(curve.discount(today).unwrap(), 1.0);
//! let one_year = curve.discount(Date::from_ymd(2025, 1, 14).unwrap()).unwrap();
//! assert!((one_year - (-0.03f64).exp()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Scalar aliases, errors and handles.
pub use ck_core as core;

/// Dates, calendars, day counters and schedules.
pub use ck_time as time;

/// Interpolation, root finding and rounding.
pub use ck_math as math;

/// Market quotes.
pub use ck_quotes as quotes;

/// Yield curves, rate helpers and the bootstrap.
pub use ck_termstructures as termstructures;

/// Cash flows, coupons and indexes.
pub use ck_cashflows as cashflows;

/// Bonds, swaps, their helpers and engines.
pub use ck_instruments as instruments;

/// Request/response services.
pub use ck_services as services;
