//! Forwards read back from a backward-flat forward curve.
//!
//! On such a curve the forward over `(t[i-1], t[i]]` is the node value
//! `f[i]`. A forward measured over a short period starting exactly at a
//! node already lies in the next segment and returns `f[i+1]`, so reading
//! the curve back at its own nodes does not give the inputs.

use super::CurveService;
use crate::types::{DateInput, SeriesPoint, ServiceResponse};
use ck_core::{errors::Result, Compounding, Rate, Real, Time};
use ck_termstructures::{InterpolatedCurve, TermStructure, YieldTermStructure};
use ck_time::{Actual360, DayCounter, EvaluationContext, Frequency, Period};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Node years and forward rates (decimal).
const FORWARD_NODES: [(i32, Rate); 7] = [
    (0, 0.010),
    (1, 0.030),
    (2, 0.020),
    (3, 0.025),
    (5, 0.035),
    (10, 0.050),
    (20, 0.040),
];

/// Length of the period each sampled forward is measured over.
const FORWARD_STEP: Time = 1.0e-4;

fn default_glitch_date() -> DateInput {
    DateInput::new(15, 5, 2015)
}

/// Date the forward curve starts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardGlitchRequest {
    /// Reference date, 15 May 2015 by default.
    #[serde(default = "default_glitch_date")]
    pub evaluation_date: DateInput,
}

impl Default for ForwardGlitchRequest {
    fn default() -> Self {
        Self {
            evaluation_date: default_glitch_date(),
        }
    }
}

/// Input forward against the forward read back at one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCheck {
    /// ISO node date.
    pub date: String,
    /// Node time in years (Actual/360).
    pub time: Time,
    /// Forward given at the node, percent.
    pub expected: Real,
    /// Forward read back at the node, percent.
    pub retrieved: Real,
}

/// Sampled forwards and the node table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardGlitchResponse {
    /// Forwards in percent by time in years.
    pub forwards: Vec<SeriesPoint<Real>>,
    /// One row per node.
    pub nodes: Vec<NodeCheck>,
    /// Nodes whose read-back forward differs from the input.
    pub mismatches: usize,
}

fn forward_at(curve: &dyn YieldTermStructure, t: Time) -> Result<Rate> {
    Ok(curve
        .forward_rate_t(t, t + FORWARD_STEP, Compounding::Continuous, Frequency::NoFrequency)?
        .rate())
}

impl CurveService {
    /// Sample a backward-flat forward curve and compare it with its inputs
    /// at the nodes.
    pub fn forward_glitch(
        &self,
        request: &ForwardGlitchRequest,
    ) -> ServiceResponse<ForwardGlitchResponse> {
        self.respond("forward_glitch", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let dates = FORWARD_NODES
                .iter()
                .map(|&(years, _)| ctx.offset(Period::years(years)))
                .collect::<Result<Vec<_>>>()?;
            let forwards: Vec<Rate> = FORWARD_NODES.iter().map(|&(_, f)| f).collect();
            let day_counter = Actual360;
            let curve = InterpolatedCurve::forward_curve(dates.clone(), forwards.clone(), Arc::new(day_counter))?;
            curve.enable_extrapolation(true);

            let sampling = &self.settings().sampling;
            let samples = super::linspace(0.0, sampling.glitch_years, sampling.glitch_points)
                .map(|t| Ok(SeriesPoint::new(t, self.percent(forward_at(&curve, t)?))))
                .collect::<Result<Vec<_>>>()?;

            let nodes = dates
                .iter()
                .zip(&forwards)
                .map(|(&d, &f)| {
                    let t = day_counter.year_fraction(ctx.evaluation_date(), d);
                    Ok(NodeCheck {
                        date: d.iso(),
                        time: t,
                        expected: self.percent(f),
                        retrieved: self.percent(forward_at(&curve, t)?),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let mismatches = nodes.iter().filter(|n| n.expected != n.retrieved).count();

            Ok(ForwardGlitchResponse {
                forwards: samples,
                nodes,
                mismatches,
            })
        })
    }
}
