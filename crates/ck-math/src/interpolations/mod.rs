//! 1D interpolation trait and implementations.
//!
//! Every scheme exposes its value, first derivative and primitive
//! analytically so that curves built on top of them can compute
//! instantaneous forwards and integrated forwards without finite
//! differences. Outside `[x_min, x_max]` each scheme extends its boundary
//! segment.

use ck_core::{errors::Result, Real};

mod cubic;

pub use cubic::CubicNaturalSpline;

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// First derivative at `x`.
    fn derivative(&self, x: Real) -> Real;

    /// Integral of the interpolant from `x_min()` to `x`.
    fn primitive(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Binary search: find `i` such that `xs[i] <= x < xs[i+1]`, clamped to the
/// first and last segment.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    xs.partition_point(|&xi| xi <= x) - 1
}

pub(crate) fn check_nodes(xs: &[Real], ys: &[Real]) -> Result<()> {
    ck_core::ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
    ck_core::ensure!(
        xs.len() == ys.len(),
        "xs and ys must have the same length ({} != {})",
        xs.len(),
        ys.len()
    );
    ck_core::ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "interpolation abscissae must be strictly increasing"
    );
    ck_core::ensure!(
        ys.iter().all(|y| y.is_finite()),
        "interpolation ordinates must be finite"
    );
    Ok(())
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    slopes: Vec<Real>,
    // Integral from xs[0] to xs[i].
    areas: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from sorted `xs` and corresponding `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices have different lengths, fewer than 2
    /// points, or `xs` is not strictly increasing.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let slopes: Vec<Real> = xs
            .windows(2)
            .zip(ys.windows(2))
            .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
            .collect();
        let mut areas = Vec::with_capacity(xs.len());
        areas.push(0.0);
        for i in 0..xs.len() - 1 {
            let dx = xs[i + 1] - xs[i];
            areas.push(areas[i] + 0.5 * dx * (ys[i] + ys[i + 1]));
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes,
            areas,
        })
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slopes[i]
    }

    fn derivative(&self, x: Real) -> Real {
        self.slopes[locate(&self.xs, x)]
    }

    fn primitive(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.areas[i] + dx * (self.ys[i] + 0.5 * dx * self.slopes[i])
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

// ── Backward flat ─────────────────────────────────────────────────────────────

/// Backward-flat (step) interpolation.
///
/// On `(x[i-1], x[i]]` the value is `y[i]`; left of `x[0]` it is `y[0]`
/// and right of the last node it is the last value. The derivative is zero
/// everywhere, so a curve whose instantaneous forward is backward-flat jumps
/// at every node.
#[derive(Debug, Clone)]
pub struct BackwardFlatInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    areas: Vec<Real>,
}

impl BackwardFlatInterpolation {
    /// Construct a backward-flat interpolation.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let mut areas = Vec::with_capacity(xs.len());
        areas.push(0.0);
        for i in 1..xs.len() {
            areas.push(areas[i - 1] + (xs[i] - xs[i - 1]) * ys[i]);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            areas,
        })
    }

    // Index of the node whose value applies at `x`.
    fn node_for(&self, x: Real) -> usize {
        if x <= self.xs[0] {
            return 0;
        }
        self.xs
            .partition_point(|&xi| xi < x)
            .min(self.xs.len() - 1)
    }
}

impl Interpolation1D for BackwardFlatInterpolation {
    fn value(&self, x: Real) -> Real {
        self.ys[self.node_for(x)]
    }

    fn derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn primitive(&self, x: Real) -> Real {
        if x <= self.xs[0] {
            return (x - self.xs[0]) * self.ys[0];
        }
        let i = self.node_for(x);
        if x > self.xs[i] {
            // beyond the last node
            return self.areas[i] + (x - self.xs[i]) * self.ys[i];
        }
        self.areas[i - 1] + (x - self.xs[i - 1]) * self.ys[i]
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
