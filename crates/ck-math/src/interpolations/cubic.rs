//! Natural cubic spline.
//!
//! The second derivatives at the nodes solve the usual tridiagonal system
//! (zero curvature at both ends); they are turned into node slopes and the
//! spline is then stored, per interval `[x_i, x_{i+1}]`, as
//!
//!   `f(x) = y_i + dx*(a_i + dx*(b_i + dx*c_i))`,  `dx = x - x_i`.

use ck_core::{errors::Result, Real};
use nalgebra::{DMatrix, DVector};

use super::{check_nodes, locate, Interpolation1D};

/// Natural cubic spline interpolation (C² and non-local).
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    a: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
    // Integral from xs[0] to xs[i].
    areas: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Build a natural cubic spline through `(xs, ys)`.
    ///
    /// Two points give the straight line through them.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let n = xs.len();
        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = ys
            .windows(2)
            .zip(&h)
            .map(|(y, dx)| (y[1] - y[0]) / dx)
            .collect();

        let m = second_derivatives(&h, &s)?;

        let mut ts = Vec::with_capacity(n);
        for i in 0..n - 1 {
            ts.push(s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
        }
        ts.push(s[n - 2] + h[n - 2] * (m[n - 2] + 2.0 * m[n - 1]) / 6.0);

        let (a, b, c) = compute_coefficients(&h, &s, &ts);

        let mut areas = Vec::with_capacity(n);
        areas.push(0.0);
        for i in 0..n - 1 {
            let area = segment_integral(ys[i], a[i], b[i], c[i], h[i]);
            areas.push(areas[i] + area);
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            a,
            b,
            c,
            areas,
        })
    }
}

/// Node curvatures `M_i` with `M_0 = M_{n-1} = 0`.
fn second_derivatives(h: &[Real], s: &[Real]) -> Result<Vec<Real>> {
    let n = h.len() + 1;
    let mut m = vec![0.0; n];
    let k = n - 2;
    if k == 0 {
        return Ok(m);
    }
    let mut lhs = DMatrix::<Real>::zeros(k, k);
    let mut rhs = DVector::<Real>::zeros(k);
    for row in 0..k {
        let i = row + 1;
        lhs[(row, row)] = 2.0 * (h[i - 1] + h[i]);
        if row > 0 {
            lhs[(row, row - 1)] = h[i - 1];
        }
        if row + 1 < k {
            lhs[(row, row + 1)] = h[i];
        }
        rhs[row] = 6.0 * (s[i] - s[i - 1]);
    }
    let solved = lhs.lu().solve(&rhs);
    let Some(interior) = solved else {
        ck_core::fail!("singular system while building natural cubic spline");
    };
    m[1..=k].copy_from_slice(interior.as_slice());
    Ok(m)
}

/// Convert node slopes `ts` into polynomial coefficients.
fn compute_coefficients(
    h: &[Real],
    s: &[Real],
    ts: &[Real],
) -> (Vec<Real>, Vec<Real>, Vec<Real>) {
    let segments = h.len();
    let mut a = Vec::with_capacity(segments);
    let mut b = Vec::with_capacity(segments);
    let mut c = Vec::with_capacity(segments);

    for i in 0..segments {
        let dx = h[i];
        a.push(ts[i]);
        b.push((3.0 * s[i] - ts[i + 1] - 2.0 * ts[i]) / dx);
        c.push((ts[i + 1] + ts[i] - 2.0 * s[i]) / (dx * dx));
    }

    (a, b, c)
}

fn segment_integral(y: Real, a: Real, b: Real, c: Real, dx: Real) -> Real {
    dx * (y + dx * (a / 2.0 + dx * (b / 3.0 + dx * c / 4.0)))
}

impl Interpolation1D for CubicNaturalSpline {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.ys[i] + dx * (self.a[i] + dx * (self.b[i] + dx * self.c[i]))
    }

    fn derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.a[i] + dx * (2.0 * self.b[i] + 3.0 * dx * self.c[i])
    }

    fn primitive(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.areas[i] + segment_integral(self.ys[i], self.a[i], self.b[i], self.c[i], dx)
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
