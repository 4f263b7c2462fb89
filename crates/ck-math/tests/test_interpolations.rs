//! Property tests shared by every interpolation scheme.

use ck_math::{
    BackwardFlatInterpolation, CubicNaturalSpline, Interpolation1D, LinearInterpolation,
};
use proptest::prelude::*;

fn nodes() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05f64..2.0, -0.05f64..0.10), 2..12).prop_map(|steps| {
        let mut x = 0.0;
        let mut xs = Vec::with_capacity(steps.len());
        let mut ys = Vec::with_capacity(steps.len());
        for (dx, y) in steps {
            x += dx;
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    })
}

fn schemes(xs: &[f64], ys: &[f64]) -> Vec<Box<dyn Interpolation1D>> {
    vec![
        Box::new(LinearInterpolation::new(xs, ys).unwrap()),
        Box::new(CubicNaturalSpline::new(xs, ys).unwrap()),
        Box::new(BackwardFlatInterpolation::new(xs, ys).unwrap()),
    ]
}

proptest! {
    #[test]
    fn interpolants_hit_their_nodes((xs, ys) in nodes()) {
        for scheme in schemes(&xs, &ys) {
            for (x, y) in xs.iter().zip(&ys) {
                prop_assert!((scheme.value(*x) - y).abs() < 1e-10, "{scheme:?} at {x}");
            }
            prop_assert_eq!(scheme.primitive(xs[0]), 0.0);
        }
    }

    #[test]
    fn primitive_differentiates_to_value((xs, ys) in nodes(), frac in 0.0f64..1.0) {
        // d/dx primitive(x) == value(x), checked with a central difference
        // away from the nodes.
        let span = xs[xs.len() - 1] - xs[0];
        let x = xs[0] + frac * span;
        if xs.iter().all(|n| (n - x).abs() > 1e-4) {
            for scheme in schemes(&xs, &ys) {
                let h = 1e-6;
                let slope = (scheme.primitive(x + h) - scheme.primitive(x - h)) / (2.0 * h);
                prop_assert!((slope - scheme.value(x)).abs() < 1e-5, "{scheme:?} at {x}");
            }
        }
    }
}
