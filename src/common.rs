// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations: polynomial root finding.
//!
//! The solvers are tuned for the geometry in this crate, where
//! coefficients routinely collapse toward zero (a cubic degrading to a
//! quadratic as control points become collinear) or span wildly different
//! magnitudes. Coefficients are rescaled by a power of two before
//! solving, and candidate roots are checked against the residual rather
//! than trusted blindly.

use arrayvec::ArrayVec;

/// Threshold below which a scalar is treated as zero.
pub const EPSILON: f64 = 1e-14;

/// One ulp at 1.0.
pub(crate) const MACHINE_EPSILON: f64 = f64::EPSILON;

// These two are deliberately different: the discriminant tolerance is
// loose so that near-double roots are still reported, and the residual
// check below weeds out the false positives that slip through.
const DISCRIMINANT_EPSILON: f64 = 1e-10;
const SOLUTION_EPSILON: f64 = 1e-8;

/// A power-of-two factor that brings the largest coefficient magnitude
/// near 1, or 1.0 if the coefficients are already reasonably scaled.
///
/// Multiplying every coefficient by a power of two changes no root and
/// loses no precision, but keeps the intermediate products of the
/// solvers away from overflow and underflow.
fn normalization_factor(ns: &[f64]) -> f64 {
    let norm = ns.iter().fold(0.0_f64, |m, n| m.max(n.abs()));
    if norm != 0.0 && (norm < 1e-8 || norm > 1e8) {
        2.0_f64.powi(-(norm.log2().round() as i32))
    } else {
        1.0
    }
}

/// Dekker's split of a double into high and low parts, for exact
/// products below.
#[inline]
fn split(n: f64) -> (f64, f64) {
    let x = n * 134217729.0;
    let y = n - x;
    let hi = y + x;
    let lo = n - hi;
    (hi, lo)
}

/// `b² - ac`, recomputed in double-double arithmetic when cancellation
/// would destroy it.
fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    let mut d = b * b - a * c;
    let e = b * b + a * c;
    if d.abs() * 3.0 < e {
        let (a_hi, a_lo) = split(a);
        let (b_hi, b_lo) = split(b);
        let (c_hi, c_lo) = split(c);
        let p = b * b;
        let dp = (b_hi * b_hi - p + 2.0 * b_hi * b_lo) + b_lo * b_lo;
        let q = a * c;
        let dq = (a_hi * c_hi - q + a_hi * c_lo + a_lo * c_hi) + a_lo * c_lo;
        d = (p - q) + (dp - dq);
    }
    d
}

/// Find the real root of the linear equation.
///
/// Returns values of x for which c0 + c1 x = 0; empty when the equation
/// is degenerate.
pub fn solve_linear(c0: f64, c1: f64) -> ArrayVec<f64, 1> {
    let mut result = ArrayVec::new();
    if c1.abs() >= EPSILON {
        result.push(-c0 / c1);
    }
    result
}

/// Find real roots of the quadratic equation.
///
/// Returns values of x for which c0 + c1 x + c2 x² = 0. A double root is
/// reported twice.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    if c2.abs() < EPSILON {
        for root in solve_linear(c0, c1) {
            result.push(root);
        }
        return result;
    }

    let a = c2;
    let b = -0.5 * c1;
    let c = c0;
    let k = normalization_factor(&[a, b, c]);
    let (a, b, c) = (a * k, b * k, c * k);

    let d = discriminant(a, b, c);
    if d >= -DISCRIMINANT_EPSILON {
        let q = if d < 0.0 { 0.0 } else { d.sqrt() };
        let r = b + if b < 0.0 { -q } else { q };
        let (x0, x1) = if r == 0.0 {
            (c / a, -c / a)
        } else {
            (r / a, c / r)
        };
        for x in [x0, x1] {
            let y = a * x * x - 2.0 * b * x + c;
            if y.abs() < SOLUTION_EPSILON {
                result.push(x);
            }
        }
    }
    result
}

/// Find real roots of the cubic equation.
///
/// Returns values of x for which c0 + c1 x + c2 x² + c3 x³ = 0. One real
/// root is isolated by a guarded Newton iteration and divided out; the
/// remaining pair comes from the quadratic solver. Degrades to the
/// quadratic solver when the cubic coefficient is (nearly) zero.
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<f64, 3> {
    let k = normalization_factor(&[c0, c1, c2, c3]);
    let (a, b, c, d) = (c3 * k, c2 * k, c1 * k, c0 * k);

    let mut result = ArrayVec::new();
    if a.abs() < EPSILON {
        for root in solve_quadratic(d, c, b) {
            result.push(root);
        }
        return result;
    }

    let mut x;
    let mut b1;
    let mut c2d;
    if d.abs() < EPSILON {
        b1 = b;
        c2d = c;
        x = 0.0;
    } else {
        x = -(b / a) / 3.0;
        b1 = a * x + b;
        c2d = b1 * x + c;
        let mut qd = (a * x + b1) * x + c2d;
        let mut q = c2d * x + d;

        let t = q / a;
        let r = t.abs().powf(1.0 / 3.0);
        let s = if t < 0.0 { -1.0 } else { 1.0 };
        let td = -qd / a;
        // 1.32471... is the plastic number, an upper bound for the
        // magnitude of the real root relative to these estimates.
        let rd = if td > 0.0 {
            1.324717957244746 * r.max(td.sqrt())
        } else {
            r
        };
        let mut x0 = x - s * rd;
        if x0 != x {
            loop {
                x = x0;
                b1 = a * x + b;
                c2d = b1 * x + c;
                qd = (a * x + b1) * x + c2d;
                q = c2d * x + d;
                x0 = if qd == 0.0 {
                    x
                } else {
                    x - q / (qd / (1.0 + MACHINE_EPSILON))
                };
                if s * x0 <= s * x {
                    break;
                }
            }
            // For large roots the deflated coefficients are better
            // recovered from the constant term.
            if a.abs() * x * x > (d / x).abs() {
                c2d = -d / x;
                b1 = (c2d - c) / x;
            }
        }
    }

    for root in solve_quadratic(c2d, b1, a) {
        result.push(root);
    }
    if result.iter().any(|&r| r == x) {
        return result;
    }
    let y = ((a * x + b) * x + c) * x + d;
    if y.abs() < SOLUTION_EPSILON && !result.is_full() {
        result.push(x);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{solve_cubic, solve_linear, solve_quadratic};

    fn verify(mut roots: Vec<f64>, expected: &[f64]) {
        let epsilon = 1e-8;
        roots.sort_by(f64::total_cmp);
        roots.dedup_by(|a, b| (*a - *b).abs() < epsilon);
        assert_eq!(
            roots.len(),
            expected.len(),
            "got {roots:?}, expected {expected:?}"
        );
        for (root, want) in roots.iter().zip(expected) {
            assert!(
                (root - want).abs() < epsilon,
                "got {roots:?}, expected {expected:?}"
            );
        }
    }

    #[test]
    fn test_solve_linear() {
        verify(solve_linear(3.0, -1.5).to_vec(), &[2.0]);
        verify(solve_linear(1.0, 0.0).to_vec(), &[]);
    }

    #[test]
    fn test_solve_quadratic() {
        verify(
            solve_quadratic(-5.0, 0.0, 1.0).to_vec(),
            &[-(5.0f64.sqrt()), 5.0f64.sqrt()],
        );
        verify(solve_quadratic(5.0, 0.0, 1.0).to_vec(), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0).to_vec(), &[-5.0]);
        // double root
        verify(solve_quadratic(1.0, 2.0, 1.0).to_vec(), &[-1.0]);
        // ill-conditioned: scaled far from unit magnitude
        verify(solve_quadratic(-5e12, 0.0, 1e12).to_vec(), &[-(5.0f64.sqrt()), 5.0f64.sqrt()]);
    }

    #[test]
    fn test_solve_cubic() {
        verify(solve_cubic(-5.0, 0.0, 0.0, 1.0).to_vec(), &[5.0f64.cbrt()]);
        verify(solve_cubic(-5.0, -1.0, 0.0, 1.0).to_vec(), &[1.90416085913492]);
        verify(solve_cubic(0.0, -1.0, 0.0, 1.0).to_vec(), &[-1.0, 0.0, 1.0]);
        verify(solve_cubic(-2.0, -3.0, 0.0, 1.0).to_vec(), &[-1.0, 2.0]);
        verify(solve_cubic(2.0, -3.0, 0.0, 1.0).to_vec(), &[-2.0, 1.0]);
        // collapsing cubic coefficient
        verify(solve_cubic(-6.0, 1.0, 1.0, 1e-20).to_vec(), &[-3.0, 2.0]);
    }

    #[test]
    fn residual_rejects_spurious_roots() {
        // x² + 1 shifted barely below the discriminant tolerance must
        // not report roots with large residuals.
        for root in solve_quadratic(1.0, 0.0, 1.0) {
            let y = 1.0 + root * root;
            assert!(y.abs() < 1e-8);
        }
    }
}
