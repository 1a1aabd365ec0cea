//! Stumpff functions `C(z)` and `S(z)` of the universal anomaly argument `z = alpha·x²`.
//!
//! Both functions switch to a truncated alternating power series for
//! `|z| < STUMPFF_SERIES_THRESHOLD`, where the closed forms degenerate to 0/0.

/// Switchover point between the power series and the closed forms.
pub const STUMPFF_SERIES_THRESHOLD: f64 = 1e-10;

const SERIES_TERMS: i32 = 6;

/// `C(z) = (1 − cos√z) / z`, hyperbolic form for negative `z`.
pub fn stumpff_c(z: f64) -> f64 {
    if z.abs() < STUMPFF_SERIES_THRESHOLD {
        let mut factorial = 1.0;
        let mut sum = 0.0;
        for i in 0..SERIES_TERMS {
            let k = f64::from(i);
            factorial *= (2.0 * k + 1.0) * (2.0 * k + 2.0);
            sum += (-z).powi(i) / factorial;
        }
        sum
    } else if z > 0.0 {
        // 1 − cos θ = 2·sin²(θ/2)
        let half = 0.5 * z.sqrt();
        2.0 * half.sin().powi(2) / z
    } else {
        // 1 − cosh θ = −2·sinh²(θ/2)
        let half = 0.5 * (-z).sqrt();
        -2.0 * half.sinh().powi(2) / z
    }
}

/// `S(z) = (√z − sin√z) / z^1.5`, hyperbolic form for negative `z`.
pub fn stumpff_s(z: f64) -> f64 {
    if z.abs() < STUMPFF_SERIES_THRESHOLD {
        let mut factorial = 1.0;
        let mut sum = 0.0;
        for i in 0..SERIES_TERMS {
            let k = f64::from(i);
            factorial *= (2.0 * k + 2.0) * (2.0 * k + 3.0);
            sum += (-z).powi(i) / factorial;
        }
        sum
    } else if z > 0.0 {
        let root = z.sqrt();
        let excess = if root < 1.0 {
            halved_excess(root, f64::sin)
        } else {
            root - root.sin()
        };
        excess / (z * root)
    } else {
        let root = (-z).sqrt();
        let excess = if root < 1.0 {
            halved_excess(root, f64::sinh)
        } else {
            root.sinh() - root
        };
        excess / (-z * root)
    }
}

/// Upper bound on halvings; terms shrink by 4× per level.
const MAX_HALVINGS: usize = 40;

/// `|θ − f(θ)|` with `f` one of `sin`/`sinh`, for `0 < θ < 1`, without
/// subtracting nearly equal numbers.
///
/// Unrolls `θ − f(θ) = 2·(θ/2 − f(θ/2)) ± 4·f(θ/2)·f²(θ/4)`; every added term
/// has the same sign and the remainder after `k` levels is about a third of
/// the last term.
fn halved_excess(theta: f64, f: fn(f64) -> f64) -> f64 {
    let mut sum = 0.0;
    let mut scale = 4.0;
    let mut angle = theta;
    for _ in 0..MAX_HALVINGS {
        let term = scale * f(0.5 * angle) * f(0.25 * angle).powi(2);
        sum += term;
        if term <= f64::EPSILON * sum {
            break;
        }
        angle *= 0.5;
        scale *= 2.0;
    }
    sum
}
