//! Special functions for tail probabilities.
//!
//! This module provides:
//! - `ln_gamma`: natural log of the gamma function (Lanczos approximation)
//! - `inc_beta`: regularised incomplete beta function I_x(a, b)
//! - `student_t_cdf` / `student_t_two_sided_p`: Student-t tail probabilities
//!
//! These back the beta-distribution quantile inversion and the pairwise
//! correlation significance tests.

/// Convergence tolerance for the incomplete beta continued fraction.
const CF_EPSILON: f64 = 1e-14;

/// Smallest representable magnitude used to guard divisions in the
/// continued fraction (Lentz's method).
const CF_FPMIN: f64 = 1e-300;

/// Maximum continued fraction iterations before giving up.
const CF_MAX_ITER: usize = 200;

/// Natural logarithm of the gamma function.
///
/// Uses the Lanczos approximation (g = 7, 9 coefficients), accurate to
/// roughly 1e-13 over the positive reals, with the reflection formula for
/// x < 0.5.
///
/// # Arguments
/// * `x` - Input value (non-positive integers return +∞)
///
/// # Examples
/// ```
/// use sim_core::math::special::ln_gamma;
///
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    // Lanczos coefficients for g = 7
    const COEFFS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;
    const LN_SQRT_2PI: f64 = 0.9189385332046727;

    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        let sin_pi_x = (std::f64::consts::PI * x).sin();
        if sin_pi_x == 0.0 {
            return f64::INFINITY;
        }
        return std::f64::consts::PI.ln() - sin_pi_x.abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + G + 0.5;

    LN_SQRT_2PI + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Continued fraction for the incomplete beta function (Lentz's method).
fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < CF_FPMIN {
        d = CF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=CF_MAX_ITER {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        // Even step
        let aa = m_f * (b - m_f) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < CF_FPMIN {
            d = CF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < CF_FPMIN {
            c = CF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step
        let aa = -(a + m_f) * (qab + m_f) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < CF_FPMIN {
            d = CF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < CF_FPMIN {
            c = CF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < CF_EPSILON {
            break;
        }
    }

    h
}

/// Regularised incomplete beta function I_x(a, b).
///
/// # Mathematical Definition
/// I_x(a, b) = B(x; a, b) / B(a, b), the CDF of the Beta(a, b) distribution.
///
/// # Arguments
/// * `a` - First shape parameter (must be > 0)
/// * `b` - Second shape parameter (must be > 0)
/// * `x` - Evaluation point; values outside [0, 1] are clamped
///
/// # Examples
/// ```
/// use sim_core::math::special::inc_beta;
///
/// // Beta(1, 1) is uniform: I_x(1, 1) = x
/// assert!((inc_beta(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
///
/// // Symmetry: I_x(a, b) = 1 - I_{1-x}(b, a)
/// let lhs = inc_beta(2.0, 5.0, 0.4);
/// let rhs = 1.0 - inc_beta(5.0, 2.0, 0.6);
/// assert!((lhs - rhs).abs() < 1e-12);
/// ```
pub fn inc_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Prefactor: exp(ln Γ(a+b) - ln Γ(a) - ln Γ(b) + a ln x + b ln(1-x))
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // Use the continued fraction directly where it converges fastest,
    // otherwise via the symmetry relation.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cf(a, b, x) / a
    } else {
        1.0 - front * beta_cf(b, a, 1.0 - x) / b
    }
}

/// Student-t cumulative distribution function.
///
/// # Arguments
/// * `t` - The t statistic
/// * `dof` - Degrees of freedom (must be > 0)
///
/// # Returns
/// P(T <= t) for T ~ Student-t(dof).
pub fn student_t_cdf(t: f64, dof: f64) -> f64 {
    let x = dof / (dof + t * t);
    let tail = inc_beta(dof / 2.0, 0.5, x);
    if t >= 0.0 {
        1.0 - 0.5 * tail
    } else {
        0.5 * tail
    }
}

/// Two-sided Student-t p-value.
///
/// Computes P(|T| >= |t|) for T ~ Student-t(dof), the p-value of a
/// two-sided test against the t statistic.
///
/// # Arguments
/// * `t` - The t statistic
/// * `dof` - Degrees of freedom (must be > 0)
///
/// # Examples
/// ```
/// use sim_core::math::special::student_t_two_sided_p;
///
/// // A t statistic of 0 carries no evidence at all
/// assert!((student_t_two_sided_p(0.0, 10.0) - 1.0).abs() < 1e-12);
/// ```
pub fn student_t_two_sided_p(t: f64, dof: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    inc_beta(dof / 2.0, 0.5, dof / (dof + t * t))
}
