//! Numerical solvers for Kepler's equation.
//!
//! Each orbit regime has its own form of the equation relating the mean
//! anomaly (linear in time) to a geometric anomaly:
//!
//! | Regime     | Equation             | Solver                            |
//! |------------|----------------------|-----------------------------------|
//! | Elliptic   | `M = E - e sin E`    | [`solve_eccentric_anomaly`]       |
//! | Parabolic  | `M = D + D^3 / 3`    | [`solve_parabolic_anomaly`]       |
//! | Hyperbolic | `M = e sinh H - H`   | [`solve_hyperbolic_anomaly`]      |
//!
//! The iterative solvers are capped at [`MAX_ITERATIONS`] steps. Hitting the
//! cap is not an error: the best estimate is returned with
//! [`KeplerSolution::converged`] set to `false`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SolverError;

/// The maximum number of Newton–Raphson steps taken by the iterative solvers.
///
/// This bounds the latency of a single solve at the cost of precision.
pub const MAX_ITERATIONS: u32 = 30;

/// The result of solving Kepler's equation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerSolution {
    /// The solved anomaly, in radians.
    ///
    /// This is the eccentric anomaly for closed orbits, the hyperbolic
    /// eccentric anomaly for hyperbolic orbits, and `tan(f / 2)` for
    /// parabolic orbits.
    pub anomaly: f64,

    /// How many Newton–Raphson steps were taken.
    pub iterations: u32,

    /// Whether the residual dropped below the requested precision.
    pub converged: bool,
}

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}
#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}
#[inline]
fn hyperbolic_keplers_equation(mean_anomaly: f64, anomaly: f64, eccentricity: f64) -> f64 {
    eccentricity * anomaly.sinh() - anomaly - mean_anomaly
}
#[inline]
fn hyperbolic_keplers_equation_derivative(anomaly: f64, eccentricity: f64) -> f64 {
    eccentricity * anomaly.cosh() - 1.0
}

/// Solves the elliptic Kepler equation `M = E - e sin E` for `E`.
///
/// Newton–Raphson is seeded with `E = M` and stops once the residual is
/// below `10^-precision`, or after [`MAX_ITERATIONS`] steps.
/// The result is not normalised: callers needing the eccentric anomaly in a
/// canonical range should reduce `mean_anomaly` (or the result) themselves.
///
/// # Errors
/// - [`SolverError::NegativeEccentricity`] if `eccentricity < 0`.
/// - [`SolverError::UnsupportedEccentricity`] if `eccentricity > 1`; use
///   [`solve_hyperbolic_anomaly`] for those.
///
/// # Example
/// ```
/// use astrarium::solvers::solve_eccentric_anomaly;
///
/// let solution = solve_eccentric_anomaly(1.0, 0.5, 10.0).unwrap();
///
/// assert!(solution.converged);
/// let e = solution.anomaly;
/// assert!((e - 0.5 * e.sin() - 1.0).abs() < 1e-10);
/// ```
pub fn solve_eccentric_anomaly(
    mean_anomaly: f64,
    eccentricity: f64,
    precision: f64,
) -> Result<KeplerSolution, SolverError> {
    if eccentricity < 0.0 {
        return Err(SolverError::NegativeEccentricity(eccentricity));
    }
    if eccentricity > 1.0 {
        return Err(SolverError::UnsupportedEccentricity(eccentricity));
    }

    let delta = 10f64.powf(-precision);

    let mut eccentric_anomaly = mean_anomaly;
    let mut residual = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
    let mut iterations = 0;

    while residual.abs() >= delta && iterations < MAX_ITERATIONS {
        let derivative = keplers_equation_derivative(eccentric_anomaly, eccentricity);
        if derivative == 0.0 {
            // Only reachable at e = 1, E = 0; the step is undefined there.
            break;
        }

        eccentric_anomaly -= residual / derivative;
        residual = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
        iterations += 1;
    }

    Ok(KeplerSolution {
        anomaly: eccentric_anomaly,
        iterations,
        converged: residual.abs() < delta,
    })
}

/// Solves the hyperbolic Kepler equation `M = e sinh H - H` for `H`.
///
/// Newton–Raphson is seeded with `sign(M) ln(2|M| / e + 1.8)`, which lies on
/// the far side of the root for every `M` and so converges monotonically.
///
/// # Errors
/// - [`SolverError::NegativeEccentricity`] if `eccentricity < 0`.
/// - [`SolverError::UnsupportedEccentricity`] if the orbit is not hyperbolic
///   (`eccentricity <= 1`).
pub fn solve_hyperbolic_anomaly(
    mean_anomaly: f64,
    eccentricity: f64,
    precision: f64,
) -> Result<KeplerSolution, SolverError> {
    if eccentricity < 0.0 {
        return Err(SolverError::NegativeEccentricity(eccentricity));
    }
    if eccentricity <= 1.0 {
        return Err(SolverError::UnsupportedEccentricity(eccentricity));
    }

    let delta = 10f64.powf(-precision);

    let mut anomaly =
        mean_anomaly.signum() * (2.0 * mean_anomaly.abs() / eccentricity + 1.8).ln();
    let mut residual = hyperbolic_keplers_equation(mean_anomaly, anomaly, eccentricity);
    let mut iterations = 0;

    // The residual grows like e^H, so an absolute tolerance alone would
    // never be met for very large anomalies. Scale it by the magnitude of M.
    let tolerance = delta * mean_anomaly.abs().max(1.0);

    while residual.abs() >= tolerance && iterations < MAX_ITERATIONS {
        let derivative = hyperbolic_keplers_equation_derivative(anomaly, eccentricity);

        anomaly -= residual / derivative;
        residual = hyperbolic_keplers_equation(mean_anomaly, anomaly, eccentricity);
        iterations += 1;
    }

    Ok(KeplerSolution {
        anomaly,
        iterations,
        converged: residual.abs() < tolerance,
    })
}

/// Solves Barker's equation `M = D + D^3 / 3` for `D = tan(f / 2)`.
///
/// The cubic is strictly increasing, so it has exactly one real root and
/// is solved in closed form.
///
/// # Example
/// ```
/// use astrarium::solvers::solve_parabolic_anomaly;
///
/// let d = solve_parabolic_anomaly(4.0 / 3.0).anomaly;
/// assert!((d - 1.0).abs() < 1e-12);
/// ```
pub fn solve_parabolic_anomaly(mean_anomaly: f64) -> KeplerSolution {
    KeplerSolution {
        anomaly: solve_monotone_cubic(1.0 / 3.0, 0.0, 1.0, -mean_anomaly),
        iterations: 0,
        converged: true,
    }
}

/// Solve a cubic equation to get its real root.
///
/// The cubic equation is in the form of:
/// ax^3 + bx^2 + cx + d
///
/// The cubic equation is assumed to be monotone.
/// If it isn't monotone (i.e., the discriminant
/// is negative), it returns NaN.
pub(crate) fn solve_monotone_cubic(a: f64, b: f64, c: f64, d: f64) -> f64 {
    // Normalize coefficients so that a = 1
    let b = b / a;
    let c = c / a;
    let d = d / a;

    // Depress the cubic equation
    // t^3 + pt + q = 0
    // ...where, since a = 1:
    // p = (3c - b^2) / 3
    // q = (2b^3 - 9bc + 27d) / 27
    let b_sq = b * b;

    let p = (3.0 * c - b_sq) / 3.0;
    let q = (2.0 * b_sq * b - 9.0 * b * c + 27.0 * d) / 27.0;

    let q_div_two = q / 2.0;
    let p_div_three = p / 3.0;
    let p_div_three_cubed = p_div_three * p_div_three * p_div_three;
    let discriminant = q_div_two * q_div_two + p_div_three_cubed;

    if discriminant < 0.0 {
        // Function is not monotone
        return f64::NAN;
    }

    let t = {
        let sqrt_discriminant = discriminant.sqrt();
        let neg_q_div_two = -q_div_two;
        let u = (neg_q_div_two + sqrt_discriminant).cbrt();
        let v = (neg_q_div_two - sqrt_discriminant).cbrt();
        u + v
    };

    // x_i = t_i - b / 3a
    t - b / 3.0
}
