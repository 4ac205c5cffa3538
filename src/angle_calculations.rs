//! Zero-angle search.
//!
//! The launch elevation that puts the projectile back on the line of sight at
//! the zero distance is found by bisection on the trajectory height there.

use crate::constants::{
    ZERO_ANGLE_INITIAL_BOUND, ZERO_ANGLE_MAX_BOUND, ZERO_ANGLE_TOLERANCE, ZERO_HEIGHT_TOLERANCE,
};
use crate::error::BallisticsError;

/// Result of a zero-angle search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroSolution {
    pub angle_rad: f64,
    pub iterations_used: usize,
    /// Height above the line of sight at the zero distance for `angle_rad` (m)
    pub final_error: f64,
    /// `false` when the iteration cap was hit before either tolerance was met
    pub converged: bool,
}

/// Bisection between an elevation that shoots low and one that shoots high.
///
/// Requires `f(lower) <= 0 <= f(upper)`. Stops when the bracket is narrower
/// than `angle_tolerance` or a trial height is within `height_tolerance`.
pub fn bisection_root_find<F>(
    mut f: F,
    mut lower: f64,
    mut upper: f64,
    angle_tolerance: f64,
    height_tolerance: f64,
    max_iterations: usize,
) -> ZeroSolution
where
    F: FnMut(f64) -> f64,
{
    let mut mid = 0.5 * (lower + upper);
    let mut height = f64::NAN;

    for iteration in 1..=max_iterations {
        mid = 0.5 * (lower + upper);
        height = f(mid);
        log::debug!("zero iteration {iteration}: angle {mid:.9} rad, height {height:+.6} m");

        if height.abs() < height_tolerance {
            return ZeroSolution {
                angle_rad: mid,
                iterations_used: iteration,
                final_error: height,
                converged: true,
            };
        }

        if height > 0.0 {
            upper = mid;
        } else {
            lower = mid;
        }

        if upper - lower < angle_tolerance {
            return ZeroSolution {
                angle_rad: mid,
                iterations_used: iteration,
                final_error: height,
                converged: true,
            };
        }
    }

    log::warn!(
        "zero search stopped after {max_iterations} iterations, bracket [{lower:.9}, {upper:.9}] rad"
    );
    ZeroSolution {
        angle_rad: mid,
        iterations_used: max_iterations,
        final_error: height,
        converged: false,
    }
}

/// Find a symmetric elevation interval `[-b, b]` whose ends straddle the
/// line of sight at the zero distance.
///
/// Starts at [`ZERO_ANGLE_INITIAL_BOUND`] and doubles up to
/// [`ZERO_ANGLE_MAX_BOUND`].
pub fn bracket_zero<F>(f: &mut F, zero_distance: f64) -> Result<(f64, f64), BallisticsError>
where
    F: FnMut(f64) -> f64,
{
    let mut bound = ZERO_ANGLE_INITIAL_BOUND;

    loop {
        let height_low = f(-bound);
        let height_high = f(bound);

        if height_low <= 0.0 && height_high >= 0.0 {
            log::debug!(
                "zero bracketed within ±{bound:.4} rad (heights {height_low:+.4} m, {height_high:+.4} m)"
            );
            return Ok((-bound, bound));
        }

        if bound >= ZERO_ANGLE_MAX_BOUND {
            return Err(BallisticsError::ZeroNotBracketed {
                zero_distance,
                bound,
                height_low,
                height_high,
            });
        }

        log::debug!(
            "zero not bracketed within ±{bound:.4} rad (heights {height_low:+.4} m, {height_high:+.4} m), widening"
        );
        bound = (bound * 2.0).min(ZERO_ANGLE_MAX_BOUND);
    }
}

/// Elevation angle that zeroes the trajectory at `zero_distance`.
///
/// `height_at` maps a launch elevation (rad) to the trajectory height above
/// the line of sight at the zero distance (m).
pub fn zero_angle<F>(
    mut height_at: F,
    zero_distance: f64,
    max_iterations: usize,
) -> Result<ZeroSolution, BallisticsError>
where
    F: FnMut(f64) -> f64,
{
    let (lower, upper) = bracket_zero(&mut height_at, zero_distance)?;
    Ok(bisection_root_find(
        height_at,
        lower,
        upper,
        ZERO_ANGLE_TOLERANCE,
        ZERO_HEIGHT_TOLERANCE,
        max_iterations,
    ))
}
