//! Fixed-step integration of the point-mass equations of motion.
//!
//! Both schemes advance the same state through [`compute_derivatives`], so
//! switching between them changes only the stepping, never the forces.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FLIGHT_TIME_S, MIN_DIVISION_THRESHOLD, MIN_VELOCITY_THRESHOLD};
use crate::derivatives::{compute_derivatives, FlightEnvironment};

/// Position (m), velocity (m/s) and elapsed time (s) of the projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub time: f64,
}

impl ProjectileState {
    /// State at the muzzle for a launch elevation above the sight line.
    ///
    /// The bore sits `sight_height` below the line of sight, so the run starts
    /// at `y = -sight_height`.
    pub fn at_muzzle(muzzle_velocity: f64, elevation_rad: f64, sight_height: f64) -> Self {
        Self {
            position: Vector3::new(0.0, -sight_height, 0.0),
            velocity: Vector3::new(
                muzzle_velocity * elevation_rad.cos(),
                muzzle_velocity * elevation_rad.sin(),
                0.0,
            ),
            time: 0.0,
        }
    }

    /// Downrange distance (m)
    #[inline]
    pub fn range(&self) -> f64 {
        self.position.x
    }

    /// Position, velocity and time are all finite
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|v| v.is_finite()) && self.time.is_finite()
    }

    /// Ground speed (m/s)
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Stepping scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// First-order Euler, velocity updated before position
    Euler,
    /// Classical fourth-order Runge-Kutta
    #[default]
    Rk4,
}

impl IntegrationMethod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "euler" => Some(IntegrationMethod::Euler),
            "rk4" => Some(IntegrationMethod::Rk4),
            _ => None,
        }
    }

    /// Advance `state` by one step of `dt` seconds
    pub fn step(&self, state: &ProjectileState, dt: f64, env: &FlightEnvironment<'_>) -> ProjectileState {
        match self {
            IntegrationMethod::Euler => euler_step(state, dt, env),
            IntegrationMethod::Rk4 => rk4_step(state, dt, env),
        }
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationMethod::Euler => write!(f, "Euler"),
            IntegrationMethod::Rk4 => write!(f, "RK4"),
        }
    }
}

// Acceleration from the current velocity, then velocity, then position
fn euler_step(state: &ProjectileState, dt: f64, env: &FlightEnvironment<'_>) -> ProjectileState {
    let d = compute_derivatives(&state.velocity, env);
    let velocity = state.velocity + d.acceleration * dt;
    ProjectileState {
        position: state.position + velocity * dt,
        velocity,
        time: state.time + dt,
    }
}

fn rk4_step(state: &ProjectileState, dt: f64, env: &FlightEnvironment<'_>) -> ProjectileState {
    let v = state.velocity;

    // k1
    let k1 = compute_derivatives(&v, env);

    // k2
    let k2 = compute_derivatives(&(v + k1.acceleration * (dt * 0.5)), env);

    // k3
    let k3 = compute_derivatives(&(v + k2.acceleration * (dt * 0.5)), env);

    // k4
    let k4 = compute_derivatives(&(v + k3.acceleration * dt), env);

    ProjectileState {
        position: state.position
            + (k1.velocity + k2.velocity * 2.0 + k3.velocity * 2.0 + k4.velocity) * (dt / 6.0),
        velocity: state.velocity
            + (k1.acceleration + k2.acceleration * 2.0 + k3.acceleration * 2.0 + k4.acceleration) * (dt / 6.0),
        time: state.time + dt,
    }
}

/// Why an integration run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Crossed the requested downrange distance
    ReachedTarget,
    /// Downrange velocity fell to zero or below
    Stalled,
    /// Air speed too small to define a drag direction
    VelocityExhausted,
    /// Flight time exceeded [`MAX_FLIGHT_TIME_S`]
    TimeLimit,
    /// A step produced a non-finite position or velocity
    Diverged,
}

impl Termination {
    pub fn reached_target(&self) -> bool {
        matches!(self, Termination::ReachedTarget)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Termination::ReachedTarget => "reached target",
            Termination::Stalled => "stalled",
            Termination::VelocityExhausted => "velocity exhausted",
            Termination::TimeLimit => "time limit",
            Termination::Diverged => "diverged",
        };
        write!(f, "{}", text)
    }
}

/// Final state of a run and how it ended.
///
/// For [`Termination::ReachedTarget`] the position and velocity are
/// interpolated to the exact target distance; otherwise they are the last
/// integrated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightOutcome {
    pub state: ProjectileState,
    pub termination: Termination,
    pub steps: usize,
}

/// Linear interpolation between two consecutive states at a downrange
/// distance inside `[prev.x, next.x]`.
///
/// Time is taken from `next`, not interpolated.
pub fn interpolate_at_range(prev: &ProjectileState, next: &ProjectileState, range: f64) -> ProjectileState {
    let dx = next.position.x - prev.position.x;
    let t = if dx.abs() < MIN_DIVISION_THRESHOLD {
        1.0
    } else {
        ((range - prev.position.x) / dx).clamp(0.0, 1.0)
    };

    let mut position = prev.position + (next.position - prev.position) * t;
    position.x = range;

    ProjectileState {
        position,
        velocity: prev.velocity + (next.velocity - prev.velocity) * t,
        time: next.time,
    }
}

/// Integrate from `initial` until the projectile reaches `target_distance`
/// downrange or the run degenerates.
///
/// `observer` is called with every consecutive `(previous, next)` pair of
/// integrated states, before the target check for that step.
pub fn integrate_to_distance<F>(
    initial: ProjectileState,
    target_distance: f64,
    dt: f64,
    method: IntegrationMethod,
    env: &FlightEnvironment<'_>,
    mut observer: F,
) -> FlightOutcome
where
    F: FnMut(&ProjectileState, &ProjectileState),
{
    let mut state = initial;
    let mut steps = 0usize;

    if state.position.x >= target_distance {
        return FlightOutcome {
            state,
            termination: Termination::ReachedTarget,
            steps,
        };
    }

    loop {
        if state.time >= MAX_FLIGHT_TIME_S {
            return FlightOutcome {
                state,
                termination: Termination::TimeLimit,
                steps,
            };
        }
        if state.velocity.x <= 0.0 {
            return FlightOutcome {
                state,
                termination: Termination::Stalled,
                steps,
            };
        }
        if env.drag_table.is_some() && env.relative_velocity(&state.velocity).norm() < MIN_VELOCITY_THRESHOLD {
            return FlightOutcome {
                state,
                termination: Termination::VelocityExhausted,
                steps,
            };
        }

        let next = method.step(&state, dt, env);
        steps += 1;
        if !next.is_finite() {
            return FlightOutcome {
                state,
                termination: Termination::Diverged,
                steps,
            };
        }
        observer(&state, &next);

        if next.position.x >= target_distance {
            return FlightOutcome {
                state: interpolate_at_range(&state, &next, target_distance),
                termination: Termination::ReachedTarget,
                steps,
            };
        }

        state = next;
    }
}
