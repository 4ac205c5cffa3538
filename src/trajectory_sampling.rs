use serde::{Deserialize, Serialize};

use crate::integrator::{interpolate_at_range, FlightOutcome, ProjectileState};

/// Single trajectory sample point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Downrange distance (m)
    pub range: f64,
    /// Height relative to the line of sight (m), negative below it
    pub drop: f64,
    /// Lateral offset (m), positive to the shooter's right
    pub windage: f64,
    /// Ground speed (m/s)
    pub velocity: f64,
    /// Elapsed time (s)
    pub time: f64,
    /// Kinetic energy (J)
    pub energy: f64,
}

impl TrajectorySample {
    pub fn from_state(state: &ProjectileState, mass_kg: f64) -> Self {
        let velocity = state.speed();
        Self {
            range: state.position.x,
            drop: state.position.y,
            windage: state.position.z,
            velocity,
            time: state.time,
            energy: 0.5 * mass_kg * velocity * velocity,
        }
    }
}

/// Collects samples at fixed downrange intervals while a run is integrated.
///
/// Feed it every step through [`TrajectorySampler::observe`], then call
/// [`TrajectorySampler::finish`] with the run's outcome to add the final
/// point at the target distance.
#[derive(Debug, Clone)]
pub struct TrajectorySampler {
    interval: f64,
    target_distance: f64,
    mass_kg: f64,
    next_index: usize,
    samples: Vec<TrajectorySample>,
}

impl TrajectorySampler {
    /// Starts with the muzzle sample at range 0.
    pub fn new(initial: &ProjectileState, interval: f64, target_distance: f64, mass_kg: f64) -> Self {
        Self {
            interval,
            target_distance,
            mass_kg,
            next_index: 1,
            samples: vec![TrajectorySample::from_state(initial, mass_kg)],
        }
    }

    fn next_range(&self) -> f64 {
        // Multiply rather than accumulate so ranges stay exact multiples
        self.next_index as f64 * self.interval
    }

    /// Record any sample ranges crossed between two consecutive states
    pub fn observe(&mut self, prev: &ProjectileState, next: &ProjectileState) {
        loop {
            let range = self.next_range();
            if range > self.target_distance || range > next.position.x {
                break;
            }
            let state = interpolate_at_range(prev, next, range);
            self.samples.push(TrajectorySample::from_state(&state, self.mass_kg));
            self.next_index += 1;
        }
    }

    /// Close the table.
    ///
    /// A run that reached the target gets a final sample at exactly the target
    /// distance unless the last interval already landed on it. Runs that
    /// stopped early end at their last crossed interval.
    pub fn finish(mut self, outcome: &FlightOutcome) -> Vec<TrajectorySample> {
        if outcome.termination.reached_target() {
            let last_range = self.samples.last().map(|s| s.range).unwrap_or(f64::NEG_INFINITY);
            if last_range < self.target_distance {
                self.samples
                    .push(TrajectorySample::from_state(&outcome.state, self.mass_kg));
            }
        }
        self.samples
    }
}
